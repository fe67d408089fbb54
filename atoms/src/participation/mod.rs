pub mod model;
pub mod service;
pub mod http;

pub use model::{
    Participant, ParticipantStatus, TaskCompletion, CreateParticipantPayload, CompleteTaskPayload,
};
pub use service::*;
