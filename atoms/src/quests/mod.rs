pub mod advent;
pub mod model;
pub mod service;
pub mod http;

pub use advent::{advent_door_payloads, generate_share_code};
pub use model::{Quest, QuestStatus, QuestType, CreateQuestPayload, UpdateQuestPayload};
pub use service::*;
