// Re-export model types and service functions
pub mod model;
pub mod service;
pub mod unlock;
pub mod http;

pub use model::{Task, TaskView, CreateTaskPayload, UpdateTaskPayload, UnlockTrigger, Hint};
pub use service::*;
pub use unlock::{is_unlocked, parse_unlock_date, unlock_states, UnlockRule, FAIL_OPEN_ON_MALFORMED_DATE};

