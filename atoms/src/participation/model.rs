use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantStatus {
    Active,
    Completed,
    Abandoned,
}

impl ParticipantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantStatus::Active => "active",
            ParticipantStatus::Completed => "completed",
            ParticipantStatus::Abandoned => "abandoned",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(ParticipantStatus::Active),
            "completed" => Some(ParticipantStatus::Completed),
            "abandoned" => Some(ParticipantStatus::Abandoned),
            _ => None,
        }
    }
}

/// Someone (signed in or guest) progressing through a quest
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Participant {
    pub participant_id: String,
    pub quest_id: String,
    pub user_id: Option<String>,
    pub is_guest: bool,
    pub guest_email: Option<String>,
    pub status: ParticipantStatus,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub total_points: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TaskCompletion {
    pub completion_id: String,
    pub participant_id: String,
    pub task_id: String,
    pub answer: Option<String>,

    /// Hosted photo
    pub photo_url: Option<String>,
    /// Inline `data:` photo, kept apart so it never ends up in a URL field
    pub photo_data_url: Option<String>,

    pub points_earned: u32,
    pub hints_used: u32,
    pub attempts: u32,
    pub completed_at: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CreateParticipantPayload {
    pub user_id: Option<String>,
    pub is_guest: Option<bool>,
    pub guest_email: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CompleteTaskPayload {
    pub answer: Option<String>,
    pub photo_url: Option<String>,
}
