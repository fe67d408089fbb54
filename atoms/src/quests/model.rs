use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestType {
    ChristmasCalendar,
    TreasureHunt,
    Onboarding,
    Custom,
}

impl QuestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestType::ChristmasCalendar => "christmas_calendar",
            QuestType::TreasureHunt => "treasure_hunt",
            QuestType::Onboarding => "onboarding",
            QuestType::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "christmas_calendar" => Some(QuestType::ChristmasCalendar),
            "treasure_hunt" => Some(QuestType::TreasureHunt),
            "onboarding" => Some(QuestType::Onboarding),
            "custom" => Some(QuestType::Custom),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestStatus {
    Draft,
    Published,
    Archived,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStatus::Draft => "draft",
            QuestStatus::Published => "published",
            QuestStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(QuestStatus::Draft),
            "published" => Some(QuestStatus::Published),
            "archived" => Some(QuestStatus::Archived),
            _ => None,
        }
    }
}

/// Quest domain model - a themed set of doors created by one user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Quest {
    pub quest_id: String,
    pub creator_id: String,
    pub title: String,
    pub description: Option<String>,
    pub quest_type: QuestType,
    pub status: QuestStatus,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_public: bool,
    pub requires_auth: bool,

    /// Set on first publish, kept on re-publish
    pub share_code: Option<String>,

    /// Used by the personalised greeting
    pub recipient_first_name: Option<String>,

    pub created_at: String,
    pub updated_at: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CreateQuestPayload {
    pub title: String,
    pub description: Option<String>,
    pub quest_type: QuestType,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_public: Option<bool>,
    pub requires_auth: Option<bool>,
    pub recipient_first_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateQuestPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<QuestStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub is_public: Option<bool>,
    pub requires_auth: Option<bool>,
    pub recipient_first_name: Option<String>,
}
