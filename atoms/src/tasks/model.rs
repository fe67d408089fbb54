use serde::{Deserialize, Serialize};

use super::unlock::UnlockRule;

/// What gates a task. Only `date` and `sequential` are evaluated, see [`super::unlock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnlockTrigger {
    Date,
    Sequential,
    Answer,
    Location,
    Manual,
}

impl UnlockTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnlockTrigger::Date => "date",
            UnlockTrigger::Sequential => "sequential",
            UnlockTrigger::Answer => "answer",
            UnlockTrigger::Location => "location",
            UnlockTrigger::Manual => "manual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "date" => Some(UnlockTrigger::Date),
            "sequential" => Some(UnlockTrigger::Sequential),
            "answer" => Some(UnlockTrigger::Answer),
            "location" => Some(UnlockTrigger::Location),
            "manual" => Some(UnlockTrigger::Manual),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Hint {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,
}

/// Task (calendar door) domain model
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub task_id: String,
    pub quest_id: String,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub task_type: String, // "answer" | "photo" | ...

    pub unlock_trigger: UnlockTrigger,

    /// Loosely typed on the wire, e.g. `{ "date": "2024-12-05" }`.
    /// Read it through [`Task::unlock_rule`].
    #[serde(default)]
    pub unlock_condition: serde_json::Value,

    pub correct_answer: Option<String>,
    pub points: u32,

    /// Zero-based position among the quest's tasks
    pub order_index: i32,

    #[serde(default)]
    pub hints: Vec<Hint>,

    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn unlock_rule(&self) -> UnlockRule {
        UnlockRule::from_parts(self.unlock_trigger, &self.unlock_condition)
    }

    /// Answers are compared trimmed and case-insensitively.
    /// A task without a correct answer accepts anything, including no answer.
    pub fn check_answer(&self, answer: Option<&str>) -> bool {
        match self.correct_answer.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(expected) => answer
                .map(|given| given.trim().to_lowercase() == expected.to_lowercase())
                .unwrap_or(false),
        }
    }
}

/// A task as participants see it. The expected answer stays on the server.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TaskView {
    pub task_id: String,
    pub quest_id: String,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub task_type: String,
    pub unlock_trigger: UnlockTrigger,
    pub unlock_condition: serde_json::Value,
    pub points: u32,
    pub order_index: i32,
    pub hints: Vec<Hint>,
    /// Completing needs an answer
    pub requires_answer: bool,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            task_id: task.task_id.clone(),
            quest_id: task.quest_id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            instructions: task.instructions.clone(),
            task_type: task.task_type.clone(),
            unlock_trigger: task.unlock_trigger,
            unlock_condition: task.unlock_condition.clone(),
            points: task.points,
            order_index: task.order_index,
            hints: task.hints.clone(),
            requires_answer: !task.check_answer(None),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CreateTaskPayload {
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub task_type: Option<String>,
    pub unlock_trigger: UnlockTrigger,
    #[serde(default)]
    pub unlock_condition: serde_json::Value,
    pub correct_answer: Option<String>,
    pub points: Option<u32>,
    pub order_index: i32,
    #[serde(default)]
    pub hints: Vec<Hint>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UpdateTaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub task_type: Option<String>,
    pub unlock_trigger: Option<UnlockTrigger>,
    pub unlock_condition: Option<serde_json::Value>,
    pub correct_answer: Option<String>,
    pub points: Option<u32>,
    pub order_index: Option<i32>,
    pub hints: Option<Vec<Hint>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with_answer(answer: Option<&str>) -> Task {
        serde_json::from_value(serde_json::json!({
            "task_id": "t1",
            "quest_id": "q1",
            "title": "Day 1",
            "description": null,
            "instructions": null,
            "task_type": "answer",
            "unlock_trigger": "manual",
            "correct_answer": answer,
            "points": 10,
            "order_index": 0,
            "created_at": "",
            "updated_at": ""
        }))
        .unwrap()
    }

    #[test]
    fn answers_are_trimmed_and_case_insensitive() {
        let task = task_with_answer(Some(" Rudolph "));
        assert!(task.check_answer(Some("rudolph")));
        assert!(task.check_answer(Some("  RUDOLPH\n")));
        assert!(!task.check_answer(Some("Dasher")));
        assert!(!task.check_answer(None));
    }

    #[test]
    fn tasks_without_answer_accept_anything() {
        assert!(task_with_answer(None).check_answer(None));
        assert!(task_with_answer(Some("   ")).check_answer(Some("whatever")));
    }

    #[test]
    fn participant_view_leaves_the_answer_out() {
        let task = task_with_answer(Some("reindeer"));
        let view = TaskView::from(&task);
        assert!(view.requires_answer);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("reindeer"));
        assert!(!json.contains("correct_answer"));

        assert!(!TaskView::from(&task_with_answer(None)).requires_answer);
    }

    #[test]
    fn trigger_round_trips_through_its_wire_name() {
        for trigger in [
            UnlockTrigger::Date,
            UnlockTrigger::Sequential,
            UnlockTrigger::Answer,
            UnlockTrigger::Location,
            UnlockTrigger::Manual,
        ] {
            assert_eq!(UnlockTrigger::parse(trigger.as_str()), Some(trigger));
        }
        assert_eq!(UnlockTrigger::parse("weekly"), None);
    }
}
