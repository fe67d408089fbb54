//! Unlock evaluation for calendar doors.
//!
//! `date` tasks open on their unlock day, `sequential` tasks open once the task right
//! before them (by `order_index`) is completed, every other trigger is open at this layer.
//! Answers are checked when a task is completed, not here.
//!
//! Days are compared as naive local dates on both sides. Creator and participant are
//! assumed to share one notion of "day", which only holds for a single-timezone deployment.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::collections::HashSet;

use super::model::{Task, UnlockTrigger};
use crate::clock::Clock;

/// Missing or unreadable unlock dates leave the door open instead of locking participants
/// out of the content because of a data entry mistake.
pub const FAIL_OPEN_ON_MALFORMED_DATE: bool = true;

/// Closed form of a task's unlock trigger + condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockRule {
    /// `unlock_on` is `None` when the condition carried no readable date.
    Date { unlock_on: Option<NaiveDate> },
    Sequential,
    Answer,
    Location,
    Manual,
}

impl UnlockRule {
    pub fn from_parts(trigger: UnlockTrigger, condition: &serde_json::Value) -> Self {
        match trigger {
            UnlockTrigger::Date => {
                let raw = condition.get("date").and_then(|v| v.as_str());
                let unlock_on = raw.and_then(parse_unlock_date);
                if unlock_on.is_none() {
                    tracing::warn!(
                        "⚠️ date unlock condition without a readable date: condition={}",
                        condition
                    );
                }
                UnlockRule::Date { unlock_on }
            }
            UnlockTrigger::Sequential => UnlockRule::Sequential,
            UnlockTrigger::Answer => UnlockRule::Answer,
            UnlockTrigger::Location => UnlockRule::Location,
            UnlockTrigger::Manual => UnlockRule::Manual,
        }
    }
}

/// Reads the calendar day out of an ISO date or timestamp. The time part is dropped.
pub fn parse_unlock_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    None
}

/// Is `task` open for a participant who completed `completed` (task ids), as of `clock`?
///
/// `siblings` are all tasks of the quest, `task` included, in any order.
pub fn is_unlocked<C: Clock + ?Sized>(
    task: &Task,
    siblings: &[Task],
    completed: &HashSet<String>,
    clock: &C,
) -> bool {
    match task.unlock_rule() {
        UnlockRule::Date { unlock_on: Some(day) } => clock.today() >= day,
        UnlockRule::Date { unlock_on: None } => FAIL_OPEN_ON_MALFORMED_DATE,
        UnlockRule::Sequential => match predecessor(task, siblings) {
            Some(previous) => completed.contains(&previous.task_id),
            None => true,
        },
        UnlockRule::Answer | UnlockRule::Location | UnlockRule::Manual => true,
    }
}

/// Evaluates every task of a quest; output follows `tasks` order.
pub fn unlock_states<'a, C: Clock + ?Sized>(
    tasks: &'a [Task],
    completed: &HashSet<String>,
    clock: &C,
) -> Vec<(&'a str, bool)> {
    tasks
        .iter()
        .map(|task| (task.task_id.as_str(), is_unlocked(task, tasks, completed, clock)))
        .collect()
}

/// The task right before `task` by `order_index` (ties broken by id).
/// `None` for the first task, or when `task` is not among `siblings`.
fn predecessor<'a>(task: &Task, siblings: &'a [Task]) -> Option<&'a Task> {
    let mut ordered: Vec<&Task> = siblings.iter().collect();
    ordered.sort_by(|a, b| {
        a.order_index
            .cmp(&b.order_index)
            .then_with(|| a.task_id.cmp(&b.task_id))
    });

    let position = ordered.iter().position(|t| t.task_id == task.task_id)?;
    position.checked_sub(1).map(|i| ordered[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, order_index: i32, trigger: UnlockTrigger, condition: serde_json::Value) -> Task {
        Task {
            task_id: id.to_string(),
            quest_id: "q".to_string(),
            title: id.to_string(),
            description: None,
            instructions: None,
            task_type: "answer".to_string(),
            unlock_trigger: trigger,
            unlock_condition: condition,
            correct_answer: None,
            points: 10,
            order_index,
            hints: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn sequential(id: &str, order_index: i32) -> Task {
        task(id, order_index, UnlockTrigger::Sequential, serde_json::json!({}))
    }

    fn completed(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn date_door_opens_on_its_day() {
        let door = task("t", 4, UnlockTrigger::Date, serde_json::json!({ "date": "2024-12-05" }));
        let siblings = vec![door.clone()];
        let none = completed(&[]);

        assert!(!is_unlocked(&door, &siblings, &none, &FixedClock(day(2024, 12, 4))));
        assert!(is_unlocked(&door, &siblings, &none, &FixedClock(day(2024, 12, 5))));
        assert!(is_unlocked(&door, &siblings, &none, &FixedClock(day(2025, 1, 2))));
    }

    #[test]
    fn sequential_follows_the_previous_task_only() {
        let tasks = vec![sequential("t0", 0), sequential("t1", 1), sequential("t2", 2)];
        let clock = FixedClock(day(2024, 12, 1));
        let done = completed(&["t0"]);

        assert!(is_unlocked(&tasks[0], &tasks, &done, &clock));
        assert!(is_unlocked(&tasks[1], &tasks, &done, &clock));
        assert!(!is_unlocked(&tasks[2], &tasks, &done, &clock));

        // Only the immediate predecessor matters.
        let skipped = completed(&["t1"]);
        assert!(!is_unlocked(&tasks[1], &tasks, &skipped, &clock));
        assert!(is_unlocked(&tasks[2], &tasks, &skipped, &clock));
    }

    #[test]
    fn sequential_uses_order_index_not_slice_position() {
        let tasks = vec![sequential("late", 7), sequential("first", 0), sequential("mid", 3)];
        let clock = FixedClock(day(2024, 12, 1));
        let done = completed(&["mid"]);

        assert!(is_unlocked(&tasks[1], &tasks, &done, &clock));
        assert!(is_unlocked(&tasks[0], &tasks, &done, &clock));
        assert!(!is_unlocked(&tasks[2], &tasks, &done, &clock));
    }

    #[test]
    fn task_outside_its_siblings_counts_as_first() {
        let lone = sequential("lone", 5);
        let others = vec![sequential("a", 0)];
        assert!(is_unlocked(&lone, &others, &completed(&[]), &FixedClock(day(2024, 12, 1))));
    }

    #[test]
    fn malformed_or_missing_dates_fail_open() {
        let clock = FixedClock(day(2000, 1, 1));
        let none = completed(&[]);
        for condition in [
            serde_json::json!({}),
            serde_json::json!({ "date": "" }),
            serde_json::json!({ "date": "next tuesday" }),
            serde_json::json!({ "date": 20241205 }),
            serde_json::Value::Null,
        ] {
            let door = task("t", 0, UnlockTrigger::Date, condition);
            assert_eq!(door.unlock_rule(), UnlockRule::Date { unlock_on: None });
            assert_eq!(
                is_unlocked(&door, &[door.clone()], &none, &clock),
                FAIL_OPEN_ON_MALFORMED_DATE
            );
        }
    }

    #[test]
    fn other_triggers_are_always_open() {
        let clock = FixedClock(day(2024, 12, 1));
        for trigger in [UnlockTrigger::Answer, UnlockTrigger::Location, UnlockTrigger::Manual] {
            let t = task("t", 3, trigger, serde_json::json!({ "date": "2099-01-01" }));
            assert!(is_unlocked(&t, &[t.clone()], &completed(&[]), &clock));
        }
    }

    #[test]
    fn unlock_dates_accept_timestamps() {
        assert_eq!(parse_unlock_date("2024-12-05"), Some(day(2024, 12, 5)));
        assert_eq!(parse_unlock_date(" 2024-12-05 "), Some(day(2024, 12, 5)));
        assert_eq!(parse_unlock_date("2024-12-05T23:30:00+01:00"), Some(day(2024, 12, 5)));
        assert_eq!(parse_unlock_date("2024-12-05T00:00:00.000"), Some(day(2024, 12, 5)));
        assert_eq!(parse_unlock_date("2024-13-05"), None);
    }

    #[test]
    fn unlock_states_keep_task_order_and_are_repeatable() {
        let tasks = vec![
            task("d1", 0, UnlockTrigger::Date, serde_json::json!({ "date": "2024-12-01" })),
            task("d2", 1, UnlockTrigger::Date, serde_json::json!({ "date": "2024-12-02" })),
        ];
        let clock = FixedClock(day(2024, 12, 1));
        let first = unlock_states(&tasks, &completed(&[]), &clock);
        let second = unlock_states(&tasks, &completed(&[]), &clock);

        assert_eq!(first, vec![("d1", true), ("d2", false)]);
        assert_eq!(first, second);
    }
}
