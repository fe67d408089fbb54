use chrono::Datelike;
use questmas_atoms::clock::Clock;
use questmas_atoms::tasks::{is_unlocked, parse_unlock_date, Task, TaskView, UnlockTrigger};
use serde::Serialize;
use std::collections::HashSet;

pub const CALENDAR_DAYS: u32 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DoorStatus {
    Locked,
    Unlocked,
    Completed,
}

/// One of the 24 calendar doors as the participant sees it.
#[derive(Debug, Clone, Serialize)]
pub struct Door {
    pub day: u32,
    /// Title of the task behind the door, shown even while it is locked.
    pub title: Option<String>,
    /// Only set once the door is open.
    pub task: Option<TaskView>,
    pub status: DoorStatus,
    pub is_today: bool,
}

/// The task behind door `day`: a date task unlocking on December `day`, otherwise the task
/// at position `day - 1`. First match by `order_index` wins.
///
/// A date task whose date is set but unreadable sits behind no door. One with no date at
/// all is placed by position.
pub fn task_for_day(tasks: &[Task], day: u32) -> Option<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|t| t.order_index);

    ordered.into_iter().find(|task| match calendar_date(task) {
        Some(raw) => parse_unlock_date(raw).is_some_and(|d| d.month() == 12 && d.day() == day),
        None => i64::from(task.order_index) == i64::from(day) - 1,
    })
}

fn calendar_date(task: &Task) -> Option<&str> {
    if task.unlock_trigger != UnlockTrigger::Date {
        return None;
    }
    task.unlock_condition
        .get("date")
        .and_then(|v| v.as_str())
        .filter(|raw| !raw.trim().is_empty())
}

/// Joins tasks, completions and unlock state into the 24 doors.
///
/// `open_all_doors` opens every door that has a task (test mode).
pub fn build_calendar<C: Clock + ?Sized>(
    tasks: &[Task],
    completed: &HashSet<String>,
    clock: &C,
    open_all_doors: bool,
) -> Vec<Door> {
    let today = clock.today();

    (1..=CALENDAR_DAYS)
        .map(|day| {
            let task = task_for_day(tasks, day);
            let status = match task {
                None => DoorStatus::Locked,
                Some(t) if completed.contains(&t.task_id) => DoorStatus::Completed,
                Some(t) if open_all_doors || is_unlocked(t, tasks, completed, clock) => {
                    DoorStatus::Unlocked
                }
                Some(_) => DoorStatus::Locked,
            };

            let open = matches!(status, DoorStatus::Unlocked | DoorStatus::Completed);

            Door {
                day,
                title: task.map(|t| t.title.clone()),
                task: task.filter(|_| open).map(TaskView::from),
                status,
                is_today: today.month() == 12 && today.day() == day,
            }
        })
        .collect()
}

/// True once every task of the quest is in `completed`. A quest without tasks never is.
pub fn all_tasks_completed(tasks: &[Task], completed: &HashSet<String>) -> bool {
    !tasks.is_empty() && tasks.iter().all(|t| completed.contains(&t.task_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use questmas_atoms::clock::FixedClock;

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

    fn advent(year: i32) -> Vec<Task> {
        (1..=24)
            .map(|d| {
                task(
                    &format!("d{d}"),
                    d - 1,
                    UnlockTrigger::Date,
                    serde_json::json!({ "date": format!("{year}-12-{d:02}") }),
                )
            })
            .collect()
    }

    fn clock(m: u32, d: u32) -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, m, d).unwrap())
    }

    fn ids(list: &[&str]) -> HashSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn date_tasks_land_on_their_december_day() {
        // Stored out of order on purpose
        let mut tasks = advent(2024);
        tasks.reverse();

        for day in 1..=24 {
            assert_eq!(task_for_day(&tasks, day).unwrap().task_id, format!("d{day}"));
        }
    }

    #[test]
    fn other_tasks_use_their_position() {
        let tasks = vec![
            task("a", 0, UnlockTrigger::Sequential, serde_json::json!({})),
            task("b", 1, UnlockTrigger::Manual, serde_json::json!({})),
            // January date: not a December door, and its position is not used either
            task("jan", 2, UnlockTrigger::Date, serde_json::json!({ "date": "2025-01-03" })),
        ];

        assert_eq!(task_for_day(&tasks, 1).unwrap().task_id, "a");
        assert_eq!(task_for_day(&tasks, 2).unwrap().task_id, "b");
        assert!(task_for_day(&tasks, 3).is_none());
    }

    #[test]
    fn unreadable_dates_sit_behind_no_door() {
        let tasks = vec![
            task("garbled", 0, UnlockTrigger::Date, serde_json::json!({ "date": "soon" })),
            task("undated", 1, UnlockTrigger::Date, serde_json::json!({})),
        ];

        assert!(task_for_day(&tasks, 1).is_none());
        assert_eq!(task_for_day(&tasks, 2).unwrap().task_id, "undated");
    }

    #[test]
    fn locked_doors_show_only_their_title() {
        let mut tasks = advent(2024);
        for t in tasks.iter_mut() {
            t.correct_answer = Some("reindeer".to_string());
            t.instructions = Some("secret instructions".to_string());
        }
        let doors = build_calendar(&tasks, &HashSet::new(), &clock(12, 1), false);

        let locked = &doors[23];
        assert_eq!(locked.status, DoorStatus::Locked);
        assert_eq!(locked.title.as_deref(), Some("d24"));
        assert!(locked.task.is_none());
        let json = serde_json::to_string(locked).unwrap();
        assert!(!json.contains("reindeer"));
        assert!(!json.contains("secret instructions"));

        // Open doors show the task, still without the answer
        let open = serde_json::to_string(&doors[0]).unwrap();
        assert_eq!(doors[0].status, DoorStatus::Unlocked);
        assert!(open.contains("secret instructions"));
        assert!(!open.contains("reindeer"));
    }

    #[test]
    fn calendar_on_december_fifth() {
        let tasks = advent(2024);
        let doors = build_calendar(&tasks, &ids(&["d2"]), &clock(12, 5), false);

        assert_eq!(doors.len(), 24);
        assert_eq!(doors[0].status, DoorStatus::Unlocked);
        assert_eq!(doors[1].status, DoorStatus::Completed);
        assert_eq!(doors[4].status, DoorStatus::Unlocked);
        assert!(doors[4].is_today);
        assert_eq!(doors[5].status, DoorStatus::Locked);
        assert_eq!(doors[5].title.as_deref(), Some("d6"));
        assert_eq!(doors.iter().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn open_all_doors_skips_the_rules_but_keeps_completions() {
        let tasks = advent(2024);
        let doors = build_calendar(&tasks, &ids(&["d24"]), &clock(11, 1), true);

        assert!(doors[..23].iter().all(|d| d.status == DoorStatus::Unlocked));
        assert_eq!(doors[23].status, DoorStatus::Completed);
        assert!(doors.iter().all(|d| !d.is_today));
    }

    #[test]
    fn missing_tasks_are_locked_even_when_all_doors_are_open() {
        let tasks = vec![task("a", 0, UnlockTrigger::Manual, serde_json::json!({}))];
        let doors = build_calendar(&tasks, &HashSet::new(), &clock(12, 1), true);

        assert_eq!(doors[0].status, DoorStatus::Unlocked);
        assert!(doors[1..].iter().all(|d| d.status == DoorStatus::Locked && d.title.is_none()));
    }

    #[test]
    fn completion_of_the_whole_quest() {
        let tasks = vec![
            task("a", 0, UnlockTrigger::Manual, serde_json::json!({})),
            task("b", 1, UnlockTrigger::Manual, serde_json::json!({})),
        ];
        assert!(!all_tasks_completed(&tasks, &ids(&["a"])));
        assert!(all_tasks_completed(&tasks, &ids(&["a", "b", "stale"])));
        assert!(!all_tasks_completed(&[], &ids(&["a"])));
    }
}
