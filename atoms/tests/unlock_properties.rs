use chrono::{Days, NaiveDate};
use questmas_atoms::clock::{Clock, FixedClock, OffsetClock, TestMode};
use questmas_atoms::tasks::{is_unlocked, Task, UnlockTrigger};
use std::collections::HashSet;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn door(id: &str, order_index: i32, trigger: UnlockTrigger, condition: serde_json::Value) -> Task {
    serde_json::from_value(serde_json::json!({
        "task_id": id,
        "quest_id": "quest-1",
        "title": id,
        "description": null,
        "instructions": null,
        "task_type": "answer",
        "unlock_trigger": trigger,
        "unlock_condition": condition,
        "correct_answer": null,
        "points": 10,
        "order_index": order_index,
        "created_at": "2024-11-01T00:00:00Z",
        "updated_at": "2024-11-01T00:00:00Z"
    }))
    .unwrap()
}

fn ids(list: &[&str]) -> HashSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn date_door_scenario() {
    let task = door(
        "t",
        4,
        UnlockTrigger::Date,
        serde_json::json!({ "date": "2024-12-05" }),
    );
    let siblings = vec![task.clone()];
    let dec_5 = FixedClock(day(2024, 12, 5));

    // One day of test offset back from the 5th
    let dec_4 = OffsetClock::new(dec_5, -1);
    assert!(!is_unlocked(&task, &siblings, &HashSet::new(), &dec_4));
    assert!(is_unlocked(&task, &siblings, &HashSet::new(), &dec_5));
}

#[test]
fn sequential_scenario() {
    let tasks = vec![
        door("T0", 0, UnlockTrigger::Sequential, serde_json::json!({})),
        door("T1", 1, UnlockTrigger::Sequential, serde_json::json!({})),
        door("T2", 2, UnlockTrigger::Sequential, serde_json::json!({})),
    ];
    let clock = FixedClock(day(2024, 12, 1));
    let done = ids(&["T0"]);

    let states: Vec<bool> = tasks
        .iter()
        .map(|t| is_unlocked(t, &tasks, &done, &clock))
        .collect();
    assert_eq!(states, vec![true, true, false]);
}

#[test]
fn sequential_gate_depends_only_on_the_immediate_predecessor() {
    let n = 8;
    let tasks: Vec<Task> = (0..n)
        .map(|i| door(&format!("t{i}"), i, UnlockTrigger::Sequential, serde_json::json!({})))
        .collect();
    let clock = FixedClock(day(2024, 12, 1));

    // Every subset of completed tasks
    for mask in 0u32..(1 << n) {
        let done: HashSet<String> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| format!("t{i}"))
            .collect();

        for (i, task) in tasks.iter().enumerate() {
            let expected = i == 0 || done.contains(&format!("t{}", i - 1));
            assert_eq!(
                is_unlocked(task, &tasks, &done, &clock),
                expected,
                "task {i} with completed {done:?}"
            );
        }
    }
}

#[test]
fn date_gate_has_a_single_threshold() {
    let unlock = day(2024, 12, 12);
    let task = door("t", 11, UnlockTrigger::Date, serde_json::json!({ "date": "2024-12-12" }));
    let siblings = vec![task.clone()];
    let start = day(2024, 11, 1);

    let mut seen_unlocked = false;
    for offset in 0..90u64 {
        let today = start.checked_add_days(Days::new(offset)).unwrap();
        let open = is_unlocked(&task, &siblings, &HashSet::new(), &FixedClock(today));

        assert_eq!(open, today >= unlock, "on {today}");
        // Once open, never closed again
        if seen_unlocked {
            assert!(open);
        }
        seen_unlocked |= open;
    }
    assert!(seen_unlocked);
}

#[test]
fn test_offset_matches_evaluating_the_shifted_day() {
    let tasks: Vec<Task> = (1..=24)
        .map(|d| {
            door(
                &format!("d{d}"),
                d - 1,
                UnlockTrigger::Date,
                serde_json::json!({ "date": format!("2024-12-{:02}", d) }),
            )
        })
        .collect();
    let real_now = FixedClock(day(2024, 11, 28));

    for n in -40i64..40 {
        let shifted = TestMode { enabled: true, day_offset: n }.clock(real_now);
        let future = FixedClock(shifted.today());

        for task in &tasks {
            assert_eq!(
                is_unlocked(task, &tasks, &HashSet::new(), &shifted),
                is_unlocked(task, &tasks, &HashSet::new(), &future),
                "offset {n}, task {}",
                task.task_id
            );
        }
    }
}

#[test]
fn mixed_triggers_in_one_quest() {
    let tasks = vec![
        door("date", 0, UnlockTrigger::Date, serde_json::json!({ "date": "2024-12-24" })),
        door("seq", 1, UnlockTrigger::Sequential, serde_json::json!({})),
        door("manual", 2, UnlockTrigger::Manual, serde_json::json!({})),
        door("bad-date", 3, UnlockTrigger::Date, serde_json::json!({ "date": "24/12/2024" })),
    ];
    let clock = FixedClock(day(2024, 12, 1));
    let none = HashSet::new();

    assert!(!is_unlocked(&tasks[0], &tasks, &none, &clock));
    // The predecessor of "seq" is the still-locked date door, not completed
    assert!(!is_unlocked(&tasks[1], &tasks, &none, &clock));
    assert!(is_unlocked(&tasks[1], &tasks, &ids(&["date"]), &clock));
    assert!(is_unlocked(&tasks[2], &tasks, &none, &clock));
    assert!(is_unlocked(&tasks[3], &tasks, &none, &clock));
}
