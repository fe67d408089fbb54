//! Door seeding for `christmas_calendar` quests: December 1st to 24th, one door per day.

use chrono::NaiveDate;
use rand::Rng;

use crate::tasks::{CreateTaskPayload, UnlockTrigger};

pub const ADVENT_DOORS: u32 = 24;

const SHARE_CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const SHARE_CODE_LEN: usize = 6;

/// `({year}-12-01, {year}-12-24)` as ISO strings.
pub fn advent_window(year: i32) -> (String, String) {
    (format!("{:04}-12-01", year), format!("{:04}-12-{:02}", year, ADVENT_DOORS))
}

/// One date-gated door per day, `order_index = day - 1`.
pub fn advent_door_payloads(year: i32) -> Vec<CreateTaskPayload> {
    (1..=ADVENT_DOORS)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, 12, day).map(|date| (day, date)))
        .map(|(day, date)| CreateTaskPayload {
            title: format!("Day {} - December {}", day, day),
            description: Some(String::new()),
            instructions: Some(String::new()),
            task_type: Some("answer".to_string()),
            unlock_trigger: UnlockTrigger::Date,
            unlock_condition: serde_json::json!({ "date": date.format("%Y-%m-%d").to_string() }),
            correct_answer: None,
            points: Some(10),
            order_index: day as i32 - 1,
            hints: vec![],
        })
        .collect()
}

/// Six characters of `[0-9A-Z]`.
pub fn generate_share_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SHARE_CODE_LEN)
        .map(|_| SHARE_CODE_ALPHABET[rng.gen_range(0..SHARE_CODE_ALPHABET.len())] as char)
        .collect()
}
