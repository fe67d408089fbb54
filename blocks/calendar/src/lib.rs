//! Advent calendar block: joins a quest's tasks, a participant's completions and the unlock
//! rules into doors, plus the participant-facing handlers around them.

pub mod calendar;
pub mod doors;
pub mod photos;
pub mod share;

pub use calendar::{all_tasks_completed, build_calendar, task_for_day, Door, DoorStatus, CALENDAR_DAYS};
