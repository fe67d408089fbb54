//! Questmas domain atoms.
//!
//! Each domain module is split the same way: `model` (wire types), `service` (DynamoDB
//! access, clients passed in as arguments) and `http` (lambda handlers over the service).
//! The unlock rules and the clock they are evaluated against are pure and live alongside.

pub mod clock;
pub mod item;
pub mod participation;
pub mod quests;
pub mod respond;
pub mod tasks;

pub use clock::{Clock, FixedClock, OffsetClock, SystemClock, TestMode};
