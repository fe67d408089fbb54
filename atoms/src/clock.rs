use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Source of "today" for unlock evaluation.
///
/// Everything that gates content on the calendar asks a `Clock` instead of reading the wall
/// clock, so a tester can simulate any day without touching the system time.
pub trait Clock {
    /// The current calendar day in local time. Time of day is never consulted.
    fn today(&self) -> NaiveDate;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// The real wall clock, truncated to the local day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Shifts another clock by a whole number of days.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock<C> {
    inner: C,
    days: i64,
}

impl<C: Clock> OffsetClock<C> {
    pub fn new(inner: C, days: i64) -> Self {
        Self { inner, days }
    }

    pub fn offset_days(&self) -> i64 {
        self.days
    }
}

impl<C: Clock> Clock for OffsetClock<C> {
    fn today(&self) -> NaiveDate {
        let today = self.inner.today();
        let shifted = if self.days >= 0 {
            today.checked_add_days(Days::new(self.days.unsigned_abs()))
        } else {
            today.checked_sub_days(Days::new(self.days.unsigned_abs()))
        };
        // Out of chrono's calendar range: stay on the real day.
        shifted.unwrap_or(today)
    }
}

/// Tester override: when enabled, "today" is the real day plus `day_offset`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestMode {
    pub enabled: bool,
    pub day_offset: i64,
}

impl TestMode {
    /// Wraps `inner` into the clock unlock evaluation should use.
    pub fn clock<C: Clock>(&self, inner: C) -> OffsetClock<C> {
        let days = if self.enabled { self.day_offset } else { 0 };
        OffsetClock::new(inner, days)
    }
}
