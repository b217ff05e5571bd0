//! Injectable "current date" source.
//!
//! Validation never reads the system clock itself; callers pass `today` in.
//! Production code uses [`SystemClock`]; tests pin the date with [`FixedClock`].

use chrono::{NaiveDate, Utc};

/// Source of the caller's notion of "today".
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Wall clock (UTC calendar date).
#[derive(Debug, Copy, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a fixed date. Prefer this in tests for determinism.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
