//! Core abstractions for cadence.
//!
//! This module provides the clock seam and date parsing shared across features.

mod clock;
mod datetime;

#[cfg(test)]
pub use clock::MockClock;
pub use clock::{Clock, FixedClock, SystemClock};
pub use datetime::{parse_date, parse_timestamp};
