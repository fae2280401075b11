//! Beacon core -- watermark state, cadence engine, calendar helpers.
//!
//! The cadence engine is a pure function of the current time and the
//! previously persisted watermarks. It decides which of the four ping
//! cadences (first-run, daily, weekly, monthly) are due and proposes
//! the watermark state to commit if a report succeeds. All I/O lives
//! in the storage and report crates; nothing here suspends or blocks.

pub mod cadence;
pub mod calendar;
pub mod clock;
pub mod watermark;

pub use cadence::{decide, next_state, CadenceConfig, CadenceDecision};
pub use calendar::{MILLIS_IN_A_DAY, MILLIS_IN_A_WEEK};
pub use clock::{Clock, FixedClock, SystemClock};
pub use watermark::WatermarkState;
