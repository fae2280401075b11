//! The cadence decision engine.
//!
//! `decide` is a pure function of the current time and the previously
//! persisted watermarks; `next_state` proposes the watermarks to commit
//! once a report has succeeded. Neither performs I/O -- the orchestrator
//! owns the read, the send, and the commit.

use time::OffsetDateTime;

use crate::calendar::{
    epoch_millis, millis_of_day, month_index, MILLIS_IN_A_DAY, MILLIS_IN_A_WEEK,
};
use crate::watermark::WatermarkState;

/// Cadence thresholds, injectable so tests can time-travel deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceConfig {
    /// Daily threshold in milliseconds.
    pub day_millis: i64,
    /// Weekly threshold in milliseconds.
    pub week_millis: i64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            day_millis: MILLIS_IN_A_DAY,
            week_millis: MILLIS_IN_A_WEEK,
        }
    }
}

/// Which cadences are due at a given instant, plus the instant itself.
///
/// Constructed fresh per invocation, consumed immediately, discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CadenceDecision {
    pub first_run: bool,
    pub daily: bool,
    pub weekly: bool,
    pub monthly: bool,
    /// Epoch millis the flags were computed at.
    pub now_millis: i64,
    /// Zero-based calendar month at `now_millis`.
    pub month: u8,
    /// Calendar year at `now_millis`.
    pub year: i32,
}

impl CadenceDecision {
    /// True iff any cadence is due. When false the caller must perform
    /// no network call and no store write.
    pub fn any_due(&self) -> bool {
        self.first_run || self.daily || self.weekly || self.monthly
    }
}

/// Evaluate all four cadence flags. The flags are independent, not
/// mutually exclusive.
pub fn decide(
    now: OffsetDateTime,
    previous: &WatermarkState,
    config: &CadenceConfig,
) -> CadenceDecision {
    let now_millis = epoch_millis(now);
    let since_last = now_millis - previous.last_report_millis;

    // The second disjunct is a clock-regression guard: if more time has
    // elapsed since the last report than since midnight, the clock crossed
    // a day boundary inconsistently with plain elapsed time, so a daily
    // report is forced. Deliberate tolerance for device clock anomalies.
    let daily = since_last >= config.day_millis || millis_of_day(now) < since_last;

    let weekly = now_millis - previous.last_weekly_report_millis >= config.week_millis;

    let month = month_index(now);
    let year = now.year();
    let monthly = month != previous.last_report_month || year != previous.last_report_year;

    CadenceDecision {
        first_run: previous.is_first_run(),
        daily,
        weekly,
        monthly,
        now_millis,
        month,
        year,
    }
}

/// The watermarks to commit if the report for `decision` succeeds.
///
/// Each field advances only when its own cadence fired. `first_run` on its
/// own does not advance `last_report_millis` -- only `daily` does. In
/// practice a first run always has `daily` set too, since the zero sentinel
/// makes the elapsed time exceed any realistic daily threshold.
pub fn next_state(decision: &CadenceDecision, previous: &WatermarkState) -> WatermarkState {
    WatermarkState {
        last_report_millis: if decision.daily {
            decision.now_millis
        } else {
            previous.last_report_millis
        },
        last_weekly_report_millis: if decision.weekly {
            decision.now_millis
        } else {
            previous.last_weekly_report_millis
        },
        last_report_month: if decision.monthly {
            decision.month
        } else {
            previous.last_report_month
        },
        last_report_year: if decision.monthly {
            decision.year
        } else {
            previous.last_report_year
        },
    }
}
