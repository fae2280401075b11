use serde::{Deserialize, Serialize};

/// The persisted "last reported" watermarks.
///
/// All four fields are committed together as one atomic unit, and only
/// after a confirmed successful report. `last_report_millis == 0` is the
/// first-run sentinel: once a report succeeds it becomes non-zero and
/// stays non-zero forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WatermarkState {
    /// Epoch millis of the last successful daily-eligible report. `0` = never.
    pub last_report_millis: i64,
    /// Epoch millis of the last successful weekly-eligible report. `0` = never.
    pub last_weekly_report_millis: i64,
    /// Calendar month (0-11) of the last successful monthly-eligible report.
    pub last_report_month: u8,
    /// Calendar year of the last successful monthly-eligible report.
    pub last_report_year: i32,
}

impl WatermarkState {
    /// True iff no report has ever succeeded.
    pub fn is_first_run(&self) -> bool {
        self.last_report_millis == 0
    }
}
