//! Calendar arithmetic for cadence decisions and the install-week marker.

use time::{Date, Duration, OffsetDateTime};

/// One day, in milliseconds.
pub const MILLIS_IN_A_DAY: i64 = 86_400_000;
/// One week, in milliseconds.
pub const MILLIS_IN_A_WEEK: i64 = 7 * 86_400_000;

/// Epoch milliseconds of the given instant.
pub fn epoch_millis(t: OffsetDateTime) -> i64 {
    (t.unix_timestamp_nanos() / 1_000_000) as i64
}

/// Milliseconds elapsed since midnight of the instant's own calendar day.
pub fn millis_of_day(t: OffsetDateTime) -> i64 {
    t.hour() as i64 * 3_600_000
        + t.minute() as i64 * 60_000
        + t.second() as i64 * 1_000
        + t.millisecond() as i64
}

/// Zero-based calendar month (0-11) of the given instant.
pub fn month_index(t: OffsetDateTime) -> u8 {
    u8::from(t.month()) - 1
}

/// The date of the most recent Monday, inclusive of `date` itself,
/// formatted `YYYY-MM-DD`. Used as the week-of-installation marker.
pub fn previous_monday(date: Date) -> String {
    let days_back = i64::from(date.weekday().number_days_from_monday());
    let monday = date.saturating_sub(Duration::days(days_back));
    format!(
        "{:04}-{:02}-{:02}",
        monday.year(),
        u8::from(monday.month()),
        monday.day()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn epoch_millis_includes_subsecond() {
        let t = datetime!(2026-03-01 00:00:00.250 UTC);
        assert_eq!(epoch_millis(t) % 1_000, 250);
    }

    #[test]
    fn millis_of_day_at_midnight_is_zero() {
        assert_eq!(millis_of_day(datetime!(2026-03-01 00:00 UTC)), 0);
    }

    #[test]
    fn millis_of_day_mid_morning() {
        let t = datetime!(2026-03-01 09:30:15.500 UTC);
        assert_eq!(
            millis_of_day(t),
            9 * 3_600_000 + 30 * 60_000 + 15 * 1_000 + 500
        );
    }

    #[test]
    fn month_index_is_zero_based() {
        assert_eq!(month_index(datetime!(2026-01-15 12:00 UTC)), 0);
        assert_eq!(month_index(datetime!(2026-12-15 12:00 UTC)), 11);
    }

    #[test]
    fn previous_monday_of_a_monday_is_itself() {
        // 2016-01-04 was a Monday.
        assert_eq!(previous_monday(date!(2016 - 01 - 04)), "2016-01-04");
    }

    #[test]
    fn previous_monday_of_a_sunday_goes_back_six_days() {
        assert_eq!(previous_monday(date!(2016 - 01 - 10)), "2016-01-04");
    }

    #[test]
    fn previous_monday_crosses_month_boundary() {
        // 2026-08-01 was a Saturday; the prior Monday was 2026-07-27.
        assert_eq!(previous_monday(date!(2026 - 08 - 01)), "2026-07-27");
    }
}
