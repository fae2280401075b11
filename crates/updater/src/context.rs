//! Installation-context resolution.
//!
//! The week-of-installation marker is computed once and cached in the
//! store forever after; the referral code falls back to a sentinel when
//! none was recorded. Both are plain key-value lookups -- the cadence
//! logic never depends on them.

use time::Date;

use beacon_core::calendar::previous_monday;
use beacon_storage::{StoreError, WatermarkStore};

/// Referral sentinel used when no promo code was ever recorded.
pub const REFERRAL_DEFAULT: &str = "others";

/// Week marker for installations that predate week tracking (updates
/// rather than fresh installs): the first Monday of 2016.
pub const UPDATE_INSTALL_WEEK: &str = "2016-01-04";

/// The week-of-installation marker, computing and caching it on first use.
///
/// Fresh installs get the Monday of the current week; update installs are
/// pinned to [`UPDATE_INSTALL_WEEK`]. The computed value is written to the
/// store immediately, so later invocations (and reinstalls of this code
/// path) reuse it even if the surrounding report never goes out.
pub async fn resolve_week_of_installation<S: WatermarkStore>(
    store: &S,
    today: Date,
    fresh_install: bool,
) -> Result<String, StoreError> {
    if let Some(week) = store.week_of_installation().await? {
        if !week.is_empty() {
            return Ok(week);
        }
    }

    let week = if fresh_install {
        previous_monday(today)
    } else {
        UPDATE_INSTALL_WEEK.to_string()
    };
    store.set_week_of_installation(&week).await?;
    Ok(week)
}
