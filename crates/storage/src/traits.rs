use async_trait::async_trait;

use beacon_core::WatermarkState;

use crate::error::StoreError;

/// Durable storage for cadence watermarks and installation-context strings.
///
/// ## Atomicity
///
/// `commit` persists all four watermark fields as one atomic unit -- a
/// reader never observes a partially updated `WatermarkState`. The
/// read-modify-write cycle across `load` and `commit` is NOT transactional
/// here; the update orchestrator's single-flight guard provides that
/// serialization.
///
/// ## First-run vs. unavailable
///
/// An empty store loads as `WatermarkState::default()` (the zero first-run
/// sentinel). A store that exists but cannot be read must return an error
/// instead -- unavailability is never reported as first-run, so a flaky
/// backend cannot spuriously reset cadence.
///
/// ## Thread safety
///
/// Implementations must be `Send + Sync + 'static` so they can be shared
/// across async task boundaries.
#[async_trait]
pub trait WatermarkStore: Send + Sync + 'static {
    /// Read the current watermarks. Empty store = first-run defaults.
    async fn load(&self) -> Result<WatermarkState, StoreError>;

    /// Atomically persist all four watermark fields.
    async fn commit(&self, state: &WatermarkState) -> Result<(), StoreError>;

    /// The cached week-of-installation marker, if one has been recorded.
    async fn week_of_installation(&self) -> Result<Option<String>, StoreError>;

    /// Record the week-of-installation marker. Written once on first
    /// resolution and reused forever after.
    async fn set_week_of_installation(&self, week: &str) -> Result<(), StoreError>;

    /// The stored referral code, if any. Callers substitute the `"others"`
    /// sentinel when absent.
    async fn referral(&self) -> Result<Option<String>, StoreError>;
}
