use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use beacon_core::WatermarkState;

use crate::error::StoreError;
use crate::traits::WatermarkStore;

#[derive(Default)]
struct Inner {
    watermarks: WatermarkState,
    week_of_installation: Option<String>,
    referral: Option<String>,
}

/// In-memory store for tests and embedding.
///
/// Starts empty (first-run defaults). `set_unavailable(true)` makes every
/// trait method fail with `StoreError::Unavailable`, for fault-injection
/// tests of the fail-closed path.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle simulated unavailability.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Seed a referral code, as a promo-install flow would have.
    pub fn set_referral(&self, referral: &str) {
        self.lock().referral = Some(referral.to_string());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated outage".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl WatermarkStore for MemoryStore {
    async fn load(&self) -> Result<WatermarkState, StoreError> {
        self.check_available()?;
        Ok(self.lock().watermarks)
    }

    async fn commit(&self, state: &WatermarkState) -> Result<(), StoreError> {
        self.check_available()?;
        self.lock().watermarks = *state;
        Ok(())
    }

    async fn week_of_installation(&self) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self.lock().week_of_installation.clone())
    }

    async fn set_week_of_installation(&self, week: &str) -> Result<(), StoreError> {
        self.check_available()?;
        self.lock().week_of_installation = Some(week.to_string());
        Ok(())
    }

    async fn referral(&self) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        Ok(self.lock().referral.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance::run_conformance_suite;

    #[tokio::test]
    async fn memory_store_conformance() {
        let report = run_conformance_suite(|| async { MemoryStore::new() }).await;
        assert!(report.failed == 0, "{report}");
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_operation() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(matches!(store.load().await, Err(StoreError::Unavailable(_))));
        assert!(matches!(
            store.commit(&WatermarkState::default()).await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.week_of_installation().await,
            Err(StoreError::Unavailable(_))
        ));

        store.set_unavailable(false);
        assert!(store.load().await.is_ok());
    }

    #[tokio::test]
    async fn seeded_referral_is_returned() {
        let store = MemoryStore::new();
        store.set_referral("promo42");
        assert_eq!(store.referral().await.unwrap().as_deref(), Some("promo42"));
    }
}
