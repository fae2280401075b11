use std::sync::Arc;

use tokio::sync::Mutex;

use beacon_core::{decide, next_state, CadenceConfig, CadenceDecision, Clock, WatermarkState};
use beacon_report::{PingQuery, Reporter, SendError};
use beacon_storage::{StoreError, WatermarkStore};

use crate::context::{resolve_week_of_installation, REFERRAL_DEFAULT};

/// Per-instance orchestrator configuration.
#[derive(Debug, Clone)]
pub struct UpdaterConfig {
    /// App version string, sent verbatim (the reporter handles escaping
    /// and the developer-build refusal).
    pub version: String,
    /// Whether this installation is fresh, for the install-week marker.
    pub fresh_install: bool,
    /// Cadence thresholds.
    pub cadence: CadenceConfig,
}

/// What a single invocation did. Never an error: all failure modes are
/// absorbed and naturally retried by the next scheduled invocation.
#[derive(Debug)]
pub enum UpdateOutcome {
    /// No cadence was due; the store was not touched and nothing was sent.
    NothingDue,
    /// The ping went out and the new watermarks were committed.
    Reported,
    /// The send failed; watermarks are unchanged.
    SendFailed(SendError),
    /// The store could not be read (or the post-send commit failed).
    /// The invocation is skipped -- unavailability is never first-run.
    StoreUnavailable(StoreError),
}

/// Serializes usage-ping updates and commits watermarks on success.
///
/// The single-flight guard is owned by the instance, so independent
/// updaters never contend. Concurrent callers of the same instance
/// serialize on the guard; whoever enters after a successful commit
/// re-reads fresh watermarks and finds nothing due, which collapses
/// redundant wake-ups into at most one network call per due period.
pub struct UsageUpdater<S, R> {
    store: Arc<S>,
    reporter: Arc<R>,
    clock: Arc<dyn Clock>,
    config: UpdaterConfig,
    // Held across the whole check -> send -> commit sequence. Released on
    // every exit path, including panics, by guard drop.
    flight: Mutex<()>,
}

impl<S: WatermarkStore, R: Reporter> UsageUpdater<S, R> {
    pub fn new(
        store: Arc<S>,
        reporter: Arc<R>,
        clock: Arc<dyn Clock>,
        config: UpdaterConfig,
    ) -> Self {
        Self {
            store,
            reporter,
            clock,
            config,
            flight: Mutex::new(()),
        }
    }

    /// Run one update pass: decide what is due, send at most one combined
    /// ping, and commit the advanced watermarks only if the send succeeded.
    pub async fn run_once(&self) -> UpdateOutcome {
        let _flight = self.flight.lock().await;

        let previous = match self.store.load().await {
            Ok(previous) => previous,
            Err(e) => return UpdateOutcome::StoreUnavailable(e),
        };

        let now = self.clock.now();
        let decision = decide(now, &previous, &self.config.cadence);
        if !decision.any_due() {
            return UpdateOutcome::NothingDue;
        }

        let week = match resolve_week_of_installation(
            self.store.as_ref(),
            now.date(),
            self.config.fresh_install,
        )
        .await
        {
            Ok(week) => week,
            Err(e) => return UpdateOutcome::StoreUnavailable(e),
        };

        let referral = match self.store.referral().await {
            Ok(referral) => referral.unwrap_or_else(|| REFERRAL_DEFAULT.to_string()),
            Err(e) => return UpdateOutcome::StoreUnavailable(e),
        };

        let query = PingQuery {
            daily: decision.daily,
            weekly: decision.weekly,
            monthly: decision.monthly,
            first_run: decision.first_run,
            version: self.config.version.clone(),
            week_of_installation: week,
            referral,
        };

        if let Err(e) = self.reporter.send(&query).await {
            return UpdateOutcome::SendFailed(e);
        }

        match self.store.commit(&next_state(&decision, &previous)).await {
            Ok(()) => UpdateOutcome::Reported,
            Err(e) => UpdateOutcome::StoreUnavailable(e),
        }
    }

    /// Read the stored watermarks and the decision they would produce right
    /// now, without sending or writing anything. For diagnostics.
    pub async fn peek(&self) -> Result<(WatermarkState, CadenceDecision), StoreError> {
        let _flight = self.flight.lock().await;
        let previous = self.store.load().await?;
        let decision = decide(self.clock.now(), &previous, &self.config.cadence);
        Ok((previous, decision))
    }
}
