//! End-to-end orchestrator tests with a fixed clock, the in-memory store,
//! and reporters with scripted outcomes.

use std::sync::Arc;

use time::macros::datetime;
use time::OffsetDateTime;

use beacon_core::calendar::epoch_millis;
use beacon_core::{CadenceConfig, FixedClock, WatermarkState};
use beacon_report::{HttpReporter, ReportParams, SendError, StaticReporter, DEVELOPER_BUILD};
use beacon_storage::{MemoryStore, StoreError, WatermarkStore};
use beacon_updater::{UpdateOutcome, UpdaterConfig, UsageUpdater, UPDATE_INSTALL_WEEK};

const NOW: OffsetDateTime = datetime!(2026-08-26 10:00 UTC);

fn config() -> UpdaterConfig {
    UpdaterConfig {
        version: "1.0.42".to_string(),
        fresh_install: true,
        cadence: CadenceConfig::default(),
    }
}

fn updater(
    store: Arc<MemoryStore>,
    reporter: Arc<StaticReporter>,
    clock: Arc<FixedClock>,
    config: UpdaterConfig,
) -> UsageUpdater<MemoryStore, StaticReporter> {
    UsageUpdater::new(store, reporter, clock, config)
}

#[tokio::test]
async fn first_run_reports_and_commits_all_watermarks() {
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(StaticReporter::succeeding());
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter.clone(), clock, config());

    let outcome = updater.run_once().await;
    assert!(matches!(outcome, UpdateOutcome::Reported), "{outcome:?}");
    assert_eq!(reporter.calls(), 1);

    let query = reporter.last_query().unwrap();
    assert!(query.first_run);
    assert!(query.daily);
    assert!(query.weekly);
    assert!(query.monthly);
    assert_eq!(query.week_of_installation, "2026-08-24");
    assert_eq!(query.referral, "others");

    let state = store.load().await.unwrap();
    assert_eq!(
        state,
        WatermarkState {
            last_report_millis: epoch_millis(NOW),
            last_weekly_report_millis: epoch_millis(NOW),
            last_report_month: 7,
            last_report_year: 2026,
        }
    );
}

#[tokio::test]
async fn nothing_due_touches_neither_store_nor_reporter() {
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(StaticReporter::succeeding());
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter.clone(), clock.clone(), config());

    assert!(matches!(updater.run_once().await, UpdateOutcome::Reported));
    let committed = store.load().await.unwrap();

    // Five minutes later nothing is due: no second send, no write.
    clock.set(datetime!(2026-08-26 10:05 UTC));
    assert!(matches!(updater.run_once().await, UpdateOutcome::NothingDue));
    assert_eq!(reporter.calls(), 1);
    assert_eq!(store.load().await.unwrap(), committed);
}

#[tokio::test]
async fn daily_fires_again_the_next_day() {
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(StaticReporter::succeeding());
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter.clone(), clock.clone(), config());

    assert!(matches!(updater.run_once().await, UpdateOutcome::Reported));

    clock.set(datetime!(2026-08-27 11:00 UTC));
    assert!(matches!(updater.run_once().await, UpdateOutcome::Reported));
    assert_eq!(reporter.calls(), 2);

    let query = reporter.last_query().unwrap();
    assert!(query.daily);
    assert!(!query.first_run);
    assert!(!query.weekly);
    assert!(!query.monthly);
    // The cached install week survives across invocations.
    assert_eq!(query.week_of_installation, "2026-08-24");
}

#[tokio::test]
async fn send_failure_leaves_watermarks_bit_for_bit() {
    let store = Arc::new(MemoryStore::new());
    let before = WatermarkState {
        last_report_millis: epoch_millis(datetime!(2026-08-20 09:00 UTC)),
        last_weekly_report_millis: epoch_millis(datetime!(2026-08-20 09:00 UTC)),
        last_report_month: 7,
        last_report_year: 2026,
    };
    store.commit(&before).await.unwrap();

    let reporter = Arc::new(StaticReporter::failing(SendError::Status { code: 503 }));
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter.clone(), clock, config());

    let outcome = updater.run_once().await;
    assert!(
        matches!(outcome, UpdateOutcome::SendFailed(SendError::Status { code: 503 })),
        "{outcome:?}"
    );
    assert_eq!(reporter.calls(), 1);
    assert_eq!(store.load().await.unwrap(), before);
}

#[tokio::test]
async fn failed_invocation_retries_naturally_on_the_next_pass() {
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(StaticReporter::failing(SendError::Io {
        message: "connection refused".to_string(),
    }));
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter.clone(), clock, config());

    assert!(matches!(
        updater.run_once().await,
        UpdateOutcome::SendFailed(_)
    ));
    assert!(store.load().await.unwrap().is_first_run());

    // Same unchanged watermarks, so the next pass finds everything still
    // due and sends again; this time it sticks.
    reporter.set_outcome(Ok(()));
    assert!(matches!(updater.run_once().await, UpdateOutcome::Reported));
    assert!(!store.load().await.unwrap().is_first_run());
    assert_eq!(reporter.calls(), 2);
}

#[tokio::test]
async fn store_unavailable_fails_closed_without_sending() {
    let store = Arc::new(MemoryStore::new());
    store.set_unavailable(true);
    let reporter = Arc::new(StaticReporter::succeeding());
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter.clone(), clock, config());

    let outcome = updater.run_once().await;
    assert!(
        matches!(
            outcome,
            UpdateOutcome::StoreUnavailable(StoreError::Unavailable(_))
        ),
        "{outcome:?}"
    );
    assert_eq!(reporter.calls(), 0);
}

#[tokio::test]
async fn concurrent_invocations_collapse_to_one_send() {
    const N: usize = 10;

    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(StaticReporter::succeeding());
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = Arc::new(updater(store.clone(), reporter.clone(), clock, config()));

    let mut handles = Vec::new();
    for _ in 0..N {
        let u = updater.clone();
        handles.push(tokio::spawn(async move { u.run_once().await }));
    }

    let mut reported = 0usize;
    let mut nothing_due = 0usize;
    for handle in handles {
        match handle.await.expect("task panic") {
            UpdateOutcome::Reported => reported += 1,
            UpdateOutcome::NothingDue => nothing_due += 1,
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    // Whoever wins the guard sends; everyone else re-reads the freshly
    // committed watermarks and finds nothing due.
    assert_eq!(reported, 1);
    assert_eq!(nothing_due, N - 1);
    assert_eq!(reporter.calls(), 1);
    assert_eq!(
        store.load().await.unwrap().last_report_millis,
        epoch_millis(NOW)
    );
}

#[tokio::test]
async fn developer_build_never_reaches_the_network() {
    let store = Arc::new(MemoryStore::new());
    // An unroutable endpoint: if the guard failed to short-circuit, the
    // test would surface a transport error instead of DeveloperBuild.
    let reporter = Arc::new(HttpReporter::new(ReportParams {
        endpoint: "http://127.0.0.1:9/usage".to_string(),
        platform: "android".to_string(),
        channel: "stable".to_string(),
    }));
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = UsageUpdater::new(
        store.clone(),
        reporter,
        clock,
        UpdaterConfig {
            version: DEVELOPER_BUILD.to_string(),
            fresh_install: true,
            cadence: CadenceConfig::default(),
        },
    );

    let outcome = updater.run_once().await;
    assert!(
        matches!(outcome, UpdateOutcome::SendFailed(SendError::DeveloperBuild)),
        "{outcome:?}"
    );
    assert!(store.load().await.unwrap().is_first_run());
}

#[tokio::test]
async fn update_install_pins_the_week_marker() {
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(StaticReporter::succeeding());
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = UsageUpdater::new(
        store.clone(),
        reporter.clone(),
        clock,
        UpdaterConfig {
            fresh_install: false,
            ..config()
        },
    );

    assert!(matches!(updater.run_once().await, UpdateOutcome::Reported));
    assert_eq!(
        reporter.last_query().unwrap().week_of_installation,
        UPDATE_INSTALL_WEEK
    );
}

#[tokio::test]
async fn week_marker_is_cached_even_when_the_send_fails() {
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(StaticReporter::failing(SendError::Status { code: 500 }));
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter, clock, config());

    assert!(matches!(
        updater.run_once().await,
        UpdateOutcome::SendFailed(_)
    ));
    // Watermarks untouched, but the install week was resolved and cached.
    assert!(store.load().await.unwrap().is_first_run());
    assert_eq!(
        store.week_of_installation().await.unwrap().as_deref(),
        Some("2026-08-24")
    );
}

#[tokio::test]
async fn seeded_referral_is_sent_instead_of_the_sentinel() {
    let store = Arc::new(MemoryStore::new());
    store.set_referral("promo42");
    let reporter = Arc::new(StaticReporter::succeeding());
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter.clone(), clock, config());

    assert!(matches!(updater.run_once().await, UpdateOutcome::Reported));
    assert_eq!(reporter.last_query().unwrap().referral, "promo42");
}

#[tokio::test]
async fn peek_reports_without_sending_or_writing() {
    let store = Arc::new(MemoryStore::new());
    let reporter = Arc::new(StaticReporter::succeeding());
    let clock = Arc::new(FixedClock::new(NOW));
    let updater = updater(store.clone(), reporter.clone(), clock, config());

    let (state, decision) = updater.peek().await.unwrap();
    assert!(state.is_first_run());
    assert!(decision.any_due());
    assert_eq!(reporter.calls(), 0);
    assert!(store.week_of_installation().await.unwrap().is_none());
}
