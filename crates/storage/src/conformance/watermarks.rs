use std::future::Future;

use beacon_core::WatermarkState;

use super::TestResult;
use crate::WatermarkStore;

pub(super) async fn run_watermark_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "watermarks",
            "empty_store_loads_first_run_defaults",
            empty_store_loads_first_run_defaults(factory).await,
        ),
        TestResult::from_result(
            "watermarks",
            "commit_then_load_round_trips",
            commit_then_load_round_trips(factory).await,
        ),
        TestResult::from_result(
            "watermarks",
            "commit_is_an_atomic_batch",
            commit_is_an_atomic_batch(factory).await,
        ),
        TestResult::from_result(
            "watermarks",
            "recommit_overwrites_previous",
            recommit_overwrites_previous(factory).await,
        ),
    ]
}

fn sample_state() -> WatermarkState {
    WatermarkState {
        last_report_millis: 1_756_200_000_000,
        last_weekly_report_millis: 1_755_600_000_000,
        last_report_month: 7,
        last_report_year: 2026,
    }
}

/// A fresh store must load the all-zero first-run sentinel.
async fn empty_store_loads_first_run_defaults<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let state = store.load().await.map_err(|e| format!("load: {e}"))?;
    if state != WatermarkState::default() {
        return Err(format!("expected first-run defaults, got {state:?}"));
    }
    if !state.is_first_run() {
        return Err("fresh store must report first-run".to_string());
    }
    Ok(())
}

/// A committed state must be read back exactly.
async fn commit_then_load_round_trips<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let state = sample_state();
    store.commit(&state).await.map_err(|e| format!("commit: {e}"))?;
    let loaded = store.load().await.map_err(|e| format!("load: {e}"))?;
    if loaded != state {
        return Err(format!("expected {state:?}, got {loaded:?}"));
    }
    Ok(())
}

/// All four fields land together -- no partial update is ever observable
/// after a commit returns.
async fn commit_is_an_atomic_batch<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    store
        .commit(&sample_state())
        .await
        .map_err(|e| format!("first commit: {e}"))?;

    let second = WatermarkState {
        last_report_millis: 2_000_000_000_000,
        last_weekly_report_millis: 2_000_000_000_000,
        last_report_month: 0,
        last_report_year: 2033,
    };
    store
        .commit(&second)
        .await
        .map_err(|e| format!("second commit: {e}"))?;

    let loaded = store.load().await.map_err(|e| format!("load: {e}"))?;
    if loaded != second {
        return Err(format!(
            "partial update observed: expected {second:?}, got {loaded:?}"
        ));
    }
    Ok(())
}

/// A later commit fully replaces an earlier one.
async fn recommit_overwrites_previous<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let first = sample_state();
    store.commit(&first).await.map_err(|e| format!("commit: {e}"))?;

    let mut second = first;
    second.last_report_millis += MILLIS_STEP;
    store
        .commit(&second)
        .await
        .map_err(|e| format!("recommit: {e}"))?;

    let loaded = store.load().await.map_err(|e| format!("load: {e}"))?;
    if loaded.last_report_millis != first.last_report_millis + MILLIS_STEP {
        return Err(format!("stale read after recommit: {loaded:?}"));
    }
    Ok(())
}

const MILLIS_STEP: i64 = 86_400_000;
