use std::future::Future;

use beacon_core::WatermarkState;

use super::TestResult;
use crate::WatermarkStore;

pub(super) async fn run_field_tests<S, F, Fut>(factory: &F) -> Vec<TestResult>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    vec![
        TestResult::from_result(
            "fields",
            "week_of_installation_absent_on_fresh_store",
            week_of_installation_absent_on_fresh_store(factory).await,
        ),
        TestResult::from_result(
            "fields",
            "week_of_installation_persists_once_set",
            week_of_installation_persists_once_set(factory).await,
        ),
        TestResult::from_result(
            "fields",
            "watermark_commit_preserves_context_fields",
            watermark_commit_preserves_context_fields(factory).await,
        ),
        TestResult::from_result(
            "fields",
            "referral_absent_on_fresh_store",
            referral_absent_on_fresh_store(factory).await,
        ),
    ]
}

async fn week_of_installation_absent_on_fresh_store<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let week = store
        .week_of_installation()
        .await
        .map_err(|e| format!("week_of_installation: {e}"))?;
    if week.is_some() {
        return Err(format!("fresh store has a week marker: {week:?}"));
    }
    Ok(())
}

async fn week_of_installation_persists_once_set<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    store
        .set_week_of_installation("2026-08-24")
        .await
        .map_err(|e| format!("set: {e}"))?;
    let week = store
        .week_of_installation()
        .await
        .map_err(|e| format!("get: {e}"))?;
    if week.as_deref() != Some("2026-08-24") {
        return Err(format!("expected cached week, got {week:?}"));
    }
    Ok(())
}

/// Committing watermarks must not clobber the week marker or referral.
async fn watermark_commit_preserves_context_fields<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    store
        .set_week_of_installation("2026-08-24")
        .await
        .map_err(|e| format!("set: {e}"))?;

    let state = WatermarkState {
        last_report_millis: 1_756_200_000_000,
        last_weekly_report_millis: 1_756_200_000_000,
        last_report_month: 7,
        last_report_year: 2026,
    };
    store.commit(&state).await.map_err(|e| format!("commit: {e}"))?;

    let week = store
        .week_of_installation()
        .await
        .map_err(|e| format!("get: {e}"))?;
    if week.as_deref() != Some("2026-08-24") {
        return Err(format!("commit clobbered the week marker: {week:?}"));
    }
    Ok(())
}

async fn referral_absent_on_fresh_store<S, F, Fut>(factory: &F) -> Result<(), String>
where
    S: WatermarkStore,
    F: Fn() -> Fut,
    Fut: Future<Output = S>,
{
    let store = factory().await;
    let referral = store.referral().await.map_err(|e| format!("referral: {e}"))?;
    if referral.is_some() {
        return Err(format!("fresh store has a referral: {referral:?}"));
    }
    Ok(())
}
