//! The update orchestrator.
//!
//! `UsageUpdater` serializes invocations behind a single-flight guard,
//! asks the cadence engine what is due, resolves the installation context,
//! sends at most one combined ping, and commits new watermarks only after
//! a confirmed success. Every failure is absorbed into an `UpdateOutcome`;
//! nothing here is ever an error to the caller -- this is best-effort
//! background telemetry.

mod context;
mod orchestrator;

pub use context::{resolve_week_of_installation, REFERRAL_DEFAULT, UPDATE_INSTALL_WEEK};
pub use orchestrator::{UpdateOutcome, UpdaterConfig, UsageUpdater};
