//! Usage ping reporting for Beacon.
//!
//! `PingQuery` carries everything a single combined report needs; the
//! `Reporter` trait performs the one outbound GET. Failures are explicit
//! (`SendError` distinguishes the cause) but never fatal to callers --
//! the orchestrator absorbs every variant as "report not sent".

mod http;
mod query;
mod reporter;

pub use http::HttpReporter;
pub use query::{PingQuery, ReportParams, DEVELOPER_BUILD};
pub use reporter::{Reporter, SendError, StaticReporter};
