//! HTTP reporter -- sends the usage ping over `ureq`.
//!
//! Uses `ureq` (sync) wrapped in `tokio::task::spawn_blocking` to avoid
//! blocking the async runtime. Transport configuration (timeouts, TLS)
//! is whatever the default agent provides; this layer adds no retry.

use async_trait::async_trait;

use crate::query::{PingQuery, ReportParams};
use crate::reporter::{Reporter, SendError};

/// Reporter that performs one GET against the configured endpoint.
///
/// Refuses `"Developer Build"` versions with zero network I/O, and treats
/// only HTTP 200 as success.
pub struct HttpReporter {
    params: ReportParams,
}

impl HttpReporter {
    pub fn new(params: ReportParams) -> Self {
        Self { params }
    }
}

#[async_trait]
impl Reporter for HttpReporter {
    async fn send(&self, query: &PingQuery) -> Result<(), SendError> {
        if query.is_developer_build() {
            return Err(SendError::DeveloperBuild);
        }

        let url = query.url(&self.params);

        tokio::task::spawn_blocking(move || {
            let agent = ureq::Agent::new_with_defaults();
            match agent.get(&url).call() {
                Ok(response) => {
                    let code = response.status().as_u16();
                    if code == 200 {
                        Ok(())
                    } else {
                        Err(SendError::Status { code })
                    }
                }
                Err(ureq::Error::StatusCode(code)) => Err(SendError::Status { code }),
                Err(ureq::Error::BadUri(uri)) => Err(SendError::MalformedUrl { message: uri }),
                Err(e) => Err(SendError::Io {
                    message: e.to_string(),
                }),
            }
        })
        .await
        .map_err(|e| SendError::Io {
            message: format!("task join error: {e}"),
        })?
    }
}
