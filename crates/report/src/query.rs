/// Version sentinel for non-release builds. A ping carrying this version
/// is refused before any network I/O.
pub const DEVELOPER_BUILD: &str = "Developer Build";

/// Static parameters of the telemetry endpoint.
#[derive(Debug, Clone)]
pub struct ReportParams {
    /// Base URL of the usage endpoint, without a query string.
    pub endpoint: String,
    /// Fixed platform identifier (e.g. "android").
    pub platform: String,
    /// Fixed release channel identifier (e.g. "stable").
    pub channel: String,
}

/// One combined usage ping, fully determined before the send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingQuery {
    pub daily: bool,
    pub weekly: bool,
    pub monthly: bool,
    pub first_run: bool,
    /// App version string, verbatim. Escaping happens at URL build time.
    pub version: String,
    /// Week-of-installation marker, `YYYY-MM-DD`.
    pub week_of_installation: String,
    /// Referral code, `"others"` when none was recorded.
    pub referral: String,
}

impl PingQuery {
    /// True for the non-release version sentinel.
    pub fn is_developer_build(&self) -> bool {
        self.version == DEVELOPER_BUILD
    }

    /// Render the fixed-shape request URL.
    ///
    /// Spaces in the version become the literal `%20`; no other escaping
    /// is applied, matching the wire format the endpoint expects.
    pub fn url(&self, params: &ReportParams) -> String {
        let version = self.version.replace(' ', "%20");
        format!(
            "{}?daily={}&weekly={}&monthly={}&platform={}&version={}&first={}&channel={}&woi={}&ref={}",
            params.endpoint,
            self.daily,
            self.weekly,
            self.monthly,
            params.platform,
            version,
            self.first_run,
            params.channel,
            self.week_of_installation,
            self.referral,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ReportParams {
        ReportParams {
            endpoint: "https://pings.example.com/1/usage".to_string(),
            platform: "android".to_string(),
            channel: "stable".to_string(),
        }
    }

    fn query() -> PingQuery {
        PingQuery {
            daily: true,
            weekly: false,
            monthly: true,
            first_run: false,
            version: "1.0.42".to_string(),
            week_of_installation: "2026-08-24".to_string(),
            referral: "others".to_string(),
        }
    }

    #[test]
    fn url_has_the_fixed_shape() {
        assert_eq!(
            query().url(&params()),
            "https://pings.example.com/1/usage?daily=true&weekly=false&monthly=true\
             &platform=android&version=1.0.42&first=false&channel=stable\
             &woi=2026-08-24&ref=others"
        );
    }

    #[test]
    fn version_spaces_become_literal_percent_20() {
        let mut q = query();
        q.version = "1.0 beta 2".to_string();
        let url = q.url(&params());
        assert!(url.contains("version=1.0%20beta%202"));
        assert!(!url.contains("version=1.0 "));
    }

    #[test]
    fn developer_build_sentinel_is_exact() {
        let mut q = query();
        q.version = DEVELOPER_BUILD.to_string();
        assert!(q.is_developer_build());
        q.version = "Developer Build 2".to_string();
        assert!(!q.is_developer_build());
    }
}
