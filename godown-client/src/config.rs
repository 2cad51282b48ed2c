//! Client configuration

use std::time::Duration;

use crate::error::ClientResult;
use crate::http::NetworkHttpClient;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default employee feed poll period in seconds
pub const DEFAULT_EMPLOYEE_POLL_SECS: u64 = 5;

/// Refresh cadence of the analytics pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Employee feed period (first fetch is immediate)
    pub employee_poll: Duration,
    /// Logistics feeds period; `None` fetches them once on start
    pub logistics_refresh: Option<Duration>,
}

impl Default for PollSchedule {
    fn default() -> Self {
        Self {
            employee_poll: Duration::from_secs(DEFAULT_EMPLOYEE_POLL_SECS),
            logistics_refresh: None,
        }
    }
}

/// Client configuration for the inventory API
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | GODOWN_API_URL | http://localhost:8080 | API base URL |
/// | REQUEST_TIMEOUT_SECS | 30 | Per-request timeout |
/// | EMPLOYEE_POLL_SECS | 5 | Employee feed poll period |
/// | LOGISTICS_REFRESH_SECS | unset | Periodic logistics refresh, unset = once |
/// | LOG_LEVEL | info | Log level |
/// | LOG_DIR | unset | Directory for daily rolling log files |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:8080")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Poll cadence
    pub schedule: PollSchedule,

    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,

    /// Log directory, stdout only when `None`
    pub log_dir: Option<String>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT_SECS,
            schedule: PollSchedule::default(),
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// Load configuration from the process environment
    ///
    /// Call `dotenv::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Unset or unparsable values fall back to defaults. Zero periods are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|v| *v > 0)
        };

        let mut config = Self::new(lookup("GODOWN_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()));
        if let Some(timeout) = secs("REQUEST_TIMEOUT_SECS") {
            config.timeout = timeout;
        }
        if let Some(poll) = secs("EMPLOYEE_POLL_SECS") {
            config.schedule.employee_poll = Duration::from_secs(poll);
        }
        config.schedule.logistics_refresh = secs("LOGISTICS_REFRESH_SECS").map(Duration::from_secs);
        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }
        config.log_dir = lookup("LOG_DIR").filter(|d| !d.is_empty());
        config
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the employee feed poll period
    pub fn with_employee_poll(mut self, period: Duration) -> Self {
        self.schedule.employee_poll = period;
        self
    }

    /// Refresh the logistics feeds periodically instead of once
    pub fn with_logistics_refresh(mut self, period: Duration) -> Self {
        self.schedule.logistics_refresh = Some(period);
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
