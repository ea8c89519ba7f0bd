//! Frontend configuration module
//!
//! Settings are baked in at build time. Each value can be overridden through
//! a `CIVIC_*` environment variable visible to the compiler.

use std::time::Duration;
use tracing::Level;

const DEFAULT_API_BASE_URL: &str = "/api";
const DEFAULT_STATUS_PATH: &str = "system/status";
const DEFAULT_STATUS_FALLBACK_PATH: &str = "/api/system/status";
const DEFAULT_STATUS_TIMEOUT_MS: u64 = 8_000;
const DEFAULT_SETUP_CACHE_KEY: &str = "civic.setupStatus";
const DEFAULT_SETUP_CACHE_TTL_MS: u64 = 300_000;

/// Frontend configuration for API access, setup gating and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontendConfig {
    /// Base URL of the platform API; relative values resolve against the
    /// page origin.
    pub api_base_url: String,
    /// Status endpoints tried in order. Relative paths hang off the API
    /// base, absolute paths off the origin.
    pub status_paths: Vec<String>,
    /// Upper bound for each status request.
    pub status_timeout: Duration,
    /// `sessionStorage` key of the setup status cache.
    pub setup_cache_key: String,
    pub setup_cache_ttl: Duration,
    pub log_level: Level,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("CIVIC_API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            status_paths: vec![
                DEFAULT_STATUS_PATH.to_string(),
                DEFAULT_STATUS_FALLBACK_PATH.to_string(),
            ],
            status_timeout: parse_millis(
                option_env!("CIVIC_STATUS_TIMEOUT_MS"),
                DEFAULT_STATUS_TIMEOUT_MS,
            ),
            setup_cache_key: DEFAULT_SETUP_CACHE_KEY.to_string(),
            setup_cache_ttl: Duration::from_millis(DEFAULT_SETUP_CACHE_TTL_MS),
            log_level: parse_level(option_env!("CIVIC_LOG_LEVEL"), Level::INFO),
        }
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn parse_millis(raw: Option<&str>, default_ms: u64) -> Duration {
    let millis = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|millis| *millis > 0)
        .unwrap_or(default_ms);
    Duration::from_millis(millis)
}

fn parse_level(raw: Option<&str>, default: Level) -> Level {
    raw.and_then(|value| value.trim().parse::<Level>().ok())
        .unwrap_or(default)
}
