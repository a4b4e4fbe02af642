//! Client configuration: the single backend origin, the request timeout and
//! where the bearer token is persisted. Values come from CLI flags or their
//! `EMS_*` environment counterparts. Configuration values are public; do not
//! store secrets here.

use std::{env, path::PathBuf, time::Duration};
use url::Url;

/// Upper bound for any API request before it fails as a timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Name of the file holding the bearer token inside `EMS_HOME`.
pub const TOKEN_FILE_NAME: &str = "token";

/// Settings the API client needs to reach the backend.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base_url: Url,
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Parses and checks the API base URL; only `http` and `https` origins are accepted.
///
/// # Errors
/// Returns a message suitable for CLI output if the value is empty, malformed or uses another scheme.
pub fn parse_base_url(value: &str) -> Result<Url, String> {
    let trimmed = normalize_value(value).ok_or_else(|| "API base URL is empty".to_string())?;
    let url = Url::parse(&trimmed).map_err(|err| format!("invalid API base URL: {err}"))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(format!("unsupported API URL scheme: {scheme}")),
    }

    if url.host_str().is_none() {
        return Err("API base URL has no host".to_string());
    }

    Ok(url)
}

/// Returns the EMS home directory.
///
/// Checks `EMS_HOME` first, falls back to `~/.config/ems`.
#[must_use]
pub fn ems_home() -> Option<PathBuf> {
    if let Some(home) = env::var("EMS_HOME").ok().and_then(|v| normalize_value(&v)) {
        return Some(PathBuf::from(home));
    }

    dirs::home_dir().map(|h| h.join(".config").join("ems"))
}

/// Default location of the persisted bearer token.
#[must_use]
pub fn default_token_file() -> Option<PathBuf> {
    ems_home().map(|home| home.join(TOKEN_FILE_NAME))
}

/// Trims a value and treats blank input as absent.
#[must_use]
pub fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
