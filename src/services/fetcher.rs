use super::error::{SettingsError, SettingsResult};
use std::time::Duration;

/// Source of remote settings text (`HttpGet(url) -> text | Fail`).
#[cfg_attr(test, mockall::automock)]
pub trait SettingsFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> SettingsResult<String>;
}

/// Blocking HTTP fetcher with a per-request timeout.
///
/// Must be used from a plain thread, never from inside an async task.
pub struct HttpSettingsFetcher {
    client: reqwest::blocking::Client,
}

impl HttpSettingsFetcher {
    pub fn new(timeout: Duration) -> SettingsResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SettingsError::Network {
                url: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client })
    }
}

impl SettingsFetcher for HttpSettingsFetcher {
    fn fetch(&self, url: &str) -> SettingsResult<String> {
        let network_error = |e: reqwest::Error| SettingsError::Network {
            url: url.to_string(),
            reason: if e.is_timeout() {
                "request timed out".to_string()
            } else {
                e.to_string()
            },
        };

        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(network_error)?;

        tracing::debug!(status = %response.status(), "Fetched remote settings from {}", url);
        response.text().map_err(network_error)
    }
}
