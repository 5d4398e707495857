use anyhow::{Context, Result};
use camino::Utf8PathBuf;
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Prefix of environment variables overriding [`SyncOptions`] fields,
/// e.g. `SPOTSYNC_POLL_INTERVAL_SECS=1`.
pub const ENV_PREFIX: &str = "SPOTSYNC";

pub const DEFAULT_SETTINGS_FILE: &str = "blockthespot_settings.json";
pub const DEFAULT_STATIC_CONFIG_FILE: &str = "config.ini";
pub const DEFAULT_REMOTE_URL: &str =
    "https://raw.githubusercontent.com/mrpond/BlockTheSpot/master/blockthespot_settings.json";

/// How `save_to_disk` treats the block list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockListPolicy {
    /// Persist whatever block list the document carries.
    #[default]
    Preserve,
    /// Overwrite the block list with the built-in one before every save.
    EnforceBuiltin,
}

/// Runtime knobs for the settings subsystem.
///
/// Built-in defaults are layered under `SPOTSYNC_*` environment variables
/// by [`SyncOptions::load`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncOptions {
    pub settings_file: Utf8PathBuf,
    pub static_config_file: Utf8PathBuf,
    pub remote_url: String,
    pub poll_interval_secs: u64,
    pub poll_window_secs: u64,
    pub request_timeout_secs: u64,
    pub block_list_policy: BlockListPolicy,
    pub log_dir: String,
    pub debug_mode: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            settings_file: Utf8PathBuf::from(DEFAULT_SETTINGS_FILE),
            static_config_file: Utf8PathBuf::from(DEFAULT_STATIC_CONFIG_FILE),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            poll_interval_secs: 20,
            poll_window_secs: 60 * 60,
            request_timeout_secs: 30,
            block_list_policy: BlockListPolicy::Preserve,
            log_dir: "logs".to_string(),
            debug_mode: false,
        }
    }
}

impl SyncOptions {
    /// Defaults overridden by `SPOTSYNC_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_with(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
    }

    /// Defaults overridden by an explicit environment source.
    pub fn load_with(environment: Environment) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to build default sync options")?;

        let options: Self = Config::builder()
            .add_source(defaults)
            .add_source(environment)
            .build()
            .context("Failed to layer sync options")?
            .try_deserialize()
            .context("Failed to deserialize sync options")?;

        if options.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be greater than zero");
        }

        tracing::debug!(?options, "Sync options loaded");
        Ok(options)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn poll_window(&self) -> Duration {
        Duration::from_secs(self.poll_window_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
