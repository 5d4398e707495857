//! The owned context shared by the main flow and the background synchronizer.
//!
//! One `SyncContext` is built at startup and passed around as
//! `Arc<SyncContext>`. Tests build as many isolated contexts as they need.

use crate::config::{StaticConfig, SyncOptions};
use crate::logging::ErrorProbe;
use crate::metrics::Metrics;
use crate::services::{
    DialogPrompt, HttpSettingsFetcher, LoggingInstaller, RemoteSyncAgent, SettingsResult,
};
use crate::state::SettingsStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct SyncContext {
    pub static_config: StaticConfig,
    pub options: SyncOptions,
    pub store: SettingsStore,
    pub agent: RemoteSyncAgent,
    pub error_probe: Arc<dyn ErrorProbe>,
    pub metrics: Metrics,

    /// Set once the one-shot remote sync has been attempted, whatever its result.
    remote_sync_attempted: AtomicBool,
}

impl SyncContext {
    /// Build a context around an explicit agent and error probe.
    ///
    /// The store points at `options.settings_file`; nothing is read yet.
    pub fn new(
        static_config: StaticConfig,
        options: SyncOptions,
        agent: RemoteSyncAgent,
        error_probe: Arc<dyn ErrorProbe>,
    ) -> Self {
        let store =
            SettingsStore::new(&options.settings_file).with_policy(options.block_list_policy);

        Self {
            static_config,
            options,
            store,
            agent,
            error_probe,
            metrics: Metrics::new(),
            remote_sync_attempted: AtomicBool::new(false),
        }
    }

    /// Context wired to the real HTTP client, native dialog and stub installer.
    pub fn production(
        static_config: StaticConfig,
        options: SyncOptions,
        error_probe: Arc<dyn ErrorProbe>,
    ) -> SettingsResult<Self> {
        let fetcher = HttpSettingsFetcher::new(options.request_timeout())?;
        let agent = RemoteSyncAgent::new(
            Arc::new(fetcher),
            Arc::new(DialogPrompt),
            Arc::new(LoggingInstaller),
        );
        Ok(Self::new(static_config, options, agent, error_probe))
    }

    /// Load the settings file, or write the default document if it cannot be
    /// loaded. Returns whether the store ended up backed by a file.
    pub fn initialize(&self) -> bool {
        if self.store.load_from_disk() {
            return true;
        }

        if self.store.save_to_disk() {
            tracing::info!("Wrote default settings to {}", self.store.settings_file());
            true
        } else {
            tracing::error!("Failed to open settings file: {}", self.store.settings_file());
            false
        }
    }

    pub fn remote_sync_attempted(&self) -> bool {
        self.remote_sync_attempted.load(Ordering::SeqCst)
    }

    /// Claim the one-shot remote sync. Only the first caller gets `true`.
    pub fn claim_remote_sync(&self) -> bool {
        !self.remote_sync_attempted.swap(true, Ordering::SeqCst)
    }

    /// Static flag plus logged-error condition both hold.
    pub fn remote_gate_open(&self) -> bool {
        self.static_config.enable_auto_update() && self.error_probe.has_logged_error()
    }
}
