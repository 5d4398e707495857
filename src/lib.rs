// spotsync - Self-updating persisted settings for BlockTheSpot
//
// This is the library crate containing the settings store, persistence, remote sync
// and background synchronizer. The binary crate (main.rs) wires them together.

pub mod config;
pub mod context;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::{BlockListPolicy, StaticConfig, StaticFlag, SyncOptions};
pub use context::SyncContext;
pub use logging::{ErrorProbe, ErrorTracker};
pub use models::{DerivedOffsets, SettingsDocument, SyncState};
pub use services::{BackgroundSynchronizer, RemoteSyncAgent, SettingsError, SyncOutcome};
pub use state::{DriftOutcome, SettingsChange, SettingsStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
