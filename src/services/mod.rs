//! Services module - persistence, remote sync and the background loop.
//!
//! # Components
//!
//! - [`persistence`]: Reads, writes, parses and validates the settings file
//!   (pretty-printed JSON with five required fields)
//! - [`RemoteSyncAgent`]: Fetches the authoritative document, compares it with the
//!   live one, adopts it and asks the user about a new release when the release
//!   date moved
//! - [`BackgroundSynchronizer`]: Bounded poll loop on a dedicated thread that
//!   persists in-memory drift and fires the remote sync once per context
//! - [`SettingsFetcher`], [`UpdatePrompt`], [`UpdateInstaller`]: Seams for the HTTP
//!   client, the native yes/no dialog and the (stubbed) installer
//!
//! # Error Handling
//!
//! Internal functions return [`SettingsResult`]. The boolean entry points
//! (`sync_from_server`, store load/save) log a diagnostic naming the file, field
//! or URL and return `false`; nothing propagates to the caller as a panic.
//!
//! # Usage Example
//!
//! ```ignore
//! use spotsync::services::BackgroundSynchronizer;
//!
//! let ctx = Arc::new(SyncContext::production(static_config, options, probe)?);
//! ctx.initialize();
//! let handle = BackgroundSynchronizer::new(Arc::clone(&ctx)).spawn()?;
//! ```

pub mod error;
pub mod fetcher;
pub mod persistence;
pub mod prompt;
pub mod remote_sync;
pub mod synchronizer;

pub use error::{SettingsError, SettingsResult};
pub use fetcher::{HttpSettingsFetcher, SettingsFetcher};
pub use prompt::{DialogPrompt, LoggingInstaller, UpdateInstaller, UpdatePrompt};
pub use remote_sync::{RemoteSyncAgent, SyncOutcome};
pub use synchronizer::{BackgroundSynchronizer, SyncReport, TickReport};
