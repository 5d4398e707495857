//! Configuration inputs.
//!
//! - [`StaticConfig`]: feature flags from `config.ini`, read once and never written
//! - [`SyncOptions`]: runtime knobs (paths, remote URL, poll cadence) layered from
//!   defaults and `SPOTSYNC_*` environment variables

pub mod options;
pub mod static_config;

pub use options::{BlockListPolicy, SyncOptions};
pub use static_config::{StaticConfig, StaticFlag};
