//! Data models for the settings subsystem.
//!
//! - [`SettingsDocument`]: the canonical settings tree shared by the local cache
//!   file and the remote source
//! - [`DerivedOffsets`]: hook offsets extracted once from the per-architecture
//!   offset table
//! - [`SyncState`]: everything the [`SettingsStore`](crate::state::SettingsStore)
//!   guards behind its lock
//!
//! # Architecture Note
//!
//! The models are plain data:
//! - **Serializable**: `SettingsDocument` derives `Serialize`/`Deserialize` with
//!   the on-disk key names
//! - **Cloneable**: `SyncState` is wrapped in `Arc<RwLock<>>` by the store for
//!   thread-safe access
//! - **Deep equality**: drift and remote comparisons use `PartialEq`

pub mod settings;
pub mod sync_state;

pub use settings::{
    Architecture, BUILTIN_BLOCK_LIST, DerivedOffsets, KEY_BLOCK_LIST, KEY_DEVELOPER,
    KEY_LATEST_RELEASE_DATE, KEY_PLATFORM_OFFSETS, KEY_ZIP_READER, SettingsDocument,
    builtin_block_list,
};
pub use sync_state::SyncState;
