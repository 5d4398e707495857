// Settings store module
//
// This module provides the SettingsStore which wraps SyncState with thread-safe access
// using Arc<RwLock<T>> and emits change events for interested listeners.

use crate::config::BlockListPolicy;
use crate::models::{DerivedOffsets, SettingsDocument, SyncState, builtin_block_list};
use crate::services::persistence;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Map, Value};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Change events emitted when the settings state moves.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingsChange {
    /// A document was read from the settings file
    DocumentLoaded,

    /// The live document was written to the settings file
    DocumentPersisted,

    /// An in-memory edit that bypassed `save_to_disk` was written out by the
    /// background drift check
    DriftReconciled,

    /// A remote document replaced the live one
    RemoteAdopted { forced_update: bool },
}

/// Result of a single drift check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftOutcome {
    InSync,
    Persisted,
    WriteFailed,
}

/// Thread-safe owner of the settings document.
///
/// This is the only holder of [`SyncState`]:
/// - [`read()`](Self::read) runs a closure under the read lock
/// - [`update()`](Self::update) mutates the live document under the write lock
/// - [`load_from_disk()`](Self::load_from_disk), [`save_to_disk()`](Self::save_to_disk)
///   and [`reconcile_drift()`](Self::reconcile_drift) hold the write lock for the
///   whole read-then-write sequence
/// - [`subscribe()`](Self::subscribe) hands out [`SettingsChange`] receivers
///
/// Cloning is cheap and shares the same state.
#[derive(Clone)]
pub struct SettingsStore {
    state: Arc<RwLock<SyncState>>,
    policy: BlockListPolicy,
    change_tx: broadcast::Sender<SettingsChange>,
}

impl SettingsStore {
    /// Create a store for `settings_file`. Nothing is read or written yet.
    pub fn new<P: AsRef<Utf8Path>>(settings_file: P) -> Self {
        let (change_tx, _) = broadcast::channel(100);
        Self {
            state: Arc::new(RwLock::new(SyncState::new(
                settings_file.as_ref().to_path_buf(),
            ))),
            policy: BlockListPolicy::default(),
            change_tx,
        }
    }

    pub fn with_policy(mut self, policy: BlockListPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Point the store at a different settings file. No I/O.
    pub fn initialize<P: AsRef<Utf8Path>>(&self, settings_file: P) {
        self.write_state().settings_file = settings_file.as_ref().to_path_buf();
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SyncState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SyncState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Execute a function with read access to the state
    ///
    /// # Example
    /// ```ignore
    /// let blocked = store.read(|state| state.document.block_list.len());
    /// ```
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&SyncState) -> R,
    {
        let state = self.read_state();
        f(&state)
    }

    /// Mutate the live document in memory only.
    ///
    /// Nothing is written; the background drift check persists the edit on its
    /// next tick. Returns whether the document changed.
    pub fn update<F>(&self, update_fn: F) -> bool
    where
        F: FnOnce(&mut SettingsDocument),
    {
        let mut state = self.write_state();
        let before = state.document.clone();
        update_fn(&mut state.document);

        let changed = state.document != before;
        if changed {
            state.dirty = true;
        }
        changed
    }

    /// Run `f` with exclusive access to the full state.
    pub(crate) fn with_state_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SyncState) -> R,
    {
        let mut state = self.write_state();
        f(&mut state)
    }

    /// Subscribe to settings change events
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsChange> {
        self.change_tx.subscribe()
    }

    pub(crate) fn emit(&self, change: SettingsChange) {
        // Ignore send errors - it's OK if no one is listening
        let _ = self.change_tx.send(change);
    }

    /// Read, parse and validate the settings file into the live document.
    ///
    /// On failure the live document is left untouched and `false` is returned.
    pub fn load_from_disk(&self) -> bool {
        let mut state = self.write_state();
        let path = state.settings_file.clone();

        match persistence::load_document(&path) {
            Ok(document) => {
                state.populate(document.clone());
                state.mark_persisted(document);
                drop(state);

                tracing::info!("Loaded settings from {}", path);
                self.emit(SettingsChange::DocumentLoaded);
                true
            }
            Err(e) => {
                tracing::error!("Failed to load settings file {}: {}", path, e);
                false
            }
        }
    }

    /// Adopt an already-validated document as the live one. No disk access.
    pub fn load_from_document(&self, document: &SettingsDocument) -> bool {
        self.with_state_mut(|state| state.populate(document.clone()));
        true
    }

    /// Write the live document to the settings file.
    pub fn save_to_disk(&self) -> bool {
        let mut state = self.write_state();

        if self.policy == BlockListPolicy::EnforceBuiltin {
            state.document.block_list = builtin_block_list();
        }

        let path = state.settings_file.clone();
        match persistence::save_document(&path, &state.document) {
            Ok(()) => {
                let document = state.document.clone();
                state.mark_persisted(document);
                drop(state);

                tracing::debug!("Saved settings to {}", path);
                self.emit(SettingsChange::DocumentPersisted);
                true
            }
            Err(e) => {
                tracing::error!("Failed to save settings to file {}: {}", path, e);
                false
            }
        }
    }

    /// Compare the live document with the last persisted one and write it out
    /// if they differ.
    pub fn reconcile_drift(&self) -> DriftOutcome {
        let mut state = self.write_state();
        state.dirty = state.has_drifted();
        if !state.dirty {
            return DriftOutcome::InSync;
        }

        let path = state.settings_file.clone();
        match persistence::save_document(&path, &state.document) {
            Ok(()) => {
                let document = state.document.clone();
                state.mark_persisted(document);
                drop(state);

                tracing::info!("Persisted in-memory settings changes to {}", path);
                self.emit(SettingsChange::DriftReconciled);
                DriftOutcome::Persisted
            }
            Err(e) => {
                tracing::error!("Failed to open settings file {}: {}", path, e);
                DriftOutcome::WriteFailed
            }
        }
    }

    // Accessors over the current in-memory snapshot

    pub fn settings_file(&self) -> Utf8PathBuf {
        self.read(|s| s.settings_file.clone())
    }

    pub fn document(&self) -> SettingsDocument {
        self.read(|s| s.document.clone())
    }

    pub fn latest_release_date(&self) -> String {
        self.read(|s| s.document.latest_release_date.clone())
    }

    pub fn block_list(&self) -> Vec<String> {
        self.read(|s| s.document.block_list.clone())
    }

    pub fn zip_reader(&self) -> Map<String, Value> {
        self.read(|s| s.document.zip_reader.clone())
    }

    pub fn developer(&self) -> Map<String, Value> {
        self.read(|s| s.document.developer.clone())
    }

    pub fn platform_offsets(&self) -> Map<String, Value> {
        self.read(|s| s.document.platform_offsets.clone())
    }

    pub fn derived_offsets(&self) -> Option<DerivedOffsets> {
        self.read(|s| s.derived_offsets)
    }

    pub fn is_dirty(&self) -> bool {
        self.read(|s| s.dirty)
    }

    pub fn block_list_policy(&self) -> BlockListPolicy {
        self.policy
    }
}
