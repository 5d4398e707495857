use super::settings::{Architecture, DerivedOffsets, SettingsDocument};
use camino::Utf8PathBuf;

/// Everything the settings store guards behind its lock.
///
/// # Thread Safety
///
/// `SyncState` is wrapped in `Arc<RwLock<SyncState>>` by
/// [`crate::state::SettingsStore`]. Never hold a reference across a network
/// call or a user prompt; take the lock, do the read-then-write sequence,
/// release.
#[derive(Clone, Debug)]
pub struct SyncState {
    /// Live document the rest of the process reads and mutates.
    pub document: SettingsDocument,

    /// What was last written to (or read from) the settings file.
    /// `None` until the first successful load or save.
    pub persisted: Option<SettingsDocument>,

    /// Hook offsets, derived once from `document.platform_offsets`.
    pub derived_offsets: Option<DerivedOffsets>,

    /// Canonical settings file path.
    pub settings_file: Utf8PathBuf,

    /// Set by the last drift check: the live document differs from disk.
    pub dirty: bool,

    pub architecture: Architecture,
}

impl SyncState {
    pub fn new(settings_file: Utf8PathBuf) -> Self {
        Self {
            document: SettingsDocument::default(),
            persisted: None,
            derived_offsets: None,
            settings_file,
            dirty: false,
            architecture: Architecture::current(),
        }
    }

    /// Live document differs from what is on disk.
    pub fn has_drifted(&self) -> bool {
        self.persisted.as_ref() != Some(&self.document)
    }

    /// Replace the live document and run derive-if-absent for the offsets.
    pub fn populate(&mut self, document: SettingsDocument) {
        self.document = document;
        self.derive_offsets_if_absent();
    }

    /// Record `document` as the on-disk snapshot.
    pub fn mark_persisted(&mut self, document: SettingsDocument) {
        self.persisted = Some(document);
        self.dirty = false;
    }

    /// Fill the offset cache unless a complete set is already cached.
    ///
    /// Once complete the cache is never refreshed, even if the offset table
    /// changes later.
    pub fn derive_offsets_if_absent(&mut self) -> bool {
        if self.derived_offsets.is_some_and(|o| o.is_complete()) {
            return false;
        }

        match self.document.offsets_for(self.architecture) {
            Some(offsets) => {
                tracing::debug!(
                    arch = self.architecture.key(),
                    ?offsets,
                    "Derived hook offsets from settings"
                );
                self.derived_offsets = Some(offsets);
                true
            }
            None => {
                tracing::warn!(
                    "No complete '{}' offsets in settings; hook offsets left unset",
                    self.architecture.key()
                );
                false
            }
        }
    }
}
