use super::error::SettingsResult;
use super::fetcher::SettingsFetcher;
use super::persistence;
use super::prompt::{UPDATE_PROMPT_BODY, UPDATE_PROMPT_TITLE, UpdateInstaller, UpdatePrompt};
use crate::state::{SettingsChange, SettingsStore};
use std::sync::Arc;

/// What a successful remote sync did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote document equals the live one; nothing written.
    AlreadyInSync,

    /// Remote document replaced the live one and was written to disk.
    Adopted {
        /// Release date changed, so the user was asked to update.
        forced_update: bool,
        /// The user answered yes to the update prompt.
        update_accepted: bool,
    },
}

/// Fetches the authoritative settings document and reconciles the store with it.
///
/// The fetch, parse and validation run without holding the store lock; the
/// compare, ingest and write run under a single write lock; the user prompt
/// runs after the lock is released.
pub struct RemoteSyncAgent {
    fetcher: Arc<dyn SettingsFetcher>,
    prompt: Arc<dyn UpdatePrompt>,
    installer: Arc<dyn UpdateInstaller>,
}

impl RemoteSyncAgent {
    pub fn new(
        fetcher: Arc<dyn SettingsFetcher>,
        prompt: Arc<dyn UpdatePrompt>,
        installer: Arc<dyn UpdateInstaller>,
    ) -> Self {
        Self {
            fetcher,
            prompt,
            installer,
        }
    }

    /// Sync `store` with the document at `url`.
    ///
    /// Never fails: every error is logged once and reported as `false`.
    pub fn sync_from_server(&self, store: &SettingsStore, url: &str) -> bool {
        self.try_sync(store, url).is_some()
    }

    /// Like [`sync`](Self::sync), but logs the error and returns `None`.
    pub fn try_sync(&self, store: &SettingsStore, url: &str) -> Option<SyncOutcome> {
        match self.sync(store, url) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!("Error updating settings from server: {}", e);
                None
            }
        }
    }

    /// Sync `store` with the document at `url`, reporting what happened.
    pub fn sync(&self, store: &SettingsStore, url: &str) -> SettingsResult<SyncOutcome> {
        let text = self.fetcher.fetch(url)?;
        let remote = persistence::decode(persistence::parse(&text)?)?;

        let forced_update = store.with_state_mut(|state| -> SettingsResult<Option<bool>> {
            if state.document == remote {
                return Ok(None);
            }

            let forced_update = state.document.latest_release_date != remote.latest_release_date;

            persistence::save_document(&state.settings_file, &remote)?;
            state.populate(remote.clone());
            state.mark_persisted(remote);

            Ok(Some(forced_update))
        })?;

        let Some(forced_update) = forced_update else {
            tracing::debug!("Remote settings already in sync");
            return Ok(SyncOutcome::AlreadyInSync);
        };

        tracing::info!("Settings updated from server.");
        store.emit(SettingsChange::RemoteAdopted { forced_update });

        let update_accepted =
            forced_update && self.prompt.confirm(UPDATE_PROMPT_TITLE, UPDATE_PROMPT_BODY);
        if update_accepted {
            self.installer.install();
        }

        Ok(SyncOutcome::Adopted {
            forced_update,
            update_accepted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::SettingsError;
    use crate::services::fetcher::MockSettingsFetcher;
    use crate::services::prompt::{MockUpdateInstaller, MockUpdatePrompt};
    use camino::Utf8PathBuf;
    use mockall::predicate::eq;
    use serde_json::json;
    use tempfile::TempDir;

    const URL: &str = "https://example.invalid/settings.json";

    fn remote_text(date: &str, block_list: &[&str]) -> String {
        json!({
            "Latest Release Date": date,
            "Block List": block_list,
            "Zip Reader": {},
            "Developer": {},
            "Cef Offsets": {}
        })
        .to_string()
    }

    fn store_with(date: &str, block_list: &[&str]) -> (SettingsStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("settings.json")).unwrap();
        let store = SettingsStore::new(path);
        store.update(|doc| {
            doc.latest_release_date = date.to_string();
            doc.block_list = block_list.iter().map(|s| s.to_string()).collect();
        });
        (store, temp_dir)
    }

    fn agent(
        fetcher: MockSettingsFetcher,
        prompt: MockUpdatePrompt,
        installer: MockUpdateInstaller,
    ) -> RemoteSyncAgent {
        RemoteSyncAgent::new(Arc::new(fetcher), Arc::new(prompt), Arc::new(installer))
    }

    #[test]
    fn test_identical_document_is_noop() {
        let (store, temp_dir) = store_with("2024-01-01", &["/a/"]);
        let mut fetcher = MockSettingsFetcher::new();
        fetcher
            .expect_fetch()
            .with(eq(URL))
            .times(1)
            .returning(|_| Ok(remote_text("2024-01-01", &["/a/"])));
        let mut prompt = MockUpdatePrompt::new();
        prompt.expect_confirm().never();

        let agent = agent(fetcher, prompt, MockUpdateInstaller::new());
        assert_eq!(agent.sync(&store, URL).unwrap(), SyncOutcome::AlreadyInSync);
        assert!(!temp_dir.path().join("settings.json").exists());
    }

    #[test]
    fn test_release_date_change_prompts_and_installs_on_yes() {
        let (store, _temp_dir) = store_with("2024-01-01", &["/a/"]);
        let mut fetcher = MockSettingsFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(remote_text("2024-02-01", &["/a/", "/b/"])));
        let mut prompt = MockUpdatePrompt::new();
        prompt
            .expect_confirm()
            .with(eq(UPDATE_PROMPT_TITLE), eq(UPDATE_PROMPT_BODY))
            .times(1)
            .return_const(true);
        let mut installer = MockUpdateInstaller::new();
        installer.expect_install().times(1).return_const(());

        let agent = agent(fetcher, prompt, installer);
        let outcome = agent.sync(&store, URL).unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::Adopted {
                forced_update: true,
                update_accepted: true
            }
        );
        assert_eq!(store.latest_release_date(), "2024-02-01");
        assert_eq!(store.block_list(), vec!["/a/", "/b/"]);
    }

    #[test]
    fn test_declined_update_skips_installer() {
        let (store, _temp_dir) = store_with("2024-01-01", &["/a/"]);
        let mut fetcher = MockSettingsFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(remote_text("2024-03-01", &["/a/"])));
        let mut prompt = MockUpdatePrompt::new();
        prompt.expect_confirm().times(1).return_const(false);
        let mut installer = MockUpdateInstaller::new();
        installer.expect_install().never();

        let agent = agent(fetcher, prompt, installer);
        assert!(agent.sync_from_server(&store, URL));
        assert_eq!(store.latest_release_date(), "2024-03-01");
    }

    #[test]
    fn test_same_date_other_changes_adopted_silently() {
        let (store, _temp_dir) = store_with("2024-01-01", &["/a/"]);
        let mut fetcher = MockSettingsFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(remote_text("2024-01-01", &["/b/", "/a/"])));
        let mut prompt = MockUpdatePrompt::new();
        prompt.expect_confirm().never();

        let agent = agent(fetcher, prompt, MockUpdateInstaller::new());
        assert_eq!(
            agent.sync(&store, URL).unwrap(),
            SyncOutcome::Adopted {
                forced_update: false,
                update_accepted: false
            }
        );
        assert_eq!(store.block_list(), vec!["/b/", "/a/"]);
    }

    #[test]
    fn test_network_failure_leaves_document_unchanged() {
        let (store, _temp_dir) = store_with("2024-01-01", &["/a/"]);
        let before = store.document();
        let mut fetcher = MockSettingsFetcher::new();
        fetcher.expect_fetch().returning(|url| {
            Err(SettingsError::Network {
                url: url.to_string(),
                reason: "request timed out".to_string(),
            })
        });

        let agent = agent(fetcher, MockUpdatePrompt::new(), MockUpdateInstaller::new());
        assert!(!agent.sync_from_server(&store, URL));
        assert_eq!(store.document(), before);
    }

    #[test]
    fn test_invalid_remote_document_rejected() {
        let (store, _temp_dir) = store_with("2024-01-01", &["/a/"]);
        let mut fetcher = MockSettingsFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(json!({ "Latest Release Date": "2024-02-01" }).to_string()));

        let agent = agent(fetcher, MockUpdatePrompt::new(), MockUpdateInstaller::new());
        let err = agent.sync(&store, URL).unwrap_err();
        assert_eq!(err.field(), Some("Block List"));
        assert_eq!(store.latest_release_date(), "2024-01-01");
    }

    #[test]
    fn test_write_failure_keeps_live_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("missing").join("s.json")).unwrap();
        let store = SettingsStore::new(path);
        let before = store.document();

        let mut fetcher = MockSettingsFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|_| Ok(remote_text("2024-02-01", &["/a/"])));
        let mut prompt = MockUpdatePrompt::new();
        prompt.expect_confirm().never();

        let agent = agent(fetcher, prompt, MockUpdateInstaller::new());
        assert!(!agent.sync_from_server(&store, URL));
        assert_eq!(store.document(), before);
    }
}
