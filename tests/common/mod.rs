//! Shared fakes for integration tests.
#![allow(dead_code)]

use camino::Utf8PathBuf;
use serde_json::json;
use spotsync::logging::ErrorProbe;
use spotsync::services::{
    SettingsError, SettingsFetcher, SettingsResult, UpdateInstaller, UpdatePrompt,
};
use spotsync::{RemoteSyncAgent, StaticConfig, SyncContext, SyncOptions};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const URL: &str = "https://example.invalid/blockthespot_settings.json";

pub fn temp_settings_path() -> (TempDir, Utf8PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::try_from(temp_dir.path().join("blockthespot_settings.json")).unwrap();
    (temp_dir, path)
}

pub fn document_json(date: &str, block_list: &[&str]) -> String {
    json!({
        "Latest Release Date": date,
        "Block List": block_list,
        "Zip Reader": {
            "home-hpto.js": { "adsEnabled:!0": "adsEnabled:false" }
        },
        "Developer": {
            "x64": { "value": "01", "offset": 13 }
        },
        "Cef Offsets": {
            "x64": {
                "cef_request_t_get_url": 48,
                "cef_zip_reader_t_get_file_name": 72,
                "cef_zip_reader_t_read_file": 112
            },
            "x32": {
                "cef_request_t_get_url": 24,
                "cef_zip_reader_t_get_file_name": 36,
                "cef_zip_reader_t_read_file": 56
            }
        }
    })
    .to_string()
}

/// Serves queued responses, then network errors.
#[derive(Default)]
pub struct FakeFetcher {
    responses: Mutex<VecDeque<SettingsResult<String>>>,
    pub calls: AtomicUsize,
}

impl FakeFetcher {
    pub fn serving(body: String) -> Self {
        let fetcher = Self::default();
        fetcher.push(Ok(body));
        fetcher
    }

    pub fn timing_out() -> Self {
        Self::default()
    }

    pub fn push(&self, response: SettingsResult<String>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SettingsFetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> SettingsResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(SettingsError::Network {
                    url: url.to_string(),
                    reason: "request timed out".to_string(),
                })
            })
    }
}

/// Answers every prompt the same way and counts them.
pub struct RecordingPrompt {
    answer: bool,
    pub asked: AtomicUsize,
}

impl RecordingPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl UpdatePrompt for RecordingPrompt {
    fn confirm(&self, _title: &str, _body: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}

#[derive(Default)]
pub struct CountingInstaller {
    pub installs: AtomicUsize,
}

impl UpdateInstaller for CountingInstaller {
    fn install(&self) {
        self.installs.fetch_add(1, Ordering::SeqCst);
    }
}

/// Error probe the test flips by hand.
#[derive(Default)]
pub struct ManualProbe {
    pub error: AtomicBool,
}

impl ManualProbe {
    pub fn raised() -> Self {
        Self {
            error: AtomicBool::new(true),
        }
    }
}

impl ErrorProbe for ManualProbe {
    fn has_logged_error(&self) -> bool {
        self.error.load(Ordering::SeqCst)
    }
}

pub struct Harness {
    pub ctx: Arc<SyncContext>,
    pub fetcher: Arc<FakeFetcher>,
    pub prompt: Arc<RecordingPrompt>,
    pub installer: Arc<CountingInstaller>,
    pub probe: Arc<ManualProbe>,
    pub temp_dir: TempDir,
    pub settings_file: Utf8PathBuf,
}

/// Isolated context over a temp settings file.
pub fn harness(static_config: StaticConfig, fetcher: FakeFetcher, probe: ManualProbe) -> Harness {
    let (temp_dir, settings_file) = temp_settings_path();
    let options = SyncOptions {
        settings_file: settings_file.clone(),
        remote_url: URL.to_string(),
        ..SyncOptions::default()
    };

    let fetcher = Arc::new(fetcher);
    let prompt = Arc::new(RecordingPrompt::answering(false));
    let installer = Arc::new(CountingInstaller::default());
    let probe = Arc::new(probe);

    let agent = RemoteSyncAgent::new(fetcher.clone(), prompt.clone(), installer.clone());
    let ctx = Arc::new(SyncContext::new(static_config, options, agent, probe.clone()));

    Harness {
        ctx,
        fetcher,
        prompt,
        installer,
        probe,
        temp_dir,
        settings_file,
    }
}
