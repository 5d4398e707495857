use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON key of the release date field.
pub const KEY_LATEST_RELEASE_DATE: &str = "Latest Release Date";
/// JSON key of the URL block list.
pub const KEY_BLOCK_LIST: &str = "Block List";
/// JSON key of the zip reader section.
pub const KEY_ZIP_READER: &str = "Zip Reader";
/// JSON key of the developer section.
pub const KEY_DEVELOPER: &str = "Developer";
/// JSON key of the per-architecture offset table.
pub const KEY_PLATFORM_OFFSETS: &str = "Cef Offsets";

/// Offset names looked up inside `Cef Offsets[<arch>]`.
pub const OFFSET_REQUEST_GET_URL: &str = "cef_request_t_get_url";
pub const OFFSET_ZIP_READER_GET_FILE_NAME: &str = "cef_zip_reader_t_get_file_name";
pub const OFFSET_ZIP_READER_READ_FILE: &str = "cef_zip_reader_t_read_file";

/// Block list written when the store seeds a fresh document, and re-asserted
/// on every save under [`BlockListPolicy::EnforceBuiltin`](crate::config::BlockListPolicy).
pub const BUILTIN_BLOCK_LIST: [&str; 3] = ["/ads/", "/ad-logic/", "/gabo-receiver-service/"];

/// The canonical settings document shared by the local cache file and the
/// remote source.
///
/// Field order here is the order written to disk. Equality is deep and
/// order-sensitive for `block_list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    #[serde(rename = "Latest Release Date")]
    pub latest_release_date: String,

    #[serde(rename = "Block List")]
    pub block_list: Vec<String>,

    #[serde(rename = "Zip Reader")]
    pub zip_reader: Map<String, Value>,

    #[serde(rename = "Developer")]
    pub developer: Map<String, Value>,

    #[serde(rename = "Cef Offsets")]
    pub platform_offsets: Map<String, Value>,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            latest_release_date: String::new(),
            block_list: builtin_block_list(),
            zip_reader: Map::new(),
            developer: Map::new(),
            platform_offsets: Map::new(),
        }
    }
}

impl SettingsDocument {
    /// Look up the three hook offsets for `arch`.
    ///
    /// Returns `None` if the architecture section or any of the offsets is
    /// missing or not an integer.
    pub fn offsets_for(&self, arch: Architecture) -> Option<DerivedOffsets> {
        let section = self.platform_offsets.get(arch.key())?.as_object()?;
        let offset = |name: &str| section.get(name).and_then(Value::as_i64);

        Some(DerivedOffsets {
            request_get_url: offset(OFFSET_REQUEST_GET_URL)?,
            zip_reader_get_file_name: offset(OFFSET_ZIP_READER_GET_FILE_NAME)?,
            zip_reader_read_file: offset(OFFSET_ZIP_READER_READ_FILE)?,
        })
    }
}

pub fn builtin_block_list() -> Vec<String> {
    BUILTIN_BLOCK_LIST.iter().map(|s| s.to_string()).collect()
}

/// Hook offsets extracted from the platform offset table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedOffsets {
    pub request_get_url: i64,
    pub zip_reader_get_file_name: i64,
    pub zip_reader_read_file: i64,
}

impl DerivedOffsets {
    /// All three offsets are populated (non-zero).
    pub fn is_complete(&self) -> bool {
        self.request_get_url != 0 && self.zip_reader_get_file_name != 0 && self.zip_reader_read_file != 0
    }
}

/// Target architecture used to select the offset table section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    X64,
    X32,
}

impl Architecture {
    pub fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            Self::X64
        } else {
            Self::X32
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X32 => "x32",
        }
    }
}
