//! Settings file persistence: read, write, parse, validate.
//!
//! The on-disk format is pretty-printed JSON (2-space indent) with exactly the
//! five top-level fields of [`SettingsDocument`]. The same validation applies
//! to documents fetched from the remote source.

use super::error::{SettingsError, SettingsResult};
use crate::models::{
    KEY_BLOCK_LIST, KEY_DEVELOPER, KEY_LATEST_RELEASE_DATE, KEY_PLATFORM_OFFSETS, KEY_ZIP_READER,
    SettingsDocument,
};
use camino::Utf8Path;
use serde_json::Value;
use std::fs;

/// Read the whole settings file.
pub fn read(path: &Utf8Path) -> SettingsResult<String> {
    fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))
}

/// Replace the settings file with `text`.
pub fn write(path: &Utf8Path, text: &str) -> SettingsResult<()> {
    fs::write(path, text).map_err(|e| SettingsError::io(path, e))
}

/// Parse settings text into a JSON tree. No schema checks.
pub fn parse(text: &str) -> SettingsResult<Value> {
    Ok(serde_json::from_str(text)?)
}

/// Check the five required fields, in order, stopping at the first failure.
pub fn validate(settings: &Value) -> SettingsResult<()> {
    let object = match settings.as_object() {
        Some(object) if !object.is_empty() => object,
        _ => return Err(SettingsError::invalid("<root>")),
    };

    let checks: [(&'static str, fn(&Value) -> bool); 5] = [
        (KEY_LATEST_RELEASE_DATE, Value::is_string),
        (KEY_BLOCK_LIST, Value::is_array),
        (KEY_ZIP_READER, Value::is_object),
        (KEY_DEVELOPER, Value::is_object),
        (KEY_PLATFORM_OFFSETS, Value::is_object),
    ];

    for (field, has_shape) in checks {
        if !object.get(field).is_some_and(has_shape) {
            return Err(SettingsError::invalid(field));
        }
    }

    Ok(())
}

/// Boolean form of [`validate`] that logs the failing field.
pub fn is_valid(settings: &Value) -> bool {
    match validate(settings) {
        Ok(()) => true,
        Err(SettingsError::Validation { field: "<root>" }) => {
            tracing::error!("Settings are empty or not an object.");
            false
        }
        Err(e) => {
            tracing::error!("{}", e);
            false
        }
    }
}

/// Convert a validated tree into a typed document.
///
/// Block list entries that are not strings are rejected here.
pub fn decode(settings: Value) -> SettingsResult<SettingsDocument> {
    validate(&settings)?;
    serde_json::from_value(settings).map_err(|_| SettingsError::invalid(KEY_BLOCK_LIST))
}

/// Serialize a document as pretty-printed JSON.
pub fn encode(document: &SettingsDocument) -> SettingsResult<String> {
    serde_json::to_string_pretty(document).map_err(|e| SettingsError::Encode(e.to_string()))
}

/// Read, parse, validate and decode a settings file.
pub fn load_document(path: &Utf8Path) -> SettingsResult<SettingsDocument> {
    let text = read(path)?;
    decode(parse(&text)?)
}

/// Encode and write a settings document.
pub fn save_document(path: &Utf8Path, document: &SettingsDocument) -> SettingsResult<()> {
    write(path, &encode(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use serde_json::json;
    use tempfile::TempDir;

    fn valid_settings() -> Value {
        json!({
            "Latest Release Date": "2024-01-01",
            "Block List": ["/ads/", "/ad-logic/"],
            "Zip Reader": { "home-hpto.js": { "adsEnabled:!0": "adsEnabled:false" } },
            "Developer": { "x64": { "value": "01" } },
            "Cef Offsets": {
                "x64": {
                    "cef_request_t_get_url": 48,
                    "cef_zip_reader_t_get_file_name": 72,
                    "cef_zip_reader_t_read_file": 112
                }
            }
        })
    }

    #[test]
    fn test_validate_accepts_complete_document() {
        assert!(validate(&valid_settings()).is_ok());
        assert!(is_valid(&valid_settings()));
    }

    #[test]
    fn test_validate_rejects_empty_and_non_object() {
        assert!(!is_valid(&json!({})));
        assert!(!is_valid(&json!([1, 2, 3])));
        assert!(!is_valid(&Value::Null));
    }

    #[test]
    fn test_validate_reports_first_failing_field() {
        let mut settings = valid_settings();
        let object = settings.as_object_mut().unwrap();
        object.insert("Block List".into(), json!("not an array"));
        object.remove("Developer");

        let err = validate(&settings).unwrap_err();
        assert_eq!(err.field(), Some("Block List"));
    }

    #[test]
    fn test_validate_rejects_wrong_shapes() {
        let cases = [
            ("Latest Release Date", json!(20240101)),
            ("Block List", json!({})),
            ("Zip Reader", json!([])),
            ("Developer", json!("dev")),
            ("Cef Offsets", json!(null)),
        ];

        for (field, bad) in cases {
            let mut settings = valid_settings();
            settings.as_object_mut().unwrap().insert(field.into(), bad);
            assert_eq!(validate(&settings).unwrap_err().field(), Some(field));
        }
    }

    #[test]
    fn test_decode_rejects_non_string_block_entries() {
        let mut settings = valid_settings();
        settings
            .as_object_mut()
            .unwrap()
            .insert("Block List".into(), json!(["/ads/", 7]));

        assert_eq!(decode(settings).unwrap_err().field(), Some("Block List"));
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        assert!(matches!(parse("{ \"Block List\": ["), Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_encode_uses_two_space_indent() {
        let doc = decode(valid_settings()).unwrap();
        let text = encode(&doc).unwrap();
        assert!(text.starts_with("{\n  \"Latest Release Date\": \"2024-01-01\""));
    }

    #[test]
    fn test_save_and_load_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("settings.json")).unwrap();
        let doc = decode(valid_settings()).unwrap();

        save_document(&path, &doc).unwrap();
        let loaded = load_document(&path).unwrap();

        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = Utf8PathBuf::try_from(temp_dir.path().join("missing.json")).unwrap();
        assert!(matches!(read(&path), Err(SettingsError::Io { .. })));
    }
}
