use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating, persisting or fetching settings.
///
/// Public boolean operations (`load_from_disk`, `save_to_disk`,
/// `sync_from_server`) log these and return `false`; they never leave the crate
/// as panics.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Missing or invalid '{field}' setting")]
    Validation { field: &'static str },

    #[error("Failed to fetch {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Failed to encode settings document: {0}")]
    Encode(String),
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(field: &'static str) -> Self {
        Self::Validation { field }
    }

    /// Name of the offending field for validation failures.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Validation { field } => Some(field),
            _ => None,
        }
    }
}

pub type SettingsResult<T> = Result<T, SettingsError>;
