//! Error types for profile discovery and extension name resolution.
//!
//! Two tiers exist:
//!
//! - [`DiscoveryError`] - a browser's state file is missing or unusable.
//!   Profile locators return it to the caller untouched.
//! - [`NameError`] - a single extension candidate could not be named.
//!   Enumerators skip that candidate and keep going.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("browser state file not found: {}", path.display())]
    NotInstalled { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("browser state file is empty: {}", path.display())]
    EmptyStateFile { path: PathBuf },

    #[error("failed to parse {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} has no `{field}` entry", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("could not determine the application support folder on this platform")]
    UnsupportedPlatform,

    #[error("discovery task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DiscoveryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            DiscoveryError::NotInstalled { path }
        } else {
            DiscoveryError::Io { path, source }
        }
    }
}

/// Why an extension's display name could not be resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("extension could not be read: {0}")]
    Unreadable(String),

    #[error("package has no manifest.json")]
    MissingManifest,

    #[error("manifest is not valid JSON: {0}")]
    Malformed(String),

    #[error("manifest has no string `name`")]
    MissingName,

    #[error("manifest `name` is empty")]
    EmptyName,

    #[error("localized name without `default_locale`")]
    MissingDefaultLocale,

    #[error("locale bundle `{locale}` unavailable: {reason}")]
    LocaleUnavailable { locale: String, reason: String },

    #[error("locale bundle is not valid JSON: {0}")]
    MalformedLocale(String),

    #[error("locale bundle has no message `{key}`")]
    MissingMessage { key: String },

    #[error("message `{key}` is itself a locale reference")]
    NestedIndirection { key: String },
}
