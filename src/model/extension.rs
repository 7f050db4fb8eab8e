use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An installed extension that has not been copied anywhere yet.
///
/// For Firefox `location` is the `.xpi` package. For Chromium-family
/// browsers it is the unpacked version directory holding `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionRecord {
    pub name: String,
    pub location: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ExtensionRecord {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: Option<String>) -> Self {
        self.version = version;
        self
    }

    /// Returns true when `location` points at a packaged archive.
    pub fn is_packaged(&self) -> bool {
        self.location
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("xpi"))
            .unwrap_or(false)
    }
}
