use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserVariant {
    Firefox,
    Edge,
    Chrome,
    Brave,
    Chromium,
    Vivaldi,
}

impl BrowserVariant {
    pub const ALL: [BrowserVariant; 6] = [
        BrowserVariant::Firefox,
        BrowserVariant::Edge,
        BrowserVariant::Chrome,
        BrowserVariant::Brave,
        BrowserVariant::Chromium,
        BrowserVariant::Vivaldi,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BrowserVariant::Firefox => "firefox",
            BrowserVariant::Edge => "edge",
            BrowserVariant::Chrome => "chrome",
            BrowserVariant::Brave => "brave",
            BrowserVariant::Chromium => "chromium",
            BrowserVariant::Vivaldi => "vivaldi",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BrowserVariant::Firefox => "Firefox",
            BrowserVariant::Edge => "Edge",
            BrowserVariant::Chrome => "Chrome",
            BrowserVariant::Brave => "Brave",
            BrowserVariant::Chromium => "Chromium",
            BrowserVariant::Vivaldi => "Vivaldi",
        }
    }

    /// Returns true for browsers sharing Chromium's profile and manifest layout.
    pub fn is_chromium_family(&self) -> bool {
        !matches!(self, BrowserVariant::Firefox)
    }
}

impl std::fmt::Display for BrowserVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for BrowserVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "firefox" | "ff" => Ok(BrowserVariant::Firefox),
            "edge" => Ok(BrowserVariant::Edge),
            "chrome" => Ok(BrowserVariant::Chrome),
            "brave" => Ok(BrowserVariant::Brave),
            "chromium" => Ok(BrowserVariant::Chromium),
            "vivaldi" => Ok(BrowserVariant::Vivaldi),
            _ => Err(format!(
                "Unknown browser: {}. Use: firefox, edge, chrome, brave, chromium, vivaldi",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        return Platform::MacOS;
        #[cfg(target_os = "windows")]
        return Platform::Windows;
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        return Platform::Linux;
    }
}

/// A browser profile discovered on disk.
///
/// `location` is the profile's extensions directory, not the profile root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Folder key or INI name identifying the profile.
    pub id: String,
    /// Label shown when picking a profile.
    pub name: String,
    pub location: PathBuf,
    pub browser: BrowserVariant,
}

impl ProfileRecord {
    pub fn new(
        id: impl Into<String>,
        location: impl Into<PathBuf>,
        browser: BrowserVariant,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            location: location.into(),
            browser,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}
