//! Configuration file handling.
//!
//! This module provides loading and saving of safarify configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/safarify/config.toml`
//! - macOS: `~/Library/Application Support/safarify/config.toml`
//! - Windows: `%APPDATA%\safarify\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! browsers = ["firefox", "chrome", "edge"]
//! default_format = "table"
//!
//! [channels]
//! edge = "Beta"
//!
//! [paths]
//! chrome = "/opt/portable/chrome/User Data"
//!
//! [ignore]
//! extensions = ["Google Docs Offline", "*Translate*"]
//! profiles = ["System Profile"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::model::BrowserVariant;

/// Application configuration.
///
/// # Example
///
/// ```no_run
/// use safarify::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Browsers: {:?}", config.browsers);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which browsers to discover when no `--browser` flag is provided.
    ///
    /// Default: all browsers
    pub browsers: Vec<BrowserVariant>,

    /// Default output format when no `--format` flag is provided.
    ///
    /// Valid values: "table", "json"
    /// Default: "table"
    pub default_format: String,

    /// Release channel to read per Chromium-family browser.
    pub channels: ChannelsConfig,

    /// Application support folder overrides, per browser.
    pub paths: PathsConfig,

    /// Names hidden from profile and extension listings.
    pub ignore: IgnoreConfig,
}

/// Folder overrides for browsers installed in non-standard locations.
///
/// Each entry replaces the folder holding `profiles.ini` or `Local State`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firefox: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brave: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chromium: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vivaldi: Option<PathBuf>,
}

impl PathsConfig {
    /// Returns the configured folder for `variant`, if any.
    pub fn folder(&self, variant: BrowserVariant) -> Option<PathBuf> {
        match variant {
            BrowserVariant::Firefox => self.firefox.clone(),
            BrowserVariant::Edge => self.edge.clone(),
            BrowserVariant::Chrome => self.chrome.clone(),
            BrowserVariant::Brave => self.brave.clone(),
            BrowserVariant::Chromium => self.chromium.clone(),
            BrowserVariant::Vivaldi => self.vivaldi.clone(),
        }
    }
}

/// Release channels (`Beta`, `Dev`, `Canary`) for Chromium-family browsers.
///
/// A `[paths]` entry for the same browser wins over its channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chrome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brave: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chromium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vivaldi: Option<String>,
}

impl ChannelsConfig {
    /// Returns the configured channel for `variant`, if any.
    pub fn channel(&self, variant: BrowserVariant) -> Option<&str> {
        let slot = match variant {
            BrowserVariant::Firefox => return None,
            BrowserVariant::Edge => &self.edge,
            BrowserVariant::Chrome => &self.chrome,
            BrowserVariant::Brave => &self.brave,
            BrowserVariant::Chromium => &self.chromium,
            BrowserVariant::Vivaldi => &self.vivaldi,
        };
        slot.as_deref()
    }

    /// Sets the channel for `variant`. Returns false for browsers without
    /// channel folders.
    pub fn set_channel(&mut self, variant: BrowserVariant, channel: impl Into<String>) -> bool {
        match self.slot_mut(variant) {
            Some(slot) => {
                *slot = Some(channel.into());
                true
            }
            None => false,
        }
    }

    fn slot_mut(&mut self, variant: BrowserVariant) -> Option<&mut Option<String>> {
        match variant {
            BrowserVariant::Firefox => None,
            BrowserVariant::Edge => Some(&mut self.edge),
            BrowserVariant::Chrome => Some(&mut self.chrome),
            BrowserVariant::Brave => Some(&mut self.brave),
            BrowserVariant::Chromium => Some(&mut self.chromium),
            BrowserVariant::Vivaldi => Some(&mut self.vivaldi),
        }
    }
}

/// Configuration for hiding specific profiles or extensions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Extension display names to hide. Supports `*` wildcards.
    pub extensions: Vec<String>,

    /// Profile display names to hide. Supports `*` wildcards.
    pub profiles: Vec<String>,
}

impl IgnoreConfig {
    /// Check if an extension should be hidden.
    pub fn should_ignore_extension(&self, name: &str) -> bool {
        matches_any(&self.extensions, name)
    }

    /// Check if a profile should be hidden.
    pub fn should_ignore_profile(&self, name: &str) -> bool {
        matches_any(&self.profiles, name)
    }
}

fn matches_any(patterns: &[String], text: &str) -> bool {
    patterns.iter().any(|pattern| {
        if pattern.contains('*') {
            glob_match(pattern, text)
        } else {
            pattern == text
        }
    })
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    // Check prefix (before first *)
    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    // Check suffix (after last *)
    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browsers: BrowserVariant::ALL.to_vec(),
            default_format: "table".to_string(),
            channels: ChannelsConfig::default(),
            paths: PathsConfig::default(),
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    ///
    /// # Example
    ///
    /// ```
    /// use safarify::Config;
    ///
    /// let path = Config::config_path();
    /// assert!(path.ends_with("safarify/config.toml"));
    /// ```
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("safarify")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glob_match_exact() {
        assert!(glob_match("uBlock Origin", "uBlock Origin"));
        assert!(!glob_match("uBlock Origin", "uBlock"));
    }

    #[test]
    fn test_glob_match_prefix_suffix_contains() {
        assert!(glob_match("Google*", "Google Docs Offline"));
        assert!(!glob_match("Google*", "Docs by Google"));
        assert!(glob_match("*Offline", "Google Docs Offline"));
        assert!(glob_match("*Translate*", "Google Translate Extension"));
        assert!(glob_match("G*Docs*e", "Google Docs Offline"));
        assert!(!glob_match("*Translate*", "DeepL"));
    }

    #[test]
    fn test_ignore_config() {
        let ignore = IgnoreConfig {
            extensions: vec!["Google Docs Offline".to_string(), "*Translate*".to_string()],
            profiles: vec!["System Profile".to_string()],
        };

        assert!(ignore.should_ignore_extension("Google Docs Offline"));
        assert!(ignore.should_ignore_extension("Google Translate"));
        assert!(!ignore.should_ignore_extension("Bitwarden"));
        assert!(ignore.should_ignore_profile("System Profile"));
        assert!(!ignore.should_ignore_profile("Default"));
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.default_format, "table");
        assert_eq!(config.browsers.len(), 6);
        assert!(config.paths.folder(BrowserVariant::Chrome).is_none());
        assert!(config.ignore.extensions.is_empty());
    }

    #[test]
    fn test_config_from_toml() {
        let config = Config::from_toml(
            r#"
browsers = ["firefox", "edge"]

[channels]
chrome = "Canary"

[paths]
edge = "/opt/edge"

[ignore]
extensions = ["Foo*"]
"#,
        )
        .unwrap();

        assert_eq!(config.browsers, vec![BrowserVariant::Firefox, BrowserVariant::Edge]);
        assert_eq!(config.default_format, "table");
        assert_eq!(
            config.paths.folder(BrowserVariant::Edge),
            Some(PathBuf::from("/opt/edge"))
        );
        assert_eq!(config.channels.channel(BrowserVariant::Chrome), Some("Canary"));
        assert_eq!(config.channels.channel(BrowserVariant::Edge), None);
        assert!(config.ignore.should_ignore_extension("Foobar"));
    }

    #[test]
    fn test_set_channel() {
        let mut channels = ChannelsConfig::default();
        assert!(channels.set_channel(BrowserVariant::Edge, "Dev"));
        assert_eq!(channels.channel(BrowserVariant::Edge), Some("Dev"));
        assert!(!channels.set_channel(BrowserVariant::Firefox, "Nightly"));
        assert_eq!(channels.channel(BrowserVariant::Firefox), None);
    }

    #[test]
    fn test_default_config_round_trips() {
        let text = Config::generate_default_config();
        let parsed = Config::from_toml(&text).unwrap();
        assert_eq!(parsed.browsers, Config::default().browsers);
    }
}
