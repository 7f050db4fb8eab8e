//! Browser profile locators and extension enumerators.
//!
//! This module provides the [`Browser`] trait and implementations for
//! discovering profiles and the extensions installed in them.
//!
//! # Available Browsers
//!
//! | Browser | Profile registry | Extension layout |
//! |---------|------------------|------------------|
//! | [`FirefoxBrowser`] | `profiles.ini` | `<profile>/extensions/*.xpi` |
//! | [`ChromiumBrowser`] (Chrome, Edge, Brave, ...) | `Local State` | `<profile>/Extensions/<id>/<ver>/` |
//!
//! # Example
//!
//! ```no_run
//! use safarify::browser::{all_browsers, discover_profiles, Browser};
//!
//! #[tokio::main]
//! async fn main() {
//!     let browsers = all_browsers();
//!     for found in discover_profiles(&browsers).await {
//!         let Ok(profiles) = found.result else { continue };
//!         for profile in profiles {
//!             println!("{} / {}", profile.browser, profile.name);
//!         }
//!     }
//! }
//! ```

pub mod chromium;
pub mod firefox;
pub mod ini;

pub use chromium::{ChromiumBrowser, LOCAL_STATE_FILE};
pub use firefox::{compare_profile_names, FirefoxBrowser, PROFILES_FILE};

use crate::config::Config;
use crate::error::DiscoveryError;
use crate::model::{BrowserVariant, ExtensionRecord, Platform, ProfileRecord};
use async_trait::async_trait;
use futures::future::join_all;
use std::fs;
use std::path::{Path, PathBuf};

/// Trait for locating a browser's profiles and the extensions inside them.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Returns the browser this implementation handles.
    fn variant(&self) -> BrowserVariant;

    /// Returns the human-readable name of this browser.
    fn name(&self) -> &'static str {
        self.variant().display_name()
    }

    /// Returns the platforms this browser can be discovered on.
    fn supported_platforms(&self) -> &[Platform];

    /// Returns true if this browser is supported on the current platform.
    fn is_supported(&self) -> bool {
        let current = Platform::current();
        self.supported_platforms().contains(&current)
    }

    /// Returns the application support folder holding the profile registry.
    fn folder(&self) -> Option<PathBuf>;

    /// Returns the path of the profile registry file.
    fn state_file(&self) -> Option<PathBuf>;

    /// Returns true if the profile registry file exists.
    fn is_installed(&self) -> bool {
        self.state_file().map(|path| path.is_file()).unwrap_or(false)
    }

    /// Lists the profiles of this browser.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile registry is missing or unparsable.
    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>, DiscoveryError>;

    /// Lists the extensions in a profile's extensions directory.
    ///
    /// Never fails: unreadable candidates are left out of the result.
    async fn list_extensions(&self, extensions_dir: &Path) -> Vec<ExtensionRecord>;
}

/// Returns a locator for every known browser at its default location.
pub fn all_browsers() -> Vec<Box<dyn Browser>> {
    BrowserVariant::ALL.into_iter().map(get_browser).collect()
}

/// Returns the locator for a specific browser at its default location.
///
/// # Example
///
/// ```
/// use safarify::{Browser, BrowserVariant, browser::get_browser};
///
/// let browser = get_browser(BrowserVariant::Edge);
/// assert_eq!(browser.name(), "Edge");
/// ```
pub fn get_browser(variant: BrowserVariant) -> Box<dyn Browser> {
    if variant.is_chromium_family() {
        Box::new(ChromiumBrowser::new(variant))
    } else {
        Box::new(FirefoxBrowser::new())
    }
}

/// Returns the locator for `variant`, honoring the channel and folder
/// overrides in `config`.
pub fn configured_browser(variant: BrowserVariant, config: &Config) -> Box<dyn Browser> {
    let folder = config.paths.folder(variant);

    if !variant.is_chromium_family() {
        return match folder {
            Some(folder) => Box::new(FirefoxBrowser::new().with_folder(folder)),
            None => Box::new(FirefoxBrowser::new()),
        };
    }

    let mut browser = ChromiumBrowser::new(variant);
    if let Some(channel) = config.channels.channel(variant) {
        browser = browser.with_channel(channel);
    }
    if let Some(folder) = folder {
        browser = browser.with_folder(folder);
    }
    Box::new(browser)
}

/// Profiles found for one browser, or why it could not be read.
#[derive(Debug)]
pub struct BrowserProfiles {
    pub variant: BrowserVariant,
    pub result: Result<Vec<ProfileRecord>, DiscoveryError>,
}

/// Runs every supported browser's profile locator concurrently.
///
/// Results come back in the order of `browsers`. One browser failing does
/// not affect the others.
pub async fn discover_profiles(browsers: &[Box<dyn Browser>]) -> Vec<BrowserProfiles> {
    let futures = browsers
        .iter()
        .filter(|browser| browser.is_supported())
        .map(|browser| async move {
            BrowserProfiles {
                variant: browser.variant(),
                result: browser.list_profiles().await,
            }
        });

    join_all(futures).await
}

/// Flattens successful discoveries into one selection list.
pub fn merge_profiles(found: Vec<BrowserProfiles>) -> Vec<ProfileRecord> {
    found
        .into_iter()
        .filter_map(|entry| entry.result.ok())
        .flatten()
        .collect()
}

/// Reads a mandatory browser state file as UTF-8 text.
///
/// A missing file maps to [`DiscoveryError::NotInstalled`] and an empty
/// one to [`DiscoveryError::EmptyStateFile`].
pub(crate) fn read_state_file(path: &Path) -> Result<String, DiscoveryError> {
    let content = fs::read_to_string(path).map_err(|e| DiscoveryError::io(path, e))?;
    if content.trim().is_empty() {
        return Err(DiscoveryError::EmptyStateFile {
            path: path.to_path_buf(),
        });
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;
    use crate::platform::channel_folder;
    use tempfile::tempdir;

    #[test]
    fn test_all_browsers() {
        let browsers = all_browsers();
        assert_eq!(browsers.len(), BrowserVariant::ALL.len());
        assert_eq!(browsers[0].variant(), BrowserVariant::Firefox);
    }

    #[test]
    fn test_state_files() {
        let dir = tempdir().unwrap();

        let firefox = FirefoxBrowser::new().with_folder(dir.path());
        assert_eq!(firefox.state_file(), Some(dir.path().join(PROFILES_FILE)));
        assert!(!firefox.is_installed());

        let edge = ChromiumBrowser::new(BrowserVariant::Edge).with_folder(dir.path());
        assert_eq!(edge.state_file(), Some(dir.path().join(LOCAL_STATE_FILE)));
        fs::write(dir.path().join(LOCAL_STATE_FILE), "{}").unwrap();
        assert!(edge.is_installed());
        assert_eq!(edge.name(), "Edge");
    }

    #[test]
    fn test_configured_browser_applies_channel() {
        let mut config = Config::default();
        assert!(config.channels.set_channel(BrowserVariant::Chrome, "Canary"));

        let chrome = configured_browser(BrowserVariant::Chrome, &config);
        assert_eq!(chrome.folder(), channel_folder(BrowserVariant::Chrome, "Canary"));

        let firefox = configured_browser(BrowserVariant::Firefox, &config);
        assert_eq!(firefox.folder(), get_browser(BrowserVariant::Firefox).folder());

        let dir = tempdir().unwrap();
        config.paths.chrome = Some(dir.path().to_path_buf());
        let chrome = configured_browser(BrowserVariant::Chrome, &config);
        assert_eq!(chrome.folder(), Some(dir.path().to_path_buf()));
    }

    #[tokio::test]
    async fn test_discover_profiles_isolates_failures() {
        let chrome_dir = tempdir().unwrap();
        fs::write(
            chrome_dir.path().join(LOCAL_STATE_FILE),
            r#"{"profile": {"info_cache": {"Default": {}, "Profile 1": {}}}}"#,
        )
        .unwrap();
        let missing_firefox = tempdir().unwrap();

        let config = Config {
            paths: PathsConfig {
                chrome: Some(chrome_dir.path().to_path_buf()),
                firefox: Some(missing_firefox.path().to_path_buf()),
                ..PathsConfig::default()
            },
            ..Config::default()
        };
        let browsers = vec![
            configured_browser(BrowserVariant::Firefox, &config),
            configured_browser(BrowserVariant::Chrome, &config),
        ];

        let found = discover_profiles(&browsers).await;

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].variant, BrowserVariant::Firefox);
        assert!(matches!(found[0].result, Err(DiscoveryError::NotInstalled { .. })));
        assert_eq!(found[1].variant, BrowserVariant::Chrome);

        let merged = merge_profiles(found);
        assert_eq!(merged.len(), 2);
        assert!(merged.iter().all(|p| p.browser == BrowserVariant::Chrome));
    }

    #[test]
    fn test_read_state_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state");

        assert!(matches!(
            read_state_file(&path),
            Err(DiscoveryError::NotInstalled { .. })
        ));

        fs::write(&path, "").unwrap();
        assert!(matches!(
            read_state_file(&path),
            Err(DiscoveryError::EmptyStateFile { .. })
        ));

        fs::write(&path, "{}").unwrap();
        assert_eq!(read_state_file(&path).unwrap(), "{}");
    }
}
