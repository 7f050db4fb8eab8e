//! Cross-platform path resolution.
//!
//! Each browser keeps its profile registry in an application support
//! folder whose location depends on the vendor and the operating system.
//! These functions only compute the path; they do not check that it exists.

use crate::model::{BrowserVariant, Platform};
use std::path::PathBuf;

/// Returns the folder holding a browser's `Local State` or `profiles.ini`.
///
/// Platform-specific locations for Chrome, for example:
/// - Linux: `~/.config/google-chrome/`
/// - macOS: `~/Library/Application Support/Google/Chrome/`
/// - Windows: `%LOCALAPPDATA%\Google\Chrome\User Data\`
pub fn browser_folder(variant: BrowserVariant) -> Option<PathBuf> {
    browser_folder_for(variant, Platform::current())
}

pub fn browser_folder_for(variant: BrowserVariant, platform: Platform) -> Option<PathBuf> {
    match platform {
        Platform::MacOS => {
            let support = dirs::home_dir()?.join("Library").join("Application Support");
            Some(support.join(macos_segments(variant).iter().collect::<PathBuf>()))
        }
        Platform::Linux => {
            if variant == BrowserVariant::Firefox {
                return Some(dirs::home_dir()?.join(".mozilla").join("firefox"));
            }
            Some(dirs::config_dir()?.join(linux_segments(variant).iter().collect::<PathBuf>()))
        }
        Platform::Windows => {
            if variant == BrowserVariant::Firefox {
                return Some(dirs::data_dir()?.join("Mozilla").join("Firefox"));
            }
            let local = dirs::data_local_dir()?;
            Some(
                local
                    .join(windows_segments(variant).iter().collect::<PathBuf>())
                    .join("User Data"),
            )
        }
    }
}

fn macos_segments(variant: BrowserVariant) -> &'static [&'static str] {
    match variant {
        BrowserVariant::Firefox => &["Firefox"],
        BrowserVariant::Edge => &["Microsoft Edge"],
        BrowserVariant::Chrome => &["Google", "Chrome"],
        BrowserVariant::Brave => &["BraveSoftware", "Brave-Browser"],
        BrowserVariant::Chromium => &["Chromium"],
        BrowserVariant::Vivaldi => &["Vivaldi"],
    }
}

fn linux_segments(variant: BrowserVariant) -> &'static [&'static str] {
    match variant {
        BrowserVariant::Firefox => &["firefox"],
        BrowserVariant::Edge => &["microsoft-edge"],
        BrowserVariant::Chrome => &["google-chrome"],
        BrowserVariant::Brave => &["BraveSoftware", "Brave-Browser"],
        BrowserVariant::Chromium => &["chromium"],
        BrowserVariant::Vivaldi => &["vivaldi"],
    }
}

fn windows_segments(variant: BrowserVariant) -> &'static [&'static str] {
    match variant {
        BrowserVariant::Firefox => &["Mozilla", "Firefox"],
        BrowserVariant::Edge => &["Microsoft", "Edge"],
        BrowserVariant::Chrome => &["Google", "Chrome"],
        BrowserVariant::Brave => &["BraveSoftware", "Brave-Browser"],
        BrowserVariant::Chromium => &["Chromium"],
        BrowserVariant::Vivaldi => &["Vivaldi"],
    }
}

/// Returns the folder of a Chromium release channel such as `Beta` or `Canary`.
///
/// Firefox has no channel folders (its channels are profiles), so it
/// yields `None`.
pub fn channel_folder(variant: BrowserVariant, channel: &str) -> Option<PathBuf> {
    channel_folder_for(variant, channel, Platform::current())
}

/// Channel folders append the channel to the vendor's last path segment:
/// - macOS: `Google/Chrome Canary`, `Microsoft Edge Beta`
/// - Linux: `google-chrome-beta`, `microsoft-edge-dev`
/// - Windows: `Microsoft\Edge Beta\User Data`; Chrome Canary is `Chrome SxS`
pub fn channel_folder_for(
    variant: BrowserVariant,
    channel: &str,
    platform: Platform,
) -> Option<PathBuf> {
    let channel = channel.trim();
    if !variant.is_chromium_family() || channel.is_empty() {
        return None;
    }

    match platform {
        Platform::MacOS => {
            let segments = with_channel(macos_segments(variant), &format!(" {}", channel));
            let support = dirs::home_dir()?.join("Library").join("Application Support");
            Some(support.join(segments))
        }
        Platform::Linux => {
            let suffix = format!("-{}", channel.to_lowercase());
            Some(dirs::config_dir()?.join(with_channel(linux_segments(variant), &suffix)))
        }
        Platform::Windows => {
            let is_chrome_canary =
                variant == BrowserVariant::Chrome && channel.eq_ignore_ascii_case("canary");
            let suffix = if is_chrome_canary {
                " SxS".to_string()
            } else {
                format!(" {}", channel)
            };
            let local = dirs::data_local_dir()?;
            Some(
                local
                    .join(with_channel(windows_segments(variant), &suffix))
                    .join("User Data"),
            )
        }
    }
}

fn with_channel(segments: &[&str], suffix: &str) -> PathBuf {
    let mut owned: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
    if let Some(last) = owned.last_mut() {
        last.push_str(suffix);
    }
    owned.iter().collect()
}
