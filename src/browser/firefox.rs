use super::{ini, read_state_file, Browser};
use crate::error::{DiscoveryError, NameError};
use crate::manifest::{try_resolve_name, Manifest};
use crate::model::{BrowserVariant, ExtensionRecord, Platform, ProfileRecord};
use crate::platform::browser_folder;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

pub const PROFILES_FILE: &str = "profiles.ini";

/// Upper bound for a single manifest or messages entry read from a package.
const MAX_ENTRY_BYTES: u64 = 4 * 1024 * 1024;

pub struct FirefoxBrowser {
    folder: Option<PathBuf>,
}

impl FirefoxBrowser {
    pub fn new() -> Self {
        Self { folder: None }
    }

    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = Some(folder.into());
        self
    }
}

impl Default for FirefoxBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Browser for FirefoxBrowser {
    fn variant(&self) -> BrowserVariant {
        BrowserVariant::Firefox
    }

    fn supported_platforms(&self) -> &[Platform] {
        &[Platform::Linux, Platform::MacOS, Platform::Windows]
    }

    fn folder(&self) -> Option<PathBuf> {
        self.folder
            .clone()
            .or_else(|| browser_folder(BrowserVariant::Firefox))
    }

    fn state_file(&self) -> Option<PathBuf> {
        self.folder().map(|folder| folder.join(PROFILES_FILE))
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>, DiscoveryError> {
        let folder = self.folder().ok_or(DiscoveryError::UnsupportedPlatform)?;
        tokio::task::spawn_blocking(move || list_profiles_in(&folder)).await?
    }

    async fn list_extensions(&self, extensions_dir: &Path) -> Vec<ExtensionRecord> {
        let dir = extensions_dir.to_path_buf();
        match tokio::task::spawn_blocking(move || list_extensions_in(&dir)).await {
            Ok(extensions) => extensions,
            Err(e) => {
                tracing::warn!("Extension enumeration task failed: {}", e);
                Vec::new()
            }
        }
    }
}

/// Reads `<folder>/profiles.ini` and returns the usable profiles, most
/// likely candidates first (see [`compare_profile_names`]).
///
/// Sections with `Locked=1` or without `Name`, `IsRelative` and `Path`
/// are dropped. `IsRelative=0` marks `Path` as absolute; any other value
/// resolves it against `folder`.
pub fn list_profiles_in(folder: &Path) -> Result<Vec<ProfileRecord>, DiscoveryError> {
    let content = read_state_file(&folder.join(PROFILES_FILE))?;

    let mut profiles: Vec<ProfileRecord> = ini::parse(&content)
        .iter()
        .filter(|section| section.get("Locked") != Some("1"))
        .filter_map(|section| {
            let name = section.get("Name").filter(|v| !v.is_empty())?;
            let is_relative = section.get("IsRelative").filter(|v| !v.is_empty())?;
            let path = section.get("Path").filter(|v| !v.is_empty())?;

            let root = if is_relative == "0" {
                PathBuf::from(path)
            } else {
                folder.join(path)
            };
            Some(ProfileRecord::new(
                name,
                root.join("extensions"),
                BrowserVariant::Firefox,
            ))
        })
        .collect();

    profiles.sort_by(|a, b| compare_profile_names(&a.name, &b.name));

    for profile in &profiles {
        debug!(browser = "firefox", profile = %profile.name, "Found profile");
    }

    Ok(profiles)
}

/// Orders Firefox profile names so the profile a user most likely wants
/// comes first.
///
/// Rules, in priority order:
/// 1. names tagged with a release channel (`-release`, `-esr`) first
/// 2. names starting with `default-` first
/// 3. anything other than the bare legacy `default` profile first
/// 4. alphabetical
pub fn compare_profile_names(a: &str, b: &str) -> Ordering {
    profile_rank(b)
        .cmp(&profile_rank(a))
        .then_with(|| a.cmp(b))
}

fn profile_rank(name: &str) -> [bool; 3] {
    [
        name.contains("-release") || name.contains("-esr"),
        name.starts_with("default-"),
        name != "default",
    ]
}

/// Names every `*.xpi` package directly inside `extensions_dir`, sorted by name.
///
/// Packages are read in place; nothing is extracted to disk. Packages that
/// cannot be named are skipped and a missing directory yields an empty list.
pub fn list_extensions_in(extensions_dir: &Path) -> Vec<ExtensionRecord> {
    let entries = match fs::read_dir(extensions_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(
                dir = %extensions_dir.display(),
                error = %e,
                "Cannot read extensions directory"
            );
            return Vec::new();
        }
    };

    let mut extensions: Vec<ExtensionRecord> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_xpi(path))
        .filter_map(|path| match read_packaged_extension(&path) {
            Ok(extension) => Some(extension),
            Err(reason) => {
                debug!(package = %path.display(), %reason, "Skipping extension");
                None
            }
        })
        .collect();

    extensions.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.location.cmp(&b.location))
    });
    extensions
}

fn is_xpi(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("xpi"))
        .unwrap_or(false)
}

fn read_packaged_extension(path: &Path) -> Result<ExtensionRecord, NameError> {
    let file = File::open(path).map_err(|e| NameError::Unreadable(e.to_string()))?;
    let mut archive = ZipArchive::new(file).map_err(|e| NameError::Unreadable(e.to_string()))?;

    let manifest_bytes =
        read_entry(&mut archive, "manifest.json")?.ok_or(NameError::MissingManifest)?;
    let manifest = Manifest::parse(&manifest_bytes)?;

    let name = try_resolve_name(&manifest, |locale| {
        let entry = format!("_locales/{}/messages.json", locale);
        match read_entry(&mut archive, &entry) {
            Ok(Some(bytes)) => Ok(bytes),
            Ok(None) => Err(NameError::LocaleUnavailable {
                locale: locale.to_string(),
                reason: format!("{} not in package", entry),
            }),
            Err(e) => Err(NameError::LocaleUnavailable {
                locale: locale.to_string(),
                reason: e.to_string(),
            }),
        }
    })?;

    Ok(ExtensionRecord::new(name, path).with_version(manifest.version))
}

/// Reads one archive entry into memory, or `None` if the package lacks it.
fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<Vec<u8>>, NameError> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(NameError::Unreadable(e.to_string())),
    };

    if entry.size() > MAX_ENTRY_BYTES {
        return Err(too_large(name, MAX_ENTRY_BYTES));
    }

    read_bounded(&mut entry, name, MAX_ENTRY_BYTES).map(Some)
}

/// Reads at most `limit` bytes; the declared entry size is not trusted.
fn read_bounded<R: Read>(reader: R, name: &str, limit: u64) -> Result<Vec<u8>, NameError> {
    let mut bytes = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| NameError::Unreadable(e.to_string()))?;

    if bytes.len() as u64 > limit {
        return Err(too_large(name, limit));
    }
    Ok(bytes)
}

fn too_large(name: &str, limit: u64) -> NameError {
    NameError::Unreadable(format!("{} exceeds the maximum of {} bytes", name, limit))
}
