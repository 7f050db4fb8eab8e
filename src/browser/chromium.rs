use super::{read_state_file, Browser};
use crate::error::{DiscoveryError, NameError};
use crate::manifest::{try_resolve_name, Manifest};
use crate::model::{BrowserVariant, ExtensionRecord, Platform, ProfileRecord};
use crate::platform::{browser_folder, channel_folder};
use async_trait::async_trait;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

pub const LOCAL_STATE_FILE: &str = "Local State";
const MANIFEST_FILE: &str = "manifest.json";

/// A Chromium-derived browser (Chrome, Edge, Brave, ...).
///
/// All vendors share the `Local State` profile registry and the
/// `<profile>/Extensions/<id>/<version>/manifest.json` layout; only the
/// application support folder differs.
pub struct ChromiumBrowser {
    variant: BrowserVariant,
    channel: Option<String>,
    folder: Option<PathBuf>,
}

impl ChromiumBrowser {
    pub fn new(variant: BrowserVariant) -> Self {
        Self {
            variant,
            channel: None,
            folder: None,
        }
    }

    /// Reads a release channel's folder (`Beta`, `Dev`, `Canary`) instead
    /// of the stable one.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Uses `folder` instead of the vendor's default location, e.g. for a
    /// portable install. Takes precedence over the channel.
    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = Some(folder.into());
        self
    }
}

#[async_trait]
impl Browser for ChromiumBrowser {
    fn variant(&self) -> BrowserVariant {
        self.variant
    }

    fn supported_platforms(&self) -> &[Platform] {
        &[Platform::Linux, Platform::MacOS, Platform::Windows]
    }

    fn folder(&self) -> Option<PathBuf> {
        if let Some(folder) = &self.folder {
            return Some(folder.clone());
        }
        match &self.channel {
            Some(channel) => channel_folder(self.variant, channel),
            None => browser_folder(self.variant),
        }
    }

    fn state_file(&self) -> Option<PathBuf> {
        self.folder().map(|folder| folder.join(LOCAL_STATE_FILE))
    }

    async fn list_profiles(&self) -> Result<Vec<ProfileRecord>, DiscoveryError> {
        let folder = self.folder().ok_or(DiscoveryError::UnsupportedPlatform)?;
        let variant = self.variant;
        tokio::task::spawn_blocking(move || list_profiles_in(&folder, variant)).await?
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

/// Reads `<folder>/Local State` and returns one profile per `profile.info_cache` key.
///
/// The display name is the cache entry's own `name` when it has one; the
/// location always uses the folder key.
pub fn list_profiles_in(
    folder: &Path,
    variant: BrowserVariant,
) -> Result<Vec<ProfileRecord>, DiscoveryError> {
    let path = folder.join(LOCAL_STATE_FILE);
    let content = read_state_file(&path)?;

    let state: Value = serde_json::from_str(&content).map_err(|source| DiscoveryError::Json {
        path: path.clone(),
        source,
    })?;

    let info_cache = state
        .get("profile")
        .and_then(|p| p.get("info_cache"))
        .and_then(Value::as_object)
        .ok_or_else(|| DiscoveryError::MissingField {
            path: path.clone(),
            field: "profile.info_cache",
        })?;

    let profiles = info_cache
        .iter()
        .map(|(key, info)| {
            let location = folder.join(key).join("Extensions");
            let profile = ProfileRecord::new(key.as_str(), location, variant);
            match info.get("name").and_then(Value::as_str).map(str::trim) {
                Some(name) if !name.is_empty() => profile.with_name(name),
                _ => profile,
            }
        })
        .inspect(|profile| debug!(browser = %variant, profile = %profile.id, "Found profile"))
        .collect();

    Ok(profiles)
}

/// Finds every `manifest.json` below `extensions_dir` and names it.
///
/// Each version directory becomes its own record; candidates that cannot
/// be named are skipped. A missing directory yields an empty list.
pub fn list_extensions_in(extensions_dir: &Path) -> Vec<ExtensionRecord> {
    let mut extensions = Vec::new();

    let manifests = WalkDir::new(extensions_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE);

    for entry in manifests {
        match read_unpacked_extension(entry.path()) {
            Ok(extension) => extensions.push(extension),
            Err(reason) => {
                debug!(manifest = %entry.path().display(), %reason, "Skipping extension");
            }
        }
    }

    extensions
}

fn read_unpacked_extension(manifest_path: &Path) -> Result<ExtensionRecord, NameError> {
    let extension_dir = manifest_path
        .parent()
        .ok_or_else(|| NameError::Unreadable("manifest has no parent directory".to_string()))?;

    let bytes = fs::read(manifest_path).map_err(|e| NameError::Unreadable(e.to_string()))?;
    let manifest = Manifest::parse(&bytes)?;

    let name = try_resolve_name(&manifest, |locale| {
        let messages = extension_dir
            .join("_locales")
            .join(locale)
            .join("messages.json");
        fs::read(&messages).map_err(|e| NameError::LocaleUnavailable {
            locale: locale.to_string(),
            reason: e.to_string(),
        })
    })?;

    Ok(ExtensionRecord::new(name, extension_dir).with_version(manifest.version))
}
