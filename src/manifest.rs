//! Extension manifest parsing and display name resolution.
//!
//! A manifest's `name` is either used verbatim or, when it has the form
//! `__MSG_<key>__`, looked up in `_locales/<default_locale>/messages.json`.
//! The locale bundle is supplied by a loader closure so the same logic
//! serves unpacked Chromium directories and Firefox `.xpi` archives.
//!
//! # Example
//!
//! ```
//! use safarify::manifest::{resolve_name, Manifest};
//!
//! let manifest = Manifest::parse(br#"{"name": "__MSG_appName__", "default_locale": "en-US"}"#).unwrap();
//! let name = resolve_name(&manifest, |locale| {
//!     assert_eq!(locale, "en_US");
//!     Ok(br#"{"appName": {"message": "Dark Reader"}}"#.to_vec())
//! });
//! assert_eq!(name.as_deref(), Some("Dark Reader"));
//! ```

use crate::error::NameError;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Prefix marking a locale-indirected manifest string.
pub const MESSAGE_PREFIX: &str = "__MSG_";
const MESSAGE_SUFFIX: &str = "__";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// The fields of `manifest.json` this crate reads.
///
/// Fields of the wrong JSON type are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub default_locale: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
}

impl Manifest {
    pub fn parse(bytes: &[u8]) -> Result<Self, NameError> {
        let bytes = strip_bom(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(NameError::Malformed("empty document".to_string()));
        }
        serde_json::from_slice(bytes).map_err(|e| NameError::Malformed(e.to_string()))
    }

    /// The locale folder name for `default_locale` (`en-US` becomes `en_US`).
    pub fn locale_folder(&self) -> Option<String> {
        self.default_locale
            .as_deref()
            .map(str::trim)
            .filter(|locale| !locale.is_empty())
            .map(|locale| locale.replace('-', "_"))
    }
}

/// Contents of a `_locales/<locale>/messages.json` bundle, in document order.
#[derive(Debug, Clone, Default)]
pub struct LocaleMessages {
    entries: Map<String, Value>,
}

impl LocaleMessages {
    pub fn parse(bytes: &[u8]) -> Result<Self, NameError> {
        let bytes = strip_bom(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(NameError::MalformedLocale("empty document".to_string()));
        }
        let entries: Map<String, Value> =
            serde_json::from_slice(bytes).map_err(|e| NameError::MalformedLocale(e.to_string()))?;
        Ok(Self { entries })
    }

    /// Looks up the `message` of `key`, falling back to the first
    /// case-insensitive match in document order.
    pub fn message(&self, key: &str) -> Option<&str> {
        let entry = self.entries.get(key).or_else(|| {
            self.entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })?;
        entry.get("message").and_then(Value::as_str)
    }
}

/// Extracts `key` from a `__MSG_key__` token, or `None` for a literal name.
pub fn message_key(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(MESSAGE_PREFIX)?;
    Some(rest.strip_suffix(MESSAGE_SUFFIX).unwrap_or(rest))
}

/// Resolves the display name of `manifest`, reporting why it failed.
///
/// `load_locale` receives the normalized locale folder name and returns
/// the raw bytes of that locale's `messages.json`. It is only called for
/// indirected names.
pub fn try_resolve_name<F>(manifest: &Manifest, load_locale: F) -> Result<String, NameError>
where
    F: FnOnce(&str) -> Result<Vec<u8>, NameError>,
{
    let name = manifest.name.as_deref().ok_or(NameError::MissingName)?;

    let Some(key) = message_key(name) else {
        return non_empty(name);
    };
    if key.is_empty() {
        return Err(NameError::MissingMessage { key: key.to_string() });
    }

    let locale = manifest.locale_folder().ok_or(NameError::MissingDefaultLocale)?;
    let messages = LocaleMessages::parse(&load_locale(&locale)?)?;
    let message = messages
        .message(key)
        .ok_or_else(|| NameError::MissingMessage { key: key.to_string() })?;

    // Only one level of indirection is followed.
    if message.starts_with(MESSAGE_PREFIX) {
        return Err(NameError::NestedIndirection { key: key.to_string() });
    }
    non_empty(message)
}

/// Resolves the display name of `manifest`, or `None` if it cannot be named.
pub fn resolve_name<F>(manifest: &Manifest, load_locale: F) -> Option<String>
where
    F: FnOnce(&str) -> Result<Vec<u8>, NameError>,
{
    try_resolve_name(manifest, load_locale).ok()
}

/// Returns `name` unchanged unless it is blank.
fn non_empty(name: &str) -> Result<String, NameError> {
    if name.trim().is_empty() {
        Err(NameError::EmptyName)
    } else {
        Ok(name.to_string())
    }
}

fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(json: &str) -> Manifest {
        Manifest::parse(json.as_bytes()).unwrap()
    }

    fn unreachable_loader(_: &str) -> Result<Vec<u8>, NameError> {
        panic!("locale loader must not be called for literal names");
    }

    #[test]
    fn test_literal_name_is_returned_verbatim() {
        let m = manifest(r#"{"name": "My Extension"}"#);
        assert_eq!(resolve_name(&m, unreachable_loader), Some("My Extension".to_string()));
    }

    #[test]
    fn test_literal_name_keeps_surrounding_whitespace() {
        let m = manifest(r#"{"name": "  Padded Name "}"#);
        assert_eq!(resolve_name(&m, unreachable_loader).as_deref(), Some("  Padded Name "));
    }

    #[test]
    fn test_resolved_message_keeps_surrounding_whitespace() {
        let m = manifest(r#"{"name": "__MSG_extName__", "default_locale": "en"}"#);
        let name = resolve_name(&m, |_| Ok(br#"{"extName": {"message": " Spaced "}}"#.to_vec()));
        assert_eq!(name.as_deref(), Some(" Spaced "));
    }

    #[test]
    fn test_case_insensitive_fallback_takes_first_in_document_order() {
        let m = manifest(r#"{"name": "__MSG_APPNAME__", "default_locale": "en"}"#);
        let bundle = br#"{
            "appName": {"message": "First"},
            "AppName": {"message": "Second"},
            "appname": {"message": "Third"}
        }"#;
        for _ in 0..8 {
            assert_eq!(resolve_name(&m, |_| Ok(bundle.to_vec())).as_deref(), Some("First"));
        }
    }

    #[test]
    fn test_literal_name_ignores_failing_loader() {
        let m = manifest(r#"{"name": "uBlock Origin", "default_locale": "en"}"#);
        let name = resolve_name(&m, |_| Err(NameError::MissingDefaultLocale));
        assert_eq!(name.as_deref(), Some("uBlock Origin"));
    }

    #[test]
    fn test_indirected_name_normalizes_locale() {
        let m = manifest(r#"{"name": "__MSG_extName__", "default_locale": "en-US"}"#);
        let mut requested = None;
        let name = resolve_name(&m, |locale| {
            requested = Some(locale.to_string());
            Ok(br#"{"extName": {"message": "Resolved Name"}}"#.to_vec())
        });
        assert_eq!(name.as_deref(), Some("Resolved Name"));
        assert_eq!(requested.as_deref(), Some("en_US"));
    }

    #[test]
    fn test_message_key_lookup_is_case_insensitive_fallback() {
        let m = manifest(r#"{"name": "__MSG_APPNAME__", "default_locale": "en"}"#);
        let name = resolve_name(&m, |_| {
            Ok(br#"{"appName": {"message": "Grammarly", "description": "x"}}"#.to_vec())
        });
        assert_eq!(name.as_deref(), Some("Grammarly"));
    }

    #[test]
    fn test_loader_failure_yields_none() {
        let m = manifest(r#"{"name": "__MSG_extName__", "default_locale": "en"}"#);
        let err = try_resolve_name(&m, |locale| {
            Err(NameError::LocaleUnavailable {
                locale: locale.to_string(),
                reason: "missing".to_string(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, NameError::LocaleUnavailable { .. }));

        assert_eq!(resolve_name(&m, |_| Err(NameError::MissingName)), None);
    }

    #[test]
    fn test_empty_locale_document_yields_none() {
        let m = manifest(r#"{"name": "__MSG_extName__", "default_locale": "en"}"#);
        let err = try_resolve_name(&m, |_| Ok(Vec::new())).unwrap_err();
        assert!(matches!(err, NameError::MalformedLocale(_)));
    }

    #[test]
    fn test_missing_default_locale() {
        let m = manifest(r#"{"name": "__MSG_extName__"}"#);
        assert_eq!(
            try_resolve_name(&m, unreachable_loader),
            Err(NameError::MissingDefaultLocale)
        );
    }

    #[test]
    fn test_missing_message_key() {
        let m = manifest(r#"{"name": "__MSG_extName__", "default_locale": "de"}"#);
        let bundle = br#"{"other": {"message": "x"}}"#;
        let err = try_resolve_name(&m, |_| Ok(bundle.to_vec())).unwrap_err();
        assert_eq!(err, NameError::MissingMessage { key: "extName".to_string() });
    }

    #[test]
    fn test_nested_indirection_is_rejected() {
        let m = manifest(r#"{"name": "__MSG_a__", "default_locale": "en"}"#);
        let bundle = br#"{"a": {"message": "__MSG_b__"}}"#;
        let err = try_resolve_name(&m, |_| Ok(bundle.to_vec())).unwrap_err();
        assert_eq!(err, NameError::NestedIndirection { key: "a".to_string() });
    }

    #[test]
    fn test_missing_or_non_string_name() {
        assert_eq!(
            try_resolve_name(&manifest(r#"{"version": "1.0"}"#), unreachable_loader),
            Err(NameError::MissingName)
        );
        assert_eq!(
            try_resolve_name(&manifest(r#"{"name": 42}"#), unreachable_loader),
            Err(NameError::MissingName)
        );
        assert_eq!(
            try_resolve_name(&manifest(r#"{"name": "  "}"#), unreachable_loader),
            Err(NameError::EmptyName)
        );
    }

    #[test]
    fn test_manifest_parse_failures() {
        assert!(matches!(Manifest::parse(b""), Err(NameError::Malformed(_))));
        assert!(matches!(Manifest::parse(b"{not json"), Err(NameError::Malformed(_))));
    }

    #[test]
    fn test_manifest_parse_strips_bom() {
        let m = Manifest::parse(b"\xEF\xBB\xBF{\"name\": \"BOM\", \"version\": \"2.1\"}").unwrap();
        assert_eq!(m.name.as_deref(), Some("BOM"));
        assert_eq!(m.version.as_deref(), Some("2.1"));
    }

    #[test]
    fn test_message_key() {
        assert_eq!(message_key("__MSG_extName__"), Some("extName"));
        assert_eq!(message_key("__MSG_extName"), Some("extName"));
        assert_eq!(message_key("Plain"), None);
    }
}
