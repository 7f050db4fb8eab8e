//! Minimal INI reader for Firefox's `profiles.ini`.
//!
//! Supports `[Section]` headers, `Key=Value` pairs, `;`/`#` comments and
//! optionally quoted values. Entries before the first header land in a
//! section with an empty name.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniSection {
    pub name: String,
    entries: Vec<(String, String)>,
}

impl IniSection {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Returns the value of `key`. Later duplicates override earlier ones.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parses INI text into sections in document order.
pub fn parse(text: &str) -> Vec<IniSection> {
    let mut sections = Vec::new();
    let mut current = IniSection::new("");

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let finished = std::mem::replace(&mut current, IniSection::new(header.trim()));
            if !finished.name.is_empty() || !finished.entries.is_empty() {
                sections.push(finished);
            }
            continue;
        }

        // Lines without '=' carry no value.
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        current
            .entries
            .push((key.trim().to_string(), unquote(value.trim()).to_string()));
    }

    if !current.name.is_empty() || !current.entries.is_empty() {
        sections.push(current);
    }

    sections
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
