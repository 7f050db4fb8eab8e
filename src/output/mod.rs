mod cli;
mod json;

pub use cli::{print_browser_table, print_extension_table, print_profile_table};
pub use json::print_json;

use crate::model::{BrowserVariant, ExtensionRecord, ProfileRecord};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Output format for discovery results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use 'table' or 'json'", s)),
        }
    }
}

/// Whether a browser's profile registry was found.
#[derive(Debug, Clone, Serialize)]
pub struct BrowserStatus {
    pub browser: BrowserVariant,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<PathBuf>,
    pub installed: bool,
}

pub fn print_browsers(browsers: &[BrowserStatus], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_browser_table(browsers),
        OutputFormat::Json => print_json(&browsers),
    }
}

pub fn print_profiles(profiles: &[ProfileRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_profile_table(profiles),
        OutputFormat::Json => print_json(&profiles),
    }
}

pub fn print_extensions(extensions: &[ExtensionRecord], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print_extension_table(extensions),
        OutputFormat::Json => print_json(&extensions),
    }
}
