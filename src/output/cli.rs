use super::BrowserStatus;
use crate::model::{ExtensionRecord, ProfileRecord};
use anyhow::Result;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct BrowserRow {
    #[tabled(rename = "Browser")]
    browser: String,
    #[tabled(rename = "Installed")]
    installed: String,
    #[tabled(rename = "State File")]
    state_file: String,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Browser")]
    browser: String,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Folder")]
    id: String,
    #[tabled(rename = "Extensions Directory")]
    location: String,
}

#[derive(Tabled)]
struct ExtensionRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Location")]
    location: String,
}

pub fn print_browser_table(browsers: &[BrowserStatus]) -> Result<()> {
    let rows: Vec<BrowserRow> = browsers
        .iter()
        .map(|b| BrowserRow {
            browser: b.browser.display_name().to_string(),
            installed: if b.installed { "yes" } else { "no" }.to_string(),
            state_file: b
                .state_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

pub fn print_profile_table(profiles: &[ProfileRecord]) -> Result<()> {
    if profiles.is_empty() {
        println!("No profiles found.");
        return Ok(());
    }

    println!("Found {} profiles:", profiles.len());
    println!();

    let rows: Vec<ProfileRow> = profiles
        .iter()
        .map(|p| ProfileRow {
            browser: p.browser.display_name().to_string(),
            name: truncate(&p.name, 40),
            id: truncate(&p.id, 40),
            location: p.location.display().to_string(),
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

pub fn print_extension_table(extensions: &[ExtensionRecord]) -> Result<()> {
    if extensions.is_empty() {
        println!("No extensions found.");
        return Ok(());
    }

    println!("Found {} extensions:", extensions.len());
    println!();

    let rows: Vec<ExtensionRow> = extensions.iter().map(extension_row).collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

fn extension_row(extension: &ExtensionRecord) -> ExtensionRow {
    ExtensionRow {
        name: truncate(&extension.name, 50),
        version: extension.version.clone().unwrap_or_else(|| "-".to_string()),
        kind: if extension.is_packaged() { "package" } else { "unpacked" }.to_string(),
        location: extension.location.display().to_string(),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long extension name", 10), "a very ...");
        assert_eq!(truncate("ÄÖÜäöüßéèê", 6), "ÄÖÜ...");
    }

    #[test]
    fn test_extension_row_kind() {
        let packaged = ExtensionRecord::new("Addon", "/p/extensions/addon@example.com.xpi");
        let row = extension_row(&packaged);
        assert_eq!(row.kind, "package");
        assert_eq!(row.version, "-");

        let unpacked = ExtensionRecord::new("Honey", "/p/Extensions/id/1.0_0")
            .with_version(Some("1.0".to_string()));
        let row = extension_row(&unpacked);
        assert_eq!(row.kind, "unpacked");
        assert_eq!(row.version, "1.0");
    }
}
