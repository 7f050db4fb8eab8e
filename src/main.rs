use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use safarify::{
    browser::{configured_browser, discover_profiles, merge_profiles, Browser},
    config::Config,
    model::{BrowserVariant, ExtensionRecord, ProfileRecord},
    output::{print_browsers, print_extensions, print_profiles, BrowserStatus, OutputFormat},
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const ERROR: u8 = 1;
}

#[derive(Parser)]
#[command(name = "safarify")]
#[command(
    author,
    version,
    about = "Find installed browser extensions and the profiles they live in"
)]
struct Cli {
    /// Enable debug logging (including skipped extensions)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List supported browsers and whether their profile registry exists
    Browsers {
        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List browser profiles
    Profiles {
        /// Only list profiles of this browser (firefox, edge, chrome, brave, chromium, vivaldi)
        #[arg(short, long)]
        browser: Option<String>,

        /// Release channel of a Chromium-family browser (beta, dev, canary)
        #[arg(long, requires = "browser")]
        channel: Option<String>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// List the extensions installed in a profile
    Extensions {
        /// Browser the profile belongs to
        #[arg(short, long)]
        browser: String,

        /// Release channel of a Chromium-family browser (beta, dev, canary)
        #[arg(long)]
        channel: Option<String>,

        /// Profile name or folder (defaults to the first listed profile)
        #[arg(short, long, conflicts_with = "dir")]
        profile: Option<String>,

        /// Extensions directory to scan directly
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Output format (table, json)
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Show or create config file
    Config {
        /// Generate default config file
        #[arg(long)]
        init: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(exit_codes::ERROR)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<u8> {
    let mut config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config file: {}", e);
        Config::default()
    });

    match cli.command {
        Commands::Browsers { format } => {
            let format = parse_format(format, &config)?;
            list_browsers(&config, format)?;
        }
        Commands::Profiles {
            browser,
            channel,
            format,
        } => {
            let format = parse_format(format, &config)?;
            let variants = match browser {
                Some(name) => {
                    let variant = parse_browser(&name)?;
                    apply_channel(&mut config, variant, channel)?;
                    vec![variant]
                }
                None => config.browsers.clone(),
            };
            let profiles = collect_profiles(&variants, &config).await;
            print_profiles(&profiles, format)?;
        }
        Commands::Extensions {
            browser,
            channel,
            profile,
            dir,
            format,
        } => {
            let format = parse_format(format, &config)?;
            let variant = parse_browser(&browser)?;
            apply_channel(&mut config, variant, channel)?;
            let extensions = run_extensions(variant, profile, dir, &config, format).await?;
            print_extensions(&extensions, format)?;
        }
        Commands::Config { init, path } => {
            handle_config(init, path)?;
        }
    }

    Ok(exit_codes::SUCCESS)
}

fn list_browsers(config: &Config, format: OutputFormat) -> Result<()> {
    let statuses: Vec<BrowserStatus> = BrowserVariant::ALL
        .into_iter()
        .map(|variant| {
            let browser = configured_browser(variant, config);
            BrowserStatus {
                browser: variant,
                state_file: browser.state_file(),
                installed: browser.is_installed(),
            }
        })
        .collect();

    print_browsers(&statuses, format)
}

/// Discovers profiles for every requested browser; failing browsers are reported and skipped.
async fn collect_profiles(variants: &[BrowserVariant], config: &Config) -> Vec<ProfileRecord> {
    let browsers: Vec<Box<dyn Browser>> = variants
        .iter()
        .map(|variant| configured_browser(*variant, config))
        .collect();

    let found = discover_profiles(&browsers).await;
    for entry in &found {
        if let Err(e) = &entry.result {
            warn!("Skipping {}: {}", entry.variant, e);
        }
    }

    merge_profiles(found)
        .into_iter()
        .filter(|p| !config.ignore.should_ignore_profile(&p.name))
        .collect()
}

async fn run_extensions(
    variant: BrowserVariant,
    profile: Option<String>,
    dir: Option<PathBuf>,
    config: &Config,
    format: OutputFormat,
) -> Result<Vec<ExtensionRecord>> {
    let browser = configured_browser(variant, config);

    let extensions_dir = match dir {
        Some(dir) => dir,
        None => {
            let profiles = browser
                .list_profiles()
                .await
                .with_context(|| format!("Cannot list {} profiles", browser.name()))?;
            select_profile(&profiles, profile.as_deref())?.location.clone()
        }
    };

    let spinner = if format == OutputFormat::Table {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Reading {} extensions...", browser.name()));
        Some(pb)
    } else {
        None
    };

    let extensions: Vec<ExtensionRecord> = browser
        .list_extensions(&extensions_dir)
        .await
        .into_iter()
        .filter(|e| !config.ignore.should_ignore_extension(&e.name))
        .collect();

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    Ok(extensions)
}

/// Overrides the configured channel with the one given on the command line.
fn apply_channel(
    config: &mut Config,
    variant: BrowserVariant,
    channel: Option<String>,
) -> Result<()> {
    let Some(channel) = channel else {
        return Ok(());
    };
    if !config.channels.set_channel(variant, channel) {
        bail!("{} has no release channel folders; use its profiles instead", variant);
    }
    Ok(())
}

/// Picks a profile by display name or folder, or the first one when no name is given.
fn select_profile<'a>(
    profiles: &'a [ProfileRecord],
    wanted: Option<&str>,
) -> Result<&'a ProfileRecord> {
    match wanted {
        None => profiles.first().ok_or_else(|| anyhow!("No profiles found")),
        Some(wanted) => profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(wanted) || p.id.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<_> = profiles.iter().map(|p| p.name.as_str()).collect();
                anyhow!("Unknown profile: {}. Available: {}", wanted, known.join(", "))
            }),
    }
}

fn handle_config(init: bool, show_path: bool) -> Result<()> {
    let config_path = Config::config_path();

    if show_path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if init {
        if config_path.exists() {
            println!("Config file already exists at: {}", config_path.display());
            return Ok(());
        }

        let config = Config::default();
        config.save()?;
        println!("Created config file at: {}", config_path.display());
        println!();
        println!("Default configuration:");
        println!("{}", Config::generate_default_config());
        return Ok(());
    }

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("Config file: {}", config_path.display());
        println!();
        println!("{}", content);
    } else {
        println!("No config file found.");
        println!("Run 'safarify config --init' to create one.");
        println!();
        println!("Config path: {}", config_path.display());
    }

    Ok(())
}

fn parse_format(format: Option<String>, config: &Config) -> Result<OutputFormat> {
    let format = format.unwrap_or_else(|| config.default_format.clone());
    OutputFormat::from_str(&format).map_err(|e| anyhow!(e))
}

fn parse_browser(name: &str) -> Result<BrowserVariant> {
    BrowserVariant::from_str(name).map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, name: &str) -> ProfileRecord {
        ProfileRecord::new(id, format!("/p/{}/Extensions", id), BrowserVariant::Chrome)
            .with_name(name)
    }

    #[test]
    fn test_select_profile() {
        let profiles = vec![profile("Default", "Personal"), profile("Profile 1", "Work")];

        assert_eq!(select_profile(&profiles, None).unwrap().id, "Default");
        assert_eq!(select_profile(&profiles, Some("work")).unwrap().id, "Profile 1");
        assert_eq!(select_profile(&profiles, Some("profile 1")).unwrap().name, "Work");
        assert!(select_profile(&profiles, Some("School")).is_err());
        assert!(select_profile(&[], None).is_err());
    }

    #[test]
    fn test_cli_parses_extensions_command() {
        let cli = Cli::try_parse_from([
            "safarify",
            "extensions",
            "--browser",
            "firefox",
            "--dir",
            "/tmp/x",
        ])
        .unwrap();
        match cli.command {
            Commands::Extensions { browser, dir, profile, .. } => {
                assert_eq!(browser, "firefox");
                assert_eq!(dir, Some(PathBuf::from("/tmp/x")));
                assert!(profile.is_none());
            }
            _ => panic!("expected extensions command"),
        }

        assert!(Cli::try_parse_from([
            "safarify", "extensions", "-b", "chrome", "--profile", "Default", "--dir", "/tmp"
        ])
        .is_err());
    }

    #[test]
    fn test_channel_flag() {
        let cli = Cli::try_parse_from(["safarify", "profiles", "-b", "edge", "--channel", "beta"])
            .unwrap();
        match cli.command {
            Commands::Profiles { browser, channel, .. } => {
                assert_eq!(browser.as_deref(), Some("edge"));
                assert_eq!(channel.as_deref(), Some("beta"));
            }
            _ => panic!("expected profiles command"),
        }

        assert!(Cli::try_parse_from(["safarify", "profiles", "--channel", "beta"]).is_err());
    }

    #[test]
    fn test_apply_channel() {
        let mut config = Config::default();
        apply_channel(&mut config, BrowserVariant::Edge, Some("Dev".to_string())).unwrap();
        assert_eq!(config.channels.channel(BrowserVariant::Edge), Some("Dev"));

        apply_channel(&mut config, BrowserVariant::Edge, None).unwrap();
        assert_eq!(config.channels.channel(BrowserVariant::Edge), Some("Dev"));

        let nightly = Some("Nightly".to_string());
        assert!(apply_channel(&mut config, BrowserVariant::Firefox, nightly).is_err());
    }
}
