pub mod browser;
pub mod config;
pub mod error;
pub mod manifest;
pub mod model;
pub mod output;
pub mod platform;

pub use browser::Browser;
pub use config::Config;
pub use error::{DiscoveryError, NameError};
pub use manifest::{resolve_name, Manifest};
pub use model::{BrowserVariant, ExtensionRecord, Platform, ProfileRecord};
