//! Core data types for discovered profiles and extensions.
//!
//! - [`BrowserVariant`] - Which browser vendor a record belongs to
//! - [`ProfileRecord`] - One user profile found on disk
//! - [`ExtensionRecord`] - One installed extension inside a profile
//! - [`Platform`] - Operating system platform
//!
//! # Example
//!
//! ```
//! use safarify::{BrowserVariant, ProfileRecord};
//!
//! let profile = ProfileRecord::new("Default", "/tmp/Default/Extensions", BrowserVariant::Chrome);
//! assert_eq!(profile.id, "Default");
//! ```

mod extension;
mod profile;

pub use extension::*;
pub use profile::*;
