//! Client platforms and their export formats.
//!
//! Each `Platform` owns three things: an encoder for a `FlattenedMapping`, the
//! path convention its clients expect inside bundles, and the name of its
//! single-platform archive.
//!
//! | Platform | Format | Path | Archive |
//! |---|---|---|---|
//! | iOS | `.strings` | `<language>.lproj/Localizable.strings` | `Localizable.zip` |
//! | Android | resource XML | `values-<language>/strings.xml` | `strings.zip` |
//! | Web | JSON | `<language>/locales.json` | `locales.zip` |

mod android;
mod apple;
mod json;

pub use android::to_android_xml;
pub use apple::to_apple_strings;
pub use json::to_json;

use crate::catalog::FlattenedMapping;
use crate::error::{LocalizeError, Result};
use crate::i18n::Language;
use std::fmt;
use std::str::FromStr;

/// A client platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl Platform {
    /// Every platform, in all-platform bundle order.
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Web];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "IOS",
            Platform::Android => "ANDROID",
            Platform::Web => "WEB",
        }
    }

    /// Top-level directory holding one language's file.
    pub fn language_dir(&self, language: &Language) -> String {
        match self {
            Platform::Ios => format!("{}.lproj", language),
            Platform::Android => format!("values-{}", language),
            Platform::Web => language.to_string(),
        }
    }

    /// Path of one language's file, relative to the bundle root, `/` separated.
    pub fn file_path(&self, language: &Language) -> String {
        let file_name = match self {
            Platform::Ios => "Localizable.strings",
            Platform::Android => "strings.xml",
            Platform::Web => "locales.json",
        };
        format!("{}/{}", self.language_dir(language), file_name)
    }

    /// File name of the single-platform archive.
    pub fn archive_name(&self) -> &'static str {
        match self {
            Platform::Ios => "Localizable.zip",
            Platform::Android => "strings.zip",
            Platform::Web => "locales.zip",
        }
    }

    /// Serialize a mapping in this platform's format.
    pub fn encode(&self, mapping: &FlattenedMapping) -> Result<Vec<u8>> {
        match self {
            Platform::Ios => Ok(to_apple_strings(mapping)),
            Platform::Android => to_android_xml(mapping),
            Platform::Web => to_json(mapping),
        }
    }
}

impl FromStr for Platform {
    type Err = LocalizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "IOS" => Ok(Platform::Ios),
            "ANDROID" => Ok(Platform::Android),
            "WEB" => Ok(Platform::Web),
            _ => Err(LocalizeError::UnsupportedPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialize a mapping for a platform named by its code.
///
/// # Errors
/// `UnsupportedPlatform` if `target` is not `IOS`, `ANDROID` or `WEB`.
pub fn export(target: &str, mapping: &FlattenedMapping) -> Result<Vec<u8>> {
    target.parse::<Platform>()?.encode(mapping)
}
