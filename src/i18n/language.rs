//! Language type: validated language code.
//!
//! A `Language` can only be obtained from a `LanguageRegistry`, so holding one
//! means the code was part of the supported set when it was resolved.

use crate::error::Result;
use crate::i18n::LanguageRegistry;
use serde::Serialize;
use std::fmt;

/// A validated language code (e.g., "en", "de").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Language {
    code: String,
}

impl Language {
    pub(crate) fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
        }
    }

    /// Resolve a code against the global registry.
    ///
    /// # Errors
    /// * `Configuration` if the embedded registry cannot be loaded
    /// * `UnknownLanguage` if the code is not supported
    pub fn from_code(code: &str) -> Result<Language> {
        LanguageRegistry::get()?.language(code)
    }

    /// Get the language code.
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl AsRef<str> for Language {
    fn as_ref(&self) -> &str {
        &self.code
    }
}
