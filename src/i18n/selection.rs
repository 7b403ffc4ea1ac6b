//! Language selection for one build.
//!
//! A request may name the languages of its application. When it does not, every
//! registry language takes part. A configured allowlist narrows either set.

use crate::error::Result;
use crate::i18n::{Language, LanguageRegistry};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Service-wide restriction on the languages a build may produce.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LanguageFilter {
    /// No restriction
    #[default]
    All,
    /// Only these codes
    Only(BTreeSet<String>),
}

impl LanguageFilter {
    pub fn allows(&self, code: &str) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::Only(codes) => codes.contains(code),
        }
    }
}

impl FromStr for LanguageFilter {
    type Err = std::convert::Infallible;

    /// `ALL` (any case) or a comma-separated list of codes.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(LanguageFilter::All);
        }

        Ok(LanguageFilter::Only(
            trimmed
                .split(',')
                .map(|code| code.trim().to_lowercase())
                .filter(|code| !code.is_empty())
                .collect(),
        ))
    }
}

/// Resolve the languages of one build.
///
/// # Arguments
/// * `registry` - Supported languages
/// * `filter` - Configured allowlist
/// * `requested` - Application languages of the request; empty means "all"
///
/// # Errors
/// `UnknownLanguage` if a requested code is not in the registry.
pub fn select_languages(
    registry: &LanguageRegistry,
    filter: &LanguageFilter,
    requested: &[String],
) -> Result<BTreeSet<Language>> {
    let candidates = if requested.is_empty() {
        registry.supported_languages()
    } else {
        requested
            .iter()
            .map(|code| registry.language(code))
            .collect::<Result<BTreeSet<_>>>()?
    };

    Ok(candidates
        .into_iter()
        .filter(|language| filter.allows(language.code()))
        .collect())
}
