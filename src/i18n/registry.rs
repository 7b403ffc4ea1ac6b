//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is loaded from a fixture dataset (a JSON array of records shaped
//! like `{"model": ..., "pk": 1, "fields": {"code": "en", "name": ..., "native": ...}}`).
//! The embedded dataset backs a process-wide singleton initialized with `OnceLock`;
//! alternate datasets can be loaded into standalone registries.

use crate::error::{LocalizeError, Result};
use crate::i18n::Language;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::path::Path;
use std::sync::OnceLock;

/// Reference dataset compiled into the crate.
const EMBEDDED_FIXTURE: &str = include_str!("../../fixtures/localizelanguages.json");

/// Configuration for a supported language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// Short language code (e.g., "en", "de")
    pub code: String,

    /// English name of the language (e.g., "German")
    pub name: Option<String>,

    /// Native name of the language (e.g., "Deutsch")
    pub native_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FixtureRecord {
    #[serde(default)]
    fields: FixtureFields,
}

#[derive(Debug, Default, Deserialize)]
struct FixtureFields {
    code: Option<String>,
    name: Option<String>,
    native: Option<String>,
}

/// Immutable set of languages every build and export is validated against.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

static CODE_REGEX: OnceLock<Regex> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global registry backed by the embedded dataset.
    ///
    /// The dataset is parsed on first call; later calls return the same instance.
    /// A malformed dataset yields `LocalizeError::Configuration` on every call.
    pub fn get() -> Result<&'static LanguageRegistry> {
        if let Some(registry) = REGISTRY.get() {
            return Ok(registry);
        }

        let registry = Self::from_fixture_json(EMBEDDED_FIXTURE)?;
        Ok(REGISTRY.get_or_init(|| registry))
    }

    /// Parse a registry from fixture JSON.
    ///
    /// # Errors
    /// `LocalizeError::Configuration` if the JSON is not an array of fixture
    /// records, a record has no code, a code is not 2-3 lowercase letters,
    /// a code repeats, or the dataset is empty.
    pub fn from_fixture_json(json: &str) -> Result<Self> {
        let records: Vec<FixtureRecord> = serde_json::from_str(json)
            .map_err(|e| LocalizeError::Configuration(format!("malformed language fixture: {}", e)))?;

        let code_regex = CODE_REGEX.get_or_init(|| Regex::new(r"^[a-z]{2,3}$").expect("valid regex"));

        let mut seen = HashSet::new();
        let mut languages = Vec::with_capacity(records.len());

        for (index, record) in records.into_iter().enumerate() {
            let code = record.fields.code.ok_or_else(|| {
                LocalizeError::Configuration(format!("language record #{} has no code", index))
            })?;

            if !code_regex.is_match(&code) {
                return Err(LocalizeError::Configuration(format!(
                    "invalid language code '{}' in record #{}",
                    code, index
                )));
            }

            if !seen.insert(code.clone()) {
                return Err(LocalizeError::Configuration(format!(
                    "duplicate language code '{}'",
                    code
                )));
            }

            languages.push(LanguageConfig {
                code,
                name: record.fields.name,
                native_name: record.fields.native,
            });
        }

        if languages.is_empty() {
            return Err(LocalizeError::Configuration(
                "language fixture contains no languages".to_string(),
            ));
        }

        Ok(Self { languages })
    }

    /// Load a registry from a fixture file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            LocalizeError::Configuration(format!(
                "cannot read language fixture {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_fixture_json(&json)
    }

    /// Get a language configuration by its code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Check if a language code is supported.
    pub fn contains(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Resolve a code into a validated `Language`.
    ///
    /// # Errors
    /// `LocalizeError::UnknownLanguage` if the code is not in the registry.
    pub fn language(&self, code: &str) -> Result<Language> {
        self.get_by_code(code)
            .map(|config| Language::new(&config.code))
            .ok_or_else(|| LocalizeError::UnknownLanguage(code.to_string()))
    }

    /// All languages, in dataset order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// The full set of supported languages, ordered by code.
    pub fn supported_languages(&self) -> BTreeSet<Language> {
        self.languages
            .iter()
            .map(|config| Language::new(&config.code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Global Registry Tests ====================

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get().unwrap();
        let registry2 = LanguageRegistry::get().unwrap();

        // Should return the same instance (same memory address)
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_embedded_registry_contains_core_languages() {
        let registry = LanguageRegistry::get().unwrap();
        for code in ["en", "de", "ro", "ru"] {
            assert!(registry.contains(code), "missing {}", code);
        }
    }

    #[test]
    fn test_get_by_code_german() {
        let registry = LanguageRegistry::get().unwrap();
        let config = registry.get_by_code("de").unwrap();

        assert_eq!(config.code, "de");
        assert_eq!(config.name.as_deref(), Some("German"));
        assert_eq!(config.native_name.as_deref(), Some("Deutsch"));
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        let registry = LanguageRegistry::get().unwrap();
        assert!(registry.get_by_code("xx").is_none());
        assert!(!registry.contains(""));
    }

    #[test]
    fn test_supported_languages_is_idempotent() {
        let registry = LanguageRegistry::get().unwrap();
        let first = registry.supported_languages();
        let second = registry.supported_languages();

        assert_eq!(first, second);
        assert_eq!(first.len(), registry.list_all().len());
    }

    #[test]
    fn test_language_unknown_code() {
        let registry = LanguageRegistry::get().unwrap();
        let err = registry.language("klingon").unwrap_err();
        assert!(matches!(err, LocalizeError::UnknownLanguage(code) if code == "klingon"));
    }

    // ==================== Fixture Parsing Tests ====================

    #[test]
    fn test_from_fixture_json_minimal() {
        let registry = LanguageRegistry::from_fixture_json(
            r#"[{"model": "x", "pk": 1, "fields": {"code": "en"}},
                {"model": "x", "pk": 2, "fields": {"code": "de", "name": "German", "native": null}}]"#,
        )
        .unwrap();

        let codes: Vec<_> = registry.list_all().iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, vec!["en", "de"]);
        assert_eq!(registry.get_by_code("en").unwrap().name, None);
    }

    #[test]
    fn test_from_fixture_json_rejects_malformed() {
        let cases = [
            "not json",
            r#"{"fields": {"code": "en"}}"#,
            "[]",
            r#"[{"fields": {"name": "English"}}]"#,
            r#"[{"fields": {"code": "EN"}}]"#,
            r#"[{"fields": {"code": "english"}}]"#,
            r#"[{"fields": {"code": "en"}}, {"fields": {"code": "en"}}]"#,
        ];

        for case in cases {
            let result = LanguageRegistry::from_fixture_json(case);
            assert!(
                matches!(result, Err(LocalizeError::Configuration(_))),
                "expected configuration error for {}",
                case
            );
        }
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = LanguageRegistry::from_path(Path::new("/nonexistent/languages.json"));
        assert!(matches!(result, Err(LocalizeError::Configuration(_))));
    }
}
