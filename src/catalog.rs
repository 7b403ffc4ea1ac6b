//! In-memory translation catalog for a single build.
//!
//! A `Catalog` is populated once per build request and then flattened into one
//! `FlattenedMapping` per language. Registration order matters: namespaces are
//! merged in the order they were registered, then plain keys on top of them.

use crate::error::{LocalizeError, Result};
use crate::i18n::Language;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Shape of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// One string per language
    Plain,
    /// A map of sub-keys to strings per language
    Namespace,
}

impl EntryKind {
    /// Parse a record type tag (`PLAIN` / `NAMESPACE`, any case).
    pub fn from_tag(tag: &str) -> Option<EntryKind> {
        if tag.eq_ignore_ascii_case("plain") {
            Some(EntryKind::Plain)
        } else if tag.eq_ignore_ascii_case("namespace") {
            Some(EntryKind::Namespace)
        } else {
            None
        }
    }

    pub fn as_tag(&self) -> &'static str {
        match self {
            EntryKind::Plain => "PLAIN",
            EntryKind::Namespace => "NAMESPACE",
        }
    }
}

/// A value assigned to an entry for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    Text(String),
    Keys(IndexMap<String, String>),
}

#[derive(Debug, Clone)]
enum EntryValues {
    Plain(BTreeMap<Language, String>),
    Namespace(BTreeMap<Language, IndexMap<String, String>>),
}

/// One registered key or namespace.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    code: String,
    values: EntryValues,
}

impl CatalogEntry {
    fn new(code: &str, kind: EntryKind) -> Self {
        let values = match kind {
            EntryKind::Plain => EntryValues::Plain(BTreeMap::new()),
            EntryKind::Namespace => EntryValues::Namespace(BTreeMap::new()),
        };
        Self {
            code: code.to_string(),
            values,
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> EntryKind {
        match self.values {
            EntryValues::Plain(_) => EntryKind::Plain,
            EntryValues::Namespace(_) => EntryKind::Namespace,
        }
    }

    /// Plain value for a language, `None` for namespaces or missing languages.
    pub fn text(&self, language: &Language) -> Option<&str> {
        match &self.values {
            EntryValues::Plain(values) => values.get(language).map(String::as_str),
            EntryValues::Namespace(_) => None,
        }
    }

    /// Namespace sub-map for a language, `None` for plain keys or missing languages.
    pub fn keys(&self, language: &Language) -> Option<&IndexMap<String, String>> {
        match &self.values {
            EntryValues::Namespace(values) => values.get(language),
            EntryValues::Plain(_) => None,
        }
    }

    fn set(&mut self, language: &Language, value: Translation) -> Result<()> {
        match (&mut self.values, value) {
            (EntryValues::Plain(values), Translation::Text(text)) => {
                values.insert(language.clone(), text);
                Ok(())
            }
            (EntryValues::Namespace(values), Translation::Keys(keys)) => {
                values.entry(language.clone()).or_default().extend(keys);
                Ok(())
            }
            (EntryValues::Plain(_), Translation::Keys(_)) => Err(LocalizeError::KindMismatch {
                code: self.code.clone(),
                expected: "string",
            }),
            (EntryValues::Namespace(_), Translation::Text(_)) => Err(LocalizeError::KindMismatch {
                code: self.code.clone(),
                expected: "map",
            }),
        }
    }
}

/// Merged key to string map for one language.
///
/// Iteration follows first insertion; a key overwritten later keeps its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenedMapping {
    language: Language,
    entries: IndexMap<String, String>,
}

impl FlattenedMapping {
    pub fn new(language: Language, entries: IndexMap<String, String>) -> Self {
        Self { language, entries }
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn entries(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    pub fn into_entries(self) -> IndexMap<String, String> {
        self.entries
    }
}

/// Translation entries for exactly one build.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    languages: BTreeSet<Language>,
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog that accepts values for `languages`.
    pub fn new(languages: impl IntoIterator<Item = Language>) -> Self {
        Self {
            languages: languages.into_iter().collect(),
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Languages this catalog was populated for, ordered by code.
    pub fn languages(&self) -> &BTreeSet<Language> {
        &self.languages
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    /// Namespace codes in registration order.
    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.entries_of(EntryKind::Namespace).map(CatalogEntry::code)
    }

    /// Plain key codes in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries_of(EntryKind::Plain).map(CatalogEntry::code)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a new entry.
    ///
    /// # Errors
    /// `DuplicateEntry` if any entry, of either kind, already uses `code`.
    pub fn register(&mut self, code: &str, kind: EntryKind) -> Result<()> {
        if self.index.contains_key(code) {
            return Err(LocalizeError::DuplicateEntry(code.to_string()));
        }

        self.index.insert(code.to_string(), self.entries.len());
        self.entries.push(CatalogEntry::new(code, kind));
        Ok(())
    }

    /// Assign the value of entry `code` for `language`.
    ///
    /// Plain entries take `Translation::Text` and replace any previous value.
    /// Namespace entries take `Translation::Keys`, merged into the existing sub-map.
    ///
    /// # Arguments
    /// * `language` - One of the catalog's languages
    /// * `code` - Code of a registered entry
    /// * `value` - Text for plain entries, a sub-map for namespaces
    ///
    /// # Errors
    /// * `UnknownLanguage` if the catalog was not created for `language`
    /// * `InvalidRecord` if `code` was never registered
    /// * `KindMismatch` if the value shape does not match the entry kind
    pub fn set_value(&mut self, language: &Language, code: &str, value: Translation) -> Result<()> {
        if !self.languages.contains(language) {
            return Err(LocalizeError::UnknownLanguage(language.code().to_string()));
        }

        let index = *self.index.get(code).ok_or_else(|| LocalizeError::InvalidRecord {
            code: code.to_string(),
            reason: "entry is not registered".to_string(),
        })?;

        self.entries[index].set(language, value)
    }

    /// Flatten every entry for one language.
    ///
    /// Namespaces are merged first in registration order (later ones overwrite
    /// earlier ones), then plain keys, which overwrite any namespace key of
    /// the same name.
    ///
    /// # Arguments
    /// * `code` - Language code, e.g. "en"
    ///
    /// # Returns
    /// The merged key to string map. Keys keep the position of their first
    /// insertion, so exports follow registration order.
    ///
    /// # Errors
    /// `UnknownLanguage` if the catalog has no values for `code`.
    pub fn build_language(&self, code: &str) -> Result<FlattenedMapping> {
        let language = self.language_for(code)?;
        let mut mapping = IndexMap::new();

        for entry in self.entries_of(EntryKind::Namespace) {
            if let Some(keys) = entry.keys(language) {
                mapping.extend(keys.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }

        for entry in self.entries_of(EntryKind::Plain) {
            if let Some(text) = entry.text(language) {
                mapping.insert(entry.code.clone(), text.to_string());
            }
        }

        debug!("Built {} keys for language {}", mapping.len(), language);
        Ok(FlattenedMapping::new(language.clone(), mapping))
    }

    /// Flatten only the plain keys for one language.
    pub fn build_keys(&self, code: &str) -> Result<FlattenedMapping> {
        let language = self.language_for(code)?;
        let mapping = self
            .entries_of(EntryKind::Plain)
            .filter_map(|entry| {
                entry
                    .text(language)
                    .map(|text| (entry.code.clone(), text.to_string()))
            })
            .collect();

        Ok(FlattenedMapping::new(language.clone(), mapping))
    }

    /// The sub-map of a single namespace for one language.
    ///
    /// # Errors
    /// * `UnknownNamespace` if no namespace entry is named `namespace`
    /// * `UnknownLanguage` if the catalog has no values for `code`
    pub fn build_namespace(&self, namespace: &str, code: &str) -> Result<FlattenedMapping> {
        let entry = self
            .get(namespace)
            .filter(|entry| entry.kind() == EntryKind::Namespace)
            .ok_or_else(|| LocalizeError::UnknownNamespace(namespace.to_string()))?;
        let language = self.language_for(code)?;

        let mapping = entry.keys(language).cloned().unwrap_or_default();
        Ok(FlattenedMapping::new(language.clone(), mapping))
    }

    fn language_for(&self, code: &str) -> Result<&Language> {
        self.languages
            .iter()
            .find(|language| language.code() == code)
            .ok_or_else(|| LocalizeError::UnknownLanguage(code.to_string()))
    }

    fn entries_of(&self, kind: EntryKind) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(move |entry| entry.kind() == kind)
    }
}
