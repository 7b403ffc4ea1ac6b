//! Conversion of raw persisted records into a fresh `Catalog`.

use crate::catalog::{Catalog, EntryKind, Translation};
use crate::error::{LocalizeError, Result};
use crate::i18n::Language;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

/// A translation record as supplied by the persistence layer.
///
/// `kind` is kept as the raw tag so that an unrecognized kind is reported as a
/// validation failure for this record rather than a decode failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub code: String,
    #[serde(alias = "type")]
    pub kind: String,
    #[serde(alias = "i18n", default = "empty_object")]
    pub translations: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl RawRecord {
    /// A plain record from `(language, value)` pairs.
    pub fn plain<'a>(code: &str, values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let translations = values
            .into_iter()
            .map(|(language, value)| (language.to_string(), Value::String(value.to_string())))
            .collect();
        Self {
            code: code.to_string(),
            kind: EntryKind::Plain.as_tag().to_string(),
            translations: Value::Object(translations),
        }
    }

    /// A namespace record; `translations` maps languages to objects.
    pub fn namespace(code: &str, translations: Value) -> Self {
        Self {
            code: code.to_string(),
            kind: EntryKind::Namespace.as_tag().to_string(),
            translations,
        }
    }
}

/// Build a fresh catalog holding `records` for `languages`.
///
/// Plain records get one string per language (empty if absent). Namespace
/// records get one sub-map per language (empty if absent); non-string values
/// inside a sub-map are dropped.
///
/// # Errors
/// `InvalidRecord` for an unrecognized kind, non-object translations, a plain
/// value that is not a string or a namespace value that is not an object;
/// `DuplicateEntry` when two records share a code. The first failure aborts
/// the whole ingestion.
pub fn ingest<'a>(
    records: &[RawRecord],
    languages: impl IntoIterator<Item = &'a Language>,
) -> Result<Catalog> {
    let languages: Vec<Language> = languages.into_iter().cloned().collect();
    let mut catalog = Catalog::new(languages.iter().cloned());

    for record in records {
        let kind = EntryKind::from_tag(&record.kind).ok_or_else(|| {
            invalid(record, format!("unrecognized kind '{}'", record.kind))
        })?;

        let translations = record
            .translations
            .as_object()
            .ok_or_else(|| invalid(record, "translations must be an object".to_string()))?;

        catalog.register(&record.code, kind)?;

        for language in &languages {
            let value = translations.get(language.code());
            let translation = match kind {
                EntryKind::Plain => Translation::Text(plain_value(record, language, value)?),
                EntryKind::Namespace => Translation::Keys(namespace_value(record, language, value)?),
            };
            catalog.set_value(language, &record.code, translation)?;
        }
    }

    info!(
        "Ingested {} records for {} languages",
        catalog.len(),
        languages.len()
    );
    Ok(catalog)
}

fn plain_value(record: &RawRecord, language: &Language, value: Option<&Value>) -> Result<String> {
    match value {
        None => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(invalid(
            record,
            format!("value for '{}' must be a string", language),
        )),
    }
}

fn namespace_value(
    record: &RawRecord,
    language: &Language,
    value: Option<&Value>,
) -> Result<IndexMap<String, String>> {
    match value {
        None => Ok(IndexMap::new()),
        Some(Value::Object(keys)) => Ok(keys
            .iter()
            .filter_map(|(key, item)| item.as_str().map(|text| (key.clone(), text.to_string())))
            .collect()),
        Some(_) => Err(invalid(
            record,
            format!("value for '{}' must be an object", language),
        )),
    }
}

fn invalid(record: &RawRecord, reason: String) -> LocalizeError {
    LocalizeError::InvalidRecord {
        code: record.code.clone(),
        reason,
    }
}
