//! Web export: a pretty-printed JSON object with sorted keys.

use crate::catalog::FlattenedMapping;
use crate::error::{LocalizeError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::BTreeMap;

const INDENT: &[u8] = b"    ";

/// Encode a mapping as a JSON object.
///
/// Keys are sorted, nesting is indented by four spaces and there is no
/// trailing newline, so equal mappings always produce equal bytes.
pub fn to_json(mapping: &FlattenedMapping) -> Result<Vec<u8>> {
    let sorted: BTreeMap<&str, &str> = mapping.iter().collect();

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    sorted
        .serialize(&mut serializer)
        .map_err(|e| LocalizeError::Encode(e.to_string()))?;

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    fn mapping(pairs: &[(&str, &str)]) -> FlattenedMapping {
        FlattenedMapping::new(
            Language::from_code("en").unwrap(),
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_to_json_sorted_and_indented() {
        let json = to_json(&mapping(&[("zebra", "Z"), ("apple", "A")])).unwrap();
        assert_eq!(
            String::from_utf8(json).unwrap(),
            "{\n    \"apple\": \"A\",\n    \"zebra\": \"Z\"\n}"
        );
    }

    #[test]
    fn test_to_json_empty_mapping() {
        let json = to_json(&mapping(&[])).unwrap();
        assert_eq!(json, b"{}");
    }

    #[test]
    fn test_to_json_escapes_and_keeps_unicode() {
        let json = to_json(&mapping(&[("quote", "say \"hi\"\n"), ("de", "Grüße")])).unwrap();
        let text = String::from_utf8(json).unwrap();
        assert!(text.contains(r#""say \"hi\"\n""#));
        assert!(text.contains("Grüße"));
    }

    proptest! {
        #[test]
        fn test_to_json_round_trip(entries in prop::collection::hash_map(".*", ".*", 0..16)) {
            let original: IndexMap<String, String> = entries.into_iter().collect();
            let mapping = FlattenedMapping::new(Language::from_code("en").unwrap(), original.clone());

            let decoded: IndexMap<String, String> =
                serde_json::from_slice(&to_json(&mapping).unwrap()).unwrap();
            prop_assert_eq!(decoded, original);
        }
    }
}
