//! iOS export: `Localizable.strings` lines.

use crate::catalog::FlattenedMapping;

/// Encode a mapping as `"key" = "value";` lines joined by newlines.
///
/// Lines follow mapping order. Backslashes, quotes and control whitespace
/// are backslash-escaped.
pub fn to_apple_strings(mapping: &FlattenedMapping) -> Vec<u8> {
    mapping
        .iter()
        .map(|(key, value)| format!("\"{}\" = \"{}\";", escape(key), escape(value)))
        .collect::<Vec<_>>()
        .join("\n")
        .into_bytes()
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
