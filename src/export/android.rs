//! Android export: a `resources` document of `string` elements.

use crate::catalog::FlattenedMapping;
use crate::error::{LocalizeError, Result};

const DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>\n";

/// Text written for an empty value so the element is never self-closing.
pub const EMPTY_VALUE: &str = " ";

/// Encode a mapping as an Android string resource file.
///
/// One `<string name="key">value</string>` per entry, in mapping order, each
/// indented by one tab. Empty values are written as a single space.
///
/// # Errors
/// `Encode` if a key or value holds a character XML 1.0 cannot represent,
/// such as a C0 control other than tab, newline and carriage return.
pub fn to_android_xml(mapping: &FlattenedMapping) -> Result<Vec<u8>> {
    let mut out = String::from(DECLARATION);

    if mapping.is_empty() {
        out.push_str("<resources />");
        return Ok(out.into_bytes());
    }

    out.push_str("<resources>\n");
    for (key, value) in mapping.iter() {
        check_representable(key)?;
        check_representable(value)?;
        let text = if value.is_empty() { EMPTY_VALUE } else { value };
        out.push_str("\t<string name=\"");
        escape_attribute(key, &mut out);
        out.push_str("\">");
        escape_text(text, &mut out);
        out.push_str("</string>\n");
    }
    out.push_str("</resources>");

    Ok(out.into_bytes())
}

/// Not even a character reference can carry these in XML 1.0.
fn is_xml_forbidden(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' | '\u{fffe}' | '\u{ffff}'
    )
}

fn check_representable(value: &str) -> Result<()> {
    match value.chars().find(|&c| is_xml_forbidden(c)) {
        Some(c) => Err(LocalizeError::Encode(format!(
            "U+{:04X} in {:?} cannot be written to Android XML",
            c as u32, value
        ))),
        None => Ok(()),
    }
}

fn escape_text(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            // Parsers normalize a literal CR to LF
            '\r' => out.push_str("&#13;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#09;"),
            _ => out.push(c),
        }
    }
}
