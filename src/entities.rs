/*
** This file is a part of xmlevents (streaming XML event protocol)
** Copyright (C) 2021-2025 The xmlevents authors
**
** xmlevents is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Escaping of text for the four XML output contexts and the inverse
//! reference decoding.
//!
//! | Function                        | `&` | `<` | `>` | `"` | `'` |
//! |---------------------------------|-----|-----|-----|-----|-----|
//! | [escape_all]                    | yes | yes | yes | yes | yes |
//! | [escape_text]                   | yes | yes |     |     |     |
//! | [escape_double_quoted_value]    | yes | yes |     | yes |     |
//! | [escape_single_quoted_value]    | yes | yes |     |     | yes |
//!
//! Entity values keep their references as written and have their own
//! rules, see [escape_entity_value].

use std::borrow::Cow;

use memchr::memchr;
use memchr::memchr2;
use memchr::memchr3;

pub mod predefined {
    pub const LT: &str = "&lt;";
    pub const GT: &str = "&gt;";
    pub const AMP: &str = "&amp;";
    pub const APOS: &str = "&apos;";
    pub const QUOT: &str = "&quot;";
}

/// Error from decoding the references in a text.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ReferenceError {
    #[error("reference is not terminated with ';'")]
    Unterminated,
    #[error("invalid character reference '&{0};'")]
    InvalidCharacter(String),
    #[error("reference to unknown entity '&{0};'")]
    Unresolved(String),
}

fn escape_all_byte(c: u8) -> Option<&'static str> {
    match c {
        b'&' => Some(predefined::AMP),
        b'<' => Some(predefined::LT),
        b'>' => Some(predefined::GT),
        b'"' => Some(predefined::QUOT),
        b'\'' => Some(predefined::APOS),
        _ => None,
    }
}

fn escape_text_byte(c: u8) -> Option<&'static str> {
    match c {
        b'&' => Some(predefined::AMP),
        b'<' => Some(predefined::LT),
        _ => None,
    }
}

fn escape_double_quoted_byte(c: u8) -> Option<&'static str> {
    match c {
        b'"' => Some(predefined::QUOT),
        _ => escape_text_byte(c),
    }
}

fn escape_single_quoted_byte(c: u8) -> Option<&'static str> {
    match c {
        b'\'' => Some(predefined::APOS),
        _ => escape_text_byte(c),
    }
}

// Only ASCII bytes are replaced, so all slice positions are char boundaries.
fn escape_from<'a>(
    text: &'a str,
    first: Option<usize>,
    replacement: fn(u8) -> Option<&'static str>,
) -> Cow<'a, str> {
    let Some(first) = first else {
        return Cow::Borrowed(text);
    };

    let mut buf = String::with_capacity(text.len() + 16);
    let mut back = first;
    buf.push_str(&text[..first]);
    for (pos, c) in text.bytes().enumerate().skip(first) {
        if let Some(entity) = replacement(c) {
            buf.push_str(&text[back..pos]);
            buf.push_str(entity);
            back = pos + 1;
        }
    }
    buf.push_str(&text[back..]);
    Cow::Owned(buf)
}

/// Escapes all five predefined entity characters.
pub fn escape_all(text: &str) -> Cow<'_, str> {
    let first = text.bytes().position(|c| escape_all_byte(c).is_some());
    escape_from(text, first, escape_all_byte)
}

/// Escapes character data, only `&` and `<` are replaced.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    let first = memchr2(b'&', b'<', text.as_bytes());
    escape_from(text, first, escape_text_byte)
}

/// Escapes an attribute value to be enclosed in double quotes.
pub fn escape_double_quoted_value(text: &str) -> Cow<'_, str> {
    let first = memchr3(b'&', b'<', b'"', text.as_bytes());
    escape_from(text, first, escape_double_quoted_byte)
}

/// Escapes an attribute value to be enclosed in single quotes.
pub fn escape_single_quoted_value(text: &str) -> Cow<'_, str> {
    let first = memchr3(b'&', b'<', b'\'', text.as_bytes());
    escape_from(text, first, escape_single_quoted_byte)
}

fn starts_reference(rest: &str) -> bool {
    let Some(len) = memchr(b';', rest.as_bytes()) else {
        return false;
    };
    let name = &rest[..len];
    match name.strip_prefix('#') {
        Some(number) => char_reference(number).is_some(),
        None => predefined_entity(name).is_some(),
    }
}

/// Escapes an entity value to be enclosed in double quotes.
///
/// An `&` which starts a character reference or a predefined entity is
/// a reference and is left alone, any other `&` is replaced. `%` and `"`
/// are written as character references, they would otherwise start a
/// parameter entity reference or end the literal.
///
/// ```
/// use xmlevents::entities::escape_entity_value;
///
/// assert_eq!(escape_entity_value("&#38;a; & 100%"), "&#38;a; &amp; 100&#37;");
/// ```
pub fn escape_entity_value(text: &str) -> Cow<'_, str> {
    let bytes = text.as_bytes();
    let Some(first) = memchr3(b'&', b'%', b'"', bytes) else {
        return Cow::Borrowed(text);
    };

    let mut buf = String::with_capacity(text.len() + 16);
    let mut back = first;
    buf.push_str(&text[..first]);
    for (pos, &c) in bytes.iter().enumerate().skip(first) {
        let entity = match c {
            b'"' => "&#34;",
            b'%' => "&#37;",
            b'&' if !starts_reference(&text[pos + 1..]) => predefined::AMP,
            _ => continue,
        };
        buf.push_str(&text[back..pos]);
        buf.push_str(entity);
        back = pos + 1;
    }
    buf.push_str(&text[back..]);
    Cow::Owned(buf)
}

pub(crate) fn is_valid_xml_char(c: u32) -> bool {
    matches!(
        c,
        0x09 | 0x0a | 0x0d | 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff
    )
}

pub(crate) fn predefined_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

/// Decodes the body of a character reference, without the `&#` and `;`.
pub(crate) fn char_reference(body: &str) -> Option<char> {
    let value = match body.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse::<u32>().ok()?,
    };
    if body.is_empty() || body.starts_with(['+', '-']) || body.starts_with("x+") {
        return None;
    }
    if !is_valid_xml_char(value) {
        return None;
    }
    char::from_u32(value)
}

/// Replaces references in a text, asking `resolve` for entities which
/// are not predefined.
pub(crate) fn decode_references<'a, F>(
    text: &'a str,
    mut resolve: F,
) -> Result<Cow<'a, str>, ReferenceError>
where
    F: FnMut(&str) -> Option<String>,
{
    let bytes = text.as_bytes();
    let Some(first) = memchr(b'&', bytes) else {
        return Ok(Cow::Borrowed(text));
    };

    let mut buf = String::with_capacity(text.len());
    buf.push_str(&text[..first]);
    let mut pos = first;
    while pos < bytes.len() {
        if bytes[pos] != b'&' {
            let next = memchr(b'&', &bytes[pos..]).map_or(bytes.len(), |n| pos + n);
            buf.push_str(&text[pos..next]);
            pos = next;
            continue;
        }
        let Some(len) = memchr(b';', &bytes[pos + 1..]) else {
            return Err(ReferenceError::Unterminated);
        };
        let name = &text[pos + 1..pos + 1 + len];
        if let Some(body) = name.strip_prefix('#') {
            match char_reference(body) {
                Some(c) => buf.push(c),
                None => return Err(ReferenceError::InvalidCharacter(name.to_string())),
            }
        } else if let Some(c) = predefined_entity(name) {
            buf.push(c);
        } else {
            match resolve(name) {
                Some(value) => buf.push_str(&value),
                None => return Err(ReferenceError::Unresolved(name.to_string())),
            }
        }
        pos += len + 2;
    }
    Ok(Cow::Owned(buf))
}

/// Decodes the predefined entities and the character references.
///
/// This is the inverse of all the escaping functions:
///
/// ```
/// use xmlevents::entities::{escape_all, unescape};
///
/// let text = r#"<a href="x">Tom & 'Jerry'</a>"#;
/// assert_eq!(unescape(&escape_all(text)).unwrap(), text);
/// ```
pub fn unescape(text: &str) -> Result<Cow<'_, str>, ReferenceError> {
    decode_references(text, |_| None)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "plain text",
        "&",
        "<<>>",
        "a & b < c > d \" e ' f",
        "'\"'\"",
        "&amp; already escaped",
        "ünïcödé & ☃ < ∞",
        "]]>",
    ];

    #[test]
    fn escape_table() {
        let text = "&<>\"'";
        assert_eq!(escape_all(text), "&amp;&lt;&gt;&quot;&apos;");
        assert_eq!(escape_text(text), "&amp;&lt;>\"'");
        assert_eq!(escape_double_quoted_value(text), "&amp;&lt;>&quot;'");
        assert_eq!(escape_single_quoted_value(text), "&amp;&lt;>\"&apos;");
    }

    #[test]
    fn entity_values_keep_references() {
        assert_eq!(
            escape_entity_value("&#38;a; &amp; &#x3C; & &a; &#0;"),
            "&#38;a; &amp; &#x3C; &amp; &amp;a; &amp;#0;"
        );
        assert_eq!(escape_entity_value("say \"50%\" <b>"), "say &#34;50&#37;&#34; <b>");
        assert!(matches!(escape_entity_value("<b>it's</b>"), Cow::Borrowed(_)));
    }

    #[test]
    fn no_escape_borrows() {
        const NOESCAPE: &str = "abc$#@!%^*(){}[]=-+/.,;:FDSF3443";
        assert!(matches!(escape_all(NOESCAPE), Cow::Borrowed(_)));
        assert!(matches!(escape_text("a > b"), Cow::Borrowed(_)));
        assert!(matches!(escape_double_quoted_value("it's"), Cow::Borrowed(_)));
        assert!(matches!(escape_single_quoted_value("\"q\""), Cow::Borrowed(_)));
    }

    #[test]
    fn escape_all_removes_raw_characters() {
        for text in SAMPLES {
            let escaped = escape_all(text);
            for c in ['<', '>', '"', '\''] {
                assert!(!escaped.contains(c), "{escaped}");
            }
            // every remaining & starts an entity
            for (pos, _) in escaped.match_indices('&') {
                assert!(escaped[pos..].contains(';'));
            }
            assert_eq!(unescape(&escaped).unwrap(), *text);
        }
    }

    #[test]
    fn every_mode_round_trips() {
        for text in SAMPLES {
            assert_eq!(unescape(&escape_text(text)).unwrap(), *text);
            assert_eq!(unescape(&escape_double_quoted_value(text)).unwrap(), *text);
            assert_eq!(unescape(&escape_single_quoted_value(text)).unwrap(), *text);
        }
    }

    #[test]
    fn unescape_char_references() {
        assert_eq!(unescape("&#65;&#x42;&#x63;").unwrap(), "ABc");
        assert_eq!(unescape("snow &#x2603;!").unwrap(), "snow ☃!");
        assert_eq!(
            unescape("&#0;"),
            Err(ReferenceError::InvalidCharacter("#0".to_string()))
        );
        assert_eq!(
            unescape("&#xzz;"),
            Err(ReferenceError::InvalidCharacter("#xzz".to_string()))
        );
        assert_eq!(
            unescape("&#;"),
            Err(ReferenceError::InvalidCharacter("#".to_string()))
        );
        assert_eq!(
            unescape("&#-5;"),
            Err(ReferenceError::InvalidCharacter("#-5".to_string()))
        );
    }

    #[test]
    fn unescape_errors() {
        assert_eq!(unescape("a &amp b"), Err(ReferenceError::Unterminated));
        assert_eq!(
            unescape("&nbsp;"),
            Err(ReferenceError::Unresolved("nbsp".to_string()))
        );
    }

    #[test]
    fn decode_with_resolver() {
        let decoded = decode_references("(c) &company; &amp; &lt;", |name| {
            (name == "company").then(|| "ACME & Co".to_string())
        });
        assert_eq!(decoded.unwrap(), "(c) ACME & Co & <");
    }
}
