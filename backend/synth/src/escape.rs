//! CSS escaping for identifiers and quoted attribute values.

use std::fmt::Write;

/// Escape a string for use as a CSS identifier (id, class, attribute name).
///
/// Follows the CSSOM `CSS.escape()` rules: a leading digit (or a digit after a
/// leading hyphen) and control characters become hex escapes, a lone hyphen is
/// escaped, and any other non-identifier ASCII character is backslash-escaped.
pub fn escape_ident(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    let first = input.chars().next();
    let single = input.chars().nth(1).is_none();

    for (i, ch) in input.chars().enumerate() {
        match ch {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => hex_escape(&mut out, ch),
            '0'..='9' if i == 0 || (i == 1 && first == Some('-')) => hex_escape(&mut out, ch),
            '-' if i == 0 && single => out.push_str("\\-"),
            c if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => out.push(c),
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

fn hex_escape(out: &mut String, ch: char) {
    let _ = write!(out, "\\{:x} ", ch as u32);
}

/// Double-quote an attribute value.
pub fn quote_attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\a "),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
