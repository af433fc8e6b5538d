//! JSX child normalization.
//!
//! Raw text runs between tags arrive verbatim from the lexer, including the
//! indentation of multi-line markup. Normalization applies the standard JSX
//! whitespace rules: text that is only whitespace-and-newline disappears,
//! same-line whitespace between siblings collapses to a single space, and
//! newline runs inside mixed text collapse likewise. Character entities are
//! decoded last so a literal `&nbsp;` survives whitespace handling.

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::ast::{JsxChild, JsxText};

/// Named character entities recognized in JSX text. Numeric forms
/// (`&#169;`, `&#x2764;`) are handled separately.
static NAMED_ENTITIES: Lazy<HashMap<&'static str, char>> = Lazy::new(|| {
    HashMap::from([
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("nbsp", '\u{a0}'),
        ("copy", '\u{a9}'),
        ("reg", '\u{ae}'),
        ("trade", '\u{2122}'),
        ("hellip", '\u{2026}'),
        ("mdash", '\u{2014}'),
        ("ndash", '\u{2013}'),
        ("lsquo", '\u{2018}'),
        ("rsquo", '\u{2019}'),
        ("ldquo", '\u{201c}'),
        ("rdquo", '\u{201d}'),
        ("laquo", '\u{ab}'),
        ("raquo", '\u{bb}'),
        ("times", '\u{d7}'),
        ("divide", '\u{f7}'),
        ("deg", '\u{b0}'),
        ("plusmn", '\u{b1}'),
        ("micro", '\u{b5}'),
        ("middot", '\u{b7}'),
        ("bull", '\u{2022}'),
        ("dagger", '\u{2020}'),
        ("sect", '\u{a7}'),
        ("para", '\u{b6}'),
        ("euro", '\u{20ac}'),
        ("pound", '\u{a3}'),
        ("yen", '\u{a5}'),
        ("cent", '\u{a2}'),
        ("rarr", '\u{2192}'),
        ("larr", '\u{2190}'),
        ("uarr", '\u{2191}'),
        ("darr", '\u{2193}'),
    ])
});

/// Apply whitespace rules and entity decoding to a raw child list.
pub fn normalize_children(raw: Vec<JsxChild>) -> Vec<JsxChild> {
    let merged = merge_adjacent_text(raw);
    let mut out = Vec::with_capacity(merged.len());
    for child in merged {
        match child {
            JsxChild::Text(text) => {
                if let Some(value) = normalize_text(&text.value) {
                    out.push(JsxChild::Text(JsxText {
                        value: decode_entities(&value),
                        span: text.span,
                    }));
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Dropping `{}` comment children in the parser can leave two text runs
/// adjacent; fold them back into one before whitespace handling.
fn merge_adjacent_text(raw: Vec<JsxChild>) -> Vec<JsxChild> {
    let mut out: Vec<JsxChild> = Vec::with_capacity(raw.len());
    for child in raw {
        match (out.last_mut(), child) {
            (Some(JsxChild::Text(prev)), JsxChild::Text(next)) => {
                prev.value.push_str(&next.value);
                prev.span = prev.span.join(next.span);
            }
            (_, child) => out.push(child),
        }
    }
    out
}

/// Whitespace normalization for one text run. Returns `None` when the run
/// disappears entirely.
fn normalize_text(raw: &str) -> Option<String> {
    if raw.chars().all(char::is_whitespace) {
        // Indentation between lines of markup vanishes; spacing between
        // siblings on one line is meaningful.
        if raw.contains('\n') {
            return None;
        }
        return Some(" ".to_string());
    }

    // Mixed text: strip leading/trailing newline runs, collapse interior
    // newline runs (with their surrounding indentation) to one space.
    let mut out = String::with_capacity(raw.len());
    for (index, line) in raw.split('\n').enumerate() {
        let piece = if index == 0 { line } else { line.trim_start() };
        let piece = if raw.contains('\n') {
            piece.trim_end_matches(|c: char| c.is_whitespace() && c != '\n')
        } else {
            piece
        };
        if piece.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(piece);
    }
    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Decode `&name;`, `&#NNN;`, and `&#xHH;` entities. Anything unrecognized
/// passes through verbatim.
fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        match after.find(';') {
            Some(semi) if semi > 0 && semi <= 10 => {
                let name = &after[..semi];
                if let Some(decoded) = decode_entity(name) {
                    out.push(decoded);
                } else {
                    out.push('&');
                    out.push_str(name);
                    out.push(';');
                }
                rest = &after[semi + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(digits) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
        let code = u32::from_str_radix(digits, 16).ok()?;
        return char::from_u32(code);
    }
    if let Some(digits) = name.strip_prefix('#') {
        let code: u32 = digits.parse().ok()?;
        return char::from_u32(code);
    }
    NAMED_ENTITIES.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Span;

    fn text(value: &str) -> JsxChild {
        JsxChild::Text(JsxText {
            value: value.to_string(),
            span: Span::new(0, value.len()),
        })
    }

    fn text_value(child: &JsxChild) -> &str {
        match child {
            JsxChild::Text(t) => &t.value,
            _ => panic!("expected text child"),
        }
    }

    #[test]
    fn newline_indentation_between_tags_disappears() {
        let out = normalize_children(vec![text("\n    ")]);
        assert!(out.is_empty());
    }

    #[test]
    fn same_line_space_between_siblings_is_kept() {
        let out = normalize_children(vec![text("   ")]);
        assert_eq!(out.len(), 1);
        assert_eq!(text_value(&out[0]), " ");
    }

    #[test]
    fn mixed_text_collapses_newline_runs() {
        let out = normalize_children(vec![text("  hello\n      world\n    ")]);
        assert_eq!(text_value(&out[0]), "  hello world");
    }

    #[test]
    fn named_and_numeric_entities_decode() {
        let out = normalize_children(vec![text("a &amp; b &#169; &#x2764;")]);
        assert_eq!(text_value(&out[0]), "a & b \u{a9} \u{2764}");
    }

    #[test]
    fn unknown_entity_passes_through() {
        let out = normalize_children(vec![text("&bogus; &notreal")]);
        assert_eq!(text_value(&out[0]), "&bogus; &notreal");
    }

    #[test]
    fn adjacent_text_runs_merge_before_normalization() {
        let out = normalize_children(vec![text("a "), text(" b")]);
        assert_eq!(out.len(), 1);
        assert_eq!(text_value(&out[0]), "a  b");
    }
}
