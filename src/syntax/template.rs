//! Template-literal normalization.
//!
//! The lexer hands a whole template over as one raw token. This module
//! splits the body into quasis and `${...}` interpolations, cooks escape
//! sequences, and parses each interpolation as a full Oddo expression.
//! Interpolation snippets are re-tokenized padded to their absolute file
//! offset, so every span in the resulting subtree points into the original
//! source and diagnostics land on the real file.

use crate::ast::{Expr, Span, TemplateLit, TemplateQuasi};
use crate::errors::{
    to_source_span, ErrorContext, ErrorKind, ErrorReporting, OddoError, SourceContext,
};
use crate::syntax::lexer::Token;
use crate::syntax::parser;

/// Build a `TemplateLit` from a raw template token. The invariant
/// `quasis.len() == expressions.len() + 1` always holds, with empty-string
/// quasis where interpolations touch.
pub fn parse_template(token: &Token, context: &SourceContext) -> Result<TemplateLit, OddoError> {
    let build_ctx = ErrorContext::new(context.clone(), "build");
    let body = token.text.as_str();
    // The token span includes the backticks; the body starts one past.
    let body_offset = token.span.start + 1;

    let mut quasis = Vec::new();
    let mut expressions = Vec::new();
    let mut quasi_start = 0usize;
    let bytes = body.as_bytes();
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                quasis.push(make_quasi(body, quasi_start, i, body_offset));

                let inner_start = i + 2;
                let inner_end = interpolation_end(body, inner_start).ok_or_else(|| {
                    build_ctx.report(
                        ErrorKind::MalformedInterpolation,
                        to_source_span(Span::new(body_offset + i, body_offset + i + 2)),
                    )
                })?;

                let snippet = &body[inner_start..inner_end];
                if snippet.trim().is_empty() {
                    return Err(build_ctx.report(
                        ErrorKind::MalformedInterpolation,
                        to_source_span(Span::new(
                            body_offset + i,
                            body_offset + inner_end + 1,
                        )),
                    ));
                }
                expressions.push(parse_interpolation(
                    snippet,
                    body_offset + inner_start,
                    context,
                )?);

                i = inner_end + 1;
                quasi_start = i;
            }
            _ => i += 1,
        }
    }

    quasis.push(make_quasi(body, quasi_start, body.len(), body_offset));

    Ok(TemplateLit {
        quasis,
        expressions,
        span: token.span,
    })
}

/// Parse one interpolation snippet as an expression with absolute spans.
/// The snippet is re-tokenized wrapped in parentheses at its file offset:
/// padding keeps byte positions aligned with the original source, and the
/// parentheses suppress statement-boundary newlines inside the snippet.
fn parse_interpolation(
    snippet: &str,
    offset: usize,
    context: &SourceContext,
) -> Result<Expr, OddoError> {
    let mut padded = String::with_capacity(offset + snippet.len() + 2);
    for _ in 0..offset.saturating_sub(1) {
        padded.push(' ');
    }
    padded.push('(');
    padded.push_str(snippet);
    padded.push(')');
    parser::parse_expression(&padded, context)
}

/// Find the index of the `}` closing an interpolation whose body starts at
/// `from`. Tracks nested braces, skips escapes, string literals, and nested
/// backtick templates. The lexer has already verified overall balance, so a
/// `None` here only happens on malformed nesting.
fn interpolation_end(body: &str, from: usize) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut depth = 0usize;
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Some(i);
                }
                depth -= 1;
            }
            quote @ (b'"' | b'\'' | b'`') => {
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn make_quasi(body: &str, start: usize, end: usize, body_offset: usize) -> TemplateQuasi {
    let raw = body[start..end].to_string();
    let cooked = cook(&raw);
    TemplateQuasi {
        raw,
        cooked,
        span: Span::new(body_offset + start, body_offset + end),
    }
}

/// Resolve escape sequences in a quasi. Unknown escapes drop the backslash
/// and keep the character, matching JavaScript template semantics.
fn cook(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::lexer::{self, TokenKind};

    fn template_token(source: &str) -> (Token, SourceContext) {
        let context = SourceContext::from_file("test", source);
        let tokens = lexer::tokenize(source, &context).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Template);
        (tokens[0].clone(), context)
    }

    #[test]
    fn plain_template_has_single_quasi() {
        let (token, context) = template_token("`hello`");
        let lit = parse_template(&token, &context).unwrap();
        assert_eq!(lit.quasis.len(), 1);
        assert!(lit.expressions.is_empty());
        assert_eq!(lit.quasis[0].cooked, "hello");
    }

    #[test]
    fn quasi_count_is_expression_count_plus_one() {
        let (token, context) = template_token("`a ${x} b ${y} c`");
        let lit = parse_template(&token, &context).unwrap();
        assert_eq!(lit.expressions.len(), 2);
        assert_eq!(lit.quasis.len(), 3);
        assert_eq!(lit.quasis[1].raw, " b ");
    }

    #[test]
    fn adjacent_interpolations_produce_empty_quasi() {
        let (token, context) = template_token("`${a}${b}`");
        let lit = parse_template(&token, &context).unwrap();
        assert_eq!(lit.quasis.len(), 3);
        assert_eq!(lit.quasis[1].raw, "");
    }

    #[test]
    fn interpolation_is_a_full_expression() {
        let (token, context) = template_token("`total: ${x + y * 2}`");
        let lit = parse_template(&token, &context).unwrap();
        assert!(matches!(lit.expressions[0], Expr::Binary { .. }));
    }

    #[test]
    fn interpolation_spans_are_absolute() {
        let source = "`ab ${cd} e`";
        let (token, context) = template_token(source);
        let lit = parse_template(&token, &context).unwrap();
        let span = lit.expressions[0].span();
        assert_eq!(&source[span.start..span.end], "cd");
    }

    #[test]
    fn nested_template_inside_interpolation() {
        let (token, context) = template_token("`a ${`b ${c}`} d`");
        let lit = parse_template(&token, &context).unwrap();
        assert_eq!(lit.expressions.len(), 1);
        assert!(matches!(lit.expressions[0], Expr::Template(_)));
    }

    #[test]
    fn escaped_dollar_stays_in_quasi() {
        let (token, context) = template_token(r"`price \${x}`");
        let lit = parse_template(&token, &context).unwrap();
        assert!(lit.expressions.is_empty());
        assert_eq!(lit.quasis[0].cooked, "price ${x}");
    }

    #[test]
    fn cooked_resolves_escapes_raw_does_not() {
        let (token, context) = template_token(r"`line\nbreak`");
        let lit = parse_template(&token, &context).unwrap();
        assert_eq!(lit.quasis[0].raw, r"line\nbreak");
        assert_eq!(lit.quasis[0].cooked, "line\nbreak");
    }

    #[test]
    fn empty_interpolation_is_rejected() {
        let (token, context) = template_token("`a ${} b`");
        let err = parse_template(&token, &context).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::MalformedInterpolation));
    }
}
