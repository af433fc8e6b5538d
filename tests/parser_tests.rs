// tests/parser_tests.rs
//
// AST-level tests through the public parse entry points.

use oddo::ast::*;
use oddo::{parse_expression, parse_program};

#[test]
fn program_statements_in_source_order() {
    let program = parse_program("a = 1\nb = 2\nc = 3\n").unwrap();
    let names: Vec<_> = program
        .body
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Expression(Expr::Declaration {
                target: Pattern::Identifier(ident),
                ..
            }) => ident.name.clone(),
            other => panic!("unexpected statement {other:?}"),
        })
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn arrow_param_pattern_default_is_numeric_three() {
    let expr = parse_expression("({x, y = 3}) => x + y").unwrap();
    let Expr::ArrowFunction { params, .. } = expr else {
        panic!("expected arrow function");
    };
    let Pattern::Object { properties, .. } = &params[0].pattern else {
        panic!("expected object pattern");
    };
    let default = properties[1].default.as_ref().expect("default on y");
    assert!(matches!(default, Expr::Number(lit) if lit.value == 3.0));
}

#[test]
fn bare_slice_has_both_bounds_absent() {
    let expr = parse_expression("numbers[...]").unwrap();
    let Expr::ArraySlice { start, end, .. } = expr else {
        panic!("expected slice, got {}", expr.tag());
    };
    assert!(start.is_none() && end.is_none());
}

#[test]
fn pipe_and_compose_shape() {
    // a |> b |> c : pipes nest on the input side.
    let expr = parse_expression("a |> b |> c").unwrap();
    let Expr::Pipe { input, .. } = expr else {
        panic!("expected pipe");
    };
    assert!(matches!(*input, Expr::Pipe { .. }));

    // c <| b <| a : compose nests on the inner side.
    let expr = parse_expression("c <| b <| a").unwrap();
    let Expr::Compose { inner, .. } = expr else {
        panic!("expected compose");
    };
    assert!(matches!(*inner, Expr::Compose { .. }));
}

#[test]
fn spans_cover_the_source_text() {
    let source = "total = price * qty";
    let program = parse_program(source).unwrap();
    let StmtKind::Expression(Expr::Declaration { value, .. }) = &program.body[0].kind else {
        panic!("expected declaration");
    };
    let span = value.span();
    assert_eq!(&source[span.start..span.end], "price * qty");
}

#[test]
fn conditional_is_right_associative() {
    let expr = parse_expression("a ? b : c ? d : e").unwrap();
    let Expr::Conditional { alternate, .. } = expr else {
        panic!("expected conditional");
    };
    assert!(matches!(*alternate, Expr::Conditional { .. }));
}

#[test]
fn rest_must_be_last_in_patterns() {
    let err = parse_program("[...rest, a] = xs\n").unwrap_err();
    assert!(matches!(err.kind, oddo::ErrorKind::RestMustBeLast));
    assert!(parse_program("[a, ...rest] = xs\n").is_ok());
}

#[test]
fn tagged_template_attaches_to_callee() {
    let expr = parse_expression("css`color: ${c}`").unwrap();
    let Expr::TaggedTemplate { tag, quasi, .. } = expr else {
        panic!("expected tagged template");
    };
    assert!(matches!(*tag, Expr::Identifier(_)));
    assert_eq!(quasi.expressions.len(), 1);
}

#[test]
fn jsx_fragment_with_expression_children() {
    let expr = parse_expression("<>{items}</>").unwrap();
    let Expr::JsxFragment(fragment) = expr else {
        panic!("expected fragment");
    };
    assert_eq!(fragment.children.len(), 1);
    assert!(matches!(fragment.children[0], JsxChild::Expression(_)));
}

#[test]
fn jsx_comment_child_is_dropped() {
    let expr = parse_expression("<div>{}</div>").unwrap();
    let Expr::JsxElement(element) = expr else {
        panic!("expected element");
    };
    assert!(element.children.is_empty());
}

#[test]
fn mismatched_closing_tag_is_rejected() {
    let err = parse_expression("<div>text</span>").unwrap_err();
    assert!(err.to_string().contains("</div>"));
}

#[test]
fn return_with_and_without_argument() {
    let program = parse_program("return\nreturn x + 1\n").unwrap();
    assert!(matches!(program.body[0].kind, StmtKind::Return(None)));
    assert!(matches!(program.body[1].kind, StmtKind::Return(Some(_))));
}
