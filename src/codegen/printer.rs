//! JavaScript expression printing.
//!
//! Direct text emission with precedence-aware parenthesization: each emit
//! site states the minimum precedence its context requires, and an operand
//! that binds looser is wrapped in parentheses. Numbers print their raw
//! source spelling (hex/binary/octal/exponent forms survive), strings print
//! JSON-escaped, template quasis print raw.
//!
//! The Oddo-specific operators are lowered here: `a |> b` becomes `b(a)`,
//! `c <| b` becomes `c(b)`, and a slice read `a[s...e]` becomes
//! `a.slice(s ?? 0, e)`.

use crate::ast::*;
use crate::errors::{to_source_span, ErrorContext, ErrorKind, ErrorReporting, OddoError};

/// Binding strength, JavaScript's operator table. Higher binds tighter.
pub type Prec = u8;

pub const PREC_LOWEST: Prec = 0;
pub const PREC_ASSIGN: Prec = 1;
pub const PREC_CONDITIONAL: Prec = 2;
pub const PREC_LOGICAL_OR: Prec = 3;
pub const PREC_LOGICAL_AND: Prec = 4;
pub const PREC_BIT_OR: Prec = 5;
pub const PREC_BIT_XOR: Prec = 6;
pub const PREC_BIT_AND: Prec = 7;
pub const PREC_EQUALITY: Prec = 8;
pub const PREC_RELATIONAL: Prec = 9;
pub const PREC_SHIFT: Prec = 10;
pub const PREC_ADDITIVE: Prec = 11;
pub const PREC_MULTIPLICATIVE: Prec = 12;
pub const PREC_EXPONENT: Prec = 13;
pub const PREC_UNARY: Prec = 14;
pub const PREC_POSTFIX: Prec = 15;
pub const PREC_CALL: Prec = 17;
pub const PREC_PRIMARY: Prec = 18;

pub struct Printer<'a> {
    out: String,
    ctx: &'a ErrorContext,
}

/// Render one expression as JavaScript source text.
pub fn print_expr(expr: &Expr, ctx: &ErrorContext) -> Result<String, OddoError> {
    print_expr_at(expr, PREC_LOWEST, ctx)
}

fn print_expr_at(expr: &Expr, min: Prec, ctx: &ErrorContext) -> Result<String, OddoError> {
    let mut printer = Printer::new(ctx);
    printer.expr(expr, min)?;
    Ok(printer.into_string())
}

/// Render a computed numeric value; whole numbers print without a fraction.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl<'a> Printer<'a> {
    pub fn new(ctx: &'a ErrorContext) -> Self {
        Self {
            out: String::new(),
            ctx,
        }
    }

    pub fn into_string(self) -> String {
        self.out
    }

    pub fn push(&mut self, text: &str) {
        self.out.push_str(text);
    }

    /// Emit `expr`, parenthesized if it binds looser than `min`.
    pub fn expr(&mut self, expr: &Expr, min: Prec) -> Result<(), OddoError> {
        let prec = precedence(expr);
        if prec < min {
            self.push("(");
            self.expr_inner(expr)?;
            self.push(")");
        } else {
            self.expr_inner(expr)?;
        }
        Ok(())
    }

    fn expr_inner(&mut self, expr: &Expr) -> Result<(), OddoError> {
        match expr {
            Expr::Number(lit) => self.push(&lit.raw),
            Expr::String(lit) => self.push(&js_string(&lit.value)),
            Expr::Boolean(value, _) => self.push(if *value { "true" } else { "false" }),
            Expr::Null(_) => self.push("null"),
            Expr::Identifier(ident) => self.push(&ident.name),
            Expr::Template(lit) => self.template(lit)?,
            Expr::TaggedTemplate { tag, quasi, .. } => {
                self.expr(tag, PREC_CALL)?;
                self.template(quasi)?;
            }
            Expr::Array { elements, .. } => {
                self.push("[");
                self.comma_list(elements)?;
                self.push("]");
            }
            Expr::Object { properties, .. } => {
                self.push("{ ");
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.object_property(property)?;
                }
                self.push(" }");
            }
            Expr::ArrowFunction {
                params, rest, body, ..
            } => self.arrow(params, rest.as_deref(), body)?,
            Expr::Call {
                callee,
                arguments,
                optional,
                ..
            } => {
                self.expr(callee, PREC_CALL)?;
                self.push(if *optional { "?.(" } else { "(" });
                self.comma_list(arguments)?;
                self.push(")");
            }
            Expr::Member {
                object,
                property,
                optional,
                ..
            } => {
                self.expr(object, PREC_CALL)?;
                match property {
                    MemberProperty::Dot(ident) => {
                        self.push(if *optional { "?." } else { "." });
                        self.push(&ident.name);
                    }
                    MemberProperty::Computed(index) => {
                        self.push(if *optional { "?.[" } else { "[" });
                        self.expr(index, PREC_LOWEST)?;
                        self.push("]");
                    }
                }
            }
            Expr::ArraySlice {
                object,
                start,
                end,
                optional,
                ..
            } => self.slice_read(object, start.as_deref(), end.as_deref(), *optional)?,
            Expr::Unary { op, operand, .. } => {
                self.push(op.as_js());
                if signs_would_fuse(*op, operand) {
                    self.push(" ");
                }
                self.expr(operand, PREC_UNARY)?;
            }
            Expr::Update { op, operand, .. } => {
                self.expr(operand, PREC_POSTFIX)?;
                self.push(op.as_js());
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let prec = binary_prec(*op);
                // Exponentiation is right-associative, and JavaScript rejects
                // an unparenthesized unary expression as its base.
                let (left_min, right_min) = if *op == BinaryOp::Exp {
                    (PREC_UNARY + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                self.expr(left, left_min)?;
                self.push(" ");
                self.push(op.as_js());
                self.push(" ");
                self.expr(right, right_min)?;
            }
            Expr::Logical {
                op, left, right, ..
            } => self.logical(*op, left, right)?,
            Expr::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.expr(test, PREC_CONDITIONAL + 1)?;
                self.push(" ? ");
                self.expr(consequent, PREC_ASSIGN)?;
                self.push(" : ");
                self.expr(alternate, PREC_ASSIGN)?;
            }
            Expr::Assignment {
                op,
                target,
                value,
                span,
            } => {
                if let Expr::ArraySlice {
                    object,
                    start,
                    end,
                    optional,
                    ..
                } = target.as_ref()
                {
                    if *op != AssignOp::Assign {
                        return Err(self.ctx.report(
                            ErrorKind::UnsupportedNode {
                                tag: "compound assignment to array slice".to_string(),
                            },
                            to_source_span(*span),
                        ));
                    }
                    if *optional {
                        return Err(self.ctx.report(
                            ErrorKind::UnsupportedNode {
                                tag: "assignment to optional array slice".to_string(),
                            },
                            to_source_span(*span),
                        ));
                    }
                    self.slice_write(object, start.as_deref(), end.as_deref(), value)?;
                } else {
                    self.expr(target, PREC_CALL)?;
                    self.push(" ");
                    self.push(op.as_js());
                    self.push(" ");
                    self.expr(value, PREC_ASSIGN)?;
                }
            }
            Expr::Pipe {
                input, function, ..
            } => {
                // a |> b  =>  b(a)
                self.expr(function, PREC_CALL)?;
                self.push("(");
                self.expr(input, PREC_ASSIGN)?;
                self.push(")");
            }
            Expr::Compose { outer, inner, .. } => {
                // c <| b  =>  c(b)
                self.expr(outer, PREC_CALL)?;
                self.push("(");
                self.expr(inner, PREC_ASSIGN)?;
                self.push(")");
            }
            Expr::Spread { argument, .. } => {
                self.push("...");
                self.expr(argument, PREC_ASSIGN)?;
            }
            Expr::JsxElement(element) => self.jsx_element(element)?,
            Expr::JsxFragment(fragment) => self.jsx_fragment(fragment)?,
            Expr::Declaration { span, .. } => {
                // `=` is statement-level; in expression position there is no
                // JavaScript equivalent.
                return Err(self.ctx.report(
                    ErrorKind::UnsupportedNode {
                        tag: "declaration in expression position".to_string(),
                    },
                    to_source_span(*span),
                ));
            }
        }
        Ok(())
    }

    fn comma_list(&mut self, items: &[Expr]) -> Result<(), OddoError> {
        for (index, item) in items.iter().enumerate() {
            if index > 0 {
                self.push(", ");
            }
            self.expr(item, PREC_ASSIGN)?;
        }
        Ok(())
    }

    fn logical(&mut self, op: LogicalOp, left: &Expr, right: &Expr) -> Result<(), OddoError> {
        let prec = match op {
            LogicalOp::And => PREC_LOGICAL_AND,
            LogicalOp::Or | LogicalOp::Nullish => PREC_LOGICAL_OR,
        };
        // JavaScript refuses `??` mixed bare with `&&`/`||`.
        let force = |side: &Expr| {
            op == LogicalOp::Nullish
                && matches!(
                    side,
                    Expr::Logical {
                        op: LogicalOp::And | LogicalOp::Or,
                        ..
                    }
                )
        };
        let left_min = if force(left) { PREC_PRIMARY } else { prec };
        let right_min = if force(right) { PREC_PRIMARY } else { prec + 1 };
        self.expr(left, left_min)?;
        self.push(" ");
        self.push(op.as_js());
        self.push(" ");
        self.expr(right, right_min)
    }

    /// `a[s...e]` read position: `a.slice(s ?? 0, e)`, end argument omitted
    /// when absent, `a.slice(0)` for the bare full-copy form. An optional
    /// access short-circuits through `?.slice`.
    fn slice_read(
        &mut self,
        object: &Expr,
        start: Option<&Expr>,
        end: Option<&Expr>,
        optional: bool,
    ) -> Result<(), OddoError> {
        self.expr(object, PREC_CALL)?;
        self.push(if optional { "?.slice(" } else { ".slice(" });
        match start {
            Some(start) => {
                self.expr(start, PREC_LOGICAL_OR + 1)?;
                self.push(" ?? 0");
            }
            None => self.push("0"),
        }
        if let Some(end) = end {
            self.push(", ");
            self.expr(end, PREC_ASSIGN)?;
        }
        self.push(")");
        Ok(())
    }

    /// `a[s...e] := v` write position: in-place replacement via
    /// `a.splice.apply(a, [start, deleteCount].concat(v))`. The delete count
    /// is `end - start` (constant-folded when both ends are numeric
    /// literals), `a.length - start` when the end is omitted, or `a.length`
    /// when both are.
    fn slice_write(
        &mut self,
        object: &Expr,
        start: Option<&Expr>,
        end: Option<&Expr>,
        value: &Expr,
    ) -> Result<(), OddoError> {
        let mut sub = Printer::new(self.ctx);
        sub.expr(object, PREC_CALL)?;
        let object_text = sub.into_string();

        let start_text = match start {
            Some(start) => print_expr_at(start, PREC_ASSIGN, self.ctx)?,
            None => "0".to_string(),
        };
        let delete_count = match (start, end) {
            (Some(Expr::Number(s)), Some(Expr::Number(e))) => format_number(e.value - s.value),
            (None, Some(Expr::Number(e))) => format_number(e.value),
            (Some(start), Some(end)) => format!(
                "{} - {}",
                print_expr_at(end, PREC_ADDITIVE, self.ctx)?,
                print_expr_at(start, PREC_ADDITIVE + 1, self.ctx)?
            ),
            (None, Some(end)) => print_expr_at(end, PREC_ASSIGN, self.ctx)?,
            (Some(start), None) => format!(
                "{object_text}.length - {}",
                print_expr_at(start, PREC_ADDITIVE + 1, self.ctx)?
            ),
            (None, None) => format!("{object_text}.length"),
        };

        self.push(&object_text);
        self.push(".splice.apply(");
        self.push(&object_text);
        self.push(", [");
        self.push(&start_text);
        self.push(", ");
        self.push(&delete_count);
        self.push("].concat(");
        self.expr(value, PREC_ASSIGN)?;
        self.push("))");
        Ok(())
    }

    fn arrow(
        &mut self,
        params: &[ArrowParam],
        rest: Option<&Pattern>,
        body: &Expr,
    ) -> Result<(), OddoError> {
        let bare = params.len() == 1
            && rest.is_none()
            && params[0].default.is_none()
            && matches!(params[0].pattern, Pattern::Identifier(_));
        if bare {
            self.pattern(&params[0].pattern)?;
        } else {
            self.push("(");
            for (index, param) in params.iter().enumerate() {
                if index > 0 {
                    self.push(", ");
                }
                self.pattern(&param.pattern)?;
                if let Some(default) = &param.default {
                    self.push(" = ");
                    self.expr(default, PREC_ASSIGN)?;
                }
            }
            if let Some(rest) = rest {
                if !params.is_empty() {
                    self.push(", ");
                }
                self.push("...");
                self.pattern(rest)?;
            }
            self.push(")");
        }
        self.push(" => ");
        // An object-literal body needs parens to not read as a block.
        if matches!(body, Expr::Object { .. }) {
            self.push("(");
            self.expr(body, PREC_LOWEST)?;
            self.push(")");
        } else {
            self.expr(body, PREC_ASSIGN)?;
        }
        Ok(())
    }

    fn object_property(&mut self, property: &ObjectProperty) -> Result<(), OddoError> {
        match property {
            ObjectProperty::Shorthand(ident) => self.push(&ident.name),
            ObjectProperty::KeyValue { key, value, .. } => {
                self.property_key(key)?;
                self.push(": ");
                self.expr(value, PREC_ASSIGN)?;
            }
            ObjectProperty::Spread { argument, .. } => {
                self.push("...");
                self.expr(argument, PREC_ASSIGN)?;
            }
        }
        Ok(())
    }

    fn property_key(&mut self, key: &PropertyKey) -> Result<(), OddoError> {
        match key {
            PropertyKey::Identifier(ident) => self.push(&ident.name),
            PropertyKey::String(lit) => self.push(&js_string(&lit.value)),
            PropertyKey::Computed(expr) => {
                self.push("[");
                self.expr(expr, PREC_LOWEST)?;
                self.push("]");
            }
        }
        Ok(())
    }

    pub fn pattern(&mut self, pattern: &Pattern) -> Result<(), OddoError> {
        match pattern {
            Pattern::Identifier(ident) => self.push(&ident.name),
            Pattern::Array { elements, rest, .. } => {
                self.push("[");
                for (index, element) in elements.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.pattern(&element.pattern)?;
                    if let Some(default) = &element.default {
                        self.push(" = ");
                        self.expr(default, PREC_ASSIGN)?;
                    }
                }
                if let Some(rest) = rest {
                    if !elements.is_empty() {
                        self.push(", ");
                    }
                    self.push("...");
                    self.pattern(rest)?;
                }
                self.push("]");
            }
            Pattern::Object {
                properties, rest, ..
            } => {
                self.push("{ ");
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.push(", ");
                    }
                    self.property_key(&property.key)?;
                    if !property.shorthand {
                        self.push(": ");
                        self.pattern(&property.value)?;
                    }
                    if let Some(default) = &property.default {
                        self.push(" = ");
                        self.expr(default, PREC_ASSIGN)?;
                    }
                }
                if let Some(rest) = rest {
                    if !properties.is_empty() {
                        self.push(", ");
                    }
                    self.push("...");
                    self.push(&rest.name);
                }
                self.push(" }");
            }
        }
        Ok(())
    }

    fn template(&mut self, lit: &TemplateLit) -> Result<(), OddoError> {
        self.push("`");
        for (index, quasi) in lit.quasis.iter().enumerate() {
            self.push(&quasi.raw);
            if let Some(expr) = lit.expressions.get(index) {
                self.push("${");
                self.expr(expr, PREC_LOWEST)?;
                self.push("}");
            }
        }
        self.push("`");
        Ok(())
    }

    // ------------------------------------------------------------------
    // JSX re-emission
    // ------------------------------------------------------------------

    fn jsx_element(&mut self, element: &JsxElement) -> Result<(), OddoError> {
        self.push("<");
        self.push(&element.name);
        for attribute in &element.attributes {
            self.push(" ");
            self.jsx_attribute(attribute)?;
        }
        if element.self_closing {
            self.push(" />");
            return Ok(());
        }
        self.push(">");
        self.jsx_children(&element.children)?;
        self.push("</");
        self.push(&element.name);
        self.push(">");
        Ok(())
    }

    fn jsx_fragment(&mut self, fragment: &JsxFragment) -> Result<(), OddoError> {
        self.push("<>");
        self.jsx_children(&fragment.children)?;
        self.push("</>");
        Ok(())
    }

    fn jsx_attribute(&mut self, attribute: &JsxAttribute) -> Result<(), OddoError> {
        match attribute {
            JsxAttribute::Named { name, value, .. } => {
                self.push(name);
                match value {
                    None => {}
                    Some(JsxAttrValue::String(lit)) => {
                        self.push("=");
                        self.push(&js_string(&lit.value));
                    }
                    Some(JsxAttrValue::Expression(expr)) => {
                        self.push("={");
                        self.expr(expr, PREC_LOWEST)?;
                        self.push("}");
                    }
                }
            }
            JsxAttribute::Spread { argument, .. } => {
                self.push("{...");
                self.expr(argument, PREC_ASSIGN)?;
                self.push("}");
            }
        }
        Ok(())
    }

    /// Text children are emitted as `{"…"}` string containers so the exact
    /// normalized whitespace survives any downstream JSX tooling.
    fn jsx_children(&mut self, children: &[JsxChild]) -> Result<(), OddoError> {
        for child in children {
            match child {
                JsxChild::Text(text) => {
                    self.push("{");
                    self.push(&js_string(&text.value));
                    self.push("}");
                }
                JsxChild::Element(element) => self.jsx_element(element)?,
                JsxChild::Fragment(fragment) => self.jsx_fragment(fragment)?,
                JsxChild::Expression(expr) => {
                    self.push("{");
                    self.expr(expr, PREC_LOWEST)?;
                    self.push("}");
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn precedence(expr: &Expr) -> Prec {
    match expr {
        Expr::Number(_)
        | Expr::String(_)
        | Expr::Boolean(..)
        | Expr::Null(_)
        | Expr::Identifier(_)
        | Expr::Template(_)
        | Expr::Array { .. }
        | Expr::Object { .. }
        | Expr::JsxElement(_)
        | Expr::JsxFragment(_) => PREC_PRIMARY,
        Expr::Call { .. }
        | Expr::Member { .. }
        | Expr::TaggedTemplate { .. }
        | Expr::ArraySlice { .. }
        | Expr::Pipe { .. }
        | Expr::Compose { .. } => PREC_CALL,
        Expr::Update { .. } => PREC_POSTFIX,
        Expr::Unary { .. } => PREC_UNARY,
        Expr::Binary { op, .. } => binary_prec(*op),
        Expr::Logical { op, .. } => match op {
            LogicalOp::And => PREC_LOGICAL_AND,
            LogicalOp::Or | LogicalOp::Nullish => PREC_LOGICAL_OR,
        },
        Expr::Conditional { .. } => PREC_CONDITIONAL,
        Expr::ArrowFunction { .. } | Expr::Assignment { .. } | Expr::Declaration { .. } => {
            PREC_ASSIGN
        }
        // Only legal in argument/element position, never wrapped.
        Expr::Spread { .. } => PREC_PRIMARY,
    }
}

/// `-(-x)` without a separator prints as `--x`, which JavaScript reads as a
/// prefix decrement; likewise `+(+x)` as an increment.
fn signs_would_fuse(op: UnaryOp, operand: &Expr) -> bool {
    matches!(
        (op, operand),
        (UnaryOp::Neg, Expr::Unary { op: UnaryOp::Neg, .. })
            | (UnaryOp::Pos, Expr::Unary { op: UnaryOp::Pos, .. })
    )
}

fn binary_prec(op: BinaryOp) -> Prec {
    match op {
        BinaryOp::Exp => PREC_EXPONENT,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => PREC_MULTIPLICATIVE,
        BinaryOp::Add | BinaryOp::Sub => PREC_ADDITIVE,
        BinaryOp::Shl | BinaryOp::Shr | BinaryOp::UShr => PREC_SHIFT,
        BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => PREC_RELATIONAL,
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::StrictEq | BinaryOp::StrictNotEq => {
            PREC_EQUALITY
        }
        BinaryOp::BitAnd => PREC_BIT_AND,
        BinaryOp::BitXor => PREC_BIT_XOR,
        BinaryOp::BitOr => PREC_BIT_OR,
    }
}

/// JSON string escaping matches JavaScript string-literal syntax.
pub fn js_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceContext;
    use crate::syntax::parser::parse_expression;

    fn print(source: &str) -> String {
        let context = SourceContext::from_file("test", source);
        let expr = parse_expression(source, &context).unwrap();
        let ctx = ErrorContext::new(context, "compile");
        print_expr(&expr, &ctx).unwrap()
    }

    fn print_err(source: &str) -> OddoError {
        let context = SourceContext::from_file("test", source);
        let expr = parse_expression(source, &context).unwrap();
        let ctx = ErrorContext::new(context, "compile");
        print_expr(&expr, &ctx).unwrap_err()
    }

    #[test]
    fn pipes_lower_to_nested_calls() {
        assert_eq!(print("a |> b |> c"), "c(b(a))");
    }

    #[test]
    fn compose_lowers_to_nested_calls() {
        assert_eq!(print("c <| b <| a"), "c(b(a))");
    }

    #[test]
    fn precedence_inserts_parens_only_where_needed() {
        assert_eq!(print("(1 + 2) * 3"), "(1 + 2) * 3");
        assert_eq!(print("1 + 2 * 3"), "1 + 2 * 3");
        assert_eq!(print("2**3**2"), "2 ** 3 ** 2");
        assert_eq!(print("(2**3)**2"), "(2 ** 3) ** 2");
    }

    #[test]
    fn nullish_mixed_with_logical_gets_parens() {
        assert_eq!(print("(a && b) ?? c"), "(a && b) ?? c");
    }

    #[test]
    fn unary_base_of_exponent_is_parenthesized() {
        assert_eq!(print("-x ** 2"), "(-x) ** 2");
        assert_eq!(print("(-x) ** 2"), "(-x) ** 2");
        assert_eq!(print("2 ** -x"), "2 ** -x");
    }

    #[test]
    fn nested_same_sign_unary_keeps_separator() {
        assert_eq!(print("-(-x)"), "- -x");
        assert_eq!(print("+(+x)"), "+ +x");
        assert_eq!(print("-(+x)"), "-+x");
        assert_eq!(print("!(!x)"), "!!x");
    }

    #[test]
    fn slice_read_forms() {
        assert_eq!(print("numbers[...]"), "numbers.slice(0)");
        assert_eq!(print("a[1...3]"), "a.slice(1 ?? 0, 3)");
        assert_eq!(print("a[...n]"), "a.slice(0, n)");
        assert_eq!(print("a[i...]"), "a.slice(i ?? 0)");
    }

    #[test]
    fn slice_write_folds_literal_delete_count() {
        assert_eq!(
            print("a[1...3] := v"),
            "a.splice.apply(a, [1, 2].concat(v))"
        );
    }

    #[test]
    fn slice_write_without_end_uses_length() {
        assert_eq!(
            print("a[i...] := v"),
            "a.splice.apply(a, [i, a.length - i].concat(v))"
        );
        assert_eq!(
            print("a[...] := v"),
            "a.splice.apply(a, [0, a.length].concat(v))"
        );
    }

    #[test]
    fn optional_slice_reads_through_optional_chain() {
        assert_eq!(print("a?.[1...3]"), "a?.slice(1 ?? 0, 3)");
        assert_eq!(print("a?.[...]"), "a?.slice(0)");
    }

    #[test]
    fn optional_slice_is_not_a_write_target() {
        let err = print_err("a?.[1...3] := v");
        assert!(err.to_string().contains("optional array slice"));
    }

    #[test]
    fn slice_write_nonliteral_bounds_subtract() {
        assert_eq!(
            print("a[i...j] := v"),
            "a.splice.apply(a, [i, j - i].concat(v))"
        );
    }

    #[test]
    fn numbers_keep_raw_spelling() {
        assert_eq!(print("0xFF + 1_000"), "0xFF + 1_000");
    }

    #[test]
    fn strings_are_json_escaped() {
        assert_eq!(print("\"he said \\\"hi\\\"\""), r#""he said \"hi\"""#);
    }

    #[test]
    fn arrow_with_object_body_is_parenthesized() {
        assert_eq!(print("x => {a: x}"), "x => ({ a: x })");
    }

    #[test]
    fn jsx_text_children_become_string_containers() {
        assert_eq!(
            print("<div>Hello <b>World</b></div>"),
            r#"<div>{"Hello "}<b>{"World"}</b></div>"#
        );
    }

    #[test]
    fn optional_chains_print_as_written() {
        assert_eq!(print("a.b()[0]?.c(x)"), "a.b()[0]?.c(x)");
    }
}
