//! The `@modifier` macro table.
//!
//! Each modifier rewrites the value it is attached to into a runtime-library
//! call. The table is the single registry: adding a modifier means adding a
//! variant here and a row in `lookup`.

use crate::ast::{Expr, JsxAttrValue, JsxAttribute, JsxChild, MemberProperty, ObjectProperty, PropertyKey};

/// A recognized modifier and the shape of its expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierKind {
    /// `@state x = v` → `const x = Oddo.state(v)`.
    State,
    /// `@computed y = e` → `const y = Oddo.computed((deps) => e, [deps])`.
    Computed,
    /// Same shape as `computed`, distinct runtime entry.
    React,
    /// `@mutate f = fn` → `const f = Oddo.mutate(fn)`; value must be a
    /// function.
    Mutate,
}

impl ModifierKind {
    pub fn lookup(name: &str) -> Option<ModifierKind> {
        match name {
            "state" => Some(ModifierKind::State),
            "computed" => Some(ModifierKind::Computed),
            "react" => Some(ModifierKind::React),
            "mutate" => Some(ModifierKind::Mutate),
            _ => None,
        }
    }

    pub fn runtime_method(self) -> &'static str {
        match self {
            ModifierKind::State => "state",
            ModifierKind::Computed => "computed",
            ModifierKind::React => "react",
            ModifierKind::Mutate => "mutate",
        }
    }

    /// Whether the expansion wraps its value in a dependency-tracking
    /// closure (`computed`/`react`) rather than passing it through.
    pub fn tracks_dependencies(self) -> bool {
        matches!(self, ModifierKind::Computed | ModifierKind::React)
    }

    pub fn requires_function(self) -> bool {
        matches!(self, ModifierKind::Mutate)
    }
}

/// Free variables of an expression in first-occurrence order.
///
/// Walks the tree collecting identifier reads, without descending into
/// arrow-function bodies (a nested function's dependencies are its own).
/// Member property names and literal object keys are not reads.
pub fn free_variables(expr: &Expr) -> Vec<String> {
    let mut found = Vec::new();
    collect(expr, &mut found);
    found
}

fn record(name: &str, found: &mut Vec<String>) {
    if !found.iter().any(|f| f == name) {
        found.push(name.to_string());
    }
}

fn collect(expr: &Expr, found: &mut Vec<String>) {
    match expr {
        Expr::Identifier(ident) => record(&ident.name, found),
        Expr::Number(_) | Expr::String(_) | Expr::Boolean(..) | Expr::Null(_) => {}
        // Dependency boundary: a nested function evaluates later.
        Expr::ArrowFunction { .. } => {}
        Expr::Template(lit) => {
            for e in &lit.expressions {
                collect(e, found);
            }
        }
        Expr::TaggedTemplate { tag, quasi, .. } => {
            collect(tag, found);
            for e in &quasi.expressions {
                collect(e, found);
            }
        }
        Expr::Array { elements, .. } => {
            for e in elements {
                collect(e, found);
            }
        }
        Expr::Object { properties, .. } => {
            for property in properties {
                match property {
                    ObjectProperty::KeyValue { key, value, .. } => {
                        if let PropertyKey::Computed(key) = key {
                            collect(key, found);
                        }
                        collect(value, found);
                    }
                    ObjectProperty::Shorthand(ident) => record(&ident.name, found),
                    ObjectProperty::Spread { argument, .. } => collect(argument, found),
                }
            }
        }
        Expr::Call {
            callee, arguments, ..
        } => {
            collect(callee, found);
            for a in arguments {
                collect(a, found);
            }
        }
        Expr::Member {
            object, property, ..
        } => {
            collect(object, found);
            if let MemberProperty::Computed(index) = property {
                collect(index, found);
            }
        }
        Expr::ArraySlice {
            object, start, end, ..
        } => {
            collect(object, found);
            if let Some(start) = start {
                collect(start, found);
            }
            if let Some(end) = end {
                collect(end, found);
            }
        }
        Expr::Unary { operand, .. } | Expr::Update { operand, .. } => collect(operand, found),
        Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
            collect(left, found);
            collect(right, found);
        }
        Expr::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            collect(test, found);
            collect(consequent, found);
            collect(alternate, found);
        }
        Expr::Declaration { value, .. } => collect(value, found),
        Expr::Assignment { target, value, .. } => {
            collect(target, found);
            collect(value, found);
        }
        Expr::Pipe {
            input, function, ..
        } => {
            collect(input, found);
            collect(function, found);
        }
        Expr::Compose { outer, inner, .. } => {
            collect(outer, found);
            collect(inner, found);
        }
        Expr::Spread { argument, .. } => collect(argument, found),
        Expr::JsxElement(element) => collect_jsx_element(element, found),
        Expr::JsxFragment(fragment) => collect_jsx_children(&fragment.children, found),
    }
}

fn collect_jsx_element(element: &crate::ast::JsxElement, found: &mut Vec<String>) {
    for attribute in &element.attributes {
        match attribute {
            JsxAttribute::Named {
                value: Some(JsxAttrValue::Expression(expr)),
                ..
            } => collect(expr, found),
            JsxAttribute::Named { .. } => {}
            JsxAttribute::Spread { argument, .. } => collect(argument, found),
        }
    }
    collect_jsx_children(&element.children, found);
}

fn collect_jsx_children(children: &[JsxChild], found: &mut Vec<String>) {
    for child in children {
        match child {
            JsxChild::Text(_) => {}
            JsxChild::Element(element) => collect_jsx_element(element, found),
            JsxChild::Fragment(fragment) => collect_jsx_children(&fragment.children, found),
            JsxChild::Expression(expr) => collect(expr, found),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceContext;
    use crate::syntax::parser::parse_expression;

    fn vars(source: &str) -> Vec<String> {
        let context = SourceContext::from_file("test", source);
        free_variables(&parse_expression(source, &context).unwrap())
    }

    #[test]
    fn first_occurrence_order_without_duplicates() {
        assert_eq!(vars("a + b * a + c"), ["a", "b", "c"]);
    }

    #[test]
    fn member_property_names_are_not_reads() {
        assert_eq!(vars("user.name + user.age"), ["user"]);
        assert_eq!(vars("table[key]"), ["table", "key"]);
    }

    #[test]
    fn object_keys_are_not_reads() {
        assert_eq!(vars("{count: x, other: y}"), ["x", "y"]);
        assert_eq!(vars("{[k]: v}"), ["k", "v"]);
    }

    #[test]
    fn arrow_bodies_are_a_boundary() {
        assert_eq!(vars("items.map(i => i * factor)"), ["items"]);
    }

    #[test]
    fn unknown_names_are_not_modifiers() {
        assert!(ModifierKind::lookup("foo").is_none());
        assert_eq!(ModifierKind::lookup("state"), Some(ModifierKind::State));
    }
}
