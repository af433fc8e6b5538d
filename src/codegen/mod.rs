//! JavaScript code generation.
//!
//! Walks the program statement list and emits ESM source text. Statement
//! structure (declarations, returns, imports, exports, modifier expansion)
//! lives here; expression rendering is delegated to [`printer`]. The
//! runtime-library import is emitted at most once per unit, as the first
//! statement, and only when some modifier expansion needed it.

pub mod modifiers;
pub mod printer;

use crate::ast::*;
use crate::errors::{
    to_source_span, ErrorContext, ErrorKind, ErrorReporting, OddoError, SourceContext,
};
use modifiers::ModifierKind;
use printer::{print_expr, Printer, PREC_ASSIGN};

/// The identifier the emitted module binds the runtime library to.
pub const RUNTIME_IDENT: &str = "Oddo";

/// Code generator configuration.
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// Module specifier for the runtime import.
    pub runtime_library: String,
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self {
            runtime_library: "oddo".to_string(),
        }
    }
}

/// Lower a parsed program to JavaScript source text.
pub fn generate(
    program: &Program,
    config: &CodegenConfig,
    context: &SourceContext,
) -> Result<String, OddoError> {
    let mut generator = Generator {
        ctx: ErrorContext::new(context.clone(), "compile"),
        lines: Vec::new(),
        needs_runtime: false,
    };
    for stmt in &program.body {
        generator.emit_stmt(stmt, None)?;
    }

    let mut out = String::new();
    if generator.needs_runtime {
        out.push_str(&format!(
            "import {} from {};\n",
            RUNTIME_IDENT,
            printer::js_string(&config.runtime_library)
        ));
    }
    for line in &generator.lines {
        out.push_str(line);
        out.push('\n');
    }
    Ok(out)
}

struct Generator {
    ctx: ErrorContext,
    lines: Vec<String>,
    needs_runtime: bool,
}

impl Generator {
    fn emit_stmt(&mut self, stmt: &Stmt, inherited: Option<&Modifier>) -> Result<(), OddoError> {
        // Own modifier wins over one distributed from an enclosing block.
        let modifier = stmt.modifier.as_ref().or(inherited);
        let expansion = match modifier {
            Some(m) => Some((self.resolve(m)?, m)),
            None => None,
        };

        if !stmt.block.is_empty() {
            if !matches!(stmt.kind, StmtKind::Empty) {
                self.emit_kind(&stmt.kind, expansion)?;
            }
            for child in &stmt.block {
                self.emit_stmt(child, modifier)?;
            }
            return Ok(());
        }

        self.emit_kind(&stmt.kind, expansion)
    }

    fn emit_kind(
        &mut self,
        kind: &StmtKind,
        expansion: Option<(ModifierKind, &Modifier)>,
    ) -> Result<(), OddoError> {
        match kind {
            StmtKind::Empty => Ok(()),
            StmtKind::Expression(expr) => {
                let line = self.expression_stmt(expr, expansion, "")?;
                self.lines.push(line);
                Ok(())
            }
            StmtKind::Return(argument) => {
                let line = match (argument, expansion) {
                    (Some(argument), Some((kind, _))) => {
                        format!("return {};", self.expand(kind, argument)?)
                    }
                    (Some(argument), None) => {
                        format!("return {};", print_expr(argument, &self.ctx)?)
                    }
                    (None, Some((_, modifier))) => {
                        return Err(self.not_applicable(modifier));
                    }
                    (None, None) => "return;".to_string(),
                };
                self.lines.push(line);
                Ok(())
            }
            StmtKind::Import(decl) => {
                if let Some((_, modifier)) = expansion {
                    return Err(self.not_applicable(modifier));
                }
                let line = self.import_stmt(decl);
                self.lines.push(line);
                Ok(())
            }
            StmtKind::Export(decl) => {
                let line = match decl {
                    ExportDecl::Declaration(inner) => {
                        self.expression_stmt(inner, expansion, "export ")?
                    }
                    ExportDecl::Default(value) => match expansion {
                        Some((kind, _)) => {
                            format!("export default {};", self.expand(kind, value)?)
                        }
                        None => format!("export default {};", print_expr(value, &self.ctx)?),
                    },
                };
                self.lines.push(line);
                Ok(())
            }
        }
    }

    /// One expression statement, with `=` lowered to `const` and any
    /// modifier applied to the declaration value or the bare expression.
    fn expression_stmt(
        &mut self,
        expr: &Expr,
        expansion: Option<(ModifierKind, &Modifier)>,
        prefix: &str,
    ) -> Result<String, OddoError> {
        if let Expr::Declaration { target, value, .. } = expr {
            let value_text = match expansion {
                Some((kind, _)) => self.expand(kind, value)?,
                None => print_expr(value, &self.ctx)?,
            };
            let mut printer = Printer::new(&self.ctx);
            printer.push(prefix);
            printer.push("const ");
            printer.pattern(target)?;
            printer.push(" = ");
            printer.push(&value_text);
            printer.push(";");
            return Ok(printer.into_string());
        }

        let text = match expansion {
            Some((kind, _)) => self.expand(kind, expr)?,
            None => print_expr(expr, &self.ctx)?,
        };
        Ok(format!("{prefix}{text};"))
    }

    /// Rewrite a value through its modifier's runtime call.
    fn expand(&mut self, kind: ModifierKind, value: &Expr) -> Result<String, OddoError> {
        if kind.requires_function() && !value.is_arrow_function() {
            return Err(self.ctx.report(
                ErrorKind::MutateRequiresFunction,
                to_source_span(value.span()),
            ));
        }
        self.needs_runtime = true;
        let method = kind.runtime_method();

        if kind.tracks_dependencies() {
            let deps = modifiers::free_variables(value).join(", ");
            let body = self.closure_body(value)?;
            return Ok(format!(
                "{RUNTIME_IDENT}.{method}(({deps}) => {body}, [{deps}])"
            ));
        }

        Ok(format!(
            "{RUNTIME_IDENT}.{method}({})",
            print_expr(value, &self.ctx)?
        ))
    }

    /// Arrow body for the dependency closure; an object literal needs
    /// parentheses to not parse as a block.
    fn closure_body(&self, value: &Expr) -> Result<String, OddoError> {
        let mut printer = Printer::new(&self.ctx);
        if matches!(value, Expr::Object { .. }) {
            printer.push("(");
            printer.expr(value, PREC_ASSIGN)?;
            printer.push(")");
        } else {
            printer.expr(value, PREC_ASSIGN)?;
        }
        Ok(printer.into_string())
    }

    fn import_stmt(&self, decl: &ImportDecl) -> String {
        let mut parts = String::from("import ");
        if let Some(default) = &decl.default {
            parts.push_str(&default.name);
            if !decl.named.is_empty() {
                parts.push_str(", ");
            }
        }
        if !decl.named.is_empty() {
            parts.push_str("{ ");
            for (index, specifier) in decl.named.iter().enumerate() {
                if index > 0 {
                    parts.push_str(", ");
                }
                parts.push_str(&specifier.imported.name);
                if let Some(alias) = &specifier.alias {
                    parts.push_str(" as ");
                    parts.push_str(&alias.name);
                }
            }
            parts.push_str(" }");
        }
        parts.push_str(" from ");
        parts.push_str(&printer::js_string(&decl.source.value));
        parts.push(';');
        parts
    }

    fn resolve(&self, modifier: &Modifier) -> Result<ModifierKind, OddoError> {
        ModifierKind::lookup(&modifier.name).ok_or_else(|| {
            self.ctx.report(
                ErrorKind::UnknownModifier {
                    name: modifier.name.clone(),
                },
                to_source_span(modifier.span),
            )
        })
    }

    fn not_applicable(&self, modifier: &Modifier) -> OddoError {
        self.ctx.report(
            ErrorKind::ModifierNotApplicable {
                name: modifier.name.clone(),
            },
            to_source_span(modifier.span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::parser::parse_program;

    fn gen(source: &str) -> String {
        let context = SourceContext::from_file("test", source);
        let program = parse_program(source, &context).unwrap();
        generate(&program, &CodegenConfig::default(), &context).unwrap()
    }

    fn gen_err(source: &str) -> OddoError {
        let context = SourceContext::from_file("test", source);
        let program = parse_program(source, &context).unwrap();
        generate(&program, &CodegenConfig::default(), &context).unwrap_err()
    }

    #[test]
    fn declaration_lowers_to_const() {
        assert_eq!(gen("x = 1\n"), "const x = 1;\n");
    }

    #[test]
    fn assignment_never_declares() {
        assert_eq!(gen("x := 1\n"), "x = 1;\n");
        assert_eq!(gen("x +:= 2\n"), "x += 2;\n");
    }

    #[test]
    fn state_modifier_wraps_value() {
        assert_eq!(
            gen("@state x = 3\n"),
            "import Oddo from \"oddo\";\nconst x = Oddo.state(3);\n"
        );
    }

    #[test]
    fn runtime_import_emitted_once() {
        let out = gen("@state x = 3\n@state y = 5\n");
        assert_eq!(out.matches("import Oddo").count(), 1);
        assert_eq!(out.matches("Oddo.state(").count(), 2);
        assert!(out.starts_with("import Oddo from \"oddo\";\n"));
    }

    #[test]
    fn computed_collects_free_variables() {
        let out = gen("@computed sum = a + b\n");
        assert!(out.contains("const sum = Oddo.computed((a, b) => a + b, [a, b]);"));
    }

    #[test]
    fn computed_ignores_nested_arrow_bodies() {
        let out = gen("@computed view = items.map(i => i * factor)\n");
        assert!(out
            .contains("Oddo.computed((items) => items.map(i => i * factor), [items])"));
    }

    #[test]
    fn react_uses_its_own_runtime_entry() {
        let out = gen("@react log = count\n");
        assert!(out.contains("Oddo.react((count) => count, [count])"));
    }

    #[test]
    fn mutate_requires_arrow_function() {
        let out = gen("@mutate add = x => x + 1\n");
        assert!(out.contains("const add = Oddo.mutate(x => x + 1);"));

        let err = gen_err("@mutate f = 1\n");
        assert!(err.to_string().contains("must be a function"));
    }

    #[test]
    fn unknown_modifier_is_a_compile_error() {
        let err = gen_err("@foo x = 1\n");
        assert!(err.to_string().contains("Unknown modifier"));
        assert!(matches!(err.kind, ErrorKind::UnknownModifier { .. }));
    }

    #[test]
    fn block_modifier_distributes_to_children() {
        let out = gen("@state:\n  x = 1\n  y = 2\n");
        assert_eq!(out.matches("Oddo.state(").count(), 2);
        assert_eq!(out.matches("import Oddo").count(), 1);
    }

    #[test]
    fn child_modifier_overrides_block_modifier() {
        let out = gen("@state:\n  x = 1\n  @computed y = x\n");
        assert!(out.contains("const x = Oddo.state(1);"));
        assert!(out.contains("const y = Oddo.computed((x) => x, [x]);"));
    }

    #[test]
    fn modifier_applies_to_return_argument() {
        let out = gen("@computed return a + b\n");
        assert!(out.contains("return Oddo.computed((a, b) => a + b, [a, b]);"));
    }

    #[test]
    fn export_forms_round_trip() {
        assert_eq!(gen("export x = 1\n"), "export const x = 1;\n");
        assert_eq!(gen("export default x\n"), "export default x;\n");
    }

    #[test]
    fn import_forms_round_trip() {
        assert_eq!(
            gen("import utils, { map, fold as reduce } from \"lib\"\n"),
            "import utils, { map, fold as reduce } from \"lib\";\n"
        );
    }

    #[test]
    fn destructuring_declaration_prints_pattern() {
        assert_eq!(gen("[a, b = 2, ...rest] = xs\n"), "const [a, b = 2, ...rest] = xs;\n");
        assert_eq!(gen("{x, y: z} = p\n"), "const { x, y: z } = p;\n");
    }
}
