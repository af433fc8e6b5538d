//! The compilation pipeline.
//!
//! Ties the phases together: tokenize → parse → generate. Each entry point
//! builds a fresh `SourceContext`, so concurrent compilations never share
//! state; the whole pipeline is a pure, synchronous tree transformation.

use std::path::Path;

use crate::ast::{Expr, Program};
use crate::codegen::{self, CodegenConfig};
use crate::errors::{
    unspanned, ErrorContext, ErrorKind, ErrorReporting, OddoError, SourceContext,
};
use crate::syntax::parser;

/// Compile Oddo source text to JavaScript.
pub fn compile(source: &str, config: &CodegenConfig) -> Result<String, OddoError> {
    Compiler::new(config.clone()).compile_named("<input>", source)
}

/// Compile with the default configuration (runtime library `"oddo"`).
pub fn compile_default(source: &str) -> Result<String, OddoError> {
    compile(source, &CodegenConfig::default())
}

/// Parse source to a program AST without generating code.
pub fn parse_program(source: &str) -> Result<Program, OddoError> {
    let context = SourceContext::from_file("<input>", source);
    parser::parse_program(source, &context)
}

/// Parse a single expression without generating code.
pub fn parse_expression(source: &str) -> Result<Expr, OddoError> {
    let context = SourceContext::from_file("<input>", source);
    parser::parse_expression(source, &context)
}

// ============================================================================
// COMPILER - Pipeline orchestration for CLI and embedding callers
// ============================================================================

/// Owns the configuration and runs the full pipeline for named units.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    pub config: CodegenConfig,
}

impl Compiler {
    pub fn new(config: CodegenConfig) -> Self {
        Self { config }
    }

    /// Compile a unit whose diagnostics should name `name` as the source.
    pub fn compile_named(&self, name: &str, source: &str) -> Result<String, OddoError> {
        let context = SourceContext::from_file(name, source);
        let program = parser::parse_program(source, &context)?;
        codegen::generate(&program, &self.config, &context)
    }

    /// Read and compile a file.
    pub fn compile_file(&self, path: &Path) -> Result<String, OddoError> {
        let source = Self::read_file(path)?;
        self.compile_named(&path.display().to_string(), &source)
    }

    /// Read a source file with standardized error handling.
    pub fn read_file(path: &Path) -> Result<String, OddoError> {
        std::fs::read_to_string(path).map_err(|error| {
            let ctx = ErrorContext::new(SourceContext::default(), "compile");
            ctx.report(
                ErrorKind::FileRead {
                    path: path.display().to_string(),
                    reason: error.to_string(),
                },
                unspanned(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCategory;

    #[test]
    fn compile_is_parse_then_generate() {
        let out = compile_default("x = 1\ny := x + 1\n").unwrap();
        assert_eq!(out, "const x = 1;\ny = x + 1;\n");
    }

    #[test]
    fn config_changes_runtime_library() {
        let config = CodegenConfig {
            runtime_library: "@oddo/runtime".to_string(),
        };
        let out = compile("@state x = 1\n", &config).unwrap();
        assert!(out.starts_with("import Oddo from \"@oddo/runtime\";\n"));
    }

    #[test]
    fn parse_entry_points_do_not_generate() {
        assert!(parse_program("@foo x = 1\n").is_ok()); // unknown modifier is a compile concern
        assert!(parse_expression("1 + 2").is_ok());
    }

    #[test]
    fn error_categories_surface_per_phase() {
        assert_eq!(
            compile_default("x = №").unwrap_err().category(),
            ErrorCategory::Lex
        );
        assert_eq!(
            compile_default("x = ").unwrap_err().category(),
            ErrorCategory::Parse
        );
        assert_eq!(
            compile_default("@foo x = 1").unwrap_err().category(),
            ErrorCategory::Compile
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Compiler::read_file(Path::new("no/such/file.oddo")).unwrap_err();
        assert!(err.to_string().contains("no/such/file.oddo"));
    }
}
