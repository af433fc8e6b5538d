//! Oddo error handling.
//!
//! One error struct for the whole pipeline, in four categories matching the
//! compiler's failure taxonomy: lex, parse, build (normalization), compile.
//! All failures are synchronous and fail-fast; the core never logs or
//! recovers internally. Callers catch and present `message` to users.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};

use crate::ast::Span;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source text plus a display name, threaded explicitly through every phase.
/// There is no ambient "current source" global; each lexer/parser/generator
/// invocation receives its own context, keeping the pipeline reentrant.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::from_file("<input>", "")
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// The single error type: what went wrong, where, and how to help.
#[derive(Debug)]
pub struct OddoError {
    pub kind: ErrorKind,
    pub source_info: SourceInfo,
    pub diagnostic_info: DiagnosticInfo,
    /// Further violations found in the same pass (aggregated parse errors).
    pub related: Vec<OddoError>,
}

/// All error kinds as a clean enum; display strings are part of the public
/// contract (tooling matches on substrings like "Unknown modifier").
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    // Lex errors - unrecognized or unterminated input
    #[error("Unexpected character '{found}'")]
    UnexpectedCharacter { found: char },
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unterminated template literal")]
    UnterminatedTemplate,
    #[error("Unterminated JSX {construct}")]
    UnterminatedJsx { construct: String },
    #[error("Invalid numeric literal '{raw}'")]
    InvalidNumber { raw: String },

    // Parse errors - grammar violations
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("Expected {expected}, found end of input")]
    UnexpectedEof { expected: String },
    #[error("Unclosed '{delimiter}'")]
    UnclosedDelimiter { delimiter: char },
    #[error("Cannot declare a {target}: {target} targets must use := operator, not =")]
    InvalidDeclarationTarget { target: String },
    #[error("Invalid assignment target: {found}")]
    InvalidAssignmentTarget { found: String },
    #[error("Rest element must be the last element of its pattern")]
    RestMustBeLast,
    #[error("{} syntax errors: {}", .messages.len(), .messages.join("; "))]
    SyntaxErrors { messages: Vec<String> },

    // Build errors - required substructure missing during normalization
    #[error("Invalid destructuring target: {found}")]
    InvalidPattern { found: String },
    #[error("Malformed {construct}: required substructure missing")]
    MissingSubstructure { construct: String },
    #[error("Malformed template interpolation")]
    MalformedInterpolation,

    // Compile errors - code generation failures
    #[error("Unknown modifier '@{name}'")]
    UnknownModifier { name: String },
    #[error("@mutate value must be a function")]
    MutateRequiresFunction,
    #[error("Modifier '@{name}' requires a declaration, return, or expression")]
    ModifierNotApplicable { name: String },
    #[error("Cannot compile node of kind '{tag}'")]
    UnsupportedNode { tag: String },
    #[error("Cannot read '{path}': {reason}")]
    FileRead { path: String, reason: String },
}

/// Where the error happened.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
    pub phase: String,
}

/// Diagnostic enhancement data.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Lex,
    Parse,
    Build,
    Compile,
}

impl ErrorKind {
    /// Get the error category for test assertions and error codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnexpectedCharacter { .. }
            | Self::UnterminatedString
            | Self::UnterminatedTemplate
            | Self::UnterminatedJsx { .. }
            | Self::InvalidNumber { .. } => ErrorCategory::Lex,

            Self::UnexpectedToken { .. }
            | Self::UnexpectedEof { .. }
            | Self::UnclosedDelimiter { .. }
            | Self::InvalidDeclarationTarget { .. }
            | Self::InvalidAssignmentTarget { .. }
            | Self::RestMustBeLast
            | Self::SyntaxErrors { .. } => ErrorCategory::Parse,

            Self::InvalidPattern { .. }
            | Self::MissingSubstructure { .. }
            | Self::MalformedInterpolation => ErrorCategory::Build,

            Self::UnknownModifier { .. }
            | Self::MutateRequiresFunction
            | Self::ModifierNotApplicable { .. }
            | Self::UnsupportedNode { .. }
            | Self::FileRead { .. } => ErrorCategory::Compile,
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedCharacter { .. } => "unexpected_character",
            Self::UnterminatedString => "unterminated_string",
            Self::UnterminatedTemplate => "unterminated_template",
            Self::UnterminatedJsx { .. } => "unterminated_jsx",
            Self::InvalidNumber { .. } => "invalid_number",
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::UnexpectedEof { .. } => "unexpected_eof",
            Self::UnclosedDelimiter { .. } => "unclosed_delimiter",
            Self::InvalidDeclarationTarget { .. } => "invalid_declaration_target",
            Self::InvalidAssignmentTarget { .. } => "invalid_assignment_target",
            Self::RestMustBeLast => "rest_must_be_last",
            Self::SyntaxErrors { .. } => "syntax_errors",
            Self::InvalidPattern { .. } => "invalid_pattern",
            Self::MissingSubstructure { .. } => "missing_substructure",
            Self::MalformedInterpolation => "malformed_interpolation",
            Self::UnknownModifier { .. } => "unknown_modifier",
            Self::MutateRequiresFunction => "mutate_requires_function",
            Self::ModifierNotApplicable { .. } => "modifier_not_applicable",
            Self::UnsupportedNode { .. } => "unsupported_node",
            Self::FileRead { .. } => "file_read",
        }
    }
}

impl ErrorCategory {
    pub const fn phase_name(self) -> &'static str {
        match self {
            ErrorCategory::Lex => "lex",
            ErrorCategory::Parse => "parse",
            ErrorCategory::Build => "build",
            ErrorCategory::Compile => "compile",
        }
    }
}

// ============================================================================
// CONTEXT-AWARE ERROR CREATION
// ============================================================================

/// Context-aware error creation - each phase knows how to create
/// appropriately contextualized errors.
pub trait ErrorReporting {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> OddoError;

    fn unexpected_token(&self, expected: &str, found: &str, span: SourceSpan) -> OddoError {
        self.report(
            ErrorKind::UnexpectedToken {
                expected: expected.into(),
                found: found.into(),
            },
            span,
        )
    }

    fn unexpected_eof(&self, expected: &str, span: SourceSpan) -> OddoError {
        self.report(
            ErrorKind::UnexpectedEof {
                expected: expected.into(),
            },
            span,
        )
    }

    fn invalid_pattern(&self, found: &str, span: SourceSpan) -> OddoError {
        self.report(
            ErrorKind::InvalidPattern {
                found: found.into(),
            },
            span,
        )
    }

    fn missing_substructure(&self, construct: &str, span: SourceSpan) -> OddoError {
        self.report(
            ErrorKind::MissingSubstructure {
                construct: construct.into(),
            },
            span,
        )
    }
}

/// General-purpose error creation context used by every pipeline phase.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub source: SourceContext,
    pub phase: String,
}

impl ErrorContext {
    pub fn new(source: SourceContext, phase: impl Into<String>) -> Self {
        Self {
            source,
            phase: phase.into(),
        }
    }
}

impl ErrorReporting for ErrorContext {
    fn report(&self, kind: ErrorKind, span: SourceSpan) -> OddoError {
        let error_code = format!("oddo::{}::{}", self.phase, kind.code_suffix());

        OddoError {
            kind,
            source_info: SourceInfo {
                source: self.source.to_named_source(),
                primary_span: span,
                phase: self.phase.clone(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
            related: Vec::new(),
        }
    }
}

// ============================================================================
// TRAIT IMPLS
// ============================================================================

impl std::error::Error for OddoError {}

impl fmt::Display for OddoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Diagnostic for OddoError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        if self.related.is_empty() {
            return None;
        }
        Some(Box::new(
            self.related.iter().map(|e| e as &dyn Diagnostic),
        ))
    }
}

impl OddoError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::UnexpectedCharacter { .. } => "unrecognized here".into(),
            ErrorKind::UnterminatedString => "string starts here".into(),
            ErrorKind::UnterminatedTemplate => "template starts here".into(),
            ErrorKind::UnterminatedJsx { .. } => "JSX starts here".into(),
            ErrorKind::InvalidNumber { .. } => "invalid number".into(),
            ErrorKind::UnexpectedToken { .. } => "unexpected token".into(),
            ErrorKind::UnexpectedEof { .. } => "input ends here".into(),
            ErrorKind::UnclosedDelimiter { .. } => "opened here".into(),
            ErrorKind::InvalidDeclarationTarget { .. } => "declared here".into(),
            ErrorKind::InvalidAssignmentTarget { .. } => "assigned here".into(),
            ErrorKind::RestMustBeLast => "rest element here".into(),
            ErrorKind::SyntaxErrors { .. } => "first error here".into(),
            ErrorKind::InvalidPattern { .. } => "invalid pattern".into(),
            ErrorKind::MissingSubstructure { .. } => "malformed here".into(),
            ErrorKind::MalformedInterpolation => "interpolation here".into(),
            ErrorKind::UnknownModifier { .. } => "unknown modifier".into(),
            ErrorKind::MutateRequiresFunction => "non-function value".into(),
            ErrorKind::ModifierNotApplicable { .. } => "modifier here".into(),
            ErrorKind::UnsupportedNode { .. } => "unsupported node".into(),
            ErrorKind::FileRead { .. } => "while reading".into(),
        }
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

/// Converts an Oddo AST span to a miette SourceSpan.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

/// Placeholder span for errors not tied to a source location (I/O failures).
pub fn unspanned() -> SourceSpan {
    SourceSpan::from(0..0)
}

/// Prints an OddoError with full miette diagnostics.
///
/// Rich formatting with source spans and context; for user-facing display
/// in CLI contexts.
pub fn print_error(error: OddoError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
