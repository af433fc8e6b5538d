pub use crate::compiler::{compile, compile_default, parse_expression, parse_program, Compiler};
pub use crate::errors::{ErrorCategory, ErrorKind, OddoError, SourceContext};

pub mod ast;
pub mod cli;
pub mod codegen;
pub mod compiler;
pub mod errors;
pub mod syntax;
