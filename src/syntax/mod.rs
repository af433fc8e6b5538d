//! Source-to-AST front half of the pipeline: lexing, parsing, and the
//! template/JSX normalization passes the parser leans on.

pub mod jsx;
pub mod lexer;
pub mod parser;
pub mod template;

pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{parse_expression, parse_program};
