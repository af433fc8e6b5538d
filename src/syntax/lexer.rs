//! The Oddo lexer.
//!
//! Converts raw source text into an ordered token stream. Overlapping
//! operator spellings are resolved by longest match (`>>>:=` before `>>:=`
//! before `>>`). Newlines are significant statement boundaries and are
//! emitted as tokens (suppressed inside brackets); other whitespace and
//! comments are discarded.
//!
//! JSX is lexed contextually: a `<` in expression-prefix position opens a
//! tag, and the lexer tracks a small mode stack (normal / inside-tag /
//! children) so that raw text spans and `{expr}` containers inside markup
//! come out as single tokens without any re-lexing.

use crate::ast::{AssignOp, Span};
use crate::errors::{ErrorContext, ErrorKind, ErrorReporting, OddoError, SourceContext};

// ============================================================================
// TOKENS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Literal text: raw spelling for numbers and templates, cooked value
    /// for strings, bare name for modifiers.
    pub text: String,
    pub span: Span,
    /// Indentation column of the line this token starts on; drives `:`
    /// block delimitation in the parser.
    pub line_indent: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    /// Tag or attribute name inside JSX markup (`-` and `.` allowed).
    JsxName,
    Number,
    String,
    /// Raw template-literal body; re-scanned by `syntax::template`.
    Template,
    Boolean,
    Null,
    Return,
    Import,
    Export,
    /// `@name`.
    Modifier,
    Newline,

    // Declaration / mutation
    Eq,
    Arrow,
    /// `:=` and every compound form, carrying its JS mapping.
    Assign(AssignOp),

    // Oddo operators
    Pipe,
    Compose,

    Question,
    Colon,
    OptionalDot,
    Nullish,
    AndAnd,
    OrOr,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    StarStar,
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Amp,
    VBar,
    Caret,
    Tilde,
    Shl,
    Shr,
    UShr,
    Bang,
    PlusPlus,
    MinusMinus,
    Dot,
    Ellipsis,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    // JSX markers
    JsxTagStart,
    JsxCloseTagStart,
    JsxTagEnd,
    JsxSelfCloseEnd,
    JsxText,

    Eof,
}

impl Token {
    /// Short rendering for "found X" diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier | TokenKind::JsxName => format!("identifier '{}'", self.text),
            TokenKind::Number => format!("number '{}'", self.text),
            TokenKind::String => "string literal".to_string(),
            TokenKind::Template => "template literal".to_string(),
            TokenKind::Boolean => format!("'{}'", self.text),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Modifier => format!("'@{}'", self.text),
            TokenKind::JsxText => "JSX text".to_string(),
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

// ============================================================================
// OPERATOR TABLE
// ============================================================================

/// Operator spellings ordered longest-first so a plain linear scan
/// implements longest-match (`>>>:=` must win over `>>:=` and `>>`).
const OPERATORS: &[(&str, TokenKind)] = &[
    (">>>:=", TokenKind::Assign(AssignOp::UShr)),
    ("**:=", TokenKind::Assign(AssignOp::Exp)),
    ("<<:=", TokenKind::Assign(AssignOp::Shl)),
    (">>:=", TokenKind::Assign(AssignOp::Shr)),
    ("&&:=", TokenKind::Assign(AssignOp::And)),
    ("||:=", TokenKind::Assign(AssignOp::Or)),
    ("??:=", TokenKind::Assign(AssignOp::Nullish)),
    ("+:=", TokenKind::Assign(AssignOp::Add)),
    ("-:=", TokenKind::Assign(AssignOp::Sub)),
    ("*:=", TokenKind::Assign(AssignOp::Mul)),
    ("/:=", TokenKind::Assign(AssignOp::Div)),
    ("%:=", TokenKind::Assign(AssignOp::Rem)),
    ("&:=", TokenKind::Assign(AssignOp::BitAnd)),
    ("|:=", TokenKind::Assign(AssignOp::BitOr)),
    ("^:=", TokenKind::Assign(AssignOp::BitXor)),
    ("===", TokenKind::EqEqEq),
    ("!==", TokenKind::NotEqEq),
    (">>>", TokenKind::UShr),
    ("...", TokenKind::Ellipsis),
    (":=", TokenKind::Assign(AssignOp::Assign)),
    ("=>", TokenKind::Arrow),
    ("|>", TokenKind::Pipe),
    ("<|", TokenKind::Compose),
    ("??", TokenKind::Nullish),
    ("?.", TokenKind::OptionalDot),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::OrOr),
    ("==", TokenKind::EqEq),
    ("!=", TokenKind::NotEq),
    ("<=", TokenKind::LtEq),
    (">=", TokenKind::GtEq),
    ("<<", TokenKind::Shl),
    (">>", TokenKind::Shr),
    ("**", TokenKind::StarStar),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("=", TokenKind::Eq),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("<", TokenKind::Lt),
    (">", TokenKind::Gt),
    ("!", TokenKind::Bang),
    ("&", TokenKind::Amp),
    ("|", TokenKind::VBar),
    ("^", TokenKind::Caret),
    ("~", TokenKind::Tilde),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    (".", TokenKind::Dot),
    (",", TokenKind::Comma),
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
];

// ============================================================================
// LEXER
// ============================================================================

/// Lexing modes. JSX markup switches the scanner into tag and children
/// modes; `{` inside markup pushes a fresh normal frame with its own brace
/// depth so `}` pops back at the right place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal { depth: usize },
    JsxTag { closing: bool },
    JsxChildren,
}

pub struct Lexer<'src> {
    src: &'src str,
    pos: usize,
    tokens: Vec<Token>,
    modes: Vec<Mode>,
    line_indent: usize,
    ctx: ErrorContext,
}

/// Tokenize Oddo source text into an ordered token stream ending in `Eof`.
pub fn tokenize(source: &str, context: &SourceContext) -> Result<Vec<Token>, OddoError> {
    Lexer::new(source, context).run()
}

impl<'src> Lexer<'src> {
    fn new(src: &'src str, context: &SourceContext) -> Self {
        Self {
            src,
            pos: 0,
            tokens: Vec::new(),
            modes: vec![Mode::Normal { depth: 0 }],
            line_indent: 0,
            ctx: ErrorContext::new(context.clone(), "lex"),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, OddoError> {
        loop {
            match *self.modes.last().unwrap_or(&Mode::Normal { depth: 0 }) {
                Mode::Normal { .. } => {
                    if !self.lex_normal()? {
                        break;
                    }
                }
                Mode::JsxTag { closing } => self.lex_jsx_tag(closing)?,
                Mode::JsxChildren => self.lex_jsx_children()?,
            }
        }
        let end = self.src.len();
        self.push(TokenKind::Eof, String::new(), Span::new(end, end));
        Ok(self.tokens)
    }

    // ------------------------------------------------------------------
    // Normal mode
    // ------------------------------------------------------------------

    /// Lex one token in normal expression mode. Returns false at end of
    /// input (only reachable in the base frame).
    fn lex_normal(&mut self) -> Result<bool, OddoError> {
        self.skip_blank()?;

        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(false);
        };

        if ch == '\n' {
            self.consume_newlines();
            if self.at_base_frame() {
                self.push(TokenKind::Newline, "\n".to_string(), Span::new(start, start + 1));
            }
            return Ok(true);
        }

        if is_ident_start(ch) {
            self.lex_identifier();
            return Ok(true);
        }
        if ch.is_ascii_digit() {
            self.lex_number()?;
            return Ok(true);
        }
        match ch {
            '"' | '\'' => {
                self.lex_string(ch)?;
                return Ok(true);
            }
            '`' => {
                self.lex_template()?;
                return Ok(true);
            }
            '@' => {
                self.lex_modifier()?;
                return Ok(true);
            }
            '<' if self.jsx_allowed() && self.looks_like_jsx() => {
                self.bump();
                self.push(TokenKind::JsxTagStart, "<".to_string(), Span::new(start, self.pos));
                self.modes.push(Mode::JsxTag { closing: false });
                return Ok(true);
            }
            _ => {}
        }

        if let Some((kind, len)) = match_operator(&self.src[self.pos..]) {
            let text = self.src[self.pos..self.pos + len].to_string();
            self.pos += len;
            self.track_depth(kind);
            self.push(kind, text, Span::new(start, self.pos));
            return Ok(true);
        }

        Err(self.ctx.report(
            ErrorKind::UnexpectedCharacter { found: ch },
            (start..start + ch.len_utf8()).into(),
        ))
    }

    /// Keep the enclosing frame's bracket depth current and pop back out of
    /// a JSX `{expr}` container when its closing brace arrives.
    fn track_depth(&mut self, kind: TokenKind) {
        let frames = self.modes.len();
        let Some(Mode::Normal { depth }) = self.modes.last_mut() else {
            return;
        };
        match kind {
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => *depth += 1,
            TokenKind::RParen | TokenKind::RBracket => *depth = depth.saturating_sub(1),
            TokenKind::RBrace => {
                if *depth == 0 && frames > 1 {
                    self.modes.pop();
                } else {
                    *depth = depth.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    // ------------------------------------------------------------------
    // JSX modes
    // ------------------------------------------------------------------

    fn lex_jsx_tag(&mut self, closing: bool) -> Result<(), OddoError> {
        self.skip_jsx_tag_whitespace();
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Err(self.ctx.report(
                ErrorKind::UnterminatedJsx {
                    construct: "tag".to_string(),
                },
                (start..start).into(),
            ));
        };

        match ch {
            '>' => {
                self.bump();
                self.push(TokenKind::JsxTagEnd, ">".to_string(), Span::new(start, self.pos));
                self.modes.pop();
                if !closing {
                    self.modes.push(Mode::JsxChildren);
                }
            }
            '/' if self.src[self.pos..].starts_with("/>") => {
                self.pos += 2;
                self.push(
                    TokenKind::JsxSelfCloseEnd,
                    "/>".to_string(),
                    Span::new(start, self.pos),
                );
                self.modes.pop();
            }
            '{' => {
                self.bump();
                self.push(TokenKind::LBrace, "{".to_string(), Span::new(start, self.pos));
                self.modes.push(Mode::Normal { depth: 0 });
            }
            '=' => {
                self.bump();
                self.push(TokenKind::Eq, "=".to_string(), Span::new(start, self.pos));
            }
            '"' | '\'' => self.lex_string(ch)?,
            _ if is_ident_start(ch) => {
                while let Some(c) = self.peek() {
                    if is_ident_continue(c) || c == '-' || c == '.' {
                        self.bump();
                    } else {
                        break;
                    }
                }
                let text = self.src[start..self.pos].to_string();
                self.push(TokenKind::JsxName, text, Span::new(start, self.pos));
            }
            _ => {
                return Err(self.ctx.report(
                    ErrorKind::UnexpectedCharacter { found: ch },
                    (start..start + ch.len_utf8()).into(),
                ))
            }
        }
        Ok(())
    }

    fn lex_jsx_children(&mut self) -> Result<(), OddoError> {
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Err(self.ctx.report(
                ErrorKind::UnterminatedJsx {
                    construct: "element".to_string(),
                },
                (start..start).into(),
            ));
        };

        match ch {
            '<' => {
                if self.src[self.pos..].starts_with("</") {
                    self.pos += 2;
                    self.push(
                        TokenKind::JsxCloseTagStart,
                        "</".to_string(),
                        Span::new(start, self.pos),
                    );
                    // The closing tag terminates this element's children.
                    self.modes.pop();
                    self.modes.push(Mode::JsxTag { closing: true });
                } else {
                    self.bump();
                    self.push(TokenKind::JsxTagStart, "<".to_string(), Span::new(start, self.pos));
                    self.modes.push(Mode::JsxTag { closing: false });
                }
            }
            '{' => {
                self.bump();
                self.push(TokenKind::LBrace, "{".to_string(), Span::new(start, self.pos));
                self.modes.push(Mode::Normal { depth: 0 });
            }
            _ => {
                // Raw text run, whitespace and newlines preserved verbatim.
                while let Some(c) = self.peek() {
                    if c == '<' || c == '{' {
                        break;
                    }
                    self.bump();
                }
                let text = self.src[start..self.pos].to_string();
                self.push(TokenKind::JsxText, text, Span::new(start, self.pos));
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Literals, identifiers, modifiers
    // ------------------------------------------------------------------

    fn lex_identifier(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
        let text = &self.src[start..self.pos];
        let kind = match text {
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            "return" => TokenKind::Return,
            "import" => TokenKind::Import,
            "export" => TokenKind::Export,
            _ => TokenKind::Identifier,
        };
        self.push(kind, text.to_string(), Span::new(start, self.pos));
    }

    fn lex_number(&mut self) -> Result<(), OddoError> {
        let start = self.pos;
        let rest = &self.src[self.pos..];

        let (radix, prefix_len): (u32, usize) = if rest.starts_with("0x") || rest.starts_with("0X")
        {
            (16, 2)
        } else if rest.starts_with("0b") || rest.starts_with("0B") {
            (2, 2)
        } else if rest.starts_with("0o") || rest.starts_with("0O") {
            (8, 2)
        } else {
            (10, 0)
        };

        if radix != 10 {
            self.pos += prefix_len;
            let digits_start = self.pos;
            while let Some(c) = self.peek() {
                if c.is_digit(radix) || c == '_' {
                    self.bump();
                } else {
                    break;
                }
            }
            let raw = self.src[start..self.pos].to_string();
            let digits: String = self.src[digits_start..self.pos]
                .chars()
                .filter(|c| *c != '_')
                .collect();
            u64::from_str_radix(&digits, radix).map_err(|_| {
                self.ctx
                    .report(ErrorKind::InvalidNumber { raw: raw.clone() }, (start..self.pos).into())
            })?;
            self.push_number(raw, start);
            return Ok(());
        }

        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            self.bump();
        }
        // Fraction: a dot only counts when followed by a digit, so `a[1...]`
        // keeps its ellipsis.
        if self.src[self.pos..].starts_with('.')
            && self.src[self.pos + 1..].starts_with(|c: char| c.is_ascii_digit())
        {
            self.bump();
            while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
                self.bump();
            }
        }
        if self.peek() == Some('e') || self.peek() == Some('E') {
            let mark = self.pos;
            self.bump();
            if self.peek() == Some('+') || self.peek() == Some('-') {
                self.bump();
            }
            if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.bump();
                }
            } else {
                // `12e` alone is an identifier boundary problem, back out.
                self.pos = mark;
            }
        }

        let raw = self.src[start..self.pos].to_string();
        let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
        cleaned.parse::<f64>().map_err(|_| {
            self.ctx
                .report(ErrorKind::InvalidNumber { raw: raw.clone() }, (start..self.pos).into())
        })?;
        self.push_number(raw, start);
        Ok(())
    }

    /// Numbers keep their raw spelling; the parser derives the value.
    fn push_number(&mut self, raw: String, start: usize) {
        self.push(TokenKind::Number, raw, Span::new(start, self.pos));
    }

    fn lex_string(&mut self, quote: char) -> Result<(), OddoError> {
        let start = self.pos;
        self.bump(); // opening quote
        let mut value = String::new();
        loop {
            let Some(c) = self.peek() else {
                return Err(self
                    .ctx
                    .report(ErrorKind::UnterminatedString, (start..start + 1).into()));
            };
            if c == '\n' {
                return Err(self
                    .ctx
                    .report(ErrorKind::UnterminatedString, (start..start + 1).into()));
            }
            self.bump();
            if c == quote {
                break;
            }
            if c == '\\' {
                let Some(esc) = self.peek() else {
                    return Err(self
                        .ctx
                        .report(ErrorKind::UnterminatedString, (start..start + 1).into()));
                };
                self.bump();
                match esc {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '0' => value.push('\0'),
                    other => value.push(other),
                }
            } else {
                value.push(c);
            }
        }
        self.push(TokenKind::String, value, Span::new(start, self.pos));
        Ok(())
    }

    /// Lex a whole template literal as one raw-span token. The body is kept
    /// verbatim (escape-aware, `${}`-depth-aware) and re-scanned during
    /// normalization.
    fn lex_template(&mut self) -> Result<(), OddoError> {
        let start = self.pos;
        self.bump(); // opening backtick
        self.scan_template_body(start)?;
        // Raw body, without the enclosing backticks.
        let text = self.src[start + 1..self.pos - 1].to_string();
        self.push(TokenKind::Template, text, Span::new(start, self.pos));
        Ok(())
    }

    fn scan_template_body(&mut self, start: usize) -> Result<(), OddoError> {
        let mut brace_depth = 0usize;
        loop {
            let Some(c) = self.peek() else {
                return Err(self
                    .ctx
                    .report(ErrorKind::UnterminatedTemplate, (start..start + 1).into()));
            };
            self.bump();
            match c {
                '\\' => {
                    if self.peek().is_some() {
                        self.bump();
                    }
                }
                '`' if brace_depth == 0 => return Ok(()),
                '`' => {
                    // Nested template inside an interpolation; consume it
                    // whole so its backtick cannot close us.
                    let nested_start = self.pos - 1;
                    self.scan_template_body(nested_start)?;
                }
                '$' if self.peek() == Some('{') => {
                    self.bump();
                    brace_depth += 1;
                }
                '}' if brace_depth > 0 => brace_depth -= 1,
                _ => {}
            }
        }
    }

    fn lex_modifier(&mut self) -> Result<(), OddoError> {
        let start = self.pos;
        self.bump(); // '@'
        let name_start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.bump();
            } else {
                break;
            }
        }
        if self.pos == name_start {
            return Err(self.ctx.report(
                ErrorKind::UnexpectedCharacter { found: '@' },
                (start..start + 1).into(),
            ));
        }
        let name = self.src[name_start..self.pos].to_string();
        self.push(TokenKind::Modifier, name, Span::new(start, self.pos));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Whitespace, newlines, JSX heuristics
    // ------------------------------------------------------------------

    /// Skip spaces, tabs, and comments; stops at newlines so they can be
    /// emitted as statement boundaries.
    fn skip_blank(&mut self) -> Result<(), OddoError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.bump();
                }
                Some('/') if self.src[self.pos..].starts_with("//") => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                Some('/') if self.src[self.pos..].starts_with("/*") => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        if self.pos >= self.src.len() {
                            return Err(self.ctx.report(
                                ErrorKind::UnclosedDelimiter { delimiter: '*' },
                                (start..start + 2).into(),
                            ));
                        }
                        if self.src[self.pos..].starts_with("*/") {
                            self.pos += 2;
                            break;
                        }
                        self.bump();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Consume a run of newlines (and blank lines) and recompute the
    /// indentation of the next line.
    fn consume_newlines(&mut self) {
        loop {
            if self.peek() != Some('\n') {
                break;
            }
            self.bump();
            let indent_start = self.pos;
            while self.peek() == Some(' ') || self.peek() == Some('\t') {
                self.bump();
            }
            self.line_indent = self.pos - indent_start;
            // A line holding only a comment or nothing is not a statement.
            let rest = &self.src[self.pos..];
            if rest.starts_with('\n') || rest.starts_with("\r\n") || rest.starts_with("//") {
                if rest.starts_with('\r') {
                    self.bump();
                }
                if rest.starts_with("//") {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                continue;
            }
            if rest.starts_with('\r') {
                self.bump();
                continue;
            }
            break;
        }
    }

    fn skip_jsx_tag_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\r' || c == '\n' {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn at_base_frame(&self) -> bool {
        self.modes.len() == 1 && matches!(self.modes[0], Mode::Normal { depth: 0 })
    }

    /// A `<` starts JSX only in expression-prefix position: at the start of
    /// input, after a newline, or after a token that cannot end an operand.
    fn jsx_allowed(&self) -> bool {
        match self.tokens.last().map(|t| t.kind) {
            None | Some(TokenKind::Newline) => true,
            Some(
                TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::String
                | TokenKind::Template
                | TokenKind::Boolean
                | TokenKind::Null
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::JsxTagEnd
                | TokenKind::JsxSelfCloseEnd,
            ) => false,
            Some(_) => true,
        }
    }

    fn looks_like_jsx(&self) -> bool {
        let mut chars = self.src[self.pos + 1..].chars();
        matches!(chars.next(), Some(c) if is_ident_start(c) || c == '>')
    }

    // ------------------------------------------------------------------
    // Primitives
    // ------------------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn push(&mut self, kind: TokenKind, text: String, span: Span) {
        self.tokens.push(Token {
            kind,
            text,
            span,
            line_indent: self.line_indent,
        });
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn match_operator(rest: &str) -> Option<(TokenKind, usize)> {
    OPERATORS
        .iter()
        .find(|(spelling, _)| rest.starts_with(spelling))
        .map(|(spelling, kind)| (*kind, spelling.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source, &SourceContext::from_file("test", source))
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn longest_match_compound_assign() {
        assert_eq!(
            kinds("x >>>:= 1"),
            vec![
                TokenKind::Identifier,
                TokenKind::Assign(AssignOp::UShr),
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn declaration_vs_assignment_tokens() {
        assert_eq!(
            kinds("x = 1\nx := 2"),
            vec![
                TokenKind::Identifier,
                TokenKind::Eq,
                TokenKind::Number,
                TokenKind::Newline,
                TokenKind::Identifier,
                TokenKind::Assign(AssignOp::Assign),
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn newlines_suppressed_in_brackets() {
        assert_eq!(
            kinds("[1,\n2]"),
            vec![
                TokenKind::LBracket,
                TokenKind::Number,
                TokenKind::Comma,
                TokenKind::Number,
                TokenKind::RBracket,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn less_than_is_not_jsx_after_operand() {
        assert_eq!(
            kinds("a < b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Lt,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn jsx_element_tokens() {
        assert_eq!(
            kinds("<div class=\"x\">hi</div>"),
            vec![
                TokenKind::JsxTagStart,
                TokenKind::JsxName,
                TokenKind::JsxName,
                TokenKind::Eq,
                TokenKind::String,
                TokenKind::JsxTagEnd,
                TokenKind::JsxText,
                TokenKind::JsxCloseTagStart,
                TokenKind::JsxName,
                TokenKind::JsxTagEnd,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn jsx_expression_container_braces_balance() {
        // The inner object's braces nest inside the `{expr}` container; only
        // the outer `}` returns the lexer to JSX children mode.
        assert_eq!(
            kinds("<div>{{n: 1}}</div>"),
            vec![
                TokenKind::JsxTagStart,
                TokenKind::JsxName,
                TokenKind::JsxTagEnd,
                TokenKind::LBrace,
                TokenKind::LBrace,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Number,
                TokenKind::RBrace,
                TokenKind::RBrace,
                TokenKind::JsxCloseTagStart,
                TokenKind::JsxName,
                TokenKind::JsxTagEnd,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn template_is_one_raw_token() {
        let tokens = tokenize(
            "`a ${b} c`",
            &SourceContext::from_file("test", "`a ${b} c`"),
        )
        .unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Template);
        assert_eq!(tokens[0].text, "a ${b} c");
    }

    #[test]
    fn unknown_character_reports_offset() {
        let err = tokenize("x = №", &SourceContext::from_file("test", "x = №")).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedCharacter { .. }));
    }

    #[test]
    fn modifier_token() {
        let tokens =
            tokenize("@state x = 1", &SourceContext::from_file("test", "@state x = 1")).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Modifier);
        assert_eq!(tokens[0].text, "state");
    }
}
