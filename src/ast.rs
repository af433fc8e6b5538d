//! The Oddo abstract syntax tree.
//!
//! Nodes are tagged variants, exclusively owned by their parent (no sharing,
//! no cycles). Every node carries a byte-offset span for diagnostics. The AST
//! is the persisted artifact of the front half of the pipeline: tokens are
//! transient, the tree produced here is what the code generator (and any
//! external tooling) consumes.

use serde::Serialize;

// All AST nodes carry a span for source tracking; enables better errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The smallest span covering both `self` and `other`.
    pub fn join(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

// ============================================================================
// PROGRAM & STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// A statement, optionally carrying an `@modifier` and/or a `:` block.
///
/// `@state:` alone is a valid statement (kind `Empty`): the modifier
/// distributes over the block children during code generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub modifier: Option<Modifier>,
    /// Children of a trailing `:` block; empty when the statement has none.
    pub block: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    Expression(Expr),
    Return(Option<Expr>),
    Import(ImportDecl),
    Export(ExportDecl),
    /// A modifier-only block header, e.g. `@state:`.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Modifier {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportDecl {
    /// `import X from "m"` default binding.
    pub default: Option<Ident>,
    /// `import { a, b as c } from "m"` named bindings.
    pub named: Vec<ImportSpecifier>,
    pub source: StringLit,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportSpecifier {
    pub imported: Ident,
    pub alias: Option<Ident>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExportDecl {
    /// `export x = 1` — the inner expression is always a `Declaration`.
    Declaration(Expr),
    /// `export default expr`.
    Default(Expr),
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberLit {
    pub value: f64,
    /// Raw source spelling, preserved for hex/binary/octal/exponent forms.
    pub raw: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLit {
    pub value: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateLit {
    /// Always `expressions.len() + 1` quasis, possibly empty strings.
    pub quasis: Vec<TemplateQuasi>,
    pub expressions: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateQuasi {
    pub raw: String,
    pub cooked: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Number(NumberLit),
    String(StringLit),
    Boolean(bool, Span),
    Null(Span),
    Template(TemplateLit),
    TaggedTemplate {
        tag: Box<Expr>,
        quasi: TemplateLit,
        span: Span,
    },
    Identifier(Ident),
    Array {
        elements: Vec<Expr>,
        span: Span,
    },
    Object {
        properties: Vec<ObjectProperty>,
        span: Span,
    },
    ArrowFunction {
        params: Vec<ArrowParam>,
        /// `...rest` parameter; must be the final slot.
        rest: Option<Box<Pattern>>,
        body: Box<Expr>,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
        /// `?.(...)` optional call.
        optional: bool,
        span: Span,
    },
    Member {
        object: Box<Expr>,
        property: MemberProperty,
        /// `?.` optional access.
        optional: bool,
        span: Span,
    },
    /// `a[start...end]`, with either bound optional.
    ArraySlice {
        object: Box<Expr>,
        start: Option<Box<Expr>>,
        end: Option<Box<Expr>>,
        /// `?.[start...end]` optional access.
        optional: bool,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        span: Span,
    },
    /// Postfix `++` / `--`.
    Update {
        op: UpdateOp,
        operand: Box<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
        span: Span,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
        span: Span,
    },
    /// `=`: introduces a new binding; the target is a pattern.
    Declaration {
        target: Pattern,
        value: Box<Expr>,
        span: Span,
    },
    /// `:=` and compound forms: mutates an existing binding or member.
    Assignment {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
        span: Span,
    },
    /// `input |> function`.
    Pipe {
        input: Box<Expr>,
        function: Box<Expr>,
        span: Span,
    },
    /// `outer <| inner`, already right-associated by the parser.
    Compose {
        outer: Box<Expr>,
        inner: Box<Expr>,
        span: Span,
    },
    /// `...expr` in array literals and call arguments.
    Spread {
        argument: Box<Expr>,
        span: Span,
    },
    JsxElement(JsxElement),
    JsxFragment(JsxFragment),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MemberProperty {
    Dot(Ident),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ObjectProperty {
    KeyValue {
        key: PropertyKey,
        value: Expr,
        span: Span,
    },
    Shorthand(Ident),
    Spread {
        argument: Expr,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PropertyKey {
    Identifier(Ident),
    String(StringLit),
    Computed(Box<Expr>),
}

// ============================================================================
// OPERATORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Not,
    Neg,
    Pos,
    BitNot,
}

impl UnaryOp {
    pub fn as_js(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::BitNot => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

impl UpdateOp {
    pub fn as_js(self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    Eq,
    NotEq,
    StrictEq,
    StrictNotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl BinaryOp {
    pub fn as_js(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Exp => "**",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UShr => ">>>",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LogicalOp {
    And,
    Or,
    Nullish,
}

impl LogicalOp {
    pub fn as_js(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
            LogicalOp::Nullish => "??",
        }
    }
}

/// Mutation operators: `:=` and its compound forms. Each maps 1:1 onto a
/// JavaScript assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Exp,
    And,
    Or,
    Nullish,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    UShr,
}

impl AssignOp {
    pub fn as_js(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::Exp => "**=",
            AssignOp::And => "&&=",
            AssignOp::Or => "||=",
            AssignOp::Nullish => "??=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
            AssignOp::UShr => ">>>=",
        }
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pattern {
    Identifier(Ident),
    Array {
        elements: Vec<ArrayPatternElement>,
        /// `...rest`; must be the final slot.
        rest: Option<Box<Pattern>>,
        span: Span,
    },
    Object {
        properties: Vec<ObjectPatternProperty>,
        /// `...rest`; must be the final slot.
        rest: Option<Ident>,
        span: Span,
    },
}

/// One arrow-function parameter: a pattern plus an optional default value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowParam {
    pub pattern: Pattern,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayPatternElement {
    pub pattern: Pattern,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectPatternProperty {
    /// Identifier or string key; computed keys are not valid in patterns.
    pub key: PropertyKey,
    pub value: Pattern,
    pub shorthand: bool,
    pub default: Option<Expr>,
    pub span: Span,
}

// ============================================================================
// JSX
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxElement {
    pub name: String,
    pub attributes: Vec<JsxAttribute>,
    pub children: Vec<JsxChild>,
    pub self_closing: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxFragment {
    pub children: Vec<JsxChild>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JsxAttribute {
    Named {
        name: String,
        /// `None` is the boolean shorthand (`<input disabled>`).
        value: Option<JsxAttrValue>,
        span: Span,
    },
    Spread {
        argument: Expr,
        span: Span,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JsxAttrValue {
    String(StringLit),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JsxChild {
    Text(JsxText),
    Element(JsxElement),
    Fragment(JsxFragment),
    Expression(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsxText {
    pub value: String,
    pub span: Span,
}

// ============================================================================
// ACCESSORS
// ============================================================================

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Number(n) => n.span,
            Expr::String(s) => s.span,
            Expr::Boolean(_, span) | Expr::Null(span) => *span,
            Expr::Template(t) => t.span,
            Expr::TaggedTemplate { span, .. } => *span,
            Expr::Identifier(i) => i.span,
            Expr::Array { span, .. }
            | Expr::Object { span, .. }
            | Expr::ArrowFunction { span, .. }
            | Expr::Call { span, .. }
            | Expr::Member { span, .. }
            | Expr::ArraySlice { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Update { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Logical { span, .. }
            | Expr::Conditional { span, .. }
            | Expr::Declaration { span, .. }
            | Expr::Assignment { span, .. }
            | Expr::Pipe { span, .. }
            | Expr::Compose { span, .. }
            | Expr::Spread { span, .. } => *span,
            Expr::JsxElement(e) => e.span,
            Expr::JsxFragment(f) => f.span,
        }
    }

    /// Human-readable tag name, used by the code generator's exhaustiveness
    /// guard and by diagnostics.
    pub fn tag(&self) -> &'static str {
        match self {
            Expr::Number(_) => "number",
            Expr::String(_) => "string",
            Expr::Boolean(..) => "boolean",
            Expr::Null(_) => "null",
            Expr::Template(_) => "template",
            Expr::TaggedTemplate { .. } => "taggedTemplate",
            Expr::Identifier(_) => "identifier",
            Expr::Array { .. } => "array",
            Expr::Object { .. } => "object",
            Expr::ArrowFunction { .. } => "arrowFunction",
            Expr::Call { .. } => "call",
            Expr::Member { .. } => "memberAccess",
            Expr::ArraySlice { .. } => "arraySlice",
            Expr::Unary { .. } => "unary",
            Expr::Update { .. } => "update",
            Expr::Binary { .. } => "binary",
            Expr::Logical { .. } => "logical",
            Expr::Conditional { .. } => "conditional",
            Expr::Declaration { .. } => "declaration",
            Expr::Assignment { .. } => "assignment",
            Expr::Pipe { .. } => "pipe",
            Expr::Compose { .. } => "compose",
            Expr::Spread { .. } => "spread",
            Expr::JsxElement(_) => "jsxElement",
            Expr::JsxFragment(_) => "jsxFragment",
        }
    }

    pub fn is_arrow_function(&self) -> bool {
        matches!(self, Expr::ArrowFunction { .. })
    }
}

impl Pattern {
    pub fn span(&self) -> Span {
        match self {
            Pattern::Identifier(i) => i.span,
            Pattern::Array { span, .. } | Pattern::Object { span, .. } => *span,
        }
    }
}
