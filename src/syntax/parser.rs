//! The Oddo parser.
//!
//! A hand-written recursive-descent parser over the token stream, emitting
//! tagged-variant AST nodes directly in source order. Expression parsing is
//! a precedence ladder: each level parses its operand at the next level
//! down, then folds zero-or-more same-precedence operators against a new
//! right operand (left-associative), except conditional and assignment
//! (right-associative, at most one branch) and exponentiation and compose
//! (right-associative).
//!
//! Syntax violations are collected with statement-level recovery and
//! aggregated into a single error; a successful parse never returns a
//! partial tree.

use crate::ast::*;
use crate::errors::{
    to_source_span, ErrorContext, ErrorKind, ErrorReporting, OddoError, SourceContext,
};
use crate::syntax::lexer::{self, Token, TokenKind};
use crate::syntax::{jsx, template};

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse Oddo source code into a program AST.
pub fn parse_program(source: &str, context: &SourceContext) -> Result<Program, OddoError> {
    let tokens = lexer::tokenize(source, context)?;
    let mut parser = Parser::new(tokens, context);

    let mut body = Vec::new();
    loop {
        parser.skip_newlines();
        if parser.at(TokenKind::Eof) {
            break;
        }
        match parser.parse_stmt() {
            Ok(stmt) => body.push(stmt),
            Err(error) => {
                parser.errors.push(error);
                parser.synchronize();
            }
        }
    }

    parser.finish(Program {
        body,
        span: Span::new(0, source.len()),
    })
}

/// Parse a single expression; trailing input is a syntax error.
pub fn parse_expression(source: &str, context: &SourceContext) -> Result<Expr, OddoError> {
    let tokens = lexer::tokenize(source, context)?;
    let mut parser = Parser::new(tokens, context);
    parser.skip_newlines();
    let expr = parser.parse_expr()?;
    parser.skip_newlines();
    if !parser.at(TokenKind::Eof) {
        let found = parser.current().describe();
        return Err(parser
            .ctx
            .unexpected_token("end of input", &found, parser.current_span()));
    }
    Ok(expr)
}

// ============================================================================
// PARSER
// ============================================================================

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Parse-phase error context.
    ctx: ErrorContext,
    /// Normalization failures (pattern conversion, malformed substructures)
    /// report in the build phase.
    build_ctx: ErrorContext,
    errors: Vec<OddoError>,
}

impl Parser {
    fn new(tokens: Vec<Token>, context: &SourceContext) -> Self {
        Self {
            tokens,
            pos: 0,
            ctx: ErrorContext::new(context.clone(), "parse"),
            build_ctx: ErrorContext::new(context.clone(), "build"),
            errors: Vec::new(),
        }
    }

    /// Aggregate collected violations; success never yields a partial tree.
    fn finish(mut self, program: Program) -> Result<Program, OddoError> {
        if self.errors.is_empty() {
            return Ok(program);
        }
        if self.errors.len() == 1 {
            return Err(self.errors.remove(0));
        }
        let messages: Vec<String> = self.errors.iter().map(|e| e.kind.to_string()).collect();
        let first_span = self.errors[0].source_info.primary_span;
        let mut aggregate = self
            .ctx
            .report(ErrorKind::SyntaxErrors { messages }, first_span);
        aggregate.related = self.errors;
        Err(aggregate)
    }

    /// Skip to the start of the next statement after a syntax error.
    fn synchronize(&mut self) {
        loop {
            match self.current().kind {
                TokenKind::Eof => return,
                TokenKind::Newline => {
                    self.bump();
                    return;
                }
                _ => self.bump(),
            }
        }
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_stmt(&mut self) -> Result<Stmt, OddoError> {
        let header_indent = self.current().line_indent;
        let start = self.current().span;

        let modifier = if self.at(TokenKind::Modifier) {
            let token = self.bump_token();
            Some(Modifier {
                name: token.text,
                span: token.span,
            })
        } else {
            None
        };

        let kind = if modifier.is_some() && self.at(TokenKind::Colon) {
            // Modifier-only block header: `@state:`.
            StmtKind::Empty
        } else {
            match self.current().kind {
                TokenKind::Return => {
                    self.bump();
                    let argument = if self.stmt_boundary() {
                        None
                    } else {
                        Some(self.parse_expr()?)
                    };
                    StmtKind::Return(argument)
                }
                TokenKind::Import => StmtKind::Import(self.parse_import()?),
                TokenKind::Export => StmtKind::Export(self.parse_export()?),
                _ => StmtKind::Expression(self.parse_expr()?),
            }
        };

        let block = if self.at(TokenKind::Colon) {
            self.bump();
            self.parse_block(header_indent)?
        } else {
            Vec::new()
        };

        let end = self.previous_span();
        // Block children consume their own terminators; a blockless
        // statement must end at a newline or the end of input.
        if block.is_empty() {
            match self.current().kind {
                TokenKind::Newline => {
                    self.bump();
                }
                TokenKind::Eof => {}
                _ => {
                    let found = self.current().describe();
                    return Err(self.ctx.unexpected_token(
                        "end of statement",
                        &found,
                        self.current_span(),
                    ));
                }
            }
        }

        Ok(Stmt {
            kind,
            modifier,
            block,
            span: start.join(end),
        })
    }

    /// Parse the statements of a `:` block. The block is delimited by line
    /// indentation strictly greater than the header line; sibling depths are
    /// not checked for uniformity.
    fn parse_block(&mut self, header_indent: usize) -> Result<Vec<Stmt>, OddoError> {
        if !self.at(TokenKind::Newline) {
            let found = self.current().describe();
            return Err(self
                .ctx
                .unexpected_token("newline after ':'", &found, self.current_span()));
        }
        self.bump();

        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.at(TokenKind::Eof) || self.current().line_indent <= header_indent {
                break;
            }
            stmts.push(self.parse_stmt()?);
        }

        if stmts.is_empty() {
            return Err(self.ctx.unexpected_token(
                "indented statement after ':'",
                &self.current().describe(),
                self.current_span(),
            ));
        }
        Ok(stmts)
    }

    fn parse_import(&mut self) -> Result<ImportDecl, OddoError> {
        let start = self.expect(TokenKind::Import, "'import'")?.span;

        let mut default = None;
        let mut named = Vec::new();

        if self.at(TokenKind::LBrace) {
            named = self.parse_import_specifiers()?;
        } else {
            default = Some(self.expect_identifier("imported name")?);
            if self.eat(TokenKind::Comma) {
                named = self.parse_import_specifiers()?;
            }
        }

        self.expect_contextual("from")?;
        let source_tok = self.expect(TokenKind::String, "module path string")?;
        let source = StringLit {
            value: source_tok.text,
            span: source_tok.span,
        };
        let span = start.join(source.span);
        Ok(ImportDecl {
            default,
            named,
            source,
            span,
        })
    }

    fn parse_import_specifiers(&mut self) -> Result<Vec<ImportSpecifier>, OddoError> {
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut specifiers = Vec::new();
        while !self.at(TokenKind::RBrace) {
            let imported = self.expect_identifier("imported name")?;
            let alias = if self.at_contextual("as") {
                self.bump();
                Some(self.expect_identifier("import alias")?)
            } else {
                None
            };
            specifiers.push(ImportSpecifier { imported, alias });
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(specifiers)
    }

    fn parse_export(&mut self) -> Result<ExportDecl, OddoError> {
        self.expect(TokenKind::Export, "'export'")?;

        if self.at_contextual("default") {
            self.bump();
            let value = self.parse_expr()?;
            return Ok(ExportDecl::Default(value));
        }

        let expr = self.parse_expr()?;
        if !matches!(expr, Expr::Declaration { .. }) {
            return Err(self.ctx.unexpected_token(
                "declaration after 'export'",
                expr.tag(),
                to_source_span(expr.span()),
            ));
        }
        Ok(ExportDecl::Declaration(expr))
    }

    fn stmt_boundary(&self) -> bool {
        matches!(
            self.current().kind,
            TokenKind::Newline | TokenKind::Eof | TokenKind::Colon
        )
    }

    // ------------------------------------------------------------------
    // Expression precedence ladder
    // ------------------------------------------------------------------

    fn parse_expr(&mut self) -> Result<Expr, OddoError> {
        self.parse_assignment()
    }

    /// `=` (declaration) and `:=`/compound (assignment); right-associative,
    /// at most one branch.
    fn parse_assignment(&mut self) -> Result<Expr, OddoError> {
        let expr = self.parse_conditional()?;

        match self.current().kind {
            TokenKind::Eq => {
                self.bump();
                let value = self.parse_assignment()?;
                let target = self.declaration_pattern(expr)?;
                let span = target.span().join(value.span());
                Ok(Expr::Declaration {
                    target,
                    value: Box::new(value),
                    span,
                })
            }
            TokenKind::Assign(op) => {
                self.bump();
                let value = self.parse_assignment()?;
                if !matches!(
                    expr,
                    Expr::Identifier(_) | Expr::Member { .. } | Expr::ArraySlice { .. }
                ) {
                    return Err(self.ctx.report(
                        ErrorKind::InvalidAssignmentTarget {
                            found: expr.tag().to_string(),
                        },
                        to_source_span(expr.span()),
                    ));
                }
                let span = expr.span().join(value.span());
                Ok(Expr::Assignment {
                    op,
                    target: Box::new(expr),
                    value: Box::new(value),
                    span,
                })
            }
            _ => Ok(expr),
        }
    }

    /// `test ? consequent : alternate`; right-associative via recursion.
    fn parse_conditional(&mut self) -> Result<Expr, OddoError> {
        let test = self.parse_logical_or()?;
        if !self.eat(TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect(TokenKind::Colon, "':' in conditional")?;
        let alternate = self.parse_assignment()?;
        let span = test.span().join(alternate.span());
        Ok(Expr::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span,
        })
    }

    fn parse_logical_or(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_pipe()?;
        while self.eat(TokenKind::OrOr) {
            let right = self.parse_pipe()?;
            left = logical(LogicalOp::Or, left, right);
        }
        Ok(left)
    }

    fn parse_pipe(&mut self) -> Result<Expr, OddoError> {
        let mut input = self.parse_compose()?;
        while self.eat(TokenKind::Pipe) {
            let function = self.parse_compose()?;
            let span = input.span().join(function.span());
            input = Expr::Pipe {
                input: Box::new(input),
                function: Box::new(function),
                span,
            };
        }
        Ok(input)
    }

    /// Compose is right-associative: `c <| b <| a` is `c <| (b <| a)`.
    fn parse_compose(&mut self) -> Result<Expr, OddoError> {
        let outer = self.parse_nullish()?;
        if !self.eat(TokenKind::Compose) {
            return Ok(outer);
        }
        let inner = self.parse_compose()?;
        let span = outer.span().join(inner.span());
        Ok(Expr::Compose {
            outer: Box::new(outer),
            inner: Box::new(inner),
            span,
        })
    }

    fn parse_nullish(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_logical_and()?;
        while self.eat(TokenKind::Nullish) {
            let right = self.parse_logical_and()?;
            left = logical(LogicalOp::Nullish, left, right);
        }
        Ok(left)
    }

    fn parse_logical_and(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_bit_or()?;
        while self.eat(TokenKind::AndAnd) {
            let right = self.parse_bit_or()?;
            left = logical(LogicalOp::And, left, right);
        }
        Ok(left)
    }

    // Bitwise and shift operators slot in at their JavaScript positions;
    // the named ladder levels are unchanged around them.

    fn parse_bit_or(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_bit_xor()?;
        while self.eat(TokenKind::VBar) {
            let right = self.parse_bit_xor()?;
            left = binary(BinaryOp::BitOr, left, right);
        }
        Ok(left)
    }

    fn parse_bit_xor(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_bit_and()?;
        while self.eat(TokenKind::Caret) {
            let right = self.parse_bit_and()?;
            left = binary(BinaryOp::BitXor, left, right);
        }
        Ok(left)
    }

    fn parse_bit_and(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_equality()?;
        while self.eat(TokenKind::Amp) {
            let right = self.parse_equality()?;
            left = binary(BinaryOp::BitAnd, left, right);
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::EqEqEq => BinaryOp::StrictEq,
                TokenKind::NotEqEq => BinaryOp::StrictNotEq,
                _ => break,
            };
            self.bump();
            let right = self.parse_relational()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_shift()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.bump();
            let right = self.parse_shift()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_shift(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Shl => BinaryOp::Shl,
                TokenKind::Shr => BinaryOp::Shr,
                TokenKind::UShr => BinaryOp::UShr,
                _ => break,
            };
            self.bump();
            let right = self.parse_additive()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.bump();
            let right = self.parse_multiplicative()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, OddoError> {
        let mut left = self.parse_exponentiation()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.bump();
            let right = self.parse_exponentiation()?;
            left = binary(op, left, right);
        }
        Ok(left)
    }

    /// Exponentiation is right-associative: `2**3**2` is `2**(3**2)`.
    fn parse_exponentiation(&mut self) -> Result<Expr, OddoError> {
        let base = self.parse_unary()?;
        if !self.eat(TokenKind::StarStar) {
            return Ok(base);
        }
        let exponent = self.parse_exponentiation()?;
        Ok(binary(BinaryOp::Exp, base, exponent))
    }

    fn parse_unary(&mut self) -> Result<Expr, OddoError> {
        let op = match self.current().kind {
            TokenKind::Bang => UnaryOp::Not,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Plus => UnaryOp::Pos,
            TokenKind::Tilde => UnaryOp::BitNot,
            _ => return self.parse_postfix(),
        };
        let start = self.bump_token().span;
        let operand = self.parse_unary()?;
        let span = start.join(operand.span());
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
            span,
        })
    }

    fn parse_postfix(&mut self) -> Result<Expr, OddoError> {
        let mut expr = self.parse_call_member()?;
        loop {
            let op = match self.current().kind {
                TokenKind::PlusPlus => UpdateOp::Increment,
                TokenKind::MinusMinus => UpdateOp::Decrement,
                _ => break,
            };
            let end = self.bump_token().span;
            let span = expr.span().join(end);
            expr = Expr::Update {
                op,
                operand: Box::new(expr),
                span,
            };
        }
        Ok(expr)
    }

    /// Member access, calls, computed indexing / array slices, and tagged
    /// templates, folded left over a running callee in source order. Handles
    /// arbitrary interleavings such as `a.b()[0]?.c(x)`.
    fn parse_call_member(&mut self) -> Result<Expr, OddoError> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.current().kind {
                TokenKind::Dot => {
                    self.bump();
                    let property = self.expect_identifier("property name")?;
                    let span = expr.span().join(property.span);
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: MemberProperty::Dot(property),
                        optional: false,
                        span,
                    };
                }
                TokenKind::OptionalDot => {
                    self.bump();
                    expr = self.parse_optional_link(expr)?;
                }
                TokenKind::LBracket => {
                    self.bump();
                    expr = self.parse_index_or_slice(expr, false)?;
                }
                TokenKind::LParen => {
                    expr = self.parse_call(expr, false)?;
                }
                TokenKind::Template => {
                    let token = self.bump_token();
                    let quasi = template::parse_template(&token, &self.ctx.source)?;
                    let span = expr.span().join(token.span);
                    expr = Expr::TaggedTemplate {
                        tag: Box::new(expr),
                        quasi,
                        span,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_optional_link(&mut self, object: Expr) -> Result<Expr, OddoError> {
        match self.current().kind {
            TokenKind::LParen => self.parse_call(object, true),
            TokenKind::LBracket => {
                self.bump();
                self.parse_index_or_slice(object, true)
            }
            _ => {
                let property = self.expect_identifier("property name after '?.'")?;
                let span = object.span().join(property.span);
                Ok(Expr::Member {
                    object: Box::new(object),
                    property: MemberProperty::Dot(property),
                    optional: true,
                    span,
                })
            }
        }
    }

    fn parse_call(&mut self, callee: Expr, optional: bool) -> Result<Expr, OddoError> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut arguments = Vec::new();
        while !self.at(TokenKind::RParen) {
            arguments.push(self.parse_element()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let end = self.expect(TokenKind::RParen, "')'")?.span;
        let span = callee.span().join(end);
        Ok(Expr::Call {
            callee: Box::new(callee),
            arguments,
            optional,
            span,
        })
    }

    /// After `[`: the presence of an ellipsis token inside the brackets
    /// makes this an array slice; otherwise it is computed member access.
    fn parse_index_or_slice(&mut self, object: Expr, optional: bool) -> Result<Expr, OddoError> {
        if self.eat(TokenKind::Ellipsis) {
            // `a[...]` or `a[...end]`
            let end_expr = if self.at(TokenKind::RBracket) {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            };
            let close = self.expect(TokenKind::RBracket, "']'")?.span;
            let span = object.span().join(close);
            return Ok(Expr::ArraySlice {
                object: Box::new(object),
                start: None,
                end: end_expr,
                optional,
                span,
            });
        }

        let first = self.parse_expr()?;
        if self.eat(TokenKind::Ellipsis) {
            // `a[start...]` or `a[start...end]`
            let end_expr = if self.at(TokenKind::RBracket) {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            };
            let close = self.expect(TokenKind::RBracket, "']'")?.span;
            let span = object.span().join(close);
            return Ok(Expr::ArraySlice {
                object: Box::new(object),
                start: Some(Box::new(first)),
                end: end_expr,
                optional,
                span,
            });
        }

        let close = self.expect(TokenKind::RBracket, "']'")?.span;
        let span = object.span().join(close);
        Ok(Expr::Member {
            object: Box::new(object),
            property: MemberProperty::Computed(Box::new(first)),
            optional,
            span,
        })
    }

    // ------------------------------------------------------------------
    // Primary expressions
    // ------------------------------------------------------------------

    fn parse_primary(&mut self) -> Result<Expr, OddoError> {
        match self.current().kind {
            TokenKind::Number => {
                let token = self.bump_token();
                Ok(Expr::Number(NumberLit {
                    value: number_value(&token.text),
                    raw: token.text,
                    span: token.span,
                }))
            }
            TokenKind::String => {
                let token = self.bump_token();
                Ok(Expr::String(StringLit {
                    value: token.text,
                    span: token.span,
                }))
            }
            TokenKind::Template => {
                let token = self.bump_token();
                let lit = template::parse_template(&token, &self.ctx.source)?;
                Ok(Expr::Template(lit))
            }
            TokenKind::Boolean => {
                let token = self.bump_token();
                Ok(Expr::Boolean(token.text == "true", token.span))
            }
            TokenKind::Null => {
                let token = self.bump_token();
                Ok(Expr::Null(token.span))
            }
            TokenKind::Identifier => {
                // Single-identifier arrow header: `x => ...`
                if self.peek_kind(1) == TokenKind::Arrow {
                    return self.parse_identifier_arrow();
                }
                let token = self.bump_token();
                Ok(Expr::Identifier(Ident {
                    name: token.text,
                    span: token.span,
                }))
            }
            TokenKind::LParen => self.parse_paren_or_arrow(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::JsxTagStart => self.parse_jsx(),
            TokenKind::Eof => Err(self
                .ctx
                .unexpected_eof("expression", self.current_span())),
            _ => {
                let found = self.current().describe();
                Err(self
                    .ctx
                    .unexpected_token("expression", &found, self.current_span()))
            }
        }
    }

    fn parse_identifier_arrow(&mut self) -> Result<Expr, OddoError> {
        let token = self.bump_token();
        let param = ArrowParam {
            pattern: Pattern::Identifier(Ident {
                name: token.text,
                span: token.span,
            }),
            default: None,
            span: token.span,
        };
        self.expect(TokenKind::Arrow, "'=>'")?;
        let body = self.parse_assignment()?;
        let span = token.span.join(body.span());
        Ok(Expr::ArrowFunction {
            params: vec![param],
            rest: None,
            body: Box::new(body),
            span,
        })
    }

    /// A parenthesized group is reclassified as an arrow-function parameter
    /// list only when `=>` immediately follows; until then it is parsed as
    /// an ordinary expression.
    fn parse_paren_or_arrow(&mut self) -> Result<Expr, OddoError> {
        let open = self.expect(TokenKind::LParen, "'('")?.span;
        let mut elements = Vec::new();
        while !self.at(TokenKind::RParen) {
            elements.push(self.parse_element()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(TokenKind::RParen, "')'")?.span;

        if self.at(TokenKind::Arrow) {
            self.bump();
            let (params, rest) = self.arrow_params(elements)?;
            let body = self.parse_assignment()?;
            let span = open.join(body.span());
            return Ok(Expr::ArrowFunction {
                params,
                rest,
                body: Box::new(body),
                span,
            });
        }

        if elements.len() == 1 && !matches!(elements[0], Expr::Spread { .. }) {
            return Ok(elements.remove(0));
        }
        Err(self.ctx.unexpected_token(
            "'=>' after parameter list",
            &self.current().describe(),
            to_source_span(open.join(close)),
        ))
    }

    /// One array/argument element: a spread or an assignment-level
    /// expression.
    fn parse_element(&mut self) -> Result<Expr, OddoError> {
        if self.at(TokenKind::Ellipsis) {
            let start = self.bump_token().span;
            let argument = self.parse_assignment()?;
            let span = start.join(argument.span());
            return Ok(Expr::Spread {
                argument: Box::new(argument),
                span,
            });
        }
        self.parse_assignment()
    }

    fn parse_array_literal(&mut self) -> Result<Expr, OddoError> {
        let open = self.expect(TokenKind::LBracket, "'['")?.span;
        let mut elements = Vec::new();
        while !self.at(TokenKind::RBracket) {
            elements.push(self.parse_element()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(TokenKind::RBracket, "']'")?.span;
        Ok(Expr::Array {
            elements,
            span: open.join(close),
        })
    }

    fn parse_object_literal(&mut self) -> Result<Expr, OddoError> {
        let open = self.expect(TokenKind::LBrace, "'{'")?.span;
        let mut properties = Vec::new();
        while !self.at(TokenKind::RBrace) {
            properties.push(self.parse_object_property()?);
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        let close = self.expect(TokenKind::RBrace, "'}'")?.span;
        Ok(Expr::Object {
            properties,
            span: open.join(close),
        })
    }

    fn parse_object_property(&mut self) -> Result<ObjectProperty, OddoError> {
        match self.current().kind {
            TokenKind::Ellipsis => {
                let start = self.bump_token().span;
                let argument = self.parse_assignment()?;
                let span = start.join(argument.span());
                Ok(ObjectProperty::Spread { argument, span })
            }
            TokenKind::String => {
                let token = self.bump_token();
                let key = PropertyKey::String(StringLit {
                    value: token.text,
                    span: token.span,
                });
                self.expect(TokenKind::Colon, "':' after string key")?;
                let value = self.parse_assignment()?;
                let span = token.span.join(value.span());
                Ok(ObjectProperty::KeyValue { key, value, span })
            }
            TokenKind::LBracket => {
                // Computed key: both the key and the value are required.
                let start = self.bump_token().span;
                if self.at(TokenKind::RBracket) {
                    return Err(self
                        .build_ctx
                        .missing_substructure("computed object key", self.current_span()));
                }
                let key_expr = self.parse_expr()?;
                self.expect(TokenKind::RBracket, "']'")?;
                if !self.eat(TokenKind::Colon) {
                    return Err(self
                        .build_ctx
                        .missing_substructure("computed object property", self.current_span()));
                }
                let value = self.parse_assignment()?;
                let span = start.join(value.span());
                Ok(ObjectProperty::KeyValue {
                    key: PropertyKey::Computed(Box::new(key_expr)),
                    value,
                    span,
                })
            }
            TokenKind::Identifier => {
                let token = self.bump_token();
                let ident = Ident {
                    name: token.text,
                    span: token.span,
                };
                if self.eat(TokenKind::Colon) {
                    let value = self.parse_assignment()?;
                    let span = ident.span.join(value.span());
                    return Ok(ObjectProperty::KeyValue {
                        key: PropertyKey::Identifier(ident),
                        value,
                        span,
                    });
                }
                if self.eat(TokenKind::Eq) {
                    // Shorthand with default, meaningful once converted to a
                    // pattern: `{y = 3}`.
                    let default = self.parse_assignment()?;
                    let span = ident.span.join(default.span());
                    let target = Pattern::Identifier(ident.clone());
                    return Ok(ObjectProperty::KeyValue {
                        key: PropertyKey::Identifier(ident),
                        value: Expr::Declaration {
                            target,
                            value: Box::new(default),
                            span,
                        },
                        span,
                    });
                }
                Ok(ObjectProperty::Shorthand(ident))
            }
            _ => {
                let found = self.current().describe();
                Err(self
                    .ctx
                    .unexpected_token("object property", &found, self.current_span()))
            }
        }
    }

    // ------------------------------------------------------------------
    // JSX
    // ------------------------------------------------------------------

    fn parse_jsx(&mut self) -> Result<Expr, OddoError> {
        let start = self.expect(TokenKind::JsxTagStart, "'<'")?.span;

        // `<>` fragment
        if self.at(TokenKind::JsxTagEnd) {
            self.bump();
            let children = self.parse_jsx_children()?;
            self.expect(TokenKind::JsxCloseTagStart, "'</'")?;
            let end = self.expect(TokenKind::JsxTagEnd, "'>'")?.span;
            return Ok(Expr::JsxFragment(JsxFragment {
                children,
                span: start.join(end),
            }));
        }

        let name_tok = self.expect(TokenKind::JsxName, "JSX tag name")?;
        let name = name_tok.text;

        let mut attributes = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::JsxName => attributes.push(self.parse_jsx_attribute()?),
                TokenKind::LBrace => {
                    let brace = self.bump_token().span;
                    self.expect(TokenKind::Ellipsis, "'...' in JSX spread attribute")?;
                    let argument = self.parse_assignment()?;
                    let end = self.expect(TokenKind::RBrace, "'}'")?.span;
                    attributes.push(JsxAttribute::Spread {
                        argument,
                        span: brace.join(end),
                    });
                }
                _ => break,
            }
        }

        if self.at(TokenKind::JsxSelfCloseEnd) {
            let end = self.bump_token().span;
            return Ok(Expr::JsxElement(JsxElement {
                name,
                attributes,
                children: Vec::new(),
                self_closing: true,
                span: start.join(end),
            }));
        }

        self.expect(TokenKind::JsxTagEnd, "'>'")?;
        let children = self.parse_jsx_children()?;
        self.expect(TokenKind::JsxCloseTagStart, "'</'")?;
        let close_tok = self.expect(TokenKind::JsxName, "closing tag name")?;
        if close_tok.text != name {
            return Err(self.ctx.unexpected_token(
                &format!("'</{}>'", name),
                &format!("'</{}>'", close_tok.text),
                to_source_span(close_tok.span),
            ));
        }
        let end = self.expect(TokenKind::JsxTagEnd, "'>'")?.span;
        Ok(Expr::JsxElement(JsxElement {
            name,
            attributes,
            children,
            self_closing: false,
            span: start.join(end),
        }))
    }

    fn parse_jsx_attribute(&mut self) -> Result<JsxAttribute, OddoError> {
        let name_tok = self.expect(TokenKind::JsxName, "attribute name")?;
        let name = name_tok.text;

        if !self.eat(TokenKind::Eq) {
            // Boolean shorthand: `<input disabled>`.
            return Ok(JsxAttribute::Named {
                name,
                value: None,
                span: name_tok.span,
            });
        }

        match self.current().kind {
            TokenKind::String => {
                let token = self.bump_token();
                let span = name_tok.span.join(token.span);
                Ok(JsxAttribute::Named {
                    name,
                    value: Some(JsxAttrValue::String(StringLit {
                        value: token.text,
                        span: token.span,
                    })),
                    span,
                })
            }
            TokenKind::LBrace => {
                self.bump();
                let value = self.parse_expr()?;
                let end = self.expect(TokenKind::RBrace, "'}'")?.span;
                Ok(JsxAttribute::Named {
                    name,
                    value: Some(JsxAttrValue::Expression(value)),
                    span: name_tok.span.join(end),
                })
            }
            _ => {
                let found = self.current().describe();
                Err(self
                    .ctx
                    .unexpected_token("attribute value", &found, self.current_span()))
            }
        }
    }

    fn parse_jsx_children(&mut self) -> Result<Vec<JsxChild>, OddoError> {
        let mut raw = Vec::new();
        loop {
            match self.current().kind {
                TokenKind::JsxText => {
                    let token = self.bump_token();
                    raw.push(JsxChild::Text(JsxText {
                        value: token.text,
                        span: token.span,
                    }));
                }
                TokenKind::JsxTagStart => {
                    let expr = self.parse_jsx()?;
                    raw.push(match expr {
                        Expr::JsxElement(e) => JsxChild::Element(e),
                        Expr::JsxFragment(f) => JsxChild::Fragment(f),
                        other => JsxChild::Expression(other),
                    });
                }
                TokenKind::LBrace => {
                    self.bump();
                    if self.eat(TokenKind::RBrace) {
                        // An empty `{}` child is a comment; dropped.
                        continue;
                    }
                    let expr = self.parse_expr()?;
                    self.expect(TokenKind::RBrace, "'}'")?;
                    raw.push(JsxChild::Expression(expr));
                }
                TokenKind::JsxCloseTagStart => break,
                TokenKind::Eof => {
                    return Err(self
                        .ctx
                        .unexpected_eof("closing JSX tag", self.current_span()))
                }
                _ => {
                    let found = self.current().describe();
                    return Err(self
                        .ctx
                        .unexpected_token("JSX child", &found, self.current_span()));
                }
            }
        }
        Ok(jsx::normalize_children(raw))
    }

    // ------------------------------------------------------------------
    // Pattern conversion
    // ------------------------------------------------------------------

    /// Convert the left side of `=` into a binding pattern. Member and
    /// slice targets are mutation, not declaration; everything else invalid
    /// is a normalization failure.
    fn declaration_pattern(&mut self, expr: Expr) -> Result<Pattern, OddoError> {
        let mutation_target = match &expr {
            Expr::Member { .. } => Some("member access"),
            Expr::ArraySlice { .. } => Some("array slice"),
            _ => None,
        };
        if let Some(target) = mutation_target {
            return Err(self.ctx.report(
                ErrorKind::InvalidDeclarationTarget {
                    target: target.to_string(),
                },
                to_source_span(expr.span()),
            ));
        }
        self.pattern_from_expr(expr)
    }

    fn pattern_from_expr(&mut self, expr: Expr) -> Result<Pattern, OddoError> {
        match expr {
            Expr::Identifier(ident) => Ok(Pattern::Identifier(ident)),
            Expr::Array { elements, span } => self.array_pattern(elements, span),
            Expr::Object { properties, span } => self.object_pattern(properties, span),
            other => Err(self
                .build_ctx
                .invalid_pattern(other.tag(), to_source_span(other.span()))),
        }
    }

    fn array_pattern(&mut self, elements: Vec<Expr>, span: Span) -> Result<Pattern, OddoError> {
        let mut converted = Vec::new();
        let mut rest = None;
        let count = elements.len();
        for (index, element) in elements.into_iter().enumerate() {
            match element {
                Expr::Spread { argument, span } => {
                    if index + 1 != count {
                        return Err(self
                            .ctx
                            .report(ErrorKind::RestMustBeLast, to_source_span(span)));
                    }
                    rest = Some(Box::new(self.pattern_from_expr(*argument)?));
                }
                Expr::Declaration {
                    target,
                    value,
                    span,
                } => converted.push(ArrayPatternElement {
                    pattern: target,
                    default: Some(*value),
                    span,
                }),
                other => {
                    let span = other.span();
                    converted.push(ArrayPatternElement {
                        pattern: self.pattern_from_expr(other)?,
                        default: None,
                        span,
                    });
                }
            }
        }
        Ok(Pattern::Array {
            elements: converted,
            rest,
            span,
        })
    }

    fn object_pattern(
        &mut self,
        properties: Vec<ObjectProperty>,
        span: Span,
    ) -> Result<Pattern, OddoError> {
        let mut converted = Vec::new();
        let mut rest = None;
        let count = properties.len();
        for (index, property) in properties.into_iter().enumerate() {
            match property {
                ObjectProperty::Spread { argument, span } => {
                    if index + 1 != count {
                        return Err(self
                            .ctx
                            .report(ErrorKind::RestMustBeLast, to_source_span(span)));
                    }
                    match argument {
                        Expr::Identifier(ident) => rest = Some(ident),
                        other => {
                            return Err(self
                                .build_ctx
                                .invalid_pattern(other.tag(), to_source_span(other.span())))
                        }
                    }
                }
                ObjectProperty::Shorthand(ident) => {
                    converted.push(ObjectPatternProperty {
                        span: ident.span,
                        key: PropertyKey::Identifier(ident.clone()),
                        value: Pattern::Identifier(ident),
                        shorthand: true,
                        default: None,
                    });
                }
                ObjectProperty::KeyValue { key, value, span } => {
                    if matches!(key, PropertyKey::Computed(_)) {
                        return Err(self
                            .build_ctx
                            .invalid_pattern("computed key", to_source_span(span)));
                    }
                    let (pattern, default) = match value {
                        Expr::Declaration { target, value, .. } => (target, Some(*value)),
                        other => (self.pattern_from_expr(other)?, None),
                    };
                    let shorthand = matches!(
                        (&key, &pattern),
                        (PropertyKey::Identifier(k), Pattern::Identifier(v)) if k.name == v.name
                    );
                    converted.push(ObjectPatternProperty {
                        key,
                        value: pattern,
                        shorthand,
                        default,
                        span,
                    });
                }
            }
        }
        Ok(Pattern::Object {
            properties: converted,
            rest,
            span,
        })
    }

    /// Reclassify parenthesized-group elements as arrow parameters.
    fn arrow_params(
        &mut self,
        elements: Vec<Expr>,
    ) -> Result<(Vec<ArrowParam>, Option<Box<Pattern>>), OddoError> {
        let mut params = Vec::new();
        let mut rest = None;
        let count = elements.len();
        for (index, element) in elements.into_iter().enumerate() {
            match element {
                Expr::Spread { argument, span } => {
                    if index + 1 != count {
                        return Err(self
                            .ctx
                            .report(ErrorKind::RestMustBeLast, to_source_span(span)));
                    }
                    rest = Some(Box::new(self.pattern_from_expr(*argument)?));
                }
                Expr::Declaration {
                    target,
                    value,
                    span,
                } => params.push(ArrowParam {
                    pattern: target,
                    default: Some(*value),
                    span,
                }),
                other => {
                    let span = other.span();
                    params.push(ArrowParam {
                        pattern: self.pattern_from_expr(other)?,
                        default: None,
                        span,
                    });
                }
            }
        }
        Ok((params, rest))
    }

    // ------------------------------------------------------------------
    // Token primitives
    // ------------------------------------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_span(&self) -> miette::SourceSpan {
        to_source_span(self.current().span)
    }

    fn previous_span(&self) -> Span {
        if self.pos == 0 {
            return Span::default();
        }
        self.tokens[self.pos - 1].span
    }

    fn peek_kind(&self, offset: usize) -> TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Eof)
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.current().kind == kind
    }

    fn at_contextual(&self, word: &str) -> bool {
        self.current().kind == TokenKind::Identifier && self.current().text == word
    }

    fn bump(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn bump_token(&mut self) -> Token {
        let token = self.current().clone();
        self.bump();
        token
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, OddoError> {
        if self.at(kind) {
            return Ok(self.bump_token());
        }
        let found = self.current().describe();
        if self.at(TokenKind::Eof) {
            Err(self.ctx.unexpected_eof(expected, self.current_span()))
        } else {
            Err(self
                .ctx
                .unexpected_token(expected, &found, self.current_span()))
        }
    }

    fn expect_identifier(&mut self, expected: &str) -> Result<Ident, OddoError> {
        let token = self.expect(TokenKind::Identifier, expected)?;
        Ok(Ident {
            name: token.text,
            span: token.span,
        })
    }

    fn expect_contextual(&mut self, word: &str) -> Result<(), OddoError> {
        if self.at_contextual(word) {
            self.bump();
            return Ok(());
        }
        let found = self.current().describe();
        Err(self.ctx.unexpected_token(
            &format!("'{}'", word),
            &found,
            self.current_span(),
        ))
    }

    fn skip_newlines(&mut self) {
        while self.at(TokenKind::Newline) {
            self.bump();
        }
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    let span = left.span().join(right.span());
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}

fn logical(op: LogicalOp, left: Expr, right: Expr) -> Expr {
    let span = left.span().join(right.span());
    Expr::Logical {
        op,
        left: Box::new(left),
        right: Box::new(right),
        span,
    }
}

/// Numeric value of a raw literal; the lexer has already validated digits.
pub(crate) fn number_value(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != '_').collect();
    let parse_radix = |digits: &str, radix: u32| {
        u64::from_str_radix(digits, radix).map(|v| v as f64).unwrap_or(f64::NAN)
    };
    if let Some(digits) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        parse_radix(digits, 16)
    } else if let Some(digits) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        parse_radix(digits, 2)
    } else if let Some(digits) = cleaned.strip_prefix("0o").or_else(|| cleaned.strip_prefix("0O")) {
        parse_radix(digits, 8)
    } else {
        cleaned.parse().unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Program {
        parse_program(source, &SourceContext::from_file("test", source)).unwrap()
    }

    fn parse_expr_src(source: &str) -> Expr {
        parse_expression(source, &SourceContext::from_file("test", source)).unwrap()
    }

    #[test]
    fn addition_is_left_associative() {
        let expr = parse_expr_src("1+2+3");
        let Expr::Binary { op, left, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Add);
        assert!(matches!(*left, Expr::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn exponentiation_is_right_associative() {
        let expr = parse_expr_src("2**3**2");
        let Expr::Binary { op, right, .. } = expr else {
            panic!("expected binary");
        };
        assert_eq!(op, BinaryOp::Exp);
        assert!(matches!(*right, Expr::Binary { op: BinaryOp::Exp, .. }));
    }

    #[test]
    fn paren_group_is_expression_without_arrow() {
        let expr = parse_expr_src("(1 + 2) * 3");
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn paren_group_with_arrow_is_parameter_list() {
        let expr = parse_expr_src("(x, y) => x + y");
        let Expr::ArrowFunction { params, .. } = expr else {
            panic!("expected arrow function");
        };
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn object_pattern_default_lands_on_second_property() {
        let expr = parse_expr_src("({x, y = 3}) => x + y");
        let Expr::ArrowFunction { params, .. } = expr else {
            panic!("expected arrow function");
        };
        let Pattern::Object { properties, .. } = &params[0].pattern else {
            panic!("expected object pattern");
        };
        assert_eq!(properties.len(), 2);
        assert!(properties[0].default.is_none());
        assert!(matches!(
            properties[1].default,
            Some(Expr::Number(NumberLit { value, .. })) if value == 3.0
        ));
    }

    #[test]
    fn bare_ellipsis_slice_has_no_bounds() {
        let expr = parse_expr_src("numbers[...]");
        let Expr::ArraySlice { start, end, .. } = expr else {
            panic!("expected slice");
        };
        assert!(start.is_none());
        assert!(end.is_none());
    }

    #[test]
    fn slice_is_distinct_from_computed_access() {
        assert!(matches!(parse_expr_src("a[i]"), Expr::Member { .. }));
        assert!(matches!(parse_expr_src("a[1...3]"), Expr::ArraySlice { .. }));
        assert!(matches!(parse_expr_src("a[1...]"), Expr::ArraySlice { .. }));
        assert!(matches!(parse_expr_src("a[...3]"), Expr::ArraySlice { .. }));
    }

    #[test]
    fn member_eq_is_rejected() {
        let err =
            parse_program("x.y = 1", &SourceContext::from_file("test", "x.y = 1")).unwrap_err();
        assert!(err.to_string().contains("must use := operator, not ="));
    }

    #[test]
    fn member_colon_eq_is_accepted() {
        let program = parse("x.y := 1");
        assert!(matches!(
            program.body[0].kind,
            StmtKind::Expression(Expr::Assignment { .. })
        ));
    }

    #[test]
    fn chained_member_call_interleaving() {
        let expr = parse_expr_src("a.b()[0]?.c(x)");
        // Outermost is the optional call.
        let Expr::Call { callee, .. } = expr else {
            panic!("expected call");
        };
        assert!(matches!(*callee, Expr::Member { optional: true, .. }));
    }

    #[test]
    fn modifier_block_parses_children() {
        let program = parse("@state:\n  x = 1\n  y = 2\n");
        assert_eq!(program.body.len(), 1);
        let stmt = &program.body[0];
        assert_eq!(stmt.modifier.as_ref().unwrap().name, "state");
        assert!(matches!(stmt.kind, StmtKind::Empty));
        assert_eq!(stmt.block.len(), 2);
    }

    #[test]
    fn block_ends_at_dedent() {
        let program = parse("@state:\n  x = 1\ny = 2\n");
        assert_eq!(program.body.len(), 2);
        assert_eq!(program.body[0].block.len(), 1);
    }

    #[test]
    fn parse_failure_aggregates_all_violations() {
        let source = "x.y = 1\nz.w = 2\n";
        let err = parse_program(source, &SourceContext::from_file("test", source)).unwrap_err();
        let ErrorKind::SyntaxErrors { messages } = &err.kind else {
            panic!("expected aggregate, got {:?}", err.kind);
        };
        assert_eq!(messages.len(), 2);
        assert_eq!(err.related.len(), 2);
    }

    #[test]
    fn import_and_export_forms() {
        let program = parse("import Oddo from \"oddo\"\nimport { a, b as c } from \"m\"\nexport x = 1\nexport default x\n");
        assert_eq!(program.body.len(), 4);
        assert!(matches!(program.body[0].kind, StmtKind::Import(_)));
        assert!(matches!(
            program.body[2].kind,
            StmtKind::Export(ExportDecl::Declaration(_))
        ));
        assert!(matches!(
            program.body[3].kind,
            StmtKind::Export(ExportDecl::Default(_))
        ));
    }

    #[test]
    fn non_decimal_literals_keep_raw_spelling() {
        let expr = parse_expr_src("0xFF");
        let Expr::Number(lit) = expr else {
            panic!("expected number");
        };
        assert_eq!(lit.raw, "0xFF");
        assert_eq!(lit.value, 255.0);
    }
}
