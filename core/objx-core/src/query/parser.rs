//! Recursive-descent parser for the nested query grammar
//!
//! ```text
//! expr  := op "(" args ")"
//! args  := field "," literal          (comparison op)
//!        | expr ("," expr)*           (logical op)
//! ```
//!
//! Nesting is limited to `max_depth` levels (a leaf counts as one), which
//! keeps the recursive parser, planner and matcher inside the thread's stack.
//! The same parser reads the engine's native compiled form when run with
//! [`Dialect::Native`].

use crate::error::{ObjxError, ObjxResult};
use crate::query::ast::Expr;
use crate::query::lexer::{Token, TokenKind, tokenize};
use crate::query::operator::Operator;
use crate::value::unquote;

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Hard upper bound for any configured nesting limit.
pub const DEPTH_CEILING: usize = 192;

/// Accepted surface syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    /// User-facing DSL: any operator spelling, bare or quoted field names.
    Dsl,
    /// Compiled form: canonical operator names, quoted field names.
    Native,
}

pub(crate) struct Parser<'a> {
    query: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
    dialect: Dialect,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(query: &'a str, dialect: Dialect) -> ObjxResult<Self> {
        Ok(Self {
            query,
            tokens: tokenize(query)?,
            pos: 0,
            dialect,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    /// Caps nesting at `max_depth` levels, clamped to `1..=DEPTH_CEILING`.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.clamp(1, DEPTH_CEILING);
        self
    }

    /// Parses a complete expression; trailing input is an error.
    pub fn parse(mut self) -> ObjxResult<Expr> {
        let expr = self.parse_expr()?;
        if let Some(token) = self.peek() {
            return Err(self.error_at(
                format!("unexpected {} after end of expression", token.describe()),
                token.offset,
            ));
        }
        Ok(expr)
    }

    fn parse_expr(&mut self) -> ObjxResult<Expr> {
        let op = self.parse_operator()?;
        let open = self.expect(TokenKind::LParen, "'('")?;
        if self.depth >= self.max_depth {
            return Err(self.error_at(
                format!("nesting deeper than {} levels", self.max_depth),
                open,
            ));
        }

        self.depth += 1;
        let expr = self.parse_args(op);
        self.depth -= 1;
        expr
    }

    fn parse_args(&mut self, op: Operator) -> ObjxResult<Expr> {
        if op.is_comparison() {
            let field = self.parse_field()?;
            self.expect(TokenKind::Comma, "',' between field and value")?;
            let value = self.parse_literal()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(Expr::leaf(op, field, value));
        }

        if let Some(token) = self.peek()
            && token.kind == TokenKind::RParen
        {
            return Err(self.error_at(format!("'{op}' needs at least one expression"), token.offset));
        }

        let mut children = Vec::new();
        loop {
            children.push(self.parse_expr()?);
            match self.next() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => continue,
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                }) => break,
                Some(token) => {
                    return Err(self.error_at(
                        format!("expected ',' or ')', found {}", token.describe()),
                        token.offset,
                    ));
                }
                None => return Err(self.error_at("unclosed '('", self.query.len())),
            }
        }
        Ok(Expr::group(op, children))
    }

    fn parse_operator(&mut self) -> ObjxResult<Operator> {
        let token = self.next_or_eof("operator")?;
        let TokenKind::Word(word) = token.kind else {
            return Err(self.error_at(
                format!("expected operator, found {}", token.describe()),
                token.offset,
            ));
        };

        let op = Operator::parse(word).ok_or_else(|| ObjxError::InvalidOperator {
            token: word.to_string(),
            query: self.query.to_string(),
        })?;
        if self.dialect == Dialect::Native && word != op.name() {
            return Err(ObjxError::InvalidOperator {
                token: word.to_string(),
                query: self.query.to_string(),
            });
        }
        Ok(op)
    }

    fn parse_field(&mut self) -> ObjxResult<String> {
        let token = self.next_or_eof("field name")?;
        match (token.kind, self.dialect) {
            (TokenKind::Word(word), Dialect::Dsl) => Ok(word.to_string()),
            (TokenKind::Quoted(raw), _) => unquote(raw)
                .filter(|field| !field.is_empty())
                .ok_or_else(|| self.error_at("empty field name", token.offset)),
            _ => Err(self.error_at(
                format!("expected field name, found {}", token.describe()),
                token.offset,
            )),
        }
    }

    fn parse_literal(&mut self) -> ObjxResult<String> {
        let token = self.next_or_eof("value")?;
        match token.kind {
            TokenKind::Word(raw) | TokenKind::Quoted(raw) => Ok(raw.to_string()),
            _ => Err(self.error_at(
                format!("expected value, found {}", token.describe()),
                token.offset,
            )),
        }
    }

    /// Consumes a token of `kind` and returns its offset.
    fn expect(&mut self, kind: TokenKind<'static>, what: &str) -> ObjxResult<usize> {
        let token = self.next_or_eof(what)?;
        if token.kind == kind {
            Ok(token.offset)
        } else {
            Err(self.error_at(
                format!("expected {what}, found {}", token.describe()),
                token.offset,
            ))
        }
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn next_or_eof(&mut self, what: &str) -> ObjxResult<Token<'a>> {
        self.next()
            .ok_or_else(|| self.error_at(format!("expected {what}, found end of query"), self.query.len()))
    }

    fn error_at(&self, message: impl Into<String>, span: usize) -> ObjxError {
        ObjxError::malformed(message, span, self.query)
    }
}

/// Parses user query text with the nested grammar.
pub fn parse(query: &str) -> ObjxResult<Expr> {
    parse_with_depth(query, DEFAULT_MAX_DEPTH)
}

pub(crate) fn parse_with_depth(query: &str, max_depth: usize) -> ObjxResult<Expr> {
    Parser::new(query, Dialect::Dsl)?
        .with_max_depth(max_depth)
        .parse()
}
