//! Pratt parser for console script

pub mod ast;
pub mod precedence;

use std::rc::Rc;

use self::ast::{Expr, ExprKind, FunctionDef, Program, UnaryOp};
use self::precedence::{infix_operator, BP_LOWEST, BP_UNARY};
use crate::frontend::lexer::{Token, TokenKind};
use crate::util::span::{Position, Span};
use crate::util::stack::ensure_sufficient_stack;

/// Deepest expression nesting the parser accepts.
///
/// Every operand, every chained infix operator and every index counts one
/// level, so the cap also bounds the depth of the resulting tree.
pub const MAX_NESTING: usize = 1000;

/// Parse error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// The parser ran out of tokens rather than meeting a wrong one
    pub at_eof: bool,
}

type ParseResult<T> = Result<T, ParseError>;

/// Parser state over a token vector that ends with `Eof`
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

fn is_block_end(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::KwEnd | TokenKind::KwElsif | TokenKind::KwElse
    )
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| &t.kind),
            Some(TokenKind::Eof)
        ));
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse a whole snippet
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let body = self.parse_statements(|_| false)?;
        if !self.at_eof() {
            return Err(self.unexpected());
        }
        Ok(Program { body })
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_eof() {
            self.pos += 1;
        }
        token
    }

    fn start(&self) -> Position {
        self.current().span.start
    }

    fn span_from(
        &self,
        start: Position,
    ) -> Span {
        let end = self
            .pos
            .checked_sub(1)
            .map(|prev| self.tokens[prev].span.end)
            .unwrap_or(start);
        Span::new(start, end)
    }

    fn unexpected(&self) -> ParseError {
        let token = self.current();
        ParseError {
            message: format!("syntax error, unexpected {}", token.kind.describe()),
            span: token.span,
            at_eof: matches!(token.kind, TokenKind::Eof),
        }
    }

    fn expect(
        &mut self,
        kind: TokenKind,
    ) -> ParseResult<Token> {
        if *self.peek() == kind {
            Ok(self.advance())
        } else {
            let mut err = self.unexpected();
            err.message = format!("{}, expecting {}", err.message, kind.describe());
            Err(err)
        }
    }

    fn skip_newlines(&mut self) {
        while matches!(self.peek(), TokenKind::Newline) {
            self.advance();
        }
    }

    fn skip_terminators(&mut self) {
        while self.peek().is_terminator() {
            self.advance();
        }
    }

    /// Statements until end of input or a token accepted by `stop`
    fn parse_statements(
        &mut self,
        stop: impl Fn(&TokenKind) -> bool,
    ) -> ParseResult<Vec<Expr>> {
        let mut body = Vec::new();
        loop {
            self.skip_terminators();
            if self.at_eof() || stop(self.peek()) {
                break;
            }
            body.push(self.parse_expr(BP_LOWEST)?);
            let next = self.peek();
            if next.is_terminator() {
                continue;
            }
            if matches!(next, TokenKind::Eof) || stop(next) {
                break;
            }
            return Err(self.unexpected());
        }
        Ok(body)
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Expr>> {
        self.parse_statements(is_block_end)
    }

    /// Go one nesting level deeper
    fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError {
                message: "syntax error, nesting too deep".to_string(),
                span: self.current().span,
                at_eof: false,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn parse_expr(
        &mut self,
        min_bp: u8,
    ) -> ParseResult<Expr> {
        let depth = self.depth;
        let result = self
            .enter()
            .and_then(|()| ensure_sufficient_stack(|| self.parse_expr_inner(min_bp)));
        self.depth = depth;
        result
    }

    fn parse_expr_inner(
        &mut self,
        min_bp: u8,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let mut left = self.parse_prefix()?;

        loop {
            if matches!(self.peek(), TokenKind::LBracket) {
                self.enter()?;
                self.advance();
                self.skip_newlines();
                let index = self.parse_expr(BP_LOWEST)?;
                self.skip_newlines();
                self.expect(TokenKind::RBracket)?;
                left = Expr::new(
                    ExprKind::Index {
                        target: Box::new(left),
                        index: Box::new(index),
                    },
                    self.span_from(start),
                );
                continue;
            }

            let Some((op, bp)) = infix_operator(self.peek()) else {
                break;
            };
            if bp <= min_bp {
                break;
            }
            self.enter()?;
            self.advance();
            self.skip_newlines();
            let right = self.parse_expr(bp)?;
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                self.span_from(start),
            );
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        let kind = match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                return self.parse_identifier(name, start);
            }
            TokenKind::IntLiteral(n) => {
                self.advance();
                ExprKind::Int(n)
            }
            TokenKind::FloatLiteral(f) => {
                self.advance();
                ExprKind::Float(f)
            }
            TokenKind::StringLiteral(s) => {
                self.advance();
                ExprKind::Str(s)
            }
            TokenKind::Symbol(s) => {
                self.advance();
                ExprKind::Symbol(s)
            }
            TokenKind::KwNil => {
                self.advance();
                ExprKind::Nil
            }
            TokenKind::KwTrue => {
                self.advance();
                ExprKind::Bool(true)
            }
            TokenKind::KwFalse => {
                self.advance();
                ExprKind::Bool(false)
            }
            TokenKind::KwSelf => {
                self.advance();
                ExprKind::SelfRef
            }
            TokenKind::LBracket => {
                self.advance();
                ExprKind::Array(self.parse_list(TokenKind::RBracket)?)
            }
            TokenKind::LParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.parse_expr(BP_LOWEST)?;
                self.skip_newlines();
                self.expect(TokenKind::RParen)?;
                return Ok(inner);
            }
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expr(BP_UNARY)?;
                ExprKind::Unary {
                    op: UnaryOp::Neg,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Not => {
                self.advance();
                let operand = self.parse_expr(BP_UNARY)?;
                ExprKind::Unary {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                }
            }
            TokenKind::KwDef => return self.parse_def(),
            TokenKind::KwIf => return self.parse_if(),
            TokenKind::KwWhile => return self.parse_while(),
            TokenKind::KwReturn => {
                self.advance();
                let next = self.peek();
                let value = if next.is_terminator()
                    || is_block_end(next)
                    || matches!(next, TokenKind::Eof | TokenKind::RParen)
                {
                    None
                } else {
                    Some(Box::new(self.parse_expr(BP_LOWEST)?))
                };
                ExprKind::Return(value)
            }
            _ => return Err(self.unexpected()),
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    fn parse_identifier(
        &mut self,
        name: String,
        start: Position,
    ) -> ParseResult<Expr> {
        let kind = match self.peek() {
            TokenKind::Eq => {
                self.advance();
                self.skip_newlines();
                let value = self.parse_expr(BP_LOWEST)?;
                ExprKind::Assign {
                    name,
                    value: Box::new(value),
                }
            }
            TokenKind::LParen => {
                self.advance();
                let args = self.parse_list(TokenKind::RParen)?;
                ExprKind::Call { name, args }
            }
            _ => ExprKind::Var(name),
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Comma separated expressions after an opening delimiter
    fn parse_list(
        &mut self,
        close: TokenKind,
    ) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        loop {
            self.skip_newlines();
            if *self.peek() == close {
                break;
            }
            items.push(self.parse_expr(BP_LOWEST)?);
            self.skip_newlines();
            if matches!(self.peek(), TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        self.expect(close)?;
        Ok(items)
    }

    fn expect_terminator(&mut self) -> ParseResult<()> {
        if self.peek().is_terminator() {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn parse_def(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::KwDef)?;
        let name = match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                name
            }
            _ => return Err(self.unexpected()),
        };

        let mut params = Vec::new();
        if matches!(self.peek(), TokenKind::LParen) {
            self.advance();
            loop {
                self.skip_newlines();
                match self.peek().clone() {
                    TokenKind::RParen => break,
                    TokenKind::Identifier(param) => {
                        self.advance();
                        params.push(param);
                    }
                    _ => return Err(self.unexpected()),
                }
                self.skip_newlines();
                if matches!(self.peek(), TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
            self.expect(TokenKind::RParen)?;
        }

        let body = self.parse_block()?;
        self.expect(TokenKind::KwEnd)?;
        let span = self.span_from(start);
        Ok(Expr::new(
            ExprKind::Def(Rc::new(FunctionDef {
                name,
                params,
                body,
                span,
            })),
            span,
        ))
    }

    fn parse_if(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::KwIf)?;
        let mut branches = Vec::new();
        let mut otherwise = None;

        let condition = self.parse_expr(BP_LOWEST)?;
        self.expect_terminator()?;
        branches.push((condition, self.parse_block()?));

        loop {
            match self.peek() {
                TokenKind::KwElsif => {
                    self.advance();
                    let condition = self.parse_expr(BP_LOWEST)?;
                    self.expect_terminator()?;
                    branches.push((condition, self.parse_block()?));
                }
                TokenKind::KwElse => {
                    self.advance();
                    otherwise = Some(self.parse_block()?);
                    self.expect(TokenKind::KwEnd)?;
                    break;
                }
                _ => {
                    self.expect(TokenKind::KwEnd)?;
                    break;
                }
            }
        }

        Ok(Expr::new(
            ExprKind::If {
                branches,
                otherwise,
            },
            self.span_from(start),
        ))
    }

    fn parse_while(&mut self) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::KwWhile)?;
        let condition = self.parse_expr(BP_LOWEST)?;
        self.expect_terminator()?;
        let body = self.parse_block()?;
        self.expect(TokenKind::KwEnd)?;
        Ok(Expr::new(
            ExprKind::While {
                condition: Box::new(condition),
                body,
            },
            self.span_from(start),
        ))
    }
}
