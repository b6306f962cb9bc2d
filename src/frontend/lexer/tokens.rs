//! Token types

use crate::util::span::{Position, Span};

/// Lexer error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unterminated string meets end of input (started at {position})")]
    UnterminatedString { position: Position },
    #[error("invalid escape sequence `\\{ch}' at {position}")]
    InvalidEscape { ch: char, position: Position },
    #[error("invalid number literal `{literal}' at {position}")]
    InvalidNumber { literal: String, position: Position },
    #[error("unexpected character `{ch}' at {position}")]
    UnexpectedChar { ch: char, position: Position },
    #[error("line continuation meets end of input at {position}")]
    TrailingContinuation { position: Position },
}

impl LexError {
    /// Whether more input could still turn this into valid source.
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            LexError::UnterminatedString { .. } | LexError::TrailingContinuation { .. }
        )
    }

    pub fn position(&self) -> Position {
        match self {
            LexError::UnterminatedString { position }
            | LexError::TrailingContinuation { position }
            | LexError::InvalidEscape { position, .. }
            | LexError::InvalidNumber { position, .. }
            | LexError::UnexpectedChar { position, .. } => *position,
        }
    }
}

/// Token kind
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    KwDef,
    KwEnd,
    KwIf,
    KwElsif,
    KwElse,
    KwWhile,
    KwReturn,
    KwNil,
    KwTrue,
    KwFalse,
    KwSelf,

    // Identifiers and literals
    Identifier(String),
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    Symbol(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Newline,

    Eof,
}

impl TokenKind {
    /// Look up a keyword
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "def" => TokenKind::KwDef,
            "end" => TokenKind::KwEnd,
            "if" => TokenKind::KwIf,
            "elsif" => TokenKind::KwElsif,
            "else" => TokenKind::KwElse,
            "while" => TokenKind::KwWhile,
            "return" => TokenKind::KwReturn,
            "nil" => TokenKind::KwNil,
            "true" => TokenKind::KwTrue,
            "false" => TokenKind::KwFalse,
            "self" => TokenKind::KwSelf,
            _ => return None,
        };
        Some(kind)
    }

    /// Statement terminators
    pub fn is_terminator(&self) -> bool {
        matches!(self, TokenKind::Newline | TokenKind::Semicolon)
    }

    /// Short description used in syntax error details
    pub fn describe(&self) -> String {
        match self {
            TokenKind::KwDef => "'def'".to_string(),
            TokenKind::KwEnd => "'end'".to_string(),
            TokenKind::KwIf => "'if'".to_string(),
            TokenKind::KwElsif => "'elsif'".to_string(),
            TokenKind::KwElse => "'else'".to_string(),
            TokenKind::KwWhile => "'while'".to_string(),
            TokenKind::KwReturn => "'return'".to_string(),
            TokenKind::KwNil => "'nil'".to_string(),
            TokenKind::KwTrue => "'true'".to_string(),
            TokenKind::KwFalse => "'false'".to_string(),
            TokenKind::KwSelf => "'self'".to_string(),
            TokenKind::Identifier(name) => format!("local variable or method `{name}'"),
            TokenKind::IntLiteral(n) => format!("integer literal {n}"),
            TokenKind::FloatLiteral(f) => format!("float literal {f}"),
            TokenKind::StringLiteral(_) => "string literal".to_string(),
            TokenKind::Symbol(name) => format!("symbol :{name}"),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::Eq => "'='".to_string(),
            TokenKind::EqEq => "'=='".to_string(),
            TokenKind::Neq => "'!='".to_string(),
            TokenKind::Lt => "'<'".to_string(),
            TokenKind::Le => "'<='".to_string(),
            TokenKind::Gt => "'>'".to_string(),
            TokenKind::Ge => "'>='".to_string(),
            TokenKind::And => "'&&'".to_string(),
            TokenKind::Or => "'||'".to_string(),
            TokenKind::Not => "'!'".to_string(),
            TokenKind::LParen => "'('".to_string(),
            TokenKind::RParen => "')'".to_string(),
            TokenKind::LBracket => "'['".to_string(),
            TokenKind::RBracket => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

/// Token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
