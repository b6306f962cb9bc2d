//! Tokenizer implementation

use std::iter::Peekable;
use std::str::Chars;

use super::tokens::{LexError, Token, TokenKind};
use crate::util::span::{Position, Span};

/// Main lexer structure
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    offset: usize,
    line: usize,
    column: usize,
    start: Position,
    pub error: Option<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            offset: 0,
            line: 1,
            column: 1,
            start: Position::start(),
            error: None,
        }
    }

    /// Get current position
    pub fn position(&self) -> Position {
        Position::with_offset(self.line, self.column, self.offset)
    }

    fn span(&self) -> Span {
        Span::new(self.start, self.position())
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.clone().nth(1)
    }

    fn make_token(
        &self,
        kind: TokenKind,
    ) -> Token {
        Token {
            kind,
            span: self.span(),
        }
    }

    fn fail(
        &mut self,
        error: LexError,
    ) -> Option<Token> {
        self.error = Some(error);
        None
    }

    /// Skip blanks and `#` comments, but not newlines
    fn skip_blanks_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\\' if self.peek_next() == Some('\n') => {
                    // explicit line continuation
                    self.advance();
                    self.advance();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Generate next token, `None` at end of input or after an error
    pub fn next_token(&mut self) -> Option<Token> {
        if self.error.is_some() {
            return None;
        }
        self.skip_blanks_and_comments();
        self.start = self.position();
        let c = self.advance()?;

        let token = match c {
            '\n' => self.make_token(TokenKind::Newline),
            c if is_identifier_start(c) => self.scan_identifier(c),
            c if c.is_ascii_digit() => return self.scan_number(c),
            '"' => return self.scan_string(),
            '\'' => return self.scan_raw_string(),
            ':' => {
                return match self.peek() {
                    Some(next) if is_identifier_start(next) => {
                        self.advance();
                        let name = self.take_identifier(next);
                        Some(self.make_token(TokenKind::Symbol(name)))
                    }
                    _ => self.fail(LexError::UnexpectedChar {
                        ch: ':',
                        position: self.start,
                    }),
                };
            }
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '%' => self.make_token(TokenKind::Percent),
            ',' => self.make_token(TokenKind::Comma),
            ';' => self.make_token(TokenKind::Semicolon),
            '(' => self.make_token(TokenKind::LParen),
            ')' => self.make_token(TokenKind::RParen),
            '[' => self.make_token(TokenKind::LBracket),
            ']' => self.make_token(TokenKind::RBracket),
            '=' => self.one_or_two('=', TokenKind::EqEq, TokenKind::Eq),
            '!' => self.one_or_two('=', TokenKind::Neq, TokenKind::Not),
            '<' => self.one_or_two('=', TokenKind::Le, TokenKind::Lt),
            '>' => self.one_or_two('=', TokenKind::Ge, TokenKind::Gt),
            '&' if self.peek() == Some('&') => {
                self.advance();
                self.make_token(TokenKind::And)
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                self.make_token(TokenKind::Or)
            }
            '\\' if self.peek().is_none() => {
                return self.fail(LexError::TrailingContinuation {
                    position: self.start,
                })
            }
            ch => {
                return self.fail(LexError::UnexpectedChar {
                    ch,
                    position: self.start,
                })
            }
        };
        Some(token)
    }

    fn one_or_two(
        &mut self,
        second: char,
        double: TokenKind,
        single: TokenKind,
    ) -> Token {
        if self.peek() == Some(second) {
            self.advance();
            self.make_token(double)
        } else {
            self.make_token(single)
        }
    }

    fn take_identifier(
        &mut self,
        first_char: char,
    ) -> String {
        let mut value = String::new();
        value.push(first_char);
        while let Some(c) = self.peek() {
            if !is_identifier_char(c) {
                break;
            }
            value.push(c);
            self.advance();
        }
        value
    }

    fn scan_identifier(
        &mut self,
        first_char: char,
    ) -> Token {
        let value = self.take_identifier(first_char);
        match TokenKind::keyword(&value) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Identifier(value)),
        }
    }

    fn scan_number(
        &mut self,
        first_char: char,
    ) -> Option<Token> {
        let mut literal = String::new();
        literal.push(first_char);
        let mut is_float = false;

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                literal.push(c);
                self.advance();
            } else if c == '.'
                && !is_float
                && self.peek_next().is_some_and(|n| n.is_ascii_digit())
            {
                is_float = true;
                literal.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let digits: String = literal.chars().filter(|c| *c != '_').collect();
        let kind = if is_float {
            digits.parse::<f64>().ok().map(TokenKind::FloatLiteral)
        } else {
            digits.parse::<i64>().ok().map(TokenKind::IntLiteral)
        };
        match kind {
            Some(kind) => Some(self.make_token(kind)),
            None => self.fail(LexError::InvalidNumber {
                literal,
                position: self.start,
            }),
        }
    }

    fn scan_string(&mut self) -> Option<Token> {
        let mut value = String::new();
        loop {
            let Some(c) = self.advance() else {
                return self.fail(LexError::UnterminatedString {
                    position: self.start,
                });
            };
            match c {
                '"' => break,
                '\\' => {
                    let position = self.position();
                    let Some(escaped) = self.advance() else {
                        return self.fail(LexError::UnterminatedString {
                            position: self.start,
                        });
                    };
                    match escaped {
                        'n' => value.push('\n'),
                        't' => value.push('\t'),
                        'r' => value.push('\r'),
                        '0' => value.push('\0'),
                        '\\' => value.push('\\'),
                        '"' => value.push('"'),
                        '\n' => {}
                        ch => return self.fail(LexError::InvalidEscape { ch, position }),
                    }
                }
                c => value.push(c),
            }
        }
        Some(self.make_token(TokenKind::StringLiteral(value)))
    }

    fn scan_raw_string(&mut self) -> Option<Token> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('\'') => break,
                Some('\\') if self.peek() == Some('\'') => {
                    self.advance();
                    value.push('\'');
                }
                Some(c) => value.push(c),
                None => {
                    return self.fail(LexError::UnterminatedString {
                        position: self.start,
                    })
                }
            }
        }
        Some(self.make_token(TokenKind::StringLiteral(value)))
    }
}

fn is_identifier_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

fn is_identifier_char(c: char) -> bool {
    unicode_ident::is_xid_continue(c) || c == '?'
}
