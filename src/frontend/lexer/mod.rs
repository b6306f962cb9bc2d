//! Lexer for console script
//!
//! Newlines are significant: they terminate statements, so they are
//! emitted as tokens instead of being skipped with the other whitespace.

pub mod tokenizer;
pub mod tokens;

pub use tokenizer::Lexer;
pub use tokens::{LexError, Token, TokenKind};

/// Tokenize source code. The returned vector always ends with `Eof`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }

    if let Some(err) = lexer.error {
        tracing::trace!(error = %err, "lexing failed");
        return Err(err);
    }

    let end = lexer.position();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: crate::util::span::Span::new(end, end),
    });
    tracing::trace!(count = tokens.len(), "lexed tokens");
    Ok(tokens)
}
