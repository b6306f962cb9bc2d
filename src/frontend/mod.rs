//! Console script frontend: lexing, parsing and completeness checks

pub mod classify;
pub mod lexer;
pub mod parser;

pub use classify::{classify, BlockState, Classification};
pub use lexer::{tokenize, LexError, Token, TokenKind};
pub use parser::ast::Program;
pub use parser::{ParseError, Parser};

/// Any failure to turn source text into a program
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("syntax error, {0}")]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    /// Whether the source simply stopped too early
    pub fn is_incomplete(&self) -> bool {
        match self {
            SyntaxError::Lex(err) => err.is_incomplete(),
            SyntaxError::Parse(err) => err.at_eof,
        }
    }

    /// Snippet-relative line of the failure
    pub fn line(&self) -> usize {
        match self {
            SyntaxError::Lex(err) => err.position().line,
            SyntaxError::Parse(err) => err.span.line(),
        }
    }
}

/// Parse a complete snippet
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    let tokens = tokenize(source)?;
    let program = Parser::new(tokens).parse_program()?;
    tracing::trace!(statements = program.body.len(), "parsed program");
    Ok(program)
}
