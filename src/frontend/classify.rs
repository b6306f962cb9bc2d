//! Completeness classification of buffered console input
//!
//! Decides whether accumulated lines are ready to run, need more input,
//! or can never become valid, and reports the block depth used by the
//! prompt.

use super::lexer::{Lexer, Token, TokenKind};
use super::parser::Parser;

/// What the buffered text amounts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockState {
    /// One or more runnable statements (possibly none at all)
    Complete,
    /// More lines could still make this valid
    Incomplete,
    /// No continuation can fix this
    SyntaxError(String),
}

/// Classification result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub state: BlockState,
    /// Open `def`/`if`/`while` blocks plus open `(`/`[` delimiters
    pub level: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    Def,
    If,
    While,
    Paren,
    Bracket,
}

/// Classify `source`
pub fn classify(source: &str) -> Classification {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token() {
        tokens.push(token);
    }

    let (level, stray) = nesting(&tokens);

    if let Some(err) = lexer.error {
        let state = if err.is_incomplete() {
            BlockState::Incomplete
        } else {
            BlockState::SyntaxError(format!("syntax error, {err}"))
        };
        return Classification { state, level };
    }

    if let Some(kind) = stray {
        return Classification {
            state: BlockState::SyntaxError(format!(
                "syntax error, unexpected {}",
                kind.describe()
            )),
            level,
        };
    }

    let end = lexer.position();
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: crate::util::span::Span::new(end, end),
    });

    let state = match Parser::new(tokens).parse_program() {
        Ok(_) if level == 0 => BlockState::Complete,
        Ok(_) => BlockState::Incomplete,
        Err(err) if err.at_eof => BlockState::Incomplete,
        Err(err) => BlockState::SyntaxError(err.message),
    };
    Classification { state, level }
}

/// Block depth after `tokens`, and the first closer that matches nothing
fn nesting(tokens: &[Token]) -> (usize, Option<TokenKind>) {
    let mut stack: Vec<Opener> = Vec::new();
    for token in tokens {
        let closes = |stack: &mut Vec<Opener>, accepted: &[Opener]| -> bool {
            match stack.last() {
                Some(top) if accepted.contains(top) => {
                    stack.pop();
                    true
                }
                _ => false,
            }
        };
        let ok = match token.kind {
            TokenKind::KwDef => {
                stack.push(Opener::Def);
                true
            }
            TokenKind::KwIf => {
                stack.push(Opener::If);
                true
            }
            TokenKind::KwWhile => {
                stack.push(Opener::While);
                true
            }
            TokenKind::LParen => {
                stack.push(Opener::Paren);
                true
            }
            TokenKind::LBracket => {
                stack.push(Opener::Bracket);
                true
            }
            TokenKind::KwElsif | TokenKind::KwElse => stack.last() == Some(&Opener::If),
            TokenKind::KwEnd => closes(&mut stack, &[Opener::Def, Opener::If, Opener::While]),
            TokenKind::RParen => closes(&mut stack, &[Opener::Paren]),
            TokenKind::RBracket => closes(&mut stack, &[Opener::Bracket]),
            _ => true,
        };
        if !ok {
            return (stack.len(), Some(token.kind.clone()));
        }
    }
    (stack.len(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(source: &str) -> BlockState {
        classify(source).state
    }

    #[test]
    fn test_simple_statement_is_complete() {
        assert_eq!(classify("x = 1"), Classification {
            state: BlockState::Complete,
            level: 0,
        });
    }

    #[test]
    fn test_empty_is_complete() {
        assert_eq!(state(""), BlockState::Complete);
        assert_eq!(state("   "), BlockState::Complete);
    }

    #[test]
    fn test_open_def_is_incomplete() {
        let c = classify("def foo");
        assert_eq!(c.state, BlockState::Incomplete);
        assert_eq!(c.level, 1);
    }

    #[test]
    fn test_nested_levels() {
        assert_eq!(classify("def foo\n  if x\n    [1,").level, 3);
        assert_eq!(classify("def foo\n  if x\n  end").level, 1);
    }

    #[test]
    fn test_closed_block_is_complete() {
        assert_eq!(state("def foo\n:ok\nend; foo"), BlockState::Complete);
    }

    #[test]
    fn test_stray_end_is_syntax_error() {
        assert_eq!(
            state("end"),
            BlockState::SyntaxError("syntax error, unexpected 'end'".to_string())
        );
        assert!(matches!(state("def foo\nend\nend"), BlockState::SyntaxError(_)));
    }

    #[test]
    fn test_mismatched_delimiter_is_syntax_error() {
        assert!(matches!(state("def foo\n)"), BlockState::SyntaxError(_)));
        assert!(matches!(state("[1, 2)"), BlockState::SyntaxError(_)));
    }

    #[test]
    fn test_else_outside_if_is_syntax_error() {
        assert!(matches!(state("while x\nelse"), BlockState::SyntaxError(_)));
    }

    #[test]
    fn test_unterminated_string_is_incomplete() {
        assert_eq!(state("s = \"abc"), BlockState::Incomplete);
        assert_eq!(state("s = \"abc\ndef\""), BlockState::Complete);
    }

    #[test]
    fn test_trailing_operator_is_incomplete() {
        assert_eq!(state("1 +"), BlockState::Incomplete);
        assert_eq!(state("1 +\n2"), BlockState::Complete);
    }

    #[test]
    fn test_error_inside_open_block_is_reported_early() {
        assert!(matches!(state("def foo\n1 2"), BlockState::SyntaxError(_)));
    }

    #[test]
    fn test_invalid_character_is_syntax_error() {
        match state("a = 1 @ 2") {
            BlockState::SyntaxError(detail) => assert!(detail.contains("unexpected character `@'")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
