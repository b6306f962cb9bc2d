//! Binding powers for the Pratt parser

use super::ast::BinaryOp;
use crate::frontend::lexer::TokenKind;

pub const BP_LOWEST: u8 = 0;
pub const BP_OR: u8 = 1;
pub const BP_AND: u8 = 2;
pub const BP_EQ: u8 = 3;
pub const BP_CMP: u8 = 4;
pub const BP_ADD: u8 = 5;
pub const BP_MUL: u8 = 6;
pub const BP_UNARY: u8 = 7;

/// Infix operator for a token, with its left binding power
pub fn infix_operator(kind: &TokenKind) -> Option<(BinaryOp, u8)> {
    let op = match kind {
        TokenKind::Or => (BinaryOp::Or, BP_OR),
        TokenKind::And => (BinaryOp::And, BP_AND),
        TokenKind::EqEq => (BinaryOp::Eq, BP_EQ),
        TokenKind::Neq => (BinaryOp::Neq, BP_EQ),
        TokenKind::Lt => (BinaryOp::Lt, BP_CMP),
        TokenKind::Le => (BinaryOp::Le, BP_CMP),
        TokenKind::Gt => (BinaryOp::Gt, BP_CMP),
        TokenKind::Ge => (BinaryOp::Ge, BP_CMP),
        TokenKind::Plus => (BinaryOp::Add, BP_ADD),
        TokenKind::Minus => (BinaryOp::Sub, BP_ADD),
        TokenKind::Star => (BinaryOp::Mul, BP_MUL),
        TokenKind::Slash => (BinaryOp::Div, BP_MUL),
        TokenKind::Percent => (BinaryOp::Rem, BP_MUL),
        _ => return None,
    };
    Some(op)
}
