//! 二元运算符优先级表
//!
//! 数字越大结合越紧。一元运算符比所有二元运算符都紧，后缀运算最紧。

use crate::ast::BinaryOp;
use crate::lexer::TokenKind;
use crate::parser::Parser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpInfo {
    pub op: BinaryOp,
    pub precedence: u8,
    pub assoc: Assoc,
}

const fn entry(op: BinaryOp, precedence: u8, assoc: Assoc) -> OpInfo {
    OpInfo {
        op,
        precedence,
        assoc,
    }
}

/// 条件表达式 `c ? a : b` 的优先级 (右结合)
pub(crate) const CONDITIONAL: u8 = 2;

/// 运算符 -> (优先级, 结合性)
pub static PRECEDENCE_TABLE: [OpInfo; 24] = [
    entry(BinaryOp::Elvis, 1, Assoc::Right),
    entry(BinaryOp::Or, 3, Assoc::Left),
    entry(BinaryOp::And, 4, Assoc::Left),
    entry(BinaryOp::BitOr, 5, Assoc::Left),
    entry(BinaryOp::BitXor, 6, Assoc::Left),
    entry(BinaryOp::BitAnd, 7, Assoc::Left),
    entry(BinaryOp::Eq, 8, Assoc::Left),
    entry(BinaryOp::NotEq, 8, Assoc::Left),
    entry(BinaryOp::RefEq, 8, Assoc::Left),
    entry(BinaryOp::RefNotEq, 8, Assoc::Left),
    entry(BinaryOp::Lt, 9, Assoc::Left),
    entry(BinaryOp::Gt, 9, Assoc::Left),
    entry(BinaryOp::LtEq, 9, Assoc::Left),
    entry(BinaryOp::GtEq, 9, Assoc::Left),
    entry(BinaryOp::ClosedRange, 10, Assoc::Left),
    entry(BinaryOp::HalfOpenRange, 10, Assoc::Left),
    entry(BinaryOp::Shl, 11, Assoc::Left),
    entry(BinaryOp::Shr, 11, Assoc::Left),
    entry(BinaryOp::UnsignedShr, 11, Assoc::Left),
    entry(BinaryOp::Add, 12, Assoc::Left),
    entry(BinaryOp::Sub, 12, Assoc::Left),
    entry(BinaryOp::Mul, 13, Assoc::Left),
    entry(BinaryOp::Div, 13, Assoc::Left),
    entry(BinaryOp::Mod, 13, Assoc::Left),
];

pub fn op_info(op: BinaryOp) -> OpInfo {
    PRECEDENCE_TABLE
        .iter()
        .copied()
        .find(|info| info.op == op)
        .unwrap_or(entry(op, 0, Assoc::Left))
}

impl Parser {
    /// 当前位置的二元运算符及其占用的 token 数
    ///
    /// 移位运算由紧贴的 `<` / `>` 组成；后面紧跟 `=` 的组合是复合赋值，不在这里处理。
    pub(crate) fn peek_binary_op(&self) -> Option<(BinaryOp, usize)> {
        let op = match self.peek() {
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Lt => {
                if self.glued(1) {
                    match self.nth(1) {
                        TokenKind::Lt => return Some((BinaryOp::Shl, 2)),
                        TokenKind::LtEq => return None,
                        _ => {}
                    }
                }
                BinaryOp::Lt
            }
            TokenKind::Gt => {
                if self.glued(1) {
                    match self.nth(1) {
                        TokenKind::Gt => {
                            if self.glued(2) {
                                match self.nth(2) {
                                    TokenKind::Gt => return Some((BinaryOp::UnsignedShr, 3)),
                                    TokenKind::GtEq => return None,
                                    _ => {}
                                }
                            }
                            return Some((BinaryOp::Shr, 2));
                        }
                        TokenKind::GtEq => return None,
                        _ => {}
                    }
                }
                BinaryOp::Gt
            }
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::RefEq => BinaryOp::RefEq,
            TokenKind::RefNotEq => BinaryOp::RefNotEq,
            TokenKind::BitAnd => BinaryOp::BitAnd,
            TokenKind::Caret => BinaryOp::BitXor,
            TokenKind::Pipe => BinaryOp::BitOr,
            TokenKind::And => BinaryOp::And,
            TokenKind::Or => BinaryOp::Or,
            TokenKind::Ellipsis => BinaryOp::ClosedRange,
            TokenKind::HalfOpenRange => BinaryOp::HalfOpenRange,
            TokenKind::Elvis => BinaryOp::Elvis,
            _ => return None,
        };
        Some((op, 1))
    }

    /// 复合赋值运算符及其占用的 token 数：`+=`、`<<=`、`>>>=` 等
    pub(crate) fn peek_compound_op(&self) -> Option<(BinaryOp, usize)> {
        let op = match self.peek() {
            TokenKind::PlusAssign => BinaryOp::Add,
            TokenKind::MinusAssign => BinaryOp::Sub,
            TokenKind::StarAssign => BinaryOp::Mul,
            TokenKind::SlashAssign => BinaryOp::Div,
            TokenKind::AndAssign => BinaryOp::BitAnd,
            TokenKind::OrAssign => BinaryOp::BitOr,
            TokenKind::XorAssign => BinaryOp::BitXor,
            TokenKind::Lt if self.glued(1) && self.nth(1) == TokenKind::LtEq => {
                return Some((BinaryOp::Shl, 2))
            }
            TokenKind::Gt if self.glued(1) => match self.nth(1) {
                TokenKind::GtEq => return Some((BinaryOp::Shr, 2)),
                TokenKind::Gt if self.glued(2) && self.nth(2) == TokenKind::GtEq => {
                    return Some((BinaryOp::UnsignedShr, 3))
                }
                _ => return None,
            },
            _ => return None,
        };
        Some((op, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::ParseOptions;

    #[test]
    fn test_every_operator_has_an_entry() {
        for info in PRECEDENCE_TABLE.iter() {
            assert!(info.precedence > 0);
            assert_eq!(op_info(info.op), *info);
        }
    }

    #[test]
    fn test_relative_levels() {
        assert!(op_info(BinaryOp::Mul).precedence > op_info(BinaryOp::Add).precedence);
        assert!(op_info(BinaryOp::Add).precedence > op_info(BinaryOp::Shl).precedence);
        assert!(op_info(BinaryOp::Lt).precedence > op_info(BinaryOp::Eq).precedence);
        assert!(op_info(BinaryOp::BitAnd).precedence > op_info(BinaryOp::BitOr).precedence);
        assert!(op_info(BinaryOp::And).precedence > op_info(BinaryOp::Or).precedence);
        assert!(op_info(BinaryOp::Or).precedence > CONDITIONAL);
        assert!(CONDITIONAL > op_info(BinaryOp::Elvis).precedence);
    }

    #[test]
    fn test_compound_shift_assign() {
        let p = Parser::new(tokenize(">>>= 1"), ParseOptions::default());
        assert_eq!(p.peek_compound_op(), Some((BinaryOp::UnsignedShr, 3)));
        assert_eq!(p.peek_binary_op(), None);

        let p = Parser::new(tokenize("<<= 1"), ParseOptions::default());
        assert_eq!(p.peek_compound_op(), Some((BinaryOp::Shl, 2)));
        assert_eq!(p.peek_binary_op(), None);
    }
}
