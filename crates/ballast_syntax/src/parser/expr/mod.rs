//! Expression Parser
//!
//! 表达式解析：atom -> postfix -> unary -> binary (优先级爬升)
//!
//! 后缀运算 (成员访问、索引、调用、`is` 等) 先循环到不动点，
//! 然后才考虑任何二元运算符，所以 `a.b(c)[d] + e` 中的 `+` 作用于整个后缀链。

mod atom;
mod binary;
mod literal;
mod postfix;
mod unary;

pub use binary::{op_info, Assoc, OpInfo, PRECEDENCE_TABLE};
pub(crate) use literal::parse_int_literal;

use super::Parser;
use crate::ast::{Expr, ExprKind};
use crate::lexer::TokenKind;
use binary::CONDITIONAL;

impl Parser {
    /// 解析一个完整的表达式
    pub(crate) fn parse_expr(&mut self) -> Expr {
        self.parse_expr_bp(0)
    }

    /// 优先级爬升：只接受优先级不低于 `min_prec` 的二元运算符
    ///
    /// 左结合运算符的右操作数以 `prec + 1` 解析，右结合的以 `prec` 解析。
    pub(crate) fn parse_expr_bp(&mut self, min_prec: u8) -> Expr {
        if !self.enter() {
            return Expr::error(self.placeholder_span());
        }
        let start = self.start();
        let mut lhs = self.parse_unary();
        loop {
            if self.at(TokenKind::Question) && CONDITIONAL >= min_prec {
                self.bump();
                let then_expr = self.parse_expr_bp(0);
                self.expect(TokenKind::Colon);
                let else_expr = self.parse_expr_bp(CONDITIONAL);
                lhs = Expr::new(
                    ExprKind::Conditional {
                        condition: Box::new(lhs),
                        then_expr: Box::new(then_expr),
                        else_expr: Box::new(else_expr),
                    },
                    self.span_from(start),
                );
                continue;
            }

            let Some((op, width)) = self.peek_binary_op() else {
                break;
            };
            let info = op_info(op);
            if info.precedence < min_prec {
                break;
            }
            for _ in 0..width {
                self.bump();
            }
            let next_min = match info.assoc {
                Assoc::Left => info.precedence + 1,
                Assoc::Right => info.precedence,
            };
            let rhs = self.parse_expr_bp(next_min);
            lhs = Expr::new(
                ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                self.span_from(start),
            );
        }
        self.leave();
        lhs
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, Expr, ExprKind};
    use crate::lexer::tokenize;
    use crate::parser::{ParseOptions, Parser};

    fn parse(source: &str) -> (Expr, usize) {
        let mut p = Parser::new(tokenize(source), ParseOptions::default());
        let expr = p.parse_expr();
        (expr, p.errors().len())
    }

    fn binary(expr: &Expr) -> (BinaryOp, &Expr, &Expr) {
        match &expr.kind {
            ExprKind::Binary { op, lhs, rhs } => (*op, lhs, rhs),
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let (expr, errors) = parse("1 + 2 * 3");
        assert_eq!(errors, 0);
        let (op, _, rhs) = binary(&expr);
        assert_eq!(op, BinaryOp::Add);
        assert_eq!(binary(rhs).0, BinaryOp::Mul);
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let (expr, _) = parse("a - b - c");
        let (op, lhs, _) = binary(&expr);
        assert_eq!(op, BinaryOp::Sub);
        assert_eq!(binary(lhs).0, BinaryOp::Sub);
    }

    #[test]
    fn test_elvis_is_right_associative() {
        let (expr, _) = parse("a ?: b ?: c");
        let (op, lhs, rhs) = binary(&expr);
        assert_eq!(op, BinaryOp::Elvis);
        assert!(matches!(lhs.kind, ExprKind::Name(_)));
        assert_eq!(binary(rhs).0, BinaryOp::Elvis);
    }

    #[test]
    fn test_conditional_nests_to_the_right() {
        let (expr, errors) = parse("a ? b : c ? d : e");
        assert_eq!(errors, 0);
        let ExprKind::Conditional { else_expr, .. } = &expr.kind else {
            panic!("expected conditional");
        };
        assert!(matches!(else_expr.kind, ExprKind::Conditional { .. }));
    }

    #[test]
    fn test_glued_shift_operators() {
        let (expr, _) = parse("a >> b");
        assert_eq!(binary(&expr).0, BinaryOp::Shr);
        let (expr, _) = parse("a >>> b");
        assert_eq!(binary(&expr).0, BinaryOp::UnsignedShr);
        let (expr, _) = parse("a << b");
        assert_eq!(binary(&expr).0, BinaryOp::Shl);
    }

    #[test]
    fn test_spaced_angles_are_comparisons() {
        // `a > > b` 不是移位
        let (expr, errors) = parse("a > > b");
        assert_eq!(binary(&expr).0, BinaryOp::Gt);
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_spans_cover_operands() {
        let (expr, _) = parse("foo + bar");
        assert_eq!(expr.span, 0..9);
    }
}
