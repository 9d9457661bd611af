use crate::ast::{Expr, ExprKind, TypeDesc, UnaryOp};
use crate::lexer::TokenKind;
use crate::parser::types::TypeContext;
use crate::parser::Parser;

/// 前缀运算
enum Prefix {
    Op(UnaryOp),
    Cast(TypeDesc),
    Check { panics: bool },
    Trap,
    Start,
}

impl Parser {
    /// 一元/前缀表达式
    ///
    /// 前缀先收集到栈里再从内向外折叠，连续的 `- - - x` 不会产生递归；
    /// 每个前缀仍然计入嵌套深度。
    pub(crate) fn parse_unary(&mut self) -> Expr {
        let mut prefixes: Vec<(Prefix, usize)> = Vec::new();
        loop {
            let start = self.start();
            let prefix = match self.peek() {
                TokenKind::Plus => Prefix::Op(UnaryOp::Plus),
                TokenKind::Minus => Prefix::Op(UnaryOp::Neg),
                TokenKind::Bang => Prefix::Op(UnaryOp::Not),
                TokenKind::Tilde => Prefix::Op(UnaryOp::BitNot),
                TokenKind::Typeof => Prefix::Op(UnaryOp::Typeof),
                TokenKind::Check => Prefix::Check { panics: false },
                TokenKind::Checkpanic => Prefix::Check { panics: true },
                TokenKind::Trap => Prefix::Trap,
                TokenKind::Start => Prefix::Start,
                TokenKind::Lt => {
                    if !self.enter() {
                        break;
                    }
                    self.bump();
                    self.parse_annotations();
                    let ty = self.parse_type(TypeContext::Expression);
                    self.expect(TokenKind::Gt);
                    prefixes.push((Prefix::Cast(ty), start));
                    continue;
                }
                _ => break,
            };
            if !self.enter() {
                break;
            }
            self.bump();
            prefixes.push((prefix, start));
        }

        let mut expr = self.parse_postfix_expr();
        while let Some((prefix, start)) = prefixes.pop() {
            let span = self.span_from(start);
            let inner = Box::new(expr);
            let kind = match prefix {
                Prefix::Op(op) => ExprKind::Unary { op, operand: inner },
                Prefix::Cast(ty) => ExprKind::TypeCast { ty, expr: inner },
                Prefix::Check { panics } => ExprKind::Check {
                    expr: inner,
                    panics,
                },
                Prefix::Trap => ExprKind::Trap(inner),
                Prefix::Start => ExprKind::Start(inner),
            };
            expr = Expr::new(kind, span);
            self.leave();
        }
        expr
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{BinaryOp, ExprKind, UnaryOp};
    use crate::lexer::tokenize;
    use crate::parser::{ParseOptions, Parser};

    fn parse(source: &str) -> (crate::ast::Expr, usize) {
        let mut p = Parser::new(tokenize(source), ParseOptions::default());
        let expr = p.parse_expr();
        (expr, p.errors().len())
    }

    #[test]
    fn test_unary_binds_tighter_than_binary() {
        let (expr, errors) = parse("-a * b");
        assert_eq!(errors, 0);
        let ExprKind::Binary { op, lhs, .. } = &expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Mul);
        assert!(matches!(
            lhs.kind,
            ExprKind::Unary {
                op: UnaryOp::Neg,
                ..
            }
        ));
    }

    #[test]
    fn test_stacked_prefixes() {
        let (expr, errors) = parse("!!-x");
        assert_eq!(errors, 0);
        let ExprKind::Unary { op, operand } = &expr.kind else {
            panic!("expected unary");
        };
        assert_eq!(*op, UnaryOp::Not);
        assert!(matches!(
            operand.kind,
            ExprKind::Unary {
                op: UnaryOp::Not,
                ..
            }
        ));
        assert_eq!(expr.span, 0..4);
    }

    #[test]
    fn test_type_cast() {
        let (expr, errors) = parse("<int?> x");
        assert_eq!(errors, 0);
        assert!(matches!(expr.kind, ExprKind::TypeCast { .. }));
    }

    #[test]
    fn test_check_applies_to_call() {
        let (expr, errors) = parse("check foo(1)");
        assert_eq!(errors, 0);
        let ExprKind::Check { expr: inner, panics } = &expr.kind else {
            panic!("expected check");
        };
        assert!(!panics);
        assert!(matches!(inner.kind, ExprKind::Invocation { .. }));
    }
}
