use crate::ast::{Arg, Expr, ExprKind, Ident};
use crate::lexer::TokenKind;
use crate::parser::types::TypeContext;
use crate::parser::Parser;

impl Parser {
    /// 主表达式加上任意多个后缀，循环直到没有后缀可用
    pub(crate) fn parse_postfix_expr(&mut self) -> Expr {
        let start = self.start();
        let mut expr = self.parse_primary();
        loop {
            let kind = match self.peek() {
                // a.@ann
                TokenKind::Dot if self.nth(1) == TokenKind::At && self.glued(1) => {
                    self.bump();
                    self.bump();
                    let annotation = self.parse_qualified_name();
                    ExprKind::AnnotationAccess {
                        target: Box::new(expr),
                        annotation,
                    }
                }
                TokenKind::Dot | TokenKind::OptionalFieldAccess => {
                    let optional = self.bump().kind == TokenKind::OptionalFieldAccess;
                    let field = self.parse_member_name();
                    ExprKind::FieldAccess {
                        target: Box::new(expr),
                        field,
                        optional,
                    }
                }
                TokenKind::LBracket => {
                    self.bump();
                    let index = self.parse_expr();
                    self.expect(TokenKind::RBracket);
                    ExprKind::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                TokenKind::LParen => {
                    let args = self.parse_call_args();
                    ExprKind::Invocation {
                        callee: Box::new(expr),
                        args,
                    }
                }
                // 远程方法调用；`x -> w;` 形式的 worker 发送留给语句解析
                TokenKind::RArrow
                    if self.nth(1) == TokenKind::Identifier && self.nth(2) == TokenKind::LParen =>
                {
                    self.bump();
                    let method = self.expect_ident("remote method name");
                    let args = self.parse_call_args();
                    ExprKind::RemoteCall {
                        target: Box::new(expr),
                        method,
                        args,
                    }
                }
                TokenKind::SyncRArrow => {
                    self.bump();
                    let peer = self.parse_peer_name();
                    ExprKind::SyncSend {
                        value: Box::new(expr),
                        peer,
                    }
                }
                TokenKind::Is => {
                    self.bump();
                    let ty = self.parse_type(TypeContext::Expression);
                    ExprKind::TypeTest {
                        expr: Box::new(expr),
                        ty,
                    }
                }
                _ => break,
            };
            expr = Expr::new(kind, self.span_from(start));
        }
        expr
    }

    /// 成员名：标识符，或者少数可以作为名字使用的关键字
    pub(crate) fn parse_member_name(&mut self) -> Ident {
        if matches!(
            self.peek(),
            TokenKind::Start | TokenKind::Version | TokenKind::Source | TokenKind::Type
        ) {
            let token = self.bump();
            return Ident::new(token.lexeme, token.span);
        }
        self.expect_ident("field name")
    }

    /// 对端 worker 名；`default` 表示函数自身
    pub(crate) fn parse_peer_name(&mut self) -> Ident {
        self.expect_ident("worker name")
    }

    /// `(a, b = 1, ...rest)`
    pub(crate) fn parse_call_args(&mut self) -> Vec<Arg> {
        self.expect(TokenKind::LParen);
        let args = self.parse_comma_list(TokenKind::RParen, |p| p.parse_arg());
        self.expect(TokenKind::RParen);
        args
    }

    fn parse_arg(&mut self) -> Arg {
        if self.eat(TokenKind::Ellipsis) {
            return Arg::Rest(self.parse_expr());
        }
        if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::Assign {
            let name = self.expect_ident("argument name");
            self.bump();
            let value = self.parse_expr();
            return Arg::Named { name, value };
        }
        Arg::Positional(self.parse_expr())
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Arg, BinaryOp, ExprKind};
    use crate::lexer::tokenize;
    use crate::parser::{ParseOptions, Parser};

    fn parse(source: &str) -> (crate::ast::Expr, usize) {
        let mut p = Parser::new(tokenize(source), ParseOptions::default());
        let expr = p.parse_expr();
        (expr, p.errors().len())
    }

    #[test]
    fn test_postfix_chain_before_binary() {
        let (expr, errors) = parse("a.b(c)[d] + e");
        assert_eq!(errors, 0);
        let ExprKind::Binary { op, lhs, .. } = &expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Add);
        let ExprKind::Index { target, .. } = &lhs.kind else {
            panic!("expected index, got {:?}", lhs.kind);
        };
        let ExprKind::Invocation { callee, .. } = &target.kind else {
            panic!("expected invocation");
        };
        assert!(matches!(callee.kind, ExprKind::FieldAccess { optional: false, .. }));
    }

    #[test]
    fn test_named_and_rest_args() {
        let (expr, errors) = parse("f(1, name = \"x\", ...rest)");
        assert_eq!(errors, 0);
        let ExprKind::Invocation { args, .. } = &expr.kind else {
            panic!("expected invocation");
        };
        assert!(matches!(args[0], Arg::Positional(_)));
        assert!(matches!(args[1], Arg::Named { .. }));
        assert!(matches!(args[2], Arg::Rest(_)));
    }

    #[test]
    fn test_annotation_access_requires_glued_at() {
        let (expr, errors) = parse("T.@config");
        assert_eq!(errors, 0);
        assert!(matches!(expr.kind, ExprKind::AnnotationAccess { .. }));
    }

    #[test]
    fn test_type_test_with_nullable() {
        let (expr, errors) = parse("x is string?");
        assert_eq!(errors, 0);
        assert!(matches!(expr.kind, ExprKind::TypeTest { .. }));
    }

    #[test]
    fn test_question_after_type_test_is_conditional() {
        let (expr, errors) = parse("x is int ? 1 : 2");
        assert_eq!(errors, 0);
        assert!(matches!(expr.kind, ExprKind::Conditional { .. }));
    }

    #[test]
    fn test_remote_call() {
        let (expr, errors) = parse("caller->respond(\"ok\").status");
        assert_eq!(errors, 0);
        let ExprKind::FieldAccess { target, .. } = &expr.kind else {
            panic!("expected field access");
        };
        assert!(matches!(target.kind, ExprKind::RemoteCall { .. }));
    }

    #[test]
    fn test_optional_field_access() {
        let (expr, _) = parse("a?.b");
        assert!(matches!(expr.kind, ExprKind::FieldAccess { optional: true, .. }));
    }
}
