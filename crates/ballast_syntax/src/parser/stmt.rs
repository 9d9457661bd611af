//! Statement Parser
//!
//! 语句与块。大多数语句由开头的关键字决定；
//! 以标识符、`[`、`{` 开头的语句需要试探：先尝试声明或解构赋值，失败再按表达式语句解析。

use super::expr::op_info;
use super::types::TypeContext;
use super::{Parser, RecoveryAction, SyncSet, SyntaxErrorKind};
use crate::ast::{
    Annotation, BinaryOp, BindingPattern, BindingPatternKind, Block, CatchClause, ElseBranch, Expr,
    ExprKind, IfStmt, JoinClause, JoinCondition, JoinParam, MatchClause, MatchPattern, Stmt,
    StmtKind, TransactionStmt, TypeDesc, VarDecl, WorkerDecl, XmlnsDecl,
};
use crate::lexer::TokenKind;

impl Parser {
    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> Block {
        let start = self.start();
        let open_span = self.current_span();
        let mut stmts = Vec::new();
        if !self.expect(TokenKind::LBrace) || !self.enter() {
            return Block {
                stmts,
                span: self.span_from(start),
            };
        }
        loop {
            if self.eat(TokenKind::RBrace) {
                break;
            }
            if self.at(TokenKind::Eof) {
                self.report_unterminated(open_span);
                break;
            }
            if self.at_module_definition() {
                // 不消耗 token，外层块的重复报告由恢复模式抑制
                self.report(
                    SyntaxErrorKind::MissingToken,
                    open_span,
                    format!("unclosed block: expected '}}' before {}", self.peek()),
                    RecoveryAction::Inserted,
                );
                break;
            }
            let before = self.cursor.position();
            stmts.push(self.parse_statement());
            if self.cursor.position() == before
                && !self.at(TokenKind::RBrace)
                && !self.at(TokenKind::Eof)
            {
                self.cursor.advance();
            }
        }
        self.leave();
        Block {
            stmts,
            span: self.span_from(start),
        }
    }

    /// 只能出现在模块级的定义开头；块内遇到时说明前面缺少 `}`
    fn at_module_definition(&self) -> bool {
        match self.peek() {
            TokenKind::Import
            | TokenKind::Public
            | TokenKind::Private
            | TokenKind::Listener
            | TokenKind::Annotation
            | TokenKind::Const => true,
            TokenKind::Function | TokenKind::Service | TokenKind::Type => {
                self.nth(1) == TokenKind::Identifier
            }
            _ => false,
        }
    }

    pub(crate) fn parse_statement(&mut self) -> Stmt {
        let start = self.start();
        let annotations = self.parse_annotations();
        let annotation_span = annotations.first().map(|a| a.span.clone());

        let kind = match self.peek() {
            TokenKind::If => StmtKind::If(self.parse_if()),
            TokenKind::Match => self.parse_match(),
            TokenKind::Foreach => self.parse_foreach(),
            TokenKind::While => {
                self.bump();
                let condition = self.parse_expr();
                let body = self.parse_block();
                StmtKind::While { condition, body }
            }
            TokenKind::Break => self.parse_keyword_stmt(StmtKind::Break),
            TokenKind::Continue => self.parse_keyword_stmt(StmtKind::Continue),
            TokenKind::Retry => self.parse_keyword_stmt(StmtKind::Retry),
            TokenKind::Abort => self.parse_keyword_stmt(StmtKind::Abort),
            TokenKind::Return => {
                self.bump();
                let value = (!self.at(TokenKind::Semicolon) && self.peek().starts_expression())
                    .then(|| self.parse_expr());
                self.expect_semicolon();
                StmtKind::Return(value)
            }
            TokenKind::Throw => {
                self.bump();
                let value = self.parse_expr();
                self.expect_semicolon();
                StmtKind::Throw(value)
            }
            TokenKind::Panic => {
                self.bump();
                let value = self.parse_expr();
                self.expect_semicolon();
                StmtKind::Panic(value)
            }
            TokenKind::Fork => self.parse_fork(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Transaction => StmtKind::Transaction(self.parse_transaction()),
            TokenKind::Lock => {
                self.bump();
                StmtKind::Lock(self.parse_block())
            }
            TokenKind::Xmlns => StmtKind::Xmlns(self.parse_xmlns_decl()),
            TokenKind::Worker => StmtKind::Worker(self.parse_worker_decl(start, annotations)),
            TokenKind::Final | TokenKind::Var => StmtKind::VarDecl(self.parse_var_decl(annotations)),
            TokenKind::LBracket | TokenKind::LBrace => self.parse_bracket_led(annotations),
            TokenKind::TypeError if self.nth(1) == TokenKind::LParen => {
                match self.try_destructure() {
                    Some(kind) => kind,
                    None => self.parse_expression_statement(),
                }
            }
            // int:abs(x); 这类语言库调用
            k if (k.is_simple_type() || k.is_parametrized_type()) && self.at_qualified_name() => {
                self.parse_expression_statement()
            }
            k if k.is_simple_type()
                || k.is_parametrized_type()
                || matches!(
                    k,
                    TokenKind::Object | TokenKind::Record | TokenKind::Abstract | TokenKind::Client
                )
                || (k == TokenKind::Function && self.nth(1) == TokenKind::LParen) =>
            {
                StmtKind::VarDecl(self.parse_var_decl(annotations))
            }
            TokenKind::Identifier | TokenKind::LParen => {
                match self.speculate(|p| p.parse_typed_head()) {
                    Some((ty, pattern)) => {
                        StmtKind::VarDecl(self.finish_var_decl(annotations, false, Some(ty), pattern))
                    }
                    None => self.parse_expression_statement(),
                }
            }
            k if k.starts_expression() => self.parse_expression_statement(),
            found => {
                self.recover(
                    SyntaxErrorKind::NoViableAlternative,
                    format!("expected a statement, found {}", found),
                    SyncSet::STATEMENT,
                );
                StmtKind::Error
            }
        };

        if let Some(span) = annotation_span {
            if !matches!(kind, StmtKind::VarDecl(_) | StmtKind::Worker(_)) {
                self.report(
                    SyntaxErrorKind::MalformedConstruct,
                    span,
                    "annotations are only allowed on declarations",
                    RecoveryAction::Placeholder,
                );
            }
        }
        Stmt::new(kind, self.span_from(start))
    }

    fn parse_keyword_stmt(&mut self, kind: StmtKind) -> StmtKind {
        self.bump();
        self.expect_semicolon();
        kind
    }

    // ---------------------------------------------------------------
    // 声明与赋值
    // ---------------------------------------------------------------

    /// `[final] (var | T) pattern [= e];`
    fn parse_var_decl(&mut self, annotations: Vec<Annotation>) -> VarDecl {
        let is_final = self.eat(TokenKind::Final);
        let ty = self.parse_var_or_type();
        let pattern = self.parse_binding_pattern();
        self.finish_var_decl(annotations, is_final, ty, pattern)
    }

    fn finish_var_decl(
        &mut self,
        annotations: Vec<Annotation>,
        is_final: bool,
        ty: Option<TypeDesc>,
        pattern: BindingPattern,
    ) -> VarDecl {
        let init = self.eat(TokenKind::Assign).then(|| self.parse_expr());
        if init.is_none() {
            let message = if ty.is_none() {
                Some("a 'var' declaration needs an initializer")
            } else if !matches!(pattern.kind, BindingPatternKind::Capture(_)) {
                Some("a destructuring declaration needs an initializer")
            } else {
                None
            };
            if let Some(message) = message {
                self.report(
                    SyntaxErrorKind::MalformedConstruct,
                    pattern.span.clone(),
                    message,
                    RecoveryAction::Placeholder,
                );
            }
        }
        self.expect_semicolon();
        VarDecl {
            annotations,
            is_final,
            ty,
            pattern,
            init,
        }
    }

    /// 试探 `T pattern` 形式的声明开头
    fn parse_typed_head(&mut self) -> Option<(TypeDesc, BindingPattern)> {
        let ty = self.parse_type(TypeContext::Declaration);
        if ty.is_missing() || !self.at_binding_pattern_start() {
            return None;
        }
        let pattern = self.parse_binding_pattern();
        Some((ty, pattern))
    }

    /// 试探 `pattern = e;` 形式的解构赋值
    fn try_destructure(&mut self) -> Option<StmtKind> {
        let pattern = self.speculate(|p| {
            let pattern = p.parse_binding_pattern();
            p.at(TokenKind::Assign).then_some(pattern)
        })?;
        self.bump();
        let value = self.parse_expr();
        self.expect_semicolon();
        Some(StmtKind::Destructure { pattern, value })
    }

    /// `[a, b] = t;`、`[int, string] t = ...;` 或以列表/映射构造器开头的表达式语句
    fn parse_bracket_led(&mut self, annotations: Vec<Annotation>) -> StmtKind {
        if let Some(kind) = self.try_destructure() {
            return kind;
        }
        if self.at(TokenKind::LBracket) {
            if let Some((ty, pattern)) = self.speculate(|p| p.parse_typed_head()) {
                return StmtKind::VarDecl(self.finish_var_decl(annotations, false, Some(ty), pattern));
            }
        }
        self.parse_expression_statement()
    }

    /// 表达式开头的语句：赋值、复合赋值、worker 发送或表达式语句
    fn parse_expression_statement(&mut self) -> StmtKind {
        let expr = self.parse_expr();
        if self.eat(TokenKind::Assign) {
            self.check_assignable(&expr);
            let value = self.parse_expr();
            self.expect_semicolon();
            return StmtKind::Assign {
                target: expr,
                value,
            };
        }
        if let Some((op, width)) = self.peek_compound_op() {
            for _ in 0..width {
                self.bump();
            }
            self.check_assignable(&expr);
            let value = self.parse_expr();
            self.expect_semicolon();
            return StmtKind::CompoundAssign {
                target: expr,
                op,
                value,
            };
        }
        if self.eat(TokenKind::RArrow) {
            let peer = self.parse_peer_name();
            let key = self.eat(TokenKind::Comma).then(|| self.parse_expr());
            self.expect_semicolon();
            return StmtKind::WorkerSend {
                value: expr,
                peer,
                key,
            };
        }
        self.expect_semicolon();
        StmtKind::Expression(expr)
    }

    fn check_assignable(&mut self, target: &Expr) {
        let assignable = matches!(
            target.kind,
            ExprKind::Name(_)
                | ExprKind::FieldAccess { .. }
                | ExprKind::Index { .. }
                | ExprKind::AnnotationAccess { .. }
                | ExprKind::List(_)
                | ExprKind::Mapping(_)
                | ExprKind::Error
        );
        if !assignable {
            self.report(
                SyntaxErrorKind::MalformedConstruct,
                target.span.clone(),
                "invalid assignment target",
                RecoveryAction::Placeholder,
            );
        }
    }

    // ---------------------------------------------------------------
    // 控制流
    // ---------------------------------------------------------------

    /// `if c {..} else if d {..} else {..}`
    ///
    /// else-if 链按循环读取再从后向前折叠，长链不会加深递归。
    fn parse_if(&mut self) -> IfStmt {
        let mut heads: Vec<(usize, Expr, Block)> = Vec::new();
        let mut else_block = None;
        loop {
            let start = self.start();
            self.bump();
            let condition = self.parse_expr();
            let then_block = self.parse_block();
            heads.push((start, condition, then_block));
            if !self.eat(TokenKind::Else) {
                break;
            }
            if !self.at(TokenKind::If) {
                else_block = Some(self.parse_block());
                break;
            }
        }

        let mut else_branch = else_block.map(ElseBranch::Else);
        while heads.len() > 1 {
            let Some((start, condition, then_block)) = heads.pop() else {
                break;
            };
            else_branch = Some(ElseBranch::ElseIf(Box::new(IfStmt {
                condition,
                then_block,
                else_branch,
                span: self.span_from(start),
            })));
        }
        let (start, condition, then_block) = heads.remove(0);
        IfStmt {
            condition,
            then_block,
            else_branch,
            span: self.span_from(start),
        }
    }

    /// `match e { pattern [if guard] => { ... } }`
    fn parse_match(&mut self) -> StmtKind {
        self.bump();
        let subject = self.parse_expr();
        let clauses =
            self.parse_member_block(TokenKind::LBrace, TokenKind::RBrace, |p| p.parse_match_clause());
        StmtKind::Match { subject, clauses }
    }

    fn parse_match_clause(&mut self) -> Option<MatchClause> {
        let start = self.start();
        let pattern = if self.eat(TokenKind::Var) {
            MatchPattern::Binding(self.parse_binding_pattern())
        } else if self.at_contextual("_") && self.nth(1) == TokenKind::FatArrow {
            MatchPattern::Wildcard(self.bump().span)
        } else if self.peek().starts_expression() {
            // `|` 分隔多个静态值
            let operand_prec = op_info(BinaryOp::BitOr).precedence + 1;
            let mut values = vec![self.parse_expr_bp(operand_prec)];
            while self.eat(TokenKind::Pipe) {
                values.push(self.parse_expr_bp(operand_prec));
            }
            MatchPattern::Static(values)
        } else {
            return None;
        };
        let guard = self.eat(TokenKind::If).then(|| self.parse_expr());
        self.expect(TokenKind::FatArrow);
        let body = self.parse_block();
        self.eat(TokenKind::Comma);
        Some(MatchClause {
            pattern,
            guard,
            body,
            span: self.span_from(start),
        })
    }

    /// `foreach (var | T)? pattern in e { ... }`
    fn parse_foreach(&mut self) -> StmtKind {
        self.bump();
        let ty = if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::In {
            None
        } else {
            self.parse_var_or_type()
        };
        let pattern = self.parse_binding_pattern();
        self.expect(TokenKind::In);
        let iterable = self.parse_expr();
        let body = self.parse_block();
        StmtKind::Foreach {
            ty,
            pattern,
            iterable,
            body,
        }
    }

    /// `fork { worker* } [join (...) (T name) { ... }]`
    fn parse_fork(&mut self) -> StmtKind {
        self.bump();
        let workers = self.parse_member_block(TokenKind::LBrace, TokenKind::RBrace, |p| {
            let start = p.start();
            let annotations = p.parse_annotations();
            p.at(TokenKind::Worker)
                .then(|| p.parse_worker_decl(start, annotations))
        });
        let join = self.at(TokenKind::Join).then(|| self.parse_join_clause());
        StmtKind::Fork { workers, join }
    }

    fn parse_join_clause(&mut self) -> JoinClause {
        let start = self.start();
        self.bump();
        let mut condition = None;
        let next = self.cursor.peek(1);
        let has_condition = self.at(TokenKind::LParen)
            && next.kind == TokenKind::Identifier
            && matches!(next.lexeme.as_str(), "all" | "some");
        if has_condition {
            self.bump();
            if self.at_contextual("all") {
                self.bump();
                let workers = self.parse_comma_list(TokenKind::RParen, |p| p.expect_ident("worker name"));
                condition = Some(JoinCondition::All(workers));
            } else {
                self.bump();
                let count = self.parse_join_count();
                let workers = self.parse_comma_list(TokenKind::RParen, |p| p.expect_ident("worker name"));
                condition = Some(JoinCondition::Some { count, workers });
            }
            self.expect(TokenKind::RParen);
        }
        let param = if self.eat(TokenKind::LParen) {
            let ty = self.parse_type(TypeContext::Declaration);
            let name = self.expect_ident("join result name");
            self.expect(TokenKind::RParen);
            Some(JoinParam { ty, name })
        } else {
            None
        };
        let body = self.parse_block();
        JoinClause {
            condition,
            param,
            body,
            span: self.span_from(start),
        }
    }

    fn parse_join_count(&mut self) -> u64 {
        if !matches!(self.peek(), TokenKind::DecimalInteger | TokenKind::HexInteger) {
            self.report_no_viable("a worker count");
            return 0;
        }
        let token = self.bump();
        match super::expr::parse_int_literal(&token.lexeme) {
            Some(count) if count >= 0 => count as u64,
            _ => {
                self.report(
                    SyntaxErrorKind::MalformedConstruct,
                    token.span,
                    format!("worker count '{}' is out of range", token.lexeme),
                    RecoveryAction::Placeholder,
                );
                0
            }
        }
    }

    /// `try { } catch (error e) { } finally { }`
    fn parse_try(&mut self) -> StmtKind {
        let keyword = self.bump();
        let body = self.parse_block();
        let mut catches = Vec::new();
        while self.at(TokenKind::Catch) {
            let start = self.start();
            self.bump();
            self.expect(TokenKind::LParen);
            let ty = self.parse_type(TypeContext::Declaration);
            let name = self.expect_ident("error variable name");
            self.expect(TokenKind::RParen);
            let body = self.parse_block();
            catches.push(CatchClause {
                ty,
                name,
                body,
                span: self.span_from(start),
            });
        }
        let finally = self.eat(TokenKind::Finally).then(|| self.parse_block());
        if catches.is_empty() && finally.is_none() {
            self.report(
                SyntaxErrorKind::MalformedConstruct,
                keyword.span,
                "a try statement needs a catch or finally clause",
                RecoveryAction::Placeholder,
            );
        }
        StmtKind::Try {
            body,
            catches,
            finally,
        }
    }

    /// `transaction with retries = 3, oncommit = f { } onretry { } committed { } aborted { }`
    fn parse_transaction(&mut self) -> TransactionStmt {
        self.bump();
        let mut retries = None;
        let mut on_commit = None;
        let mut on_abort = None;
        if self.eat(TokenKind::With) {
            loop {
                let key = self.expect_ident("transaction property");
                self.expect(TokenKind::Assign);
                let value = self.parse_expr();
                match key.name.as_str() {
                    "retries" => retries = Some(value),
                    "oncommit" => on_commit = Some(value),
                    "onabort" => on_abort = Some(value),
                    "" => {}
                    other => self.report(
                        SyntaxErrorKind::MalformedConstruct,
                        key.span.clone(),
                        format!("unknown transaction property '{}'", other),
                        RecoveryAction::Placeholder,
                    ),
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        let body = self.parse_block();

        let mut on_retry = None;
        let mut committed = None;
        let mut aborted = None;
        loop {
            let slot = match self.peek() {
                TokenKind::Onretry => &mut on_retry,
                TokenKind::Committed => &mut committed,
                TokenKind::Aborted => &mut aborted,
                _ => break,
            };
            self.bump();
            *slot = Some(self.parse_block());
        }
        TransactionStmt {
            retries,
            on_commit,
            on_abort,
            body,
            on_retry,
            committed,
            aborted,
        }
    }

    // ---------------------------------------------------------------
    // 语句与模块共用的声明
    // ---------------------------------------------------------------

    /// `worker w [returns T] { ... }`；`start` 包含前面的注解
    fn parse_worker_decl(&mut self, start: usize, annotations: Vec<Annotation>) -> WorkerDecl {
        self.bump();
        let name = self.expect_ident("worker name");
        let returns = self
            .eat(TokenKind::Returns)
            .then(|| self.parse_type(TypeContext::Declaration));
        let body = self.parse_block();
        WorkerDecl {
            annotations,
            name,
            returns,
            body,
            span: self.span_from(start),
        }
    }

    /// `xmlns "uri" [as prefix];`
    pub(crate) fn parse_xmlns_decl(&mut self) -> XmlnsDecl {
        let start = self.start();
        self.bump();
        let uri = self.parse_expr();
        let prefix = self
            .eat(TokenKind::As)
            .then(|| self.expect_ident("namespace prefix"));
        self.expect_semicolon();
        XmlnsDecl {
            uri,
            prefix,
            span: self.span_from(start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::ParseOptions;

    fn parse(source: &str) -> (Stmt, Vec<crate::parser::SyntaxError>) {
        let mut p = Parser::new(tokenize(source), ParseOptions::default());
        let stmt = p.parse_statement();
        (stmt, p.into_errors())
    }

    #[test]
    fn test_typed_declaration_with_named_type() {
        let (stmt, errors) = parse("Person p = new;");
        assert!(errors.is_empty(), "{:?}", errors);
        let StmtKind::VarDecl(decl) = &stmt.kind else {
            panic!("expected declaration, got {:?}", stmt.kind);
        };
        assert!(decl.ty.is_some());
    }

    #[test]
    fn test_identifier_led_assignment() {
        let (stmt, errors) = parse("a.b[0] = 1;");
        assert!(errors.is_empty());
        assert!(matches!(stmt.kind, StmtKind::Assign { .. }));
    }

    #[test]
    fn test_compound_shift_assignment() {
        let (stmt, errors) = parse("x >>>= 2;");
        assert!(errors.is_empty());
        assert!(matches!(
            stmt.kind,
            StmtKind::CompoundAssign {
                op: BinaryOp::UnsignedShr,
                ..
            }
        ));
    }

    #[test]
    fn test_destructure_vs_tuple_declaration() {
        let (stmt, errors) = parse("[a, b] = t;");
        assert!(errors.is_empty());
        assert!(matches!(stmt.kind, StmtKind::Destructure { .. }));

        let (stmt, errors) = parse("[int, string] [a, b] = t;");
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(matches!(stmt.kind, StmtKind::VarDecl(_)));
    }

    #[test]
    fn test_var_without_initializer() {
        let (_, errors) = parse("var x;");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, SyntaxErrorKind::MalformedConstruct);
    }

    #[test]
    fn test_else_if_chain_is_nested() {
        let (stmt, errors) = parse("if a { } else if b { } else { }");
        assert!(errors.is_empty());
        let StmtKind::If(stmt) = &stmt.kind else {
            panic!("expected if");
        };
        let Some(ElseBranch::ElseIf(inner)) = &stmt.else_branch else {
            panic!("expected else-if");
        };
        assert!(matches!(inner.else_branch, Some(ElseBranch::Else(_))));
    }

    #[test]
    fn test_match_clauses() {
        let (stmt, errors) = parse("match x { 1 | 2 => { } var [a, b] if a > b => { } _ => { } }");
        assert!(errors.is_empty(), "{:?}", errors);
        let StmtKind::Match { clauses, .. } = &stmt.kind else {
            panic!("expected match");
        };
        assert_eq!(clauses.len(), 3);
        assert!(matches!(&clauses[0].pattern, MatchPattern::Static(values) if values.len() == 2));
        assert!(clauses[1].guard.is_some());
        assert!(matches!(clauses[2].pattern, MatchPattern::Wildcard(_)));
    }

    #[test]
    fn test_worker_send() {
        let (stmt, errors) = parse("x -> w2;");
        assert!(errors.is_empty());
        assert!(matches!(stmt.kind, StmtKind::WorkerSend { key: None, .. }));
    }

    #[test]
    fn test_fork_join() {
        let (stmt, errors) =
            parse("fork { worker w1 { } worker w2 { } } join (some 1 w1, w2) (map<any> results) { }");
        assert!(errors.is_empty(), "{:?}", errors);
        let StmtKind::Fork { workers, join } = &stmt.kind else {
            panic!("expected fork");
        };
        assert_eq!(workers.len(), 2);
        let join = join.as_ref().expect("join clause");
        assert!(matches!(
            join.condition,
            Some(JoinCondition::Some { count: 1, .. })
        ));
    }

    #[test]
    fn test_try_requires_handler() {
        let (_, errors) = parse("try { }");
        assert_eq!(errors.len(), 1);
        let (_, errors) = parse("try { } catch (error e) { } finally { }");
        assert!(errors.is_empty());
    }

    #[test]
    fn test_transaction() {
        let (stmt, errors) =
            parse("transaction with retries = 2, oncommit = f { } onretry { } aborted { }");
        assert!(errors.is_empty(), "{:?}", errors);
        let StmtKind::Transaction(tx) = &stmt.kind else {
            panic!("expected transaction");
        };
        assert!(tx.retries.is_some());
        assert!(tx.on_retry.is_some());
        assert!(tx.committed.is_none());
    }

    #[test]
    fn test_stray_token_becomes_error_statement() {
        let (stmt, errors) = parse(") x;");
        assert!(stmt.is_error());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, SyntaxErrorKind::NoViableAlternative);
    }
}
