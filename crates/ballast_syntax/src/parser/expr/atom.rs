//! 主表达式：字面量、名字、括号、构造器以及各类以关键字开头的表达式

use super::binary::op_info;
use super::literal::unescape_string;
use crate::ast::{
    BinaryOp, Expr, ExprKind, Ident, LetBinding, MappingField, MappingKey, QueryClause, QueryExpr,
    TemplateKind, WaitField, WaitTarget,
};
use crate::lexer::TokenKind;
use crate::parser::types::{builtin_type, param_type, TypeContext};
use crate::parser::{Boundary, Parser, RecoveryAction, SyntaxErrorKind};

impl Parser {
    pub(crate) fn parse_primary(&mut self) -> Expr {
        let start = self.start();
        let kind = self.peek();
        match kind {
            k if k.is_literal() => {
                let literal = self.parse_literal_value(false);
                Expr::new(ExprKind::Literal(literal), self.span_from(start))
            }
            TokenKind::Template => self.parse_template(TemplateKind::String),
            TokenKind::TypeString | TokenKind::TypeXml if self.nth(1) == TokenKind::Template => {
                self.bump();
                let template_kind = if kind == TokenKind::TypeXml {
                    TemplateKind::Xml
                } else {
                    TemplateKind::String
                };
                self.parse_template_from(start, template_kind)
            }
            TokenKind::Identifier if self.nth(1) == TokenKind::FatArrow => {
                let param = self.expect_ident("parameter name");
                self.parse_arrow_body(start, vec![param])
            }
            TokenKind::Identifier => {
                let name = self.parse_qualified_name();
                Expr::new(ExprKind::Name(name), self.span_from(start))
            }
            TokenKind::LParen => self.parse_paren_expr(),
            TokenKind::LBracket => self.parse_list_constructor(),
            TokenKind::LBrace => self.parse_mapping_constructor(),
            TokenKind::Function => self.parse_lambda(),
            TokenKind::New => self.parse_type_init(),
            TokenKind::Let => self.parse_let_expr(),
            TokenKind::From => self.parse_query_expr(),
            TokenKind::Wait => self.parse_wait_expr(),
            TokenKind::Service => {
                self.bump();
                let body = self.parse_service_body();
                Expr::new(ExprKind::ServiceConstructor(body), self.span_from(start))
            }
            TokenKind::Flush => {
                self.bump();
                let peer = self
                    .at(TokenKind::Identifier)
                    .then(|| self.parse_peer_name());
                Expr::new(ExprKind::Flush(peer), self.span_from(start))
            }
            TokenKind::LArrow => {
                self.bump();
                let peer = self.parse_peer_name();
                Expr::new(ExprKind::Receive(peer), self.span_from(start))
            }
            // int:MAX_VALUE 等语言库引用
            k if (builtin_type(k).is_some() || param_type(k).is_some())
                && self.at_qualified_name() =>
            {
                let name = self.parse_langlib_name();
                Expr::new(ExprKind::Name(name), self.span_from(start))
            }
            k if builtin_type(k).is_some()
                || param_type(k).is_some()
                || matches!(
                    k,
                    TokenKind::Object | TokenKind::Record | TokenKind::Abstract | TokenKind::Client
                ) =>
            {
                let ty = self.parse_type(TypeContext::Expression);
                Expr::new(ExprKind::TypeDescriptor(ty), self.span_from(start))
            }
            TokenKind::Error => {
                let token = self.bump();
                let recovery = RecoveryAction::Skipped {
                    count: 1,
                    boundary: Boundary::Before(self.peek()),
                    resume: self.current_span(),
                };
                self.report(
                    SyntaxErrorKind::UnexpectedToken,
                    token.span.clone(),
                    format!("invalid token '{}'", token.lexeme),
                    recovery,
                );
                Expr::error(token.span)
            }
            _ => {
                let span = self.report_no_viable("an expression");
                Expr::error(span)
            }
        }
    }

    fn parse_template(&mut self, kind: TemplateKind) -> Expr {
        let start = self.start();
        self.parse_template_from(start, kind)
    }

    fn parse_template_from(&mut self, start: usize, kind: TemplateKind) -> Expr {
        let token = self.bump();
        let raw = token
            .lexeme
            .strip_prefix('`')
            .and_then(|s| s.strip_suffix('`'))
            .unwrap_or(token.lexeme.as_str())
            .to_string();
        Expr::new(ExprKind::Template { kind, raw }, self.span_from(start))
    }

    /// `()`、`(e)` 或箭头函数 `(a, b) => e`
    fn parse_paren_expr(&mut self) -> Expr {
        let start = self.start();
        if self.arrow_params_ahead() {
            self.bump();
            let params = self.parse_comma_list(TokenKind::RParen, |p| {
                p.expect_ident("parameter name")
            });
            self.expect(TokenKind::RParen);
            return self.parse_arrow_body(start, params);
        }
        self.bump();
        if self.eat(TokenKind::RParen) {
            return Expr::new(ExprKind::Nil, self.span_from(start));
        }
        let inner = self.parse_expr();
        self.expect(TokenKind::RParen);
        Expr::new(ExprKind::Group(Box::new(inner)), self.span_from(start))
    }

    /// 向前看是否为 `( ident, ... ) =>`
    fn arrow_params_ahead(&self) -> bool {
        let mut k = 1;
        if self.nth(k) == TokenKind::RParen {
            return self.nth(k + 1) == TokenKind::FatArrow;
        }
        loop {
            if self.nth(k) != TokenKind::Identifier {
                return false;
            }
            match self.nth(k + 1) {
                TokenKind::Comma => k += 2,
                TokenKind::RParen => return self.nth(k + 2) == TokenKind::FatArrow,
                _ => return false,
            }
        }
    }

    fn parse_arrow_body(&mut self, start: usize, params: Vec<Ident>) -> Expr {
        self.expect(TokenKind::FatArrow);
        let body = self.parse_expr();
        Expr::new(
            ExprKind::Arrow {
                params,
                body: Box::new(body),
            },
            self.span_from(start),
        )
    }

    fn parse_list_constructor(&mut self) -> Expr {
        let start = self.start();
        self.bump();
        let items = self.parse_comma_list(TokenKind::RBracket, |p| p.parse_expr());
        self.expect(TokenKind::RBracket);
        Expr::new(ExprKind::List(items), self.span_from(start))
    }

    /// `{ a: 1, "b": 2, [k]: v, c, ...m }`
    pub(crate) fn parse_mapping_constructor(&mut self) -> Expr {
        let start = self.start();
        self.expect(TokenKind::LBrace);
        let fields = self.parse_comma_list(TokenKind::RBrace, |p| p.parse_mapping_field());
        self.expect(TokenKind::RBrace);
        Expr::new(ExprKind::Mapping(fields), self.span_from(start))
    }

    fn parse_mapping_field(&mut self) -> MappingField {
        match self.peek() {
            TokenKind::Ellipsis => {
                self.bump();
                MappingField::Spread(self.parse_expr())
            }
            TokenKind::LBracket => {
                self.bump();
                let key = self.parse_expr();
                self.expect(TokenKind::RBracket);
                self.expect(TokenKind::Colon);
                let value = self.parse_expr();
                MappingField::KeyValue {
                    key: MappingKey::Computed(key),
                    value,
                }
            }
            TokenKind::StringLiteral => {
                let token = self.bump();
                let key = MappingKey::String {
                    value: unescape_string(&token.lexeme),
                    span: token.span,
                };
                self.expect(TokenKind::Colon);
                let value = self.parse_expr();
                MappingField::KeyValue { key, value }
            }
            TokenKind::Identifier => {
                let name = self.expect_ident("field name");
                if self.eat(TokenKind::Colon) {
                    let value = self.parse_expr();
                    MappingField::KeyValue {
                        key: MappingKey::Name(name),
                        value,
                    }
                } else {
                    MappingField::Shorthand(name)
                }
            }
            _ => {
                let span = self.report_no_viable("a mapping field");
                MappingField::KeyValue {
                    key: MappingKey::Name(Ident::missing(span.clone())),
                    value: Expr::error(span),
                }
            }
        }
    }

    /// 匿名函数 `function (int x) returns int { ... }`
    fn parse_lambda(&mut self) -> Expr {
        let start = self.start();
        self.bump();
        let signature = self.parse_function_signature();
        let body = self.parse_block();
        Expr::new(ExprKind::Lambda { signature, body }, self.span_from(start))
    }

    /// `new`、`new(args)`、`new T(args)`
    fn parse_type_init(&mut self) -> Expr {
        let start = self.start();
        self.bump();
        let ty = (self.at(TokenKind::Identifier) || param_type(self.peek()).is_some())
            .then(|| self.parse_type_reference());
        let args = if self.at(TokenKind::LParen) {
            self.parse_call_args()
        } else {
            Vec::new()
        };
        Expr::new(ExprKind::TypeInit { ty, args }, self.span_from(start))
    }

    /// `let T x = e, var y = f in body`
    fn parse_let_expr(&mut self) -> Expr {
        let start = self.start();
        self.bump();
        let bindings = self.parse_let_bindings();
        self.expect(TokenKind::In);
        let body = self.parse_expr();
        Expr::new(
            ExprKind::Let {
                bindings,
                body: Box::new(body),
            },
            self.span_from(start),
        )
    }

    fn parse_let_bindings(&mut self) -> Vec<LetBinding> {
        let mut bindings = vec![self.parse_let_binding()];
        while self.eat(TokenKind::Comma) {
            bindings.push(self.parse_let_binding());
        }
        bindings
    }

    fn parse_let_binding(&mut self) -> LetBinding {
        let start = self.start();
        let ty = self.parse_var_or_type();
        let pattern = self.parse_binding_pattern();
        self.expect(TokenKind::Assign);
        let value = self.parse_expr();
        LetBinding {
            ty,
            pattern,
            value,
            span: self.span_from(start),
        }
    }

    /// `var` 返回 None，否则解析一个类型
    pub(crate) fn parse_var_or_type(&mut self) -> Option<crate::ast::TypeDesc> {
        if self.eat(TokenKind::Var) {
            None
        } else {
            Some(self.parse_type(TypeContext::Declaration))
        }
    }

    /// `from var x in xs where c let ... select e`
    fn parse_query_expr(&mut self) -> Expr {
        let start = self.start();
        let mut clauses = Vec::new();
        loop {
            match self.peek() {
                TokenKind::From => {
                    let clause_start = self.start();
                    self.bump();
                    let ty = self.parse_var_or_type();
                    let pattern = self.parse_binding_pattern();
                    self.expect(TokenKind::In);
                    let source = self.parse_expr();
                    clauses.push(QueryClause::From {
                        ty,
                        pattern,
                        source,
                        span: self.span_from(clause_start),
                    });
                }
                TokenKind::Where => {
                    self.bump();
                    clauses.push(QueryClause::Where(self.parse_expr()));
                }
                TokenKind::Let => {
                    self.bump();
                    clauses.push(QueryClause::Let(self.parse_let_bindings()));
                }
                _ => break,
            }
        }
        let select = if self.expect(TokenKind::Select) {
            self.parse_expr()
        } else {
            Expr::error(self.placeholder_span())
        };
        Expr::new(
            ExprKind::Query(Box::new(QueryExpr { clauses, select })),
            self.span_from(start),
        )
    }

    /// `wait f`、`wait f1 | f2`、`wait {a: f1, f2}`
    fn parse_wait_expr(&mut self) -> Expr {
        let start = self.start();
        self.bump();
        let target = if self.at(TokenKind::LBrace) {
            self.bump();
            let fields = self.parse_comma_list(TokenKind::RBrace, |p| {
                let field_start = p.start();
                let key = p.expect_ident("wait field name");
                let value = p.eat(TokenKind::Colon).then(|| p.parse_expr());
                WaitField {
                    key,
                    value,
                    span: p.span_from(field_start),
                }
            });
            self.expect(TokenKind::RBrace);
            WaitTarget::Collection(fields)
        } else {
            // `|` 在这里分隔候选 future，操作数只取比按位或更紧的部分
            let operand_prec = op_info(BinaryOp::BitOr).precedence + 1;
            let first = self.parse_expr_bp(operand_prec);
            if self.at(TokenKind::Pipe) {
                let mut alternatives = vec![first];
                while self.eat(TokenKind::Pipe) {
                    alternatives.push(self.parse_expr_bp(operand_prec));
                }
                WaitTarget::Alternate(alternatives)
            } else {
                WaitTarget::Single(Box::new(first))
            }
        };
        Expr::new(ExprKind::Wait(target), self.span_from(start))
    }
}
