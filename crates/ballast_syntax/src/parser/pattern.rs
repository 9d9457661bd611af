//! Binding Pattern Parser
//!
//! 绑定模式：捕获、通配、列表、映射以及 error 模式。
//! rest 元素最多出现一次且必须在最后；违反时每个模式只报告一次。

use super::{Parser, RecoveryAction, SyntaxErrorKind};
use crate::ast::{
    BindingPattern, BindingPatternKind, ErrorDetailBinding, FieldBinding, Ident, QualifiedName,
};
use crate::lexer::TokenKind;
use ballast_diagnostics::Span;

const REST_MESSAGE: &str = "a rest binding may appear only once, as the last member";

/// 列表模式与 error 模式中的成员
enum Member {
    Pattern(BindingPattern),
    Named(ErrorDetailBinding),
    Rest(Ident),
}

/// 收集同一个模式中的第一处形式错误
#[derive(Default)]
struct Malformed(Option<(Span, &'static str)>);

impl Malformed {
    fn note(&mut self, span: Span, message: &'static str) {
        if self.0.is_none() {
            self.0 = Some((span, message));
        }
    }
}

impl Parser {
    pub(crate) fn parse_binding_pattern(&mut self) -> BindingPattern {
        if !self.enter() {
            return BindingPattern::missing(self.placeholder_span());
        }
        let pattern = self.parse_binding_pattern_inner();
        self.leave();
        pattern
    }

    /// 当前 token 能否开始一个绑定模式
    pub(crate) fn at_binding_pattern_start(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Identifier | TokenKind::LBracket | TokenKind::LBrace
        ) || (self.at(TokenKind::TypeError) && self.nth(1) == TokenKind::LParen)
    }

    fn parse_binding_pattern_inner(&mut self) -> BindingPattern {
        let start = self.start();
        match self.peek() {
            TokenKind::Identifier if self.at_contextual("_") => {
                self.bump();
                BindingPattern::new(BindingPatternKind::Wildcard, self.span_from(start))
            }
            TokenKind::Identifier if self.nth(1) == TokenKind::LParen => {
                let type_ref = QualifiedName::simple(self.expect_ident("error type"));
                self.parse_error_pattern(start, Some(type_ref))
            }
            TokenKind::Identifier if self.at_qualified_name() && self.nth(3) == TokenKind::LParen => {
                let type_ref = self.parse_qualified_name();
                self.parse_error_pattern(start, Some(type_ref))
            }
            TokenKind::Identifier => {
                let name = self.expect_ident("variable name");
                BindingPattern::new(BindingPatternKind::Capture(name), self.span_from(start))
            }
            TokenKind::TypeError => {
                self.bump();
                self.parse_error_pattern(start, None)
            }
            TokenKind::LBracket => self.parse_list_pattern(),
            TokenKind::LBrace => self.parse_mapping_pattern(),
            _ => {
                let span = self.report_no_viable("a binding pattern");
                BindingPattern::missing(span)
            }
        }
    }

    fn parse_rest_binding(&mut self) -> Ident {
        self.bump();
        self.expect_ident("rest binding name")
    }

    /// `[a, [b, c], ...rest]`
    fn parse_list_pattern(&mut self) -> BindingPattern {
        let start = self.start();
        self.bump();
        let items = self.parse_comma_list(TokenKind::RBracket, |p| {
            if p.at(TokenKind::Ellipsis) {
                Member::Rest(p.parse_rest_binding())
            } else {
                Member::Pattern(p.parse_binding_pattern())
            }
        });
        self.expect(TokenKind::RBracket);

        let mut malformed = Malformed::default();
        let mut members = Vec::new();
        let mut rest: Option<Ident> = None;
        let count = items.len();
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Member::Pattern(pattern) => members.push(pattern),
                Member::Rest(name) => {
                    if rest.is_some() || index + 1 != count {
                        malformed.note(name.span.clone(), REST_MESSAGE);
                    }
                    rest.get_or_insert(name);
                }
                Member::Named(_) => {}
            }
        }
        self.report_malformed(malformed);
        BindingPattern::new(
            BindingPatternKind::List { members, rest },
            self.span_from(start),
        )
    }

    /// `{name, age: a, ...rest}`
    fn parse_mapping_pattern(&mut self) -> BindingPattern {
        let start = self.start();
        self.bump();
        let items = self.parse_comma_list(TokenKind::RBrace, |p| {
            if p.at(TokenKind::Ellipsis) {
                return Err(p.parse_rest_binding());
            }
            let field_start = p.start();
            let field = p.expect_ident("field name");
            let pattern = p
                .eat(TokenKind::Colon)
                .then(|| p.parse_binding_pattern());
            Ok(FieldBinding {
                field,
                pattern,
                span: p.span_from(field_start),
            })
        });
        self.expect(TokenKind::RBrace);

        let mut malformed = Malformed::default();
        let mut fields = Vec::new();
        let mut rest: Option<Ident> = None;
        let count = items.len();
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Ok(field) => fields.push(field),
                Err(name) => {
                    if rest.is_some() || index + 1 != count {
                        malformed.note(name.span.clone(), REST_MESSAGE);
                    }
                    rest.get_or_insert(name);
                }
            }
        }
        self.report_malformed(malformed);
        BindingPattern::new(
            BindingPatternKind::Mapping { fields, rest },
            self.span_from(start),
        )
    }

    /// `error(reason, message = m, ...rest)`；`(` 之前的部分已消耗
    fn parse_error_pattern(&mut self, start: usize, type_ref: Option<QualifiedName>) -> BindingPattern {
        self.expect(TokenKind::LParen);
        let items = self.parse_comma_list(TokenKind::RParen, |p| {
            if p.at(TokenKind::Ellipsis) {
                return Member::Rest(p.parse_rest_binding());
            }
            if p.at(TokenKind::Identifier) && p.nth(1) == TokenKind::Assign {
                let detail_start = p.start();
                let name = p.expect_ident("detail name");
                p.bump();
                let pattern = p.parse_binding_pattern();
                return Member::Named(ErrorDetailBinding {
                    name,
                    pattern,
                    span: p.span_from(detail_start),
                });
            }
            Member::Pattern(p.parse_binding_pattern())
        });
        self.expect(TokenKind::RParen);

        let mut malformed = Malformed::default();
        let mut reason: Option<BindingPattern> = None;
        let mut details = Vec::new();
        let mut rest: Option<Ident> = None;
        let count = items.len();
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Member::Pattern(pattern) if index == 0 => reason = Some(pattern),
                Member::Pattern(pattern) => malformed.note(
                    pattern.span,
                    "error detail bindings must be named, as in `name = pattern`",
                ),
                Member::Named(detail) => details.push(detail),
                Member::Rest(name) => {
                    if rest.is_some() || index + 1 != count {
                        malformed.note(name.span.clone(), REST_MESSAGE);
                    }
                    rest.get_or_insert(name);
                }
            }
        }
        let reason = match reason {
            Some(reason) => reason,
            None => {
                let span = self.placeholder_span();
                malformed.note(span.clone(), "an error binding pattern needs a reason binding");
                BindingPattern::missing(span)
            }
        };
        self.report_malformed(malformed);
        BindingPattern::new(
            BindingPatternKind::Error {
                type_ref,
                reason: Box::new(reason),
                details,
                rest,
            },
            self.span_from(start),
        )
    }

    fn report_malformed(&mut self, malformed: Malformed) {
        if let Some((span, message)) = malformed.0 {
            self.report(
                SyntaxErrorKind::MalformedConstruct,
                span,
                message,
                RecoveryAction::Placeholder,
            );
        }
    }
}
