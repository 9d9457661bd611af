//! Parser Helper Functions
//!
//! 辅助解析函数：限定名、注解、可见性、逗号分隔列表

use super::{Parser, SyncSet, SyntaxErrorKind};
use crate::ast::{Annotation, Ident, QualifiedName, Visibility};
use crate::lexer::TokenKind;

impl Parser {
    /// 当前位置是否为紧贴的 `prefix:name`
    pub(crate) fn at_qualified_name(&self) -> bool {
        self.nth(1) == TokenKind::Colon
            && self.glued(1)
            && self.nth(2) == TokenKind::Identifier
            && self.glued(2)
    }

    /// 解析 `name` 或 `prefix:name`
    pub(crate) fn parse_qualified_name(&mut self) -> QualifiedName {
        let start = self.start();
        if self.at(TokenKind::Identifier) && self.at_qualified_name() {
            let prefix = self.expect_ident("module prefix");
            self.bump();
            let name = self.expect_ident("identifier");
            return QualifiedName {
                prefix: Some(prefix),
                name,
                span: self.span_from(start),
            };
        }
        QualifiedName::simple(self.expect_ident("identifier"))
    }

    /// 内建类型关键字作为模块前缀，例如 `int:MAX_VALUE`
    pub(crate) fn parse_langlib_name(&mut self) -> QualifiedName {
        let start = self.start();
        let keyword = self.bump();
        let prefix = Ident::new(keyword.lexeme, keyword.span);
        self.bump();
        let name = self.expect_ident("identifier");
        QualifiedName {
            prefix: Some(prefix),
            name,
            span: self.span_from(start),
        }
    }

    /// 零个或多个 `@name { ... }`
    pub(crate) fn parse_annotations(&mut self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        while self.at(TokenKind::At) {
            let start = self.start();
            self.bump();
            let name = self.parse_qualified_name();
            let value = self
                .at(TokenKind::LBrace)
                .then(|| self.parse_mapping_constructor());
            annotations.push(Annotation {
                name,
                value,
                span: self.span_from(start),
            });
        }
        annotations
    }

    pub(crate) fn parse_visibility(&mut self) -> Visibility {
        if self.eat(TokenKind::Public) {
            Visibility::Public
        } else if self.eat(TokenKind::Private) {
            Visibility::Private
        } else {
            Visibility::Default
        }
    }

    /// 逗号分隔的列表，不含两侧的括号；允许末尾多一个逗号
    pub(crate) fn parse_comma_list<T>(
        &mut self,
        close: TokenKind,
        mut item: impl FnMut(&mut Self) -> T,
    ) -> Vec<T> {
        let mut items = Vec::new();
        while !self.at(close) && !self.at(TokenKind::Eof) {
            items.push(item(self));
            if self.eat(TokenKind::Comma) {
                continue;
            }
            if self.at(close) || self.at(TokenKind::Eof) {
                break;
            }
            let found = self.peek();
            self.recover(
                SyntaxErrorKind::UnexpectedToken,
                format!("expected ',' or {}, found {}", close, found),
                SyncSet::LIST_ITEM,
            );
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use crate::lexer::tokenize;
    use crate::parser::{ParseOptions, Parser};

    fn parser(source: &str) -> Parser {
        Parser::new(tokenize(source), ParseOptions::default())
    }

    #[test]
    fn test_glued_qualified_name() {
        let mut p = parser("io:println");
        let name = p.parse_qualified_name();
        assert_eq!(name.to_string(), "io:println");
        assert_eq!(name.span, 0..10);
    }

    #[test]
    fn test_spaced_colon_is_not_qualified() {
        let mut p = parser("io : println");
        let name = p.parse_qualified_name();
        assert!(name.prefix.is_none());
        assert_eq!(name.name.name, "io");
    }

    #[test]
    fn test_annotation_with_value() {
        let mut p = parser("@http:Config { path: \"/\" } @deprecated");
        let annotations = p.parse_annotations();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].name.to_string(), "http:Config");
        assert!(annotations[0].value.is_some());
        assert!(annotations[1].value.is_none());
        assert!(p.errors().is_empty());
    }
}
