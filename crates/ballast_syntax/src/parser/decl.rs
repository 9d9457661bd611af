//! Top-Level Parser
//!
//! 编译单元：import 列表 + 模块级定义。
//! 无法识别的定义报告一次错误后跳到下一个定义关键字。

use super::types::TypeContext;
use super::{Parser, RecoveryAction, SyncSet, SyntaxErrorKind};
use crate::ast::{
    AnnotationDecl, AttachPoint, CompilationUnit, ConstantDecl, FunctionBody, FunctionDef,
    FunctionQualifiers, FunctionSignature, ImportDecl, Item, ItemKind, ListenerDecl,
    ModuleVarDecl, Param, ReturnType, ServiceBody, ServiceDef, TypeDefinition,
};
use crate::lexer::TokenKind;

impl Parser {
    pub(crate) fn parse_compilation_unit(&mut self) -> CompilationUnit {
        let mut imports = Vec::new();
        let mut items = Vec::new();
        while !self.at(TokenKind::Eof) {
            let before = self.cursor.position();
            if self.at(TokenKind::Import) {
                let import = self.parse_import();
                if !items.is_empty() {
                    self.report(
                        SyntaxErrorKind::MalformedConstruct,
                        import.span.clone(),
                        "imports must come before other definitions",
                        RecoveryAction::Placeholder,
                    );
                }
                imports.push(import);
            } else {
                items.push(self.parse_item());
            }
            if self.cursor.position() == before && !self.at(TokenKind::Eof) {
                self.cursor.advance();
            }
        }
        let end = self.current_span().end;
        CompilationUnit {
            imports,
            items,
            span: 0..end,
        }
    }

    /// `import [org/]a.b.c [version 1.0.0] [as alias];`
    fn parse_import(&mut self) -> ImportDecl {
        let start = self.start();
        self.bump();
        let first = self.expect_ident("module name");
        let (org, mut path) = if self.eat(TokenKind::Slash) {
            (Some(first), vec![self.expect_ident("module name")])
        } else {
            (None, vec![first])
        };
        while self.eat(TokenKind::Dot) {
            path.push(self.expect_ident("module name"));
        }
        let version = self.eat(TokenKind::Version).then(|| self.parse_version());
        let alias = self
            .eat(TokenKind::As)
            .then(|| self.expect_ident("import alias"));
        self.expect_semicolon();
        ImportDecl {
            org,
            path,
            version,
            alias,
            span: self.span_from(start),
        }
    }

    /// `1.0.0` 会被切成多个 token，这里把紧贴的部分拼回去
    fn parse_version(&mut self) -> String {
        let mut version = String::new();
        let is_part = |kind: TokenKind| {
            matches!(
                kind,
                TokenKind::DecimalInteger
                    | TokenKind::FloatingPoint
                    | TokenKind::Dot
                    | TokenKind::Identifier
            )
        };
        if !is_part(self.peek()) {
            self.report_no_viable("a version");
            return version;
        }
        version.push_str(&self.bump().lexeme);
        while is_part(self.peek()) && self.glued(0) {
            version.push_str(&self.bump().lexeme);
        }
        version
    }

    fn parse_item(&mut self) -> Item {
        let start = self.start();
        let annotations = self.parse_annotations();
        let visibility = self.parse_visibility();
        let kind = match self.peek() {
            TokenKind::Function if self.nth(1) != TokenKind::LParen => {
                ItemKind::Function(self.parse_function_def(false))
            }
            TokenKind::Remote | TokenKind::Resource => {
                ItemKind::Function(self.parse_function_def(false))
            }
            TokenKind::Service => ItemKind::Service(self.parse_service_def()),
            TokenKind::Listener => ItemKind::Listener(self.parse_listener_decl()),
            TokenKind::Type => ItemKind::TypeDef(self.parse_type_definition()),
            TokenKind::Annotation => ItemKind::Annotation(self.parse_annotation_decl(false)),
            TokenKind::Const if self.nth(1) == TokenKind::Annotation => {
                self.bump();
                ItemKind::Annotation(self.parse_annotation_decl(true))
            }
            TokenKind::Const => ItemKind::Constant(self.parse_constant_decl()),
            TokenKind::Xmlns => ItemKind::Xmlns(self.parse_xmlns_decl()),
            k if k == TokenKind::Final || k == TokenKind::Var || starts_module_var_type(k) => {
                ItemKind::Variable(self.parse_module_var())
            }
            found => {
                self.recover(
                    SyntaxErrorKind::NoViableAlternative,
                    format!("expected a module-level definition, found {}", found),
                    SyncSet::TOP_LEVEL,
                );
                ItemKind::Error
            }
        };
        Item {
            annotations,
            visibility,
            kind,
            span: self.span_from(start),
        }
    }

    /// `[remote] [resource] function [Recv.]name(params) [returns T] body`
    ///
    /// `allow_no_body` 用于对象成员：抽象方法可以只以 `;` 结尾。
    pub(crate) fn parse_function_def(&mut self, allow_no_body: bool) -> FunctionDef {
        let start = self.start();
        let mut qualifiers = FunctionQualifiers::default();
        loop {
            match self.peek() {
                TokenKind::Remote => qualifiers.remote = true,
                TokenKind::Resource => qualifiers.resource = true,
                _ => break,
            }
            self.bump();
        }
        self.expect(TokenKind::Function);
        let first = self.expect_ident("function name");
        let (receiver, name) = if self.eat(TokenKind::Dot) {
            (Some(first), self.expect_ident("method name"))
        } else {
            (None, first)
        };
        let signature = self.parse_function_signature();
        let body = match self.peek() {
            TokenKind::LBrace => FunctionBody::Block(self.parse_block()),
            TokenKind::Assign => {
                self.bump();
                let annotations = self.parse_annotations();
                self.expect(TokenKind::External);
                self.expect_semicolon();
                FunctionBody::External(annotations)
            }
            TokenKind::Semicolon => {
                let token = self.bump();
                if !allow_no_body {
                    self.report(
                        SyntaxErrorKind::MalformedConstruct,
                        token.span,
                        format!("function '{}' needs a body", name.name),
                        RecoveryAction::Placeholder,
                    );
                }
                FunctionBody::None
            }
            _ => {
                self.expect(TokenKind::LBrace);
                FunctionBody::None
            }
        };
        FunctionDef {
            qualifiers,
            receiver,
            name,
            signature,
            body,
            span: self.span_from(start),
        }
    }

    /// `(T a, T b = 1, T... rest) [returns @ann T]`
    pub(crate) fn parse_function_signature(&mut self) -> FunctionSignature {
        let start = self.start();
        self.expect(TokenKind::LParen);
        let entries = self.parse_comma_list(TokenKind::RParen, |p| p.parse_param());
        self.expect(TokenKind::RParen);

        let mut params = Vec::new();
        let mut rest: Option<Box<Param>> = None;
        let mut misplaced = None;
        let count = entries.len();
        for (index, (param, is_rest)) in entries.into_iter().enumerate() {
            if !is_rest {
                params.push(param);
                continue;
            }
            if rest.is_some() || index + 1 != count {
                misplaced.get_or_insert(param.span.clone());
            }
            if rest.is_none() {
                rest = Some(Box::new(param));
            }
        }
        if let Some(span) = misplaced {
            self.report(
                SyntaxErrorKind::MalformedConstruct,
                span,
                "a rest parameter must be the last parameter",
                RecoveryAction::Placeholder,
            );
        }

        let returns = self.eat(TokenKind::Returns).then(|| {
            let annotations = self.parse_annotations();
            let ty = self.parse_type(TypeContext::Declaration);
            ReturnType { annotations, ty }
        });
        FunctionSignature {
            params,
            rest,
            returns,
            span: self.span_from(start),
        }
    }

    fn parse_param(&mut self) -> (Param, bool) {
        let start = self.start();
        let annotations = self.parse_annotations();
        let ty = self.parse_type(TypeContext::Declaration);
        let is_rest = self.eat(TokenKind::Ellipsis);
        let name = self.expect_ident("parameter name");
        let default = (!is_rest && self.eat(TokenKind::Assign)).then(|| self.parse_expr());
        let param = Param {
            annotations,
            ty,
            name,
            default,
            span: self.span_from(start),
        };
        (param, is_rest)
    }

    /// `service [name] [on ep1, ep2] { ... }`
    fn parse_service_def(&mut self) -> ServiceDef {
        self.bump();
        let name = self
            .at(TokenKind::Identifier)
            .then(|| self.expect_ident("service name"));
        let mut listeners = Vec::new();
        if self.eat(TokenKind::On) {
            listeners.push(self.parse_expr());
            while self.eat(TokenKind::Comma) {
                listeners.push(self.parse_expr());
            }
        }
        let body = self.parse_service_body();
        ServiceDef {
            name,
            listeners,
            body,
        }
    }

    /// 服务体：与对象相同的成员块
    pub(crate) fn parse_service_body(&mut self) -> ServiceBody {
        let start = self.start();
        let members = self.parse_member_block(TokenKind::LBrace, TokenKind::RBrace, |p| {
            p.parse_object_member()
        });
        ServiceBody {
            members,
            span: self.span_from(start),
        }
    }

    /// `listener [T] name = e;`
    fn parse_listener_decl(&mut self) -> ListenerDecl {
        self.bump();
        let ty = self.parse_optional_decl_type();
        let name = self.expect_ident("listener name");
        self.expect(TokenKind::Assign);
        let init = self.parse_expr();
        self.expect_semicolon();
        ListenerDecl { ty, name, init }
    }

    /// `type Name T;`
    fn parse_type_definition(&mut self) -> TypeDefinition {
        self.bump();
        let name = self.expect_ident("type name");
        let ty = self.parse_type(TypeContext::Declaration);
        self.expect_semicolon();
        TypeDefinition { name, ty }
    }

    /// `[const] annotation [T] name [on point, ...];`，`const` 已消耗
    fn parse_annotation_decl(&mut self, is_const: bool) -> AnnotationDecl {
        self.bump();
        let ty = if self.at(TokenKind::Identifier)
            && matches!(self.nth(1), TokenKind::On | TokenKind::Semicolon)
        {
            None
        } else {
            Some(self.parse_type(TypeContext::Declaration))
        };
        let name = self.expect_ident("annotation name");
        let mut attach_points = Vec::new();
        if self.eat(TokenKind::On) {
            attach_points.push(self.parse_attach_point());
            while self.eat(TokenKind::Comma) {
                attach_points.push(self.parse_attach_point());
            }
        }
        self.expect_semicolon();
        AnnotationDecl {
            is_const,
            ty,
            name,
            attach_points,
        }
    }

    /// `[source] word+`，例如 `resource function`、`source type`
    fn parse_attach_point(&mut self) -> AttachPoint {
        let start = self.start();
        let source = self.eat(TokenKind::Source);
        let mut words: Vec<String> = Vec::new();
        while self.at_word() {
            words.push(self.bump().lexeme);
        }
        if words.is_empty() {
            self.report_no_viable("an attach point");
        }
        AttachPoint {
            source,
            name: words.join(" "),
            span: self.span_from(start),
        }
    }

    /// 关键字或标识符
    fn at_word(&self) -> bool {
        let lexeme = self.cursor.current().lexeme.as_str();
        !self.at(TokenKind::Eof)
            && lexeme
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && lexeme.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// `const [T] NAME = e;`
    fn parse_constant_decl(&mut self) -> ConstantDecl {
        self.bump();
        let ty = self.parse_optional_decl_type();
        let name = self.expect_ident("constant name");
        self.expect(TokenKind::Assign);
        let value = self.parse_expr();
        self.expect_semicolon();
        ConstantDecl { ty, name, value }
    }

    /// `name =` 前面没有类型时返回 None
    fn parse_optional_decl_type(&mut self) -> Option<crate::ast::TypeDesc> {
        if self.at(TokenKind::Identifier) && self.nth(1) == TokenKind::Assign {
            None
        } else {
            Some(self.parse_type(TypeContext::Declaration))
        }
    }

    /// `[final] (var | T) name [= e];`
    fn parse_module_var(&mut self) -> ModuleVarDecl {
        let is_final = self.eat(TokenKind::Final);
        let ty = self.parse_var_or_type();
        let name = self.expect_ident("variable name");
        let init = self.eat(TokenKind::Assign).then(|| self.parse_expr());
        if ty.is_none() && init.is_none() {
            self.report(
                SyntaxErrorKind::MalformedConstruct,
                name.span.clone(),
                "a 'var' declaration needs an initializer",
                RecoveryAction::Placeholder,
            );
        }
        self.expect_semicolon();
        ModuleVarDecl {
            is_final,
            ty,
            name,
            init,
        }
    }
}

/// 模块级变量声明可以用哪些 token 开头的类型
fn starts_module_var_type(kind: TokenKind) -> bool {
    kind.is_simple_type()
        || kind.is_parametrized_type()
        || matches!(
            kind,
            TokenKind::Identifier
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::Function
                | TokenKind::Object
                | TokenKind::Record
                | TokenKind::Abstract
                | TokenKind::Client
        )
}

#[cfg(test)]
mod tests {
    use crate::ast::{FunctionBody, ItemKind};
    use crate::parser::{parse_source, SyntaxErrorKind};

    #[test]
    fn test_imports_and_function() {
        let result = parse_source(
            "import ballerina/io;\nimport foo.bar version 1.2.0 as fb;\n\
             public function main() returns error? { io:println(\"hi\"); }",
        );
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let unit = result.tree;
        assert_eq!(unit.imports.len(), 2);
        assert_eq!(unit.imports[0].org.as_ref().map(|o| o.name.as_str()), Some("ballerina"));
        assert_eq!(unit.imports[1].version.as_deref(), Some("1.2.0"));
        assert_eq!(unit.items.len(), 1);
        assert!(matches!(unit.items[0].kind, ItemKind::Function(_)));
    }

    #[test]
    fn test_service_with_resources() {
        let result = parse_source(
            "service hello on new http:Listener(9090) {\n\
                 resource function sayHello(http:Caller caller, http:Request req) {\n\
                     var result = caller->respond(\"Hello\");\n\
                 }\n\
             }",
        );
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let ItemKind::Service(service) = &result.tree.items[0].kind else {
            panic!("expected service");
        };
        assert_eq!(service.listeners.len(), 1);
        assert_eq!(service.body.members.len(), 1);
    }

    #[test]
    fn test_external_function() {
        let result = parse_source("function now() returns int = @java:Method {} external;");
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        let ItemKind::Function(function) = &result.tree.items[0].kind else {
            panic!("expected function");
        };
        assert!(matches!(function.body, FunctionBody::External(ref anns) if anns.len() == 1));
    }

    #[test]
    fn test_module_level_declarations() {
        let result = parse_source(
            "const int MAX = 10;\nconst NAME = \"n\";\nlistener http:Listener ep = new(8080);\n\
             type Point record { int x; int y; };\nfinal string greeting = \"hi\";\n\
             annotation Config cfg on resource function, source type;\nxmlns \"urn:a\" as a;",
        );
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.tree.items.len(), 7);
        let ItemKind::Annotation(annotation) = &result.tree.items[5].kind else {
            panic!("expected annotation");
        };
        assert_eq!(annotation.attach_points[0].name, "resource function");
        assert!(annotation.attach_points[1].source);
    }

    #[test]
    fn test_rest_parameter_must_be_last() {
        let result = parse_source("function f(int... xs, int y) { }");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].kind, SyntaxErrorKind::MalformedConstruct);
    }

    #[test]
    fn test_stray_brace_at_top_level() {
        let result = parse_source("}\nfunction f() { }");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.tree.items.len(), 2);
        assert!(matches!(result.tree.items[1].kind, ItemKind::Function(_)));
    }
}
