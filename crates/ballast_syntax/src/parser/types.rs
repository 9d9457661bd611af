//! Type Descriptor Parser
//!
//! 类型描述符解析。后缀组合用一个小的优先级爬升处理：
//!
//! | 后缀    | 强度 |
//! |---------|------|
//! | `T[..]` | 3    |
//! | `A\|B`  | 2    |
//! | `T?`    | 1    |
//!
//! 联合类型的成员以强度 3 解析，所以 `A|B|C` 得到一个平铺的三元联合，
//! `int|string?` 得到 `(int|string)?`。

use super::{Parser, SyncSet, SyntaxErrorKind};
use crate::ast::{
    ArrayDimension, BuiltinType, Ident, ObjectBody, ObjectField, ObjectMember, ObjectMemberKind,
    ParamType, QualifiedName, RecordBody, RecordField, RecordMember, TypeDesc, TypeKind,
};
use crate::lexer::TokenKind;

const ARRAY: u8 = 3;
const UNION: u8 = 2;
const NULLABLE: u8 = 1;

/// 类型出现的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TypeContext {
    /// 声明、参数、字段等：`?` 总是可空后缀
    Declaration,
    /// `is` / 类型转换 / 表达式中的类型：`?` 后面能开始表达式时属于条件表达式
    Expression,
}

impl Parser {
    pub(crate) fn parse_type(&mut self, cx: TypeContext) -> TypeDesc {
        if !self.enter() {
            return TypeDesc::missing(self.placeholder_span());
        }
        let ty = self.parse_type_with(0, cx);
        self.leave();
        ty
    }

    fn parse_type_with(&mut self, min: u8, cx: TypeContext) -> TypeDesc {
        let start = self.start();
        let mut ty = self.parse_type_primary();
        loop {
            match self.peek() {
                TokenKind::LBracket if ARRAY >= min && self.at_array_dimension() => {
                    let dimension = self.parse_array_dimension();
                    ty = TypeDesc::new(
                        TypeKind::Array {
                            element: Box::new(ty),
                            dimension,
                        },
                        self.span_from(start),
                    );
                }
                TokenKind::Pipe if UNION >= min => {
                    let mut members = vec![ty];
                    while self.eat(TokenKind::Pipe) {
                        members.push(self.parse_type_with(UNION + 1, cx));
                    }
                    ty = TypeDesc::new(TypeKind::Union(members), self.span_from(start));
                }
                TokenKind::Question if NULLABLE >= min && self.question_is_nullable(cx) => {
                    self.bump();
                    ty = TypeDesc::new(TypeKind::Nullable(Box::new(ty)), self.span_from(start));
                }
                _ => break,
            }
        }
        ty
    }

    fn question_is_nullable(&self, cx: TypeContext) -> bool {
        match cx {
            TypeContext::Declaration => true,
            TypeContext::Expression => !self.nth(1).starts_expression(),
        }
    }

    /// `[` 后面是 `]`、`*]`、`N]`、`C]` 或 `p:C]` 时才是数组维度，
    /// 否则留给后面的列表绑定模式 (例如 `[int, int] [a, b] = t;`)
    fn at_array_dimension(&self) -> bool {
        match self.nth(1) {
            TokenKind::RBracket => true,
            TokenKind::Star | TokenKind::DecimalInteger | TokenKind::HexInteger => {
                self.nth(2) == TokenKind::RBracket
            }
            TokenKind::Identifier => {
                self.nth(2) == TokenKind::RBracket
                    || (self.nth(2) == TokenKind::Colon
                        && self.nth(3) == TokenKind::Identifier
                        && self.nth(4) == TokenKind::RBracket)
            }
            _ => false,
        }
    }

    fn parse_array_dimension(&mut self) -> ArrayDimension {
        self.bump();
        let dimension = match self.peek() {
            TokenKind::RBracket => ArrayDimension::Unsized,
            TokenKind::Star => {
                self.bump();
                ArrayDimension::Inferred
            }
            TokenKind::DecimalInteger | TokenKind::HexInteger => {
                let token = self.bump();
                match super::expr::parse_int_literal(&token.lexeme) {
                    Some(value) if value >= 0 => ArrayDimension::Fixed(value as u64),
                    _ => {
                        self.report(
                            SyntaxErrorKind::MalformedConstruct,
                            token.span,
                            format!("array length '{}' is out of range", token.lexeme),
                            super::RecoveryAction::Placeholder,
                        );
                        ArrayDimension::Unsized
                    }
                }
            }
            _ => ArrayDimension::Constant(self.parse_qualified_name()),
        };
        self.expect(TokenKind::RBracket);
        dimension
    }

    fn parse_type_primary(&mut self) -> TypeDesc {
        let start = self.start();
        let kind = self.peek();
        if let Some(builtin) = builtin_type(kind) {
            self.bump();
            return TypeDesc::new(TypeKind::Builtin(builtin), self.span_from(start));
        }
        if let Some(base) = param_type(kind) {
            return self.parse_parametrized_type(base);
        }
        match kind {
            TokenKind::Identifier => {
                let name = self.parse_qualified_name();
                TypeDesc::new(TypeKind::Named(name), self.span_from(start))
            }
            TokenKind::LParen if self.nth(1) == TokenKind::RParen => {
                self.bump();
                self.bump();
                TypeDesc::new(TypeKind::Nil, self.span_from(start))
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_type(TypeContext::Declaration);
                self.expect(TokenKind::RParen);
                TypeDesc::new(TypeKind::Group(Box::new(inner)), self.span_from(start))
            }
            TokenKind::LBracket => self.parse_tuple_type(),
            TokenKind::Function => self.parse_function_type(),
            TokenKind::Object | TokenKind::Abstract | TokenKind::Client => {
                let body = self.parse_object_body();
                TypeDesc::new(TypeKind::Object(body), self.span_from(start))
            }
            TokenKind::Record => {
                let body = self.parse_record_body();
                TypeDesc::new(TypeKind::Record(body), self.span_from(start))
            }
            TokenKind::Minus
                if matches!(
                    self.nth(1),
                    TokenKind::DecimalInteger | TokenKind::HexInteger | TokenKind::FloatingPoint
                ) =>
            {
                self.parse_singleton_type()
            }
            k if k.is_literal() => self.parse_singleton_type(),
            _ => {
                let span = self.report_no_viable("a type descriptor");
                TypeDesc::missing(span)
            }
        }
    }

    fn parse_singleton_type(&mut self) -> TypeDesc {
        let start = self.start();
        let negative = self.eat(TokenKind::Minus);
        let literal = self.parse_literal_value(negative);
        TypeDesc::new(TypeKind::Singleton(literal), self.span_from(start))
    }

    /// `map<T>`、`future<T>`、`error<R, D>` 等；`map` 必须带参数
    fn parse_parametrized_type(&mut self, base: ParamType) -> TypeDesc {
        let start = self.start();
        self.bump();
        let mut args = Vec::new();
        if self.eat(TokenKind::Lt) {
            args = self.parse_comma_list(TokenKind::Gt, |p| p.parse_type(TypeContext::Declaration));
            self.expect(TokenKind::Gt);
        } else if base == ParamType::Map {
            self.expect(TokenKind::Lt);
        }
        TypeDesc::new(TypeKind::Parametrized { base, args }, self.span_from(start))
    }

    /// `[T1, T2, R...]`
    fn parse_tuple_type(&mut self) -> TypeDesc {
        let start = self.start();
        self.bump();
        let mut members = Vec::new();
        let mut rest = None;
        let items = self.parse_comma_list(TokenKind::RBracket, |p| {
            let ty = p.parse_type(TypeContext::Declaration);
            let is_rest = p.eat(TokenKind::Ellipsis);
            (ty, is_rest)
        });
        let count = items.len();
        for (index, (ty, is_rest)) in items.into_iter().enumerate() {
            if is_rest {
                if index + 1 != count {
                    self.report(
                        SyntaxErrorKind::MalformedConstruct,
                        ty.span.clone(),
                        "the rest type must be the last member of a tuple type",
                        super::RecoveryAction::Placeholder,
                    );
                }
                rest = Some(Box::new(ty));
            } else {
                members.push(ty);
            }
        }
        self.expect(TokenKind::RBracket);
        TypeDesc::new(TypeKind::Tuple { members, rest }, self.span_from(start))
    }

    /// `function (int, string...) returns boolean`；参数名可以省略
    fn parse_function_type(&mut self) -> TypeDesc {
        let start = self.start();
        self.bump();
        self.expect(TokenKind::LParen);
        let items = self.parse_comma_list(TokenKind::RParen, |p| {
            p.parse_annotations();
            let ty = p.parse_type(TypeContext::Declaration);
            let is_rest = p.eat(TokenKind::Ellipsis);
            if p.at(TokenKind::Identifier) {
                p.bump();
            }
            (ty, is_rest)
        });
        self.expect(TokenKind::RParen);

        let mut params = Vec::new();
        let mut rest = None;
        let count = items.len();
        for (index, (ty, is_rest)) in items.into_iter().enumerate() {
            if is_rest {
                if index + 1 != count {
                    self.report(
                        SyntaxErrorKind::MalformedConstruct,
                        ty.span.clone(),
                        "the rest parameter must be the last parameter",
                        super::RecoveryAction::Placeholder,
                    );
                }
                rest = Some(Box::new(ty));
            } else {
                params.push(ty);
            }
        }

        let returns = if self.eat(TokenKind::Returns) {
            self.parse_annotations();
            Some(Box::new(self.parse_type(TypeContext::Declaration)))
        } else {
            None
        };
        TypeDesc::new(
            TypeKind::Function {
                params,
                rest,
                returns,
            },
            self.span_from(start),
        )
    }

    /// `[abstract] [client] object { ... }`
    pub(crate) fn parse_object_body(&mut self) -> ObjectBody {
        let mut is_abstract = false;
        let mut is_client = false;
        loop {
            match self.peek() {
                TokenKind::Abstract => {
                    self.bump();
                    is_abstract = true;
                }
                TokenKind::Client => {
                    self.bump();
                    is_client = true;
                }
                _ => break,
            }
        }
        self.expect(TokenKind::Object);
        let members = self.parse_member_block(TokenKind::LBrace, TokenKind::RBrace, |p| {
            p.parse_object_member()
        });
        ObjectBody {
            is_abstract,
            is_client,
            members,
        }
    }

    /// `{ member* }` 形式的成员块，成员解析失败时恢复到 `;` 或 `}`
    pub(crate) fn parse_member_block<T>(
        &mut self,
        open: TokenKind,
        close: TokenKind,
        mut member: impl FnMut(&mut Self) -> Option<T>,
    ) -> Vec<T> {
        let open_span = self.current_span();
        let mut members = Vec::new();
        if !self.expect(open) {
            return members;
        }
        if !self.enter() {
            return members;
        }
        loop {
            if self.eat(close) {
                break;
            }
            if self.at(TokenKind::Eof) {
                self.report_unterminated(open_span);
                break;
            }
            let before = self.cursor.position();
            match member(self) {
                Some(m) => members.push(m),
                None if self.cursor.position() == before => {
                    let found = self.peek();
                    self.recover(
                        SyntaxErrorKind::UnexpectedToken,
                        format!("unexpected {} in member list", found),
                        SyncSet::SEMICOLON | SyncSet::CLOSE_BRACE,
                    );
                    if self.cursor.position() == before && !self.at(TokenKind::Eof) {
                        self.cursor.advance();
                    }
                }
                None => {}
            }
        }
        self.leave();
        members
    }

    /// 对象成员：字段、方法或 `*T;` 类型引用
    pub(crate) fn parse_object_member(&mut self) -> Option<ObjectMember> {
        let start = self.start();
        let annotations = self.parse_annotations();
        let visibility = self.parse_visibility();
        let kind = match self.peek() {
            TokenKind::Star => {
                self.bump();
                let ty = self.parse_type(TypeContext::Declaration);
                self.expect_semicolon();
                ObjectMemberKind::TypeReference(ty)
            }
            TokenKind::Function | TokenKind::Remote | TokenKind::Resource => {
                ObjectMemberKind::Method(self.parse_function_def(true))
            }
            k if k.starts_type() => {
                let ty = self.parse_type(TypeContext::Declaration);
                let name = self.expect_ident("field name");
                let default = self.eat(TokenKind::Assign).then(|| self.parse_expr());
                self.expect_semicolon();
                ObjectMemberKind::Field(ObjectField { ty, name, default })
            }
            _ if self.start() != start => {
                self.report_no_viable("an object member");
                return None;
            }
            _ => return None,
        };
        Some(ObjectMember {
            annotations,
            visibility,
            kind,
            span: self.span_from(start),
        })
    }

    /// `record { ... }` 或封闭的 `record {| ... |}`
    fn parse_record_body(&mut self) -> RecordBody {
        self.bump();
        let closed = self.at(TokenKind::LBracePipe);
        let (open, close) = if closed {
            (TokenKind::LBracePipe, TokenKind::RBracePipe)
        } else {
            (TokenKind::LBrace, TokenKind::RBrace)
        };
        let members = self.parse_member_block(open, close, |p| p.parse_record_member());
        RecordBody { closed, members }
    }

    fn parse_record_member(&mut self) -> Option<RecordMember> {
        let start = self.start();
        if self.eat(TokenKind::Star) {
            let ty = self.parse_type(TypeContext::Declaration);
            self.expect_semicolon();
            return Some(RecordMember::TypeReference(ty));
        }
        let annotations = self.parse_annotations();
        if !self.peek().starts_type() {
            return None;
        }
        let ty = self.parse_type(TypeContext::Declaration);
        if self.eat(TokenKind::Ellipsis) {
            self.expect_semicolon();
            return Some(RecordMember::Rest(ty));
        }
        let name = self.parse_field_name();
        let optional = self.eat(TokenKind::Question);
        let default = self.eat(TokenKind::Assign).then(|| self.parse_expr());
        self.expect_semicolon();
        Some(RecordMember::Field(RecordField {
            annotations,
            ty,
            name,
            optional,
            default,
            span: self.span_from(start),
        }))
    }

    /// 字段名允许使用部分关键字，例如 `string type;`
    fn parse_field_name(&mut self) -> Ident {
        if matches!(
            self.peek(),
            TokenKind::Type
                | TokenKind::Version
                | TokenKind::Source
                | TokenKind::Start
                | TokenKind::From
                | TokenKind::Select
                | TokenKind::Where
        ) {
            let token = self.bump();
            return Ident::new(token.lexeme, token.span);
        }
        self.expect_ident("field name")
    }

    /// 用于 `new T(...)` 等位置：只取命名类型或带参数的内建类型
    pub(crate) fn parse_type_reference(&mut self) -> TypeDesc {
        let start = self.start();
        if let Some(base) = param_type(self.peek()) {
            return self.parse_parametrized_type(base);
        }
        let name: QualifiedName = self.parse_qualified_name();
        TypeDesc::new(TypeKind::Named(name), self.span_from(start))
    }
}

pub(crate) fn builtin_type(kind: TokenKind) -> Option<BuiltinType> {
    Some(match kind {
        TokenKind::TypeInt => BuiltinType::Int,
        TokenKind::TypeByte => BuiltinType::Byte,
        TokenKind::TypeFloat => BuiltinType::Float,
        TokenKind::TypeDecimal => BuiltinType::Decimal,
        TokenKind::TypeBoolean => BuiltinType::Boolean,
        TokenKind::TypeString => BuiltinType::String,
        TokenKind::TypeJson => BuiltinType::Json,
        TokenKind::TypeXml => BuiltinType::Xml,
        TokenKind::TypeAny => BuiltinType::Any,
        TokenKind::TypeAnydata => BuiltinType::Anydata,
        TokenKind::TypeHandle => BuiltinType::Handle,
        TokenKind::TypeNever => BuiltinType::Never,
        _ => return None,
    })
}

pub(crate) fn param_type(kind: TokenKind) -> Option<ParamType> {
    Some(match kind {
        TokenKind::TypeMap => ParamType::Map,
        TokenKind::TypeFuture => ParamType::Future,
        TokenKind::TypeTypedesc => ParamType::Typedesc,
        TokenKind::TypeStream => ParamType::Stream,
        TokenKind::TypeTable => ParamType::Table,
        TokenKind::TypeError => ParamType::Error,
        _ => return None,
    })
}
