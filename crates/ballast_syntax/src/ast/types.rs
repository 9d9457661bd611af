//! 类型描述符
//!
//! 后缀组合的结合强度：数组 > 联合 > 可空。
//! 因此 `int|string?` 是 `(int|string)?`，`int?[]` 是 `(int?)[]`。

use super::decl::{FunctionDef, Visibility};
use super::expr::{Expr, Literal};
use super::{Annotation, Ident, QualifiedName, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDesc {
    pub kind: TypeKind,
    pub span: Span,
}

impl TypeDesc {
    pub fn new(kind: TypeKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn missing(span: Span) -> Self {
        Self::new(TypeKind::Missing, span)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self.kind, TypeKind::Missing)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Builtin(BuiltinType),

    // ()
    Nil,

    // Person / http:Client
    Named(QualifiedName),

    // (T)
    Group(Box<TypeDesc>),

    // T[] / T[*] / T[5] / T[SIZE]
    Array {
        element: Box<TypeDesc>,
        dimension: ArrayDimension,
    },

    // A|B|C，成员是平铺的
    Union(Vec<TypeDesc>),

    // T?
    Nullable(Box<TypeDesc>),

    // [int, string, boolean...]
    Tuple {
        members: Vec<TypeDesc>,
        rest: Option<Box<TypeDesc>>,
    },

    // map<T>, future<T>, stream<T, E>, error<R, D>
    Parametrized {
        base: ParamType,
        args: Vec<TypeDesc>,
    },

    // function (int, string...) returns boolean
    Function {
        params: Vec<TypeDesc>,
        rest: Option<Box<TypeDesc>>,
        returns: Option<Box<TypeDesc>>,
    },

    Object(ObjectBody),

    Record(RecordBody),

    // "GET" / 5 / true
    Singleton(Literal),

    // 解析失败的占位
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinType {
    Int,
    Byte,
    Float,
    Decimal,
    Boolean,
    String,
    Json,
    Xml,
    Any,
    Anydata,
    Handle,
    Never,
}

impl BuiltinType {
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Int => "int",
            BuiltinType::Byte => "byte",
            BuiltinType::Float => "float",
            BuiltinType::Decimal => "decimal",
            BuiltinType::Boolean => "boolean",
            BuiltinType::String => "string",
            BuiltinType::Json => "json",
            BuiltinType::Xml => "xml",
            BuiltinType::Any => "any",
            BuiltinType::Anydata => "anydata",
            BuiltinType::Handle => "handle",
            BuiltinType::Never => "never",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Map,
    Future,
    Typedesc,
    Stream,
    Table,
    Error,
}

impl ParamType {
    pub fn name(self) -> &'static str {
        match self {
            ParamType::Map => "map",
            ParamType::Future => "future",
            ParamType::Typedesc => "typedesc",
            ParamType::Stream => "stream",
            ParamType::Table => "table",
            ParamType::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayDimension {
    // []
    Unsized,
    // [*]
    Inferred,
    // [5]
    Fixed(u64),
    // [SIZE]
    Constant(QualifiedName),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectBody {
    pub is_abstract: bool,
    pub is_client: bool,
    pub members: Vec<ObjectMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectMember {
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub kind: ObjectMemberKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMemberKind {
    Field(ObjectField),
    Method(FunctionDef),
    // *Other;
    TypeReference(TypeDesc),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectField {
    pub ty: TypeDesc,
    pub name: Ident,
    pub default: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordBody {
    // record {| ... |}
    pub closed: bool,
    pub members: Vec<RecordMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordMember {
    Field(RecordField),
    TypeReference(TypeDesc),
    // T...;
    Rest(TypeDesc),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordField {
    pub annotations: Vec<Annotation>,
    pub ty: TypeDesc,
    pub name: Ident,
    pub optional: bool,
    pub default: Option<Expr>,
    pub span: Span,
}
