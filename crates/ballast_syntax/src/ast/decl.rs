use super::expr::Expr;
use super::stmt::{Block, XmlnsDecl};
use super::types::{ObjectMember, TypeDesc};
use super::{Annotation, Ident, Span};

/// 一个源文件的语法树根
#[derive(Debug, Clone, PartialEq)]
pub struct CompilationUnit {
    pub imports: Vec<ImportDecl>,
    pub items: Vec<Item>,
    pub span: Span,
}

/// `import org/a.b version 1.0 as c;`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub org: Option<Ident>,
    pub path: Vec<Ident>,
    pub version: Option<String>,
    pub alias: Option<Ident>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Default,
    Public,
    Private,
}

/// 模块级定义
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub kind: ItemKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Function(FunctionDef),
    Service(ServiceDef),
    Listener(ListenerDecl),
    TypeDef(TypeDefinition),
    Annotation(AnnotationDecl),
    Constant(ConstantDecl),
    Variable(ModuleVarDecl),
    Xmlns(XmlnsDecl),
    // 解析失败并已跳过的定义
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FunctionQualifiers {
    pub remote: bool,
    pub resource: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub qualifiers: FunctionQualifiers,
    // function Person.name() 的 Person
    pub receiver: Option<Ident>,
    pub name: Ident,
    pub signature: FunctionSignature,
    pub body: FunctionBody,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSignature {
    pub params: Vec<Param>,
    pub rest: Option<Box<Param>>,
    pub returns: Option<ReturnType>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub annotations: Vec<Annotation>,
    pub ty: TypeDesc,
    pub name: Ident,
    pub default: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnType {
    pub annotations: Vec<Annotation>,
    pub ty: TypeDesc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    Block(Block),
    // = @annot external;
    External(Vec<Annotation>),
    // 抽象对象中的方法声明
    None,
}

/// `service name on ep1, ep2 { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDef {
    pub name: Option<Ident>,
    pub listeners: Vec<Expr>,
    pub body: ServiceBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceBody {
    pub members: Vec<ObjectMember>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListenerDecl {
    pub ty: Option<TypeDesc>,
    pub name: Ident,
    pub init: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: Ident,
    pub ty: TypeDesc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDecl {
    pub is_const: bool,
    pub ty: Option<TypeDesc>,
    pub name: Ident,
    pub attach_points: Vec<AttachPoint>,
}

/// `on service, resource function, source type`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachPoint {
    pub source: bool,
    // 多个单词以空格连接，如 "resource function"
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDecl {
    pub ty: Option<TypeDesc>,
    pub name: Ident,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleVarDecl {
    pub is_final: bool,
    // None 表示 `var`
    pub ty: Option<TypeDesc>,
    pub name: Ident,
    pub init: Option<Expr>,
}
