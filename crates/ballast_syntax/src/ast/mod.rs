pub mod decl;
pub mod expr;
pub mod pattern;
pub mod stmt;
pub mod types;
pub mod visitor;

// 重新导出核心类型，方便外部直接使用 ballast_syntax::ast::Expr 等
pub use ballast_diagnostics::Span;
pub use decl::{
    AnnotationDecl, AttachPoint, CompilationUnit, ConstantDecl, FunctionBody, FunctionDef,
    FunctionQualifiers, FunctionSignature, ImportDecl, Item, ItemKind, ListenerDecl, ModuleVarDecl,
    Param, ReturnType, ServiceBody, ServiceDef, TypeDefinition, Visibility,
};
pub use expr::{
    Arg, BinaryOp, Expr, ExprKind, LetBinding, Literal, MappingField, MappingKey, QueryClause,
    QueryExpr, TemplateKind, UnaryOp, WaitField, WaitTarget,
};
pub use pattern::{BindingPattern, BindingPatternKind, ErrorDetailBinding, FieldBinding, MatchPattern};
pub use stmt::{
    Block, CatchClause, ElseBranch, IfStmt, JoinClause, JoinCondition, JoinParam, MatchClause,
    Stmt, StmtKind, TransactionStmt, VarDecl, WorkerDecl, XmlnsDecl,
};
pub use types::{
    ArrayDimension, BuiltinType, ObjectBody, ObjectField, ObjectMember, ObjectMemberKind,
    ParamType, RecordBody, RecordField, RecordMember, TypeDesc, TypeKind,
};
pub use visitor::Visitor;

/// 标识符
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }

    /// 缺失标识符的占位 (名字为空)
    pub fn missing(span: Span) -> Self {
        Self::new(String::new(), span)
    }

    pub fn is_missing(&self) -> bool {
        self.name.is_empty()
    }
}

/// 可带模块前缀的名字：`name` 或 `prefix:name`
///
/// 只有当三个 token 彼此紧贴时才会组成带前缀的名字，
/// 所以 `a ? b : c` 中的 `b : c` 不会被误认。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub prefix: Option<Ident>,
    pub name: Ident,
    pub span: Span,
}

impl QualifiedName {
    pub fn simple(name: Ident) -> Self {
        let span = name.span.clone();
        Self {
            prefix: None,
            name,
            span,
        }
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix.name, self.name.name),
            None => f.write_str(&self.name.name),
        }
    }
}

/// 注解附着：`@pkg:Name { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub name: QualifiedName,
    pub value: Option<Expr>,
    pub span: Span,
}
