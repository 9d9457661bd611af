use super::expr::Expr;
use super::{Ident, QualifiedName, Span};

/// 绑定模式：出现在变量声明、解构赋值、foreach 与 match 子句中
#[derive(Debug, Clone, PartialEq)]
pub struct BindingPattern {
    pub kind: BindingPatternKind,
    pub span: Span,
}

impl BindingPattern {
    pub fn new(kind: BindingPatternKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn missing(span: Span) -> Self {
        Self::new(BindingPatternKind::Missing, span)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindingPatternKind {
    // x
    Capture(Ident),

    // _
    Wildcard,

    // [a, [b, c], ...rest]
    List {
        members: Vec<BindingPattern>,
        rest: Option<Ident>,
    },

    // {name, age: a, ...rest}
    Mapping {
        fields: Vec<FieldBinding>,
        rest: Option<Ident>,
    },

    // error(reason, message = m, ...rest)
    Error {
        type_ref: Option<QualifiedName>,
        reason: Box<BindingPattern>,
        details: Vec<ErrorDetailBinding>,
        rest: Option<Ident>,
    },

    Missing,
}

/// `{field}` 或 `{field: pattern}`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBinding {
    pub field: Ident,
    pub pattern: Option<BindingPattern>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorDetailBinding {
    pub name: Ident,
    pub pattern: BindingPattern,
    pub span: Span,
}

/// match 子句左侧的模式
#[derive(Debug, Clone, PartialEq)]
pub enum MatchPattern {
    // 1 | 2 | "three"
    Static(Vec<Expr>),
    // var [a, b]
    Binding(BindingPattern),
    // _
    Wildcard(Span),
}
