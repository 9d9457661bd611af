use super::decl::{FunctionSignature, ServiceBody};
use super::pattern::BindingPattern;
use super::stmt::Block;
use super::types::TypeDesc;
use super::{Ident, QualifiedName, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// 错误占位节点
    pub fn error(span: Span) -> Self {
        Self::new(ExprKind::Error, span)
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, ExprKind::Error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // 字面量: 1, 0xff, 1.5, "hi", true, null
    Literal(Literal),

    // ()
    Nil,

    // 变量或模块成员: x, io:println
    Name(QualifiedName),

    // (e)
    Group(Box<Expr>),

    // [1, 2, 3]
    List(Vec<Expr>),

    // {a: 1, "b": 2, [k]: v, c, ...rest}
    Mapping(Vec<MappingField>),

    // string `...` / xml `...`，内容不做解析
    Template { kind: TemplateKind, raw: String },

    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    // c ? a : b
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    // a.b / a?.b
    FieldAccess {
        target: Box<Expr>,
        field: Ident,
        optional: bool,
    },

    // a.@pkg:ann
    AnnotationAccess {
        target: Box<Expr>,
        annotation: QualifiedName,
    },

    // a[i]
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },

    // f(x, y = 1, ...rest)
    Invocation {
        callee: Box<Expr>,
        args: Vec<Arg>,
    },

    // client->get("/path")
    RemoteCall {
        target: Box<Expr>,
        method: Ident,
        args: Vec<Arg>,
    },

    // e ->> w
    SyncSend {
        value: Box<Expr>,
        peer: Ident,
    },

    // e is T
    TypeTest {
        expr: Box<Expr>,
        ty: TypeDesc,
    },

    // <T> e
    TypeCast {
        ty: TypeDesc,
        expr: Box<Expr>,
    },

    // 表达式位置上的类型描述符: int, map<string>
    TypeDescriptor(TypeDesc),

    // new / new T(args)
    TypeInit {
        ty: Option<TypeDesc>,
        args: Vec<Arg>,
    },

    // check e / checkpanic e
    Check {
        expr: Box<Expr>,
        panics: bool,
    },

    Trap(Box<Expr>),

    Start(Box<Expr>),

    Wait(WaitTarget),

    // flush / flush w
    Flush(Option<Ident>),

    // <- w
    Receive(Ident),

    // function (int x) returns int { ... }
    Lambda {
        signature: FunctionSignature,
        body: Block,
    },

    // (a, b) => a + b
    Arrow {
        params: Vec<Ident>,
        body: Box<Expr>,
    },

    // let int x = 1 in x + 1
    Let {
        bindings: Vec<LetBinding>,
        body: Box<Expr>,
    },

    Query(Box<QueryExpr>),

    // service { resource function ... }
    ServiceConstructor(ServiceBody),

    // 解析失败的占位
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    String,
    Xml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    // 算术
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    // 移位
    Shl,
    Shr,
    UnsignedShr,
    // 区间
    ClosedRange,
    HalfOpenRange,
    // 比较
    Lt,
    Gt,
    LtEq,
    GtEq,
    Eq,
    NotEq,
    RefEq,
    RefNotEq,
    // 位运算
    BitAnd,
    BitXor,
    BitOr,
    // 逻辑
    And,
    Or,
    // a ?: b
    Elvis,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::UnsignedShr => ">>>",
            BinaryOp::ClosedRange => "...",
            BinaryOp::HalfOpenRange => "..<",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::RefEq => "===",
            BinaryOp::RefNotEq => "!==",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Elvis => "?:",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Plus,
    Neg,
    Not,
    BitNot,
    Typeof,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::Typeof => "typeof",
        }
    }
}

/// 调用参数
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Positional(Expr),
    Named { name: Ident, value: Expr },
    Rest(Expr),
}

impl Arg {
    pub fn value(&self) -> &Expr {
        match self {
            Arg::Positional(value) | Arg::Named { value, .. } | Arg::Rest(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MappingField {
    KeyValue { key: MappingKey, value: Expr },
    // {a} 等价于 {a: a}
    Shorthand(Ident),
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MappingKey {
    Name(Ident),
    String { value: String, span: Span },
    Computed(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum WaitTarget {
    // wait f
    Single(Box<Expr>),
    // wait f1 | f2
    Alternate(Vec<Expr>),
    // wait {a: f1, f2}
    Collection(Vec<WaitField>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaitField {
    pub key: Ident,
    pub value: Option<Expr>,
    pub span: Span,
}

/// `let` 表达式和查询 `let` 子句中的绑定；`ty` 为 None 表示 `var`
#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub ty: Option<TypeDesc>,
    pub pattern: BindingPattern,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryExpr {
    pub clauses: Vec<QueryClause>,
    pub select: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryClause {
    From {
        ty: Option<TypeDesc>,
        pattern: BindingPattern,
        source: Expr,
        span: Span,
    },
    Where(Expr),
    Let(Vec<LetBinding>),
}
