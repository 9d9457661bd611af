use super::expr::{BinaryOp, Expr};
use super::pattern::{BindingPattern, MatchPattern};
use super::types::TypeDesc;
use super::{Annotation, Ident, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, StmtKind::Error)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    // int x = 1; / var [a, b] = f();
    VarDecl(VarDecl),

    // a.b = 1;
    Assign { target: Expr, value: Expr },

    // x += 1; / x >>= 2;
    CompoundAssign {
        target: Expr,
        op: BinaryOp,
        value: Expr,
    },

    // [a, b] = f(); / {name} = p;
    Destructure {
        pattern: BindingPattern,
        value: Expr,
    },

    If(IfStmt),

    Match {
        subject: Expr,
        clauses: Vec<MatchClause>,
    },

    Foreach {
        ty: Option<TypeDesc>,
        pattern: BindingPattern,
        iterable: Expr,
        body: Block,
    },

    While { condition: Expr, body: Block },

    Break,

    Continue,

    Fork {
        workers: Vec<WorkerDecl>,
        join: Option<JoinClause>,
    },

    Try {
        body: Block,
        catches: Vec<CatchClause>,
        finally: Option<Block>,
    },

    Throw(Expr),

    Panic(Expr),

    Return(Option<Expr>),

    // e -> w; / e -> w, key;
    WorkerSend {
        value: Expr,
        peer: Ident,
        key: Option<Expr>,
    },

    Worker(WorkerDecl),

    Transaction(TransactionStmt),

    Lock(Block),

    Retry,

    Abort,

    Xmlns(XmlnsDecl),

    Expression(Expr),

    // 解析失败并已跳过的语句
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub annotations: Vec<Annotation>,
    pub is_final: bool,
    // None 表示 `var`
    pub ty: Option<TypeDesc>,
    pub pattern: BindingPattern,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_block: Block,
    pub else_branch: Option<ElseBranch>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElseBranch {
    ElseIf(Box<IfStmt>),
    Else(Block),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchClause {
    pub pattern: MatchPattern,
    pub guard: Option<Expr>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkerDecl {
    pub annotations: Vec<Annotation>,
    pub name: Ident,
    pub returns: Option<TypeDesc>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinClause {
    pub condition: Option<JoinCondition>,
    pub param: Option<JoinParam>,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum JoinCondition {
    All(Vec<Ident>),
    Some { count: u64, workers: Vec<Ident> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinParam {
    pub ty: TypeDesc,
    pub name: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub ty: TypeDesc,
    pub name: Ident,
    pub body: Block,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionStmt {
    pub retries: Option<Expr>,
    pub on_commit: Option<Expr>,
    pub on_abort: Option<Expr>,
    pub body: Block,
    pub on_retry: Option<Block>,
    pub committed: Option<Block>,
    pub aborted: Option<Block>,
}

/// `xmlns "uri" as prefix;`
#[derive(Debug, Clone, PartialEq)]
pub struct XmlnsDecl {
    pub uri: Expr,
    pub prefix: Option<Ident>,
    pub span: Span,
}
