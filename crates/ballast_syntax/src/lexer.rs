//! Lexer
//!
//! 词法分析：基于 logos 的 token 定义。
//!
//! 词法层只产生单字符的 `<` 和 `>`；`<<`、`>>`、`>>>` 以及对应的复合赋值
//! 由语法分析器根据相邻性 (glued) 组合，这样 `map<map<int>>` 不需要拆分 token。

use ballast_diagnostics::Span;
use logos::Logos;
use std::fmt;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
    // --- 声明关键字 ---
    #[token("import")]
    Import,
    #[token("as")]
    As,
    #[token("version")]
    Version,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("external")]
    External,
    #[token("final")]
    Final,
    #[token("const")]
    Const,
    #[token("function")]
    Function,
    #[token("service")]
    Service,
    #[token("resource")]
    Resource,
    #[token("remote")]
    Remote,
    #[token("listener")]
    Listener,
    #[token("annotation")]
    Annotation,
    #[token("type")]
    Type,
    #[token("object")]
    Object,
    #[token("record")]
    Record,
    #[token("abstract")]
    Abstract,
    #[token("client")]
    Client,
    #[token("worker")]
    Worker,
    #[token("xmlns")]
    Xmlns,
    #[token("returns")]
    Returns,
    #[token("on")]
    On,
    #[token("source")]
    Source,

    // --- 语句关键字 ---
    #[token("var")]
    Var,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("match")]
    Match,
    #[token("foreach")]
    Foreach,
    #[token("while")]
    While,
    #[token("in")]
    In,
    #[token("break")]
    Break,
    #[token("continue")]
    Continue,
    #[token("return")]
    Return,
    #[token("fork")]
    Fork,
    #[token("join")]
    Join,
    #[token("try")]
    Try,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("throw")]
    Throw,
    #[token("panic")]
    Panic,
    #[token("transaction")]
    Transaction,
    #[token("with")]
    With,
    #[token("onretry")]
    Onretry,
    #[token("committed")]
    Committed,
    #[token("aborted")]
    Aborted,
    #[token("abort")]
    Abort,
    #[token("retry")]
    Retry,
    #[token("lock")]
    Lock,

    // --- 表达式关键字 ---
    #[token("new")]
    New,
    #[token("is")]
    Is,
    #[token("typeof")]
    Typeof,
    #[token("check")]
    Check,
    #[token("checkpanic")]
    Checkpanic,
    #[token("trap")]
    Trap,
    #[token("start")]
    Start,
    #[token("wait")]
    Wait,
    #[token("flush")]
    Flush,
    #[token("let")]
    Let,
    #[token("from")]
    From,
    #[token("where")]
    Where,
    #[token("select")]
    Select,

    // 字面量关键字
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,

    // --- 内建类型关键字 ---
    #[token("int")]
    TypeInt,
    #[token("byte")]
    TypeByte,
    #[token("float")]
    TypeFloat,
    #[token("decimal")]
    TypeDecimal,
    #[token("boolean")]
    TypeBoolean,
    #[token("string")]
    TypeString,
    #[token("json")]
    TypeJson,
    #[token("xml")]
    TypeXml,
    #[token("any")]
    TypeAny,
    #[token("anydata")]
    TypeAnydata,
    #[token("handle")]
    TypeHandle,
    #[token("never")]
    TypeNever,
    #[token("map")]
    TypeMap,
    #[token("future")]
    TypeFuture,
    #[token("typedesc")]
    TypeTypedesc,
    #[token("stream")]
    TypeStream,
    #[token("table")]
    TypeTable,
    #[token("error")]
    TypeError,

    // --- 分隔符 ---
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token(",")]
    Comma,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("{|")]
    LBracePipe,
    #[token("|}")]
    RBracePipe,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("?")]
    Question,
    #[token("?.")]
    OptionalFieldAccess,
    #[token("?:")]
    Elvis,
    #[token("@")]
    At,
    #[token("...")]
    Ellipsis,
    #[token("..<")]
    HalfOpenRange,

    // --- 运算符 ---
    #[token("=")]
    Assign,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("===")]
    RefEq,
    #[token("!==")]
    RefNotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("&")]
    BitAnd,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("->")]
    RArrow,
    #[token("->>")]
    SyncRArrow,
    #[token("<-")]
    LArrow,
    #[token("=>")]
    FatArrow,

    // 复合赋值 (移位复合赋值由解析器组合)
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("&=")]
    AndAssign,
    #[token("|=")]
    OrAssign,
    #[token("^=")]
    XorAssign,

    // --- 字面量 ---
    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexInteger,
    #[regex(r"[0-9]+")]
    DecimalInteger,
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?[fFdD]?|[0-9]+[eE][+-]?[0-9]+[fFdD]?|[0-9]+[fFdD]")]
    FloatingPoint,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,
    #[regex(r"`[^`]*`")]
    Template,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // 行注释与文档行
    #[regex(r"//[^\n]*", logos::skip)]
    #[regex(r"#[^\n]*", logos::skip)]
    Comment,

    Error,
    Eof,
}

impl TokenKind {
    /// 用于诊断信息的简短描述
    pub fn describe(self) -> &'static str {
        use TokenKind::*;
        match self {
            Import => "'import'",
            As => "'as'",
            Version => "'version'",
            Public => "'public'",
            Private => "'private'",
            External => "'external'",
            Final => "'final'",
            Const => "'const'",
            Function => "'function'",
            Service => "'service'",
            Resource => "'resource'",
            Remote => "'remote'",
            Listener => "'listener'",
            Annotation => "'annotation'",
            Type => "'type'",
            Object => "'object'",
            Record => "'record'",
            Abstract => "'abstract'",
            Client => "'client'",
            Worker => "'worker'",
            Xmlns => "'xmlns'",
            Returns => "'returns'",
            On => "'on'",
            Source => "'source'",
            Var => "'var'",
            If => "'if'",
            Else => "'else'",
            Match => "'match'",
            Foreach => "'foreach'",
            While => "'while'",
            In => "'in'",
            Break => "'break'",
            Continue => "'continue'",
            Return => "'return'",
            Fork => "'fork'",
            Join => "'join'",
            Try => "'try'",
            Catch => "'catch'",
            Finally => "'finally'",
            Throw => "'throw'",
            Panic => "'panic'",
            Transaction => "'transaction'",
            With => "'with'",
            Onretry => "'onretry'",
            Committed => "'committed'",
            Aborted => "'aborted'",
            Abort => "'abort'",
            Retry => "'retry'",
            Lock => "'lock'",
            New => "'new'",
            Is => "'is'",
            Typeof => "'typeof'",
            Check => "'check'",
            Checkpanic => "'checkpanic'",
            Trap => "'trap'",
            Start => "'start'",
            Wait => "'wait'",
            Flush => "'flush'",
            Let => "'let'",
            From => "'from'",
            Where => "'where'",
            Select => "'select'",
            Null => "'null'",
            True => "'true'",
            False => "'false'",
            TypeInt => "'int'",
            TypeByte => "'byte'",
            TypeFloat => "'float'",
            TypeDecimal => "'decimal'",
            TypeBoolean => "'boolean'",
            TypeString => "'string'",
            TypeJson => "'json'",
            TypeXml => "'xml'",
            TypeAny => "'any'",
            TypeAnydata => "'anydata'",
            TypeHandle => "'handle'",
            TypeNever => "'never'",
            TypeMap => "'map'",
            TypeFuture => "'future'",
            TypeTypedesc => "'typedesc'",
            TypeStream => "'stream'",
            TypeTable => "'table'",
            TypeError => "'error'",
            Semicolon => "';'",
            Colon => "':'",
            Dot => "'.'",
            Comma => "','",
            LBrace => "'{'",
            RBrace => "'}'",
            LBracePipe => "'{|'",
            RBracePipe => "'|}'",
            LParen => "'('",
            RParen => "')'",
            LBracket => "'['",
            RBracket => "']'",
            Question => "'?'",
            OptionalFieldAccess => "'?.'",
            Elvis => "'?:'",
            At => "'@'",
            Ellipsis => "'...'",
            HalfOpenRange => "'..<'",
            Assign => "'='",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Percent => "'%'",
            Bang => "'!'",
            Tilde => "'~'",
            EqEq => "'=='",
            NotEq => "'!='",
            RefEq => "'==='",
            RefNotEq => "'!=='",
            Lt => "'<'",
            Gt => "'>'",
            LtEq => "'<='",
            GtEq => "'>='",
            And => "'&&'",
            Or => "'||'",
            BitAnd => "'&'",
            Pipe => "'|'",
            Caret => "'^'",
            RArrow => "'->'",
            SyncRArrow => "'->>'",
            LArrow => "'<-'",
            FatArrow => "'=>'",
            PlusAssign => "'+='",
            MinusAssign => "'-='",
            StarAssign => "'*='",
            SlashAssign => "'/='",
            AndAssign => "'&='",
            OrAssign => "'|='",
            XorAssign => "'^='",
            HexInteger | DecimalInteger => "integer literal",
            FloatingPoint => "floating point literal",
            StringLiteral => "string literal",
            Template => "template literal",
            Identifier => "identifier",
            Comment => "comment",
            Error => "invalid token",
            Eof => "end of input",
        }
    }

    /// 内建的简单类型关键字 (不带类型参数)
    pub fn is_simple_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            TypeInt
                | TypeByte
                | TypeFloat
                | TypeDecimal
                | TypeBoolean
                | TypeString
                | TypeJson
                | TypeXml
                | TypeAny
                | TypeAnydata
                | TypeHandle
                | TypeNever
        )
    }

    /// 可带 `<...>` 类型参数的内建类型关键字
    pub fn is_parametrized_type(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            TypeMap | TypeFuture | TypeTypedesc | TypeStream | TypeTable | TypeError
        )
    }

    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            HexInteger | DecimalInteger | FloatingPoint | StringLiteral | True | False | Null
        )
    }

    /// 能开始一个类型描述符的 token
    pub fn starts_type(self) -> bool {
        use TokenKind::*;
        self.is_simple_type()
            || self.is_parametrized_type()
            || self.is_literal()
            || matches!(
                self,
                Identifier
                    | LParen
                    | LBracket
                    | Function
                    | Object
                    | Record
                    | Abstract
                    | Client
                    | Minus
            )
    }

    /// 能开始一个表达式的 token
    pub fn starts_expression(self) -> bool {
        use TokenKind::*;
        self.is_literal()
            || self.is_simple_type()
            || self.is_parametrized_type()
            || matches!(
                self,
                Identifier
                    | Template
                    | LParen
                    | LBracket
                    | LBrace
                    | Plus
                    | Minus
                    | Bang
                    | Tilde
                    | Lt
                    | Typeof
                    | Check
                    | Checkpanic
                    | Trap
                    | Start
                    | Wait
                    | Flush
                    | LArrow
                    | New
                    | Function
                    | Let
                    | From
                    | Service
                    | Object
                    | Record
                    | Abstract
                    | Client
            )
    }

    /// 只能出现在语句开头的关键字 (用作同步点)
    pub fn is_statement_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            If | Match
                | Foreach
                | While
                | Break
                | Continue
                | Return
                | Fork
                | Try
                | Throw
                | Panic
                | Transaction
                | Lock
                | Retry
                | Abort
                | Xmlns
                | Worker
                | Final
                | Var
        )
    }

    /// 可能开始一条语句的 token；用于判断能否虚拟插入缺失的 `;`
    pub fn starts_statement(self) -> bool {
        self.is_statement_keyword()
            || self.is_simple_type()
            || self.is_parametrized_type()
            || matches!(self, TokenKind::Identifier | TokenKind::At)
    }

    /// 模块级定义的起始 token
    pub fn starts_top_level(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Import
                | Public
                | Private
                | Function
                | Service
                | Listener
                | Annotation
                | Type
                | Const
                | Xmlns
                | Final
                | Remote
                | Resource
                | At
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// 带位置信息的 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset..offset)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// 将源码切分为 token 序列，末尾总是 `Eof`
///
/// 无法识别的字符产生 `TokenKind::Error`，交由解析器报告。
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        let kind = result.unwrap_or(TokenKind::Error);
        tokens.push(Token::new(kind, lexer.slice(), lexer.span()));
    }
    tokens.push(Token::eof(source.len()));
    tokens
}
