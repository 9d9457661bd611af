//! Ballast Syntax
//!
//! 语法分析阶段：词法分析 (`lexer`)、语法树 (`ast`) 与带错误恢复的解析器 (`parser`)。

pub mod ast;
pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, Token, TokenKind};
pub use parser::{
    parse, parse_expression, parse_source, parse_source_with, parse_statement, parse_type,
    ParseOptions, ParseResult, RecoveryAction, SyntaxError, SyntaxErrorKind,
    DEFAULT_MAX_NESTING_DEPTH,
};
