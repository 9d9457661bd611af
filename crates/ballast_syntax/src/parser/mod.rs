//! Parser
//!
//! 手写的递归下降解析器：token 序列 -> 语法树 + 语法错误列表。
//!
//! - 表达式使用优先级爬升 (`expr/binary.rs`)
//! - 需要回溯的地方 (解构赋值、以类型开头的声明) 使用 checkpoint/rewind
//! - 出错后进入恢复模式：在下一次成功匹配 token 之前不再报告新的错误

pub mod cursor;
mod decl;
pub mod error;
mod expr;
mod helpers;
mod pattern;
pub mod recovery;
mod stmt;
mod types;

pub use cursor::{Mark, TokenCursor};
pub use error::{SyntaxError, SyntaxErrorKind};
pub use expr::{op_info, Assoc, OpInfo, PRECEDENCE_TABLE};
pub use recovery::{Boundary, RecoveryAction, SyncSet};

use crate::ast::{CompilationUnit, Expr, Ident, Stmt, TypeDesc};
use crate::lexer::{tokenize, Token, TokenKind};
use ballast_diagnostics::{Diagnostic, Span};

/// 默认的最大嵌套深度
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// 解析选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// 表达式、类型、模式与块的最大嵌套深度
    pub max_nesting_depth: usize,
    /// 为 false 时遇到第一个错误即停止
    pub recover: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            recover: true,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn fail_fast(mut self) -> Self {
        self.recover = false;
        self
    }
}

/// 解析结果：总有一棵树 (可能含占位节点)，以及按出现顺序排列的错误
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<T> {
    pub tree: T,
    pub errors: Vec<SyntaxError>,
}

impl<T> ParseResult<T> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors.iter().map(SyntaxError::to_diagnostic).collect()
    }
}

/// 解析器状态
///
/// 持有游标、错误列表、恢复模式标志和当前嵌套深度。
pub struct Parser {
    pub(crate) cursor: TokenCursor,
    errors: Vec<SyntaxError>,
    // 单调递增，包括被抑制的错误
    error_events: usize,
    // 除 MalformedConstruct 外的错误次数，用于判断试探解析是否失败
    structural_failures: usize,
    recovering: bool,
    speculating: usize,
    depth: usize,
    aborted: bool,
    eof_reported: bool,
    placeholder_end: usize,
    options: ParseOptions,
}

/// 试探解析前保存的状态
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint {
    mark: Mark,
    errors: usize,
    structural_failures: usize,
    recovering: bool,
    eof_reported: bool,
    placeholder_end: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, options: ParseOptions) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            errors: Vec::new(),
            error_events: 0,
            structural_failures: 0,
            recovering: false,
            speculating: 0,
            depth: 0,
            aborted: false,
            eof_reported: false,
            placeholder_end: 0,
            options,
        }
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }

    /// 遇到过的错误总数 (包括恢复模式中被抑制的)
    pub fn error_count(&self) -> usize {
        self.error_events
    }

    // ---------------------------------------------------------------
    // token 访问
    // ---------------------------------------------------------------

    pub(crate) fn peek(&self) -> TokenKind {
        self.cursor.peek_kind(0)
    }

    pub(crate) fn nth(&self, k: usize) -> TokenKind {
        self.cursor.peek_kind(k)
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    pub(crate) fn glued(&self, k: usize) -> bool {
        self.cursor.is_glued(k)
    }

    /// 当前 token 是否为指定的上下文关键字 (词法上是标识符)
    pub(crate) fn at_contextual(&self, word: &str) -> bool {
        let token = self.cursor.current();
        token.kind == TokenKind::Identifier && token.lexeme == word
    }

    pub(crate) fn current_span(&self) -> Span {
        self.cursor.span_of(0)
    }

    pub(crate) fn start(&self) -> usize {
        self.cursor.current().span.start
    }

    /// 从 `start` 到最近消耗的 token (或其中的占位节点) 的范围
    pub(crate) fn span_from(&self, start: usize) -> Span {
        let mut end = self.cursor.prev_end().max(start);
        if self.placeholder_end >= start {
            end = end.max(self.placeholder_end);
        }
        start..end
    }

    /// 当前位置的零宽范围，用于占位节点
    pub(crate) fn placeholder_span(&mut self) -> Span {
        let at = self.start();
        self.placeholder_end = self.placeholder_end.max(at);
        at..at
    }

    /// 消耗当前 token；成功匹配会退出恢复模式
    pub(crate) fn bump(&mut self) -> Token {
        self.recovering = false;
        self.cursor.advance()
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// 期望一个 token；缺失时报告并视为已插入，不消耗输入
    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let found = self.peek();
        let span = self.current_span();
        self.report(
            SyntaxErrorKind::MissingToken,
            span,
            format!("expected {}, found {}", kind, found),
            RecoveryAction::Inserted,
        );
        false
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> Ident {
        if self.at(TokenKind::Identifier) {
            let token = self.bump();
            return Ident::new(token.lexeme, token.span);
        }
        let found = self.peek();
        let span = self.current_span();
        self.report(
            SyntaxErrorKind::MissingToken,
            span,
            format!("expected {}, found {}", what, found),
            RecoveryAction::Placeholder,
        );
        Ident::missing(self.placeholder_span())
    }

    /// 语句结尾的 `;`
    ///
    /// 下一个 token 能开始新语句 (或是 `}` / 输入结束) 时视为插入了 `;`，
    /// 否则报告意外 token 并恢复到语句边界。
    pub(crate) fn expect_semicolon(&mut self) {
        if self.eat(TokenKind::Semicolon) {
            return;
        }
        let found = self.peek();
        if found.starts_statement()
            || found.starts_top_level()
            || matches!(found, TokenKind::RBrace | TokenKind::Eof)
        {
            let at = self.cursor.prev_end();
            self.report(
                SyntaxErrorKind::MissingToken,
                at..at,
                "expected ';'",
                RecoveryAction::Inserted,
            );
        } else {
            self.recover(
                SyntaxErrorKind::UnexpectedToken,
                format!("expected ';', found {}", found),
                SyncSet::STATEMENT,
            );
        }
    }

    // ---------------------------------------------------------------
    // 错误报告
    // ---------------------------------------------------------------

    pub(crate) fn report(
        &mut self,
        kind: SyntaxErrorKind,
        span: Span,
        message: impl Into<String>,
        recovery: RecoveryAction,
    ) {
        self.error_events += 1;
        if kind != SyntaxErrorKind::MalformedConstruct {
            self.structural_failures += 1;
        }
        if self.aborted {
            return;
        }
        let message = message.into();
        if self.recovering && !kind.is_fatal() {
            tracing::trace!(code = kind.code(), %message, "suppressed while recovering");
            return;
        }
        tracing::debug!(code = kind.code(), ?span, %message, "syntax error");
        self.errors.push(SyntaxError {
            kind,
            span,
            message,
            recovery,
        });
        self.recovering = true;
        if !self.options.recover && self.speculating == 0 {
            self.abandon();
        }
    }

    /// 当前 token 无法开始期望的结构：报告并返回占位范围，不消耗 token
    pub(crate) fn report_no_viable(&mut self, expected: &str) -> Span {
        let found = self.peek();
        let span = self.current_span();
        self.report(
            SyntaxErrorKind::NoViableAlternative,
            span,
            format!("expected {}, found {}", expected, found),
            RecoveryAction::Placeholder,
        );
        self.placeholder_span()
    }

    /// 块在输入结束前没有闭合；整个解析只报告一次
    pub(crate) fn report_unterminated(&mut self, open: Span) {
        if self.eof_reported {
            return;
        }
        self.eof_reported = true;
        self.report(
            SyntaxErrorKind::UnterminatedBlock,
            open,
            "unterminated block: expected '}' before the end of input",
            RecoveryAction::Abandoned,
        );
    }

    fn abandon(&mut self) {
        self.aborted = true;
        self.cursor.skip_to_end();
    }

    // ---------------------------------------------------------------
    // 试探解析
    // ---------------------------------------------------------------

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            mark: self.cursor.mark(),
            errors: self.errors.len(),
            structural_failures: self.structural_failures,
            recovering: self.recovering,
            eof_reported: self.eof_reported,
            placeholder_end: self.placeholder_end,
        }
    }

    pub(crate) fn rewind(&mut self, checkpoint: Checkpoint) {
        self.cursor.rewind(checkpoint.mark);
        self.errors.truncate(checkpoint.errors);
        // 被回退分支里的失败和占位节点都不再存在
        self.structural_failures = checkpoint.structural_failures;
        self.recovering = checkpoint.recovering;
        self.eof_reported = checkpoint.eof_reported;
        self.placeholder_end = checkpoint.placeholder_end;
    }

    /// 试探解析：`f` 返回 None 或产生了结构性错误时回退，不留下任何诊断
    pub(crate) fn speculate<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let checkpoint = self.checkpoint();
        let failures = checkpoint.structural_failures;
        self.speculating += 1;
        let result = f(self);
        self.speculating -= 1;
        if self.aborted {
            // 超出嵌套深度时保留唯一的致命错误，不再回退
            return None;
        }
        match result {
            Some(value) if self.structural_failures == failures => Some(value),
            _ => {
                tracing::trace!(to = ?checkpoint.mark, "speculation rewound");
                self.rewind(checkpoint);
                None
            }
        }
    }

    // ---------------------------------------------------------------
    // 嵌套深度
    // ---------------------------------------------------------------

    /// 进入一层嵌套；超过上限时报告一次致命错误并放弃剩余输入
    pub(crate) fn enter(&mut self) -> bool {
        if self.aborted {
            return false;
        }
        if self.depth >= self.options.max_nesting_depth {
            let span = self.current_span();
            let limit = self.options.max_nesting_depth;
            self.report(
                SyntaxErrorKind::NestingTooDeep,
                span,
                format!("nesting exceeds the maximum depth of {}", limit),
                RecoveryAction::Abandoned,
            );
            tracing::warn!(limit, "nesting limit reached, abandoning parse");
            self.abandon();
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// 要求输入已经结束；用于单独解析表达式、类型或语句
    fn expect_end(&mut self) {
        if self.at(TokenKind::Eof) {
            return;
        }
        let found = self.peek();
        self.recover(
            SyntaxErrorKind::UnexpectedToken,
            format!("unexpected {} after the end of the input", found),
            SyncSet::empty(),
        );
    }

    fn finish<T>(self, tree: T) -> ParseResult<T> {
        ParseResult {
            tree,
            errors: self.errors,
        }
    }
}

/// 解析一个完整的编译单元
pub fn parse(tokens: Vec<Token>, options: ParseOptions) -> ParseResult<CompilationUnit> {
    let _span = tracing::debug_span!("parse", tokens = tokens.len()).entered();
    let mut parser = Parser::new(tokens, options);
    let unit = parser.parse_compilation_unit();
    tracing::debug!(errors = parser.errors.len(), "parse finished");
    parser.finish(unit)
}

/// 词法分析并解析源码
pub fn parse_source(source: &str) -> ParseResult<CompilationUnit> {
    parse(tokenize(source), ParseOptions::default())
}

pub fn parse_source_with(source: &str, options: ParseOptions) -> ParseResult<CompilationUnit> {
    parse(tokenize(source), options)
}

/// 单独解析一个表达式
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    let mut parser = Parser::new(tokenize(source), ParseOptions::default());
    let expr = parser.parse_expr();
    parser.expect_end();
    parser.finish(expr)
}

/// 单独解析一个类型描述符
pub fn parse_type(source: &str) -> ParseResult<TypeDesc> {
    let mut parser = Parser::new(tokenize(source), ParseOptions::default());
    let ty = parser.parse_type(types::TypeContext::Declaration);
    parser.expect_end();
    parser.finish(ty)
}

/// 单独解析一条语句
pub fn parse_statement(source: &str) -> ParseResult<Stmt> {
    let mut parser = Parser::new(tokenize(source), ParseOptions::default());
    let stmt = parser.parse_statement();
    parser.expect_end();
    parser.finish(stmt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser(source: &str) -> Parser {
        Parser::new(tokenize(source), ParseOptions::default())
    }

    #[test]
    fn test_recovery_mode_suppresses_until_match() {
        let mut p = parser("a b c");
        p.expect(TokenKind::Semicolon);
        p.expect(TokenKind::Comma);
        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.error_count(), 2);

        p.bump();
        p.expect(TokenKind::Comma);
        assert_eq!(p.errors().len(), 2);
    }

    #[test]
    fn test_speculation_failure_leaves_no_trace() {
        let mut p = parser("a b");
        let result: Option<()> = p.speculate(|p| {
            p.bump();
            p.expect(TokenKind::Semicolon);
            Some(())
        });
        assert!(result.is_none());
        assert!(p.errors().is_empty());
        assert_eq!(p.cursor.position(), 0);
    }

    #[test]
    fn test_speculation_success_commits() {
        let mut p = parser("a b");
        let result = p.speculate(|p| p.eat(TokenKind::Identifier).then_some(1));
        assert_eq!(result, Some(1));
        assert_eq!(p.cursor.position(), 1);
    }

    #[test]
    fn test_rewound_inner_failure_does_not_fail_outer() {
        let mut p = parser("a b");
        let result = p.speculate(|p| {
            let inner: Option<()> = p.speculate(|p| {
                p.expect(TokenKind::Semicolon);
                Some(())
            });
            assert!(inner.is_none());
            p.eat(TokenKind::Identifier).then_some(1)
        });
        assert_eq!(result, Some(1));
        assert!(p.errors().is_empty());
        assert_eq!(p.error_count(), 1);
    }

    #[test]
    fn test_rewound_placeholder_does_not_stretch_spans() {
        let mut p = parser("a b c");
        let start = p.start();
        let result: Option<()> = p.speculate(|p| {
            p.bump();
            p.bump();
            p.placeholder_span();
            None
        });
        assert!(result.is_none());
        p.bump();
        assert_eq!(p.span_from(start), 0..1);
    }

    #[test]
    fn test_depth_limit_reports_once() {
        let options = ParseOptions::default().with_max_depth(2);
        let mut p = Parser::new(tokenize("a"), options);
        assert!(p.enter());
        assert!(p.enter());
        assert!(!p.enter());
        assert!(!p.enter());
        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.errors()[0].kind, SyntaxErrorKind::NestingTooDeep);
        assert!(p.cursor.at_end());
    }

    #[test]
    fn test_fail_fast_stops_after_first_error() {
        let options = ParseOptions::default().fail_fast();
        let result = parse(
            tokenize("function f() { int a = 1 int b = 2 }"),
            options,
        );
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_missing_semicolon_is_inserted() {
        let mut p = parser("x }");
        p.bump();
        p.expect_semicolon();
        assert_eq!(p.errors().len(), 1);
        assert_eq!(p.errors()[0].recovery, RecoveryAction::Inserted);
        assert_eq!(p.errors()[0].span, 1..1);
        assert!(p.at(TokenKind::RBrace));
    }
}
