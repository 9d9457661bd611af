//! Syntax Errors
//!
//! 语法错误类型，可转换为统一诊断

use super::recovery::RecoveryAction;
use ballast_diagnostics::{Diagnostic, Span, Suggestion};
use thiserror::Error;

/// 语法错误的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxErrorKind {
    /// 出现了不该出现的 token
    UnexpectedToken,
    /// 缺少期望的 token
    MissingToken,
    /// 当前 token 不能开始任何候选结构
    NoViableAlternative,
    /// 结构完整但形式非法，例如多个 rest 元素
    MalformedConstruct,
    /// 块在输入结束前没有闭合
    UnterminatedBlock,
    /// 嵌套超过上限
    NestingTooDeep,
}

impl SyntaxErrorKind {
    /// 稳定的错误码
    pub fn code(self) -> &'static str {
        match self {
            SyntaxErrorKind::UnexpectedToken => "S0001",
            SyntaxErrorKind::MissingToken => "S0002",
            SyntaxErrorKind::NoViableAlternative => "S0003",
            SyntaxErrorKind::MalformedConstruct => "S0004",
            SyntaxErrorKind::UnterminatedBlock => "S0005",
            SyntaxErrorKind::NestingTooDeep => "S0006",
        }
    }

    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            SyntaxErrorKind::UnterminatedBlock | SyntaxErrorKind::NestingTooDeep
        )
    }
}

/// 一条语法错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
    pub message: String,
    pub recovery: RecoveryAction,
}

impl SyntaxError {
    /// 转换为统一诊断格式
    pub fn to_diagnostic(&self) -> Diagnostic {
        let base = if self.kind.is_fatal() {
            Diagnostic::fatal(self.message.clone())
        } else {
            Diagnostic::error(self.message.clone())
        };
        let diag = base.with_code(self.kind.code()).span(self.span.clone());

        match (&self.kind, &self.recovery) {
            (SyntaxErrorKind::MissingToken, RecoveryAction::Inserted)
                if self.message == "expected ';'" =>
            {
                diag.with_suggestion(Suggestion::new("add a semicolon").with_replacement(";"))
            }
            (SyntaxErrorKind::MissingToken, RecoveryAction::Inserted) => {
                diag.with_note("parsing continued as if it were present")
            }
            (SyntaxErrorKind::UnterminatedBlock, _) => {
                diag.suggest("add the missing '}' before the end of the file")
            }
            (SyntaxErrorKind::NestingTooDeep, _) => {
                diag.with_note("the rest of the input was not parsed")
            }
            (_, RecoveryAction::Skipped { count, .. }) if *count > 0 => diag.with_note(format!(
                "skipped {} token{} to recover",
                count,
                if *count == 1 { "" } else { "s" }
            )),
            _ => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::recovery::Boundary;
    use ballast_diagnostics::DiagnosticLevel;

    #[test]
    fn test_error_display() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::MissingToken,
            span: 3..3,
            message: "expected ';'".to_string(),
            recovery: RecoveryAction::Inserted,
        };
        assert_eq!(err.to_string(), "expected ';'");
        let diag = err.to_diagnostic();
        assert_eq!(diag.suggestions[0].replacement.as_deref(), Some(";"));
    }

    #[test]
    fn test_to_diagnostic_carries_code_and_span() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::UnexpectedToken,
            span: 4..5,
            message: "unexpected ')'".to_string(),
            recovery: RecoveryAction::Skipped {
                count: 2,
                boundary: Boundary::AfterSemicolon,
                resume: 8..9,
            },
        };
        let diag = err.to_diagnostic();
        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert_eq!(diag.code, Some("S0001"));
        assert_eq!(diag.span, Some(4..5));
        assert_eq!(diag.notes, vec!["skipped 2 tokens to recover".to_string()]);
    }

    #[test]
    fn test_fatal_kinds() {
        let err = SyntaxError {
            kind: SyntaxErrorKind::NestingTooDeep,
            span: 0..1,
            message: "too deep".to_string(),
            recovery: RecoveryAction::Abandoned,
        };
        assert_eq!(err.to_diagnostic().level, DiagnosticLevel::Fatal);
        assert!(!SyntaxErrorKind::MalformedConstruct.is_fatal());
    }
}
