//! Diagnostic - 诊断信息
//!
//! 表示一个编译器诊断（错误、警告等），附带可选的错误码、文件名、注释和建议

use crate::level::DiagnosticLevel;
use crate::span::Span;

/// 修复建议
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// 建议消息
    pub message: String,
    /// 建议的替换内容（如果有）
    pub replacement: Option<String>,
}

impl Suggestion {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            replacement: None,
        }
    }

    pub fn with_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.replacement = Some(replacement.into());
        self
    }
}

/// 诊断信息
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 稳定的错误码，例如 `S0002`
    pub code: Option<&'static str>,
    /// 主要消息
    pub message: String,
    /// 源码位置（可选）
    pub span: Option<Span>,
    /// 所属文件（可选）
    pub file: Option<String>,
    /// 补充注释
    pub notes: Vec<String>,
    /// 修复建议
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            code: None,
            message: message.into(),
            span: None,
            file: None,
            notes: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Fatal, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, message)
    }

    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Note, message)
    }

    /// 设置位置信息
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// 设置错误码
    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    /// 设置文件名
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    /// 添加简单建议（仅消息）
    pub fn suggest(self, message: impl Into<String>) -> Self {
        self.with_suggestion(Suggestion::new(message))
    }

    /// 标题行，例如 `error[S0002]: expected ';'`
    pub fn headline(&self) -> String {
        match self.code {
            Some(code) => format!("{}[{}]: {}", self.level, code, self.message),
            None => format!("{}: {}", self.level, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::error("missing ';'")
            .span(0..10)
            .with_code("S0002")
            .with_file("main.bal")
            .with_note("inserted before 'int'")
            .suggest("add ';' at the end of the statement");

        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert_eq!(diag.span, Some(0..10));
        assert_eq!(diag.file.as_deref(), Some("main.bal"));
        assert_eq!(diag.notes, vec!["inserted before 'int'".to_string()]);
        assert_eq!(diag.suggestions.len(), 1);
    }

    #[test]
    fn test_headline() {
        let plain = Diagnostic::warning("unused");
        assert_eq!(plain.headline(), "warning: unused");

        let coded = Diagnostic::fatal("too deep").with_code("S0005");
        assert_eq!(coded.headline(), "fatal[S0005]: too deep");
    }
}
