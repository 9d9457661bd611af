//! DiagnosticLevel - 诊断级别
//!
//! 定义致命错误、错误、警告、注释等不同级别的诊断

use ariadne::ReportKind;
use colored::*;
use std::fmt;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticLevel {
    /// 致命错误 - 后续分析不再可信 (例如嵌套深度超限)
    Fatal,
    /// 错误 - 阻止编译
    Error,
    /// 警告 - 不阻止编译但应注意
    Warning,
    /// 注释 - 补充说明
    Note,
}

impl DiagnosticLevel {
    /// 获取级别名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fatal => "fatal",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }

    /// 获取带颜色的级别名称
    pub fn colored_name(&self) -> ColoredString {
        match self {
            Self::Fatal => self.name().magenta().bold(),
            Self::Error => self.name().red().bold(),
            Self::Warning => self.name().yellow().bold(),
            Self::Note => self.name().bright_black().bold(),
        }
    }

    /// 对应的 ariadne 报告类型
    pub fn report_kind(&self) -> ReportKind<'static> {
        match self {
            Self::Fatal | Self::Error => ReportKind::Error,
            Self::Warning => ReportKind::Warning,
            Self::Note => ReportKind::Advice,
        }
    }

    /// 是否为错误 (含致命错误)
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Fatal | Self::Error)
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
