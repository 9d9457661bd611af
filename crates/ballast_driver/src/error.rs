//! Driver Errors
//!
//! 驱动层的错误类型，集成统一诊断系统

use ballast_diagnostics::{Diagnostic, DiagnosticSink, Emitter};
use ballast_syntax::SyntaxError;
use thiserror::Error;

/// 检查失败的原因
#[derive(Debug, Error)]
pub enum DriverError {
    /// 语法错误（可能有多个）
    #[error("Syntax errors:\n{}", format_syntax_errors(.0))]
    SyntaxErrors(Vec<SyntaxError>),

    /// IO 错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DriverError {
    /// 转换为诊断列表并收集到 DiagnosticSink
    pub fn collect_to_sink(&self, sink: &mut DiagnosticSink, file_path: Option<&str>) {
        let mut add_diag = |diag: Diagnostic| {
            if let Some(path) = file_path {
                sink.add(diag.with_file(path));
            } else {
                sink.add(diag);
            }
        };

        match self {
            DriverError::SyntaxErrors(errors) => {
                for err in errors {
                    add_diag(err.to_diagnostic());
                }
            }
            DriverError::IoError(err) => {
                add_diag(Diagnostic::error(format!("IO error: {}", err)));
            }
        }
    }

    /// 使用统一诊断系统输出错误
    pub fn emit(&self, file_path: Option<&str>, source: Option<&str>, emitter: &Emitter) {
        let mut sink = DiagnosticSink::new();
        self.collect_to_sink(&mut sink, file_path);

        if let Some(src) = source {
            for diag in sink.diagnostics() {
                emitter.emit_with_source(diag, src);
            }
        } else {
            emitter.emit_all(sink.diagnostics());
        }
    }
}

fn format_syntax_errors(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {} ({}..{})", i + 1, e, e.span.start, e.span.end))
        .collect::<Vec<_>>()
        .join("\n")
}

pub type DriverResult<T> = Result<T, DriverError>;
