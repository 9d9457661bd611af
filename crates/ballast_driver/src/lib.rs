//! Ballast Driver
//!
//! 驱动模块：读取源文件，运行语法分析，把语法错误转换为统一诊断。

pub mod error;
pub mod summary;

pub use error::{DriverError, DriverResult};
pub use summary::TreeSummary;

use ballast_diagnostics::{Diagnostic, DiagnosticSink, Emitter};
use ballast_syntax::ast::CompilationUnit;
use ballast_syntax::{parse_source_with, ParseOptions, SyntaxError};
use std::path::Path;

/// 一次检查的结果
///
/// 即使有语法错误也会给出完整的语法树，错误位置上是占位节点。
#[derive(Debug)]
pub struct CheckOutput {
    pub unit: CompilationUnit,
    pub errors: Vec<SyntaxError>,
    pub summary: TreeSummary,
    /// 来源文件，用于诊断定位
    pub file: Option<String>,
}

impl CheckOutput {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// 转换为统一诊断格式
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.errors
            .iter()
            .map(|err| {
                let diag = err.to_diagnostic();
                match &self.file {
                    Some(file) => diag.with_file(file.clone()),
                    None => diag,
                }
            })
            .collect()
    }

    pub fn sink(&self) -> DiagnosticSink {
        let mut sink = DiagnosticSink::new();
        sink.extend(self.diagnostics());
        sink
    }

    /// 带源码片段输出所有诊断
    pub fn emit(&self, source: &str, emitter: &Emitter) {
        for diag in self.sink().diagnostics() {
            emitter.emit_with_source(diag, source);
        }
    }

    /// 有错误时转换为 [`DriverError`]
    pub fn into_result(self) -> DriverResult<CompilationUnit> {
        if self.errors.is_empty() {
            Ok(self.unit)
        } else {
            Err(DriverError::SyntaxErrors(self.errors))
        }
    }
}

/// 检查一段源码
///
/// # Example
/// ```
/// use ballast_driver::check_source;
/// use ballast_syntax::ParseOptions;
///
/// let output = check_source("function main() { int x = 1; }", ParseOptions::default());
/// assert!(output.is_clean());
/// assert_eq!(output.summary.statements, 1);
/// ```
pub fn check_source(source: &str, options: ParseOptions) -> CheckOutput {
    let result = parse_source_with(source, options);
    let summary = TreeSummary::of(&result.tree);
    tracing::debug!(errors = result.errors.len(), %summary, "checked source");
    CheckOutput {
        unit: result.tree,
        errors: result.errors,
        summary,
        file: None,
    }
}

/// 从文件检查，返回结果和读入的源码
pub fn check_file(
    path: impl AsRef<Path>,
    options: ParseOptions,
) -> DriverResult<(CheckOutput, String)> {
    let path = path.as_ref();
    let _span = tracing::info_span!("check_file", path = %path.display()).entered();
    let source = std::fs::read_to_string(path)?;
    let mut output = check_source(&source, options);
    output.file = Some(path.display().to_string());
    Ok((output, source))
}
