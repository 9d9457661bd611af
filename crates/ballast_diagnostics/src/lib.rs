//! Ballast Diagnostics
//!
//! 统一的诊断系统，为 ballast 语法分析器及其驱动提供清晰的错误报告。
//!
//! # 核心类型
//!
//! - [`Diagnostic`] - 诊断信息主体
//! - [`DiagnosticLevel`] - 诊断级别（Fatal/Error/Warning/Note）
//! - [`DiagnosticSink`] - 诊断收集器
//! - [`Emitter`] - 诊断输出器
//! - [`Span`] / [`LineIndex`] - 源码位置信息
//!
//! # 示例
//!
//! ```rust
//! use ballast_diagnostics::{Diagnostic, DiagnosticSink, Emitter};
//!
//! let mut sink = DiagnosticSink::new();
//! sink.add(
//!     Diagnostic::error("expected ';'")
//!         .with_code("S0002")
//!         .span(10..11)
//!         .suggest("add ';' at the end of the previous statement"),
//! );
//!
//! if sink.has_errors() {
//!     let emitter = Emitter::without_colors();
//!     emitter.emit_all(sink.diagnostics());
//! }
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod level;
pub mod sink;
pub mod span;

pub use diagnostic::{Diagnostic, Suggestion};
pub use emitter::Emitter;
pub use level::DiagnosticLevel;
pub use sink::DiagnosticSink;
pub use span::{LineCol, LineIndex, Span, SpanExt};
