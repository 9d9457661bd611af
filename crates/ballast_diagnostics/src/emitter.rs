//! Emitter - 诊断输出器
//!
//! 负责将诊断信息格式化输出：无源码时输出紧凑文本，有源码时交给 ariadne 绘制代码片段

use crate::diagnostic::Diagnostic;
use crate::span::{LineIndex, Span};
use ariadne::{Color, Config, Label, Report, Source};
use colored::*;
use std::fmt::Write as _;

/// 诊断输出器
pub struct Emitter {
    /// 是否使用颜色
    use_colors: bool,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// 创建无颜色的输出器
    pub fn without_colors() -> Self {
        Self { use_colors: false }
    }

    /// 输出单个诊断到 stderr
    pub fn emit(&self, diagnostic: &Diagnostic) {
        eprint!("{}", self.render(diagnostic, None));
    }

    /// 输出所有诊断
    pub fn emit_all(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
            eprintln!();
        }
    }

    /// 带源码片段输出
    pub fn emit_with_source(&self, diagnostic: &Diagnostic, source: &str) {
        eprint!("{}", self.render(diagnostic, Some(source)));
    }

    /// 渲染为字符串
    pub fn render(&self, diagnostic: &Diagnostic, source: Option<&str>) -> String {
        match (source, &diagnostic.span) {
            (Some(src), Some(span)) => self.render_snippet(diagnostic, src, span.clone()),
            _ => self.render_compact(diagnostic, source),
        }
    }

    fn render_compact(&self, diagnostic: &Diagnostic, source: Option<&str>) -> String {
        let mut out = String::new();
        let headline = diagnostic.headline();
        if self.use_colors {
            let rest = headline
                .strip_prefix(diagnostic.level.name())
                .unwrap_or(&headline);
            let _ = writeln!(out, "{}{}", diagnostic.level.colored_name(), rest.bold());
        } else {
            let _ = writeln!(out, "{}", headline);
        }

        // 位置信息（如果有）
        if let Some(span) = &diagnostic.span {
            let location = location_string(diagnostic.file.as_deref(), source, span);
            if self.use_colors {
                let _ = writeln!(out, "  {} {}", "-->".blue().bold(), location);
            } else {
                let _ = writeln!(out, "  --> {}", location);
            }
        }

        for note in &diagnostic.notes {
            if self.use_colors {
                let _ = writeln!(
                    out,
                    "  {} {}",
                    "=".blue().bold(),
                    format!("note: {}", note).bright_black()
                );
            } else {
                let _ = writeln!(out, "  = note: {}", note);
            }
        }

        for suggestion in &diagnostic.suggestions {
            if self.use_colors {
                let _ = writeln!(
                    out,
                    "  {} {}",
                    "=".green().bold(),
                    format!("help: {}", suggestion.message).green()
                );
            } else {
                let _ = writeln!(out, "  = help: {}", suggestion.message);
            }
            if let Some(replacement) = &suggestion.replacement {
                let _ = writeln!(out, "        try: {}", replacement);
            }
        }
        out
    }

    fn render_snippet(&self, diagnostic: &Diagnostic, source: &str, span: Span) -> String {
        let mut builder = Report::<'_, Span>::build(diagnostic.level.report_kind(), (), span.start)
            .with_config(Config::default().with_color(self.use_colors))
            .with_message(&diagnostic.message)
            .with_label(
                Label::new(span)
                    .with_message(diagnostic.level.name())
                    .with_color(Color::Red),
            );
        if let Some(code) = diagnostic.code {
            builder = builder.with_code(code);
        }
        if !diagnostic.notes.is_empty() {
            builder = builder.with_note(diagnostic.notes.join("; "));
        }
        if let Some(first) = diagnostic.suggestions.first() {
            builder = builder.with_help(&first.message);
        }

        let mut buf = Vec::new();
        if builder.finish().write(Source::from(source), &mut buf).is_err() {
            return self.render_compact(diagnostic, Some(source));
        }
        String::from_utf8_lossy(&buf).into_owned()
    }
}

fn location_string(file: Option<&str>, source: Option<&str>, span: &Span) -> String {
    let position = match source {
        Some(src) => {
            let lc = LineIndex::new(src).line_col(span.start);
            format!("{}:{}", lc.line, lc.column)
        }
        None => format!("{}..{}", span.start, span.end),
    };
    match file {
        Some(file) => format!("{}:{}", file, position),
        None => position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emitter_creation() {
        assert!(Emitter::new().use_colors);
        assert!(!Emitter::without_colors().use_colors);
    }

    #[test]
    fn test_render_compact_plain() {
        let emitter = Emitter::without_colors();
        let diag = Diagnostic::error("expected ';'")
            .with_code("S0002")
            .span(10..11)
            .with_note("inserted before 'int'")
            .suggest("add ';'");

        let text = emitter.render(&diag, None);
        assert!(text.starts_with("error[S0002]: expected ';'"));
        assert!(text.contains("--> 10..11"));
        assert!(text.contains("= note: inserted before 'int'"));
        assert!(text.contains("= help: add ';'"));
    }

    #[test]
    fn test_location_uses_line_and_column() {
        let location = location_string(Some("a.bal"), Some("x\ny z"), &(4..5));
        assert_eq!(location, "a.bal:2:3");
    }

    #[test]
    fn test_render_with_source_mentions_message() {
        let emitter = Emitter::without_colors();
        let source = "int x = 5\nint y = 6;";
        let diag = Diagnostic::error("expected ';'").span(9..10);
        let text = emitter.render(&diag, Some(source));
        assert!(text.contains("expected ';'"));
    }
}
