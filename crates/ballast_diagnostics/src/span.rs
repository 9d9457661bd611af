//! Span - 源码位置信息
//!
//! 表示源代码中的字节范围，以及从字节偏移到行列号的换算

/// 源码位置范围 (字节偏移)
pub type Span = std::ops::Range<usize>;

/// Span 辅助函数
pub trait SpanExt {
    /// 创建一个新的 Span
    fn new(start: usize, end: usize) -> Self;

    /// 长度
    fn len(&self) -> usize;

    /// 是否为空
    fn is_empty(&self) -> bool;

    /// 覆盖两个 Span 的最小范围
    fn merge(&self, other: &Self) -> Self;

    /// `other` 是否完全落在当前范围内
    fn covers(&self, other: &Self) -> bool;
}

impl SpanExt for Span {
    fn new(start: usize, end: usize) -> Self {
        start..end
    }

    fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    fn merge(&self, other: &Self) -> Self {
        self.start.min(other.start)..self.end.max(other.end)
    }

    fn covers(&self, other: &Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// 1-based 行列号
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCol {
    pub line: usize,
    pub column: usize,
}

/// 行首偏移索引，用于把字节偏移换算成行列号
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i + 1),
        );
        Self { line_starts }
    }

    pub fn line_col(&self, offset: usize) -> LineCol {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        LineCol {
            line: line + 1,
            column: offset - self.line_starts[line] + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_creation() {
        let span = Span::new(10, 20);
        assert_eq!(SpanExt::len(&span), 10);
        assert!(!SpanExt::is_empty(&span));
    }

    #[test]
    fn test_empty_span() {
        let span = Span::new(5, 5);
        assert!(SpanExt::is_empty(&span));
        assert_eq!(SpanExt::len(&span), 0);
    }

    #[test]
    fn test_merge_and_covers() {
        let a = Span::new(2, 6);
        let b = Span::new(4, 10);
        let merged = a.merge(&b);
        assert_eq!(merged, 2..10);
        assert!(merged.covers(&a));
        assert!(merged.covers(&b));
        assert!(!a.covers(&b));
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n\nx");
        assert_eq!(index.line_col(0), LineCol { line: 1, column: 1 });
        assert_eq!(index.line_col(4), LineCol { line: 2, column: 2 });
        assert_eq!(index.line_col(6), LineCol { line: 3, column: 1 });
        assert_eq!(index.line_col(7), LineCol { line: 4, column: 1 });
    }
}
