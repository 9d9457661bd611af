//! Error Recovery
//!
//! 恐慌模式恢复：报告一次错误后，跳过 token 直到遇到同步集合中的边界。
//! 跳过时跟踪大括号深度，嵌套块内部的边界不算数。

use super::Parser;
use crate::lexer::TokenKind;
use bitflags::bitflags;
use ballast_diagnostics::Span;

bitflags! {
    /// 恢复时可以停下的边界
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SyncSet: u16 {
        /// 消耗 `;` 后停下
        const SEMICOLON     = 1 << 0;
        /// 停在当前块的 `}` 之前
        const CLOSE_BRACE   = 1 << 1;
        /// 停在语句关键字之前
        const STMT_START    = 1 << 2;
        /// 停在模块级定义关键字之前
        const TOP_LEVEL     = 1 << 3;
        const CLOSE_PAREN   = 1 << 4;
        const CLOSE_BRACKET = 1 << 5;
        const COMMA         = 1 << 6;

        /// 块内语句级恢复
        const STATEMENT = Self::SEMICOLON.bits() | Self::CLOSE_BRACE.bits() | Self::STMT_START.bits();
        /// 逗号分隔列表内的恢复
        const LIST_ITEM = Self::COMMA.bits()
            | Self::CLOSE_PAREN.bits()
            | Self::CLOSE_BRACKET.bits()
            | Self::CLOSE_BRACE.bits()
            | Self::SEMICOLON.bits();
    }
}

/// 恢复后停下的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Boundary {
    AfterSemicolon,
    Before(TokenKind),
    EndOfInput,
}

/// 报告错误时采取的恢复动作
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// 视为缺失的 token 已插入，没有跳过输入
    Inserted,
    /// 以占位节点代替，不消耗当前 token
    Placeholder,
    /// 跳过若干 token 后在 `boundary` 处恢复，`resume` 为恢复点的位置
    Skipped {
        count: usize,
        boundary: Boundary,
        resume: Span,
    },
    /// 放弃剩余输入
    Abandoned,
}

impl Parser {
    /// 报告一个错误并跳到同步点
    ///
    /// 除非当前 token 就是 `Eof` 或者封闭当前块的 `}`，至少消耗一个 token。
    pub(crate) fn recover(
        &mut self,
        kind: super::SyntaxErrorKind,
        message: impl Into<String>,
        sync: SyncSet,
    ) {
        let span = self.current_span();
        let (count, boundary) = self.skip_until(sync);
        let resume = self.current_span();
        tracing::debug!(?boundary, skipped = count, "resynchronized");
        self.report(
            kind,
            span,
            message,
            RecoveryAction::Skipped {
                count,
                boundary,
                resume,
            },
        );
    }

    fn skip_until(&mut self, sync: SyncSet) -> (usize, Boundary) {
        let first = self.peek();
        if first == TokenKind::Eof {
            return (0, Boundary::EndOfInput);
        }
        if first == TokenKind::RBrace && sync.contains(SyncSet::CLOSE_BRACE) && self.depth > 0 {
            return (0, Boundary::Before(TokenKind::RBrace));
        }

        let mut depth = 0usize;
        let mut skipped = 0usize;
        loop {
            let kind = self.peek();
            if kind == TokenKind::Eof {
                return (skipped, Boundary::EndOfInput);
            }
            if skipped > 0 && depth == 0 {
                if let Some(boundary) = boundary_before(kind, sync) {
                    return (skipped, boundary);
                }
            }
            match kind {
                TokenKind::LBrace | TokenKind::LBracePipe => depth += 1,
                TokenKind::RBrace | TokenKind::RBracePipe => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.cursor.advance();
            skipped += 1;
            if kind == TokenKind::Semicolon && depth == 0 && sync.contains(SyncSet::SEMICOLON) {
                return (skipped, Boundary::AfterSemicolon);
            }
        }
    }
}

fn boundary_before(kind: TokenKind, sync: SyncSet) -> Option<Boundary> {
    let stop = match kind {
        TokenKind::RBrace => sync.contains(SyncSet::CLOSE_BRACE),
        TokenKind::RParen => sync.contains(SyncSet::CLOSE_PAREN),
        TokenKind::RBracket => sync.contains(SyncSet::CLOSE_BRACKET),
        TokenKind::Comma => sync.contains(SyncSet::COMMA),
        _ => {
            (sync.contains(SyncSet::STMT_START) && kind.is_statement_keyword())
                || (sync.contains(SyncSet::TOP_LEVEL) && kind.starts_top_level())
        }
    };
    stop.then_some(Boundary::Before(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::parser::{ParseOptions, SyntaxErrorKind};

    fn parser(source: &str) -> Parser {
        Parser::new(tokenize(source), ParseOptions::default())
    }

    #[test]
    fn test_skips_to_after_semicolon() {
        let mut p = parser("a b c; d");
        p.recover(SyntaxErrorKind::UnexpectedToken, "bad", SyncSet::STATEMENT);
        assert_eq!(p.cursor.current().lexeme, "d");
        assert!(matches!(
            p.errors[0].recovery,
            RecoveryAction::Skipped {
                count: 4,
                boundary: Boundary::AfterSemicolon,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_braces_are_skipped_whole() {
        let mut p = parser("x { y; } ; z");
        p.recover(SyntaxErrorKind::UnexpectedToken, "bad", SyncSet::STATEMENT);
        assert_eq!(p.cursor.current().lexeme, "z");
    }

    #[test]
    fn test_always_makes_progress() {
        let mut p = parser("if if");
        p.recover(SyntaxErrorKind::UnexpectedToken, "bad", SyncSet::STATEMENT);
        // 第一个 `if` 被跳过，停在第二个之前
        assert_eq!(p.cursor.position(), 1);
    }

    #[test]
    fn test_stops_at_eof() {
        let mut p = parser("a b");
        p.recover(SyntaxErrorKind::UnexpectedToken, "bad", SyncSet::SEMICOLON);
        assert!(p.cursor.at_end());
        assert!(matches!(
            p.errors[0].recovery,
            RecoveryAction::Skipped {
                boundary: Boundary::EndOfInput,
                ..
            }
        ));
    }

    #[test]
    fn test_top_level_brace_is_consumed() {
        let mut p = parser("} function");
        p.recover(SyntaxErrorKind::UnexpectedToken, "bad", SyncSet::TOP_LEVEL);
        assert_eq!(p.peek(), TokenKind::Function);
    }
}
