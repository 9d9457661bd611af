//! Token Cursor
//!
//! 只读 token 序列上的游标：任意前瞻、标记与回退。
//! 序列末尾总有一个 `Eof`，越界的前瞻都返回它。

use crate::lexer::{Token, TokenKind};
use ballast_diagnostics::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenCursor {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.span.end);
            tokens.push(Token::eof(end));
        }
        Self { tokens, pos: 0 }
    }

    /// 第 k 个前瞻 token，k = 0 为当前 token
    pub fn peek(&self, k: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + k).min(last)]
    }

    pub fn peek_kind(&self, k: usize) -> TokenKind {
        self.peek(k).kind
    }

    pub fn current(&self) -> &Token {
        self.peek(0)
    }

    /// 消耗当前 token；停在 `Eof` 上不再前进
    pub fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    /// 回到之前的标记；标记只能来自当前位置或之前
    pub fn rewind(&mut self, mark: Mark) {
        debug_assert!(mark.0 <= self.pos, "rewind target is ahead of the cursor");
        self.pos = mark.0;
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    /// 直接跳到 `Eof`
    pub fn skip_to_end(&mut self) {
        self.pos = self.tokens.len() - 1;
    }

    /// 最近一个已消耗 token 的结束偏移；尚未消耗时为当前 token 的起点
    pub fn prev_end(&self) -> usize {
        match self.pos.checked_sub(1) {
            Some(i) => self.tokens[i].span.end,
            None => self.current().span.start,
        }
    }

    /// 第 k 个前瞻 token 是否与它前一个 token 紧贴 (中间没有空白或注释)
    pub fn is_glued(&self, k: usize) -> bool {
        let index = self.pos + k;
        if index == 0 || index >= self.tokens.len() {
            return false;
        }
        let prev = &self.tokens[index - 1];
        let token = &self.tokens[index];
        token.kind != TokenKind::Eof && prev.span.end == token.span.start
    }

    pub fn span_of(&self, k: usize) -> Span {
        self.peek(k).span.clone()
    }
}
