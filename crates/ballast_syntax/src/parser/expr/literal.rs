//! 字面量解析

use crate::ast::Literal;
use crate::lexer::TokenKind;
use crate::parser::{Parser, RecoveryAction, SyntaxErrorKind};

impl Parser {
    /// 消耗一个字面量 token；`negative` 表示前面已经消耗了 `-`
    pub(crate) fn parse_literal_value(&mut self, negative: bool) -> Literal {
        let token = self.bump();
        match token.kind {
            TokenKind::DecimalInteger | TokenKind::HexInteger => {
                let text = if negative {
                    format!("-{}", token.lexeme)
                } else {
                    token.lexeme.clone()
                };
                match parse_int_literal(&text) {
                    Some(value) => Literal::Int(value),
                    None => {
                        self.report(
                            SyntaxErrorKind::MalformedConstruct,
                            token.span,
                            format!("integer literal '{}' is out of range", token.lexeme),
                            RecoveryAction::Placeholder,
                        );
                        Literal::Int(0)
                    }
                }
            }
            TokenKind::FloatingPoint => {
                let digits = token.lexeme.trim_end_matches(['f', 'F', 'd', 'D']);
                let value = digits.parse::<f64>().unwrap_or(0.0);
                Literal::Float(if negative { -value } else { value })
            }
            TokenKind::StringLiteral => Literal::String(unescape_string(&token.lexeme)),
            TokenKind::True => Literal::Boolean(true),
            TokenKind::False => Literal::Boolean(false),
            TokenKind::Null => Literal::Null,
            other => {
                self.report(
                    SyntaxErrorKind::NoViableAlternative,
                    token.span,
                    format!("expected a literal, found {}", other),
                    RecoveryAction::Placeholder,
                );
                Literal::Null
            }
        }
    }
}

/// 十进制或 `0x` 十六进制整数，可带前导 `-`
pub(crate) fn parse_int_literal(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i128::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i128>().ok()?,
    };
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok()
}

/// 去掉两侧引号并处理转义
pub(crate) fn unescape_string(raw: &str) -> String {
    let inner = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(raw);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_literals() {
        assert_eq!(parse_int_literal("42"), Some(42));
        assert_eq!(parse_int_literal("0xff"), Some(255));
        assert_eq!(parse_int_literal("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int_literal("9223372036854775808"), None);
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape_string(r#""a\tb\"c""#), "a\tb\"c");
        assert_eq!(unescape_string(r#""""#), "");
    }
}
