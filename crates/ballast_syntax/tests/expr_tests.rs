mod common;

use ballast_syntax::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use ballast_syntax::parser::{op_info, Assoc, PRECEDENCE_TABLE};
use ballast_syntax::{parse_expression, SyntaxErrorKind};
use common::expr_ok;

/// 以 S 表达式形式打印，便于比较结合方式
fn sexpr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Name(name) => name.to_string(),
        ExprKind::Literal(Literal::Int(v)) => v.to_string(),
        ExprKind::Binary { op, lhs, rhs } => {
            format!("({} {} {})", op.symbol(), sexpr(lhs), sexpr(rhs))
        }
        ExprKind::Unary { op, operand } => {
            let symbol = match op {
                UnaryOp::Plus => "+",
                UnaryOp::Neg => "-",
                UnaryOp::Not => "!",
                UnaryOp::BitNot => "~",
                UnaryOp::Typeof => "typeof",
            };
            format!("({} {})", symbol, sexpr(operand))
        }
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => format!(
            "(? {} {} {})",
            sexpr(condition),
            sexpr(then_expr),
            sexpr(else_expr)
        ),
        ExprKind::Group(inner) => sexpr(inner),
        ExprKind::Invocation { callee, args } => format!("{}(#{})", sexpr(callee), args.len()),
        ExprKind::FieldAccess { target, field, .. } => format!("{}.{}", sexpr(target), field.name),
        other => format!("{:?}", other),
    }
}

fn shape(source: &str) -> String {
    sexpr(&expr_ok(source))
}

#[test]
fn test_multiplicative_binds_tighter_than_additive() {
    assert_eq!(shape("a + b * c"), "(+ a (* b c))");
    assert_eq!(shape("a * b + c"), "(+ (* a b) c)");
}

#[test]
fn test_full_precedence_ladder() {
    assert_eq!(
        shape("a || b && c | d ^ e & f == g < h ... i << j + k * l"),
        "(|| a (&& b (| c (^ d (& e (== f (< g (... h (<< i (+ j (* k l)))))))))))"
    );
}

#[test]
fn test_left_associativity() {
    assert_eq!(shape("a - b - c"), "(- (- a b) c)");
    assert_eq!(shape("a / b % c"), "(% (/ a b) c)");
    assert_eq!(shape("a == b != c"), "(!= (== a b) c)");
}

#[test]
fn test_elvis_is_right_associative_and_loosest() {
    assert_eq!(shape("a ?: b ?: c"), "(?: a (?: b c))");
    assert_eq!(shape("a || b ?: c"), "(?: (|| a b) c)");
}

#[test]
fn test_conditional_is_right_associative() {
    assert_eq!(shape("a ? b : c ? d : e"), "(? a b (? c d e))");
    assert_eq!(shape("a || b ? c : d"), "(? (|| a b) c d)");
}

#[test]
fn test_postfix_before_binary_and_unary() {
    assert_eq!(shape("-a.b(c)"), "(- a.b(#1))");
    assert_eq!(shape("f(x) * g(y)"), "(* f(#1) g(#1))");
}

#[test]
fn test_shift_operators_from_glued_tokens() {
    assert_eq!(shape("a >> b"), "(>> a b)");
    assert_eq!(shape("a >>> b"), "(>>> a b)");
    assert_eq!(shape("a << b + c"), "(<< a (+ b c))");
}

#[test]
fn test_spaced_angle_brackets_are_not_a_shift() {
    let result = parse_expression("a > > b");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, SyntaxErrorKind::NoViableAlternative);
}

#[test]
fn test_ranges() {
    assert_eq!(shape("0 ..< n + 1"), "(..< 0 (+ n 1))");
}

#[test]
fn test_precedence_table_is_consistent() {
    for info in PRECEDENCE_TABLE.iter() {
        assert_eq!(op_info(info.op), *info);
        let expected = if info.op == BinaryOp::Elvis {
            Assoc::Right
        } else {
            Assoc::Left
        };
        assert_eq!(info.assoc, expected, "{:?}", info.op);
    }
    assert!(op_info(BinaryOp::Mul).precedence > op_info(BinaryOp::Add).precedence);
    assert!(op_info(BinaryOp::And).precedence > op_info(BinaryOp::Or).precedence);
}

#[test]
fn test_binary_span_covers_operands() {
    let expr = expr_ok("foo + bar * 2");
    assert_eq!(expr.span, 0..13);
    let ExprKind::Binary { rhs, .. } = &expr.kind else {
        panic!("expected binary");
    };
    assert_eq!(rhs.span, 6..13);
}

#[test]
fn test_trailing_garbage_is_reported() {
    let result = parse_expression("a + b )");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, SyntaxErrorKind::UnexpectedToken);
}

#[test]
fn test_type_test_and_cast_in_expressions() {
    let expr = expr_ok("<float> x is float ? 1 : 0");
    assert!(matches!(expr.kind, ExprKind::Conditional { .. }));
}

#[test]
fn test_trap_and_checkpanic() {
    let expr = expr_ok("trap checkpanic f()");
    let ExprKind::Trap(inner) = &expr.kind else {
        panic!("expected trap");
    };
    assert!(matches!(inner.kind, ExprKind::Check { panics: true, .. }));
}

#[test]
fn test_lambda_with_default_and_rest_params() {
    let expr = expr_ok("function (int base = 1, int... xs) returns int { return base; }");
    let ExprKind::Lambda { signature, body } = &expr.kind else {
        panic!("expected lambda, got {:?}", expr.kind);
    };
    assert_eq!(signature.params.len(), 1);
    assert!(signature.params[0].default.is_some());
    let rest = signature.rest.as_deref().expect("rest param");
    assert_eq!(rest.name.name, "xs");
    assert_eq!(body.stmts.len(), 1);
}
