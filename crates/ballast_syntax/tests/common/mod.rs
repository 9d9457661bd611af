//! 集成测试共用的辅助函数

#![allow(dead_code)]

use ballast_syntax::ast::visitor::{walk_block, walk_expr, walk_pattern, walk_stmt, walk_type};
use ballast_syntax::ast::{
    BindingPattern, Block, CompilationUnit, Expr, Ident, Span, Stmt, TypeDesc, Visitor,
};
use ballast_syntax::{parse_expression, parse_source, parse_statement, parse_type, SyntaxError};

/// 解析一个应当没有错误的源文件
pub fn parse_ok(source: &str) -> CompilationUnit {
    let result = parse_source(source);
    assert!(
        result.errors.is_empty(),
        "unexpected errors for {:?}: {:#?}",
        source,
        result.errors
    );
    result.tree
}

pub fn errors_of(source: &str) -> Vec<SyntaxError> {
    parse_source(source).errors
}

pub fn expr_ok(source: &str) -> Expr {
    let result = parse_expression(source);
    assert!(result.errors.is_empty(), "{:?}: {:#?}", source, result.errors);
    result.tree
}

pub fn type_ok(source: &str) -> TypeDesc {
    let result = parse_type(source);
    assert!(result.errors.is_empty(), "{:?}: {:#?}", source, result.errors);
    result.tree
}

pub fn stmt_ok(source: &str) -> Stmt {
    let result = parse_statement(source);
    assert!(result.errors.is_empty(), "{:?}: {:#?}", source, result.errors);
    result.tree
}

/// 在大栈线程里运行，用于超过默认嵌套深度的输入
pub fn on_big_stack<T: Send + 'static>(f: impl FnOnce() -> T + Send + 'static) -> T {
    std::thread::Builder::new()
        .stack_size(64 << 20)
        .spawn(f)
        .expect("spawn test thread")
        .join()
        .expect("test thread panicked")
}

/// 检查每个节点的范围都包含在父节点的范围内
#[derive(Default)]
pub struct SpanContainment {
    parents: Vec<Span>,
    pub checked: usize,
    pub violations: Vec<(Span, Span)>,
}

impl SpanContainment {
    fn check(&mut self, span: &Span) {
        self.checked += 1;
        if let Some(parent) = self.parents.last() {
            if span.start < parent.start || span.end > parent.end {
                self.violations.push((parent.clone(), span.clone()));
            }
        }
    }

    fn nested(&mut self, span: &Span, walk: impl FnOnce(&mut Self)) {
        self.check(span);
        self.parents.push(span.clone());
        walk(self);
        self.parents.pop();
    }
}

impl Visitor for SpanContainment {
    fn visit_block(&mut self, block: &Block) {
        self.nested(&block.span, |v| walk_block(v, block));
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.nested(&stmt.span, |v| walk_stmt(v, stmt));
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.nested(&expr.span, |v| walk_expr(v, expr));
    }

    fn visit_type(&mut self, ty: &TypeDesc) {
        self.nested(&ty.span, |v| walk_type(v, ty));
    }

    fn visit_pattern(&mut self, pattern: &BindingPattern) {
        self.nested(&pattern.span, |v| walk_pattern(v, pattern));
    }

    fn visit_ident(&mut self, ident: &Ident) {
        self.check(&ident.span);
    }
}

pub fn assert_spans_nested(unit: &CompilationUnit) {
    let mut checker = SpanContainment::default();
    checker.visit_unit(unit);
    assert!(checker.checked > 0);
    assert!(
        checker.violations.is_empty(),
        "child spans escape their parents: {:?}",
        checker.violations
    );
}
