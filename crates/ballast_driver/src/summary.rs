//! 语法树统计

use ballast_syntax::ast::visitor::{walk_expr, walk_item, walk_pattern, walk_stmt, walk_type};
use ballast_syntax::ast::{
    BindingPattern, CompilationUnit, Expr, ExprKind, ImportDecl, Item, ItemKind, Stmt, StmtKind,
    TypeDesc, Visitor,
};
use std::fmt;

/// 各类节点的数量，`error_nodes` 统计恢复时插入的占位节点
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeSummary {
    pub imports: usize,
    pub items: usize,
    pub statements: usize,
    pub expressions: usize,
    pub types: usize,
    pub patterns: usize,
    pub error_nodes: usize,
}

impl TreeSummary {
    pub fn of(unit: &CompilationUnit) -> Self {
        let mut summary = Self::default();
        summary.visit_unit(unit);
        summary
    }
}

impl Visitor for TreeSummary {
    fn visit_import(&mut self, _import: &ImportDecl) {
        self.imports += 1;
    }

    fn visit_item(&mut self, item: &Item) {
        self.items += 1;
        if matches!(item.kind, ItemKind::Error) {
            self.error_nodes += 1;
        }
        walk_item(self, item);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        self.statements += 1;
        if matches!(stmt.kind, StmtKind::Error) {
            self.error_nodes += 1;
        }
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.expressions += 1;
        if matches!(expr.kind, ExprKind::Error) {
            self.error_nodes += 1;
        }
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &TypeDesc) {
        self.types += 1;
        if ty.is_missing() {
            self.error_nodes += 1;
        }
        walk_type(self, ty);
    }

    fn visit_pattern(&mut self, pattern: &BindingPattern) {
        self.patterns += 1;
        walk_pattern(self, pattern);
    }
}

impl fmt::Display for TreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} imports, {} definitions, {} statements, {} expressions, {} types, {} patterns",
            self.imports, self.items, self.statements, self.expressions, self.types, self.patterns
        )?;
        if self.error_nodes > 0 {
            write!(f, " ({} recovered)", self.error_nodes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballast_syntax::parse_source;

    #[test]
    fn test_counts_nodes() {
        let unit = parse_source("import a/b;\nfunction f() { int x = 1 + 2; }").tree;
        let summary = TreeSummary::of(&unit);
        assert_eq!(summary.imports, 1);
        assert_eq!(summary.items, 1);
        assert_eq!(summary.statements, 1);
        // 1 + 2 以及两个字面量
        assert_eq!(summary.expressions, 3);
        assert_eq!(summary.error_nodes, 0);
    }

    #[test]
    fn test_counts_recovered_nodes() {
        let unit = parse_source("function f() { ) ; }").tree;
        let summary = TreeSummary::of(&unit);
        assert_eq!(summary.error_nodes, 1);
        assert!(summary.to_string().ends_with("(1 recovered)"));
    }
}
