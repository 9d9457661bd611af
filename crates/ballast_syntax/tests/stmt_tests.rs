mod common;

use ballast_syntax::ast::{
    BindingPatternKind, ElseBranch, ExprKind, FunctionBody, ItemKind, Stmt, StmtKind,
};
use ballast_syntax::{parse_statement, SyntaxErrorKind};
use common::{assert_spans_nested, parse_ok, stmt_ok};

fn body_of(source: &str) -> Vec<Stmt> {
    let unit = parse_ok(source);
    let ItemKind::Function(function) = &unit.items[0].kind else {
        panic!("expected function");
    };
    let FunctionBody::Block(block) = &function.body else {
        panic!("expected body");
    };
    block.stmts.clone()
}

#[test]
fn test_declaration_forms() {
    let stmts = body_of(
        "function f() {
            int a = 1;
            final string b = \"x\";
            var c = a + 1;
            map<int> m = {};
            int[] xs = [1, 2];
            Person p = new(\"n\");
            http:Client client = new(\"http://x\");
            error e = error(\"reason\");
            function (int) returns int inc = x => x + 1;
            record { int x; } r = { x: 1 };
            @tainted string s = read();
        }",
    );
    assert_eq!(stmts.len(), 11);
    for stmt in &stmts {
        assert!(matches!(stmt.kind, StmtKind::VarDecl(_)), "{:?}", stmt.kind);
    }
    let StmtKind::VarDecl(decl) = &stmts[1].kind else {
        unreachable!()
    };
    assert!(decl.is_final);
    let StmtKind::VarDecl(decl) = &stmts[10].kind else {
        unreachable!()
    };
    assert_eq!(decl.annotations.len(), 1);
}

#[test]
fn test_assignment_forms() {
    let stmts = body_of(
        "function f() {
            a = 1;
            a.b = 2;
            a[0] = 3;
            _ = f();
            x += 1;
            x <<= 2;
            x >>= 3;
        }",
    );
    assert!(matches!(stmts[0].kind, StmtKind::Assign { .. }));
    assert!(matches!(stmts[3].kind, StmtKind::Assign { .. }));
    assert!(stmts[4..]
        .iter()
        .all(|s| matches!(s.kind, StmtKind::CompoundAssign { .. })));
}

#[test]
fn test_destructuring_assignment_is_tried_first() {
    let stmt = stmt_ok("[a, [b, c], ...rest] = f();");
    let StmtKind::Destructure { pattern, .. } = &stmt.kind else {
        panic!("expected destructure, got {:?}", stmt.kind);
    };
    assert!(matches!(pattern.kind, BindingPatternKind::List { .. }));

    let stmt = stmt_ok("{name, age: years} = person;");
    assert!(matches!(stmt.kind, StmtKind::Destructure { .. }));

    let stmt = stmt_ok("error(reason, message = msg) = result;");
    assert!(matches!(stmt.kind, StmtKind::Destructure { .. }));
}

#[test]
fn test_list_expression_statement_falls_back() {
    let stmt = stmt_ok("[1, 2].forEach(f);");
    let StmtKind::Expression(expr) = &stmt.kind else {
        panic!("expected expression statement, got {:?}", stmt.kind);
    };
    assert!(matches!(expr.kind, ExprKind::Invocation { .. }));
}

#[test]
fn test_call_statement() {
    let stmt = stmt_ok("io:println(\"hello\");");
    assert!(matches!(stmt.kind, StmtKind::Expression(_)));
}

#[test]
fn test_long_else_if_chain() {
    let mut source = String::from("if a0 { }");
    for i in 1..200 {
        source.push_str(&format!(" else if a{} {{ }}", i));
    }
    source.push_str(" else { }");
    let stmt = stmt_ok(&source);
    let StmtKind::If(first) = &stmt.kind else {
        panic!("expected if");
    };
    let mut current = first;
    let mut length = 1;
    while let Some(ElseBranch::ElseIf(next)) = &current.else_branch {
        current = next;
        length += 1;
    }
    assert_eq!(length, 200);
    assert!(matches!(current.else_branch, Some(ElseBranch::Else(_))));
}

#[test]
fn test_loops() {
    let stmts = body_of(
        "function f() {
            foreach var x in xs { continue; }
            foreach int i in 0 ..< 10 { }
            foreach [string, int] [k, v] in pairs { }
            foreach item in items { break; }
            while i < 10 { i += 1; }
        }",
    );
    assert_eq!(stmts.len(), 5);
    let StmtKind::Foreach { ty, .. } = &stmts[1].kind else {
        panic!("expected foreach");
    };
    assert!(ty.is_some());
    let StmtKind::Foreach { pattern, .. } = &stmts[2].kind else {
        panic!("expected foreach");
    };
    assert!(matches!(pattern.kind, BindingPatternKind::List { .. }));
    assert!(matches!(stmts[4].kind, StmtKind::While { .. }));
}

#[test]
fn test_workers_and_messages() {
    let stmts = body_of(
        "function f() {
            worker w1 returns int {
                int x = 10;
                x -> w2;
                x -> w2, \"key\";
                var r = x ->> w2;
                return x;
            }
            worker w2 {
                int y = <- w1;
                flush w1;
            }
            future<int> fut = start compute();
            int result = wait fut;
        }",
    );
    assert_eq!(stmts.len(), 4);
    let StmtKind::Worker(worker) = &stmts[0].kind else {
        panic!("expected worker");
    };
    assert!(worker.returns.is_some());
    assert!(matches!(
        worker.body.stmts[2].kind,
        StmtKind::WorkerSend { key: Some(_), .. }
    ));
}

#[test]
fn test_error_handling_statements() {
    let stmts = body_of(
        "function f() {
            try { throw e; } catch (error err) { panic err; } finally { cleanup(); }
            lock { count += 1; }
            return;
        }",
    );
    assert!(matches!(
        stmts[0].kind,
        StmtKind::Try {
            finally: Some(_),
            ..
        }
    ));
    assert!(matches!(stmts[1].kind, StmtKind::Lock(_)));
    assert!(matches!(stmts[2].kind, StmtKind::Return(None)));
}

#[test]
fn test_transaction_statements() {
    let stmt = stmt_ok(
        "transaction with retries = 3 { update(); if failed { retry; } else { abort; } } committed { log(); }",
    );
    let StmtKind::Transaction(tx) = &stmt.kind else {
        panic!("expected transaction");
    };
    assert!(tx.committed.is_some());
    assert_eq!(tx.body.stmts.len(), 2);
}

#[test]
fn test_xmlns_statement() {
    let stmt = stmt_ok("xmlns \"http://example.com\" as ex;");
    assert!(matches!(stmt.kind, StmtKind::Xmlns(ref decl) if decl.prefix.is_some()));
}

#[test]
fn test_invalid_assignment_target() {
    let result = parse_statement("a + b = 1;");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, SyntaxErrorKind::MalformedConstruct);
}

#[test]
fn test_annotation_on_non_declaration() {
    let result = parse_statement("@deprecated x = 1;");
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].kind, SyntaxErrorKind::MalformedConstruct);
}

#[test]
fn test_statement_spans_are_nested() {
    let unit = parse_ok(
        "function f(int n) returns int {
            int total = 0;
            foreach int i in 0 ..< n {
                if i % 2 == 0 { total += i; } else { total -= -i; }
            }
            match total { 0 => { return 0; } var x if x > 10 => { return x; } }
            return total > 100 ? total : check g(total);
        }",
    );
    assert_spans_nested(&unit);
}

#[test]
fn test_tuple_declaration_with_method_body_statements() {
    // 方法体里 `a[i + 1] = 3;` 先按声明试探失败，再按赋值解析
    let stmt = stmt_ok("[object { function f() { a[i + 1] = 3; } }, int] t = x;");
    let StmtKind::VarDecl(decl) = &stmt.kind else {
        panic!("expected declaration, got {:?}", stmt.kind);
    };
    assert!(decl.ty.is_some());
    assert!(matches!(decl.pattern.kind, BindingPatternKind::Capture(_)));
}
