//! 语法树遍历
//!
//! 每个 `visit_*` 默认调用对应的 `walk_*` 继续向下遍历；
//! 实现者只需覆盖关心的节点，并在需要时手动调用 `walk_*`。

use super::*;

pub trait Visitor: Sized {
    fn visit_unit(&mut self, unit: &CompilationUnit) {
        walk_unit(self, unit);
    }

    fn visit_import(&mut self, _import: &ImportDecl) {}

    fn visit_item(&mut self, item: &Item) {
        walk_item(self, item);
    }

    fn visit_annotation(&mut self, annotation: &Annotation) {
        walk_annotation(self, annotation);
    }

    fn visit_function(&mut self, function: &FunctionDef) {
        walk_function(self, function);
    }

    fn visit_object_member(&mut self, member: &ObjectMember) {
        walk_object_member(self, member);
    }

    fn visit_block(&mut self, block: &Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &TypeDesc) {
        walk_type(self, ty);
    }

    fn visit_pattern(&mut self, pattern: &BindingPattern) {
        walk_pattern(self, pattern);
    }

    fn visit_ident(&mut self, _ident: &Ident) {}
}

pub fn walk_unit<V: Visitor>(v: &mut V, unit: &CompilationUnit) {
    for import in &unit.imports {
        v.visit_import(import);
    }
    for item in &unit.items {
        v.visit_item(item);
    }
}

pub fn walk_item<V: Visitor>(v: &mut V, item: &Item) {
    for annotation in &item.annotations {
        v.visit_annotation(annotation);
    }
    match &item.kind {
        ItemKind::Function(function) => v.visit_function(function),
        ItemKind::Service(service) => {
            if let Some(name) = &service.name {
                v.visit_ident(name);
            }
            for listener in &service.listeners {
                v.visit_expr(listener);
            }
            walk_service_body(v, &service.body);
        }
        ItemKind::Listener(listener) => {
            if let Some(ty) = &listener.ty {
                v.visit_type(ty);
            }
            v.visit_ident(&listener.name);
            v.visit_expr(&listener.init);
        }
        ItemKind::TypeDef(def) => {
            v.visit_ident(&def.name);
            v.visit_type(&def.ty);
        }
        ItemKind::Annotation(decl) => {
            if let Some(ty) = &decl.ty {
                v.visit_type(ty);
            }
            v.visit_ident(&decl.name);
        }
        ItemKind::Constant(decl) => {
            if let Some(ty) = &decl.ty {
                v.visit_type(ty);
            }
            v.visit_ident(&decl.name);
            v.visit_expr(&decl.value);
        }
        ItemKind::Variable(decl) => {
            if let Some(ty) = &decl.ty {
                v.visit_type(ty);
            }
            v.visit_ident(&decl.name);
            if let Some(init) = &decl.init {
                v.visit_expr(init);
            }
        }
        ItemKind::Xmlns(decl) => walk_xmlns(v, decl),
        ItemKind::Error => {}
    }
}

pub fn walk_annotation<V: Visitor>(v: &mut V, annotation: &Annotation) {
    if let Some(value) = &annotation.value {
        v.visit_expr(value);
    }
}

pub fn walk_function<V: Visitor>(v: &mut V, function: &FunctionDef) {
    if let Some(receiver) = &function.receiver {
        v.visit_ident(receiver);
    }
    v.visit_ident(&function.name);
    walk_signature(v, &function.signature);
    match &function.body {
        FunctionBody::Block(block) => v.visit_block(block),
        FunctionBody::External(annotations) => {
            for annotation in annotations {
                v.visit_annotation(annotation);
            }
        }
        FunctionBody::None => {}
    }
}

pub fn walk_signature<V: Visitor>(v: &mut V, signature: &FunctionSignature) {
    for param in signature.params.iter().chain(signature.rest.as_deref()) {
        for annotation in &param.annotations {
            v.visit_annotation(annotation);
        }
        v.visit_type(&param.ty);
        v.visit_ident(&param.name);
        if let Some(default) = &param.default {
            v.visit_expr(default);
        }
    }
    if let Some(returns) = &signature.returns {
        for annotation in &returns.annotations {
            v.visit_annotation(annotation);
        }
        v.visit_type(&returns.ty);
    }
}

pub fn walk_service_body<V: Visitor>(v: &mut V, body: &ServiceBody) {
    for member in &body.members {
        v.visit_object_member(member);
    }
}

pub fn walk_object_member<V: Visitor>(v: &mut V, member: &ObjectMember) {
    for annotation in &member.annotations {
        v.visit_annotation(annotation);
    }
    match &member.kind {
        ObjectMemberKind::Field(field) => {
            v.visit_type(&field.ty);
            v.visit_ident(&field.name);
            if let Some(default) = &field.default {
                v.visit_expr(default);
            }
        }
        ObjectMemberKind::Method(function) => v.visit_function(function),
        ObjectMemberKind::TypeReference(ty) => v.visit_type(ty),
    }
}

pub fn walk_block<V: Visitor>(v: &mut V, block: &Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

fn walk_xmlns<V: Visitor>(v: &mut V, decl: &XmlnsDecl) {
    v.visit_expr(&decl.uri);
    if let Some(prefix) = &decl.prefix {
        v.visit_ident(prefix);
    }
}

fn walk_worker<V: Visitor>(v: &mut V, worker: &WorkerDecl) {
    for annotation in &worker.annotations {
        v.visit_annotation(annotation);
    }
    v.visit_ident(&worker.name);
    if let Some(ty) = &worker.returns {
        v.visit_type(ty);
    }
    v.visit_block(&worker.body);
}

fn walk_if<V: Visitor>(v: &mut V, stmt: &IfStmt) {
    v.visit_expr(&stmt.condition);
    v.visit_block(&stmt.then_block);
    match &stmt.else_branch {
        Some(ElseBranch::ElseIf(next)) => walk_if(v, next),
        Some(ElseBranch::Else(block)) => v.visit_block(block),
        None => {}
    }
}

pub fn walk_stmt<V: Visitor>(v: &mut V, stmt: &Stmt) {
    match &stmt.kind {
        StmtKind::VarDecl(decl) => {
            for annotation in &decl.annotations {
                v.visit_annotation(annotation);
            }
            if let Some(ty) = &decl.ty {
                v.visit_type(ty);
            }
            v.visit_pattern(&decl.pattern);
            if let Some(init) = &decl.init {
                v.visit_expr(init);
            }
        }
        StmtKind::Assign { target, value } | StmtKind::CompoundAssign { target, value, .. } => {
            v.visit_expr(target);
            v.visit_expr(value);
        }
        StmtKind::Destructure { pattern, value } => {
            v.visit_pattern(pattern);
            v.visit_expr(value);
        }
        StmtKind::If(if_stmt) => walk_if(v, if_stmt),
        StmtKind::Match { subject, clauses } => {
            v.visit_expr(subject);
            for clause in clauses {
                match &clause.pattern {
                    MatchPattern::Static(values) => {
                        for value in values {
                            v.visit_expr(value);
                        }
                    }
                    MatchPattern::Binding(pattern) => v.visit_pattern(pattern),
                    MatchPattern::Wildcard(_) => {}
                }
                if let Some(guard) = &clause.guard {
                    v.visit_expr(guard);
                }
                v.visit_block(&clause.body);
            }
        }
        StmtKind::Foreach {
            ty,
            pattern,
            iterable,
            body,
        } => {
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
            v.visit_pattern(pattern);
            v.visit_expr(iterable);
            v.visit_block(body);
        }
        StmtKind::While { condition, body } => {
            v.visit_expr(condition);
            v.visit_block(body);
        }
        StmtKind::Fork { workers, join } => {
            for worker in workers {
                walk_worker(v, worker);
            }
            if let Some(join) = join {
                if let Some(param) = &join.param {
                    v.visit_type(&param.ty);
                    v.visit_ident(&param.name);
                }
                v.visit_block(&join.body);
            }
        }
        StmtKind::Try {
            body,
            catches,
            finally,
        } => {
            v.visit_block(body);
            for catch in catches {
                v.visit_type(&catch.ty);
                v.visit_ident(&catch.name);
                v.visit_block(&catch.body);
            }
            if let Some(finally) = finally {
                v.visit_block(finally);
            }
        }
        StmtKind::Throw(expr) | StmtKind::Panic(expr) | StmtKind::Expression(expr) => {
            v.visit_expr(expr)
        }
        StmtKind::Return(expr) => {
            if let Some(expr) = expr {
                v.visit_expr(expr);
            }
        }
        StmtKind::WorkerSend { value, peer, key } => {
            v.visit_expr(value);
            v.visit_ident(peer);
            if let Some(key) = key {
                v.visit_expr(key);
            }
        }
        StmtKind::Worker(worker) => walk_worker(v, worker),
        StmtKind::Transaction(tx) => {
            for expr in [&tx.retries, &tx.on_commit, &tx.on_abort]
                .into_iter()
                .flatten()
            {
                v.visit_expr(expr);
            }
            v.visit_block(&tx.body);
            for block in [&tx.on_retry, &tx.committed, &tx.aborted]
                .into_iter()
                .flatten()
            {
                v.visit_block(block);
            }
        }
        StmtKind::Lock(block) => v.visit_block(block),
        StmtKind::Xmlns(decl) => walk_xmlns(v, decl),
        StmtKind::Break
        | StmtKind::Continue
        | StmtKind::Retry
        | StmtKind::Abort
        | StmtKind::Error => {}
    }
}

fn walk_args<V: Visitor>(v: &mut V, args: &[Arg]) {
    for arg in args {
        if let Arg::Named { name, .. } = arg {
            v.visit_ident(name);
        }
        v.visit_expr(arg.value());
    }
}

fn walk_let_bindings<V: Visitor>(v: &mut V, bindings: &[LetBinding]) {
    for binding in bindings {
        if let Some(ty) = &binding.ty {
            v.visit_type(ty);
        }
        v.visit_pattern(&binding.pattern);
        v.visit_expr(&binding.value);
    }
}

pub fn walk_expr<V: Visitor>(v: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Literal(_)
        | ExprKind::Nil
        | ExprKind::Template { .. }
        | ExprKind::Error => {}
        ExprKind::Name(name) => {
            if let Some(prefix) = &name.prefix {
                v.visit_ident(prefix);
            }
            v.visit_ident(&name.name);
        }
        ExprKind::Group(inner)
        | ExprKind::Trap(inner)
        | ExprKind::Start(inner)
        | ExprKind::Check { expr: inner, .. } => v.visit_expr(inner),
        ExprKind::List(items) => {
            for item in items {
                v.visit_expr(item);
            }
        }
        ExprKind::Mapping(fields) => {
            for field in fields {
                match field {
                    MappingField::KeyValue { key, value } => {
                        match key {
                            MappingKey::Name(name) => v.visit_ident(name),
                            MappingKey::Computed(key) => v.visit_expr(key),
                            MappingKey::String { .. } => {}
                        }
                        v.visit_expr(value);
                    }
                    MappingField::Shorthand(name) => v.visit_ident(name),
                    MappingField::Spread(value) => v.visit_expr(value),
                }
            }
        }
        ExprKind::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        ExprKind::Unary { operand, .. } => v.visit_expr(operand),
        ExprKind::Conditional {
            condition,
            then_expr,
            else_expr,
        } => {
            v.visit_expr(condition);
            v.visit_expr(then_expr);
            v.visit_expr(else_expr);
        }
        ExprKind::FieldAccess { target, field, .. } => {
            v.visit_expr(target);
            v.visit_ident(field);
        }
        ExprKind::AnnotationAccess { target, .. } => v.visit_expr(target),
        ExprKind::Index { target, index } => {
            v.visit_expr(target);
            v.visit_expr(index);
        }
        ExprKind::Invocation { callee, args } => {
            v.visit_expr(callee);
            walk_args(v, args);
        }
        ExprKind::RemoteCall {
            target,
            method,
            args,
        } => {
            v.visit_expr(target);
            v.visit_ident(method);
            walk_args(v, args);
        }
        ExprKind::SyncSend { value, peer } => {
            v.visit_expr(value);
            v.visit_ident(peer);
        }
        ExprKind::TypeTest { expr, ty } => {
            v.visit_expr(expr);
            v.visit_type(ty);
        }
        ExprKind::TypeCast { ty, expr } => {
            v.visit_type(ty);
            v.visit_expr(expr);
        }
        ExprKind::TypeDescriptor(ty) => v.visit_type(ty),
        ExprKind::TypeInit { ty, args } => {
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
            walk_args(v, args);
        }
        ExprKind::Wait(target) => match target {
            WaitTarget::Single(inner) => v.visit_expr(inner),
            WaitTarget::Alternate(items) => {
                for item in items {
                    v.visit_expr(item);
                }
            }
            WaitTarget::Collection(fields) => {
                for field in fields {
                    v.visit_ident(&field.key);
                    if let Some(value) = &field.value {
                        v.visit_expr(value);
                    }
                }
            }
        },
        ExprKind::Flush(peer) => {
            if let Some(peer) = peer {
                v.visit_ident(peer);
            }
        }
        ExprKind::Receive(peer) => v.visit_ident(peer),
        ExprKind::Lambda { signature, body } => {
            walk_signature(v, signature);
            v.visit_block(body);
        }
        ExprKind::Arrow { params, body } => {
            for param in params {
                v.visit_ident(param);
            }
            v.visit_expr(body);
        }
        ExprKind::Let { bindings, body } => {
            walk_let_bindings(v, bindings);
            v.visit_expr(body);
        }
        ExprKind::Query(query) => {
            for clause in &query.clauses {
                match clause {
                    QueryClause::From {
                        ty,
                        pattern,
                        source,
                        ..
                    } => {
                        if let Some(ty) = ty {
                            v.visit_type(ty);
                        }
                        v.visit_pattern(pattern);
                        v.visit_expr(source);
                    }
                    QueryClause::Where(condition) => v.visit_expr(condition),
                    QueryClause::Let(bindings) => walk_let_bindings(v, bindings),
                }
            }
            v.visit_expr(&query.select);
        }
        ExprKind::ServiceConstructor(body) => walk_service_body(v, body),
    }
}

pub fn walk_type<V: Visitor>(v: &mut V, ty: &TypeDesc) {
    match &ty.kind {
        TypeKind::Builtin(_) | TypeKind::Nil | TypeKind::Singleton(_) | TypeKind::Missing => {}
        TypeKind::Named(name) => v.visit_ident(&name.name),
        TypeKind::Group(inner) | TypeKind::Nullable(inner) => v.visit_type(inner),
        TypeKind::Array { element, .. } => v.visit_type(element),
        TypeKind::Union(members) => {
            for member in members {
                v.visit_type(member);
            }
        }
        TypeKind::Tuple { members, rest } => {
            for member in members.iter().chain(rest.as_deref()) {
                v.visit_type(member);
            }
        }
        TypeKind::Parametrized { args, .. } => {
            for arg in args {
                v.visit_type(arg);
            }
        }
        TypeKind::Function {
            params,
            rest,
            returns,
        } => {
            for param in params.iter().chain(rest.as_deref()) {
                v.visit_type(param);
            }
            if let Some(returns) = returns {
                v.visit_type(returns);
            }
        }
        TypeKind::Object(body) => {
            for member in &body.members {
                v.visit_object_member(member);
            }
        }
        TypeKind::Record(body) => {
            for member in &body.members {
                match member {
                    RecordMember::Field(field) => {
                        for annotation in &field.annotations {
                            v.visit_annotation(annotation);
                        }
                        v.visit_type(&field.ty);
                        v.visit_ident(&field.name);
                        if let Some(default) = &field.default {
                            v.visit_expr(default);
                        }
                    }
                    RecordMember::TypeReference(ty) | RecordMember::Rest(ty) => v.visit_type(ty),
                }
            }
        }
    }
}

pub fn walk_pattern<V: Visitor>(v: &mut V, pattern: &BindingPattern) {
    match &pattern.kind {
        BindingPatternKind::Capture(name) => v.visit_ident(name),
        BindingPatternKind::Wildcard | BindingPatternKind::Missing => {}
        BindingPatternKind::List { members, rest } => {
            for member in members {
                v.visit_pattern(member);
            }
            if let Some(rest) = rest {
                v.visit_ident(rest);
            }
        }
        BindingPatternKind::Mapping { fields, rest } => {
            for field in fields {
                v.visit_ident(&field.field);
                if let Some(inner) = &field.pattern {
                    v.visit_pattern(inner);
                }
            }
            if let Some(rest) = rest {
                v.visit_ident(rest);
            }
        }
        BindingPatternKind::Error {
            reason,
            details,
            rest,
            ..
        } => {
            v.visit_pattern(reason);
            for detail in details {
                v.visit_ident(&detail.name);
                v.visit_pattern(&detail.pattern);
            }
            if let Some(rest) = rest {
                v.visit_ident(rest);
            }
        }
    }
}
