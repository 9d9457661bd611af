mod common;

use ballast_syntax::ast::{FunctionBody, ItemKind, ObjectMemberKind, Visibility};
use ballast_syntax::SyntaxErrorKind;
use common::{assert_spans_nested, errors_of, parse_ok};

const SERVICE: &str = r#"
import ballerina/http;
import ballerina/log as logger;

@http:ServiceConfig { basePath: "/hello" }
service greeting on new http:Listener(9090) {

    @http:ResourceConfig { methods: ["GET"], path: "/" }
    resource function sayHello(http:Caller caller, http:Request req) {
        http:Response res = new;
        res.setPayload("Hello, World!");
        var result = caller->respond(res);
        if result is error {
            logger:printError("Error sending response", err = result);
        }
    }
}
"#;

#[test]
fn test_service_program() {
    let unit = parse_ok(SERVICE);
    assert_eq!(unit.imports.len(), 2);
    assert_eq!(
        unit.imports[1].alias.as_ref().map(|a| a.name.as_str()),
        Some("logger")
    );
    assert_eq!(unit.items.len(), 1);
    let item = &unit.items[0];
    assert_eq!(item.annotations.len(), 1);
    let ItemKind::Service(service) = &item.kind else {
        panic!("expected service");
    };
    assert_eq!(service.name.as_ref().map(|n| n.name.as_str()), Some("greeting"));
    let ObjectMemberKind::Method(resource) = &service.body.members[0].kind else {
        panic!("expected resource");
    };
    assert!(resource.qualifiers.resource);
    assert_eq!(resource.signature.params.len(), 2);
    let FunctionBody::Block(body) = &resource.body else {
        panic!("expected body");
    };
    assert_eq!(body.stmts.len(), 4);
    assert_spans_nested(&unit);
}

#[test]
fn test_object_type_definition_with_methods() {
    let unit = parse_ok(
        "public type Person object {
            public string name;
            private int age = 0;
            *Named;

            public function __init(string name, int age = 18) {
                self.name = name;
                self.age = age;
            }

            public function getName() returns string;
        };

        function Person.getName() returns string {
            return self.name;
        }",
    );
    assert_eq!(unit.items.len(), 2);
    assert_eq!(unit.items[0].visibility, Visibility::Public);
    let ItemKind::Function(method) = &unit.items[1].kind else {
        panic!("expected function");
    };
    assert_eq!(method.receiver.as_ref().map(|r| r.name.as_str()), Some("Person"));
    assert_spans_nested(&unit);
}

#[test]
fn test_function_signatures() {
    let unit = parse_ok(
        "function sum(int... values) returns int { return 0; }
         function greet(string name, string greeting = \"Hello\", @untainted string... rest) { }
         function noop() { }",
    );
    let ItemKind::Function(sum) = &unit.items[0].kind else {
        panic!("expected function");
    };
    assert!(sum.signature.params.is_empty());
    assert!(sum.signature.rest.is_some());
    let ItemKind::Function(greet) = &unit.items[1].kind else {
        panic!("expected function");
    };
    assert_eq!(greet.signature.params.len(), 2);
    assert!(greet.signature.params[1].default.is_some());
}

#[test]
fn test_module_variables() {
    let unit = parse_ok(
        "int counter = 0;
         final map<string> names = {};
         http:Client clientEP = new(\"http://localhost:9090\");
         var inferred = 10;
         string? maybe;",
    );
    assert_eq!(unit.items.len(), 5);
    assert!(unit
        .items
        .iter()
        .all(|item| matches!(item.kind, ItemKind::Variable(_))));
}

#[test]
fn test_annotation_declarations() {
    let unit = parse_ok(
        "public annotation ServiceConfig on service;
         const annotation Tainted on source parameter, return;
         annotation record { string path; } Path on resource function;",
    );
    let ItemKind::Annotation(config) = &unit.items[0].kind else {
        panic!("expected annotation");
    };
    assert!(config.ty.is_none());
    let ItemKind::Annotation(tainted) = &unit.items[1].kind else {
        panic!("expected annotation");
    };
    assert!(tainted.is_const);
    assert!(tainted.attach_points[0].source);
    assert_eq!(tainted.attach_points[0].name, "parameter");
}

#[test]
fn test_var_module_variable_needs_initializer() {
    let errors = errors_of("var x;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::MalformedConstruct);
}

#[test]
fn test_import_after_definitions() {
    let errors = errors_of("int x = 1;\nimport a/b;");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::MalformedConstruct);
}

#[test]
fn test_function_without_body() {
    let errors = errors_of("function f();");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::MalformedConstruct);
}

#[test]
fn test_unknown_top_level_token() {
    let errors = errors_of("42;\nfunction f() { }");
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::NoViableAlternative);
}
