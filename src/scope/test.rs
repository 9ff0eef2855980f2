use super::*;
use crate::lexer::tokenize;
use crate::parser::parse;

fn check_str(input: &str) -> Result<(), ScopeError> {
    let tokens = tokenize(input).expect("test input should lex");
    let ast = parse(&tokens).expect("test input should parse");
    check(&ast)
}

#[test]
fn test_declared_before_use() {
    assert!(check_str("var x = 1; x = (x + 1); print x;").is_ok());
}

#[test]
fn test_undeclared_identifier() {
    let err = check_str("var x = 1;\nprint (x + y);").unwrap_err();
    let ScopeError::UndeclaredIdentifier { name, span } = err else {
        panic!("Expected undeclared identifier error");
    };
    assert_eq!(name, "y");
    assert_eq!(span.line, 1);
    assert_eq!(span.column, 11);
    assert_eq!(span.start, 22);
}

#[test]
fn test_assignment_target_must_be_declared() {
    let err = check_str("total = 3;").unwrap_err();
    assert!(matches!(err, ScopeError::UndeclaredIdentifier { ref name, .. } if name == "total"));
}

#[test]
fn test_use_before_declaration() {
    assert!(check_str("print a; var a = 1;").is_err());
}

#[test]
fn test_initializer_cannot_see_its_own_name() {
    let err = check_str("var a = (a + 1);").unwrap_err();
    assert!(matches!(err, ScopeError::UndeclaredIdentifier { .. }));
}

#[test]
fn test_duplicate_declaration() {
    let err = check_str("var a = 1;\nvar a = 2;").unwrap_err();
    let ScopeError::DuplicateDeclaration { name, span } = err else {
        panic!("Expected duplicate declaration error");
    };
    assert_eq!(name, "a");
    assert_eq!(span.line, 1);
    assert_eq!(span.column, 4);
}

#[test]
fn test_shadowing_outer_scope_is_allowed() {
    assert!(check_str("var a = 1; if a { var a = 2; print a; } print a;").is_ok());
    assert!(check_str("var a = 1; while a { var a = 0; var a = 3; }").is_err());
}

#[test]
fn test_block_declarations_do_not_escape() {
    let err = check_str("var c = 1; if c { var inner = 2; } print inner;").unwrap_err();
    assert!(matches!(err, ScopeError::UndeclaredIdentifier { ref name, .. } if name == "inner"));
}

#[test]
fn test_outer_names_visible_in_nested_blocks() {
    assert!(check_str("var a = 1; if a { while a { if a { a = 0; } } }").is_ok());
}

#[test]
fn test_for_header_scope() {
    let src = "var sum = 0; for (var i = 0; (i < 3); i = (i + 1)) { sum = (sum + i); }";
    assert!(check_str(src).is_ok());

    // the loop variable lives in the header scope only
    let err = check_str("for (var i = 0; (i < 3); i = (i + 1)) { } print i;").unwrap_err();
    assert!(matches!(err, ScopeError::UndeclaredIdentifier { ref name, .. } if name == "i"));

    // two loops may reuse the same loop variable
    let src = "for (var i = 0; (i < 3); i = (i + 1)) { } for (var i = 0; (i < 3); i = (i + 1)) { }";
    assert!(check_str(src).is_ok());

    // the body is its own scope nested in the header
    assert!(check_str("for (var i = 0; (i < 3); i = (i + 1)) { var i = 5; }").is_ok());
}

#[test]
fn test_for_increment_checked_in_header_scope() {
    let err = check_str("for (var i = 0; (i < 3); j = (i + 1)) { }").unwrap_err();
    assert!(matches!(err, ScopeError::UndeclaredIdentifier { ref name, .. } if name == "j"));
}

#[test]
fn test_scope_stack_balance() {
    let mut scopes = ScopeStack::new();
    scopes.declare("x", Span::default()).unwrap();
    scopes.push_scope();
    assert_eq!(scopes.depth(), 2);
    assert!(scopes.is_declared("x"));
    scopes.declare("y", Span::default()).unwrap();
    scopes.pop_scope();
    assert!(!scopes.is_declared("y"));
    scopes.pop_scope();
    assert_eq!(scopes.depth(), 1);
    assert!(scopes.is_declared("x"));
}
