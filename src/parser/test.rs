use super::*;
use crate::ast::{BinOp, Expr};
use crate::lexer::tokenize;

// Helper function to lex and parse input in one go
fn parse_str(input: &str) -> Result<Vec<Spanned<Stmt>>, ParseError> {
    let tokens = tokenize(input).expect("test input should lex");
    parse(&tokens)
}

#[test]
fn test_parse_print() {
    let ast = parse_str("print 5;").unwrap();
    assert_eq!(ast.len(), 1);

    let Stmt::Print { expression } = &ast[0].0 else {
        panic!("Expected print statement");
    };
    assert_eq!(expression.0, Expr::Number(5.0));
    assert_eq!(ast[0].1.range(), 0..8);
}

#[test]
fn test_parse_declaration_and_assignment() {
    let ast = parse_str("var count = 1;\ncount = (count + 1);").unwrap();
    assert_eq!(ast.len(), 2);

    let Stmt::VariableDeclaration { name, initializer } = &ast[0].0 else {
        panic!("Expected declaration");
    };
    assert_eq!(name.0, "count");
    assert_eq!(name.1.range(), 4..9);
    assert_eq!(initializer.0, Expr::Number(1.0));

    let Stmt::VariableAssignment { name, value } = &ast[1].0 else {
        panic!("Expected assignment");
    };
    assert_eq!(name.0, "count");
    assert_eq!(name.1.line, 1);
    let Expr::BinOp {
        operator,
        l_value,
        r_value,
    } = &value.0
    else {
        panic!("Expected binary expression");
    };
    assert_eq!(*operator, BinOp::Add);
    assert_eq!(l_value.0, Expr::Identifier("count".to_string()));
    assert_eq!(r_value.0, Expr::Number(1.0));
}

#[test]
fn test_nesting_decides_precedence() {
    let ast = parse_str("result = (((1+2)*numA)*(3-numB));").unwrap();
    let Stmt::VariableAssignment { value, .. } = &ast[0].0 else {
        panic!("Expected assignment");
    };
    assert_eq!(value.0.to_string(), "(((1 + 2) * numA) * (3 - numB))");

    let Expr::BinOp {
        operator, l_value, ..
    } = &value.0
    else {
        panic!("Expected binary expression");
    };
    assert_eq!(*operator, BinOp::Mul);
    assert!(matches!(
        l_value.0,
        Expr::BinOp {
            operator: BinOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_parenthesized_single_expression() {
    let ast = parse_str("if (x) { print x; }").unwrap();
    let Stmt::If { condition, body } = &ast[0].0 else {
        panic!("Expected if statement");
    };
    assert_eq!(condition.0, Expr::Identifier("x".to_string()));
    assert_eq!(body.len(), 1);
}

#[test]
fn test_parse_while() {
    let ast = parse_str("while (x > 0) { x = (x - 1); print x; }").unwrap();
    let Stmt::While { condition, body } = &ast[0].0 else {
        panic!("Expected while loop");
    };
    assert!(matches!(
        condition.0,
        Expr::BinOp {
            operator: BinOp::Greater,
            ..
        }
    ));
    assert_eq!(body.len(), 2);
}

#[test]
fn test_parse_for() {
    let ast = parse_str("for (var i = 0; (i < 10); i = (i + 1)) { print i; }").unwrap();
    let Stmt::For {
        initializer,
        condition,
        increment,
        body,
    } = &ast[0].0
    else {
        panic!("Expected for loop");
    };
    assert!(matches!(initializer.0, Stmt::VariableDeclaration { .. }));
    assert_eq!(condition.0.to_string(), "(i < 10)");
    assert!(matches!(increment.0, Stmt::VariableAssignment { .. }));
    assert_eq!(body.len(), 1);
}

#[test]
fn test_nested_blocks() {
    let ast = parse_str("var a = 1; if a { while a { a = 0; } if (a == 0) { } }").unwrap();
    assert_eq!(ast.len(), 2);
    let Stmt::If { body, .. } = &ast[1].0 else {
        panic!("Expected if statement");
    };
    assert!(matches!(body[0].0, Stmt::While { .. }));
    let Stmt::If { body: inner, .. } = &body[1].0 else {
        panic!("Expected nested if statement");
    };
    assert!(inner.is_empty());
}

#[test]
fn test_missing_semicolon() {
    let err = parse_str("print 1 print 2;").unwrap_err();
    let token = err.token.expect("error should carry the offending token");
    assert_eq!(token.text, "print");
    assert_eq!(token.span.start, 8);
    assert!(err.message.contains("';'"));
}

#[test]
fn test_identifier_without_assignment() {
    let err = parse_str("x + 1;").unwrap_err();
    assert_eq!(err.token.map(|t| t.text), Some("+".to_string()));
}

#[test]
fn test_missing_operator() {
    let err = parse_str("print (1 2);").unwrap_err();
    assert!(err.message.contains("operator"));
    assert_eq!(err.span.start, 9);
}

#[test]
fn test_unclosed_block_reaches_end_of_input() {
    let err = parse_str("while x { print x;").unwrap_err();
    assert!(err.token.is_none());
    assert_eq!(err.span.start, 18);
    assert!(err.message.contains("end of input"));
}

#[test]
fn test_for_increment_must_be_assignment() {
    let err = parse_str("for (var i = 0; (i < 3); print i) { }").unwrap_err();
    assert_eq!(err.token.map(|t| t.text), Some("print".to_string()));
}

#[test]
fn test_empty_program() {
    assert!(parse_str("  // nothing here\n").unwrap().is_empty());
}
