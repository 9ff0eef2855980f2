pub mod ast;
pub mod diagnostic;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod scope;

pub use diagnostic::CompileError;

use crate::ast::{Spanned, Stmt};
use crate::ir::Listing;
use crate::lexer::Token;

/// Parses `tokens` and checks scoping, yielding a tree ready for lowering.
pub fn parse_checked(tokens: &[Token]) -> Result<Vec<Spanned<Stmt>>, CompileError> {
    let statements = parser::parse(tokens)?;
    scope::check(&statements)?;
    Ok(statements)
}

/// Runs the whole pipeline: lex, parse, scope check, lower.
pub fn compile(source: &str) -> Result<Listing, CompileError> {
    let tokens = lexer::tokenize(source)?;
    let statements = parse_checked(&tokens)?;
    Ok(ir::lower(&statements))
}
