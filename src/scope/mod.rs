#[cfg(test)]
pub mod test;

use crate::ast::{Expr, Spanned, Stmt};
use crate::lexer::Span;

use thiserror::Error;
use tracing::{debug, trace};

use std::collections::HashSet;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScopeError {
    #[error("'{name}' is already declared in this scope (at {span})")]
    DuplicateDeclaration { name: String, span: Span },

    #[error("use of undeclared identifier '{name}' at {span}")]
    UndeclaredIdentifier { name: String, span: Span },
}

impl ScopeError {
    pub fn span(&self) -> Span {
        match self {
            ScopeError::DuplicateDeclaration { span, .. }
            | ScopeError::UndeclaredIdentifier { span, .. } => *span,
        }
    }
}

/// Stack of name sets, innermost last.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<HashSet<String>>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the global scope.
    pub fn new() -> Self {
        ScopeStack {
            scopes: vec![HashSet::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashSet::new());
        trace!(depth = self.depth(), "enter scope");
    }

    pub fn pop_scope(&mut self) {
        // the global scope is never popped
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
        trace!(depth = self.depth(), "leave scope");
    }

    pub fn declare(&mut self, name: &str, span: Span) -> Result<(), ScopeError> {
        let Some(innermost) = self.scopes.last_mut() else {
            unreachable!("scope stack always holds the global scope")
        };
        if !innermost.insert(name.to_string()) {
            return Err(ScopeError::DuplicateDeclaration {
                name: name.to_string(),
                span,
            });
        }
        Ok(())
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(name))
    }

    pub fn resolve(&self, name: &str, span: Span) -> Result<(), ScopeError> {
        if self.is_declared(name) {
            Ok(())
        } else {
            Err(ScopeError::UndeclaredIdentifier {
                name: name.to_string(),
                span,
            })
        }
    }

    pub fn check_block(&mut self, body: &[Spanned<Stmt>]) -> Result<(), ScopeError> {
        self.push_scope();
        let result = body.iter().try_for_each(|stmt| self.check_stmt(stmt));
        self.pop_scope();
        result
    }

    pub fn check_stmt(&mut self, (stmt, _): &Spanned<Stmt>) -> Result<(), ScopeError> {
        match stmt {
            Stmt::Print { expression } => self.check_expr(expression),
            Stmt::VariableDeclaration { name, initializer } => {
                // the initializer cannot see the name being declared
                self.check_expr(initializer)?;
                self.declare(&name.0, name.1)
            }
            Stmt::VariableAssignment { name, value } => {
                self.resolve(&name.0, name.1)?;
                self.check_expr(value)
            }
            Stmt::If { condition, body } | Stmt::While { condition, body } => {
                self.check_expr(condition)?;
                self.check_block(body)
            }
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                self.push_scope();
                let result = self
                    .check_stmt(initializer)
                    .and_then(|_| self.check_expr(condition))
                    .and_then(|_| self.check_stmt(increment))
                    .and_then(|_| self.check_block(body));
                self.pop_scope();
                result
            }
        }
    }

    pub fn check_expr(&self, (expr, span): &Spanned<Expr>) -> Result<(), ScopeError> {
        match expr {
            Expr::Number(_) => Ok(()),
            Expr::Identifier(name) => self.resolve(name, *span),
            Expr::BinOp {
                l_value, r_value, ..
            } => {
                self.check_expr(l_value)?;
                self.check_expr(r_value)
            }
        }
    }
}

/// Checks that every name is declared before use and never declared twice
/// in the same scope.
pub fn check(statements: &[Spanned<Stmt>]) -> Result<(), ScopeError> {
    let mut scopes = ScopeStack::new();
    for stmt in statements {
        scopes.check_stmt(stmt)?;
    }
    debug!(statements = statements.len(), "scope check passed");
    Ok(())
}
