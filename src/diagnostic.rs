use crate::lexer::{LexError, Span};
use crate::parser::ParseError;
use crate::scope::ScopeError;

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use thiserror::Error;

use std::ops::Range;

/// Any user-input error the pipeline can stop on.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Scope(#[from] ScopeError),
}

impl CompileError {
    pub fn span(&self) -> Span {
        match self {
            CompileError::Lex(err) => err.span(),
            CompileError::Parse(err) => err.span,
            CompileError::Scope(err) => err.span(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "LexError",
            CompileError::Parse(err) if err.token.is_none() => "EOF",
            CompileError::Parse(_) => "Syntax Error",
            CompileError::Scope(ScopeError::DuplicateDeclaration { .. }) => "DuplicateDeclaration",
            CompileError::Scope(ScopeError::UndeclaredIdentifier { .. }) => "UndeclaredIdentifier",
        }
    }

    fn label(&self) -> String {
        match self {
            CompileError::Lex(err) => format!("no token starts with '{}'", err.character),
            CompileError::Parse(err) => match &err.token {
                Some(token) => format!("unexpected {}", token.kind),
                None => "input ends here".to_string(),
            },
            CompileError::Scope(ScopeError::DuplicateDeclaration { name, .. }) => format!(
                "{} is already declared in this scope",
                Fmt::fg(name, Color::Yellow)
            ),
            CompileError::Scope(ScopeError::UndeclaredIdentifier { name, .. }) => format!(
                "{} is not declared in any enclosing scope",
                Fmt::fg(name, Color::Yellow)
            ),
        }
    }

    fn note(&self) -> Option<String> {
        match self {
            CompileError::Scope(ScopeError::UndeclaredIdentifier { name, .. }) => Some(format!(
                "declare it first with '{} {} = ...;'",
                Fmt::fg("var", Color::Yellow),
                name
            )),
            CompileError::Scope(ScopeError::DuplicateDeclaration { .. }) => Some(
                "a name can be declared again only inside a nested block".to_string(),
            ),
            _ => None,
        }
    }

    pub fn report(&self, file: &str, color: bool) -> Report<'static, (String, Range<usize>)> {
        let span = self.span().range();
        let mut report = Report::build(ReportKind::Error, (file.to_string(), span.clone()))
            .with_config(Config::default().with_color(color))
            .with_code(self.code())
            .with_message(self.to_string())
            .with_label(
                Label::new((file.to_string(), span))
                    .with_message(self.label())
                    .with_color(Color::Red),
            );
        if let Some(note) = self.note() {
            report = report.with_note(note);
        }
        report.finish()
    }

    /// Prints the report for this error to stderr, quoting `source`.
    pub fn eprint(&self, file: &str, source: &str, color: bool) -> std::io::Result<()> {
        self.report(file, color)
            .eprint((file.to_string(), Source::from(source.to_string())))
    }
}
