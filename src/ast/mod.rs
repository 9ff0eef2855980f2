use crate::lexer::Span;

use std::fmt::{self, Display, Formatter};

pub type Spanned<T> = (T, Span);

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Identifier(String),

    BinOp {
        operator: BinOp,
        l_value: Box<Spanned<Expr>>,
        r_value: Box<Spanned<Expr>>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,

    Eq,
    Greater,
    Less,

    And,
}

impl BinOp {
    pub fn from_symbol(symbol: &str) -> Option<BinOp> {
        Some(match symbol {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "==" => BinOp::Eq,
            ">" => BinOp::Greater,
            "<" => BinOp::Less,
            "&&" => BinOp::And,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Greater => ">",
            BinOp::Less => "<",
            BinOp::And => "&&",
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Print {
        expression: Spanned<Expr>,
    },

    VariableDeclaration {
        name: Spanned<String>,
        initializer: Spanned<Expr>,
    },

    VariableAssignment {
        name: Spanned<String>,
        value: Spanned<Expr>,
    },

    If {
        condition: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },

    While {
        condition: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },

    For {
        initializer: Box<Spanned<Stmt>>,
        condition: Spanned<Expr>,
        increment: Box<Spanned<Stmt>>,
        body: Vec<Spanned<Stmt>>,
    },
}

// Source-like rendering, used by `--emit ast` and in test failure output.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Identifier(name) => f.write_str(name),
            Expr::BinOp {
                operator,
                l_value,
                r_value,
            } => write!(f, "({} {} {})", l_value.0, operator, r_value.0),
        }
    }
}

fn write_block(f: &mut Formatter<'_>, body: &[Spanned<Stmt>], depth: usize) -> fmt::Result {
    writeln!(f, "{{")?;
    for (stmt, _) in body {
        write_stmt(f, stmt, depth + 1)?;
        writeln!(f)?;
    }
    write!(f, "{}}}", "    ".repeat(depth))
}

fn write_stmt(f: &mut Formatter<'_>, stmt: &Stmt, depth: usize) -> fmt::Result {
    write!(f, "{}", "    ".repeat(depth))?;
    match stmt {
        Stmt::Print { expression } => write!(f, "print {};", expression.0),
        Stmt::VariableDeclaration { name, initializer } => {
            write!(f, "var {} = {};", name.0, initializer.0)
        }
        Stmt::VariableAssignment { name, value } => write!(f, "{} = {};", name.0, value.0),
        Stmt::If { condition, body } => {
            write!(f, "if {} ", condition.0)?;
            write_block(f, body, depth)
        }
        Stmt::While { condition, body } => {
            write!(f, "while {} ", condition.0)?;
            write_block(f, body, depth)
        }
        Stmt::For {
            initializer,
            condition,
            increment,
            body,
        } => {
            let increment = match &increment.0 {
                Stmt::VariableAssignment { name, value } => format!("{} = {}", name.0, value.0),
                other => format!("{}", other),
            };
            write!(f, "for (")?;
            write_stmt(f, &initializer.0, 0)?;
            write!(f, " {}; {}) ", condition.0, increment)?;
            write_block(f, body, depth)
        }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_stmt(f, self, 0)
    }
}
