use crate::ast::{BinOp, Spanned, Stmt};

use thiserror::Error;
use tracing::debug;

use std::fmt::{self, Display, Formatter};
use std::ops::Index;

pub mod builder;
pub mod irvalidator;


pub use builder::{IRBuilder, Placeholder};
pub use irvalidator::IRValidator;

/// Absolute index into a quaternion list.
pub type Address = usize;

/// Target of a jump that has not been backpatched yet.
pub const UNRESOLVED: Address = usize::MAX;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Variable(String),
    Temp(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Assign,
    Binary(BinOp),
}

/// Comparison carried by a conditional jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Greater,
    Less,
    Equal,
    GreaterEq,
    LessEq,
    NotEqual,
}

impl RelOp {
    pub fn from_binop(op: BinOp) -> Option<RelOp> {
        match op {
            BinOp::Greater => Some(RelOp::Greater),
            BinOp::Less => Some(RelOp::Less),
            BinOp::Eq => Some(RelOp::Equal),
            _ => None,
        }
    }

    /// The comparison that holds exactly when `self` does not.
    pub fn negate(self) -> RelOp {
        match self {
            RelOp::Greater => RelOp::LessEq,
            RelOp::Less => RelOp::GreaterEq,
            RelOp::Equal => RelOp::NotEqual,
            RelOp::GreaterEq => RelOp::Less,
            RelOp::LessEq => RelOp::Greater,
            RelOp::NotEqual => RelOp::Equal,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Quaternion {
    Operate {
        op: Op,
        arg1: Operand,
        arg2: Option<Operand>,
        result: Operand,
    },
    Jump {
        target: Address,
    },
    JumpIfZero {
        arg: Operand,
        target: Address,
    },
    JumpIfNonZero {
        arg: Operand,
        target: Address,
    },
    /// Jumps when `arg1 op arg2` holds.
    JumpIfCompare {
        op: RelOp,
        arg1: Operand,
        arg2: Operand,
        target: Address,
    },
}

impl Quaternion {
    pub fn target(&self) -> Option<Address> {
        match self {
            Quaternion::Operate { .. } => None,
            Quaternion::Jump { target }
            | Quaternion::JumpIfZero { target, .. }
            | Quaternion::JumpIfNonZero { target, .. }
            | Quaternion::JumpIfCompare { target, .. } => Some(*target),
        }
    }

    fn target_mut(&mut self) -> Option<&mut Address> {
        match self {
            Quaternion::Operate { .. } => None,
            Quaternion::Jump { target }
            | Quaternion::JumpIfZero { target, .. }
            | Quaternion::JumpIfNonZero { target, .. }
            | Quaternion::JumpIfCompare { target, .. } => Some(target),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InternalLoweringError {
    #[error("jump at {address} was never backpatched")]
    UnpatchedPlaceholder { address: Address },

    #[error("quaternion at {address} is not a pending jump")]
    NotAJump { address: Address },

    #[error("jump at {address} was already backpatched")]
    AlreadyPatched { address: Address },

    #[error("jump at {address} targets {target}, outside 0..={len}")]
    TargetOutOfRange {
        address: Address,
        target: Address,
        len: usize,
    },
}

/// A finished quaternion list with every jump target resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Listing {
    quaternions: Vec<Quaternion>,
}

impl Listing {
    pub fn len(&self) -> usize {
        self.quaternions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quaternions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Quaternion> {
        self.quaternions.iter()
    }

    pub fn as_slice(&self) -> &[Quaternion] {
        &self.quaternions
    }

    pub fn into_vec(self) -> Vec<Quaternion> {
        self.quaternions
    }
}

impl Index<Address> for Listing {
    type Output = Quaternion;

    fn index(&self, address: Address) -> &Quaternion {
        &self.quaternions[address]
    }
}

impl<'a> IntoIterator for &'a Listing {
    type Item = &'a Quaternion;
    type IntoIter = std::slice::Iter<'a, Quaternion>;

    fn into_iter(self) -> Self::IntoIter {
        self.quaternions.iter()
    }
}

/// Lowers a scope-checked program into quaternions.
///
/// Panics on an [`InternalLoweringError`]: that is a bug in the generator,
/// never a problem with the input program.
pub fn lower(statements: &[Spanned<Stmt>]) -> Listing {
    let mut builder = IRBuilder::new();
    match builder
        .lower_program(statements)
        .and_then(|()| builder.finish())
    {
        Ok(listing) => {
            debug!(quaternions = listing.len(), "lowered program");
            listing
        }
        Err(err) => panic!("internal lowering error: {}", err),
    }
}

// Display implementations

impl Display for Operand {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{}", n),
            Operand::Variable(name) => f.write_str(name),
            Operand::Temp(n) => write!(f, "temp{}", n),
        }
    }
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Op::Assign => f.write_str("="),
            Op::Binary(op) => write!(f, "{}", op),
        }
    }
}

impl Display for RelOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            RelOp::Greater => ">",
            RelOp::Less => "<",
            RelOp::Equal => "==",
            RelOp::GreaterEq => ">=",
            RelOp::LessEq => "<=",
            RelOp::NotEqual => "!=",
        };
        f.write_str(symbol)
    }
}

struct TargetDisplay(Address);

impl Display for TargetDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0 == UNRESOLVED {
            f.write_str("?")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Display for Quaternion {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Quaternion::Operate {
                op,
                arg1,
                arg2,
                result,
            } => match arg2 {
                Some(arg2) => write!(f, "({}, {}, {}, {})", op, arg1, arg2, result),
                None => write!(f, "({}, {}, _, {})", op, arg1, result),
            },
            Quaternion::Jump { target } => write!(f, "(j, _, _, {})", TargetDisplay(*target)),
            Quaternion::JumpIfZero { arg, target } => {
                write!(f, "(jez, {}, _, {})", arg, TargetDisplay(*target))
            }
            Quaternion::JumpIfNonZero { arg, target } => {
                write!(f, "(jnz, {}, _, {})", arg, TargetDisplay(*target))
            }
            Quaternion::JumpIfCompare {
                op,
                arg1,
                arg2,
                target,
            } => write!(f, "(j{}, {}, {}, {})", op, arg1, arg2, TargetDisplay(*target)),
        }
    }
}

impl Display for Listing {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (address, quaternion) in self.quaternions.iter().enumerate() {
            writeln!(f, "{}\t{}", address, quaternion)?;
        }
        Ok(())
    }
}
