use super::*;
use crate::ast::{Expr, Spanned, Stmt};

use std::collections::BTreeSet;

use tracing::trace;

/// Handle to an emitted jump whose target is still unknown. Patching consumes
/// it, so a handle can be patched at most once.
#[must_use = "a placeholder jump has to be patched"]
#[derive(Debug, PartialEq, Eq)]
pub struct Placeholder(Address);

impl Placeholder {
    pub fn address(&self) -> Address {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct IRBuilder {
    quaternions: Vec<Quaternion>,
    temp_counter: usize,
    unpatched: BTreeSet<Address>,
}

impl IRBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Address the next emitted quaternion will occupy.
    pub fn current_address(&self) -> Address {
        self.quaternions.len()
    }

    pub fn emit(&mut self, quaternion: Quaternion) -> Address {
        let address = self.current_address();
        trace!(address, %quaternion, "emit");
        self.quaternions.push(quaternion);
        address
    }

    /// Emits a jump whose target is [`UNRESOLVED`] and starts tracking it.
    pub fn emit_placeholder(
        &mut self,
        quaternion: Quaternion,
    ) -> Result<Placeholder, InternalLoweringError> {
        if quaternion.target() != Some(UNRESOLVED) {
            return Err(InternalLoweringError::NotAJump {
                address: self.current_address(),
            });
        }
        let address = self.emit(quaternion);
        self.unpatched.insert(address);
        Ok(Placeholder(address))
    }

    pub fn patch(
        &mut self,
        placeholder: Placeholder,
        target: Address,
    ) -> Result<(), InternalLoweringError> {
        let Placeholder(address) = placeholder;
        if !self.unpatched.remove(&address) {
            return Err(InternalLoweringError::AlreadyPatched { address });
        }
        let slot = self
            .quaternions
            .get_mut(address)
            .and_then(Quaternion::target_mut)
            .ok_or(InternalLoweringError::NotAJump { address })?;
        *slot = target;
        trace!(address, target, "backpatch");
        Ok(())
    }

    /// Hands out the finished listing, failing if any jump is left dangling.
    pub fn finish(self) -> Result<Listing, InternalLoweringError> {
        if let Some(&address) = self.unpatched.first() {
            return Err(InternalLoweringError::UnpatchedPlaceholder { address });
        }
        IRValidator::validate(&self.quaternions)?;
        Ok(Listing {
            quaternions: self.quaternions,
        })
    }

    fn new_temp(&mut self) -> Operand {
        let temp = Operand::Temp(self.temp_counter);
        self.temp_counter += 1;
        temp
    }

    pub fn lower_program(&mut self, statements: &[Spanned<Stmt>]) -> Result<(), InternalLoweringError> {
        for stmt in statements {
            self.lower_stmt(stmt)?;
        }
        Ok(())
    }

    fn lower_stmt(&mut self, (stmt, _): &Spanned<Stmt>) -> Result<(), InternalLoweringError> {
        match stmt {
            Stmt::Print { expression } => {
                // print has no quaternion of its own; only its operand is computed
                self.lower_expr(&expression.0);
            }
            Stmt::VariableDeclaration {
                name,
                initializer: value,
            }
            | Stmt::VariableAssignment { name, value } => {
                let value = self.lower_expr(&value.0);
                self.emit(Quaternion::Operate {
                    op: Op::Assign,
                    arg1: value,
                    arg2: None,
                    result: Operand::Variable(name.0.clone()),
                });
            }
            Stmt::If { condition, body } => {
                let skip = self.lower_condition(&condition.0)?;
                self.lower_program(body)?;
                let after = self.current_address();
                self.patch(skip, after)?;
            }
            Stmt::While { condition, body } => self.lower_loop(&condition.0, body, None)?,
            Stmt::For {
                initializer,
                condition,
                increment,
                body,
            } => {
                self.lower_stmt(initializer)?;
                self.lower_loop(&condition.0, body, Some(&**increment))?;
            }
        }
        Ok(())
    }

    fn lower_loop(
        &mut self,
        condition: &Expr,
        body: &[Spanned<Stmt>],
        increment: Option<&Spanned<Stmt>>,
    ) -> Result<(), InternalLoweringError> {
        let start = self.current_address();
        let exit = self.lower_condition(condition)?;
        self.lower_program(body)?;
        if let Some(increment) = increment {
            self.lower_stmt(increment)?;
        }
        self.emit(Quaternion::Jump { target: start });
        let after = self.current_address();
        self.patch(exit, after)
    }

    /// Emits the test for `condition` as a jump taken when it is false.
    fn lower_condition(&mut self, condition: &Expr) -> Result<Placeholder, InternalLoweringError> {
        let relational = match condition {
            Expr::BinOp {
                operator,
                l_value,
                r_value,
            } => RelOp::from_binop(*operator).map(|op| (op, l_value, r_value)),
            _ => None,
        };

        let branch = match relational {
            Some((op, l_value, r_value)) => {
                let arg1 = self.lower_expr(&l_value.0);
                let arg2 = self.lower_expr(&r_value.0);
                Quaternion::JumpIfCompare {
                    op: op.negate(),
                    arg1,
                    arg2,
                    target: UNRESOLVED,
                }
            }
            None => Quaternion::JumpIfZero {
                arg: self.lower_expr(condition),
                target: UNRESOLVED,
            },
        };
        self.emit_placeholder(branch)
    }

    /// Post-order: both operands are computed before the operation using them.
    fn lower_expr(&mut self, expr: &Expr) -> Operand {
        match expr {
            Expr::Number(n) => Operand::Number(*n),
            Expr::Identifier(name) => Operand::Variable(name.clone()),
            Expr::BinOp {
                operator,
                l_value,
                r_value,
            } => {
                let arg1 = self.lower_expr(&l_value.0);
                let arg2 = self.lower_expr(&r_value.0);
                let result = self.new_temp();
                self.emit(Quaternion::Operate {
                    op: Op::Binary(*operator),
                    arg1,
                    arg2: Some(arg2),
                    result: result.clone(),
                });
                result
            }
        }
    }
}
