use super::{Address, InternalLoweringError, Quaternion, UNRESOLVED};

pub struct IRValidator;

impl IRValidator {
    /// Every jump must be resolved and land inside the listing, or one past
    /// its end (falling off the program).
    pub fn validate(quaternions: &[Quaternion]) -> Result<(), InternalLoweringError> {
        let len = quaternions.len();
        for (address, quaternion) in quaternions.iter().enumerate() {
            Self::validate_target(address, quaternion.target(), len)?;
        }
        Ok(())
    }

    fn validate_target(
        address: Address,
        target: Option<Address>,
        len: usize,
    ) -> Result<(), InternalLoweringError> {
        match target {
            None => Ok(()),
            Some(UNRESOLVED) => Err(InternalLoweringError::UnpatchedPlaceholder { address }),
            Some(target) if target > len => Err(InternalLoweringError::TargetOutOfRange {
                address,
                target,
                len,
            }),
            Some(_) => Ok(()),
        }
    }
}
