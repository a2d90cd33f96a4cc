//! Approval ladder levels.

use serde::{Deserialize, Serialize};

use crate::error::{WorkflowError, WorkflowResult};

/// One rung of the multi-step approval ladder.
///
/// Levels are positive integers; level 0 does not exist. Ordering follows the
/// numeric value, but the engine treats required levels as a set: every
/// configured level must approve, in any order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApprovalLevel(u32);

impl ApprovalLevel {
    pub fn new(level: u32) -> WorkflowResult<Self> {
        if level == 0 {
            return Err(WorkflowError::validation(
                "approval level must be a positive integer",
            ));
        }
        Ok(Self(level))
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for ApprovalLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_level_zero() {
        assert!(ApprovalLevel::new(0).is_err());
        assert_eq!(ApprovalLevel::new(3).map(|l| l.get()), Ok(3));
    }
}
