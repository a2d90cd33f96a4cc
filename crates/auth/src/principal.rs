//! Resolved principal identity.

use serde::{Deserialize, Serialize};

use procura_core::{ApprovalLevel, UserId};

use crate::Role;

/// An authenticated user together with its resolved roles.
///
/// Construction is decoupled from transport: the API middleware builds this
/// from identity headers, tests build it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    user_id: UserId,
    roles: Vec<Role>,
}

impl Principal {
    pub fn new(user_id: UserId, roles: Vec<Role>) -> Self {
        Self { user_id, roles }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn is_staff(&self) -> bool {
        self.roles.contains(&Role::Staff)
    }

    pub fn is_finance(&self) -> bool {
        self.roles.contains(&Role::Finance)
    }

    /// Any approver-level role grants the generic approver capability.
    pub fn is_approver(&self) -> bool {
        self.approver_level().is_some()
    }

    /// The level this principal approves at (first approver role wins).
    pub fn approver_level(&self) -> Option<ApprovalLevel> {
        self.roles.iter().find_map(|role| match role {
            Role::ApproverLevel(level) => Some(*level),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approver_level_comes_from_first_approver_role() {
        let l1 = ApprovalLevel::new(1).unwrap();
        let l2 = ApprovalLevel::new(2).unwrap();
        let principal = Principal::new(
            UserId::new(),
            vec![Role::Staff, Role::ApproverLevel(l1), Role::ApproverLevel(l2)],
        );
        assert!(principal.is_approver());
        assert_eq!(principal.approver_level(), Some(l1));
    }

    #[test]
    fn no_roles_means_no_capabilities() {
        let principal = Principal::new(UserId::new(), Vec::new());
        assert!(!principal.is_staff());
        assert!(!principal.is_finance());
        assert!(!principal.is_approver());
    }
}
