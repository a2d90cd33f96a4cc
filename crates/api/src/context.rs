use procura_auth::Principal;

/// Principal context for a request (authenticated identity + roles).
///
/// Inserted by the identity middleware; must be present on all protected
/// routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
