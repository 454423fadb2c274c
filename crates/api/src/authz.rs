//! API-side authorization guard.
//!
//! Checks run in handlers before the command is invoked; the command and the
//! stores stay auth-agnostic.

use catalog_auth::{AuthzError, Permission, authorize};

use crate::context::PrincipalContext;

/// Require `permission` for the current request principal.
pub fn require(principal: &PrincipalContext, permission: &'static str) -> Result<(), AuthzError> {
    authorize(principal.principal(), &Permission::new(permission))
}

#[cfg(test)]
mod tests {
    use catalog_auth::{PrincipalId, Role};

    use super::*;

    fn context(roles: &[&'static str]) -> PrincipalContext {
        PrincipalContext::new(PrincipalId::new(), roles.iter().map(|r| Role::new(*r)).collect())
    }

    #[test]
    fn product_manager_may_create_brands() {
        assert!(require(&context(&[Role::PRODUCT_MANAGER]), Permission::BRANDS_CREATE).is_ok());
    }

    #[test]
    fn admin_may_do_anything() {
        assert!(require(&context(&[Role::ADMIN]), Permission::BRANDS_CREATE).is_ok());
        assert!(require(&context(&[Role::ADMIN]), Permission::BRANDS_READ).is_ok());
    }

    #[test]
    fn other_roles_are_forbidden() {
        let err = require(&context(&["viewer"]), Permission::BRANDS_CREATE).unwrap_err();
        assert_eq!(err, AuthzError::Forbidden("brands.create".to_string()));
        assert!(require(&context(&[]), Permission::BRANDS_READ).is_err());
    }
}
