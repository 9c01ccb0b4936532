//! Route-level authorization guards.

use crate::error::{AppError, Result};
use crate::middleware::Principal;

/// Admin-only operations.
pub fn ensure_admin(principal: &Principal) -> Result<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin privileges required".to_string()))
    }
}

/// User-scoped operations: the token subject must match the path id.
/// Admins bypass the ownership check.
pub fn ensure_self_or_admin(principal: &Principal, path_id: i64) -> Result<()> {
    if principal.is_admin() || principal.id == path_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You may only access your own resources".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::security::Role;

    fn principal(id: i64, role: Role) -> Principal {
        Principal { id, role }
    }

    #[test]
    fn admin_passes_both_guards() {
        let admin = principal(1, Role::Admin);
        assert!(ensure_admin(&admin).is_ok());
        assert!(ensure_self_or_admin(&admin, 999).is_ok());
    }

    #[test]
    fn user_passes_ownership_check_only_for_own_id() {
        let user = principal(7, Role::User);
        assert!(ensure_self_or_admin(&user, 7).is_ok());
        assert!(matches!(
            ensure_self_or_admin(&user, 8),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn user_is_not_admin() {
        let user = principal(7, Role::User);
        assert!(matches!(ensure_admin(&user), Err(AppError::Forbidden(_))));
    }
}
