//! Authorization decisions for the tenancy hierarchy.
//!
//! Decisions here are pure functions over the authenticated actor; route
//! handlers translate them into scoped SQL. The one deliberate impurity in
//! the model (assignment role mirroring) lives in the assignment handlers,
//! inside the same transaction as the assignment write.

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::Role;

/// The authenticated actor. Built by the auth middleware from a verified
/// token plus a fresh user row, so the role reflects storage, not the
/// token's snapshot.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub role: Role,
}

/// How far an actor's business queries reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessScope {
    /// Every business in the actor's organization.
    Organization,
    /// Only businesses holding an assignment row for the actor.
    AssignedOnly,
}

/// Org-level owners see the whole organization; everyone else sees only
/// their assigned businesses. Business-level roles never influence this.
pub fn business_scope(actor: &AuthUser) -> BusinessScope {
    match actor.role {
        Role::Owner => BusinessScope::Organization,
        Role::Manager | Role::Staff => BusinessScope::AssignedOnly,
    }
}

/// Last-owner protection: an organization must keep at least one owner.
pub fn ensure_owner_deletable(target_role: Role, org_owner_count: i64) -> AppResult<()> {
    if target_role == Role::Owner && org_owner_count <= 1 {
        return Err(AppError::BadRequest(
            "Cannot delete the last owner in organization".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn owners_scope_to_the_whole_organization() {
        assert_eq!(
            business_scope(&actor(Role::Owner)),
            BusinessScope::Organization
        );
    }

    #[test]
    fn managers_and_staff_scope_to_assignments() {
        assert_eq!(
            business_scope(&actor(Role::Manager)),
            BusinessScope::AssignedOnly
        );
        assert_eq!(
            business_scope(&actor(Role::Staff)),
            BusinessScope::AssignedOnly
        );
    }

    #[test]
    fn last_owner_cannot_be_deleted() {
        let err = ensure_owner_deletable(Role::Owner, 1).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(ensure_owner_deletable(Role::Owner, 0).is_err());
    }

    #[test]
    fn non_last_owners_and_other_roles_are_deletable() {
        assert!(ensure_owner_deletable(Role::Owner, 2).is_ok());
        assert!(ensure_owner_deletable(Role::Manager, 1).is_ok());
        assert!(ensure_owner_deletable(Role::Staff, 1).is_ok());
    }
}
