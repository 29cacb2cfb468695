//! Who may hand out which role.
//!
//! Changing a user's role needs [`Permission::MANAGE_ROLES`]. On top of that a
//! role may only assign roles strictly below its own rank; `Admin` may assign
//! any role, including `Admin`.

use crate::{
    models::user::Role,
    permission::{Permission, PermissionDenied, PermissionEngine},
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleAssignmentError {
    #[error(transparent)]
    MissingPermission(#[from] PermissionDenied),

    #[error("Role {actor} may not assign role {target}")]
    AboveCeiling { actor: Role, target: Role },
}

/// Checks whether `actor` may set another user's role to `target`.
pub fn authorize_role_assignment(
    engine: &PermissionEngine,
    actor: Role,
    target: Role,
) -> Result<(), RoleAssignmentError> {
    engine.require_permission(Permission::MANAGE_ROLES)(actor)?;

    if actor == Role::Admin || target < actor {
        Ok(())
    } else {
        Err(RoleAssignmentError::AboveCeiling { actor, target })
    }
}

pub fn can_assign_role(engine: &PermissionEngine, actor: Role, target: Role) -> bool {
    authorize_role_assignment(engine, actor, target).is_ok()
}

/// Roles `actor` may hand out, least privileged first.
pub fn assignable_roles(engine: &PermissionEngine, actor: Role) -> Vec<Role> {
    Role::ALL
        .into_iter()
        .filter(|target| can_assign_role(engine, actor, *target))
        .collect()
}
