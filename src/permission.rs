//! Role-based permission engine.
//!
//! Each [`Permission`] is a single bit; a role's grant is the bitwise union
//! of its permissions. The role to permission mapping is a static
//! [`RoleTable`] built at compile time and handed to a [`PermissionEngine`].
//!
//! Bit positions are part of the storage format: never renumber an existing
//! permission, only append new ones.
//!
//! ```
//! use quill::{models::user::Role, permission::{Permission, PermissionEngine}};
//!
//! let engine = PermissionEngine::shipped();
//! assert!(engine.has_permission(Role::Author, Permission::PUBLISH_POSTS));
//! assert!(!engine.has_permission(Role::Editor, Permission::MANAGE_ROLES));
//! ```

use std::fmt;

use bitflags::{Flags, bitflags};

use crate::models::user::Role;

bitflags! {
    /// CMS capabilities. A value may hold a single permission or a set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Permission: u32 {
        const READ_CONTENT        = 1 << 0;
        const CREATE_POSTS        = 1 << 1;
        const EDIT_OWN_POSTS      = 1 << 2;
        const DELETE_OWN_POSTS    = 1 << 3;
        const PUBLISH_POSTS       = 1 << 4;
        const UPLOAD_MEDIA        = 1 << 5;
        const EDIT_OTHERS_POSTS   = 1 << 6;
        const DELETE_OTHERS_POSTS = 1 << 7;
        const MANAGE_CATEGORIES   = 1 << 8;
        const MANAGE_PAGES        = 1 << 9;
        const MODERATE_COMMENTS   = 1 << 10;
        const MANAGE_USERS        = 1 << 11;
        const MANAGE_ROLES        = 1 << 12;
        const MANAGE_THEMES       = 1 << 13;
        const MANAGE_SETTINGS     = 1 << 14;
    }
}

impl Permission {
    /// Names of the permissions in this set, in declaration order.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }

    /// Parses a single permission name, ignoring case.
    ///
    /// ```
    /// use quill::permission::Permission;
    ///
    /// assert_eq!(Permission::parse("publish_posts"), Some(Permission::PUBLISH_POSTS));
    /// assert_eq!(Permission::parse("launch_rockets"), None);
    /// ```
    pub fn parse(name: &str) -> Option<Self> {
        Self::from_name(&name.trim().to_ascii_uppercase())
    }

    /// Parses a list of names into single permissions.
    ///
    /// Returns the recognised permissions (input order) and the names that
    /// matched nothing.
    pub fn parse_list<'a, S: AsRef<str>>(names: &'a [S]) -> (Vec<Self>, Vec<&'a str>) {
        let mut permissions = Vec::new();
        let mut unknown = Vec::new();
        for name in names {
            match Self::parse(name.as_ref()) {
                Some(permission) => permissions.push(permission),
                None => unknown.push(name.as_ref()),
            }
        }
        (permissions, unknown)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "(none)")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

const SUBSCRIBER: Permission = Permission::READ_CONTENT;

const CONTRIBUTOR: Permission = SUBSCRIBER
    .union(Permission::CREATE_POSTS)
    .union(Permission::EDIT_OWN_POSTS)
    .union(Permission::DELETE_OWN_POSTS);

const AUTHOR: Permission = CONTRIBUTOR
    .union(Permission::PUBLISH_POSTS)
    .union(Permission::UPLOAD_MEDIA);

const EDITOR: Permission = AUTHOR
    .union(Permission::EDIT_OTHERS_POSTS)
    .union(Permission::DELETE_OTHERS_POSTS)
    .union(Permission::MANAGE_CATEGORIES)
    .union(Permission::MANAGE_PAGES)
    .union(Permission::MODERATE_COMMENTS);

const ADMIN: Permission = Permission::all();

/// Immutable role to permission-set mapping.
#[derive(Debug)]
pub struct RoleTable {
    entries: &'static [(Role, Permission)],
}

impl RoleTable {
    pub const fn new(entries: &'static [(Role, Permission)]) -> Self {
        Self { entries }
    }

    /// Permission set granted to `role`, or `None` if the table does not
    /// list it.
    pub fn get(&self, role: Role) -> Option<Permission> {
        self.entries
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, permissions)| *permissions)
    }
}

/// The role table this CMS ships with.
pub static SHIPPED_ROLES: RoleTable = RoleTable::new(&[
    (Role::Subscriber, SUBSCRIBER),
    (Role::Contributor, CONTRIBUTOR),
    (Role::Author, AUTHOR),
    (Role::Editor, EDITOR),
    (Role::Admin, ADMIN),
]);

/// Returned by a [`PermissionEngine::require_permission`] guard.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Role {role} lacks permission {required}")]
pub struct PermissionDenied {
    pub role: Role,
    pub required: Permission,
}

/// Answers capability queries against a [`RoleTable`].
///
/// Every query fails closed: a role missing from the table is granted
/// nothing.
#[derive(Debug, Clone, Copy)]
pub struct PermissionEngine {
    table: &'static RoleTable,
}

impl Default for PermissionEngine {
    fn default() -> Self {
        Self::shipped()
    }
}

impl PermissionEngine {
    pub const fn new(table: &'static RoleTable) -> Self {
        Self { table }
    }

    pub const fn shipped() -> Self {
        Self::new(&SHIPPED_ROLES)
    }

    /// True iff `role` holds every bit of `permission`.
    pub fn has_permission(&self, role: Role, permission: Permission) -> bool {
        self.table
            .get(role)
            .is_some_and(|granted| granted.contains(permission))
    }

    /// Like [`has_permission`](Self::has_permission) for a role name handed
    /// over by an identity provider. Unknown names are denied.
    pub fn has_permission_named(&self, role: &str, permission: Permission) -> bool {
        role.parse::<Role>()
            .is_ok_and(|role| self.has_permission(role, permission))
    }

    /// True iff at least one of `permissions` is held. False for an empty list.
    pub fn has_any_permission(&self, role: Role, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.has_permission(role, *p))
    }

    /// True iff every one of `permissions` is held. True for an empty list.
    pub fn has_all_permissions(&self, role: Role, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.has_permission(role, *p))
    }

    /// The single permissions held by `role`, in declaration order.
    pub fn role_permissions(&self, role: Role) -> Vec<Permission> {
        Permission::FLAGS
            .iter()
            .map(|flag| *flag.value())
            .filter(|permission| self.has_permission(role, *permission))
            .collect()
    }

    /// Builds a guard that rejects roles lacking `permission`.
    ///
    /// ```
    /// use quill::{models::user::Role, permission::{Permission, PermissionEngine}};
    ///
    /// let engine = PermissionEngine::shipped();
    /// let can_upload = engine.require_permission(Permission::UPLOAD_MEDIA);
    /// assert!(can_upload(Role::Author).is_ok());
    /// assert!(can_upload(Role::Contributor).is_err());
    /// ```
    pub fn require_permission(
        &self,
        permission: Permission,
    ) -> impl Fn(Role) -> Result<(), PermissionDenied> + Copy {
        let engine = *self;
        move |role| {
            if engine.has_permission(role, permission) {
                Ok(())
            } else {
                Err(PermissionDenied {
                    role,
                    required: permission,
                })
            }
        }
    }
}
