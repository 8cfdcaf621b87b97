//! Role tables: role name -> granted permissions, plus the designated admin role.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type Role = String;
pub type Permission = String;

pub const ROLE_NONE: &str = "none";
pub const ROLE_VIEWER: &str = "viewer";
pub const ROLE_USER: &str = "user";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_VALIDATOR: &str = "validator";
pub const ROLE_ADMIN: &str = "admin";

pub const PERMISSION_READ: &str = "read";
pub const PERMISSION_READ_SECURITY: &str = "read_security";
pub const PERMISSION_CREATE_CHILDREN: &str = "create_children";
pub const PERMISSION_WRITE: &str = "write";
pub const PERMISSION_WRITE_SECURITY: &str = "write_security";
pub const PERMISSION_DELETE: &str = "delete";
pub const PERMISSION_LAUNCH: &str = "launch";
pub const PERMISSION_VALIDATE: &str = "validate";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoleTable {
    pub admin_role: Role,
    pub permissions: BTreeMap<Role, BTreeSet<Permission>>,
}

static COMMON: Lazy<RoleTable> = Lazy::new(|| {
    RoleTable::new(ROLE_ADMIN)
        .with_role(ROLE_VIEWER, [PERMISSION_READ, PERMISSION_READ_SECURITY])
        .with_role(ROLE_USER, [PERMISSION_READ, PERMISSION_READ_SECURITY, PERMISSION_CREATE_CHILDREN])
        .with_role(ROLE_EDITOR, [PERMISSION_READ, PERMISSION_READ_SECURITY, PERMISSION_CREATE_CHILDREN, PERMISSION_WRITE])
        .with_role(ROLE_ADMIN, [
            PERMISSION_READ,
            PERMISSION_READ_SECURITY,
            PERMISSION_CREATE_CHILDREN,
            PERMISSION_WRITE,
            PERMISSION_WRITE_SECURITY,
            PERMISSION_DELETE,
        ])
});

static SCENARIO: Lazy<RoleTable> = Lazy::new(|| {
    RoleTable::new(ROLE_ADMIN)
        .with_role(ROLE_VIEWER, [PERMISSION_READ, PERMISSION_READ_SECURITY])
        .with_role(ROLE_EDITOR, [PERMISSION_READ, PERMISSION_READ_SECURITY, PERMISSION_LAUNCH, PERMISSION_WRITE])
        .with_role(ROLE_VALIDATOR, [
            PERMISSION_READ,
            PERMISSION_READ_SECURITY,
            PERMISSION_LAUNCH,
            PERMISSION_WRITE,
            PERMISSION_VALIDATE,
        ])
        .with_role(ROLE_ADMIN, [
            PERMISSION_READ,
            PERMISSION_READ_SECURITY,
            PERMISSION_LAUNCH,
            PERMISSION_WRITE,
            PERMISSION_VALIDATE,
            PERMISSION_WRITE_SECURITY,
            PERMISSION_DELETE,
        ])
});

static DATASET: Lazy<RoleTable> = Lazy::new(|| {
    RoleTable::new(ROLE_ADMIN)
        .with_role(ROLE_VIEWER, [PERMISSION_READ, PERMISSION_READ_SECURITY])
        .with_role(ROLE_USER, [PERMISSION_READ, PERMISSION_READ_SECURITY, PERMISSION_CREATE_CHILDREN])
        .with_role(ROLE_EDITOR, [PERMISSION_READ, PERMISSION_READ_SECURITY, PERMISSION_CREATE_CHILDREN, PERMISSION_WRITE])
        .with_role(ROLE_ADMIN, [
            PERMISSION_READ,
            PERMISSION_READ_SECURITY,
            PERMISSION_CREATE_CHILDREN,
            PERMISSION_WRITE,
            PERMISSION_WRITE_SECURITY,
            PERMISSION_DELETE,
        ])
});

impl RoleTable {
    pub fn new(admin_role: impl Into<Role>) -> Self {
        Self { admin_role: admin_role.into(), permissions: BTreeMap::new() }
    }

    /// Add or replace a role. Used for built-ins and for caller-defined custom roles alike.
    pub fn with_role<I, S>(mut self, role: impl Into<Role>, granted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Permission>,
    {
        self.permissions.insert(role.into(), granted.into_iter().map(Into::into).collect());
        self
    }

    /// Baseline table used when an operation is not given one.
    pub fn common() -> &'static RoleTable { &COMMON }
    pub fn scenario() -> &'static RoleTable { &SCENARIO }
    pub fn dataset() -> &'static RoleTable { &DATASET }

    pub fn has_role(&self, role: &str) -> bool { self.permissions.contains_key(role) }

    /// `none` is always valid even when the table does not list it.
    pub fn is_valid_role(&self, role: &str) -> bool { role == ROLE_NONE || self.has_role(role) }

    pub fn is_admin_role(&self, role: &str) -> bool { self.admin_role == role }

    pub fn permissions_for(&self, role: &str) -> BTreeSet<Permission> {
        self.permissions.get(role).cloned().unwrap_or_default()
    }

    pub fn grants(&self, role: &str, permission: &str) -> bool {
        self.permissions.get(role).is_some_and(|p| p.contains(permission))
    }

    pub fn role_names(&self) -> Vec<Role> { self.permissions.keys().cloned().collect() }

    /// Every permission any role in the table grants.
    pub fn all_permissions(&self) -> BTreeSet<Permission> {
        self.permissions.values().flat_map(|p| p.iter().cloned()).collect()
    }
}

impl Default for RoleTable {
    fn default() -> Self { RoleTable::common().clone() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Organization,
    Workspace,
    Solution,
    Scenario,
    Runner,
    Dataset,
}

impl ResourceKind {
    pub fn role_table(self) -> &'static RoleTable {
        match self {
            ResourceKind::Scenario | ResourceKind::Runner => RoleTable::scenario(),
            ResourceKind::Dataset => RoleTable::dataset(),
            ResourceKind::Organization | ResourceKind::Workspace | ResourceKind::Solution => RoleTable::common(),
        }
    }
}

/// Fixed ordering `none < viewer < user < editor = validator < admin`.
/// Custom roles have no rank.
pub fn role_rank(role: &str) -> Option<u8> {
    match role {
        ROLE_NONE => Some(0),
        ROLE_VIEWER => Some(1),
        ROLE_USER => Some(2),
        ROLE_EDITOR | ROLE_VALIDATOR => Some(3),
        ROLE_ADMIN => Some(4),
        _ => None,
    }
}
