//! Error model for the authorization engine.
//! Variants carry enough context for a message; `kind()` collapses them into the
//! coarse taxonomy callers map onto their own transport (HTTP, gRPC, ...).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AccessDenied,
    NotFound,
    InvalidRole,
    InvalidInput,
    Storage,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RbacError {
    #[error("RBAC {resource_id} - User does not have permission {permission}")]
    AccessDenied { resource_id: String, permission: String },

    #[error("RBAC {resource_id} - It is forbidden to {action} the last administrator")]
    LastAdministrator { resource_id: String, action: &'static str },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Role {role} does not exist")]
    RoleNotFound { role: String },

    #[error("Entry for user {identity} is duplicated in the access control list")]
    DuplicateIdentity { identity: String },

    #[error("{message}")]
    InvalidInput { message: String },

    #[error("storage failure for {resource_id}: {message}")]
    Storage { resource_id: String, message: String },
}

impl RbacError {
    pub fn not_found(msg: impl Into<String>) -> Self { RbacError::NotFound { message: msg.into() } }
    pub fn invalid_input(msg: impl Into<String>) -> Self { RbacError::InvalidInput { message: msg.into() } }
    pub fn role_not_found(role: impl Into<String>) -> Self { RbacError::RoleNotFound { role: role.into() } }
    pub fn storage(resource_id: impl Into<String>, msg: impl Into<String>) -> Self {
        RbacError::Storage { resource_id: resource_id.into(), message: msg.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RbacError::AccessDenied { .. } | RbacError::LastAdministrator { .. } => ErrorKind::AccessDenied,
            RbacError::NotFound { .. } => ErrorKind::NotFound,
            RbacError::RoleNotFound { .. } => ErrorKind::InvalidRole,
            RbacError::DuplicateIdentity { .. } | RbacError::InvalidInput { .. } => ErrorKind::InvalidInput,
            RbacError::Storage { .. } => ErrorKind::Storage,
        }
    }

    pub fn code_str(&self) -> &'static str {
        match self {
            RbacError::AccessDenied { .. } => "access_denied",
            RbacError::LastAdministrator { .. } => "last_administrator",
            RbacError::NotFound { .. } => "not_found",
            RbacError::RoleNotFound { .. } => "role_not_found",
            RbacError::DuplicateIdentity { .. } => "duplicate_identity",
            RbacError::InvalidInput { .. } => "invalid_input",
            RbacError::Storage { .. } => "storage_error",
        }
    }

    /// Suggested HTTP status for services that expose the engine over REST.
    pub fn http_status(&self) -> u16 {
        match self.kind() {
            ErrorKind::AccessDenied => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidRole | ErrorKind::InvalidInput => 400,
            ErrorKind::Storage => 500,
        }
    }
}

pub type RbacResult<T> = Result<T, RbacError>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
