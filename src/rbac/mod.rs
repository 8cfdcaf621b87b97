//! Role-based access control over per-resource ACLs.

pub mod engine;
pub mod hooks;
pub mod model;
pub mod roles;

pub use engine::AuthorizationEngine;
pub use hooks::{AuditEvent, AuditHook, FileAuditLog, HookRegistry, MemoryAuditLog};
pub use model::{AccessControlEntry, Security, same_identity};
pub use roles::*;
