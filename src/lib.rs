//! Resource-level RBAC for a multi-tenant platform.
//!
//! Every resource carries a [`rbac::Security`]: a default role plus an ACL.
//! [`rbac::AuthorizationEngine`] answers permission checks and edits ACLs while
//! keeping an administrator in place; [`propagation::SecurityPropagator`] mirrors
//! those edits onto linked resources.

pub mod adapters;
pub mod config;
pub mod error;
pub mod identity;
pub mod observability;
pub mod propagation;
pub mod rbac;

pub use error::{ErrorKind, RbacError, RbacResult};
