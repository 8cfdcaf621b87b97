//! Glue between resource documents and the engine's generic security model.

mod native;
mod store;

pub use native::{NativeAccessControl, NativeSecurity, from_security, to_security};
pub use store::{MemorySecurityStore, SecurityStore};
