//! Caller identity and platform-level privilege.
//! The engine never reads ambient request state; callers pass a `Caller` explicitly.

mod caller;
mod platform_admin;

pub use caller::Caller;
pub use platform_admin::PlatformAdminOracle;
