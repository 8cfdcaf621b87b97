//! Role translation and merge rules applied when mirroring an owner's ACL onto linked resources.

use crate::rbac::{ROLE_NONE, ROLE_USER, ROLE_VALIDATOR, role_rank};

/// Linked resources have no `validator`; it maps to `user`. Everything else passes through.
pub fn default_translation(role: &str) -> String {
    if role == ROLE_VALIDATOR { ROLE_USER.to_string() } else { role.to_string() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Shared resources keep entries granted through another owner.
    Shared,
    /// Identity had no entry to remove.
    Absent,
    /// Value already matches.
    Unchanged,
    /// Change would lower a default the rules protect.
    NeverDowngrade,
}

/// Decide whether a linked resource's default may move from `current` to `target`.
/// `None` means apply.
pub fn default_change(current: &str, target: &str, shared: bool) -> Option<SkipReason> {
    if current == target { return Some(SkipReason::Unchanged); }
    if shared && target == ROLE_NONE { return Some(SkipReason::NeverDowngrade); }
    match (role_rank(current), role_rank(target)) {
        // a lower ranked target implies current sits at or above the viewer floor
        (Some(_), Some(_)) => None,
        // anything beats a private default
        (Some(0), None) => None,
        _ => Some(SkipReason::NeverDowngrade),
    }
}
