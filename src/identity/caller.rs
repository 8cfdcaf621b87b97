use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The authenticated caller, as resolved by the embedding service for one request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Caller {
    pub identity: String,
    /// Platform-level roles/claims carried by the caller's token.
    #[serde(default)]
    pub token_roles: BTreeSet<String>,
}

impl Caller {
    pub fn new(identity: impl Into<String>) -> Self {
        Self { identity: identity.into(), token_roles: BTreeSet::new() }
    }

    pub fn with_roles<I, S>(identity: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { identity: identity.into(), token_roles: roles.into_iter().map(Into::into).collect() }
    }

    pub fn has_token_role(&self, role: &str) -> bool { self.token_roles.contains(role) }
}
