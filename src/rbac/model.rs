use serde::{Deserialize, Serialize};

use super::roles::{ROLE_NONE, Role};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessControlEntry {
    #[serde(alias = "id")]
    pub identity: String,
    pub role: Role,
}

impl AccessControlEntry {
    pub fn new(identity: impl Into<String>, role: impl Into<Role>) -> Self {
        Self { identity: identity.into(), role: role.into() }
    }
}

/// Generic security object attached to one resource instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub resource_id: String,
    pub default: Role,
    #[serde(default, alias = "accessControlList")]
    pub acl: Vec<AccessControlEntry>,
}

/// Identities compare case-insensitively; storage keeps the original case.
pub fn same_identity(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

impl Security {
    pub fn new(resource_id: impl Into<String>, default: impl Into<Role>) -> Self {
        Self { resource_id: resource_id.into(), default: default.into(), acl: Vec::new() }
    }

    /// A resource nobody but its ACL can see.
    pub fn private(resource_id: impl Into<String>) -> Self { Self::new(resource_id, ROLE_NONE) }

    pub fn with_entry(mut self, identity: impl Into<String>, role: impl Into<Role>) -> Self {
        self.acl.push(AccessControlEntry::new(identity, role));
        self
    }

    pub fn position(&self, identity: &str) -> Option<usize> {
        self.acl.iter().position(|e| same_identity(&e.identity, identity))
    }

    pub fn entry(&self, identity: &str) -> Option<&AccessControlEntry> {
        self.acl.iter().find(|e| same_identity(&e.identity, identity))
    }

    pub fn entry_mut(&mut self, identity: &str) -> Option<&mut AccessControlEntry> {
        self.acl.iter_mut().find(|e| same_identity(&e.identity, identity))
    }

    pub fn contains(&self, identity: &str) -> bool { self.position(identity).is_some() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let s = Security::private("o-1").with_entry("Alice@Example.com", "admin");
        assert!(s.contains("alice@example.com"));
        assert_eq!(s.entry("ALICE@EXAMPLE.COM").map(|e| e.identity.as_str()), Some("Alice@Example.com"));
        assert_eq!(s.position("bob"), None);
    }

    #[test]
    fn accepts_native_field_names() {
        let s: Security = serde_json::from_str(
            r#"{"resourceId":"d-1","default":"viewer","accessControlList":[{"id":"bob","role":"user"}]}"#,
        )
        .unwrap();
        assert_eq!(s.acl, vec![AccessControlEntry::new("bob", "user")]);
        assert_eq!(s.default, "viewer");
    }
}
