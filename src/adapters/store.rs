use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{RbacError, RbacResult};
use crate::rbac::Security;

/// Loads and persists the security of a resource by id. Implemented by the
/// persistence layer of each resource kind.
pub trait SecurityStore: Send + Sync {
    fn load(&self, resource_id: &str) -> RbacResult<Security>;
    fn save(&self, security: &Security) -> RbacResult<()>;
}

/// In-process store. Resources marked shared are reported by `is_shared`.
#[derive(Debug, Clone, Default)]
pub struct MemorySecurityStore {
    inner: Arc<RwLock<HashMap<String, Security>>>,
    shared: Arc<RwLock<HashSet<String>>>,
}

impl MemorySecurityStore {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&self, security: Security) { self.inner.write().insert(security.resource_id.clone(), security); }

    pub fn insert_shared(&self, security: Security) {
        self.shared.write().insert(security.resource_id.clone());
        self.insert(security);
    }

    pub fn get(&self, resource_id: &str) -> Option<Security> { self.inner.read().get(resource_id).cloned() }

    pub fn is_shared(&self, resource_id: &str) -> bool { self.shared.read().contains(resource_id) }

    pub fn shared_predicate(&self) -> impl Fn(&str) -> bool + Send + Sync + 'static {
        let shared = self.shared.clone();
        move |id: &str| shared.read().contains(id)
    }
}

impl SecurityStore for MemorySecurityStore {
    fn load(&self, resource_id: &str) -> RbacResult<Security> {
        self.get(resource_id).ok_or_else(|| RbacError::not_found(format!("Resource {} not found", resource_id)))
    }

    fn save(&self, security: &Security) -> RbacResult<()> {
        let mut w = self.inner.write();
        match w.get_mut(&security.resource_id) {
            Some(slot) => { *slot = security.clone(); Ok(()) }
            None => Err(RbacError::storage(security.resource_id.clone(), "resource no longer exists")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_and_save() {
        let store = MemorySecurityStore::new();
        store.insert(Security::private("d-1"));
        let mut s = store.load("d-1").unwrap();
        s.default = "viewer".into();
        store.save(&s).unwrap();
        assert_eq!(store.get("d-1").unwrap().default, "viewer");
        assert!(store.load("d-2").is_err());
        assert!(store.save(&Security::private("d-2")).is_err());
    }

    #[test]
    fn shared_predicate_tracks_later_inserts() {
        let store = MemorySecurityStore::new();
        let pred = store.shared_predicate();
        assert!(!pred("d-1"));
        store.insert_shared(Security::private("d-1"));
        assert!(pred("d-1"));
        assert!(store.is_shared("d-1"));
    }
}
