//! Audit hooks fired by the engine after decisions and ACL mutations.
//! Hooks are observers: they cannot veto and must not panic.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub ts_ms: i64,
    pub resource_id: String,
    /// Caller identity, when the operation had one.
    pub actor: Option<String>,
    /// Permission checked, or mutation name (`set_user_role`, `remove_user`, ...).
    pub action: String,
    /// Identity whose entry was touched by a mutation.
    pub target: Option<String>,
    pub role: Option<String>,
    pub allowed: bool,
    pub reason: Option<String>,
}

impl AuditEvent {
    pub fn new(resource_id: &str, action: &str) -> Self {
        Self {
            ts_ms: chrono::Utc::now().timestamp_millis(),
            resource_id: resource_id.to_string(),
            actor: None,
            action: action.to_string(),
            target: None,
            role: None,
            allowed: true,
            reason: None,
        }
    }
}

pub trait AuditHook: Send + Sync {
    fn on_decision(&self, _ev: &AuditEvent) {}
    fn on_mutation(&self, _ev: &AuditEvent) {}
}

#[derive(Default)]
pub struct HookRegistry {
    hooks: RwLock<Vec<Arc<dyn AuditHook>>>,
}

impl HookRegistry {
    pub fn register(&self, hook: Arc<dyn AuditHook>) { self.hooks.write().push(hook); }

    pub fn len(&self) -> usize { self.hooks.read().len() }
    pub fn is_empty(&self) -> bool { self.hooks.read().is_empty() }

    pub fn emit_decision(&self, ev: &AuditEvent) {
        for h in self.hooks.read().iter() { h.on_decision(ev); }
    }

    pub fn emit_mutation(&self, ev: &AuditEvent) {
        for h in self.hooks.read().iter() { h.on_mutation(ev); }
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry").field("hooks", &self.len()).finish()
    }
}

/// Appends one compact JSON object per event; write errors are ignored.
pub struct FileAuditLog {
    path: String,
}

impl FileAuditLog {
    pub fn new(path: impl Into<String>) -> Self { Self { path: path.into() } }

    fn append(&self, kind: &str, ev: &AuditEvent) {
        let mut obj = match serde_json::to_value(ev) {
            Ok(v) => v,
            Err(_) => return,
        };
        obj["kind"] = serde_json::Value::from(kind);
        if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(&mut f, "{}", obj);
        }
    }
}

impl AuditHook for FileAuditLog {
    fn on_decision(&self, ev: &AuditEvent) { self.append("decision", ev); }
    fn on_mutation(&self, ev: &AuditEvent) { self.append("mutation", ev); }
}

/// Keeps events in memory; handy for tests and for services that batch-ship audit data.
#[derive(Debug, Default)]
pub struct MemoryAuditLog {
    decisions: Mutex<Vec<AuditEvent>>,
    mutations: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditLog {
    pub fn decisions(&self) -> Vec<AuditEvent> { self.decisions.lock().clone() }
    pub fn mutations(&self) -> Vec<AuditEvent> { self.mutations.lock().clone() }
}

impl AuditHook for MemoryAuditLog {
    fn on_decision(&self, ev: &AuditEvent) { self.decisions.lock().push(ev.clone()); }
    fn on_mutation(&self, ev: &AuditEvent) { self.mutations.lock().push(ev.clone()); }
}
