//! RBAC evaluator and ACL mutator.
//!
//! The engine holds no per-resource state. Every call takes the resource's
//! `Security` plus the `RoleTable` for its kind (`RoleTable::common()` is the
//! baseline) and, where the caller matters, an explicit `Caller`.
//!
//! Mutations validate before touching the value, so an `Err` leaves the
//! `Security` exactly as it was.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::RbacConfig;
use crate::error::{RbacError, RbacResult};
use crate::identity::{Caller, PlatformAdminOracle};

use super::hooks::{AuditEvent, AuditHook, FileAuditLog, HookRegistry};
use super::model::{AccessControlEntry, Security};
use super::roles::{Permission, RoleTable};

#[derive(Debug)]
pub struct AuthorizationEngine {
    enabled: bool,
    oracle: PlatformAdminOracle,
    hooks: HookRegistry,
}

impl Default for AuthorizationEngine {
    fn default() -> Self { Self::new(&RbacConfig::default()) }
}

impl AuthorizationEngine {
    pub fn new(cfg: &RbacConfig) -> Self {
        let engine = Self::with_oracle(cfg.enabled, PlatformAdminOracle::from_config(cfg));
        if let Some(path) = &cfg.audit_log_path {
            engine.register_hook(Arc::new(FileAuditLog::new(path.clone())));
        }
        engine
    }

    pub fn with_oracle(enabled: bool, oracle: PlatformAdminOracle) -> Self {
        if !enabled {
            warn!(target: "bastion::rbac", "RBAC enforcement is disabled; every check will succeed");
        }
        Self { enabled, oracle, hooks: HookRegistry::default() }
    }

    pub fn register_hook(&self, hook: Arc<dyn AuditHook>) { self.hooks.register(hook); }

    pub fn is_enforced(&self) -> bool { self.enabled }
    pub fn oracle(&self) -> &PlatformAdminOracle { &self.oracle }

    // ----- construction -----

    /// Validate a freshly built security object and make sure it has an administrator,
    /// promoting or adding `caller` when none of the entries holds the admin role.
    pub fn init_security(&self, security: &mut Security, caller: &Caller, table: &RoleTable) -> RbacResult<()> {
        let mut seen: Vec<String> = Vec::with_capacity(security.acl.len());
        for e in &security.acl {
            let key = e.identity.to_lowercase();
            if seen.contains(&key) {
                return Err(RbacError::DuplicateIdentity { identity: e.identity.clone() });
            }
            seen.push(key);
        }
        if self.get_admin_count(security, table) > 0 { return Ok(()); }

        match security.entry_mut(&caller.identity) {
            Some(e) => e.role = table.admin_role.clone(),
            None => security.acl.push(AccessControlEntry::new(caller.identity.clone(), table.admin_role.clone())),
        }
        info!(target: "bastion::rbac", "init {}: {} set as administrator", security.resource_id, caller.identity);
        self.audit_mutation(security, Some(&caller.identity), "init_security", &caller.identity, &table.admin_role);
        Ok(())
    }

    // ----- evaluation -----

    /// Conditional permission check; never fails.
    pub fn check(&self, security: &Security, permission: &str, table: &RoleTable, caller: &Caller) -> bool {
        let (allowed, reason) = self.decide(security, permission, table, caller);
        debug!(
            target: "bastion::rbac",
            "check {} user={} permission={} allowed={} reason={}",
            security.resource_id, caller.identity, permission, allowed, reason
        );
        if !self.hooks.is_empty() {
            let mut ev = AuditEvent::new(&security.resource_id, permission);
            ev.actor = Some(caller.identity.clone());
            ev.allowed = allowed;
            ev.reason = Some(reason.to_string());
            self.hooks.emit_decision(&ev);
        }
        allowed
    }

    fn decide(&self, security: &Security, permission: &str, table: &RoleTable, caller: &Caller) -> (bool, &'static str) {
        if !self.enabled { return (true, "rbac_disabled"); }
        if self.oracle.admits(caller) { return (true, "platform_admin"); }
        if table.is_admin_role(Self::resolve_role(security, &caller.identity)) { return (true, "resource_admin"); }
        if Self::verify_default(security, permission, table) { return (true, "default_role"); }
        if Self::verify_user(security, permission, table, &caller.identity) { return (true, "identity_role"); }
        (false, "no_permission")
    }

    /// `check`, turned into an error on denial.
    pub fn verify(&self, security: &Security, permission: &str, table: &RoleTable, caller: &Caller) -> RbacResult<()> {
        if self.check(security, permission, table, caller) { return Ok(()); }
        Err(RbacError::AccessDenied { resource_id: security.resource_id.clone(), permission: permission.to_string() })
    }

    /// Role held by `identity`, falling back to the resource default.
    pub fn resolve_role<'a>(security: &'a Security, identity: &str) -> &'a str {
        security.entry(identity).map(|e| e.role.as_str()).unwrap_or(security.default.as_str())
    }

    pub fn verify_permission(permission: &str, role: &str, table: &RoleTable) -> bool { table.grants(role, permission) }

    pub fn verify_default(security: &Security, permission: &str, table: &RoleTable) -> bool {
        Self::verify_permission(permission, &security.default, table)
    }

    pub fn verify_user(security: &Security, permission: &str, table: &RoleTable, identity: &str) -> bool {
        security.entry(identity).is_some_and(|e| Self::verify_permission(permission, &e.role, table))
    }

    /// Granted if either the default role or the identity's own role grants it.
    pub fn verify_rbac(security: &Security, permission: &str, table: &RoleTable, identity: &str) -> bool {
        Self::verify_default(security, permission, table) || Self::verify_user(security, permission, table, identity)
    }

    pub fn is_admin(&self, security: &Security, table: &RoleTable, caller: &Caller) -> bool {
        self.oracle.admits(caller)
            || table.is_admin_role(Self::resolve_role(security, &caller.identity))
    }

    /// Explicit ACL entries holding the admin role; the default role never counts.
    pub fn get_admin_count(&self, security: &Security, table: &RoleTable) -> usize {
        security.acl.iter().filter(|e| table.is_admin_role(&e.role)).count()
    }

    pub fn get_permissions(role: &str, table: &RoleTable) -> BTreeSet<Permission> { table.permissions_for(role) }

    /// Union of what the default and the identity's role grant; everything for administrators.
    pub fn effective_permissions(security: &Security, table: &RoleTable, identity: &str) -> BTreeSet<Permission> {
        let role = Self::resolve_role(security, identity);
        if table.is_admin_role(role) { return table.all_permissions(); }
        let mut out = table.permissions_for(&security.default);
        out.extend(table.permissions_for(role));
        out
    }

    // ----- lookups -----

    pub fn get_users(security: &Security) -> Vec<String> {
        security.acl.iter().map(|e| e.identity.clone()).collect()
    }

    pub fn get_access_control<'a>(security: &'a Security, identity: &str) -> RbacResult<&'a AccessControlEntry> {
        Self::check_user_exists(security, identity, &format!("User {} not found in {} component", identity, security.resource_id))
    }

    pub fn check_user_exists<'a>(security: &'a Security, identity: &str, message: &str) -> RbacResult<&'a AccessControlEntry> {
        security.entry(identity).ok_or_else(|| RbacError::not_found(message))
    }

    // ----- mutation -----

    pub fn set_default(&self, security: &mut Security, role: &str, table: &RoleTable) -> RbacResult<()> {
        if !table.is_valid_role(role) { return Err(RbacError::role_not_found(role)); }
        security.default = role.to_string();
        info!(target: "bastion::rbac", "set default {} -> {}", security.resource_id, role);
        self.audit_mutation(security, None, "set_default", "", role);
        Ok(())
    }

    pub fn set_user_role(&self, security: &mut Security, identity: &str, role: &str, table: &RoleTable) -> RbacResult<()> {
        if !table.is_valid_role(role) { return Err(RbacError::role_not_found(role)); }
        let demotes_admin = security.entry(identity).is_some_and(|e| table.is_admin_role(&e.role)) && !table.is_admin_role(role);
        if demotes_admin && self.get_admin_count(security, table) == 1 {
            warn!(target: "bastion::rbac", "refusing to demote last administrator {} on {}", identity, security.resource_id);
            return Err(RbacError::LastAdministrator { resource_id: security.resource_id.clone(), action: "unset" });
        }
        match security.entry_mut(identity) {
            Some(e) => e.role = role.to_string(),
            None => security.acl.push(AccessControlEntry::new(identity, role)),
        }
        info!(target: "bastion::rbac", "set role {} on {} -> {}", identity, security.resource_id, role);
        self.audit_mutation(security, None, "set_user_role", identity, role);
        Ok(())
    }

    /// Like `set_user_role`, but unless `caller` already administers `security`, the
    /// identity must already appear in the parent's ACL.
    pub fn add_user_role(
        &self,
        parent: &Security,
        security: &mut Security,
        identity: &str,
        role: &str,
        table: &RoleTable,
        caller: &Caller,
    ) -> RbacResult<()> {
        if !self.is_admin(security, table, caller) && !parent.contains(identity) {
            return Err(RbacError::not_found(format!("User {} not found in parent {} component", identity, parent.resource_id)));
        }
        self.set_user_role(security, identity, role, table)
    }

    pub fn remove_user(&self, security: &mut Security, identity: &str, table: &RoleTable) -> RbacResult<()> {
        let Some(idx) = security.position(identity) else {
            return Err(RbacError::not_found(format!("User '{}' not found", identity)));
        };
        if table.is_admin_role(&security.acl[idx].role) && self.get_admin_count(security, table) == 1 {
            warn!(target: "bastion::rbac", "refusing to remove last administrator {} on {}", identity, security.resource_id);
            return Err(RbacError::LastAdministrator { resource_id: security.resource_id.clone(), action: "remove" });
        }
        let removed = security.acl.remove(idx);
        info!(target: "bastion::rbac", "removed {} from {}", removed.identity, security.resource_id);
        self.audit_mutation(security, None, "remove_user", &removed.identity, &removed.role);
        Ok(())
    }

    fn audit_mutation(&self, security: &Security, actor: Option<&str>, action: &str, target: &str, role: &str) {
        if self.hooks.is_empty() { return; }
        let mut ev = AuditEvent::new(&security.resource_id, action);
        ev.actor = actor.map(str::to_string);
        ev.target = (!target.is_empty()).then(|| target.to_string());
        ev.role = Some(role.to_string());
        self.hooks.emit_mutation(&ev);
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
