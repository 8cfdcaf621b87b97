use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_PLATFORM_ADMIN_ROLE: &str = "Platform.Admin";

pub const ENV_RBAC_ENABLED: &str = "BASTION_RBAC_ENABLED";
pub const ENV_PLATFORM_ADMIN_ROLE: &str = "BASTION_PLATFORM_ADMIN_ROLE";
pub const ENV_ADMIN_GROUP: &str = "BASTION_ADMIN_GROUP";
pub const ENV_AUDIT_LOG: &str = "BASTION_AUDIT_LOG";

/// Engine-wide settings. Unspecified file keys fall back to `Default`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RbacConfig {
    /// Global kill-switch; when false every check succeeds.
    pub enabled: bool,
    /// Token claim granting platform-wide administration.
    pub platform_admin_role: String,
    /// Optional identity-provider group that also counts as platform admin.
    pub custom_admin_group: Option<String>,
    /// Append audit events as JSON lines to this file when set.
    pub audit_log_path: Option<String>,
}

impl Default for RbacConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            platform_admin_role: DEFAULT_PLATFORM_ADMIN_ROLE.to_string(),
            custom_admin_group: None,
            audit_log_path: None,
        }
    }
}

impl RbacConfig {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading rbac config {}", path.display()))?;
        let cfg: RbacConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing rbac config {}", path.display()))?;
        debug!(target: "bastion::config", "loaded rbac config from {}", path.display());
        Ok(cfg.normalized())
    }

    /// Overlay environment variables onto the current values.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|k| std::env::var(k).ok());
    }

    /// Overlay values from an arbitrary lookup (env, CLI flags, tests).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_RBAC_ENABLED) {
            match parse_bool(&raw) {
                Some(v) => self.enabled = v,
                None => warn!(target: "bastion::config", "ignoring {}='{}': not a boolean", ENV_RBAC_ENABLED, raw),
            }
        }
        if let Some(v) = lookup(ENV_PLATFORM_ADMIN_ROLE) {
            if !v.trim().is_empty() { self.platform_admin_role = v.trim().to_string(); }
        }
        if let Some(v) = lookup(ENV_ADMIN_GROUP) { self.custom_admin_group = Some(v); }
        if let Some(v) = lookup(ENV_AUDIT_LOG) { self.audit_log_path = Some(v); }
        *self = std::mem::take(self).normalized();
    }

    fn normalized(mut self) -> Self {
        self.custom_admin_group = self.custom_admin_group.and_then(non_blank);
        self.audit_log_path = self.audit_log_path.and_then(non_blank);
        self
    }
}

fn non_blank(s: String) -> Option<String> {
    let t = s.trim();
    if t.is_empty() { None } else { Some(t.to_string()) }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let m: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k| m.get(k).cloned()
    }

    #[test]
    fn defaults_enable_rbac() {
        let cfg = RbacConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.platform_admin_role, "Platform.Admin");
        assert!(cfg.custom_admin_group.is_none());
    }

    #[test]
    fn overrides_apply_and_blank_group_is_dropped() {
        let mut cfg = RbacConfig::default();
        cfg.apply_overrides(lookup(&[(ENV_RBAC_ENABLED, "Off"), (ENV_ADMIN_GROUP, "   ")]));
        assert!(!cfg.enabled);
        assert!(cfg.custom_admin_group.is_none());

        cfg.apply_overrides(lookup(&[(ENV_ADMIN_GROUP, "csm-admins"), (ENV_RBAC_ENABLED, "maybe")]));
        assert_eq!(cfg.custom_admin_group.as_deref(), Some("csm-admins"));
        // unparsable boolean leaves the previous value alone
        assert!(!cfg.enabled);
    }

    #[test]
    fn json_file_fills_missing_keys_with_defaults() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"custom_admin_group": "ops", "audit_log_path": ""}}"#).unwrap();
        let cfg = RbacConfig::from_json_file(f.path()).unwrap();
        assert!(cfg.enabled);
        assert_eq!(cfg.platform_admin_role, DEFAULT_PLATFORM_ADMIN_ROLE);
        assert_eq!(cfg.custom_admin_group.as_deref(), Some("ops"));
        assert!(cfg.audit_log_path.is_none());
    }

    #[test]
    fn json_file_errors_carry_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = RbacConfig::from_json_file(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("nope.json"));
    }
}
