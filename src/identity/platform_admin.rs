//! Platform-wide administrator bypass, independent of any resource ACL.

use std::collections::BTreeSet;

use crate::config::RbacConfig;

use super::Caller;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformAdminOracle {
    admin_role: String,
    custom_admin_group: Option<String>,
}

impl PlatformAdminOracle {
    pub fn new(admin_role: impl Into<String>, custom_admin_group: Option<String>) -> Self {
        let custom_admin_group = custom_admin_group.filter(|g| !g.trim().is_empty());
        Self { admin_role: admin_role.into(), custom_admin_group }
    }

    pub fn from_config(cfg: &RbacConfig) -> Self {
        Self::new(cfg.platform_admin_role.clone(), cfg.custom_admin_group.clone())
    }

    pub fn admin_role(&self) -> &str { &self.admin_role }
    pub fn custom_admin_group(&self) -> Option<&str> { self.custom_admin_group.as_deref() }

    pub fn is_platform_admin(&self, token_roles: &BTreeSet<String>) -> bool {
        if token_roles.contains(&self.admin_role) { return true; }
        match &self.custom_admin_group {
            Some(group) => token_roles.contains(group),
            None => false,
        }
    }

    pub fn admits(&self, caller: &Caller) -> bool {
        caller.has_token_role(&self.admin_role)
            || self.custom_admin_group.as_deref().is_some_and(|g| caller.has_token_role(g))
    }
}

impl Default for PlatformAdminOracle {
    fn default() -> Self { Self::from_config(&RbacConfig::default()) }
}
