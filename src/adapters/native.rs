//! The security block every resource kind embeds in its own document, and the
//! two pure conversions to and from the engine's generic `Security`.

use serde::{Deserialize, Serialize};

use crate::rbac::{AccessControlEntry, ROLE_NONE, Security};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NativeAccessControl {
    pub id: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NativeSecurity {
    #[serde(default = "default_role")]
    pub default: String,
    #[serde(default)]
    pub access_control_list: Vec<NativeAccessControl>,
}

fn default_role() -> String { ROLE_NONE.to_string() }

impl Default for NativeSecurity {
    fn default() -> Self { Self { default: default_role(), access_control_list: Vec::new() } }
}

pub fn to_security(resource_id: &str, native: &NativeSecurity) -> Security {
    Security {
        resource_id: resource_id.to_string(),
        default: native.default.clone(),
        acl: native
            .access_control_list
            .iter()
            .map(|ac| AccessControlEntry::new(ac.id.clone(), ac.role.clone()))
            .collect(),
    }
}

pub fn from_security(security: &Security) -> NativeSecurity {
    NativeSecurity {
        default: security.default.clone(),
        access_control_list: security
            .acl
            .iter()
            .map(|e| NativeAccessControl { id: e.identity.clone(), role: e.role.clone() })
            .collect(),
    }
}
