//! End-to-end walks through the engine the way a resource service drives it:
//! convert the embedded security block, authorize, mutate, convert back.

use bastion::adapters::{NativeSecurity, from_security, to_security};
use bastion::error::ErrorKind;
use bastion::identity::Caller;
use bastion::rbac::*;

fn engine() -> AuthorizationEngine { AuthorizationEngine::default() }

#[test]
fn init_on_empty_security_makes_caller_admin() {
    let mut s = Security::private("o-1");
    engine().init_security(&mut s, &Caller::new("alice"), RoleTable::common()).unwrap();
    assert_eq!(s.acl, vec![AccessControlEntry::new("alice", "admin")]);
}

#[test]
fn removing_sole_admin_is_denied() {
    let table = RoleTable::new("admin").with_role("admin", ["read", "write"]).with_role("viewer", ["read"]);
    let mut s = Security::private("o-1").with_entry("alice", "admin");
    let err = engine().remove_user(&mut s, "alice", &table).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AccessDenied);
    assert!(err.to_string().contains("last administrator"));
}

#[test]
fn unknown_identity_falls_back_to_default() {
    let s = Security::new("o-1", "viewer").with_entry("alice", "admin");
    assert_eq!(AuthorizationEngine::resolve_role(&s, "bob"), "viewer");
    assert!(AuthorizationEngine::verify_rbac(&s, "read", RoleTable::common(), "bob"));
}

#[test]
fn undefined_role_is_rejected() {
    let mut s = Security::private("o-1").with_entry("alice", "admin");
    let err = engine().set_user_role(&mut s, "alice", "reviewer", RoleTable::common()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRole);
}

#[test]
fn workspace_acl_round_trip_through_native_block() {
    let e = engine();
    let table = ResourceKind::Workspace.role_table();
    let native: NativeSecurity = serde_json::from_str(
        r#"{"default":"none","accessControlList":[{"id":"alice@corp.io","role":"admin"}]}"#,
    )
    .unwrap();
    let mut s = to_security("w-7", &native);
    let alice = Caller::new("Alice@Corp.io");

    e.verify(&s, PERMISSION_WRITE_SECURITY, table, &alice).unwrap();
    e.set_user_role(&mut s, "bob@corp.io", ROLE_EDITOR, table).unwrap();
    e.set_default(&mut s, ROLE_VIEWER, table).unwrap();

    let bob = Caller::new("bob@corp.io");
    e.verify(&s, PERMISSION_WRITE, table, &bob).unwrap();
    assert_eq!(e.verify(&s, PERMISSION_DELETE, table, &bob).unwrap_err().kind(), ErrorKind::AccessDenied);

    let out = from_security(&s);
    assert_eq!(out.default, "viewer");
    assert_eq!(out.access_control_list.len(), 2);
}

#[test]
fn platform_admin_group_from_config() {
    let mut cfg = bastion::config::RbacConfig::default();
    cfg.custom_admin_group = Some("sg-platform".into());
    let e = AuthorizationEngine::new(&cfg);
    let s = Security::private("sol-1").with_entry("alice", "admin");
    let ops = Caller::with_roles("ops-bot", ["sg-platform"]);
    assert!(e.check(&s, PERMISSION_DELETE, ResourceKind::Solution.role_table(), &ops));
    assert!(e.is_admin(&s, ResourceKind::Solution.role_table(), &ops));
}

#[test]
fn audit_log_path_in_config_registers_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("audit.jsonl");
    let cfg = bastion::config::RbacConfig {
        audit_log_path: Some(path.to_string_lossy().to_string()),
        ..Default::default()
    };
    let e = AuthorizationEngine::new(&cfg);
    let mut s = Security::private("o-2");
    e.init_security(&mut s, &Caller::new("alice"), RoleTable::common()).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("init_security"));
}
