//! Property tests over random ACL edit sequences.

use bastion::identity::Caller;
use bastion::rbac::*;
use proptest::prelude::*;

const IDENTITIES: [&str; 4] = ["alice", "Bob", "carol@x.io", "DAVE"];
const ROLES: [&str; 5] = [ROLE_NONE, ROLE_VIEWER, ROLE_USER, ROLE_EDITOR, ROLE_ADMIN];

#[derive(Debug, Clone)]
enum Op {
    SetRole(usize, usize),
    Remove(usize),
    SetDefault(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..IDENTITIES.len(), 0..ROLES.len()).prop_map(|(i, r)| Op::SetRole(i, r)),
        (0..IDENTITIES.len()).prop_map(Op::Remove),
        (0..ROLES.len()).prop_map(Op::SetDefault),
    ]
}

fn flip_case(s: &str) -> String {
    s.chars().map(|c| if c.is_uppercase() { c.to_ascii_lowercase() } else { c.to_ascii_uppercase() }).collect()
}

proptest! {
    #[test]
    fn acl_always_keeps_an_admin(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let engine = AuthorizationEngine::default();
        let table = RoleTable::common();
        let mut s = Security::private("o-1").with_entry("alice", ROLE_ADMIN);
        for op in ops {
            let _ = match op {
                Op::SetRole(i, r) => engine.set_user_role(&mut s, IDENTITIES[i], ROLES[r], table),
                Op::Remove(i) => engine.remove_user(&mut s, IDENTITIES[i], table),
                Op::SetDefault(r) => engine.set_default(&mut s, ROLES[r], table),
            };
            prop_assert!(engine.get_admin_count(&s, table) >= 1);
        }
    }

    #[test]
    fn role_resolution_ignores_case(i in 0..IDENTITIES.len(), r in 0..ROLES.len()) {
        let s = Security::private("o-1").with_entry(IDENTITIES[i], ROLES[r]);
        let id = IDENTITIES[i];
        prop_assert_eq!(
            AuthorizationEngine::resolve_role(&s, &id.to_lowercase()),
            AuthorizationEngine::resolve_role(&s, &flip_case(id))
        );
    }

    #[test]
    fn default_grants_survive_acl_removals(d in 0..ROLES.len(), r in 0..ROLES.len()) {
        let engine = AuthorizationEngine::default();
        let table = RoleTable::common();
        let mut s = Security::new("o-1", ROLES[d]).with_entry("alice", ROLE_ADMIN).with_entry("bob", ROLES[r]);
        let before: Vec<String> = table.permissions_for(ROLES[d]).into_iter().collect();
        let _ = engine.remove_user(&mut s, "bob", table);
        s.acl.clear();
        for p in before {
            prop_assert!(AuthorizationEngine::verify_rbac(&s, &p, table, "bob"));
        }
    }

    #[test]
    fn init_is_idempotent(entries in proptest::collection::btree_map(0..IDENTITIES.len(), 0..ROLES.len(), 0..4)) {
        let engine = AuthorizationEngine::default();
        let table = RoleTable::common();
        let caller = Caller::new("carol@x.io");
        let mut s = Security::private("o-1");
        for (i, r) in entries {
            s = s.with_entry(IDENTITIES[i], ROLES[r]);
        }
        engine.init_security(&mut s, &caller, table).unwrap();
        let once = s.clone();
        engine.init_security(&mut s, &caller, table).unwrap();
        prop_assert_eq!(s, once);
    }
}
