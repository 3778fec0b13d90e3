//! Authorization gate integration tests
//!
//! Exercises the full decision algorithm over the public API: unrestricted
//! events, privileged users, user-level grants, and the equivalence of the
//! two grant encodings.

use promote_gate::authz::{AuthzRequest, PermissionIndex, PromotionGate};
use rstest::rstest;
use std::collections::HashMap;
use std::sync::Arc;

fn gate() -> PromotionGate {
    PromotionGate::new(
        ["octopus", "admin"],
        PermissionIndex::from_records(
            "
johndoe,uat,repo1
johndoe,uat,repo2
lucifer,uat,repo1
lucifer,uat,repo2
lucifer,prod,repo1
",
        ),
    )
}

#[rstest]
// unrestricted event bypasses the permission system entirely
#[case("push", "", "", "", true)]
#[case("push", "intruder", "prod", "repo1", true)]
#[case("pull_request", "intruder", "prod", "repo1", true)]
// privileged users may promote anywhere
#[case("promote", "octopus", "", "", true)]
#[case("promote", "admin", "prod", "unknown-repo", true)]
#[case("rollback", "octopus", "prod", "repo9", true)]
// unknown user
#[case("promote", "intruder", "uat", "repo1", false)]
// user-level grants, exact match
#[case("promote", "johndoe", "uat", "repo1", true)]
#[case("promote", "johndoe", "uat", "repo2", true)]
#[case("promote", "johndoe", "prod", "repo1", false)]
#[case("promote", "lucifer", "prod", "repo1", true)]
#[case("promote", "lucifer", "prod", "repo2", false)]
#[case("rollback", "lucifer", "prod", "repo1", true)]
fn decision_scenarios(
    #[case] event: &str,
    #[case] trigger: &str,
    #[case] environment: &str,
    #[case] repo: &str,
    #[case] allowed: bool,
) {
    let req = AuthzRequest::new(event, trigger, environment, repo);
    assert_eq!(gate().validate(&req).is_allowed(), allowed);
}

#[rstest]
// environment matching is exact: neither a prefix of a configured
// environment nor an extension of one may match
#[case("staging", true)]
#[case("stagin", false)]
#[case("staging-fe", false)]
#[case("Staging", false)]
fn exact_environment_matching(#[case] environment: &str, #[case] allowed: bool) {
    let g = PromotionGate::new(
        Vec::<String>::new(),
        PermissionIndex::from_records("any_user,staging,any_repo1"),
    );
    let req = AuthzRequest::new("promote", "any_user", environment, "any_repo1");
    assert_eq!(g.validate(&req).is_allowed(), allowed);
}

#[test]
fn empty_gate_denies_restricted_allows_rest() {
    let g = PromotionGate::new(Vec::<String>::new(), PermissionIndex::new());

    assert!(
        g.validate(&AuthzRequest::new("push", "anyone", "", ""))
            .is_allowed()
    );
    assert!(
        g.validate(&AuthzRequest::new("promote", "anyone", "uat", "repo1"))
            .is_denied()
    );
}

#[test]
fn skip_error_carries_context() {
    let err = gate()
        .require(&AuthzRequest::new("rollback", "intruder", "prod", "repo1"))
        .unwrap_err();
    assert_eq!(err.trigger, "intruder");
    assert_eq!(err.event, "rollback");
    assert!(err.reason.contains("intruder"));
}

#[test]
fn encodings_build_equivalent_gates() {
    let tabular = PermissionIndex::from_records(
        "
johndoe,uat,repo1
johndoe,uat,repo2
lucifer,uat,repo1
lucifer,uat,repo2
lucifer,prod,repo1
",
    );

    let mut per_user = HashMap::new();
    per_user.insert("johndoe".to_string(), "uat[repo1,repo2]".to_string());
    per_user.insert(
        "lucifer".to_string(),
        "uat[repo1,repo2]|prod[repo1]".to_string(),
    );
    let delimited = PermissionIndex::from_user_grants(&per_user);

    assert_eq!(tabular, delimited);

    // and both gates answer identically
    let g1 = PromotionGate::new(["admin"], tabular);
    let g2 = PromotionGate::new(["admin"], delimited);
    for (event, trigger, env, repo) in [
        ("promote", "johndoe", "uat", "repo1"),
        ("promote", "johndoe", "prod", "repo1"),
        ("promote", "lucifer", "prod", "repo2"),
        ("rollback", "admin", "prod", "repo1"),
    ] {
        let req = AuthzRequest::new(event, trigger, env, repo);
        assert_eq!(g1.validate(&req), g2.validate(&req));
    }
}

#[test]
fn malformed_records_do_not_poison_valid_grants() {
    let g = PromotionGate::new(
        Vec::<String>::new(),
        PermissionIndex::from_records(
            "
not-enough-fields
johndoe,uat,repo1
too,many,fields,here
",
        ),
    );

    assert!(
        g.validate(&AuthzRequest::new("promote", "johndoe", "uat", "repo1"))
            .is_allowed()
    );
}

#[test]
fn concurrent_validation() {
    // the gate is immutable after construction; validate from many threads
    let g = Arc::new(gate());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let g = Arc::clone(&g);
            std::thread::spawn(move || {
                for _ in 0..1000 {
                    let req = if i % 2 == 0 {
                        AuthzRequest::new("promote", "johndoe", "uat", "repo1")
                    } else {
                        AuthzRequest::new("promote", "intruder", "uat", "repo1")
                    };
                    assert_eq!(g.validate(&req).is_allowed(), i % 2 == 0);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
