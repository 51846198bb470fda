use super::*;
use crate::net::types::Permissions;

fn user(is_admin: bool, permissions: Permissions) -> User {
    User {
        id: 1,
        username: "ada".into(),
        email: None,
        first_name: None,
        last_name: None,
        full_name: None,
        display_name: None,
        is_admin,
        is_active: true,
        permissions,
        created_at: None,
        last_login: None,
    }
}

#[test]
fn capability_names_round_trip_through_from_str() {
    for cap in Capability::ALL {
        assert_eq!(cap.as_str().parse::<Capability>().unwrap(), cap);
        assert_eq!(cap.to_string(), cap.as_str());
    }
}

#[test]
fn capability_parse_is_case_sensitive_and_closed() {
    assert!("Read".parse::<Capability>().is_err());
    assert!("can_create".parse::<Capability>().is_err());
    assert_eq!("purge".parse::<Capability>().unwrap_err().to_string(), "unknown capability: purge");
}

#[test]
fn anonymous_is_denied_everything() {
    for cap in Capability::ALL {
        assert!(!evaluate(None, cap.as_str()), "{cap} should be denied");
    }
}

#[test]
fn read_is_implied_for_any_identity() {
    let u = user(false, Permissions::default());
    assert!(evaluate(Some(&u), "read"));
}

#[test]
fn unknown_capabilities_are_denied_even_for_admins() {
    let u = user(true, Permissions { can_edit: true, can_create: true, can_delete: true, can_upload: true });
    for name in ["", "write", "superuser", "READ", "can_admin", " read"] {
        assert!(!evaluate(Some(&u), name), "{name:?} should be denied");
    }
}

#[test]
fn admin_implies_delete_without_explicit_flag() {
    let u = user(true, Permissions::default());
    assert!(grants(&u, Capability::Delete));
    assert!(grants(&u, Capability::Admin));
    assert!(!grants(&u, Capability::Create));
    assert!(!grants(&u, Capability::Upload));
}

#[test]
fn explicit_flags_map_to_capabilities() {
    let u = user(false, Permissions { can_edit: true, can_create: false, can_delete: true, can_upload: true });
    assert!(grants(&u, Capability::Edit));
    assert!(!grants(&u, Capability::Create));
    assert!(grants(&u, Capability::Delete));
    assert!(grants(&u, Capability::Upload));
    assert!(!grants(&u, Capability::Admin));
}

#[test]
fn capability_serializes_as_lowercase_name() {
    assert_eq!(serde_json::to_value(Capability::Upload).unwrap(), serde_json::json!("upload"));
    let cap: Capability = serde_json::from_value(serde_json::json!("admin")).unwrap();
    assert_eq!(cap, Capability::Admin);
}
