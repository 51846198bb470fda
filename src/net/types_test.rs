use super::*;

#[test]
fn user_deserializes_full_backend_payload() {
    let json = serde_json::json!({
        "id": 7,
        "username": "ada",
        "email": "ada@example.test",
        "first_name": "Ada",
        "last_name": "Lovelace",
        "full_name": "Ada Lovelace",
        "display_name": "Ada Lovelace (ada)",
        "is_admin": false,
        "is_active": true,
        "permissions": {
            "can_edit": true,
            "can_create": true,
            "can_delete": false,
            "can_upload": true
        },
        "created_at": "2024-01-02T03:04:05",
        "last_login": null
    });

    let user: User = serde_json::from_value(json).unwrap();
    assert_eq!(user.id, 7);
    assert_eq!(user.label(), "Ada Lovelace (ada)");
    assert!(user.permissions.can_edit);
    assert!(!user.permissions.can_delete);
    assert!(user.last_login.is_none());
}

#[test]
fn user_tolerates_missing_permissions_object() {
    let user: User = serde_json::from_value(serde_json::json!({ "id": 1, "username": "bob" })).unwrap();
    assert_eq!(user.permissions, Permissions::default());
    assert!(!user.is_admin);
    assert!(user.is_active);
    assert_eq!(user.label(), "bob");
}

#[test]
fn permissions_tolerate_partial_object() {
    let perms: Permissions = serde_json::from_value(serde_json::json!({ "can_upload": true })).unwrap();
    assert!(perms.can_upload);
    assert!(!perms.can_create);
}

#[test]
fn check_response_without_user_is_anonymous() {
    let body: CheckResponse = serde_json::from_str(r#"{"authenticated": false}"#).unwrap();
    assert!(!body.authenticated);
    assert!(body.user.is_none());
}

#[test]
fn credentials_debug_redacts_password() {
    let creds = Credentials::new("ada", "hunter2");
    let rendered = format!("{creds:?}");
    assert!(rendered.contains("ada"));
    assert!(!rendered.contains("hunter2"));
}

#[test]
fn credentials_serialize_as_login_form() {
    let value = serde_json::to_value(Credentials::new("ada", "pw")).unwrap();
    assert_eq!(value, serde_json::json!({ "username": "ada", "password": "pw" }));
}
