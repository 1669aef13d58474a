//! Registration, role rules, and account updates.

use serde_json::json;

use stockroom_integration_tests::{TestApp, json_body};

#[tokio::test]
async fn first_registration_may_claim_admin() {
    let app = TestApp::spawn("users_bootstrap").await;
    let client = app.client();

    let resp = app.register(&client, "root", "password1", Some("admin")).await;
    assert_eq!(resp.status(), 201);
    let body = json_body(resp).await;
    assert_eq!(body["role"], json!("admin"));
}

#[tokio::test]
async fn concurrent_bootstrap_mints_exactly_one_admin() {
    let app = TestApp::spawn("users_bootstrap_race").await;
    let first_client = app.client();
    let second_client = app.client();

    // Both registrations hit the empty table at once; password hashing
    // leaves a wide window, so only an atomic emptiness guard keeps one out
    let (first, second) = tokio::join!(
        app.register(&first_client, "root_a", "password1", Some("admin")),
        app.register(&second_client, "root_b", "password1", Some("admin")),
    );
    let mut statuses = [first.status().as_u16(), second.status().as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 403]);

    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(&app.pool)
        .await
        .expect("failed to count admins");
    assert_eq!(admins, 1);
}

#[tokio::test]
async fn later_unauthenticated_admin_registration_is_forbidden() {
    let app = TestApp::spawn("users_no_second_bootstrap").await;
    app.bootstrap_admin("root", "password1").await;

    let outsider = app.client();
    let resp = app
        .register(&outsider, "mallory", "password1", Some("admin"))
        .await;
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn client_cannot_self_elevate_to_admin() {
    let app = TestApp::spawn("users_no_self_elevation").await;
    app.bootstrap_admin("root", "password1").await;

    let client = app.client();
    let resp = app.register(&client, "bob", "password1", None).await;
    assert_eq!(resp.status(), 201);
    let resp = app.login(&client, "bob", "password1").await;
    assert_eq!(resp.status(), 200);

    // Logged in as a client, still not allowed to mint an admin
    let resp = app
        .register(&client, "bob2", "password1", Some("admin"))
        .await;
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn admin_can_create_another_admin() {
    let app = TestApp::spawn("users_admin_creates_admin").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = app
        .register(&admin, "deputy", "password1", Some("admin"))
        .await;
    assert_eq!(resp.status(), 201);
    let body = json_body(resp).await;
    assert_eq!(body["role"], json!("admin"));
}

#[tokio::test]
async fn registration_defaults_to_client_role() {
    let app = TestApp::spawn("users_default_role").await;
    let client = app.client();

    let resp = app.register(&client, "alice", "password1", None).await;
    assert_eq!(resp.status(), 201);
    let body = json_body(resp).await;
    assert_eq!(body["role"], json!("client"));
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::spawn("users_duplicate").await;
    let client = app.client();

    let resp = app.register(&client, "alice", "password1", None).await;
    assert_eq!(resp.status(), 201);
    let resp = app.register(&client, "alice", "different1", None).await;
    assert_eq!(resp.status(), 409);
}

#[tokio::test]
async fn registration_rejects_bad_input() {
    let app = TestApp::spawn("users_bad_input").await;
    let client = app.client();

    // Too-short password
    let resp = app.register(&client, "alice", "short", None).await;
    assert_eq!(resp.status(), 422);

    // Username with characters outside the allowed set
    let resp = app.register(&client, "not a name!", "password1", None).await;
    assert_eq!(resp.status(), 422);
}

#[tokio::test]
async fn user_list_is_admin_only_and_hides_hashes() {
    let app = TestApp::spawn("users_list_gated").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let client = app.client();
    app.register(&client, "bob", "password1", None).await;
    app.login(&client, "bob", "password1").await;

    let resp = client
        .get(app.url("/users"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 403);

    let resp = admin
        .get(app.url("/users"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    let users = body.as_array().expect("user list is an array");
    assert_eq!(users.len(), 2);
    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("password_hash").is_none());
    }
}

#[tokio::test]
async fn rename_keeps_the_session_valid() {
    let app = TestApp::spawn("users_rename_session").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = app.login(&admin, "root", "password1").await;
    let me = json_body(resp).await;
    let id = me["id"].as_i64().expect("user id");

    let resp = admin
        .put(app.url(&format!("/users/{id}")))
        .json(&json!({ "username": "superroot" }))
        .send()
        .await
        .expect("rename request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["username"], json!("superroot"));

    // The session resolves by immutable id, so the rename doesn't log us out
    let resp = admin
        .get(app.url("/users"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn password_update_takes_effect_on_next_login() {
    let app = TestApp::spawn("users_password_update").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = app.register(&admin, "bob", "password1", None).await;
    let bob = json_body(resp).await;
    let bob_id = bob["id"].as_i64().expect("user id");

    let resp = admin
        .put(app.url(&format!("/users/{bob_id}")))
        .json(&json!({ "password": "brandnew1" }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), 200);

    let bob_client = app.client();
    let resp = app.login(&bob_client, "bob", "password1").await;
    assert_eq!(resp.status(), 401);
    let resp = app.login(&bob_client, "bob", "brandnew1").await;
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn deleting_a_user_kills_their_live_session() {
    let app = TestApp::spawn("users_delete_kills_session").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = app.register(&admin, "deputy", "password1", Some("admin")).await;
    let deputy = json_body(resp).await;
    let deputy_id = deputy["id"].as_i64().expect("user id");

    let deputy_client = app.client();
    let resp = app.login(&deputy_client, "deputy", "password1").await;
    assert_eq!(resp.status(), 200);
    let resp = deputy_client
        .get(app.url("/users"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 200);

    let resp = admin
        .delete(app.url(&format!("/users/{deputy_id}")))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 200);

    // Every request resolves the identity fresh from the database, so the
    // deleted account's still-open session stops working immediately
    let resp = deputy_client
        .get(app.url("/users"))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn user_deletion_is_not_audit_logged() {
    let app = TestApp::spawn("users_delete_no_audit").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = app.register(&admin, "bob", "password1", None).await;
    let bob = json_body(resp).await;
    let bob_id = bob["id"].as_i64().expect("user id");

    let resp = admin
        .delete(app.url(&format!("/users/{bob_id}")))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 200);

    // Only catalog destruction feeds the audit trail
    assert_eq!(app.audit_count().await, 0);
}

#[tokio::test]
async fn deleting_a_missing_user_is_not_found() {
    let app = TestApp::spawn("users_delete_missing").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = admin
        .delete(app.url("/users/9999"))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 404);
}
