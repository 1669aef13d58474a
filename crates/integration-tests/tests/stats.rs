//! Aggregate statistics endpoints.

use serde_json::json;

use stockroom_integration_tests::{TestApp, json_body};

#[tokio::test]
async fn general_stats_count_users_and_products() {
    let app = TestApp::spawn("stats_general").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let client = app.client();
    app.register(&client, "bob", "password1", None).await;

    app.create_product(&admin, "Cheap", 1.0, 100).await;
    app.create_product(&admin, "Expensive", 99.5, 2).await;

    let resp = admin
        .get(app.url("/stats/general"))
        .send()
        .await
        .expect("stats request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;

    assert_eq!(body["users"]["total"], json!(2));
    assert_eq!(body["users"]["admins"], json!(1));
    assert_eq!(body["users"]["clients"], json!(1));

    assert_eq!(body["products"]["total"], json!(2));
    assert_eq!(body["products"]["with_owner"], json!(2));
    assert_eq!(body["products"]["without_owner"], json!(0));
    assert_eq!(body["products"]["total_inventory_value"], json!(299.0));
    assert_eq!(
        body["products"]["most_expensive_product"]["name"],
        json!("Expensive")
    );
    assert_eq!(
        body["products"]["most_stocked_product"]["name"],
        json!("Cheap")
    );
}

#[tokio::test]
async fn general_stats_handle_an_empty_catalog() {
    let app = TestApp::spawn("stats_empty").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = admin
        .get(app.url("/stats/general"))
        .send()
        .await
        .expect("stats request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;

    assert_eq!(body["products"]["total"], json!(0));
    assert!(body["products"]["most_expensive_product"].is_null());
    assert!(body["products"]["most_stocked_product"].is_null());
}

#[tokio::test]
async fn user_products_stats_sort_by_product_count() {
    let app = TestApp::spawn("stats_user_products").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    // A second admin who stocks more products than the first
    let resp = app
        .register(&admin, "deputy", "password1", Some("admin"))
        .await;
    assert_eq!(resp.status(), 201);
    let deputy = app.client();
    app.login(&deputy, "deputy", "password1").await;

    app.create_product(&admin, "Solo", 5.0, 1).await;
    app.create_product(&deputy, "One", 1.0, 1).await;
    app.create_product(&deputy, "Two", 2.0, 3).await;

    let resp = admin
        .get(app.url("/stats/user-products"))
        .send()
        .await
        .expect("stats request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;

    assert_eq!(body["total_users"], json!(2));
    assert_eq!(body["total_products"], json!(3));

    let stats = body["users_stats"].as_array().expect("stats array");
    assert_eq!(stats[0]["username"], json!("deputy"));
    assert_eq!(stats[0]["product_count"], json!(2));
    assert_eq!(stats[0]["total_inventory_value"], json!(7.0));
    assert_eq!(stats[1]["username"], json!("root"));
    assert_eq!(stats[1]["product_count"], json!(1));
}

#[tokio::test]
async fn stats_are_admin_only() {
    let app = TestApp::spawn("stats_gated").await;
    app.bootstrap_admin("root", "password1").await;

    let client = app.client();
    app.register(&client, "bob", "password1", None).await;
    app.login(&client, "bob", "password1").await;

    for path in ["/stats/general", "/stats/user-products"] {
        let resp = client
            .get(app.url(path))
            .send()
            .await
            .expect("stats request failed");
        assert_eq!(resp.status(), 403, "{path} not gated");
    }

    // And unauthenticated callers are told to log in, not that they lack rank
    let anonymous = app.client();
    let resp = anonymous
        .get(app.url("/stats/general"))
        .send()
        .await
        .expect("stats request failed");
    assert_eq!(resp.status(), 401);
}
