//! Catalog CRUD and input validation.

use serde_json::json;

use stockroom_integration_tests::{TestApp, json_body};

#[tokio::test]
async fn create_and_list_products() {
    let app = TestApp::spawn("products_create_list").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let widget = app.create_product(&admin, "Widget", 9.99, 5).await;
    assert_eq!(widget["name"], json!("Widget"));
    assert_eq!(widget["price"], json!(9.99));
    assert_eq!(widget["quantity"], json!(5));

    // Listing is public
    let resp = app
        .client()
        .get(app.url("/products"))
        .send()
        .await
        .expect("list request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    let products = body.as_array().expect("product list is an array");
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["name"], json!("Widget"));
}

#[tokio::test]
async fn product_creation_requires_admin() {
    let app = TestApp::spawn("products_create_gated").await;
    app.bootstrap_admin("root", "password1").await;

    let client = app.client();
    app.register(&client, "bob", "password1", None).await;
    app.login(&client, "bob", "password1").await;

    let resp = client
        .post(app.url("/products"))
        .json(&json!({ "name": "Widget", "price": 1.0, "quantity": 1 }))
        .send()
        .await
        .expect("request failed");
    assert_eq!(resp.status(), 403);
}

#[tokio::test]
async fn product_validation_rejects_bad_values() {
    let app = TestApp::spawn("products_validation").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let cases = [
        json!({ "name": "   ", "price": 1.0, "quantity": 1 }),
        json!({ "name": "Widget", "price": -0.01, "quantity": 1 }),
        json!({ "name": "Widget", "price": 1.0, "quantity": -1 }),
    ];

    for body in cases {
        let resp = admin
            .post(app.url("/products"))
            .json(&body)
            .send()
            .await
            .expect("request failed");
        assert_eq!(resp.status(), 422, "accepted invalid body: {body}");
    }

    // Nothing was created
    let resp = admin
        .get(app.url("/products"))
        .send()
        .await
        .expect("list request failed");
    let body = json_body(resp).await;
    assert_eq!(body.as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn sparse_update_keeps_unspecified_fields() {
    let app = TestApp::spawn("products_sparse_update").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let widget = app.create_product(&admin, "Widget", 9.99, 5).await;
    let id = widget["id"].as_i64().expect("product id");

    let resp = admin
        .put(app.url(&format!("/products/{id}")))
        .json(&json!({ "price": 12.5 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["price"], json!(12.5));
    assert_eq!(body["name"], json!("Widget"));
    assert_eq!(body["quantity"], json!(5));
}

#[tokio::test]
async fn update_validates_supplied_fields_only() {
    let app = TestApp::spawn("products_update_validation").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let widget = app.create_product(&admin, "Widget", 9.99, 5).await;
    let id = widget["id"].as_i64().expect("product id");

    let resp = admin
        .put(app.url(&format!("/products/{id}")))
        .json(&json!({ "quantity": -3 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), 422);

    // The stored value is untouched
    let resp = admin
        .get(app.url("/products"))
        .send()
        .await
        .expect("list request failed");
    let body = json_body(resp).await;
    assert_eq!(body[0]["quantity"], json!(5));
}

#[tokio::test]
async fn updating_a_missing_product_is_not_found() {
    let app = TestApp::spawn("products_update_missing").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = admin
        .put(app.url("/products/9999"))
        .json(&json!({ "price": 1.0 }))
        .send()
        .await
        .expect("update request failed");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn owner_endpoint_reports_the_creator() {
    let app = TestApp::spawn("products_owner").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let widget = app.create_product(&admin, "Widget", 9.99, 5).await;
    let id = widget["id"].as_i64().expect("product id");

    // Owner lookup is public
    let resp = app
        .client()
        .get(app.url(&format!("/products/{id}/owner")))
        .send()
        .await
        .expect("owner request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["owner_username"], json!("root"));
    assert_eq!(body["owner_role"], json!("admin"));
}

#[tokio::test]
async fn owner_endpoint_survives_owner_deletion() {
    let app = TestApp::spawn("products_orphaned_owner").await;
    let admin = app.bootstrap_admin("root", "password1").await;

    let resp = app.register(&admin, "deputy", "password1", Some("admin")).await;
    let deputy = json_body(resp).await;
    let deputy_id = deputy["id"].as_i64().expect("user id");

    let deputy_client = app.client();
    app.login(&deputy_client, "deputy", "password1").await;
    let widget = app.create_product(&deputy_client, "Widget", 9.99, 5).await;
    let id = widget["id"].as_i64().expect("product id");

    let resp = admin
        .delete(app.url(&format!("/users/{deputy_id}")))
        .send()
        .await
        .expect("delete request failed");
    assert_eq!(resp.status(), 200);

    // The ownership reference is weak; the product outlives its owner
    let resp = app
        .client()
        .get(app.url(&format!("/products/{id}/owner")))
        .send()
        .await
        .expect("owner request failed");
    assert_eq!(resp.status(), 200);
    let body = json_body(resp).await;
    assert_eq!(body["message"], json!("This product has no owner"));
}

#[tokio::test]
async fn owner_of_missing_product_is_not_found() {
    let app = TestApp::spawn("products_owner_missing").await;

    let resp = app
        .client()
        .get(app.url("/products/9999/owner"))
        .send()
        .await
        .expect("owner request failed");
    assert_eq!(resp.status(), 404);
}
