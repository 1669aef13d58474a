//! Integration test harness for Stockroom.
//!
//! Each test spawns the full production router (session layer, routes,
//! audit transactions) on an ephemeral port, backed by its own named
//! in-memory `SQLite` database, then drives it over HTTP with a
//! cookie-keeping `reqwest` client.
//!
//! # Test Categories
//!
//! - `auth_flow` - Login, logout, and session resolution
//! - `user_management` - Registration, role rules, and account updates
//! - `product_lifecycle` - Catalog CRUD and input validation
//! - `audit_trail` - Deletion auditing, including the concurrent case
//! - `stats` - Aggregate statistics endpoints

#![allow(clippy::missing_panics_doc)]

use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::SqlitePool;

use stockroom_server::{AppState, ServerConfig, app, db};

/// A running server instance backed by its own database.
pub struct TestApp {
    pub base_url: String,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Spawn the app over a fresh named in-memory database.
    ///
    /// The name keeps parallel tests isolated: connections using the same
    /// name share one database, connections using different names never do.
    /// Pass a name unique to the calling test.
    pub async fn spawn(db_name: &str) -> Self {
        let database_url =
            SecretString::from(format!("sqlite:file:{db_name}?mode=memory&cache=shared"));

        let pool = db::create_pool(&database_url)
            .await
            .expect("failed to open test database");
        db::MIGRATOR
            .run(&pool)
            .await
            .expect("failed to run migrations");

        let config = ServerConfig {
            database_url,
            host: "127.0.0.1".parse().expect("valid loopback address"),
            port: 0,
        };
        let state = AppState::new(config, pool.clone());
        let router = app(state).await.expect("failed to build application");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("test server crashed");
        });

        Self {
            base_url: format!("http://{addr}"),
            pool,
        }
    }

    /// A fresh client with its own cookie jar (its own session).
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("failed to build HTTP client")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Register a user through `POST /users`.
    pub async fn register(
        &self,
        client: &Client,
        username: &str,
        password: &str,
        role: Option<&str>,
    ) -> reqwest::Response {
        let mut body = json!({ "username": username, "password": password });
        if let Some(role) = role {
            body["role"] = json!(role);
        }
        client
            .post(self.url("/users"))
            .json(&body)
            .send()
            .await
            .expect("register request failed")
    }

    /// Log in through `POST /auth/login` (form-encoded, like the login page).
    pub async fn login(
        &self,
        client: &Client,
        username: &str,
        password: &str,
    ) -> reqwest::Response {
        client
            .post(self.url("/auth/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("login request failed")
    }

    /// Register the first admin and return a logged-in client for it.
    ///
    /// Relies on first-run bootstrap: with an empty user table, an
    /// unauthenticated registration may claim the admin role.
    pub async fn bootstrap_admin(&self, username: &str, password: &str) -> Client {
        let client = self.client();
        let resp = self
            .register(&client, username, password, Some("admin"))
            .await;
        assert_eq!(resp.status(), 201, "bootstrap admin registration failed");
        let resp = self.login(&client, username, password).await;
        assert_eq!(resp.status(), 200, "bootstrap admin login failed");
        client
    }

    /// Create a product as the given (already authenticated) client.
    pub async fn create_product(
        &self,
        client: &Client,
        name: &str,
        price: f64,
        quantity: i64,
    ) -> Value {
        let resp = client
            .post(self.url("/products"))
            .json(&json!({ "name": name, "price": price, "quantity": quantity }))
            .send()
            .await
            .expect("create product request failed");
        assert_eq!(resp.status(), 201, "product creation failed");
        resp.json().await.expect("product response was not JSON")
    }

    /// Number of rows in the audit log, read straight from the database.
    pub async fn audit_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM audit_log")
            .fetch_one(&self.pool)
            .await
            .expect("failed to count audit rows")
    }
}

/// Decode a response body as JSON.
pub async fn json_body(resp: reqwest::Response) -> Value {
    resp.json().await.expect("response body was not JSON")
}
