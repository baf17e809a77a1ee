//! Test helpers for Memwall integration tests.
#![allow(dead_code)]

use axum_test::{TestServer, TestServerConfig};
use serde_json::{json, Value};

use memwall::auth::invite;
use memwall::web::WebServer;
use memwall::{Config, Database, ImageStore};

/// A running test application over an in-memory database.
pub struct TestApp {
    /// HTTP test server with cookie persistence.
    pub server: TestServer,
    /// Handle to the same database the server uses.
    pub db: Database,
    _uploads: tempfile::TempDir,
}

/// Spawn a test application.
///
/// Cookies are saved between requests, so a login call authenticates the
/// requests that follow it.
pub async fn spawn_app() -> TestApp {
    let uploads = tempfile::tempdir().expect("Failed to create uploads dir");

    let mut config = Config::default();
    config.uploads.dir = uploads.path().to_string_lossy().into_owned();

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let images = ImageStore::new(&config.uploads).expect("Failed to create image store");

    let web = WebServer::new(&config, db.clone(), images).expect("Failed to build server");

    let server_config = TestServerConfig {
        save_cookies: true,
        ..TestServerConfig::default()
    };
    let server =
        TestServer::new_with_config(web.router(), server_config).expect("Failed to create server");

    TestApp {
        server,
        db,
        _uploads: uploads,
    }
}

/// Generate a fresh system invite code directly in the database.
pub async fn fresh_invite_code(db: &Database) -> String {
    invite::generate(db.pool(), None)
        .await
        .expect("Failed to generate invite code")
        .code
}

/// Register a user through the API and return the response body.
pub async fn register_user(
    app: &TestApp,
    invite_code: &str,
    username: &str,
    password: &str,
) -> Value {
    let response = app
        .server
        .post("/api/auth/register")
        .json(&json!({
            "invite_code": invite_code,
            "username": username,
            "password": password,
            "confirm_password": password,
            "campus": "East Campus",
            "school_type": "senior",
            "graduation_year": "2025",
            "class_name": "Class 1"
        }))
        .await;

    response.json::<Value>()
}

/// Log in through the API; the session cookie is stored on the server.
pub async fn login_user(app: &TestApp, username: &str, password: &str) -> Value {
    let response = app
        .server
        .post("/api/auth/login")
        .json(&json!({
            "username": username,
            "password": password
        }))
        .await;

    response.json::<Value>()
}

/// Register and log in a user, returning their id.
pub async fn register_and_login(app: &TestApp, username: &str, password: &str) -> i64 {
    let code = fresh_invite_code(&app.db).await;
    let body = register_user(app, &code, username, password).await;
    let user_id = body["data"]["user_id"]
        .as_i64()
        .expect("registration should return a user id");
    login_user(app, username, password).await;
    user_id
}

/// Grant the admin flag to a user directly in the database.
pub async fn promote_to_admin(db: &Database, user_id: i64) {
    sqlx::query("UPDATE users SET is_admin = 1 WHERE id = $1")
        .bind(user_id)
        .execute(db.pool())
        .await
        .expect("Failed to promote user");
}
