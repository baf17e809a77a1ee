//! Router configuration for the Memwall API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{admin, auth, class, invite, market, post as posts, AppState};
use super::middleware::{create_cors_layer, resolve_identity};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me));

    let invite_routes = Router::new().route("/mine", get(invite::my_codes));

    let admin_routes = Router::new()
        .route("/invites", get(admin::list_system_codes).post(admin::generate_codes));

    let post_routes = Router::new()
        .route("/:id/like", post(posts::like_post))
        .route("/:id/comments", post(posts::comment_post))
        .route("/:id/report", post(posts::report_post));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/invites", invite_routes)
        .nest("/admin", admin_routes)
        .nest("/posts", post_routes)
        .route("/classes", get(class::list_classes).post(class::create_class))
        .route("/classes/:id", get(class::class_detail))
        .route("/classes/:id/posts", post(posts::create_post))
        .route("/market", get(market::list_items).post(market::create_item))
        .route("/market/:id", get(market::item_detail))
        .route("/market/:id/status", post(market::update_item_status));

    // Leave headroom over the raw image size for multipart framing
    let body_limit = app_state.max_upload_bytes + 64 * 1024;

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn_with_state(
                    app_state.clone(),
                    resolve_identity,
                ))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_health_router() {
        let _router = create_health_router();
        // Should not panic
    }
}
