//! Session authentication middleware.
//!
//! The middleware resolves the session cookie to an [`Identity`] exactly
//! once per request and stores it in the request extensions; handlers
//! receive it through the extractors below instead of reaching into any
//! ambient state.

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

use crate::auth::{require_admin, require_authenticated, session, Identity};
use crate::db::User;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Resolve the request's identity from the session cookie.
///
/// Anonymous requests (no cookie, unknown token, expired session) pass
/// through with [`Identity::Anonymous`]; only storage failures abort the
/// request.
pub async fn resolve_identity(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let identity = match jar.get(&state.cookie_name) {
        Some(cookie) => match session::resolve(state.db.pool(), cookie.value()).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!("Session resolution failed: {}", e);
                return ApiError::internal("An internal error occurred").into_response();
            }
        },
        None => Identity::Anonymous,
    };

    req.extensions_mut().insert(identity);
    next.run(req).await
}

fn identity_from_parts(parts: &Parts) -> Identity {
    parts
        .extensions
        .get::<Identity>()
        .cloned()
        .unwrap_or(Identity::Anonymous)
}

/// Extractor requiring an authenticated user.
///
/// Rejects anonymous requests with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = identity_from_parts(parts);
        let user = require_authenticated(&identity)?;
        Ok(CurrentUser(user.clone()))
    }
}

/// Extractor requiring an authenticated administrator.
///
/// Rejects anonymous requests with 401 and non-admins with the fixed
/// forbidden shape.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = identity_from_parts(parts);
        let user = require_admin(&identity)?;
        Ok(AdminUser(user.clone()))
    }
}
