//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::auth::{self, RegistrationRequest};
use crate::web::dto::{
    ApiResponse, LoginRequest, RegisterRequest, RegisterResponse, UserInfo,
};
use crate::web::error::ApiError;
use crate::web::middleware::CurrentUser;

use super::AppState;

/// POST /api/auth/register - Invite-gated registration.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    let request = RegistrationRequest {
        username: req.username,
        password: req.password,
        confirm_password: req.confirm_password,
        invite_code: req.invite_code,
        campus: req.campus,
        school_type: req.school_type,
        graduation_year: req.graduation_year,
        class_name: req.class_name,
    };

    let user = auth::register(&state.db, request, state.codes_per_user).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(RegisterResponse { user_id: user.id })),
    ))
}

/// POST /api/auth/login - User login.
///
/// On success a session cookie is set with the configured lifetime. The
/// failure message never distinguishes an unknown username from a wrong
/// password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<UserInfo>>), ApiError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Username and password are required"));
    }

    let user = auth::authenticate(state.db.pool(), &req.username, &req.password)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    let session =
        auth::create_session(state.db.pool(), user.id, state.session_expiry_days).await?;

    let cookie = Cookie::build((state.cookie_name.clone(), session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(state.session_expiry_days))
        .build();

    Ok((jar.add(cookie), Json(ApiResponse::new(UserInfo::from(&user)))))
}

/// POST /api/auth/logout - User logout.
///
/// Destroys the server-side session and clears the cookie. Idempotent:
/// logging out without a session succeeds.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<()>>), ApiError> {
    if let Some(cookie) = jar.get(&state.cookie_name) {
        auth::destroy_session(state.db.pool(), cookie.value()).await?;
    }

    let removal = Cookie::build((state.cookie_name.clone(), "")).path("/").build();
    Ok((jar.remove(removal), Json(ApiResponse::new(()))))
}

/// GET /api/auth/me - Current user info.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<UserInfo>> {
    Json(ApiResponse::new(UserInfo::from(&user)))
}
