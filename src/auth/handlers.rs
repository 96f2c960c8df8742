use axum::{
    extract::{FromRef, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest, UserProfile},
        extractors::CurrentUser,
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        session::{fresh_session_token, session_cookie, Session, SESSION_COOKIE},
        user::User,
    },
    error::ApiError,
    id::new_id,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/session", post(create_session))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::BadRequest("Invalid email"));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::BadRequest("Password too short"));
    }
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("Email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(
        &state.db,
        &new_id("user"),
        &payload.email,
        &payload.name,
        Some(&hash),
        None,
    )
    .await?;

    let token = JwtKeys::from_ref(&state).sign(&user.user_id)?;

    info!(user_id = %user.user_id, email = %user.email, "user registered");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or(ApiError::Unauthenticated("Invalid credentials"))?;

    // OAuth-only accounts carry no password hash and cannot log in here.
    let Some(hash) = user.password_hash.as_deref() else {
        warn!(user_id = %user.user_id, "password login on password-less account");
        return Err(ApiError::Unauthenticated("Invalid credentials"));
    };
    if !verify_password(&payload.password, hash)? {
        warn!(user_id = %user.user_id, "login invalid password");
        return Err(ApiError::Unauthenticated("Invalid credentials"));
    }

    let token = JwtKeys::from_ref(&state).sign(&user.user_id)?;

    info!(user_id = %user.user_id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Third-party OAuth handoff: trades the X-Session-ID header for user
/// data, upserts the user and replaces their sessions.
#[instrument(skip(state, jar, headers))]
pub async fn create_session(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<(CookieJar, Json<UserProfile>), ApiError> {
    let session_id = headers
        .get("X-Session-ID")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::BadRequest("Session ID required"))?;

    let external = state.oauth.exchange(session_id).await.map_err(|e| {
        warn!(error = %e, "session exchange failed");
        ApiError::Unauthenticated("Invalid session")
    })?;

    let user = User::upsert_by_email(
        &state.db,
        &external.email,
        &external.name,
        external.picture.as_deref(),
    )
    .await?;

    let token = external.session_token.unwrap_or_else(fresh_session_token);
    Session::replace_for_user(&state.db, &user.user_id, &token).await?;

    info!(user_id = %user.user_id, "oauth session created");
    Ok((jar.add(session_cookie(token)), Json(user.into())))
}

#[instrument(skip(user))]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

#[instrument(skip(state, user, jar))]
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        Session::delete_by_token(&state.db, cookie.value()).await?;
    }
    info!(user_id = %user.user_id, "logged out");
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/").build());
    Ok((jar, Json(json!({ "message": "Logged out" }))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("spaces in@example.com"));
    }

    #[test]
    fn profile_serialization_hides_nothing_public() {
        let profile = UserProfile {
            user_id: "user_abc123def456".into(),
            email: "test@example.com".into(),
            name: "Test".into(),
            picture: None,
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("user_abc123def456"));
    }
}
