use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use axum_extra::extract::CookieJar;
use time::OffsetDateTime;
use tracing::debug;

use crate::auth::jwt::JwtKeys;
use crate::auth::session::{Session, SESSION_COOKIE};
use crate::auth::user::User;
use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller. Resolution order is fixed: session cookie
/// first, bearer token second. A missing, unknown or expired cookie
/// falls through to the bearer path; a bad bearer token fails right
/// there with the token error.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if let Some(session) = Session::find_by_token(&state.db, cookie.value()).await? {
                if session.expires_at > OffsetDateTime::now_utc() {
                    if let Some(user) = User::find_by_id(&state.db, &session.user_id).await? {
                        return Ok(CurrentUser(user));
                    }
                } else {
                    debug!(user_id = %session.user_id, "session cookie expired");
                }
            }
        }

        if let Some(token) = bearer_token(&parts.headers) {
            let keys = JwtKeys::from_ref(state);
            let claims = keys.verify(token)?;
            if let Some(user) = User::find_by_id(&state.db, &claims.sub).await? {
                return Ok(CurrentUser(user));
            }
        }

        Err(ApiError::Unauthenticated("Not authenticated"))
    }
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_extracts_credentials() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc.def.ghi"),
        );
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_rejects_other_schemes() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
