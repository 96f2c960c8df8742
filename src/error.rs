use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-visible failures. Everything else (store errors, signing
/// errors) is `Internal` and surfaces as a 500 with no retry.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(&'static str),
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid token")]
    TokenInvalid,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Not authorized")]
    Forbidden,
    #[error("{0}")]
    BadRequest(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) | ApiError::TokenExpired | ApiError::TokenInvalid => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::Unauthenticated("Not authenticated").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::TokenExpired.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::TokenInvalid.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::NotFound("Board").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::BadRequest("workspace_id required").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("Link already exists").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(ApiError::NotFound("Workspace").to_string(), "Workspace not found");
    }
}
