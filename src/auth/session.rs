use axum::async_trait;
use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "session_token";
pub const SESSION_TTL_DAYS: i64 = 7;

/// Server-side record backing cookie login, distinct from the
/// stateless bearer tokens.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub session_token: String,
    pub user_id: String,
    pub expires_at: OffsetDateTime,
    pub created_at: OffsetDateTime,
}

impl Session {
    pub async fn find_by_token(db: &PgPool, token: &str) -> anyhow::Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT session_token, user_id, expires_at, created_at
            FROM sessions
            WHERE session_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(db)
        .await?;
        Ok(session)
    }

    /// Replaces every prior session of the user with a fresh one.
    /// At most one live session per user, so delete-all and insert run
    /// in one transaction.
    pub async fn replace_for_user(
        db: &PgPool,
        user_id: &str,
        token: &str,
    ) -> anyhow::Result<Session> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now + Duration::days(SESSION_TTL_DAYS);

        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (session_token, user_id, expires_at, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING session_token, user_id, expires_at, created_at
            "#,
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(user_id = %user_id, "session replaced");
        Ok(session)
    }

    pub async fn delete_by_token(db: &PgPool, token: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE session_token = $1")
            .bind(token)
            .execute(db)
            .await?;
        Ok(())
    }
}

/// Identity payload returned by the third-party session-data endpoint.
/// Unknown fields in the response are discarded.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalSession {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub session_token: Option<String>,
}

#[async_trait]
pub trait SessionExchange: Send + Sync {
    /// Exchanges an opaque X-Session-ID for the identity payload.
    async fn exchange(&self, session_id: &str) -> anyhow::Result<ExternalSession>;
}

pub struct HttpSessionExchange {
    client: reqwest::Client,
    url: String,
}

impl HttpSessionExchange {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait]
impl SessionExchange for HttpSessionExchange {
    async fn exchange(&self, session_id: &str) -> anyhow::Result<ExternalSession> {
        let response = self
            .client
            .get(&self.url)
            .header("X-Session-ID", session_id)
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("session endpoint returned {}", response.status());
        }
        Ok(response.json::<ExternalSession>().await?)
    }
}

/// Fallback token when the identity endpoint supplies none.
pub fn fresh_session_token() -> String {
    format!("session_{}", Uuid::new_v4().simple())
}

/// Cookie carrying the session token: cross-site-sendable so the
/// browser attaches it from the separately hosted frontend.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::None)
        .path("/")
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("session_abc".into());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "session_abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn fresh_token_is_prefixed_and_unique() {
        let a = fresh_session_token();
        let b = fresh_session_token();
        assert!(a.starts_with("session_"));
        assert_eq!(a.len(), "session_".len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn external_session_decoding_ignores_unknown_fields() {
        let json = r#"{
            "email": "a@b.c",
            "name": "A",
            "id": "ext_123",
            "expires_in": 604800
        }"#;
        let ext: ExternalSession = serde_json::from_str(json).expect("decode");
        assert_eq!(ext.email, "a@b.c");
        assert!(ext.picture.is_none());
        assert!(ext.session_token.is_none());
    }
}
