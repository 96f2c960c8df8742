use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

/// User record. `password_hash` is NULL for OAuth-only accounts and is
/// never serialized. Users are not deleted by any endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, picture, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, user_id: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, picture, password_hash, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(
        db: &PgPool,
        user_id: &str,
        email: &str,
        name: &str,
        password_hash: Option<&str>,
        picture: Option<&str>,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, email, name, picture, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id, email, name, picture, password_hash, created_at
            "#,
        )
        .bind(user_id)
        .bind(email)
        .bind(name)
        .bind(picture)
        .bind(password_hash)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// OAuth upsert keyed by email: refresh name/picture on an existing
    /// account, otherwise create a password-less one.
    pub async fn upsert_by_email(
        db: &PgPool,
        email: &str,
        name: &str,
        picture: Option<&str>,
    ) -> anyhow::Result<User> {
        if let Some(existing) = Self::find_by_email(db, email).await? {
            let user = sqlx::query_as::<_, User>(
                r#"
                UPDATE users
                SET name = $2, picture = $3
                WHERE user_id = $1
                RETURNING user_id, email, name, picture, password_hash, created_at
                "#,
            )
            .bind(&existing.user_id)
            .bind(name)
            .bind(picture)
            .fetch_one(db)
            .await?;
            return Ok(user);
        }
        Self::create(db, &crate::id::new_id("user"), email, name, None, picture).await
    }
}
