use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::debug;

pub const DEFAULT_WORKSPACE_COLOR: &str = "#4F46E5";

/// Top-level container owned by one user, holding boards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workspace {
    pub workspace_id: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub owner_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Workspace {
    pub async fn create(
        db: &PgPool,
        workspace_id: &str,
        name: &str,
        description: &str,
        color: &str,
        owner_id: &str,
    ) -> anyhow::Result<Workspace> {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            INSERT INTO workspaces (workspace_id, name, description, color, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING workspace_id, name, description, color, owner_id, created_at, updated_at
            "#,
        )
        .bind(workspace_id)
        .bind(name)
        .bind(description)
        .bind(color)
        .bind(owner_id)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(workspace)
    }

    pub async fn list_for_owner(db: &PgPool, owner_id: &str) -> anyhow::Result<Vec<Workspace>> {
        let rows = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT workspace_id, name, description, color, owner_id, created_at, updated_at
            FROM workspaces
            WHERE owner_id = $1
            LIMIT 100
            "#,
        )
        .bind(owner_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Missing and not-owned are indistinguishable on purpose.
    pub async fn find_for_owner(
        db: &PgPool,
        workspace_id: &str,
        owner_id: &str,
    ) -> anyhow::Result<Option<Workspace>> {
        let workspace = sqlx::query_as::<_, Workspace>(
            r#"
            SELECT workspace_id, name, description, color, owner_id, created_at, updated_at
            FROM workspaces
            WHERE workspace_id = $1 AND owner_id = $2
            "#,
        )
        .bind(workspace_id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(workspace)
    }

    /// Deletes the workspace and everything under it: its boards, their
    /// cards, their links. One transaction; ownership is checked by the
    /// delete's own matched count, not a pre-read. Returns false when
    /// nothing matched.
    pub async fn delete_cascade(
        db: &PgPool,
        workspace_id: &str,
        owner_id: &str,
    ) -> anyhow::Result<bool> {
        let mut tx = db.begin().await?;

        let deleted = sqlx::query("DELETE FROM workspaces WHERE workspace_id = $1 AND owner_id = $2")
            .bind(workspace_id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        let board_ids: Vec<String> =
            sqlx::query_scalar("SELECT board_id FROM boards WHERE workspace_id = $1")
                .bind(workspace_id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM boards WHERE workspace_id = $1")
            .bind(workspace_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM cards WHERE board_id = ANY($1)")
            .bind(&board_ids)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM links WHERE board_id = ANY($1)")
            .bind(&board_ids)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(workspace_id = %workspace_id, boards = board_ids.len(), "workspace cascade deleted");
        Ok(true)
    }
}
