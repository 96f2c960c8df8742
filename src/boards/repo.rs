use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use tracing::debug;

/// One entry of a board's ordered status list. Stored as a JSONB
/// sub-document; decoding tolerates missing and unknown fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub order: i32,
}

/// The six statuses every new board starts with.
pub fn default_statuses() -> Vec<Status> {
    [
        ("Idea", "#FBBF24"),
        ("Planned", "#60A5FA"),
        ("In Progress", "#34D399"),
        ("Testing", "#A78BFA"),
        ("Done", "#10B981"),
        ("Archived", "#6B7280"),
    ]
    .iter()
    .enumerate()
    .map(|(order, (name, color))| Status {
        name: (*name).into(),
        color: (*color).into(),
        order: order as i32,
    })
    .collect()
}

/// A canvas with an ordered status list, holding cards and links.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Board {
    pub board_id: String,
    pub name: String,
    pub description: String,
    pub workspace_id: String,
    pub owner_id: String,
    pub statuses: Json<Vec<Status>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Board {
    pub async fn create(
        db: &PgPool,
        board_id: &str,
        name: &str,
        description: &str,
        workspace_id: &str,
        owner_id: &str,
    ) -> anyhow::Result<Board> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (board_id, name, description, workspace_id, owner_id, statuses, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING board_id, name, description, workspace_id, owner_id, statuses, created_at, updated_at
            "#,
        )
        .bind(board_id)
        .bind(name)
        .bind(description)
        .bind(workspace_id)
        .bind(owner_id)
        .bind(Json(default_statuses()))
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(board)
    }

    pub async fn list_for_owner(
        db: &PgPool,
        owner_id: &str,
        workspace_id: Option<&str>,
    ) -> anyhow::Result<Vec<Board>> {
        let rows = sqlx::query_as::<_, Board>(
            r#"
            SELECT board_id, name, description, workspace_id, owner_id, statuses, created_at, updated_at
            FROM boards
            WHERE owner_id = $1 AND ($2::text IS NULL OR workspace_id = $2)
            LIMIT 100
            "#,
        )
        .bind(owner_id)
        .bind(workspace_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_for_owner(
        db: &PgPool,
        board_id: &str,
        owner_id: &str,
    ) -> anyhow::Result<Option<Board>> {
        let board = sqlx::query_as::<_, Board>(
            r#"
            SELECT board_id, name, description, workspace_id, owner_id, statuses, created_at, updated_at
            FROM boards
            WHERE board_id = $1 AND owner_id = $2
            "#,
        )
        .bind(board_id)
        .bind(owner_id)
        .fetch_optional(db)
        .await?;
        Ok(board)
    }

    pub async fn update_partial(
        db: &PgPool,
        board_id: &str,
        name: Option<&str>,
        description: Option<&str>,
        statuses: Option<Vec<Status>>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE boards
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                statuses = COALESCE($4, statuses),
                updated_at = $5
            WHERE board_id = $1
            "#,
        )
        .bind(board_id)
        .bind(name)
        .bind(description)
        .bind(statuses.map(Json))
        .bind(OffsetDateTime::now_utc())
        .execute(db)
        .await?;
        Ok(())
    }

    /// Deletes the board plus its cards and links in one transaction.
    /// Returns false when nothing matched (missing or not owned).
    pub async fn delete_cascade(
        db: &PgPool,
        board_id: &str,
        owner_id: &str,
    ) -> anyhow::Result<bool> {
        let mut tx = db.begin().await?;

        let deleted = sqlx::query("DELETE FROM boards WHERE board_id = $1 AND owner_id = $2")
            .bind(board_id)
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;
        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM cards WHERE board_id = $1")
            .bind(board_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM links WHERE board_id = $1")
            .bind(board_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        debug!(board_id = %board_id, "board cascade deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_statuses_are_six_in_order() {
        let statuses = default_statuses();
        assert_eq!(statuses.len(), 6);
        let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            ["Idea", "Planned", "In Progress", "Testing", "Done", "Archived"]
        );
        for (i, status) in statuses.iter().enumerate() {
            assert_eq!(status.order, i as i32);
            assert!(status.color.starts_with('#'));
        }
    }

    #[test]
    fn status_decoding_is_lenient() {
        let status: Status =
            serde_json::from_str(r#"{"name": "Idea", "wip_limit": 3}"#).expect("decode");
        assert_eq!(status.name, "Idea");
        assert_eq!(status.color, "");
        assert_eq!(status.order, 0);
    }
}
