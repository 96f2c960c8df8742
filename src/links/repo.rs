use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres};
use time::OffsetDateTime;

pub const DEFAULT_LINK_COLOR: &str = "#6B7280";

/// A directed, typed relation between two cards. `board_id` is fixed at
/// creation to the source card's board; a link never spans boards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub link_id: String,
    pub source_card_id: String,
    pub target_card_id: String,
    pub link_type: String,
    pub label: Option<String>,
    pub color: String,
    pub line_style: String,
    pub board_id: String,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

const LINK_COLUMNS: &str = "link_id, source_card_id, target_card_id, link_type, label, \
     color, line_style, board_id, created_by, created_at";

impl Link {
    /// Generic over the executor so imports can run it inside their own
    /// transaction.
    pub async fn insert<'e, E>(executor: E, link: &Link) -> anyhow::Result<()>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO links (link_id, source_card_id, target_card_id, link_type, label,
                               color, line_style, board_id, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&link.link_id)
        .bind(&link.source_card_id)
        .bind(&link.target_card_id)
        .bind(&link.link_type)
        .bind(&link.label)
        .bind(&link.color)
        .bind(&link.line_style)
        .bind(&link.board_id)
        .bind(&link.created_by)
        .bind(link.created_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn list_for_board(db: &PgPool, board_id: &str) -> anyhow::Result<Vec<Link>> {
        let rows = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE board_id = $1 LIMIT 1000"
        ))
        .bind(board_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, link_id: &str) -> anyhow::Result<Option<Link>> {
        let link = sqlx::query_as::<_, Link>(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE link_id = $1"
        ))
        .bind(link_id)
        .fetch_optional(db)
        .await?;
        Ok(link)
    }

    /// Duplicate check is on the ordered pair: A→B blocks another A→B
    /// but not B→A.
    pub async fn pair_exists(db: &PgPool, source: &str, target: &str) -> anyhow::Result<bool> {
        let existing: Option<String> = sqlx::query_scalar(
            "SELECT link_id FROM links WHERE source_card_id = $1 AND target_card_id = $2",
        )
        .bind(source)
        .bind(target)
        .fetch_optional(db)
        .await?;
        Ok(existing.is_some())
    }

    pub async fn delete(db: &PgPool, link_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM links WHERE link_id = $1")
            .bind(link_id)
            .execute(db)
            .await?;
        Ok(())
    }
}
