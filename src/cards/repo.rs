use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool, Postgres};
use time::OffsetDateTime;
use tracing::debug;

use crate::cards::dto::{CardUpdate, ChecklistItem};

/// A positioned task/idea unit on a board. `status` is free text and is
/// not validated against the board's status list at write time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub card_id: String,
    pub title: String,
    pub description: String,
    pub card_type: String,
    pub status: String,
    pub board_id: String,
    pub position_x: f64,
    pub position_y: f64,
    pub priority: String,
    pub assignees: Json<Vec<String>>,
    pub tags: Json<Vec<String>>,
    pub due_date: Option<String>,
    pub checklist: Json<Vec<ChecklistItem>>,
    pub color: Option<String>,
    pub created_by: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

const CARD_COLUMNS: &str = "card_id, title, description, card_type, status, board_id, \
     position_x, position_y, priority, assignees, tags, due_date, checklist, color, \
     created_by, created_at, updated_at";

impl Card {
    /// Insert a fully built card. Generic over the executor so imports
    /// can run it inside their own transaction.
    pub async fn insert<'e, E>(executor: E, card: &Card) -> anyhow::Result<()>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO cards (card_id, title, description, card_type, status, board_id,
                               position_x, position_y, priority, assignees, tags, due_date,
                               checklist, color, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(&card.card_id)
        .bind(&card.title)
        .bind(&card.description)
        .bind(&card.card_type)
        .bind(&card.status)
        .bind(&card.board_id)
        .bind(card.position_x)
        .bind(card.position_y)
        .bind(&card.priority)
        .bind(&card.assignees)
        .bind(&card.tags)
        .bind(&card.due_date)
        .bind(&card.checklist)
        .bind(&card.color)
        .bind(&card.created_by)
        .bind(card.created_at)
        .bind(card.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Board-scoped listing; the caller has already checked board
    /// ownership.
    pub async fn list_for_board(db: &PgPool, board_id: &str) -> anyhow::Result<Vec<Card>> {
        let rows = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE board_id = $1 LIMIT 1000"
        ))
        .bind(board_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, card_id: &str) -> anyhow::Result<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE card_id = $1"
        ))
        .bind(card_id)
        .fetch_optional(db)
        .await?;
        Ok(card)
    }

    /// Single-card fetch filters on created_by, unlike every other card
    /// read, which goes through the parent board's owner.
    pub async fn find_for_creator(
        db: &PgPool,
        card_id: &str,
        created_by: &str,
    ) -> anyhow::Result<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE card_id = $1 AND created_by = $2"
        ))
        .bind(card_id)
        .bind(created_by)
        .fetch_optional(db)
        .await?;
        Ok(card)
    }

    /// Overwrites only the supplied fields and returns the updated row.
    pub async fn update_partial(
        db: &PgPool,
        card_id: &str,
        upd: CardUpdate,
    ) -> anyhow::Result<Card> {
        let card = sqlx::query_as::<_, Card>(&format!(
            r#"
            UPDATE cards
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                card_type = COALESCE($4, card_type),
                status = COALESCE($5, status),
                position_x = COALESCE($6, position_x),
                position_y = COALESCE($7, position_y),
                priority = COALESCE($8, priority),
                assignees = COALESCE($9, assignees),
                tags = COALESCE($10, tags),
                due_date = COALESCE($11, due_date),
                checklist = COALESCE($12, checklist),
                color = COALESCE($13, color),
                updated_at = $14
            WHERE card_id = $1
            RETURNING {CARD_COLUMNS}
            "#
        ))
        .bind(card_id)
        .bind(upd.title)
        .bind(upd.description)
        .bind(upd.card_type)
        .bind(upd.status)
        .bind(upd.position_x)
        .bind(upd.position_y)
        .bind(upd.priority)
        .bind(upd.assignees.map(Json))
        .bind(upd.tags.map(Json))
        .bind(upd.due_date)
        .bind(upd.checklist.map(Json))
        .bind(upd.color)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db)
        .await?;
        Ok(card)
    }

    /// Deletes the card and every link touching it, in one transaction.
    pub async fn delete_cascade(db: &PgPool, card_id: &str) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM cards WHERE card_id = $1")
            .bind(card_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM links WHERE source_card_id = $1 OR target_card_id = $1")
            .bind(card_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        debug!(card_id = %card_id, "card cascade deleted");
        Ok(())
    }

    /// Case-insensitive substring search over the caller's cards.
    pub async fn search(
        db: &PgPool,
        created_by: &str,
        query: &str,
        board_id: Option<&str>,
    ) -> anyhow::Result<Vec<Card>> {
        let pattern = format!("%{}%", escape_like(query));
        let rows = sqlx::query_as::<_, Card>(&format!(
            r#"
            SELECT {CARD_COLUMNS}
            FROM cards
            WHERE created_by = $1
              AND ($2::text IS NULL OR board_id = $2)
              AND (title ILIKE $3 OR description ILIKE $3 OR tags::text ILIKE $3)
            LIMIT 100
            "#
        ))
        .bind(created_by)
        .bind(board_id)
        .bind(pattern)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}

/// The user's query is data, not pattern syntax.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_like_neutralizes_wildcards() {
        assert_eq!(escape_like("50%_done"), "50\\%\\_done");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn card_serializes_lists_transparently() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let card = Card {
            card_id: "card_abc123def456".into(),
            title: "Ship".into(),
            description: String::new(),
            card_type: "task".into(),
            status: "idea".into(),
            board_id: "board_abc123def456".into(),
            position_x: 10.0,
            position_y: 20.0,
            priority: "medium".into(),
            assignees: Json(vec!["user_1".into()]),
            tags: Json(vec!["backend".into()]),
            due_date: None,
            checklist: Json(vec![]),
            color: None,
            created_by: "user_1".into(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["tags"], serde_json::json!(["backend"]));
        assert_eq!(value["assignees"], serde_json::json!(["user_1"]));
        assert_eq!(value["created_at"], serde_json::json!("2023-11-14T22:13:20Z"));
    }
}
