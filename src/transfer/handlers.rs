use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::types::Json as Jsonb;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    boards::repo::{default_statuses, Board},
    cards::repo::Card,
    error::ApiError,
    id::new_id,
    links::repo::Link,
    state::AppState,
    transfer::{
        dto::{BoardExport, ImportRequest},
        remap::{remap_cards, remap_links},
    },
    workspaces::repo::Workspace,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/export/:board_id", get(export_board))
        .route("/import", post(import_board))
}

#[instrument(skip(state, user))]
pub async fn export_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<String>,
) -> Result<Json<BoardExport>, ApiError> {
    let board = Board::find_for_owner(&state.db, &board_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Board"))?;
    let cards = Card::list_for_board(&state.db, &board_id).await?;
    let links = Link::list_for_board(&state.db, &board_id).await?;

    info!(board_id = %board_id, cards = cards.len(), links = links.len(), "board exported");
    Ok(Json(BoardExport {
        board,
        cards,
        links,
        exported_at: OffsetDateTime::now_utc(),
    }))
}

/// Reconstructs the document under fresh identifiers: new board id, new
/// card ids (old→new map), links rewired through the map. Everything is
/// owned by the importer and shares the import's start timestamp.
#[instrument(skip(state, user, payload))]
pub async fn import_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let workspace_id = payload
        .workspace_id
        .as_deref()
        .ok_or(ApiError::BadRequest("workspace_id required"))?;
    Workspace::find_for_owner(&state.db, workspace_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Workspace"))?;

    let now = OffsetDateTime::now_utc();
    let board_id = new_id("board");
    let statuses = payload.board.statuses.clone().unwrap_or_else(default_statuses);

    let (cards, id_map) = remap_cards(&payload.cards, &board_id, &user.user_id, now);
    let links = remap_links(&payload.links, &id_map, &board_id, &user.user_id, now);

    let mut tx = state.db.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO boards (board_id, name, description, workspace_id, owner_id, statuses, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
        "#,
    )
    .bind(&board_id)
    .bind(payload.board.name.as_deref().unwrap_or("Imported Board"))
    .bind(payload.board.description.as_deref().unwrap_or(""))
    .bind(workspace_id)
    .bind(&user.user_id)
    .bind(Jsonb(statuses))
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for card in &cards {
        Card::insert(&mut *tx, card).await?;
    }
    for link in &links {
        Link::insert(&mut *tx, link).await?;
    }
    tx.commit().await?;

    info!(
        board_id = %board_id,
        cards = cards.len(),
        links = links.len(),
        "board imported"
    );
    Ok(Json(json!({
        "board_id": board_id,
        "message": "Board imported successfully"
    })))
}
