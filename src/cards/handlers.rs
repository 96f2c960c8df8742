use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use sqlx::types::Json as Jsonb;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    boards::repo::Board,
    cards::{
        dto::{CardCreate, CardListQuery, CardUpdate, SearchQuery},
        repo::Card,
    },
    error::ApiError,
    id::new_id,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cards", post(create_card).get(get_cards))
        .route(
            "/cards/:card_id",
            get(get_card).put(update_card).delete(delete_card),
        )
        .route("/search", get(search_cards))
}

#[instrument(skip(state, user, payload))]
pub async fn create_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CardCreate>,
) -> Result<Json<Card>, ApiError> {
    Board::find_for_owner(&state.db, &payload.board_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Board"))?;

    let now = OffsetDateTime::now_utc();
    let card = Card {
        card_id: new_id("card"),
        title: payload.title,
        description: payload.description.unwrap_or_default(),
        card_type: payload.card_type,
        status: payload.status,
        board_id: payload.board_id,
        position_x: payload.position_x,
        position_y: payload.position_y,
        priority: payload.priority.unwrap_or_else(|| "medium".into()),
        assignees: Jsonb(payload.assignees.unwrap_or_default()),
        tags: Jsonb(payload.tags.unwrap_or_default()),
        due_date: payload.due_date,
        checklist: Jsonb(payload.checklist.unwrap_or_default()),
        color: payload.color,
        created_by: user.user_id,
        created_at: now,
        updated_at: now,
    };
    Card::insert(&state.db, &card).await?;

    info!(card_id = %card.card_id, board_id = %card.board_id, "card created");
    Ok(Json(card))
}

#[instrument(skip(state, user))]
pub async fn get_cards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<CardListQuery>,
) -> Result<Json<Vec<Card>>, ApiError> {
    Board::find_for_owner(&state.db, &query.board_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Board"))?;

    let cards = Card::list_for_board(&state.db, &query.board_id).await?;
    Ok(Json(cards))
}

#[instrument(skip(state, user))]
pub async fn get_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<String>,
) -> Result<Json<Card>, ApiError> {
    let card = Card::find_for_creator(&state.db, &card_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Card"))?;
    Ok(Json(card))
}

#[instrument(skip(state, user, payload))]
pub async fn update_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<String>,
    Json(payload): Json<CardUpdate>,
) -> Result<Json<Card>, ApiError> {
    let card = Card::find_by_id(&state.db, &card_id)
        .await?
        .ok_or(ApiError::NotFound("Card"))?;
    Board::find_for_owner(&state.db, &card.board_id, &user.user_id)
        .await?
        .ok_or(ApiError::Forbidden)?;

    let updated = Card::update_partial(&state.db, &card_id, payload).await?;
    info!(card_id = %card_id, "card updated");
    Ok(Json(updated))
}

#[instrument(skip(state, user))]
pub async fn delete_card(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(card_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let card = Card::find_by_id(&state.db, &card_id)
        .await?
        .ok_or(ApiError::NotFound("Card"))?;
    Board::find_for_owner(&state.db, &card.board_id, &user.user_id)
        .await?
        .ok_or(ApiError::Forbidden)?;

    Card::delete_cascade(&state.db, &card_id).await?;
    info!(card_id = %card_id, "card deleted");
    Ok(Json(json!({ "message": "Card deleted" })))
}

#[instrument(skip(state, user))]
pub async fn search_cards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Card>>, ApiError> {
    let cards = Card::search(
        &state.db,
        &user.user_id,
        &query.q,
        query.board_id.as_deref(),
    )
    .await?;
    Ok(Json(cards))
}
