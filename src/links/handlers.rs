use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use time::OffsetDateTime;
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    boards::repo::Board,
    cards::repo::Card,
    error::ApiError,
    id::new_id,
    links::{
        dto::{LinkCreate, LinkListQuery},
        repo::{Link, DEFAULT_LINK_COLOR},
    },
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/links", post(create_link).get(get_links))
        .route("/links/:link_id", get(get_link).delete(delete_link))
}

#[instrument(skip(state, user, payload))]
pub async fn create_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<LinkCreate>,
) -> Result<Json<Link>, ApiError> {
    let source = Card::find_by_id(&state.db, &payload.source_card_id)
        .await?
        .ok_or(ApiError::NotFound("Source card"))?;
    Card::find_by_id(&state.db, &payload.target_card_id)
        .await?
        .ok_or(ApiError::NotFound("Target card"))?;

    // The link lives on the source card's board; the target card's
    // board is not consulted.
    Board::find_for_owner(&state.db, &source.board_id, &user.user_id)
        .await?
        .ok_or(ApiError::Forbidden)?;

    if Link::pair_exists(&state.db, &payload.source_card_id, &payload.target_card_id).await? {
        return Err(ApiError::Conflict("Link already exists"));
    }

    let link = Link {
        link_id: new_id("link"),
        source_card_id: payload.source_card_id,
        target_card_id: payload.target_card_id,
        link_type: payload.link_type,
        label: payload.label,
        color: payload.color.unwrap_or_else(|| DEFAULT_LINK_COLOR.into()),
        line_style: payload.line_style,
        board_id: source.board_id,
        created_by: user.user_id,
        created_at: OffsetDateTime::now_utc(),
    };
    Link::insert(&state.db, &link).await?;

    info!(link_id = %link.link_id, board_id = %link.board_id, "link created");
    Ok(Json(link))
}

#[instrument(skip(state, user))]
pub async fn get_links(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<LinkListQuery>,
) -> Result<Json<Vec<Link>>, ApiError> {
    Board::find_for_owner(&state.db, &query.board_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Board"))?;

    let links = Link::list_for_board(&state.db, &query.board_id).await?;
    Ok(Json(links))
}

#[instrument(skip(state, user))]
pub async fn get_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(link_id): Path<String>,
) -> Result<Json<Link>, ApiError> {
    let link = Link::find_by_id(&state.db, &link_id)
        .await?
        .ok_or(ApiError::NotFound("Link"))?;
    Board::find_for_owner(&state.db, &link.board_id, &user.user_id)
        .await?
        .ok_or(ApiError::Forbidden)?;
    Ok(Json(link))
}

#[instrument(skip(state, user))]
pub async fn delete_link(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(link_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let link = Link::find_by_id(&state.db, &link_id)
        .await?
        .ok_or(ApiError::NotFound("Link"))?;
    Board::find_for_owner(&state.db, &link.board_id, &user.user_id)
        .await?
        .ok_or(ApiError::Forbidden)?;

    Link::delete(&state.db, &link_id).await?;
    info!(link_id = %link_id, "link deleted");
    Ok(Json(json!({ "message": "Link deleted" })))
}
