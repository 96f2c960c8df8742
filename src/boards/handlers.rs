use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    boards::{
        dto::{BoardCreate, BoardListQuery, BoardUpdate},
        repo::Board,
    },
    error::ApiError,
    id::new_id,
    state::AppState,
    workspaces::repo::Workspace,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/boards", post(create_board).get(get_boards))
        .route(
            "/boards/:board_id",
            get(get_board).put(update_board).delete(delete_board),
        )
}

#[instrument(skip(state, user, payload))]
pub async fn create_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<BoardCreate>,
) -> Result<Json<Board>, ApiError> {
    Workspace::find_for_owner(&state.db, &payload.workspace_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Workspace"))?;

    let board = Board::create(
        &state.db,
        &new_id("board"),
        &payload.name,
        payload.description.as_deref().unwrap_or(""),
        &payload.workspace_id,
        &user.user_id,
    )
    .await?;
    info!(board_id = %board.board_id, workspace_id = %board.workspace_id, "board created");
    Ok(Json(board))
}

#[instrument(skip(state, user))]
pub async fn get_boards(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<BoardListQuery>,
) -> Result<Json<Vec<Board>>, ApiError> {
    let boards =
        Board::list_for_owner(&state.db, &user.user_id, query.workspace_id.as_deref()).await?;
    Ok(Json(boards))
}

#[instrument(skip(state, user))]
pub async fn get_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<String>,
) -> Result<Json<Board>, ApiError> {
    let board = Board::find_for_owner(&state.db, &board_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Board"))?;
    Ok(Json(board))
}

#[instrument(skip(state, user, payload))]
pub async fn update_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<String>,
    Json(payload): Json<BoardUpdate>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Board::find_for_owner(&state.db, &board_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Board"))?;

    Board::update_partial(
        &state.db,
        &board_id,
        payload.name.as_deref(),
        payload.description.as_deref(),
        payload.statuses,
    )
    .await?;
    info!(board_id = %board_id, "board updated");
    Ok(Json(json!({ "message": "Board updated" })))
}

#[instrument(skip(state, user))]
pub async fn delete_board(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(board_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !Board::delete_cascade(&state.db, &board_id, &user.user_id).await? {
        return Err(ApiError::NotFound("Board"));
    }
    info!(board_id = %board_id, "board deleted");
    Ok(Json(json!({ "message": "Board deleted" })))
}
