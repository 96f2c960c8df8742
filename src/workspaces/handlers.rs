use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    auth::extractors::CurrentUser,
    error::ApiError,
    id::new_id,
    state::AppState,
    workspaces::{
        dto::WorkspaceCreate,
        repo::{Workspace, DEFAULT_WORKSPACE_COLOR},
    },
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workspaces", post(create_workspace).get(get_workspaces))
        .route(
            "/workspaces/:workspace_id",
            get(get_workspace).delete(delete_workspace),
        )
}

#[instrument(skip(state, user, payload))]
pub async fn create_workspace(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<WorkspaceCreate>,
) -> Result<Json<Workspace>, ApiError> {
    let workspace = Workspace::create(
        &state.db,
        &new_id("ws"),
        &payload.name,
        payload.description.as_deref().unwrap_or(""),
        payload.color.as_deref().unwrap_or(DEFAULT_WORKSPACE_COLOR),
        &user.user_id,
    )
    .await?;
    info!(workspace_id = %workspace.workspace_id, owner = %user.user_id, "workspace created");
    Ok(Json(workspace))
}

#[instrument(skip(state, user))]
pub async fn get_workspaces(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<Workspace>>, ApiError> {
    let workspaces = Workspace::list_for_owner(&state.db, &user.user_id).await?;
    Ok(Json(workspaces))
}

#[instrument(skip(state, user))]
pub async fn get_workspace(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<Workspace>, ApiError> {
    let workspace = Workspace::find_for_owner(&state.db, &workspace_id, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound("Workspace"))?;
    Ok(Json(workspace))
}

#[instrument(skip(state, user))]
pub async fn delete_workspace(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(workspace_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !Workspace::delete_cascade(&state.db, &workspace_id, &user.user_id).await? {
        return Err(ApiError::NotFound("Workspace"));
    }
    info!(workspace_id = %workspace_id, "workspace deleted");
    Ok(Json(json!({ "message": "Workspace deleted" })))
}
