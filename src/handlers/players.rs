use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    errors::{AppError, Result},
    extract::AppJson,
    models::{
        player::{CreatePlayer, PlayerResponse, UpdatePlayer},
        response::ApiResponse,
    },
    state::AppState,
};

// GET /players
pub async fn list_players(State(state): State<AppState>) -> Result<Json<Vec<PlayerResponse>>> {
    let players = state.store.list_players().await?;
    Ok(Json(players.iter().map(PlayerResponse::from).collect()))
}

// POST /players
pub async fn create_player(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePlayer>,
) -> Result<(StatusCode, Json<ApiResponse<PlayerResponse>>)> {
    payload.validate()?;
    if payload.name.trim().is_empty() {
        return Err(AppError::invalid_data("name is required"));
    }

    let player = state.store.insert_player(payload).await?;
    tracing::info!(player_id = player.id, name = %player.name, "👤 Player added");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            PlayerResponse::from(&player),
            "Player created successfully",
        )),
    ))
}

// PUT /players/:id
pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdatePlayer>,
) -> Result<Json<ApiResponse<PlayerResponse>>> {
    if payload.is_empty() {
        return Err(AppError::bad_request("No valid fields to update"));
    }

    let player = state
        .store
        .update_player(id, &payload)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Player {id} not found")))?;

    Ok(Json(ApiResponse::ok(
        PlayerResponse::from(&player),
        "Player updated successfully",
    )))
}

// DELETE /players/:id
pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Value>>> {
    if !state.store.delete_player(id).await? {
        return Err(AppError::not_found(format!("Player {id} not found")));
    }

    tracing::info!(player_id = id, "👤 Player removed");
    Ok(Json(ApiResponse::ok(json!({ "id": id }), "Player deleted")))
}
