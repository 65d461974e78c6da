use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde_json::{json, Value};

use crate::{
    errors::Result,
    extract::AppJson,
    middleware::auth::Claims,
    models::{
        fixture::{CompleteMatch, MatchResponse},
        response::{ApiResponse, LiveScoresResponse},
        score_line::{
            CompleteScoreLine, CreateScoreLine, ScoreLineResponse, StartScoreLine,
            UpdateScoreLine,
        },
    },
    services::score_lines,
    state::AppState,
};

// POST /scores
pub async fn create_score(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateScoreLine>,
) -> Result<(StatusCode, Json<ApiResponse<ScoreLineResponse>>)> {
    let line = score_lines::create_line(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            ScoreLineResponse::from(&line),
            "Score created successfully",
        )),
    ))
}

// GET /scores/:id
pub async fn get_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ScoreLineResponse>> {
    let line = score_lines::get_line(&state, id).await?;
    Ok(Json(ScoreLineResponse::from(&line)))
}

// PUT|POST /scores/:id
pub async fn update_score(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<UpdateScoreLine>,
) -> Result<Json<ApiResponse<ScoreLineResponse>>> {
    tracing::debug!(actor = %claims.sub, score_id = id, ?payload, "📥 Score update");

    let line = score_lines::update_line(&state, id, payload).await?;
    Ok(Json(ApiResponse::ok(
        ScoreLineResponse::from(&line),
        "Score updated successfully",
    )))
}

// DELETE /scores/:id
pub async fn delete_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Value>>> {
    score_lines::delete_line(&state, id).await?;
    Ok(Json(ApiResponse::ok(json!({ "id": id }), "Score deleted")))
}

// POST /scores/:id/start
pub async fn start_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<StartScoreLine>,
) -> Result<Json<ApiResponse<ScoreLineResponse>>> {
    let line = score_lines::start_line(&state, id, payload).await?;
    Ok(Json(ApiResponse::ok(
        ScoreLineResponse::from(&line),
        "Score started successfully",
    )))
}

// POST /scores/:id/complete
pub async fn complete_score(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<CompleteScoreLine>,
) -> Result<Json<ApiResponse<ScoreLineResponse>>> {
    let line = score_lines::complete_line(&state, id, payload).await?;
    Ok(Json(ApiResponse::ok(
        ScoreLineResponse::from(&line),
        "Score completed successfully",
    )))
}

// GET /scores/match/:id
pub async fn get_scores_for_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<Vec<ScoreLineResponse>>> {
    let lines = score_lines::fetch_for_match(&state, match_id).await?;
    Ok(Json(lines.iter().map(ScoreLineResponse::from).collect()))
}

// GET /scores/match/:id/all
pub async fn get_all_scores_for_match(
    State(state): State<AppState>,
    Path(match_id): Path<i64>,
) -> Result<Json<Vec<ScoreLineResponse>>> {
    let lines = score_lines::fetch_all_for_match(&state, match_id).await?;
    Ok(Json(lines.iter().map(ScoreLineResponse::from).collect()))
}

// POST /scores/match/:id/complete
pub async fn complete_match_scores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(match_id): Path<i64>,
    AppJson(payload): AppJson<CompleteMatch>,
) -> Result<Json<ApiResponse<MatchResponse>>> {
    tracing::info!(actor = %claims.sub, match_id, "📥 Completing match from its scores");

    let completed = score_lines::complete_all_for_match(&state, match_id, &payload.winner).await?;
    Ok(Json(ApiResponse::ok(
        MatchResponse::from(&completed),
        "All scores complete; match closed",
    )))
}

// GET /livescore
pub async fn live_scores(
    State(state): State<AppState>,
) -> Json<LiveScoresResponse<ScoreLineResponse>> {
    let lines = score_lines::live_board(&state).await;
    let live_scores: Vec<ScoreLineResponse> = lines.iter().map(ScoreLineResponse::from).collect();

    Json(LiveScoresResponse {
        count: live_scores.len(),
        live_scores,
    })
}
