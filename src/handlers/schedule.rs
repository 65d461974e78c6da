use axum::{
    extract::{Path, Query, State},
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
        fixture::{CompleteMatch, CreateMatch, MatchResponse, ScheduleQuery},
        response::ApiResponse,
        score_line::ScoreLineResponse,
    },
    services::{matches, score_lines},
    state::AppState,
};

// POST /schedule
pub async fn create_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    AppJson(payload): AppJson<CreateMatch>,
) -> Result<(StatusCode, Json<ApiResponse<MatchResponse>>)> {
    tracing::info!(actor = %claims.sub, opponent = %payload.opponent, "📥 Scheduling match");

    let created = matches::schedule(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(
            MatchResponse::from(&created),
            "Match scheduled successfully",
        )),
    ))
}

// GET /schedule?status=live
pub async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<Vec<MatchResponse>>> {
    let found = matches::list(&state, query.status.as_deref()).await?;
    Ok(Json(found.iter().map(MatchResponse::from).collect()))
}

// GET /schedule/upcoming
pub async fn get_upcoming(State(state): State<AppState>) -> Result<Json<Option<MatchResponse>>> {
    let next = matches::upcoming(&state).await?;
    Ok(Json(next.as_ref().map(MatchResponse::from)))
}

// GET /schedule/:id
pub async fn get_match(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MatchResponse>> {
    let found = matches::get(&state, id).await?;
    Ok(Json(MatchResponse::from(&found)))
}

// POST /schedule/:id/start
pub async fn start_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<MatchResponse>>> {
    tracing::info!(actor = %claims.sub, match_id = id, "📥 Starting match");

    let (started, lines) = matches::start(&state, id).await?;
    let message = format!("Match started with {} score lines", lines.len());

    let mut response = MatchResponse::from(&started);
    response.scores = Some(lines.iter().map(ScoreLineResponse::from).collect());
    Ok(Json(ApiResponse::ok(response, message)))
}

// POST /schedule/:id/complete
pub async fn complete_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<CompleteMatch>,
) -> Result<Json<ApiResponse<MatchResponse>>> {
    tracing::info!(actor = %claims.sub, match_id = id, "📥 Completing match");

    let completed = matches::complete(&state, id, &payload.winner).await?;
    Ok(Json(ApiResponse::ok(
        MatchResponse::from(&completed),
        "Match completed successfully",
    )))
}

// DELETE /schedule/:id
pub async fn delete_match(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Value>>> {
    tracing::info!(actor = %claims.sub, match_id = id, "📥 Deleting match");

    matches::delete(&state, id).await?;
    Ok(Json(ApiResponse::ok(
        json!({ "id": id }),
        "Match and its scores deleted",
    )))
}

// GET /matches/:id
pub async fn get_match_with_scores(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MatchResponse>> {
    Ok(Json(matches::get_with_lines(&state, id).await?))
}

// GET /matches/:id/scores
pub async fn get_match_scores(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ScoreLineResponse>>> {
    let lines = score_lines::fetch_all_for_match(&state, id).await?;
    Ok(Json(lines.iter().map(ScoreLineResponse::from).collect()))
}
