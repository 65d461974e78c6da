use chrono::{DateTime, Utc};

use crate::config::LineupConfig;
use crate::errors::{AppError, Result};
use crate::models::fixture::{CreateMatch, Match, MatchResponse, MatchStatus};
use crate::models::score_line::{
    LineStatus, MatchType, NewScoreLine, ScoreLine, ScoreLineResponse,
};
use crate::models::side::Side;
use crate::state::AppState;

pub async fn schedule(state: &AppState, payload: CreateMatch) -> Result<Match> {
    let new_match = payload.into_new_match()?;
    let created = state.store.insert_match(new_match).await?;

    tracing::info!(
        match_id = created.id,
        opponent = %created.opponent,
        date = %created.date,
        "📅 Match scheduled"
    );
    Ok(created)
}

pub async fn list(state: &AppState, status: Option<&str>) -> Result<Vec<Match>> {
    let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(MatchStatus::parse(raw).ok_or_else(|| {
            AppError::invalid_data(format!(
                "Unknown status '{raw}'. Use scheduled, live, or completed"
            ))
        })?),
        None => None,
    };

    state.store.list_matches(status).await
}

pub async fn get(state: &AppState, id: i64) -> Result<Match> {
    state
        .store
        .get_match(id)
        .await?
        .ok_or_else(|| match_not_found(id))
}

pub async fn get_with_lines(state: &AppState, id: i64) -> Result<MatchResponse> {
    let found = get(state, id).await?;
    let lines = state.store.score_lines_for_match(id).await?;

    let mut response = MatchResponse::from(&found);
    if !lines.is_empty() {
        response.scores = Some(lines.iter().map(ScoreLineResponse::from).collect());
    }
    Ok(response)
}

/// Doubles first, then singles, each numbered from 1.
pub fn lineup(match_id: i64, config: &LineupConfig) -> Vec<NewScoreLine> {
    let doubles = (1..=i32::from(config.doubles))
        .map(|n| NewScoreLine::placeholder(match_id, MatchType::Doubles, n));
    let singles = (1..=i32::from(config.singles))
        .map(|n| NewScoreLine::placeholder(match_id, MatchType::Singles, n));
    doubles.chain(singles).collect()
}

pub async fn start(state: &AppState, id: i64) -> Result<(Match, Vec<ScoreLine>)> {
    let existing = get(state, id).await?;
    if existing.status != MatchStatus::Scheduled {
        return Err(AppError::conflict(format!(
            "Match {id} is already {}",
            existing.status
        )));
    }

    if !state.store.score_lines_for_match(id).await?.is_empty() {
        return Err(AppError::conflict(format!("Match {id} already has score lines")));
    }

    let lines = state
        .store
        .begin_match(id, lineup(id, &state.config.lineup))
        .await?
        .ok_or_else(|| {
            AppError::conflict(format!(
                "Match {id} is no longer scheduled or already has score lines"
            ))
        })?;

    state.live_scores.record_all(&lines).await;
    let started = get(state, id).await?;

    tracing::info!(match_id = id, lines = lines.len(), "🎾 Match started");
    Ok((started, lines))
}

pub async fn complete(state: &AppState, id: i64, winner: &str) -> Result<Match> {
    let existing = get(state, id).await?;
    let winner = Side::from_match_winner(winner)?;

    ensure_in_play(&existing)?;

    let lines = state.store.score_lines_for_match(id).await?;
    if let Some(summary) = incomplete_summary(&lines) {
        return Err(AppError::conflict(format!(
            "Cannot complete match {id}: {summary}"
        )));
    }

    finish(state, id, winner).await
}

pub async fn delete(state: &AppState, id: i64) -> Result<()> {
    if !state.store.delete_match(id).await? {
        return Err(match_not_found(id));
    }
    state.live_scores.remove_match(id).await;

    tracing::info!(match_id = id, "🗑️ Match deleted with its score lines");
    Ok(())
}

pub async fn upcoming(state: &AppState) -> Result<Option<Match>> {
    upcoming_at(state, Utc::now()).await
}

/// Earliest non-completed match dated at or after `now`; ties go to the lower id.
pub async fn upcoming_at(state: &AppState, now: DateTime<Utc>) -> Result<Option<Match>> {
    let matches = state.store.list_matches(None).await?;
    Ok(matches
        .into_iter()
        .filter(|m| m.status != MatchStatus::Completed && m.date >= now)
        .min_by_key(|m| (m.date, m.id)))
}

/// `"2 incomplete line(s): doubles #2 (id 14), singles #5 (id 20)"`, or `None`
/// when every line is completed.
pub(crate) fn incomplete_summary(lines: &[ScoreLine]) -> Option<String> {
    let open: Vec<String> = lines
        .iter()
        .filter(|line| line.status != LineStatus::Completed)
        .map(ScoreLine::describe)
        .collect();

    if open.is_empty() {
        None
    } else {
        Some(format!("{} incomplete line(s): {}", open.len(), open.join(", ")))
    }
}

/// Only a live match can be completed.
pub(crate) fn ensure_in_play(fixture: &Match) -> Result<()> {
    match fixture.status {
        MatchStatus::Live => Ok(()),
        MatchStatus::Completed => Err(AppError::conflict(format!(
            "Match {} is already completed",
            fixture.id
        ))),
        MatchStatus::Scheduled => Err(AppError::conflict(format!(
            "Match {} has not started",
            fixture.id
        ))),
    }
}

pub(crate) async fn finish(state: &AppState, id: i64, winner: Side) -> Result<Match> {
    let completed = state
        .store
        .set_match_result(id, MatchStatus::Completed, Some(winner))
        .await?
        .ok_or_else(|| match_not_found(id))?;

    tracing::info!(match_id = id, winner = %winner, "🏁 Match completed");
    Ok(completed)
}

fn match_not_found(id: i64) -> AppError {
    AppError::not_found(format!("Match {id} not found"))
}
