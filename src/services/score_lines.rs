use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::fixture::{Match, MatchStatus};
use crate::models::score_line::{
    CompleteScoreLine, CreateScoreLine, LineStatus, MatchType, NewScoreLine, ScoreLine,
    ScoreLinePatch, StartScoreLine, UpdateScoreLine,
};
use crate::models::side::Side;
use crate::services::matches;
use crate::services::score_parsing::{
    coerce_current_game, coerce_serve, coerce_sets, winner_from_value,
};
use crate::state::AppState;

const DOUBLES_PARTNERS_REQUIRED: &str = "Doubles matches require player2 and opponent2";

pub async fn create_line(state: &AppState, payload: CreateScoreLine) -> Result<ScoreLine> {
    payload.validate()?;
    let match_type = parse_match_type(&payload.match_type)?;
    let player1 = required_name(&payload.player1, "player1")?;
    let opponent1 = required_name(&payload.opponent1, "opponent1")?;

    let fixture = matches::get(state, payload.match_id).await?;
    if fixture.status != MatchStatus::Live {
        return Err(AppError::conflict(format!(
            "Match {} is {}; score lines can only be added to a live match",
            fixture.id, fixture.status
        )));
    }
    let siblings = state.store.score_lines_for_match(payload.match_id).await?;
    ensure_slot_free(&siblings, None, match_type, payload.line_no)?;

    let (player2, opponent2) = match match_type {
        MatchType::Singles => (None, None),
        MatchType::Doubles => (
            optional_name(payload.player2),
            optional_name(payload.opponent2),
        ),
    };

    let line = state
        .store
        .insert_score_line(NewScoreLine {
            match_id: payload.match_id,
            line_no: payload.line_no,
            match_type,
            player1,
            player2,
            opponent1,
            opponent2,
            status: LineStatus::Scheduled,
            started: false,
            current_serve: None,
        })
        .await?;

    tracing::info!(
        score_id = line.id,
        match_id = line.match_id,
        line = %line.describe(),
        "➕ Score line created"
    );
    Ok(line)
}

pub async fn get_line(state: &AppState, id: i64) -> Result<ScoreLine> {
    state
        .store
        .get_score_line(id)
        .await?
        .ok_or_else(|| line_not_found(id))
}

/// Names the participants and puts the line in play. Sets and the current
/// game are left as they are.
pub async fn start_line(state: &AppState, id: i64, payload: StartScoreLine) -> Result<ScoreLine> {
    let line = get_line(state, id).await?;
    if line.status.is_closed() {
        return Err(AppError::conflict(format!(
            "Cannot start a {} score",
            line.status
        )));
    }

    let player1 = required_name(&payload.player1, "player1")?;
    let opponent1 = required_name(&payload.opponent1, "opponent1")?;
    let (player2, opponent2) = match line.match_type {
        MatchType::Singles => (None, None),
        MatchType::Doubles => {
            let player2 = optional_name(payload.player2);
            let opponent2 = optional_name(payload.opponent2);
            if player2.is_none() || opponent2.is_none() {
                return Err(AppError::invalid_data(DOUBLES_PARTNERS_REQUIRED));
            }
            (player2, opponent2)
        }
    };

    let serve = payload
        .current_serve
        .as_ref()
        .and_then(coerce_serve)
        .unwrap_or_default();

    let patch = ScoreLinePatch {
        player1: Some(player1),
        player2: Some(player2),
        opponent1: Some(opponent1),
        opponent2: Some(opponent2),
        current_serve: Some(Some(serve)),
        status: Some(LineStatus::Live),
        started: Some(true),
        ..Default::default()
    };
    let started = write_patch(state, id, &patch).await?;

    tracing::info!(score_id = id, match_id = started.match_id, "▶️ Score line started");
    Ok(started)
}

pub async fn update_line(state: &AppState, id: i64, payload: UpdateScoreLine) -> Result<ScoreLine> {
    let current = get_line(state, id).await?;
    let mut patch = build_patch(payload)?;
    if patch.is_empty() {
        return Err(AppError::bad_request("No valid fields to update"));
    }

    let mut merged = current.clone();
    patch.apply_to(&mut merged);

    match merged.match_type {
        MatchType::Singles => {
            if merged.player2.is_some() || merged.opponent2.is_some() {
                patch.player2 = Some(None);
                patch.opponent2 = Some(None);
            }
        }
        MatchType::Doubles => {
            if merged.started && (merged.player2.is_none() || merged.opponent2.is_none()) {
                return Err(AppError::invalid_data(DOUBLES_PARTNERS_REQUIRED));
            }
        }
    }

    if patch.line_no.is_some() || patch.match_type.is_some() {
        let siblings = state.store.score_lines_for_match(current.match_id).await?;
        ensure_slot_free(&siblings, Some(id), merged.match_type, merged.line_no)?;
    }

    let updated = write_patch(state, id, &patch).await?;
    tracing::info!(
        score_id = id,
        match_id = updated.match_id,
        status = %updated.status,
        "✏️ Score line updated"
    );
    Ok(updated)
}

pub async fn complete_line(
    state: &AppState,
    id: i64,
    payload: CompleteScoreLine,
) -> Result<ScoreLine> {
    let line = get_line(state, id).await?;
    if line.status.is_closed() {
        return Err(AppError::conflict(format!(
            "Cannot complete a {} score",
            line.status
        )));
    }
    let winner = Side::from_winner_token(&payload.winner)?;

    let patch = ScoreLinePatch {
        status: Some(LineStatus::Completed),
        winner: Some(winner),
        ..Default::default()
    };
    let completed = write_patch(state, id, &patch).await?;

    tracing::info!(
        score_id = id,
        match_id = completed.match_id,
        winner = winner.map_or("unfinished", |w| w.as_str()),
        "✅ Score line completed"
    );
    Ok(completed)
}

pub async fn delete_line(state: &AppState, id: i64) -> Result<()> {
    if !state.store.delete_score_line(id).await? {
        return Err(line_not_found(id));
    }
    state.live_scores.remove(id).await;

    tracing::info!(score_id = id, "🗑️ Score line deleted");
    Ok(())
}

/// Closes the match (not its lines) once every line has been completed.
pub async fn complete_all_for_match(state: &AppState, match_id: i64, winner: &str) -> Result<Match> {
    let lines = fetch_for_match(state, match_id).await?;
    let winner = Side::from_match_winner(winner)?;

    if let Some(summary) = matches::incomplete_summary(&lines) {
        return Err(AppError::bad_request(format!(
            "Cannot complete match {match_id}: {summary}"
        )));
    }

    let existing = matches::get(state, match_id).await?;
    matches::ensure_in_play(&existing)?;

    matches::finish(state, match_id, winner).await
}

/// Lines of a match in `(line_no, id)` order; an empty match is a 404.
pub async fn fetch_for_match(state: &AppState, match_id: i64) -> Result<Vec<ScoreLine>> {
    let lines = fetch_all_for_match(state, match_id).await?;
    if lines.is_empty() {
        return Err(AppError::not_found(format!(
            "No scores found for match {match_id}"
        )));
    }
    Ok(lines)
}

pub async fn fetch_all_for_match(state: &AppState, match_id: i64) -> Result<Vec<ScoreLine>> {
    state.store.score_lines_for_match(match_id).await
}

pub async fn live_board(state: &AppState) -> Vec<ScoreLine> {
    state.live_scores.snapshot().await
}

// Every update field goes through the same normalization, whatever its shape.
fn build_patch(payload: UpdateScoreLine) -> Result<ScoreLinePatch> {
    let line_no = payload.line_no;
    if line_no.is_some_and(|n| n < 1) {
        return Err(AppError::invalid_data("line_no must be positive"));
    }

    Ok(ScoreLinePatch {
        player1: payload
            .player1
            .map(|name| required_name(&name, "player1"))
            .transpose()?,
        player2: payload.player2.map(optional_name),
        opponent1: payload
            .opponent1
            .map(|name| required_name(&name, "opponent1"))
            .transpose()?,
        opponent2: payload.opponent2.map(optional_name),
        match_type: payload
            .match_type
            .as_deref()
            .map(parse_match_type)
            .transpose()?,
        line_no,
        sets: payload
            .sets
            .map(|value| value.as_ref().map(coerce_sets).unwrap_or_default()),
        current_game: payload
            .current_game
            .map(|value| value.as_ref().map(coerce_current_game).unwrap_or_default()),
        status: payload.status.as_deref().map(parse_status).transpose()?,
        started: payload.started,
        current_serve: payload
            .current_serve
            .map(|value| value.as_ref().and_then(coerce_serve)),
        winner: match payload.winner {
            Some(Some(value)) => Some(winner_from_value(&value)?),
            Some(None) => Some(None),
            None => None,
        },
    })
}

async fn write_patch(state: &AppState, id: i64, patch: &ScoreLinePatch) -> Result<ScoreLine> {
    let updated = state
        .store
        .patch_score_line(id, patch)
        .await?
        .ok_or_else(|| line_not_found(id))?;
    state.live_scores.record(&updated).await;
    Ok(updated)
}

fn ensure_slot_free(
    siblings: &[ScoreLine],
    except: Option<i64>,
    match_type: MatchType,
    line_no: i32,
) -> Result<()> {
    let taken = siblings.iter().any(|line| {
        Some(line.id) != except && line.match_type == match_type && line.line_no == line_no
    });
    if taken {
        return Err(AppError::conflict(format!(
            "{match_type} line {line_no} already exists for this match"
        )));
    }
    Ok(())
}

fn parse_match_type(raw: &str) -> Result<MatchType> {
    MatchType::parse(raw)
        .ok_or_else(|| AppError::invalid_data("match_type must be 'singles' or 'doubles'"))
}

fn parse_status(raw: &str) -> Result<LineStatus> {
    LineStatus::parse(raw).ok_or_else(|| {
        AppError::invalid_data(format!(
            "Unknown status '{raw}'. Use scheduled, live, completed, or cancelled"
        ))
    })
}

fn required_name(raw: &str, field: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::invalid_data(format!("{field} is required")));
    }
    Ok(name.to_string())
}

fn optional_name(raw: Option<String>) -> Option<String> {
    raw.map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

fn line_not_found(id: i64) -> AppError {
    AppError::not_found(format!("Score {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::fixture::CreateMatch;
    use crate::models::score_line::{GameScore, ScoreLineResponse, SetScore};
    use crate::models::side::Serve;
    use serde_json::{json, Value};

    async fn started_match(state: &AppState) -> (Match, Vec<ScoreLine>) {
        let fixture = scheduled_match(state).await;
        matches::start(state, fixture.id).await.unwrap()
    }

    async fn scheduled_match(state: &AppState) -> Match {
        matches::schedule(
            state,
            CreateMatch {
                gender: "men".into(),
                date: "2026-11-02T17:00:00Z".into(),
                opponent: "Tufts".into(),
                location: None,
                match_number: 3,
            },
        )
        .await
        .unwrap()
    }

    fn update(body: Value) -> UpdateScoreLine {
        serde_json::from_value(body).unwrap()
    }

    fn finish_with(winner: &str) -> CompleteScoreLine {
        CompleteScoreLine {
            winner: winner.into(),
        }
    }

    fn line_of(lines: &[ScoreLine], match_type: MatchType, line_no: i32) -> ScoreLine {
        lines
            .iter()
            .find(|l| l.match_type == match_type && l.line_no == line_no)
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn completing_twice_conflicts_and_keeps_winner() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let id = lines[0].id;

        let done = complete_line(&state, id, finish_with("team")).await.unwrap();
        assert_eq!(done.status, LineStatus::Completed);
        assert_eq!(done.winner, Some(Side::Team));

        let again = complete_line(&state, id, finish_with("opponent")).await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
        assert_eq!(get_line(&state, id).await.unwrap().winner, Some(Side::Team));
        assert!(state.live_scores.snapshot().await.iter().all(|l| l.id != id));
    }

    #[tokio::test]
    async fn unfinished_clears_winner_and_bad_tokens_fail() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;

        assert!(matches!(
            complete_line(&state, lines[1].id, finish_with("draw")).await,
            Err(AppError::ValidationError(_))
        ));
        let done = complete_line(&state, lines[1].id, finish_with("Unfinished"))
            .await
            .unwrap();
        assert_eq!(done.winner, None);
        assert!(matches!(
            complete_line(&state, 4242, finish_with("team")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn starting_doubles_requires_both_partners() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let doubles = line_of(&lines, MatchType::Doubles, 1);

        let missing = StartScoreLine {
            player1: "Ana".into(),
            opponent1: "Bea".into(),
            player2: Some("  ".into()),
            opponent2: Some("Dee".into()),
            current_serve: None,
        };
        assert!(matches!(
            start_line(&state, doubles.id, missing).await,
            Err(AppError::ValidationError(_))
        ));

        let full = StartScoreLine {
            player1: " Ana ".into(),
            opponent1: "Bea".into(),
            player2: Some("Cat".into()),
            opponent2: Some("Dee".into()),
            current_serve: Some(json!("player2")),
        };
        let live = start_line(&state, doubles.id, full).await.unwrap();
        assert_eq!(live.status, LineStatus::Live);
        assert_eq!(live.player1, "Ana");
        assert_eq!(live.player2.as_deref(), Some("Cat"));
        assert_eq!(live.current_serve, Some(Serve::Opponent));
    }

    #[tokio::test]
    async fn starting_singles_nulls_partners_and_keeps_score() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let singles = line_of(&lines, MatchType::Singles, 2);
        update_line(&state, singles.id, update(json!({ "sets": "6-1" })))
            .await
            .unwrap();

        let live = start_line(
            &state,
            singles.id,
            StartScoreLine {
                player1: "Eve".into(),
                opponent1: "Fay".into(),
                player2: Some("ignored".into()),
                opponent2: None,
                current_serve: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(live.player2, None);
        assert_eq!(live.opponent2, None);
        assert_eq!(live.current_serve, Some(Serve::Team));
        assert_eq!(live.sets, vec![SetScore(6, 1)]);
    }

    #[tokio::test]
    async fn starting_a_closed_line_conflicts() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let id = lines[4].id;
        update_line(&state, id, update(json!({ "status": "canceled" })))
            .await
            .unwrap();

        let attempt = StartScoreLine {
            player1: "Gia".into(),
            opponent1: "Hal".into(),
            player2: None,
            opponent2: None,
            current_serve: None,
        };
        assert!(matches!(
            start_line(&state, id, attempt).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn text_sets_are_normalized_and_projected() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let id = lines[3].id;

        let updated = update_line(
            &state,
            id,
            update(json!({ "sets": "6-4, 3–6, 7-x", "current_game": "30 - 15", "current_serve": 1 })),
        )
        .await
        .unwrap();
        assert_eq!(updated.sets, vec![SetScore(6, 4), SetScore(3, 6), SetScore(7, 0)]);
        assert_eq!(updated.current_game, GameScore(30, 15));
        assert_eq!(updated.current_serve, Some(Serve::Opponent));

        let rendered = serde_json::to_value(ScoreLineResponse::from(&updated)).unwrap();
        assert_eq!(
            rendered["sets"],
            json!([{"team":6,"opp":4},{"team":3,"opp":6},{"team":7,"opp":0}])
        );

        let cleared = update_line(&state, id, update(json!({ "sets": null, "current_serve": "" })))
            .await
            .unwrap();
        assert!(cleared.sets.is_empty());
        assert_eq!(cleared.current_serve, None);
        assert_eq!(cleared.current_game, GameScore(30, 15));
    }

    #[tokio::test]
    async fn empty_or_invalid_updates_are_rejected() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let id = lines[0].id;

        assert!(matches!(
            update_line(&state, id, update(json!({ "colour": "red" }))).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            update_line(&state, id, update(json!({ "winner": "draw" }))).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            update_line(&state, id, update(json!({ "status": "paused" }))).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            update_line(&state, 9999, update(json!({ "started": false }))).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn updating_a_missing_line_is_not_found_before_validation() {
        let state = AppState::in_memory(AppConfig::default());

        assert!(matches!(
            update_line(&state, 9999, update(json!({ "winner": "draw" }))).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            update_line(&state, 9999, update(json!({ "colour": "red" }))).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn started_doubles_keep_their_partners() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let doubles = line_of(&lines, MatchType::Doubles, 2);

        assert!(matches!(
            update_line(&state, doubles.id, update(json!({ "player2": null }))).await,
            Err(AppError::ValidationError(_))
        ));

        let singles = update_line(
            &state,
            doubles.id,
            update(json!({ "match_type": "singles", "line_no": 7 })),
        )
        .await
        .unwrap();
        assert_eq!(singles.match_type, MatchType::Singles);
        assert_eq!(singles.player2, None);
        assert_eq!(singles.opponent2, None);
    }

    #[tokio::test]
    async fn moving_onto_a_taken_slot_conflicts() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let singles = line_of(&lines, MatchType::Singles, 1);

        assert!(matches!(
            update_line(&state, singles.id, update(json!({ "line_no": 2 }))).await,
            Err(AppError::Conflict(_))
        ));

        // Numbering is per type, so doubles #4 is free.
        let moved = update_line(
            &state,
            singles.id,
            update(json!({
                "match_type": "doubles",
                "line_no": 4,
                "player2": "Kim",
                "opponent2": "Lou",
            })),
        )
        .await
        .unwrap();
        assert_eq!(moved.match_type, MatchType::Doubles);
        assert_eq!(moved.player2.as_deref(), Some("Kim"));

        assert!(matches!(
            update_line(&state, singles.id, update(json!({ "line_no": 1 }))).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn complete_all_reports_open_lines_then_closes_match() {
        let state = AppState::in_memory(AppConfig::default());
        let (fixture, lines) = started_match(&state).await;

        for line in &lines[..8] {
            complete_line(&state, line.id, finish_with("team")).await.unwrap();
        }
        let last = &lines[8];

        let err = complete_all_for_match(&state, fixture.id, "team")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let message = err.to_string();
        assert!(message.contains("1 incomplete line(s)"));
        assert!(message.contains(&last.describe()));

        complete_line(&state, last.id, finish_with("opponent")).await.unwrap();
        let done = complete_all_for_match(&state, fixture.id, "team").await.unwrap();
        assert_eq!(done.status, MatchStatus::Completed);
        assert_eq!(done.winner, Some(Side::Team));

        assert!(matches!(
            complete_all_for_match(&state, fixture.id, "team").await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            complete_all_for_match(&state, 777, "team").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn complete_all_refuses_a_match_that_never_started() {
        let state = AppState::in_memory(AppConfig::default());
        let fixture = scheduled_match(&state).await;
        state
            .store
            .insert_score_line(NewScoreLine {
                match_id: fixture.id,
                line_no: 1,
                match_type: MatchType::Singles,
                player1: "Mo".into(),
                player2: None,
                opponent1: "Ned".into(),
                opponent2: None,
                status: LineStatus::Completed,
                started: true,
                current_serve: None,
            })
            .await
            .unwrap();

        let err = complete_all_for_match(&state, fixture.id, "team")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert!(err.to_string().contains("has not started"));

        let stored = matches::get(&state, fixture.id).await.unwrap();
        assert_eq!(stored.status, MatchStatus::Scheduled);
        assert_eq!(stored.winner, None);
    }

    #[tokio::test]
    async fn fetch_variants_differ_only_on_empty() {
        let state = AppState::in_memory(AppConfig::default());
        let (fixture, lines) = started_match(&state).await;

        let fetched = fetch_for_match(&state, fixture.id).await.unwrap();
        let keys: Vec<(i32, i64)> = fetched.iter().map(|l| (l.line_no, l.id)).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(fetched.len(), lines.len());

        assert!(matches!(
            fetch_for_match(&state, 31337).await,
            Err(AppError::NotFound(_))
        ));
        assert!(fetch_all_for_match(&state, 31337).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_line_checks_match_and_slot() {
        let state = AppState::in_memory(AppConfig::default());
        let (fixture, _) = started_match(&state).await;

        let request = |match_id: i64, line_no: i32| CreateScoreLine {
            match_id,
            line_no,
            match_type: "Singles".into(),
            player1: "Ivy".into(),
            player2: Some("stray".into()),
            opponent1: "Jo".into(),
            opponent2: None,
        };

        assert!(matches!(
            create_line(&state, request(fixture.id, 3)).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            create_line(&state, request(555, 1)).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            create_line(&state, request(fixture.id, 0)).await,
            Err(AppError::ValidationError(_))
        ));

        let extra = create_line(&state, request(fixture.id, 7)).await.unwrap();
        assert_eq!(extra.player2, None);
        assert!(!extra.started);

        delete_line(&state, extra.id).await.unwrap();
        assert!(matches!(
            delete_line(&state, extra.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn lines_are_only_added_to_live_matches() {
        let state = AppState::in_memory(AppConfig::default());
        let fixture = scheduled_match(&state).await;

        let early = create_line(
            &state,
            CreateScoreLine {
                match_id: fixture.id,
                line_no: 1,
                match_type: "singles".into(),
                player1: "Pat".into(),
                player2: None,
                opponent1: "Quinn".into(),
                opponent2: None,
            },
        )
        .await;
        assert!(matches!(early, Err(AppError::Conflict(_))));
        assert!(fetch_all_for_match(&state, fixture.id).await.unwrap().is_empty());

        let (_, lines) = matches::start(&state, fixture.id).await.unwrap();
        assert_eq!(lines.len(), 9);
        assert_eq!(fetch_all_for_match(&state, fixture.id).await.unwrap().len(), 9);

        for line in &lines {
            complete_line(&state, line.id, finish_with("team")).await.unwrap();
        }
        matches::complete(&state, fixture.id, "team").await.unwrap();
        let late = create_line(
            &state,
            CreateScoreLine {
                match_id: fixture.id,
                line_no: 8,
                match_type: "singles".into(),
                player1: "Pat".into(),
                player2: None,
                opponent1: "Quinn".into(),
                opponent2: None,
            },
        )
        .await;
        assert!(matches!(late, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn concurrent_updates_last_write_wins() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;
        let id = lines[5].id;

        let (first, second) = tokio::join!(
            update_line(&state, id, update(json!({ "current_game": [15, 0] }))),
            update_line(&state, id, update(json!({ "current_game": [15, 15] }))),
        );
        first.unwrap();
        second.unwrap();

        let stored = get_line(&state, id).await.unwrap().current_game;
        assert!(stored == GameScore(15, 0) || stored == GameScore(15, 15));
    }

    #[tokio::test]
    async fn live_board_tracks_line_writes() {
        let state = AppState::in_memory(AppConfig::default());
        let (_, lines) = started_match(&state).await;

        complete_line(&state, lines[0].id, finish_with("team")).await.unwrap();
        let board = live_board(&state).await;
        assert_eq!(board.len(), 8);
        assert!(board.iter().all(|l| l.id != lines[0].id));
    }
}
