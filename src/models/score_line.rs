use std::fmt;

use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::models::side::{Serve, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Singles,
    Doubles,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Singles => "singles",
            MatchType::Doubles => "doubles",
        }
    }

    pub fn parse(raw: &str) -> Option<MatchType> {
        match raw.trim().to_lowercase().as_str() {
            "singles" => Some(MatchType::Singles),
            "doubles" => Some(MatchType::Doubles),
            _ => None,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStatus {
    #[serde(alias = "pending")]
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

impl LineStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineStatus::Scheduled => "scheduled",
            LineStatus::Live => "live",
            LineStatus::Completed => "completed",
            LineStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(raw: &str) -> Option<LineStatus> {
        match raw.trim().to_lowercase().as_str() {
            "scheduled" | "pending" => Some(LineStatus::Scheduled),
            "live" | "in_progress" | "in-progress" => Some(LineStatus::Live),
            "completed" | "finished" => Some(LineStatus::Completed),
            "cancelled" | "canceled" => Some(LineStatus::Cancelled),
            _ => None,
        }
    }

    /// Completed and cancelled lines accept no further transitions.
    pub fn is_closed(&self) -> bool {
        matches!(self, LineStatus::Completed | LineStatus::Cancelled)
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One set as `(team, opponent)` games. Stored and accepted as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SetScore(pub i32, pub i32);

/// Points in the game being played, `[team, opponent]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameScore(pub i32, pub i32);

// Stored score line document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreLine {
    #[serde(rename = "_id")]
    pub id: i64,

    pub match_id: i64,
    pub line_no: i32,
    pub match_type: MatchType,

    pub player1: String,
    #[serde(default)]
    pub player2: Option<String>,
    pub opponent1: String,
    #[serde(default)]
    pub opponent2: Option<String>,

    #[serde(default)]
    pub sets: Vec<SetScore>,
    #[serde(default)]
    pub current_game: GameScore,

    pub status: LineStatus,
    #[serde(default)]
    pub started: bool,
    #[serde(default)]
    pub current_serve: Option<Serve>,
    #[serde(default)]
    pub winner: Option<Side>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl ScoreLine {
    /// Live-looking lines feed the live score board.
    pub fn looks_live(&self) -> bool {
        !self.status.is_closed() && (self.status == LineStatus::Live || self.started)
    }

    pub fn describe(&self) -> String {
        format!("{} #{} (id {})", self.match_type, self.line_no, self.id)
    }
}

#[derive(Debug, Clone)]
pub struct NewScoreLine {
    pub match_id: i64,
    pub line_no: i32,
    pub match_type: MatchType,
    pub player1: String,
    pub player2: Option<String>,
    pub opponent1: String,
    pub opponent2: Option<String>,
    pub status: LineStatus,
    pub started: bool,
    pub current_serve: Option<Serve>,
}

impl NewScoreLine {
    /// Lineup row created when a match starts: placeholder names, zeroed score.
    pub fn placeholder(match_id: i64, match_type: MatchType, line_no: i32) -> Self {
        let (player1, player2, opponent1, opponent2) = match match_type {
            MatchType::Doubles => (
                format!("Doubles Player {line_no}A"),
                Some(format!("Doubles Player {line_no}B")),
                format!("Doubles Opponent {line_no}A"),
                Some(format!("Doubles Opponent {line_no}B")),
            ),
            MatchType::Singles => (
                format!("Singles Player {line_no}"),
                None,
                format!("Singles Opponent {line_no}"),
                None,
            ),
        };

        NewScoreLine {
            match_id,
            line_no,
            match_type,
            player1,
            player2,
            opponent1,
            opponent2,
            status: LineStatus::Scheduled,
            started: true,
            current_serve: Some(Serve::Team),
        }
    }

    pub fn into_line(self, id: i64, now: DateTime<Utc>) -> ScoreLine {
        ScoreLine {
            id,
            match_id: self.match_id,
            line_no: self.line_no,
            match_type: self.match_type,
            player1: self.player1,
            player2: self.player2,
            opponent1: self.opponent1,
            opponent2: self.opponent2,
            sets: Vec::new(),
            current_game: GameScore::default(),
            status: self.status,
            started: self.started,
            current_serve: self.current_serve,
            winner: None,
            updated_at: now,
        }
    }
}

/// Normalized field changes for one line. Only `Some` fields are written;
/// `Some(None)` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreLinePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player2: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent2: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<MatchType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_no: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<Vec<SetScore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_game: Option<GameScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LineStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_serve: Option<Option<Serve>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Option<Side>>,
}

impl ScoreLinePatch {
    pub fn is_empty(&self) -> bool {
        self.player1.is_none()
            && self.player2.is_none()
            && self.opponent1.is_none()
            && self.opponent2.is_none()
            && self.match_type.is_none()
            && self.line_no.is_none()
            && self.sets.is_none()
            && self.current_game.is_none()
            && self.status.is_none()
            && self.started.is_none()
            && self.current_serve.is_none()
            && self.winner.is_none()
    }

    pub fn apply_to(&self, line: &mut ScoreLine) {
        if let Some(v) = &self.player1 {
            line.player1 = v.clone();
        }
        if let Some(v) = &self.player2 {
            line.player2 = v.clone();
        }
        if let Some(v) = &self.opponent1 {
            line.opponent1 = v.clone();
        }
        if let Some(v) = &self.opponent2 {
            line.opponent2 = v.clone();
        }
        if let Some(v) = self.match_type {
            line.match_type = v;
        }
        if let Some(v) = self.line_no {
            line.line_no = v;
        }
        if let Some(v) = &self.sets {
            line.sets = v.clone();
        }
        if let Some(v) = self.current_game {
            line.current_game = v;
        }
        if let Some(v) = self.status {
            line.status = v;
        }
        if let Some(v) = self.started {
            line.started = v;
        }
        if let Some(v) = self.current_serve {
            line.current_serve = v;
        }
        if let Some(v) = self.winner {
            line.winner = v;
        }
    }
}

// For creating a single line outside the start lineup
#[derive(Debug, Deserialize, Validate)]
pub struct CreateScoreLine {
    pub match_id: i64,

    #[validate(range(min = 1, message = "line_no must be positive"))]
    pub line_no: i32,

    pub match_type: String,

    #[validate(length(min = 1, message = "player1 is required"))]
    pub player1: String,
    pub player2: Option<String>,

    #[validate(length(min = 1, message = "opponent1 is required"))]
    pub opponent1: String,
    pub opponent2: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartScoreLine {
    pub player1: String,
    pub opponent1: String,
    pub player2: Option<String>,
    pub opponent2: Option<String>,
    #[serde(default)]
    pub current_serve: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteScoreLine {
    pub winner: String,
}

/// Partial update. Nullable fields distinguish "absent" from explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateScoreLine {
    pub player1: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub player2: Option<Option<String>>,
    pub opponent1: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub opponent2: Option<Option<String>>,
    pub match_type: Option<String>,
    pub line_no: Option<i32>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub sets: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub current_game: Option<Option<Value>>,
    pub status: Option<String>,
    pub started: Option<bool>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub current_serve: Option<Option<Value>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub winner: Option<Option<Value>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetView {
    pub team: i32,
    pub opp: i32,
}

impl From<SetScore> for SetView {
    fn from(set: SetScore) -> Self {
        SetView {
            team: set.0,
            opp: set.1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreLineResponse {
    pub id: i64,
    pub match_id: i64,
    pub line_no: i32,
    pub match_type: MatchType,
    pub player1: String,
    pub player2: Option<String>,
    pub opponent1: String,
    pub opponent2: Option<String>,
    pub sets: Vec<SetView>,
    pub current_game: GameScore,
    pub status: LineStatus,
    pub started: bool,
    pub current_serve: Option<Serve>,
    pub winner: Option<Side>,
}

impl From<&ScoreLine> for ScoreLineResponse {
    fn from(line: &ScoreLine) -> Self {
        ScoreLineResponse {
            id: line.id,
            match_id: line.match_id,
            line_no: line.line_no,
            match_type: line.match_type,
            player1: line.player1.clone(),
            player2: line.player2.clone(),
            opponent1: line.opponent1.clone(),
            opponent2: line.opponent2.clone(),
            sets: line.sets.iter().copied().map(SetView::from).collect(),
            current_game: line.current_game,
            status: line.status,
            started: line.started,
            current_serve: line.current_serve,
            winner: line.winner,
        }
    }
}
