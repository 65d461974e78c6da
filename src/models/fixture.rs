use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use mongodb::bson;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{AppError, Result};
use crate::models::score_line::ScoreLineResponse;
use crate::models::side::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Live => "live",
            MatchStatus::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<MatchStatus> {
        match raw.trim().to_lowercase().as_str() {
            "scheduled" => Some(MatchStatus::Scheduled),
            "live" => Some(MatchStatus::Live),
            "completed" => Some(MatchStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Stored match document, keyed by a counter-assigned integer id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "_id")]
    pub id: i64,

    pub gender: String,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,

    pub opponent: String,

    #[serde(default)]
    pub location: Option<String>,

    pub match_number: i32,

    pub status: MatchStatus,

    #[serde(default)]
    pub winner: Option<Side>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMatch {
    pub gender: String,
    pub date: DateTime<Utc>,
    pub opponent: String,
    pub location: Option<String>,
    pub match_number: i32,
}

impl NewMatch {
    pub fn into_match(self, id: i64, now: DateTime<Utc>) -> Match {
        Match {
            id,
            gender: self.gender,
            date: self.date,
            opponent: self.opponent,
            location: self.location,
            match_number: self.match_number,
            status: MatchStatus::Scheduled,
            winner: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// For creating new matches
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMatch {
    #[validate(length(min = 1, message = "gender is required"))]
    pub gender: String,

    pub date: String,

    #[validate(length(min = 1, message = "opponent is required"))]
    pub opponent: String,

    pub location: Option<String>,

    #[validate(range(min = 1, message = "match_number must be positive"))]
    pub match_number: i32,
}

impl CreateMatch {
    pub fn into_new_match(self) -> Result<NewMatch> {
        self.validate()?;
        Ok(NewMatch {
            date: parse_match_date(&self.date)?,
            gender: self.gender.trim().to_string(),
            opponent: self.opponent.trim().to_string(),
            location: self
                .location
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
            match_number: self.match_number,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CompleteMatch {
    pub winner: String,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub id: i64,
    pub gender: String,
    pub date: String,
    pub opponent: String,
    pub location: Option<String>,
    pub match_number: i32,
    pub status: MatchStatus,
    pub winner: Option<Side>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<ScoreLineResponse>>,
}

impl From<&Match> for MatchResponse {
    fn from(m: &Match) -> Self {
        MatchResponse {
            id: m.id,
            gender: m.gender.clone(),
            date: format_utc(&m.date),
            opponent: m.opponent.clone(),
            location: m.location.clone(),
            match_number: m.match_number,
            status: m.status,
            winner: m.winner,
            scores: None,
        }
    }
}

/// Every instant leaves the service as second-precision UTC with a trailing `Z`.
pub fn format_utc(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Accepts RFC 3339 (any offset), naive date-times and bare dates. Naive input is UTC.
pub fn parse_match_date(raw: &str) -> Result<DateTime<Utc>> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AppError::invalid_data("date is required"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(AppError::invalid_data(format!("unparseable date '{text}'")))
}
