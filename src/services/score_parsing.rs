//! Lenient normalization of score input.
//!
//! Clients have sent sets, game scores and serve markers in many shapes over
//! time (JSON arrays, objects with varying keys, `"6-4, 3-6"` text, numeric or
//! word serve tokens). Everything is folded into one canonical representation
//! before it is stored. Malformed input degrades to an empty/zero/unset value
//! and never fails the request.

use serde_json::{Map, Value};

use crate::errors::{AppError, Result};
use crate::models::score_line::{GameScore, SetScore};
use crate::models::side::{Serve, Side};

const TEAM_KEYS: [&str; 3] = ["team", "team_score", "a"];
const OPP_KEYS: [&str; 3] = ["opp", "opponent_score", "b"];

/// Normalizes any accepted `sets` shape into `(team, opp)` pairs.
pub fn coerce_sets(value: &Value) -> Vec<SetScore> {
    match value {
        Value::Null => Vec::new(),
        Value::String(raw) => {
            let text = raw.trim();
            if text.is_empty() {
                return Vec::new();
            }
            match serde_json::from_str::<Value>(text) {
                Ok(parsed) => coerce_structured_sets(&parsed),
                Err(_) => parse_set_text(text),
            }
        }
        other => coerce_structured_sets(other),
    }
}

fn coerce_structured_sets(value: &Value) -> Vec<SetScore> {
    match value {
        Value::Object(map) => map.get("sets").map(coerce_sets).unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Array(pair) if pair.len() >= 2 => {
                    Some(SetScore(to_int(&pair[0]), to_int(&pair[1])))
                }
                Value::Object(map) => {
                    let (team, opp) = read_team_opp(map);
                    Some(SetScore(team, opp))
                }
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

// "6-4, 3-6, 7–5": comma separated, hyphen or en-dash between the two sides.
fn parse_set_text(text: &str) -> Vec<SetScore> {
    text.split(',')
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .filter_map(|chunk| {
            let parts: Vec<&str> = chunk.split(|c: char| c == '-' || c == '\u{2013}').collect();
            if parts.len() != 2 {
                return None;
            }
            let team = parts[0].trim().parse::<i32>().unwrap_or(0);
            let opp = parts[1].trim().parse::<i32>().unwrap_or(0);
            Some(SetScore(team, opp))
        })
        .collect()
}

/// Normalizes the in-progress game score into a `[team, opp]` pair.
pub fn coerce_current_game(value: &Value) -> GameScore {
    match value {
        Value::Null => GameScore::default(),
        Value::String(raw) => {
            let text = raw.trim();
            if text.is_empty() {
                return GameScore::default();
            }
            match serde_json::from_str::<Value>(text) {
                Ok(parsed) => coerce_structured_game(&parsed),
                Err(_) => parse_game_digits(text),
            }
        }
        other => coerce_structured_game(other),
    }
}

fn coerce_structured_game(value: &Value) -> GameScore {
    match value {
        Value::Object(map) => {
            let (team, opp) = read_team_opp(map);
            GameScore(team, opp)
        }
        Value::Array(pair) if pair.len() >= 2 => GameScore(to_int(&pair[0]), to_int(&pair[1])),
        _ => GameScore::default(),
    }
}

// "30 - 15", "ad:40": the first two digit runs, in order.
fn parse_game_digits(text: &str) -> GameScore {
    let digits: Vec<&str> = text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|part| !part.is_empty())
        .collect();
    if digits.len() < 2 {
        return GameScore::default();
    }
    match (digits[0].parse::<i32>(), digits[1].parse::<i32>()) {
        (Ok(team), Ok(opp)) => GameScore(team, opp),
        _ => GameScore::default(),
    }
}

/// Maps serve markers (`"team"`, `"player2"`, `"0"`, `1`, ...) to a side.
pub fn coerce_serve(value: &Value) -> Option<Serve> {
    match value {
        Value::String(raw) => {
            let text = raw.trim().to_lowercase();
            match text.as_str() {
                "" => None,
                "team" | "player1" | "0" => Some(Serve::Team),
                "opponent" | "player2" | "1" => Some(Serve::Opponent),
                other => other.parse::<i64>().ok().and_then(Serve::from_index),
            }
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .and_then(Serve::from_index),
        Value::Bool(b) => Serve::from_index(i64::from(*b)),
        _ => None,
    }
}

/// Winner supplied in a partial update. Unlike the helpers above this one is
/// strict: an unrecognized token is a validation error.
pub fn winner_from_value(value: &Value) -> Result<Option<Side>> {
    match value {
        Value::Null => Ok(None),
        Value::String(token) => Side::from_winner_token(token),
        Value::Number(n) => Side::from_winner_token(&n.to_string()),
        _ => Err(AppError::invalid_data(
            "winner must be 'team', 'opponent', or 'unfinished'",
        )),
    }
}

fn read_team_opp(map: &Map<String, Value>) -> (i32, i32) {
    (first_present(map, &TEAM_KEYS), first_present(map, &OPP_KEYS))
}

// First key holding a non-null value wins; missing everywhere means 0.
fn first_present(map: &Map<String, Value>, keys: &[&str]) -> i32 {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|v| !v.is_null())
        .map(to_int)
        .unwrap_or(0)
}

fn to_int(value: &Value) -> i32 {
    let wide = match value {
        Value::Bool(b) => i64::from(*b),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<i64>().unwrap_or(0),
        _ => 0,
    };
    wide.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(sets: Vec<SetScore>) -> Vec<(i32, i32)> {
        sets.into_iter().map(|s| (s.0, s.1)).collect()
    }

    #[test]
    fn sets_from_positional_pairs() {
        let sets = coerce_sets(&json!([[6, 4], [3, 6], [7, 5]]));
        assert_eq!(pairs(sets), vec![(6, 4), (3, 6), (7, 5)]);
    }

    #[test]
    fn sets_from_hyphenated_text() {
        assert_eq!(
            pairs(coerce_sets(&json!("6-4, 3-6, 7-5"))),
            vec![(6, 4), (3, 6), (7, 5)]
        );
        assert_eq!(pairs(coerce_sets(&json!("6\u{2013}2,7–6"))), vec![(6, 2), (7, 6)]);
    }

    #[test]
    fn malformed_text_yields_nothing() {
        assert!(coerce_sets(&json!("abc")).is_empty());
        assert!(coerce_sets(&json!("6-4-2")).is_empty());
    }

    #[test]
    fn text_tokens_default_bad_sides_to_zero() {
        assert_eq!(pairs(coerce_sets(&json!("x-4, 6-, ,5-y"))), vec![(0, 4), (6, 0), (5, 0)]);
    }

    #[test]
    fn sets_from_json_text() {
        assert_eq!(pairs(coerce_sets(&json!("[[6,1],[6,0]]"))), vec![(6, 1), (6, 0)]);
        assert_eq!(
            pairs(coerce_sets(&json!(r#"{"sets": [{"team": 4, "opp": 6}]}"#))),
            vec![(4, 6)]
        );
    }

    #[test]
    fn sets_from_object_wrapper_recurse() {
        assert_eq!(pairs(coerce_sets(&json!({ "sets": [[6, 3]] }))), vec![(6, 3)]);
        assert_eq!(pairs(coerce_sets(&json!({ "sets": "7-5" }))), vec![(7, 5)]);
        assert!(coerce_sets(&json!({ "games": [[6, 3]] })).is_empty());
    }

    #[test]
    fn sets_from_objects_use_alternate_keys() {
        let sets = coerce_sets(&json!([
            { "team": 6, "opp": 2 },
            { "team_score": 3, "opponent_score": 6 },
            { "a": 7, "b": 6 },
            { "team": null, "team_score": 5, "b": 7 },
            {}
        ]));
        assert_eq!(pairs(sets), vec![(6, 2), (3, 6), (7, 6), (5, 7), (0, 0)]);
    }

    #[test]
    fn positional_entries_coerce_loosely() {
        let sets = coerce_sets(&json!([[null, "4"], [6.0, true, 9], [1], 5, "6-4"]));
        assert_eq!(pairs(sets), vec![(0, 4), (6, 1)]);
    }

    #[test]
    fn other_shapes_yield_empty() {
        assert!(coerce_sets(&Value::Null).is_empty());
        assert!(coerce_sets(&json!("")).is_empty());
        assert!(coerce_sets(&json!("   ")).is_empty());
        assert!(coerce_sets(&json!(42)).is_empty());
        assert!(coerce_sets(&json!(true)).is_empty());
        assert!(coerce_sets(&json!("\"6-4\"")).is_empty());
    }

    #[test]
    fn current_game_shapes() {
        assert_eq!(coerce_current_game(&Value::Null), GameScore(0, 0));
        assert_eq!(coerce_current_game(&json!("")), GameScore(0, 0));
        assert_eq!(coerce_current_game(&json!([30, 15])), GameScore(30, 15));
        assert_eq!(coerce_current_game(&json!("[40, 30]")), GameScore(40, 30));
        assert_eq!(coerce_current_game(&json!("15 - 30")), GameScore(15, 30));
        assert_eq!(coerce_current_game(&json!("ad 40 vs 30")), GameScore(40, 30));
        assert_eq!(coerce_current_game(&json!("love")), GameScore(0, 0));
        assert_eq!(
            coerce_current_game(&json!({ "team_score": 15, "b": 40 })),
            GameScore(15, 40)
        );
        assert_eq!(coerce_current_game(&json!([5])), GameScore(0, 0));
        assert_eq!(coerce_current_game(&json!(3)), GameScore(0, 0));
    }

    #[test]
    fn serve_tokens() {
        assert_eq!(coerce_serve(&Value::Null), None);
        assert_eq!(coerce_serve(&json!("")), None);
        assert_eq!(coerce_serve(&json!("Team")), Some(Serve::Team));
        assert_eq!(coerce_serve(&json!("player1")), Some(Serve::Team));
        assert_eq!(coerce_serve(&json!("0")), Some(Serve::Team));
        assert_eq!(coerce_serve(&json!("opponent")), Some(Serve::Opponent));
        assert_eq!(coerce_serve(&json!("player2")), Some(Serve::Opponent));
        assert_eq!(coerce_serve(&json!(1)), Some(Serve::Opponent));
        assert_eq!(coerce_serve(&json!(" 01 ")), Some(Serve::Opponent));
        assert_eq!(coerce_serve(&json!("7")), None);
        assert_eq!(coerce_serve(&json!("someone")), None);
        assert_eq!(coerce_serve(&json!([0])), None);
    }

    #[test]
    fn winner_values() {
        assert_eq!(winner_from_value(&json!("team")).unwrap(), Some(Side::Team));
        assert_eq!(winner_from_value(&json!(1)).unwrap(), Some(Side::Opponent));
        assert_eq!(winner_from_value(&Value::Null).unwrap(), None);
        assert_eq!(winner_from_value(&json!("unfinished")).unwrap(), None);
        assert!(winner_from_value(&json!("both")).is_err());
        assert!(winner_from_value(&json!(true)).is_err());
    }
}
