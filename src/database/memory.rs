use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::ScoreStore;
use crate::errors::{AppError, Result};
use crate::models::fixture::{Match, MatchStatus, NewMatch};
use crate::models::player::{CreatePlayer, Player, UpdatePlayer};
use crate::models::score_line::{NewScoreLine, ScoreLine, ScoreLinePatch};
use crate::models::side::Side;

#[derive(Default)]
struct Tables {
    next_id: i64,
    matches: BTreeMap<i64, Match>,
    score_lines: BTreeMap<i64, ScoreLine>,
    players: BTreeMap<i64, Player>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn has_lines(&self, match_id: i64) -> bool {
        self.score_lines.values().any(|line| line.match_id == match_id)
    }

    // (match_id, match_type, line_no) is unique across lines.
    fn ensure_slot_free(&self, candidate: &ScoreLine) -> Result<()> {
        let taken = self.score_lines.values().any(|line| {
            line.id != candidate.id
                && line.match_id == candidate.match_id
                && line.match_type == candidate.match_type
                && line.line_no == candidate.line_no
        });
        if taken {
            return Err(AppError::conflict(format!(
                "{} line {} already exists for match {}",
                candidate.match_type, candidate.line_no, candidate.match_id
            )));
        }
        Ok(())
    }
}

/// Process-local store. Every operation runs under one lock, so multi-row
/// operations are trivially atomic. Contents vanish on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn insert_match(&self, new_match: NewMatch) -> Result<Match> {
        let mut tables = self.tables.write().await;
        let id = tables.allocate_id();
        let stored = new_match.into_match(id, Utc::now());
        tables.matches.insert(id, stored.clone());
        Ok(stored)
    }

    async fn get_match(&self, id: i64) -> Result<Option<Match>> {
        Ok(self.tables.read().await.matches.get(&id).cloned())
    }

    async fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>> {
        let tables = self.tables.read().await;
        let mut matches: Vec<Match> = tables
            .matches
            .values()
            .filter(|m| status.map_or(true, |s| m.status == s))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(matches)
    }

    async fn set_match_result(
        &self,
        id: i64,
        status: MatchStatus,
        winner: Option<Side>,
    ) -> Result<Option<Match>> {
        let mut tables = self.tables.write().await;
        Ok(tables.matches.get_mut(&id).map(|m| {
            m.status = status;
            m.winner = winner;
            m.updated_at = Utc::now();
            m.clone()
        }))
    }

    async fn begin_match(
        &self,
        id: i64,
        lineup: Vec<NewScoreLine>,
    ) -> Result<Option<Vec<ScoreLine>>> {
        let mut tables = self.tables.write().await;
        let now = Utc::now();

        let has_lines = tables.has_lines(id);
        match tables.matches.get_mut(&id) {
            Some(m) if m.status == MatchStatus::Scheduled && !has_lines => {
                m.status = MatchStatus::Live;
                m.updated_at = now;
            }
            _ => return Ok(None),
        }

        let mut created = Vec::with_capacity(lineup.len());
        for new_line in lineup {
            let line_id = tables.allocate_id();
            let line = new_line.into_line(line_id, now);
            tables.score_lines.insert(line_id, line.clone());
            created.push(line);
        }
        Ok(Some(created))
    }

    async fn delete_match(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if tables.matches.remove(&id).is_none() {
            return Ok(false);
        }
        tables.score_lines.retain(|_, line| line.match_id != id);
        Ok(true)
    }

    async fn insert_score_line(&self, line: NewScoreLine) -> Result<ScoreLine> {
        let mut tables = self.tables.write().await;
        if !tables.matches.contains_key(&line.match_id) {
            return Err(AppError::not_found(format!(
                "Match {} not found",
                line.match_id
            )));
        }
        let mut stored = line.into_line(0, Utc::now());
        tables.ensure_slot_free(&stored)?;
        stored.id = tables.allocate_id();
        tables.score_lines.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_score_line(&self, id: i64) -> Result<Option<ScoreLine>> {
        Ok(self.tables.read().await.score_lines.get(&id).cloned())
    }

    async fn patch_score_line(
        &self,
        id: i64,
        patch: &ScoreLinePatch,
    ) -> Result<Option<ScoreLine>> {
        let mut tables = self.tables.write().await;
        let Some(mut patched) = tables.score_lines.get(&id).cloned() else {
            return Ok(None);
        };
        patch.apply_to(&mut patched);
        tables.ensure_slot_free(&patched)?;

        patched.updated_at = Utc::now();
        tables.score_lines.insert(id, patched.clone());
        Ok(Some(patched))
    }

    async fn delete_score_line(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.score_lines.remove(&id).is_some())
    }

    async fn score_lines_for_match(&self, match_id: i64) -> Result<Vec<ScoreLine>> {
        let tables = self.tables.read().await;
        let mut lines: Vec<ScoreLine> = tables
            .score_lines
            .values()
            .filter(|line| line.match_id == match_id)
            .cloned()
            .collect();
        lines.sort_by_key(|line| (line.line_no, line.id));
        Ok(lines)
    }

    async fn insert_player(&self, player: CreatePlayer) -> Result<Player> {
        let mut tables = self.tables.write().await;
        let id = tables.allocate_id();
        let stored = Player {
            id,
            name: player.name,
            gender: player.gender,
            year: player.year,
        };
        tables.players.insert(id, stored.clone());
        Ok(stored)
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        Ok(self.tables.read().await.players.values().cloned().collect())
    }

    async fn update_player(&self, id: i64, update: &UpdatePlayer) -> Result<Option<Player>> {
        let mut tables = self.tables.write().await;
        Ok(tables.players.get_mut(&id).map(|player| {
            update.apply_to(player);
            player.clone()
        }))
    }

    async fn delete_player(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.players.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
