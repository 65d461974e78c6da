use async_trait::async_trait;

use crate::errors::Result;
use crate::models::fixture::{Match, MatchStatus, NewMatch};
use crate::models::player::{CreatePlayer, Player, UpdatePlayer};
use crate::models::score_line::{NewScoreLine, ScoreLine, ScoreLinePatch};
use crate::models::side::Side;

pub mod connection;
pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Persistence boundary for matches, their score lines and the player roster.
///
/// Ids are surrogate integers assigned by the store. Score lines reference their
/// match; deleting a match removes its lines in the same atomic step.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn insert_match(&self, new_match: NewMatch) -> Result<Match>;

    async fn get_match(&self, id: i64) -> Result<Option<Match>>;

    /// Matches ordered by date, newest first.
    async fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>>;

    async fn set_match_result(
        &self,
        id: i64,
        status: MatchStatus,
        winner: Option<Side>,
    ) -> Result<Option<Match>>;

    /// Atomically flips a scheduled match to live and inserts its lineup.
    /// Returns `None` (and writes nothing) when the match is not scheduled.
    async fn begin_match(&self, id: i64, lineup: Vec<NewScoreLine>)
        -> Result<Option<Vec<ScoreLine>>>;

    /// Atomically deletes the match and every line it owns.
    async fn delete_match(&self, id: i64) -> Result<bool>;

    async fn insert_score_line(&self, line: NewScoreLine) -> Result<ScoreLine>;

    async fn get_score_line(&self, id: i64) -> Result<Option<ScoreLine>>;

    /// Writes only the fields present in `patch`. Last write wins.
    async fn patch_score_line(&self, id: i64, patch: &ScoreLinePatch)
        -> Result<Option<ScoreLine>>;

    async fn delete_score_line(&self, id: i64) -> Result<bool>;

    /// Lines of one match ordered by `(line_no, id)`.
    async fn score_lines_for_match(&self, match_id: i64) -> Result<Vec<ScoreLine>>;

    async fn insert_player(&self, player: CreatePlayer) -> Result<Player>;

    async fn list_players(&self) -> Result<Vec<Player>>;

    async fn update_player(&self, id: i64, update: &UpdatePlayer) -> Result<Option<Player>>;

    async fn delete_player(&self, id: i64) -> Result<bool>;

    /// Reachability check for the health endpoints.
    async fn ping(&self) -> Result<()>;
}
