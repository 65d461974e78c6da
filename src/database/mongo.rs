use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, DateTime as BsonDateTime, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::database::ScoreStore;
use crate::errors::{AppError, Result};
use crate::models::fixture::{Match, MatchStatus, NewMatch};
use crate::models::player::{CreatePlayer, Player, UpdatePlayer};
use crate::models::score_line::{NewScoreLine, ScoreLine, ScoreLinePatch};
use crate::models::side::Side;

const MATCHES: &str = "matches";
const SCORE_LINES: &str = "score_lines";
const PLAYERS: &str = "players";
const COUNTERS: &str = "counters";
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB-backed store.
///
/// Integer ids come from per-collection sequences in `counters`. Starting and
/// deleting a match run inside a multi-document transaction, which needs a
/// replica set (Atlas clusters qualify).
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub fn new(client: Client, db: Database) -> Self {
        MongoStore { client, db }
    }

    fn matches(&self) -> Collection<Match> {
        self.db.collection(MATCHES)
    }

    fn score_lines(&self) -> Collection<ScoreLine> {
        self.db.collection(SCORE_LINES)
    }

    fn players(&self) -> Collection<Player> {
        self.db.collection(PLAYERS)
    }

    pub async fn ensure_indexes(&self) -> Result<()> {
        self.score_lines()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "match_id": 1, "line_no": 1, "_id": 1 })
                    .build(),
            )
            .await?;
        self.score_lines()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "match_id": 1, "match_type": 1, "line_no": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name("line_slot".to_string())
                            .build(),
                    )
                    .build(),
            )
            .await?;
        self.matches()
            .create_index(IndexModel::builder().keys(doc! { "date": -1 }).build())
            .await?;
        tracing::info!("📇 MongoDB indexes ensured");
        Ok(())
    }

    /// Reserves `count` consecutive ids from a named sequence and returns the first.
    async fn reserve_ids(&self, sequence: &str, count: i64) -> Result<i64> {
        let counters: Collection<Document> = self.db.collection(COUNTERS);
        let updated = counters
            .find_one_and_update(doc! { "_id": sequence }, doc! { "$inc": { "seq": count } })
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        let last = updated
            .and_then(|counter| counter.get_i64("seq").ok())
            .ok_or_else(|| AppError::storage(format!("sequence '{sequence}' unavailable")))?;
        Ok(last - count + 1)
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write)) => write.code == DUPLICATE_KEY,
        ErrorKind::Command(command) => command.code == DUPLICATE_KEY,
        ErrorKind::InsertMany(failure) => failure
            .write_errors
            .as_ref()
            .is_some_and(|errors| errors.iter().any(|e| e.code == DUPLICATE_KEY)),
        _ => false,
    }
}

// The `line_slot` index is the only unique key on score lines.
fn slot_conflict(err: MongoError) -> AppError {
    if is_duplicate_key(&err) {
        AppError::conflict("A score line already occupies that match slot")
    } else {
        AppError::MongoDB(err)
    }
}

#[async_trait]
impl ScoreStore for MongoStore {
    async fn insert_match(&self, new_match: NewMatch) -> Result<Match> {
        let id = self.reserve_ids(MATCHES, 1).await?;
        let stored = new_match.into_match(id, Utc::now());
        self.matches().insert_one(&stored).await?;
        Ok(stored)
    }

    async fn get_match(&self, id: i64) -> Result<Option<Match>> {
        Ok(self.matches().find_one(doc! { "_id": id }).await?)
    }

    async fn list_matches(&self, status: Option<MatchStatus>) -> Result<Vec<Match>> {
        let mut filter = doc! {};
        if let Some(status) = status {
            filter.insert("status", status.as_str());
        }

        let cursor = self
            .matches()
            .find(filter)
            .sort(doc! { "date": -1, "_id": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn set_match_result(
        &self,
        id: i64,
        status: MatchStatus,
        winner: Option<Side>,
    ) -> Result<Option<Match>> {
        let update = doc! {
            "$set": {
                "status": status.as_str(),
                "winner": winner.map(|w| w.as_str()),
                "updated_at": BsonDateTime::from_chrono(Utc::now()),
            }
        };
        Ok(self
            .matches()
            .find_one_and_update(doc! { "_id": id }, update)
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn begin_match(
        &self,
        id: i64,
        lineup: Vec<NewScoreLine>,
    ) -> Result<Option<Vec<ScoreLine>>> {
        let now = Utc::now();
        let first_id = self.reserve_ids(SCORE_LINES, lineup.len() as i64).await?;
        let lines: Vec<ScoreLine> = lineup
            .into_iter()
            .zip(first_id..)
            .map(|(new_line, line_id)| new_line.into_line(line_id, now))
            .collect();

        // Dropping the session mid-transaction aborts it, so `?` never leaves
        // a half-started match behind.
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        let flipped = self
            .matches()
            .update_one(
                doc! { "_id": id, "status": MatchStatus::Scheduled.as_str() },
                doc! { "$set": {
                    "status": MatchStatus::Live.as_str(),
                    "updated_at": BsonDateTime::from_chrono(now),
                } },
            )
            .session(&mut session)
            .await?;

        let existing = self
            .score_lines()
            .count_documents(doc! { "match_id": id })
            .session(&mut session)
            .await?;

        if flipped.matched_count == 0 || existing > 0 {
            session.abort_transaction().await?;
            return Ok(None);
        }

        if !lines.is_empty() {
            self.score_lines()
                .insert_many(&lines)
                .session(&mut session)
                .await
                .map_err(slot_conflict)?;
        }

        session.commit_transaction().await?;
        Ok(Some(lines))
    }

    async fn delete_match(&self, id: i64) -> Result<bool> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        self.score_lines()
            .delete_many(doc! { "match_id": id })
            .session(&mut session)
            .await?;
        let deleted = self
            .matches()
            .delete_one(doc! { "_id": id })
            .session(&mut session)
            .await?;

        if deleted.deleted_count == 0 {
            session.abort_transaction().await?;
            return Ok(false);
        }

        session.commit_transaction().await?;
        Ok(true)
    }

    async fn insert_score_line(&self, line: NewScoreLine) -> Result<ScoreLine> {
        if self.get_match(line.match_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Match {} not found",
                line.match_id
            )));
        }

        let id = self.reserve_ids(SCORE_LINES, 1).await?;
        let stored = line.into_line(id, Utc::now());
        self.score_lines()
            .insert_one(&stored)
            .await
            .map_err(slot_conflict)?;
        Ok(stored)
    }

    async fn get_score_line(&self, id: i64) -> Result<Option<ScoreLine>> {
        Ok(self.score_lines().find_one(doc! { "_id": id }).await?)
    }

    async fn patch_score_line(
        &self,
        id: i64,
        patch: &ScoreLinePatch,
    ) -> Result<Option<ScoreLine>> {
        let mut fields = bson::to_document(patch)?;
        fields.insert("updated_at", BsonDateTime::from_chrono(Utc::now()));

        self.score_lines()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await
            .map_err(slot_conflict)
    }

    async fn delete_score_line(&self, id: i64) -> Result<bool> {
        let result = self.score_lines().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn score_lines_for_match(&self, match_id: i64) -> Result<Vec<ScoreLine>> {
        let cursor = self
            .score_lines()
            .find(doc! { "match_id": match_id })
            .sort(doc! { "line_no": 1, "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_player(&self, player: CreatePlayer) -> Result<Player> {
        let id = self.reserve_ids(PLAYERS, 1).await?;
        let stored = Player {
            id,
            name: player.name,
            gender: player.gender,
            year: player.year,
        };
        self.players().insert_one(&stored).await?;
        Ok(stored)
    }

    async fn list_players(&self) -> Result<Vec<Player>> {
        let cursor = self.players().find(doc! {}).sort(doc! { "_id": 1 }).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_player(&self, id: i64, update: &UpdatePlayer) -> Result<Option<Player>> {
        let fields = bson::to_document(update)?;
        Ok(self
            .players()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": fields })
            .return_document(ReturnDocument::After)
            .await?)
    }

    async fn delete_player(&self, id: i64) -> Result<bool> {
        let result = self.players().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
