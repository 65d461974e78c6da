use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{MemoryStore, ScoreStore};
use crate::services::live_scores::LiveScoreBoard;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScoreStore>,
    pub live_scores: Arc<LiveScoreBoard>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn ScoreStore>, config: AppConfig) -> Self {
        AppState {
            store,
            live_scores: Arc::new(LiveScoreBoard::new()),
            config: Arc::new(config),
        }
    }

    pub fn in_memory(config: AppConfig) -> Self {
        Self::new(Arc::new(MemoryStore::new()), config)
    }
}
