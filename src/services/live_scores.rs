use std::collections::BTreeMap;

use tokio::sync::RwLock;

use crate::models::score_line::ScoreLine;

/// Process-wide snapshot of lines that are currently being played.
///
/// Refreshed after every score line write and emptied on restart. The store
/// stays authoritative; this only serves the cheap `/livescore` feed.
#[derive(Default)]
pub struct LiveScoreBoard {
    lines: RwLock<BTreeMap<i64, ScoreLine>>,
}

impl LiveScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or evicts `line` depending on whether it still looks live.
    pub async fn record(&self, line: &ScoreLine) {
        let mut lines = self.lines.write().await;
        if line.looks_live() {
            lines.insert(line.id, line.clone());
        } else {
            lines.remove(&line.id);
        }
    }

    pub async fn record_all(&self, batch: &[ScoreLine]) {
        for line in batch {
            self.record(line).await;
        }
    }

    pub async fn remove(&self, score_id: i64) {
        self.lines.write().await.remove(&score_id);
    }

    pub async fn remove_match(&self, match_id: i64) {
        self.lines
            .write()
            .await
            .retain(|_, line| line.match_id != match_id);
    }

    /// Ordered by match, then the same `(line_no, id)` order used for display.
    pub async fn snapshot(&self) -> Vec<ScoreLine> {
        let mut lines: Vec<ScoreLine> = self.lines.read().await.values().cloned().collect();
        lines.sort_by_key(|line| (line.match_id, line.line_no, line.id));
        lines
    }
}
