use std::collections::HashMap;

use game_core::{average_attempts_message, average_attempts_remaining};
use game_persistence::repositories::GameRepository;
use tokio::sync::RwLock;
use tracing::debug;

pub const AVERAGE_ATTEMPTS_KEY: &str = "MOVES_REMAINING";

/// Small key/value cache for display strings. Values may be stale.
#[derive(Default)]
pub struct FactCache {
    entries: RwLock<HashMap<String, String>>,
}

impl FactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: String) {
        self.entries.write().await.insert(key.to_string(), value);
    }

    /// Recompute the average attempts remaining over open games.
    /// Leaves the previous value in place when no game is open.
    pub async fn refresh_average_attempts(&self, games: &GameRepository) -> anyhow::Result<()> {
        let open_games = games.all_open_games().await?;
        if let Some(average) = average_attempts_remaining(&open_games) {
            let message = average_attempts_message(average);
            debug!("Caching average attempts: {}", message);
            self.set(AVERAGE_ATTEMPTS_KEY, message).await;
        }
        Ok(())
    }
}
