use std::sync::Arc;
use std::time::Duration;

use game_persistence::repositories::GameRepository;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cache::FactCache;
use crate::game_service::HangmanService;
use crate::notifier::Notifier;

/// Queue a background refresh of the average attempts display string
pub fn spawn_cache_refresh(games: Arc<GameRepository>, cache: Arc<FactCache>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Err(e) = cache.refresh_average_attempts(&games).await {
            error!("Failed to refresh average attempts cache: {}", e);
        }
    })
}

/// Send reminders every `every`, starting one interval after launch
pub fn spawn_reminder_job(
    service: Arc<HangmanService>,
    notifier: Arc<dyn Notifier>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            info!("Running scheduled reminder job");
            if let Err(e) = service.send_reminders(notifier.as_ref()).await {
                error!("Reminder job failed: {}", e);
            }
        }
    })
}
