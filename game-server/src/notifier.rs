use async_trait::async_trait;
use game_types::User;
use tracing::{info, warn};

/// Subject line used for reminder mail
pub const REMINDER_SUBJECT: &str = "This is a reminder!";

/// Delivers reminder messages to users. Delivery is fire-and-forget.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn remind(&self, user: &User, message: &str) -> anyhow::Result<()>;
}

/// Writes reminders to the log instead of sending mail
pub struct LogNotifier {
    sender: String,
}

impl LogNotifier {
    pub fn new(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
        }
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn remind(&self, user: &User, message: &str) -> anyhow::Result<()> {
        match &user.email {
            Some(email) => {
                info!(
                    from = %self.sender,
                    to = %email,
                    subject = REMINDER_SUBJECT,
                    "Reminder: {}",
                    message
                );
                Ok(())
            }
            None => {
                warn!("User {} has no email address, reminder dropped", user.name);
                Err(anyhow::anyhow!("User {} has no email address", user.name))
            }
        }
    }
}

pub fn reminder_body(user: &User, active_games: usize) -> String {
    let games = if active_games == 1 { "game" } else { "games" };
    format!(
        "Hello {}, you have {} unfinished Hangman {} waiting for your next guess!",
        user.name, active_games, games
    )
}
