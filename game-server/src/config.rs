use std::env;
use std::str::FromStr;

use game_core::DEFAULT_ATTEMPTS;
use game_persistence::connection::DEFAULT_DATABASE_URL;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub default_attempts: i32,
    pub reminder_interval_seconds: u64,
    pub reminder_sender: String,
    pub words_file: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT", 8080),
            database_url: env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            default_attempts: positive_or_default(
                "DEFAULT_ATTEMPTS",
                parse_env("DEFAULT_ATTEMPTS", DEFAULT_ATTEMPTS),
                DEFAULT_ATTEMPTS,
            ),
            reminder_interval_seconds: parse_env("REMINDER_INTERVAL_SECONDS", 3600),
            reminder_sender: env::var("REMINDER_SENDER")
                .unwrap_or_else(|_| "noreply@hangman.local".to_string()),
            words_file: env::var("WORDS_FILE").ok().filter(|path| !path.is_empty()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => parse_or_default(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or_default<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: &str, default: T) -> T {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!("Invalid {} value '{}', using {}", key, raw, default);
        default
    })
}

fn positive_or_default(key: &str, value: i32, default: i32) -> i32 {
    if value < 1 {
        warn!("{} must be at least 1, got {}, using {}", key, value, default);
        return default;
    }
    value
}
