use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tracing::info;

use game_core::{RandomWordSource, WordSource};
use game_persistence::connection::connect_and_migrate;
use game_server::{
    config::Config, create_routes, game_service::HangmanService, jobs::spawn_reminder_job,
    notifier::{LogNotifier, Notifier},
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Hangman server...");

    let config = Config::new();

    let word_source: Arc<dyn WordSource> = match &config.words_file {
        Some(path) => match RandomWordSource::from_file(path) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                tracing::error!("Failed to load words from '{}': {}", path, e);
                tracing::error!("Unset WORDS_FILE to use the built-in word list.");
                std::process::exit(1);
            }
        },
        None => {
            info!("Using built-in word list");
            Arc::new(RandomWordSource::with_default_words())
        }
    };

    // Initialize database connection and run migrations
    let db = match connect_and_migrate(&config.database_url).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };

    let service = Arc::new(HangmanService::new(
        db,
        word_source,
        config.default_attempts,
    ));
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier::new(config.reminder_sender.clone()));

    // Start reminder task
    spawn_reminder_job(
        service.clone(),
        notifier.clone(),
        Duration::from_secs(config.reminder_interval_seconds),
    );

    let routes = create_routes(service, notifier);

    let host = match config.host.parse::<std::net::IpAddr>() {
        Ok(host) => host,
        Err(e) => {
            tracing::error!("Invalid HOST '{}': {}", config.host, e);
            std::process::exit(1);
        }
    };

    info!("Server starting on {}:{}", host, config.port);

    let (addr, server) =
        warp::serve(routes).bind_with_graceful_shutdown((host, config.port), shutdown_signal());

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

async fn shutdown_signal() {
    // Wait for SIGINT (Ctrl+C) or SIGTERM
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(mut sigint), Ok(mut sigterm)) => {
                tokio::select! {
                    _ = sigint.recv() => {
                        info!("Received SIGINT, shutting down gracefully...");
                    }
                    _ = sigterm.recv() => {
                        info!("Received SIGTERM, shutting down gracefully...");
                    }
                }
            }
            _ => {
                tracing::warn!("Signal handlers unavailable, falling back to Ctrl+C");
                let _ = signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {}", e);
        }
        info!("Received Ctrl+C, shutting down gracefully...");
    }
}
