use serde::Deserialize;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use crate::game_service::{HangmanService, ServiceError};
use crate::notifier::Notifier;
use game_types::{CreateUserRequest, GameError, GameId, MakeMoveRequest, NewGameRequest, StringMessage};

pub mod cache;
pub mod config;
pub mod game_service;
pub mod jobs;
pub mod notifier;

#[derive(Deserialize)]
struct HighScoresQuery {
    limit: Option<u64>,
}

type JsonReply = WithStatus<Json>;

pub fn create_routes(
    service: Arc<HangmanService>,
    notifier: Arc<dyn Notifier>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let service_filter = warp::any().map({
        let service = service.clone();
        move || service.clone()
    });

    let notifier_filter = warp::any().map({
        let notifier = notifier.clone();
        move || notifier.clone()
    });

    // Health check endpoint
    let health = warp::path!("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let create_user = warp::path!("user")
        .and(warp::post())
        .and(warp::body::json::<CreateUserRequest>())
        .and(service_filter.clone())
        .and_then(handle_create_user);

    let user_games = warp::path!("user" / String / "games")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_games);

    let new_game = warp::path!("game")
        .and(warp::post())
        .and(warp::body::json::<NewGameRequest>())
        .and(service_filter.clone())
        .and_then(handle_new_game);

    let get_game = warp::path!("game" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_get_game);

    let make_move = warp::path!("game" / String)
        .and(warp::put())
        .and(warp::body::json::<MakeMoveRequest>())
        .and(service_filter.clone())
        .and_then(handle_make_move);

    let cancel_game = warp::path!("game" / String / "cancel")
        .and(warp::post())
        .and(service_filter.clone())
        .and_then(handle_cancel_game);

    let game_history = warp::path!("game" / String / "history")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_game_history);

    let scores = warp::path!("scores")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_scores);

    let user_scores = warp::path!("scores" / "user" / String)
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_user_scores);

    let high_scores = warp::path!("scores" / "high")
        .and(warp::get())
        .and(warp::query::<HighScoresQuery>())
        .and(service_filter.clone())
        .and_then(handle_high_scores);

    let rankings = warp::path!("rankings")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_rankings);

    let average_attempts = warp::path!("games" / "average_attempts")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(handle_average_attempts);

    let cache_task = warp::path!("tasks" / "cache_average_attempts")
        .and(warp::post())
        .and(service_filter.clone())
        .and_then(handle_cache_task);

    let reminder_cron = warp::path!("crons" / "send_reminder")
        .and(warp::get())
        .and(service_filter.clone())
        .and(notifier_filter.clone())
        .and_then(handle_reminder_cron);

    let user_routes = create_user.or(user_games);
    let game_routes = new_game
        .or(get_game)
        .or(make_move)
        .or(cancel_game)
        .or(game_history);
    let score_routes = scores.or(user_scores).or(high_scores).or(rankings);
    let job_routes = average_attempts.or(cache_task).or(reminder_cron);

    health
        .or(user_routes)
        .or(game_routes)
        .or(score_routes)
        .or(job_routes)
        .with(warp::log("hangman"))
}

fn json_reply<T: serde::Serialize>(body: &T, status: StatusCode) -> JsonReply {
    warp::reply::with_status(warp::reply::json(body), status)
}

fn error_reply(err: ServiceError) -> JsonReply {
    let status = match &err {
        ServiceError::Game(game_error) => match game_error {
            GameError::InvalidConfig { .. }
            | GameError::EmptyGuess
            | GameError::InvalidUserName => StatusCode::BAD_REQUEST,
            GameError::GameNotFound { .. } | GameError::UserNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            GameError::UserAlreadyExists { .. } | GameError::GameAlreadyOver => {
                StatusCode::CONFLICT
            }
        },
        ServiceError::Storage(e) => {
            error!("Storage failure: {:#}", e);
            return json_reply(
                &serde_json::json!({ "error": "Internal server error" }),
                StatusCode::INTERNAL_SERVER_ERROR,
            );
        }
    };

    json_reply(&serde_json::json!({ "error": err.to_string() }), status)
}

fn parse_game_id(raw: &str) -> Result<GameId, JsonReply> {
    Uuid::parse_str(raw).map_err(|_| {
        json_reply(
            &serde_json::json!({ "error": "Invalid game ID format" }),
            StatusCode::BAD_REQUEST,
        )
    })
}

fn respond<T: serde::Serialize>(result: Result<T, ServiceError>, status: StatusCode) -> JsonReply {
    match result {
        Ok(body) => json_reply(&body, status),
        Err(err) => error_reply(err),
    }
}

async fn handle_create_user(
    request: CreateUserRequest,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    let result = service
        .create_user(&request.user_name, request.email)
        .await
        .map(|user| StringMessage::new(format!("User {} created!", user.name)));
    Ok(respond(result, StatusCode::CREATED))
}

async fn handle_user_games(
    user_name: String,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    Ok(respond(service.get_user_games(&user_name).await, StatusCode::OK))
}

async fn handle_new_game(
    request: NewGameRequest,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    let result = service.new_game(&request.user_name, request.attempts).await;
    Ok(respond(result, StatusCode::CREATED))
}

async fn handle_get_game(
    game_id: String,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    let game_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };
    Ok(respond(service.get_game(game_id).await, StatusCode::OK))
}

async fn handle_make_move(
    game_id: String,
    request: MakeMoveRequest,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    let game_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };
    Ok(respond(
        service.make_move(game_id, &request.guess).await,
        StatusCode::OK,
    ))
}

async fn handle_cancel_game(
    game_id: String,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    let game_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };
    Ok(respond(service.cancel_game(game_id).await, StatusCode::OK))
}

async fn handle_game_history(
    game_id: String,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    let game_id = match parse_game_id(&game_id) {
        Ok(id) => id,
        Err(reply) => return Ok(reply),
    };
    Ok(respond(
        service.get_game_history(game_id).await,
        StatusCode::OK,
    ))
}

async fn handle_scores(service: Arc<HangmanService>) -> Result<JsonReply, warp::Rejection> {
    Ok(respond(service.get_scores().await, StatusCode::OK))
}

async fn handle_user_scores(
    user_name: String,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    Ok(respond(
        service.get_user_scores(&user_name).await,
        StatusCode::OK,
    ))
}

async fn handle_high_scores(
    query: HighScoresQuery,
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    let limit = query.limit.map(|limit| limit.min(100)); // max 100
    Ok(respond(
        service.get_high_scores(limit).await,
        StatusCode::OK,
    ))
}

async fn handle_rankings(service: Arc<HangmanService>) -> Result<JsonReply, warp::Rejection> {
    Ok(respond(service.get_user_rankings().await, StatusCode::OK))
}

async fn handle_average_attempts(
    service: Arc<HangmanService>,
) -> Result<JsonReply, warp::Rejection> {
    let message = StringMessage::new(service.average_attempts().await);
    Ok(json_reply(&message, StatusCode::OK))
}

async fn handle_cache_task(
    service: Arc<HangmanService>,
) -> Result<Box<dyn warp::Reply>, warp::Rejection> {
    match service.refresh_average_attempts().await {
        Ok(()) => Ok(Box::new(StatusCode::NO_CONTENT)),
        Err(err) => Ok(Box::new(error_reply(err))),
    }
}

async fn handle_reminder_cron(
    service: Arc<HangmanService>,
    notifier: Arc<dyn Notifier>,
) -> Result<JsonReply, warp::Rejection> {
    let result = service
        .send_reminders(notifier.as_ref())
        .await
        .map(|sent| StringMessage::new(format!("Sent {} reminders", sent)));
    Ok(respond(result, StatusCode::OK))
}
