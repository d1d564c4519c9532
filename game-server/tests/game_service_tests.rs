
use game_server::game_service::{GET_GAME_MESSAGE, NEW_GAME_MESSAGE, ServiceError};
use game_types::GameError;
use sea_orm::ConnectionTrait;
use test_helpers::*;
use uuid::Uuid;

#[tokio::test]
async fn test_new_game_form() {
    let setup = TestServiceSetup::new("hangman").await;
    setup.create_user("alice", None).await;

    let form = setup.service.new_game("alice", Some(8)).await.unwrap();
    assert_eq!(form.user_name, "alice");
    assert_eq!(form.revealed_pattern, "_______");
    assert_eq!(form.attempts_remaining, 8);
    assert_eq!(form.message, NEW_GAME_MESSAGE);
    assert!(!form.game_over);

    let fetched = setup.service.get_game(form.id).await.unwrap();
    assert_eq!(fetched.message, GET_GAME_MESSAGE);
    assert_eq!(fetched.revealed_pattern, form.revealed_pattern);
}

#[tokio::test]
async fn test_new_game_uses_default_attempts() {
    let setup = TestServiceSetup::new("boat").await;
    setup.create_user("alice", None).await;

    let form = setup.service.new_game("alice", None).await.unwrap();
    assert_eq!(form.attempts_remaining, 6);
}

#[tokio::test]
async fn test_new_game_errors() {
    let setup = TestServiceSetup::new("boat").await;

    let result = setup.service.new_game("nobody", None).await;
    assert!(matches!(
        result,
        Err(ServiceError::Game(GameError::UserNotFound { .. }))
    ));

    setup.create_user("alice", None).await;
    let result = setup.service.new_game("alice", Some(-1)).await;
    assert!(matches!(
        result,
        Err(ServiceError::Game(GameError::InvalidConfig { attempts: -1 }))
    ));
}

#[tokio::test]
async fn test_create_user_trims_and_rejects_duplicates() {
    let setup = TestServiceSetup::new("boat").await;

    let user = setup
        .service
        .create_user("  alice ", Some("  ".to_string()))
        .await
        .unwrap();
    assert_eq!(user.name, "alice");
    assert_eq!(user.email, None);

    let result = setup.service.create_user("alice", None).await;
    assert!(matches!(
        result,
        Err(ServiceError::Game(GameError::UserAlreadyExists { .. }))
    ));

    let result = setup.service.create_user("", None).await;
    assert!(matches!(
        result,
        Err(ServiceError::Game(GameError::InvalidUserName))
    ));
}

#[tokio::test]
async fn test_losing_game_records_score() {
    let setup = TestServiceSetup::new("boat").await;
    let alice = setup.create_user("alice", None).await;
    let game_id = setup.start_game("alice", Some(2)).await;

    let form = setup.play(game_id, &["x", "y"]).await;
    assert!(form.game_over);
    assert!(!form.won);
    assert_eq!(form.attempts_remaining, 0);
    assert_eq!(form.letters_missed, "xy");
    assert!(form.message.ends_with("Game over!"));

    let scores = setup.service.get_user_scores(&alice.name).await.unwrap();
    assert_eq!(scores.len(), 1);
    assert!(!scores[0].won);
    assert_eq!(scores[0].misses, 2);
}

#[tokio::test]
async fn test_failed_score_write_leaves_game_in_progress() {
    let setup = TestServiceSetup::new("at").await;
    setup.create_user("alice", None).await;
    let game_id = setup.start_game("alice", None).await;

    setup
        .db
        .execute_unprepared("ALTER TABLE scores RENAME TO scores_unavailable")
        .await
        .unwrap();

    let result = setup.service.make_move(game_id, "at").await;
    assert!(matches!(result, Err(ServiceError::Storage(_))));

    let form = setup.service.get_game(game_id).await.unwrap();
    assert!(!form.game_over);
    assert!(!form.won);
    assert_eq!(form.revealed_pattern, "__");
    assert!(form.guesses.is_empty());

    setup
        .db
        .execute_unprepared("ALTER TABLE scores_unavailable RENAME TO scores")
        .await
        .unwrap();

    let form = setup.service.make_move(game_id, "at").await.unwrap();
    assert!(form.won);
    assert_eq!(form.message, "You correctly guessed the whole word! You win!");

    let scores = setup.service.get_scores().await.unwrap();
    assert_eq!(scores.len(), 1);
    assert!(scores[0].won);
    assert_eq!(scores[0].misses, 0);
}

#[tokio::test]
async fn test_repeated_guess_costs_an_attempt() {
    let setup = TestServiceSetup::new("boat").await;
    setup.create_user("alice", None).await;
    let game_id = setup.start_game("alice", None).await;

    let form = setup.play(game_id, &["b", "B"]).await;
    assert_eq!(form.message, "You already guessed 'b'!");
    assert_eq!(form.attempts_remaining, 5);
    assert_eq!(form.revealed_pattern, "b___");

    let history = setup.service.get_game_history(game_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(!history[0].was_miss);
    assert!(history[1].was_miss);
}

#[tokio::test]
async fn test_game_state_survives_reload() {
    let setup = TestServiceSetup::new("boat").await;
    setup.create_user("alice", None).await;
    let game_id = setup.start_game("alice", None).await;

    setup.play(game_id, &["o", "q"]).await;

    let form = setup.service.get_game(game_id).await.unwrap();
    assert_eq!(form.revealed_pattern, "_o__");
    assert_eq!(form.attempts_remaining, 5);
    assert_eq!(form.guesses.len(), 2);
    assert_eq!(form.guesses[1].resulting_pattern, "_o__");
}

#[tokio::test]
async fn test_cancel_finished_game_is_refused() {
    let setup = TestServiceSetup::new("boat").await;
    setup.create_user("alice", None).await;
    let game_id = setup.start_game("alice", None).await;

    setup.play(game_id, &["boat"]).await;

    let form = setup.service.cancel_game(game_id).await.unwrap();
    assert_eq!(form.message, "Game already over, it cannot be cancelled!");
    assert!(form.won);
    assert!(!form.cancelled);
}

#[tokio::test]
async fn test_unknown_game() {
    let setup = TestServiceSetup::new("boat").await;

    for result in [
        setup.service.get_game(Uuid::new_v4()).await,
        setup.service.make_move(Uuid::new_v4(), "a").await,
        setup.service.cancel_game(Uuid::new_v4()).await,
    ] {
        assert!(matches!(
            result,
            Err(ServiceError::Game(GameError::GameNotFound { .. }))
        ));
    }
}

#[tokio::test]
async fn test_rankings_persist_stats() {
    let setup = TestServiceSetup::new("at").await;
    setup.create_user("alice", None).await;
    setup.create_user("bob", None).await;
    setup.create_user("carol", None).await;

    // alice: one win, one loss
    let game = setup.start_game("alice", Some(1)).await;
    setup.play(game, &["at"]).await;
    let game = setup.start_game("alice", Some(1)).await;
    setup.play(game, &["z"]).await;

    // bob: one win with a miss
    let game = setup.start_game("bob", None).await;
    setup.play(game, &["z", "a", "t"]).await;

    // carol only has a cancelled game
    let game = setup.start_game("carol", None).await;
    setup.service.cancel_game(game).await.unwrap();

    let rankings = setup.service.get_user_rankings().await.unwrap();
    let names: Vec<&str> = rankings.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["bob", "alice", "carol"]);
    assert_eq!(rankings[0].win_percentage, 100.0);
    assert_eq!(rankings[1].win_percentage, 50.0);
    assert_eq!(rankings[1].average_misses, 0.5);
    assert_eq!(rankings[2].win_percentage, 0.0);
    assert_eq!(rankings[2].rank, 3);
}

#[tokio::test]
async fn test_high_scores_default_limit() {
    let setup = TestServiceSetup::new("at").await;
    setup.create_user("alice", None).await;

    for misses in 0..7 {
        let game = setup.start_game("alice", None).await;
        let mut guesses: Vec<&str> = ["b", "c", "d", "e", "f", "g"][..misses].to_vec();
        guesses.push("at");
        setup.play(game, &guesses).await;
    }

    let high = setup.service.get_high_scores(None).await.unwrap();
    let misses: Vec<i32> = high.iter().map(|s| s.misses).collect();
    assert_eq!(misses, vec![0, 1, 2, 3, 4]);

    assert_eq!(setup.service.get_scores().await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_average_attempts_over_open_games() {
    let setup = TestServiceSetup::new("boat").await;
    setup.create_user("alice", None).await;

    assert_eq!(setup.service.average_attempts().await, "");

    let first = setup.start_game("alice", Some(4)).await;
    setup.start_game("alice", Some(7)).await;
    setup.play(first, &["z"]).await;

    setup.service.refresh_average_attempts().await.unwrap();
    assert_eq!(
        setup.service.average_attempts().await,
        "The average moves remaining is 5.00"
    );
}

#[tokio::test]
async fn test_reminders_go_to_users_with_open_games() {
    let setup = TestServiceSetup::new("boat").await;
    setup.create_user("alice", Some("alice@example.com")).await;
    setup.create_user("bob", Some("bob@example.com")).await;
    setup.create_user("carol", None).await;

    setup.start_game("alice", None).await;
    setup.start_game("alice", None).await;
    let bobs = setup.start_game("bob", None).await;
    setup.service.cancel_game(bobs).await.unwrap();
    setup.start_game("carol", None).await;

    let notifier = RecordingNotifier::default();
    let sent = setup.service.send_reminders(&notifier).await.unwrap();
    assert_eq!(sent, 1);

    let messages = notifier.sent.lock().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, "alice@example.com");
    assert!(messages[0].1.contains("2 unfinished Hangman games"));
}

#[tokio::test]
async fn test_failed_reminders_are_not_counted() {
    let setup = TestServiceSetup::new("boat").await;
    setup.create_user("alice", Some("alice@example.com")).await;
    setup.start_game("alice", None).await;

    let sent = setup.service.send_reminders(&FailingNotifier).await.unwrap();
    assert_eq!(sent, 0);
}
