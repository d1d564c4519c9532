use game_types::{GameState, GameStatus, User};
use std::cmp::Ordering;

/// Number of results returned by high score queries when none is requested.
pub const DEFAULT_HIGH_SCORE_LIMIT: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserStats {
    pub win_percentage: f64,
    pub average_misses: f64,
    pub games_counted: usize,
}

impl UserStats {
    /// Compute stats over the finished games in `games`.
    /// Cancelled and in-progress games are ignored. Returns None when
    /// nothing has finished yet.
    pub fn from_games(games: &[GameState]) -> Option<Self> {
        let completed: Vec<&GameState> = games
            .iter()
            .filter(|g| matches!(g.status, GameStatus::Won | GameStatus::Lost))
            .collect();

        let total = completed.len();
        if total == 0 {
            return None;
        }

        let wins = completed.iter().filter(|g| g.is_won()).count();
        let total_misses: i32 = completed.iter().map(|g| g.misses()).sum();

        Some(Self {
            win_percentage: 100.0 * wins as f64 / total as f64,
            average_misses: total_misses as f64 / total as f64,
            games_counted: total,
        })
    }
}

/// Recompute a user's derived stats from scratch. Returns whether anything
/// was recomputed; with no finished games the user is left unchanged.
pub fn update_stats(user: &mut User, games: &[GameState]) -> bool {
    match UserStats::from_games(games) {
        Some(stats) => {
            user.win_percentage = stats.win_percentage;
            user.average_misses = stats.average_misses;
            true
        }
        None => false,
    }
}

/// Order users best first: highest win percentage, then fewest average misses.
pub fn rank_users(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(compare_rank);
    users
}

fn compare_rank(a: &User, b: &User) -> Ordering {
    b.win_percentage
        .total_cmp(&a.win_percentage)
        .then_with(|| a.average_misses.total_cmp(&b.average_misses))
}

/// Average attempts remaining across open games, None when there are none.
pub fn average_attempts_remaining(games: &[GameState]) -> Option<f64> {
    let open: Vec<&GameState> = games.iter().filter(|g| !g.is_over()).collect();
    if open.is_empty() {
        return None;
    }

    let total: i32 = open.iter().map(|g| g.attempts_remaining).sum();
    Some(total as f64 / open.len() as f64)
}

pub fn average_attempts_message(average: f64) -> String {
    format!("The average moves remaining is {:.2}", average)
}
