use std::str::FromStr;

use super::models::{OverUnder, PickModel, PickScore};
use crate::game::models::{FinalScore, GameModel};

/// Straight-up winner check: a tie has no winner, so nobody is correct
pub fn spread_correct(winner_team_id: Option<i64>, picked_team_id: i64) -> bool {
    winner_team_id.is_some_and(|winner| winner == picked_team_id)
}

/// Strict comparison against the line; landing exactly on it is a miss for
/// both sides, and an unrecognised side is never correct.
pub fn over_under_correct(score: FinalScore, total_line: f64, picked: &str) -> bool {
    let actual = score.combined();
    match OverUnder::from_str(picked) {
        Ok(OverUnder::Over) => actual > total_line,
        Ok(OverUnder::Under) => actual < total_line,
        Err(_) => false,
    }
}

/// Scores one pick against a game's final score
pub fn score_pick(game: &GameModel, score: FinalScore, pick: &PickModel) -> PickScore {
    PickScore::new(
        spread_correct(game.winner_team_id, pick.picked_team_id),
        over_under_correct(score, game.total, &pick.picked_over_under),
    )
}
