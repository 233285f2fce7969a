use crate::engine::{Evaluator, Move};
use crate::logic::board::{BitboardIterator, Player};
use crate::logic::game::{GameState, Snapshot};
use log::warn;
use rand::seq::IteratorRandom;
use rand::Rng;
use std::collections::HashSet;

/// Random openings are between this many plies long.
pub const MIN_RANDOM_PLIES: u32 = 4;
pub const MAX_RANDOM_PLIES: u32 = 32;

/// Give up after this many rejected candidates per requested position.
const ATTEMPTS_PER_POSITION: usize = 500;

/// Plays random games into the early middlegame and keeps positions that
/// `evaluator` rates as roughly even for both sides.
///
/// A position is kept when `|eval(black) - eval(white)| < max_difference`
/// and neither the same discs with the same side to move nor a finished
/// game has been produced already. May return fewer than `count`
/// positions if too many candidates are rejected.
pub fn generate_balanced_positions<R, E>(
    rng: &mut R,
    count: usize,
    evaluator: &E,
    max_difference: f64,
) -> Vec<Snapshot>
where
    R: Rng + ?Sized,
    E: Evaluator + ?Sized,
{
    let mut positions = Vec::with_capacity(count);
    let mut seen = HashSet::new();
    let max_attempts = count.saturating_mul(ATTEMPTS_PER_POSITION);

    for _ in 0..max_attempts {
        if positions.len() >= count {
            break;
        }

        let state = random_game(rng);
        if state.is_game_over() {
            continue;
        }

        let black = evaluator.evaluate(&state, Player::Black, Player::White);
        let white = evaluator.evaluate(&state, Player::White, Player::Black);
        if (black - white).abs() >= max_difference {
            continue;
        }

        let snapshot = state.snapshot();
        if seen.insert((snapshot.black_board, snapshot.white_board, snapshot.current_player)) {
            positions.push(snapshot);
        }
    }

    if positions.len() < count {
        warn!(
            "generated {} of {count} balanced positions before giving up",
            positions.len()
        );
    }
    positions
}

fn random_game<R: Rng + ?Sized>(rng: &mut R) -> GameState {
    let mut state = GameState::new();
    let plies = rng.gen_range(MIN_RANDOM_PLIES..=MAX_RANDOM_PLIES);
    for _ in 0..plies {
        if state.is_game_over() {
            break;
        }
        let moves = state.get_valid_moves(state.current_player());
        let mv = BitboardIterator::new(moves)
            .choose(rng)
            .map_or(Move::Pass, Move::Place);
        if state.play(mv).is_err() {
            break;
        }
    }
    state
}
