use crate::logic::board::{Player, Square};
use crate::logic::game::{GameState, Winner};
use crate::logic::rules::MoveError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod config;
pub mod eval;
pub mod move_list;
pub mod search;
pub mod tt;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Move {
    Place(Square),
    /// The side to move has no placement and skips its turn.
    #[default]
    Pass,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Place(sq) => write!(f, "{sq}"),
            Self::Pass => f.write_str("skip"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchLimit {
    Depth(u8),
    Time(u64), // milliseconds
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u32,
    pub time_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOutcome {
    /// From the point of view of the player to move at the root.
    pub score: f64,
    pub best_move: Option<Move>,
}

#[derive(Debug, Error)]
pub enum SearchError {
    /// The search generated a move as legal and the game then refused it.
    #[error("engine invariant violated: generated move {mv} was rejected")]
    EngineInvariantViolation {
        mv: Move,
        #[source]
        source: MoveError,
    },
    #[error("search deadline reached")]
    Timeout,
}

/// Scores a position for `player` against `opponent`.
///
/// Finished games score `+inf` for a `player` win, `-inf` for a loss and
/// `0.0` for a draw. Everything else is finite.
pub trait Evaluator {
    fn evaluate(&self, state: &GameState, player: Player, opponent: Player) -> f64;
}

pub trait Searcher {
    /// Picks a move for the side to move, or `None` once the game is over.
    fn search(
        &mut self,
        game_state: &GameState,
        limit: SearchLimit,
    ) -> Result<Option<(Move, SearchStats)>, SearchError>;
}

/// Lets `searcher` play both sides until the game ends.
pub fn play_out<S: Searcher + ?Sized>(
    state: &mut GameState,
    searcher: &mut S,
    limit: SearchLimit,
) -> Result<Option<Winner>, SearchError> {
    while !state.is_game_over() {
        let Some((mv, stats)) = searcher.search(state, limit)? else {
            break;
        };
        log::debug!(
            "turn {}: {} plays {mv} ({stats:?})",
            state.turn_number(),
            state.current_player()
        );
        state
            .play(mv)
            .map_err(|source| SearchError::EngineInvariantViolation { mv, source })?;
    }
    Ok(state.winner())
}
