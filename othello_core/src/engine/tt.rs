use crate::engine::Move;
use crate::logic::board::{Bitboard, Board, Player, Symmetry};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TTFlag {
    Exact,
    LowerBound, // Beta cutoff (fail-high)
    UpperBound, // Alpha cutoff (fail-low)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TTKey {
    pub player: Player,
    pub black: Bitboard,
    pub white: Bitboard,
}

impl TTKey {
    pub const fn new(player: Player, board: &Board) -> Self {
        Self {
            player,
            black: board.black,
            white: board.white,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TTEntry {
    pub depth: u8,
    pub score: f64,
    pub best_move: Option<Move>,
    pub flag: TTFlag,
}

impl TTEntry {
    /// The same entry seen through `symmetry`; only the move changes.
    #[must_use]
    pub fn transformed(self, symmetry: Symmetry) -> Self {
        let best_move = self.best_move.map(|mv| match mv {
            Move::Place(sq) => Move::Place(symmetry.apply_square(sq)),
            Move::Pass => Move::Pass,
        });
        Self { best_move, ..self }
    }
}

/// Search results by position. Scores are relative to the player at the root
/// of the search that stored them, so the table must be cleared before a
/// search from a different root.
#[derive(Default)]
pub struct TranspositionTable {
    entries: HashMap<TTKey, TTEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self, key: &TTKey) -> Option<TTEntry> {
        self.entries.get(key).copied()
    }

    pub fn get_move(&self, key: &TTKey) -> Option<Move> {
        self.probe(key).and_then(|e| e.best_move)
    }

    /// Keeps the existing entry unless the new one was searched strictly deeper.
    pub fn store(&mut self, key: TTKey, entry: TTEntry) {
        match self.entries.get_mut(&key) {
            Some(existing) if existing.depth >= entry.depth => {}
            Some(existing) => *existing = entry,
            None => {
                self.entries.insert(key, entry);
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
