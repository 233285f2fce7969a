use crate::engine::Move;
use crate::logic::board::{Bitboard, BitboardIterator};
use crate::logic::eval_constants::MOVE_ORDER;

// No Othello position has more than 33 legal moves, and there are only 60 empty squares at most.
const MAX_MOVES: usize = 64;

pub struct MoveList {
    moves: [Move; MAX_MOVES],
    count: usize,
}

impl Default for MoveList {
    fn default() -> Self {
        Self {
            moves: [Move::default(); MAX_MOVES],
            count: 0,
        }
    }
}

impl MoveList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders the placements in `legal`: the hash move first, then by board zone
    /// (corners, edges, centre, semi-edges, C-squares, X-squares). An empty
    /// `legal` yields a single pass.
    pub fn ordered(legal: Bitboard, hash_move: Option<Move>) -> Self {
        let mut list = Self::new();
        if legal == 0 {
            list.push(Move::Pass);
            return list;
        }

        let mut remaining = legal;
        if let Some(Move::Place(sq)) = hash_move {
            if remaining & sq.bit() != 0 {
                list.push(Move::Place(sq));
                remaining &= !sq.bit();
            }
        }
        for zone in MOVE_ORDER {
            for sq in BitboardIterator::new(remaining & zone) {
                list.push(Move::Place(sq));
            }
        }
        list
    }

    pub fn push(&mut self, mv: Move) {
        if let Some(slot) = self.moves.get_mut(self.count) {
            *slot = mv;
            self.count += 1;
        } else {
            debug_assert!(false, "MoveList overflow! Max moves: {MAX_MOVES}");
        }
    }

    pub const fn len(&self) -> usize {
        self.count
    }

    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.get(0..self.count).unwrap_or(&[]).iter()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
