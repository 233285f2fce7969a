use crate::logic::board::{Bitboard, Direction, Square};

/// Result of one ray-cast pass for a single side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveScan {
    /// Empty squares where the side can place a disc.
    pub moves: Bitboard,
    /// Opponent discs that at least one of those moves would flip.
    pub capturable: Bitboard,
}

pub struct MoveGenerator;

impl MoveGenerator {
    /// Casts rays in all eight directions from `own` across `opp`.
    ///
    /// A ray that runs from an own disc over one or more opponent discs and
    /// ends on an empty square marks that square as a legal move. The same
    /// walk, run backwards from the empty squares, tells which opponent discs
    /// are bracketed on a line that could be closed this turn.
    #[must_use]
    pub fn scan(own: Bitboard, opp: Bitboard) -> MoveScan {
        let empty = !(own | opp);
        let mut scan = MoveScan::default();

        for dir in Direction::ALL {
            let from_own = Self::ray(dir, own, opp);
            scan.moves |= dir.shift(from_own) & empty;

            let from_empty = Self::ray(dir.opposite(), empty, opp);
            scan.capturable |= from_own & from_empty;
        }

        scan
    }

    /// Opponent discs reachable from `origin` by stepping over contiguous `opp` squares.
    #[inline]
    fn ray(dir: Direction, origin: Bitboard, opp: Bitboard) -> Bitboard {
        let mut run = dir.shift(origin) & opp;
        // An unbroken opponent run spans at most six squares.
        for _ in 0..5 {
            run |= dir.shift(run) & opp;
        }
        run
    }

    #[must_use]
    pub fn legal_moves(own: Bitboard, opp: Bitboard) -> Bitboard {
        Self::scan(own, opp).moves
    }

    /// Discs flipped by placing on `sq`. Zero means the placement is illegal.
    #[must_use]
    pub fn flips(own: Bitboard, opp: Bitboard, sq: Square) -> Bitboard {
        let mut flips = 0;
        for dir in Direction::ALL {
            let mut line = 0;
            let mut cursor = dir.shift(sq.bit());
            while cursor & opp != 0 {
                line |= cursor;
                cursor = dir.shift(cursor);
            }
            if cursor & own != 0 {
                flips |= line;
            }
        }
        flips
    }
}
