use crate::logic::board::{
    Bitboard, Board, Direction, Player, AXES, BORDER, CORNERS, FILE_A, FILE_H, RANK_BOTTOM,
    RANK_TOP,
};
use crate::logic::generator::MoveGenerator;

/// The safe fixpoint cannot grow more often than there are squares.
const MAX_ITERATIONS: usize = 64;

const fn axis_border(axis: Direction) -> Bitboard {
    match axis {
        Direction::North | Direction::South => RANK_TOP | RANK_BOTTOM,
        Direction::East | Direction::West => FILE_A | FILE_H,
        _ => BORDER,
    }
}

/// Discs of `own` that can never be flipped again.
///
/// Corners seed the set, unbroken edge runs from those corners are added,
/// and then any disc whose every axis is closed on at least one side (by the
/// board edge or by a safe disc) joins until nothing changes.
#[must_use]
pub fn safe_discs(own: Bitboard) -> Bitboard {
    let corners = own & CORNERS;
    if corners == 0 {
        return 0;
    }

    let mut safe = corners;
    for dir in [Direction::North, Direction::South, Direction::East, Direction::West] {
        let mut run = corners;
        loop {
            let next = run | (dir.shift(run) & own);
            if next == run {
                break;
            }
            run = next;
        }
        safe |= run;
    }

    for _ in 0..MAX_ITERATIONS {
        let mut closed = own & !safe;
        for (a, b) in AXES {
            closed &= a.shift(safe) | b.shift(safe) | axis_border(a);
        }
        if closed == 0 {
            break;
        }
        safe |= closed;
    }

    safe
}

/// Per-player safe and unstable masks. Stable discs are whatever is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StabilityInfo {
    pub safe: [Bitboard; 2],
    pub unstable: [Bitboard; 2],
}

impl StabilityInfo {
    pub const fn safe(&self, player: Player) -> Bitboard {
        self.safe[player.index()]
    }

    pub const fn unstable(&self, player: Player) -> Bitboard {
        self.unstable[player.index()]
    }

    pub const fn stable(&self, board: &Board, player: Player) -> Bitboard {
        board.get_board(player) & !(self.safe(player) | self.unstable(player))
    }
}

/// Everything derived from one board: both sides' legal moves and disc stability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Analysis {
    pub moves: [Bitboard; 2],
    pub stability: StabilityInfo,
}

impl Analysis {
    #[must_use]
    pub fn of(board: &Board) -> Self {
        let black = MoveGenerator::scan(board.black, board.white);
        let white = MoveGenerator::scan(board.white, board.black);
        Self {
            moves: [black.moves, white.moves],
            stability: StabilityInfo {
                safe: [safe_discs(board.black), safe_discs(board.white)],
                // A side's discs are unstable when the other side can flip them now.
                unstable: [white.capturable, black.capturable],
            },
        }
    }

    pub const fn moves(&self, player: Player) -> Bitboard {
        self.moves[player.index()]
    }
}
