use crate::logic::board::{Bitboard, CORNERS, FILE_A, FILE_H, RANK_BOTTOM, RANK_TOP};

// Board zones. Together with CORNERS they partition all 64 squares.

/// X-squares: diagonal neighbours of the corners.
pub const RED_ZONE: Bitboard = 0x0042_0000_0000_4200;
/// C-squares: edge squares orthogonally next to the corners.
pub const ORANGE_ZONE: Bitboard = 0x4281_0000_0000_8142;
/// Edge squares at least two steps away from any corner.
pub const TRUE_EDGES: Bitboard = 0x3C00_8181_8181_003C;
/// The second ring, minus the X-squares.
pub const SEMI_EDGE: Bitboard = 0x003C_4242_4242_3C00;
/// The inner 4x4 block.
pub const CENTER: Bitboard = 0x0000_3C3C_3C3C_0000;

/// Move ordering for the search, strongest zone first.
pub const MOVE_ORDER: [Bitboard; 6] = [
    CORNERS,
    TRUE_EDGES,
    CENTER,
    SEMI_EDGE,
    ORANGE_ZONE,
    RED_ZONE,
];

// Wedge detection runs along the edge a square sits on; corners never count.
pub const HORIZONTAL_EDGES: Bitboard = (RANK_TOP | RANK_BOTTOM) & !CORNERS;
pub const VERTICAL_EDGES: Bitboard = (FILE_A | FILE_H) & !CORNERS;

pub const WEDGE_BONUS: f64 = 2.0;
pub const WEDGE_GAP_PENALTY: f64 = -1.0;

pub const ORANGE_ZONE_PENALTY: f64 = -0.5;
pub const RED_ZONE_PENALTY: f64 = -5.0;

pub const SAFE_DISC_WEIGHT: f64 = 1.0;
pub const UNSTABLE_DISC_WEIGHT: f64 = -1.0;
