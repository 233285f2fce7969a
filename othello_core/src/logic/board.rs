use crate::logic::rules::ParseSquareError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Bitboard = u64;

pub const FULL: Bitboard = u64::MAX;
pub const CORNERS: Bitboard = 0x8100_0000_0000_0081;
pub const RANK_TOP: Bitboard = 0x0000_0000_0000_00FF;
pub const RANK_BOTTOM: Bitboard = 0xFF00_0000_0000_0000;
pub const FILE_A: Bitboard = 0x0101_0101_0101_0101;
pub const FILE_H: Bitboard = 0x8080_8080_8080_8080;
pub const BORDER: Bitboard = RANK_TOP | RANK_BOTTOM | FILE_A | FILE_H;

const NOT_FILE_A: Bitboard = !FILE_A;
const NOT_FILE_H: Bitboard = !FILE_H;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Black,
    White,
}

impl Player {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Black => 0,
            Self::White => 1,
        }
    }

    pub const ALL: [Self; 2] = [Self::Black, Self::White];
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => f.write_str("black"),
            Self::White => f.write_str("white"),
        }
    }
}

/// A square on the 8x8 board, stored as `row * 8 + col`.
///
/// Row 0 is the top of the board and column 0 is `A`. At the boundary a
/// square is written as its row number followed by its column letter, so
/// the four opening moves for black are `2D`, `3C`, `4F` and `5E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Square(u8);

impl Square {
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        if index < 64 {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn from_coords(row: usize, col: usize) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self((row * 8 + col) as u8))
        } else {
            None
        }
    }

    /// Builds a square from a row number and a column letter (`A`-`H`, either case).
    #[must_use]
    pub fn from_row_letter(row: usize, letter: char) -> Option<Self> {
        let letter = letter.to_ascii_uppercase();
        if !('A'..='H').contains(&letter) {
            return None;
        }
        Self::from_coords(row, letter as usize - 'A' as usize)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn row(self) -> usize {
        self.0 as usize / 8
    }

    pub const fn col(self) -> usize {
        self.0 as usize % 8
    }

    pub const fn letter(self) -> char {
        (b'A' + (self.0 % 8)) as char
    }

    pub const fn bit(self) -> Bitboard {
        1 << self.0
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row(), self.letter())
    }
}

impl TryFrom<u8> for Square {
    type Error = ParseSquareError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(usize::from(index)).ok_or_else(|| ParseSquareError(index.to_string()))
    }
}

impl From<Square> for u8 {
    fn from(sq: Square) -> Self {
        sq.0
    }
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        let (Some(row), Some(letter), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ParseSquareError(s.to_string()));
        };
        row.to_digit(10)
            .and_then(|row| Self::from_row_letter(row as usize, letter))
            .ok_or_else(|| ParseSquareError(s.to_string()))
    }
}

/// One of the eight compass directions a ray can travel in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub const ALL: [Self; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
            Self::NorthEast => Self::SouthWest,
            Self::NorthWest => Self::SouthEast,
            Self::SouthEast => Self::NorthWest,
            Self::SouthWest => Self::NorthEast,
        }
    }

    /// Bits that survive a one-step shift; anything that crossed the A/H file is dropped.
    pub const fn wrap_mask(self) -> Bitboard {
        match self {
            Self::North | Self::South => FULL,
            Self::East | Self::NorthEast | Self::SouthEast => NOT_FILE_A,
            Self::West | Self::NorthWest | Self::SouthWest => NOT_FILE_H,
        }
    }

    /// Moves every set bit one square in this direction.
    #[inline]
    pub const fn shift(self, bb: Bitboard) -> Bitboard {
        let shifted = match self {
            Self::North => bb >> 8,
            Self::South => bb << 8,
            Self::East => bb << 1,
            Self::West => bb >> 1,
            Self::NorthEast => bb >> 7,
            Self::NorthWest => bb >> 9,
            Self::SouthEast => bb << 9,
            Self::SouthWest => bb << 7,
        };
        shifted & self.wrap_mask()
    }
}

/// The four line axes a disc can be flanked along.
pub const AXES: [(Direction, Direction); 4] = [
    (Direction::North, Direction::South),
    (Direction::East, Direction::West),
    (Direction::NorthEast, Direction::SouthWest),
    (Direction::NorthWest, Direction::SouthEast),
];

/// Two occupancy masks, one per colour. `black & white` is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    pub black: Bitboard,
    pub white: Bitboard,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::from_masks(0, 0);
        board.setup_initial_position();
        board
    }

    #[must_use]
    pub const fn from_masks(black: Bitboard, white: Bitboard) -> Self {
        Self { black, white }
    }

    fn setup_initial_position(&mut self) {
        self.add_disc(3, 3, Player::White);
        self.add_disc(4, 4, Player::White);
        self.add_disc(3, 4, Player::Black);
        self.add_disc(4, 3, Player::Black);
    }

    /// Puts a disc on an empty or occupied square, overwriting whatever was there.
    pub fn add_disc(&mut self, row: usize, col: usize, player: Player) {
        let Some(sq) = Square::from_coords(row, col) else {
            return;
        };
        self.set_square(sq, Some(player));
    }

    pub fn set_square(&mut self, sq: Square, disc: Option<Player>) {
        let bit = sq.bit();
        self.black &= !bit;
        self.white &= !bit;
        match disc {
            Some(Player::Black) => self.black |= bit,
            Some(Player::White) => self.white |= bit,
            None => {}
        }
    }

    #[must_use]
    pub const fn get_board(&self, player: Player) -> Bitboard {
        match player {
            Player::Black => self.black,
            Player::White => self.white,
        }
    }

    fn get_board_mut(&mut self, player: Player) -> &mut Bitboard {
        match player {
            Player::Black => &mut self.black,
            Player::White => &mut self.white,
        }
    }

    /// Squares holding no disc, restricted to the 64 board bits.
    #[must_use]
    pub const fn empty(&self) -> Bitboard {
        !(self.black | self.white) & FULL
    }

    #[must_use]
    pub const fn occupied(&self) -> Bitboard {
        self.black | self.white
    }

    #[must_use]
    pub const fn disc_count(&self, player: Player) -> u32 {
        self.get_board(player).count_ones()
    }

    #[must_use]
    pub const fn placed_discs(&self) -> u32 {
        self.occupied().count_ones()
    }

    #[must_use]
    pub const fn get_square(&self, sq: Square) -> Option<Player> {
        if self.black & sq.bit() != 0 {
            Some(Player::Black)
        } else if self.white & sq.bit() != 0 {
            Some(Player::White)
        } else {
            None
        }
    }

    /// Places `player`'s disc on `sq` and turns every disc in `flips` to `player`.
    pub fn place_and_flip(&mut self, player: Player, sq: Square, flips: Bitboard) {
        *self.get_board_mut(player) |= sq.bit() | flips;
        *self.get_board_mut(player.opposite()) &= !flips;
    }

    /// Exact inverse of [`Board::place_and_flip`].
    pub fn unplace_and_unflip(&mut self, player: Player, sq: Square, flips: Bitboard) {
        *self.get_board_mut(player) &= !(sq.bit() | flips);
        *self.get_board_mut(player.opposite()) |= flips;
    }

    #[must_use]
    pub fn transformed(&self, symmetry: Symmetry) -> Self {
        Self {
            black: symmetry.apply(self.black),
            white: symmetry.apply(self.white),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  A B C D E F G H")?;
        for row in 0..8 {
            write!(f, "{row}")?;
            for col in 0..8 {
                let cell = Square::from_coords(row, col).and_then(|sq| self.get_square(sq));
                let c = match cell {
                    Some(Player::Black) => 'X',
                    Some(Player::White) => 'O',
                    None => '.',
                };
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The eight symmetries of the square board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symmetry {
    Identity,
    /// Quarter turn clockwise.
    Rotate90,
    Rotate180,
    Rotate270,
    /// Top and bottom rows swap.
    FlipVertical,
    /// Columns A and H swap.
    FlipHorizontal,
    /// Mirror in the A0-H7 diagonal.
    Transpose,
    /// Mirror in the H0-A7 diagonal.
    AntiTranspose,
}

impl Symmetry {
    /// Every rotation followed by a horizontal or vertical mirror. The eight
    /// compositions collapse onto these four reflections.
    pub const MIRRORS: [Self; 4] = [
        Self::FlipHorizontal,
        Self::FlipVertical,
        Self::Transpose,
        Self::AntiTranspose,
    ];

    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::Rotate90 => Self::Rotate270,
            Self::Rotate270 => Self::Rotate90,
            other => other,
        }
    }

    #[must_use]
    pub const fn apply_square(self, sq: Square) -> Square {
        let (r, c) = (sq.row(), sq.col());
        let (nr, nc) = match self {
            Self::Identity => (r, c),
            Self::Rotate90 => (c, 7 - r),
            Self::Rotate180 => (7 - r, 7 - c),
            Self::Rotate270 => (7 - c, r),
            Self::FlipVertical => (7 - r, c),
            Self::FlipHorizontal => (r, 7 - c),
            Self::Transpose => (c, r),
            Self::AntiTranspose => (7 - c, 7 - r),
        };
        Square((nr * 8 + nc) as u8)
    }

    #[must_use]
    pub fn apply(self, bb: Bitboard) -> Bitboard {
        match self {
            Self::Identity => bb,
            Self::Rotate180 => bb.reverse_bits(),
            Self::FlipVertical => bb.swap_bytes(),
            _ => BitboardIterator::new(bb).fold(0, |acc, sq| acc | self.apply_square(sq).bit()),
        }
    }
}

pub struct BitboardIterator {
    bb: Bitboard,
}

impl BitboardIterator {
    pub const fn new(bb: Bitboard) -> Self {
        Self { bb }
    }
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bb == 0 {
            None
        } else {
            let lsb = self.bb.trailing_zeros() as u8;
            self.bb &= self.bb - 1;
            Some(Square(lsb))
        }
    }
}
