use crate::logic::board::{Bitboard, Board, Player, Square};
use crate::logic::generator::MoveGenerator;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("{1} has no legal move at {0}")]
    InvalidMove(Square, Player),
    #[error("row {0} column {1} is off the board")]
    OffBoard(usize, char),
    #[error("no move left to undo")]
    UndoUnderflow,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("`{0}` is not a square; expected a row 0-7 followed by a column A-H")]
pub struct ParseSquareError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("black and white share squares {0:#018x}")]
    OverlappingDiscs(Bitboard),
}

/// Checks that `player` may place a disc on `sq` and returns the discs it would flip.
pub fn is_valid_move(board: &Board, sq: Square, player: Player) -> Result<Bitboard, MoveError> {
    let own = board.get_board(player);
    let opp = board.get_board(player.opposite());
    if board.occupied() & sq.bit() != 0 {
        return Err(MoveError::InvalidMove(sq, player));
    }
    let flips = MoveGenerator::flips(own, opp, sq);
    if flips == 0 {
        return Err(MoveError::InvalidMove(sq, player));
    }
    Ok(flips)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_moves_are_valid() {
        let board = Board::new();
        for name in ["2D", "3C", "4F", "5E"] {
            let sq: Square = name.parse().unwrap();
            let flips = is_valid_move(&board, sq, Player::Black).unwrap();
            assert_eq!(flips.count_ones(), 1, "{name}");
        }
    }

    #[test]
    fn test_occupied_and_non_flanking_squares_are_rejected() {
        let board = Board::new();
        let occupied: Square = "3D".parse().unwrap();
        assert_eq!(
            is_valid_move(&board, occupied, Player::Black),
            Err(MoveError::InvalidMove(occupied, Player::Black))
        );
        let corner: Square = "0A".parse().unwrap();
        assert!(is_valid_move(&board, corner, Player::White).is_err());
    }

    #[test]
    fn test_error_messages() {
        let sq: Square = "2D".parse().unwrap();
        assert_eq!(
            MoveError::InvalidMove(sq, Player::White).to_string(),
            "white has no legal move at 2D"
        );
        assert!(SnapshotError::OverlappingDiscs(1).to_string().contains("0x0000000000000001"));
    }
}
