use crate::engine::Move;
use crate::logic::board::{Bitboard, Board, Player, Square};
use crate::logic::rules::{is_valid_move, MoveError, SnapshotError};
use crate::logic::stability::{Analysis, StabilityInfo};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    Player(Player),
    Draw,
}

/// Everything needed to take back one placement or pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoRecord {
    /// `None` when the turn was skipped.
    pub square: Option<Square>,
    pub flips: Bitboard,
    pub player: Player,
    turn_number: u32,
    consecutive_passes: u8,
    game_over: bool,
    last_move: Option<Square>,
    analysis: Analysis,
}

/// The minimal serialized form of a position. Move lists and stability are
/// recomputed from it on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub black_board: Bitboard,
    pub white_board: Bitboard,
    pub current_player: Player,
    pub current_turn: u32,
    pub game_over: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "Snapshot", try_from = "Snapshot")]
pub struct GameState {
    board: Board,
    current_player: Player,
    turn_number: u32,
    consecutive_passes: u8,
    game_over: bool,
    last_move: Option<Square>,
    history: Vec<UndoRecord>,
    analysis: Analysis,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    #[must_use]
    pub fn new() -> Self {
        let board = Board::new();
        Self {
            analysis: Analysis::of(&board),
            board,
            current_player: Player::Black,
            turn_number: 0,
            consecutive_passes: 0,
            game_over: false,
            last_move: None,
            history: Vec::with_capacity(64),
        }
    }

    /// Starts a game from an arbitrary position.
    pub fn from_board(board: Board, current_player: Player) -> Result<Self, SnapshotError> {
        Self::try_from(Snapshot {
            black_board: board.black,
            white_board: board.white,
            current_player,
            current_turn: 0,
            game_over: false,
        })
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    pub const fn current_player(&self) -> Player {
        self.current_player
    }

    pub const fn target_player(&self) -> Player {
        self.current_player.opposite()
    }

    pub const fn turn_number(&self) -> u32 {
        self.turn_number
    }

    pub const fn consecutive_passes(&self) -> u8 {
        self.consecutive_passes
    }

    pub const fn last_move(&self) -> Option<Square> {
        self.last_move
    }

    pub fn history(&self) -> &[UndoRecord] {
        &self.history
    }

    pub const fn stability(&self) -> &StabilityInfo {
        &self.analysis.stability
    }

    #[must_use]
    pub const fn get_valid_moves(&self, player: Player) -> Bitboard {
        self.analysis.moves(player)
    }

    #[must_use]
    pub const fn disc_count(&self, player: Player) -> u32 {
        self.board.disc_count(player)
    }

    /// Places a disc for the side to move and flips every flanked run.
    ///
    /// The turn does not pass to the opponent until [`GameState::next_turn`].
    pub fn apply_move(&mut self, sq: Square) -> Result<(), MoveError> {
        let player = self.current_player;
        if self.get_valid_moves(player) & sq.bit() == 0 {
            return Err(MoveError::InvalidMove(sq, player));
        }
        let flips = is_valid_move(&self.board, sq, player)?;

        self.history.push(self.record(Some(sq), flips));
        self.board.place_and_flip(player, sq, flips);
        self.consecutive_passes = 0;
        self.turn_number += 1;
        self.last_move = Some(sq);
        self.analysis = Analysis::of(&self.board);
        Ok(())
    }

    /// Records a pass for the side to move. The board is unchanged.
    pub fn skip_turn(&mut self) {
        self.history.push(self.record(None, 0));
        self.consecutive_passes = self.consecutive_passes.saturating_add(1);
    }

    /// Hands the move to the other side and settles whether the game has ended.
    pub fn next_turn(&mut self) {
        self.current_player = self.current_player.opposite();
        self.game_over = self.is_game_over();
    }

    /// Applies a move or pass without advancing the turn.
    pub fn apply(&mut self, mv: Move) -> Result<(), MoveError> {
        match mv {
            Move::Place(sq) => self.apply_move(sq),
            Move::Pass => {
                self.skip_turn();
                Ok(())
            }
        }
    }

    /// Applies `mv` and advances the turn.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        self.apply(mv)?;
        self.next_turn();
        Ok(())
    }

    /// Plays at `row` (0 = top) and column `letter` (`A` = leftmost).
    pub fn make_move(&mut self, row: usize, letter: char) -> Result<(), MoveError> {
        let sq = Square::from_row_letter(row, letter).ok_or(MoveError::OffBoard(row, letter))?;
        self.play(Move::Place(sq))
    }

    pub fn pass(&mut self) {
        self.skip_turn();
        self.next_turn();
    }

    /// Takes back the last placement or pass, whether or not the turn had advanced.
    pub fn undo_move(&mut self) -> Result<(), MoveError> {
        let record = self.history.pop().ok_or(MoveError::UndoUnderflow)?;
        if let Some(sq) = record.square {
            self.board.unplace_and_unflip(record.player, sq, record.flips);
        }
        self.current_player = record.player;
        self.turn_number = record.turn_number;
        self.consecutive_passes = record.consecutive_passes;
        self.game_over = record.game_over;
        self.last_move = record.last_move;
        self.analysis = record.analysis;
        Ok(())
    }

    fn record(&self, square: Option<Square>, flips: Bitboard) -> UndoRecord {
        UndoRecord {
            square,
            flips,
            player: self.current_player,
            turn_number: self.turn_number,
            consecutive_passes: self.consecutive_passes,
            game_over: self.game_over,
            last_move: self.last_move,
            analysis: self.analysis,
        }
    }

    /// Board full, one side wiped out, two passes in a row, or nobody can move.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.board.empty() == 0
            || self.board.black == 0
            || self.board.white == 0
            || self.consecutive_passes >= 2
            || (self.get_valid_moves(Player::Black) | self.get_valid_moves(Player::White)) == 0
    }

    /// The cached terminal flag as of the last turn change.
    pub const fn game_over(&self) -> bool {
        self.game_over
    }

    /// `None` while the game is still running.
    #[must_use]
    pub fn winner(&self) -> Option<Winner> {
        if !self.is_game_over() {
            return None;
        }
        let black = self.disc_count(Player::Black);
        let white = self.disc_count(Player::White);
        Some(match black.cmp(&white) {
            std::cmp::Ordering::Greater => Winner::Player(Player::Black),
            std::cmp::Ordering::Less => Winner::Player(Player::White),
            std::cmp::Ordering::Equal => Winner::Draw,
        })
    }

    #[must_use]
    pub const fn snapshot(&self) -> Snapshot {
        Snapshot {
            black_board: self.board.black,
            white_board: self.board.white,
            current_player: self.current_player,
            current_turn: self.turn_number,
            game_over: self.game_over,
        }
    }
}

impl From<GameState> for Snapshot {
    fn from(state: GameState) -> Self {
        state.snapshot()
    }
}

impl TryFrom<Snapshot> for GameState {
    type Error = SnapshotError;

    fn try_from(snapshot: Snapshot) -> Result<Self, Self::Error> {
        let overlap = snapshot.black_board & snapshot.white_board;
        if overlap != 0 {
            return Err(SnapshotError::OverlappingDiscs(overlap));
        }
        let board = Board::from_masks(snapshot.black_board, snapshot.white_board);
        let mut state = Self {
            analysis: Analysis::of(&board),
            board,
            current_player: snapshot.current_player,
            turn_number: snapshot.current_turn,
            consecutive_passes: 0,
            game_over: snapshot.game_over,
            last_move: None,
            history: Vec::with_capacity(64),
        };
        state.game_over |= state.is_game_over();
        Ok(state)
    }
}
