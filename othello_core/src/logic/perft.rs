use crate::engine::Move;
use crate::logic::board::BitboardIterator;
use crate::logic::game::GameState;
use crate::logic::rules::MoveError;

/// Counts the leaf positions `depth` plies below `state`.
///
/// A forced pass counts as one ply. Finished games are counted as a single
/// leaf regardless of the remaining depth. `state` is restored on success.
pub fn perft(state: &mut GameState, depth: u8) -> Result<u64, MoveError> {
    if depth == 0 || state.is_game_over() {
        return Ok(1);
    }

    let moves = state.get_valid_moves(state.current_player());
    if moves == 0 {
        state.pass();
        let nodes = perft(state, depth - 1);
        state.undo_move()?;
        return nodes;
    }

    let mut nodes = 0;
    for sq in BitboardIterator::new(moves) {
        state.play(Move::Place(sq))?;
        let count = perft(state, depth - 1);
        state.undo_move()?;
        nodes += count?;
    }
    Ok(nodes)
}
