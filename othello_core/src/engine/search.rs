use crate::engine::config::EngineConfig;
use crate::engine::eval::HeuristicEvaluator;
use crate::engine::move_list::MoveList;
use crate::engine::tt::{TTEntry, TTFlag, TTKey, TranspositionTable};
use crate::engine::{
    Evaluator, Move, SearchError, SearchLimit, SearchOutcome, SearchStats, Searcher,
};
use crate::logic::board::{Player, Symmetry};
use crate::logic::game::GameState;
use log::{debug, error, trace, warn};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Mirrored cache probes stop paying off once the board fills up.
pub const DEFAULT_SYMMETRY_DISC_LIMIT: u32 = 16;

/// There are never more than 60 placements in a game.
const MAX_DEPTH: u8 = 60;

/// A move played on the shared search state. Dropping it takes the move back,
/// so every exit from a search frame leaves the state as it found it.
struct Ply<'a> {
    state: &'a mut GameState,
}

impl<'a> Ply<'a> {
    fn apply(state: &'a mut GameState, mv: Move) -> Result<Self, SearchError> {
        if let Err(source) = state.apply(mv) {
            error!(
                "{} generated {mv} but the position rejected it ({source}); aborting search",
                state.current_player()
            );
            return Err(SearchError::EngineInvariantViolation { mv, source });
        }
        state.next_turn();
        Ok(Self { state })
    }
}

impl Deref for Ply<'_> {
    type Target = GameState;

    fn deref(&self) -> &GameState {
        self.state
    }
}

impl DerefMut for Ply<'_> {
    fn deref_mut(&mut self) -> &mut GameState {
        self.state
    }
}

impl Drop for Ply<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.state.undo_move() {
            error!("could not take back a searched move: {err}");
        }
    }
}

struct Deadline {
    start: f64,
    limit_ms: f64,
    check_interval: u32,
}

/// One depth-limited minimax pass over a single mutable state.
///
/// Scores are always from `root`'s point of view: nodes where `root` is to
/// move maximise and the others minimise.
struct Search<'a, E: Evaluator + ?Sized> {
    evaluator: &'a E,
    tt: &'a mut TranspositionTable,
    root: Player,
    symmetry_disc_limit: u32,
    deadline: Option<Deadline>,
    nodes: u32,
}

impl<'a, E: Evaluator + ?Sized> Search<'a, E> {
    fn new(evaluator: &'a E, tt: &'a mut TranspositionTable, root: Player) -> Self {
        Self {
            evaluator,
            tt,
            root,
            symmetry_disc_limit: DEFAULT_SYMMETRY_DISC_LIMIT,
            deadline: None,
            nodes: 0,
        }
    }

    fn run(&mut self, state: &mut GameState, depth: u8) -> Result<SearchOutcome, SearchError> {
        let (score, best_move) =
            self.minimax(state, depth, f64::NEG_INFINITY, f64::INFINITY)?;
        Ok(SearchOutcome { score, best_move })
    }

    fn check_deadline(&self) -> Result<(), SearchError> {
        if let Some(deadline) = &self.deadline {
            if self.nodes % deadline.check_interval == 0 && now() - deadline.start > deadline.limit_ms
            {
                return Err(SearchError::Timeout);
            }
        }
        Ok(())
    }

    /// Looks for a usable entry for this position, trying the mirrored
    /// positions first while the board is still sparse.
    ///
    /// Only the four reflections are probed. A position that is a pure
    /// quarter or half turn of a cached one is searched from scratch.
    fn probe(&self, state: &GameState, key: &TTKey, depth: u8) -> Option<TTEntry> {
        if state.board().placed_discs() <= self.symmetry_disc_limit {
            for symmetry in Symmetry::MIRRORS {
                let mirrored = TTKey::new(key.player, &state.board().transformed(symmetry));
                if mirrored == *key {
                    continue;
                }
                if let Some(entry) = self.tt.probe(&mirrored) {
                    if entry.depth >= depth {
                        trace!("symmetric cache hit ({symmetry:?}) at depth {depth}");
                        return Some(entry.transformed(symmetry.inverse()));
                    }
                }
            }
        }
        self.tt.probe(key)
    }

    fn minimax(
        &mut self,
        state: &mut GameState,
        depth: u8,
        mut alpha: f64,
        mut beta: f64,
    ) -> Result<(f64, Option<Move>), SearchError> {
        self.nodes = self.nodes.wrapping_add(1);
        self.check_deadline()?;

        if depth == 0 || state.is_game_over() {
            let score = self
                .evaluator
                .evaluate(state, self.root, self.root.opposite());
            return Ok((score, None));
        }

        let key = TTKey::new(state.current_player(), state.board());
        let mut hash_move = None;
        if let Some(entry) = self.probe(state, &key, depth) {
            if entry.depth >= depth {
                match entry.flag {
                    TTFlag::Exact => {
                        trace!("cache hit at depth {depth}");
                        return Ok((entry.score, entry.best_move));
                    }
                    TTFlag::LowerBound => alpha = alpha.max(entry.score),
                    TTFlag::UpperBound => beta = beta.min(entry.score),
                }
                if beta <= alpha {
                    return Ok((entry.score, entry.best_move));
                }
            }
            hash_move = entry.best_move;
        }

        let maximizing = state.current_player() == self.root;
        let (alpha_orig, beta_orig) = (alpha, beta);
        let mut best_value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let mut best_move = None;

        let moves = MoveList::ordered(state.get_valid_moves(state.current_player()), hash_move);
        for &mv in &moves {
            let value = {
                let mut child = Ply::apply(state, mv)?;
                self.minimax(&mut child, depth - 1, alpha, beta)?.0
            };

            if maximizing {
                if best_move.is_none() || value > best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_value);
            } else {
                if best_move.is_none() || value < best_value {
                    best_value = value;
                    best_move = Some(mv);
                }
                beta = beta.min(best_value);
            }

            if beta <= alpha {
                break;
            }
        }

        let flag = if best_value <= alpha_orig && alpha_orig > f64::NEG_INFINITY {
            TTFlag::UpperBound
        } else if best_value >= beta_orig && beta_orig < f64::INFINITY {
            TTFlag::LowerBound
        } else {
            TTFlag::Exact
        };
        self.tt.store(
            key,
            TTEntry {
                depth,
                score: best_value,
                best_move,
                flag,
            },
        );

        Ok((best_value, best_move))
    }
}

/// Searches `depth` plies below `state` for the side to move.
///
/// `state` is played on and taken back in place and is unchanged when this
/// returns, on success and on error alike. `tt` belongs to the caller and
/// must be cleared before searching a position from a different root.
pub fn get_best_move<E: Evaluator + ?Sized>(
    state: &mut GameState,
    evaluator: &E,
    depth: u8,
    tt: &mut TranspositionTable,
) -> Result<SearchOutcome, SearchError> {
    let root = state.current_player();
    Search::new(evaluator, tt, root).run(state, depth)
}

/// Milliseconds on `performance.now()` in the browser, wall-clock time elsewhere.
pub fn now() -> f64 {
    #[cfg(target_arch = "wasm32")]
    {
        use wasm_bindgen::JsCast;
        if let Some(window) = web_sys::window() {
            return window.performance().map(|p| p.now()).unwrap_or(0.0);
        }
        let global = js_sys::global();
        if let Ok(worker) = global.dyn_into::<web_sys::WorkerGlobalScope>() {
            return worker.performance().map(|p| p.now()).unwrap_or(0.0);
        }
        0.0
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        // A clock set before the epoch reads as zero; deadlines then never fire.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |elapsed| elapsed.as_secs_f64() * 1000.0)
    }
}

/// Iterative-deepening driver around [`get_best_move`] with its own cache.
pub struct AlphaBetaEngine {
    config: Arc<EngineConfig>,
    evaluator: HeuristicEvaluator,
    tt: TranspositionTable,
}

impl AlphaBetaEngine {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            evaluator: HeuristicEvaluator::new(config.clone()),
            config,
            tt: TranspositionTable::new(),
        }
    }

    pub fn update_config(&mut self, config: Arc<EngineConfig>) {
        self.evaluator = HeuristicEvaluator::new(config.clone());
        self.config = config;
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Searches to the configured default depth.
    pub fn search_default(
        &mut self,
        game_state: &GameState,
    ) -> Result<Option<(Move, SearchStats)>, SearchError> {
        let depth = self.config.default_depth;
        self.search(game_state, SearchLimit::Depth(depth))
    }
}

impl Searcher for AlphaBetaEngine {
    fn search(
        &mut self,
        game_state: &GameState,
        limit: SearchLimit,
    ) -> Result<Option<(Move, SearchStats)>, SearchError> {
        if game_state.is_game_over() {
            return Ok(None);
        }

        let start_time = now();
        let (max_depth, time_limit) = match limit {
            SearchLimit::Depth(d) => (d.clamp(1, MAX_DEPTH), None),
            #[allow(clippy::cast_precision_loss)]
            SearchLimit::Time(t) => (MAX_DEPTH, Some(t as f64)),
        };

        // Scores in the table are relative to the previous root.
        self.tt.clear();

        let mut state = game_state.clone();
        let root = state.current_player();
        let mut best_move = None;
        let mut final_depth = 0;
        let mut nodes: u32 = 0;

        for depth in 1..=max_depth {
            let mut search = Search {
                evaluator: &self.evaluator,
                tt: &mut self.tt,
                root,
                symmetry_disc_limit: self.config.symmetry_disc_limit,
                deadline: time_limit.map(|limit_ms| Deadline {
                    start: start_time,
                    limit_ms,
                    check_interval: self.config.time_check_interval.max(1),
                }),
                nodes: 0,
            };
            let result = search.run(&mut state, depth);
            nodes = nodes.saturating_add(search.nodes);

            match result {
                Ok(outcome) => {
                    debug!(
                        "depth {depth}: score {:.3}, move {:?}, nodes {nodes}",
                        outcome.score, outcome.best_move
                    );
                    best_move = outcome.best_move.or(best_move);
                    final_depth = depth;
                    // A proven win or loss will not change with more depth.
                    if outcome.score.is_infinite() {
                        break;
                    }
                }
                Err(SearchError::Timeout) => break,
                Err(err) => return Err(err),
            }
        }

        if best_move.is_none() {
            warn!("search stopped before depth 1 completed; falling back to the first ordered move");
            let hash_move = self.tt.get_move(&TTKey::new(root, state.board()));
            best_move = MoveList::ordered(state.get_valid_moves(root), hash_move)
                .iter()
                .next()
                .copied();
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let time_ms = (now() - start_time).max(0.0) as u64;
        Ok(best_move.map(|mv| {
            (
                mv,
                SearchStats {
                    depth: final_depth,
                    nodes,
                    time_ms,
                },
            )
        }))
    }
}
