use crate::engine::config::{EngineConfig, Feature};
use crate::engine::Evaluator;
use crate::logic::board::{Bitboard, Direction, Player, CORNERS};
use crate::logic::eval_constants::{
    HORIZONTAL_EDGES, ORANGE_ZONE, ORANGE_ZONE_PENALTY, RED_ZONE, RED_ZONE_PENALTY,
    SAFE_DISC_WEIGHT, TRUE_EDGES, UNSTABLE_DISC_WEIGHT, VERTICAL_EDGES, WEDGE_BONUS,
    WEDGE_GAP_PENALTY,
};
use crate::logic::game::{GameState, Winner};
use std::sync::Arc;

pub struct HeuristicEvaluator {
    config: Arc<EngineConfig>,
}

impl HeuristicEvaluator {
    pub const fn new(config: Arc<EngineConfig>) -> Self {
        Self { config }
    }
}

impl Evaluator for HeuristicEvaluator {
    fn evaluate(&self, state: &GameState, player: Player, opponent: Player) -> f64 {
        if state.is_game_over() {
            return match state.winner() {
                Some(Winner::Player(winner)) if winner == player => f64::INFINITY,
                Some(Winner::Player(_)) => f64::NEG_INFINITY,
                Some(Winner::Draw) | None => 0.0,
            };
        }

        let placed = state.board().placed_discs();
        self.config
            .features
            .iter()
            .map(|&feature| {
                let weight = self
                    .config
                    .weight_of(feature)
                    .weight(placed, self.config.dynamic_weights);
                weight * feature_value(feature, state, player, opponent)
            })
            .sum()
    }
}

/// `(p - o) / (|p| + |o|)`, or zero when both sides score nothing.
fn balance(p: f64, o: f64) -> f64 {
    let denominator = p.abs() + o.abs();
    if denominator == 0.0 {
        0.0
    } else {
        (p - o) / denominator
    }
}

fn count(bb: Bitboard) -> f64 {
    f64::from(bb.count_ones())
}

/// One feature's unweighted score for `player`, always within `[-1, 1]`.
#[must_use]
pub fn feature_value(feature: Feature, state: &GameState, player: Player, opponent: Player) -> f64 {
    let side = |f: &dyn Fn(Player) -> f64| balance(f(player), f(opponent));
    let board = state.board();
    match feature {
        Feature::Coin => side(&|p| count(board.get_board(p))),
        Feature::Mobility => side(&|p| count(state.get_valid_moves(p))),
        Feature::Corners => side(&|p| count(board.get_board(p) & CORNERS)),
        Feature::Stability => side(&|p| stability_score(state, p)),
        Feature::Edges => side(&|p| count(board.get_board(p) & TRUE_EDGES)),
        Feature::DangerZones => {
            let occupied_corners = board.occupied() & CORNERS;
            side(&|p| danger_zone_penalty(board.get_board(p), occupied_corners))
        }
        Feature::Wedges => side(&|p| {
            wedge_score(board.get_board(p), board.get_board(p.opposite()), board.empty())
        }),
    }
}

fn stability_score(state: &GameState, player: Player) -> f64 {
    let discs = state.disc_count(player);
    if discs == 0 {
        return 0.0;
    }
    let info = state.stability();
    let safe = count(info.safe(player)) * SAFE_DISC_WEIGHT;
    let unstable = count(info.unstable(player)) * UNSTABLE_DISC_WEIGHT;
    (safe + unstable) / f64::from(discs)
}

/// Penalises discs next to an empty corner. Once a corner is taken its neighbours are harmless.
fn danger_zone_penalty(own: Bitboard, occupied_corners: Bitboard) -> f64 {
    let orthogonal = [Direction::North, Direction::South, Direction::East, Direction::West];
    let diagonal = [
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::SouthEast,
        Direction::SouthWest,
    ];
    let near = |dirs: [Direction; 4]| dirs.iter().fold(0, |acc, d| acc | d.shift(occupied_corners));

    let orange = own & ORANGE_ZONE & !near(orthogonal);
    let red = own & RED_ZONE & !near(diagonal);
    count(orange) * ORANGE_ZONE_PENALTY + count(red) * RED_ZONE_PENALTY
}

/// Rewards own edge discs wedged between two opposing edge discs and
/// penalises empty edge squares left between two own edge discs.
fn wedge_score(own: Bitboard, opp: Bitboard, empty: Bitboard) -> f64 {
    let mut wedges = 0;
    let mut gaps = 0;
    for (edges, before, after) in [
        (HORIZONTAL_EDGES, Direction::East, Direction::West),
        (VERTICAL_EDGES, Direction::South, Direction::North),
    ] {
        let own_edge = own & edges;
        let opp_edge = opp & edges;
        wedges |= own_edge & before.shift(opp_edge) & after.shift(opp_edge);
        gaps |= edges & empty & before.shift(own_edge) & after.shift(own_edge);
    }
    count(wedges) * WEDGE_BONUS + count(gaps) * WEDGE_GAP_PENALTY
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::board::{Board, Square};

    fn squares(names: &[&str]) -> Bitboard {
        names
            .iter()
            .map(|n| n.parse::<Square>().unwrap().bit())
            .fold(0, |acc, b| acc | b)
    }

    fn evaluator(config: EngineConfig) -> HeuristicEvaluator {
        HeuristicEvaluator::new(Arc::new(config))
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let state = GameState::new();
        let eval = evaluator(EngineConfig::with_all_features());
        let score = eval.evaluate(&state, Player::Black, Player::White);
        assert!(score.abs() < 1e-9);
    }

    #[test]
    fn test_evaluation_is_antisymmetric() {
        let mut state = GameState::new();
        state.make_move(2, 'D').unwrap();
        state.make_move(2, 'C').unwrap();
        state.make_move(3, 'C').unwrap();
        let eval = evaluator(EngineConfig::with_all_features());
        let black = eval.evaluate(&state, Player::Black, Player::White);
        let white = eval.evaluate(&state, Player::White, Player::Black);
        assert!(black.is_finite());
        assert!((black + white).abs() < 1e-9);
    }

    #[test]
    fn test_terminal_scores() {
        let eval = evaluator(EngineConfig::default());
        let black = 0x0F0F_0F0F_0F0F_0F0F | squares(&["0E"]);
        let state = GameState::from_board(Board::from_masks(black, !black), Player::Black).unwrap();
        assert_eq!(eval.evaluate(&state, Player::Black, Player::White), f64::INFINITY);
        assert_eq!(eval.evaluate(&state, Player::White, Player::Black), f64::NEG_INFINITY);

        let black = 0x0F0F_0F0F_0F0F_0F0F;
        let state = GameState::from_board(Board::from_masks(black, !black), Player::White).unwrap();
        assert_eq!(eval.evaluate(&state, Player::White, Player::Black), 0.0);
    }

    #[test]
    fn test_feature_values_are_bounded() {
        let mut state = GameState::new();
        for (row, col) in [(2, 'D'), (2, 'C'), (3, 'C'), (2, 'E')] {
            state.make_move(row, col).unwrap();
        }
        for feature in Feature::ALL {
            let v = feature_value(feature, &state, Player::Black, Player::White);
            assert!((-1.0..=1.0).contains(&v), "{feature:?} = {v}");
        }
    }

    #[test]
    fn test_zero_denominators_give_zero() {
        // No corners, no edges, no danger-zone discs on either side.
        let state = GameState::new();
        for feature in [Feature::Corners, Feature::Edges, Feature::DangerZones, Feature::Wedges] {
            assert_eq!(feature_value(feature, &state, Player::Black, Player::White), 0.0);
        }
        let lone =
            GameState::from_board(Board::from_masks(squares(&["3D"]), 0), Player::Black).unwrap();
        assert_eq!(stability_score(&lone, Player::White), 0.0);
    }

    #[test]
    fn test_corner_feature() {
        let board = Board::from_masks(squares(&["0A", "3D", "4E"]), squares(&["3E", "4D"]));
        let state = GameState::from_board(board, Player::Black).unwrap();
        assert_eq!(feature_value(Feature::Corners, &state, Player::Black, Player::White), 1.0);
        assert_eq!(feature_value(Feature::Corners, &state, Player::White, Player::Black), -1.0);
    }

    #[test]
    fn test_danger_zone_exempt_next_to_taken_corner() {
        let x_square = squares(&["1B"]);
        assert_eq!(danger_zone_penalty(x_square, 0), RED_ZONE_PENALTY);
        assert_eq!(danger_zone_penalty(x_square, squares(&["0A"])), 0.0);
        // A different corner does not help.
        assert_eq!(danger_zone_penalty(x_square, squares(&["7H"])), RED_ZONE_PENALTY);

        let c_squares = squares(&["0B", "1A"]);
        assert_eq!(danger_zone_penalty(c_squares, 0), 2.0 * ORANGE_ZONE_PENALTY);
        assert_eq!(danger_zone_penalty(c_squares, squares(&["0A"])), 0.0);
    }

    #[test]
    fn test_wedges() {
        // Black 0D sits between white 0C and 0E.
        let black = squares(&["0D"]);
        let white = squares(&["0C", "0E"]);
        let empty = !(black | white);
        assert_eq!(wedge_score(black, white, empty), WEDGE_BONUS);
        // White leaves 0D open between its own discs only when it is empty.
        assert_eq!(wedge_score(white, black, empty), 0.0);
        assert_eq!(wedge_score(white, 0, !white), WEDGE_GAP_PENALTY);

        // Vertical edge: black 3A between white 2A and 4A.
        let black = squares(&["3A"]);
        let white = squares(&["2A", "4A"]);
        assert_eq!(wedge_score(black, white, !(black | white)), WEDGE_BONUS);

        // Discs on a corner never form a wedge; 0B's only neighbours there are 0A and 0C.
        let black = squares(&["0B"]);
        let white = squares(&["0A", "0C"]);
        assert_eq!(wedge_score(black, white, !(black | white)), 0.0);

        // No wrap from the end of one row to the start of the next.
        let black = squares(&["1H"]);
        let white = squares(&["1G", "2A"]);
        assert_eq!(wedge_score(black, white, !(black | white)), 0.0);
    }

    #[test]
    fn test_only_enabled_features_count() {
        // Black's 0D is the only edge disc on the board.
        let board = Board::from_masks(squares(&["0D", "3D", "4E"]), squares(&["3E", "4D"]));
        let state = GameState::from_board(board, Player::White).unwrap();
        let edges_only = evaluator(EngineConfig {
            features: [Feature::Edges].into_iter().collect(),
            ..EngineConfig::default()
        });
        assert!(edges_only.evaluate(&state, Player::Black, Player::White) > 0.0);

        let none = evaluator(EngineConfig {
            features: Default::default(),
            ..EngineConfig::default()
        });
        assert_eq!(none.evaluate(&state, Player::Black, Player::White), 0.0);
    }
}
