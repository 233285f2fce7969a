use crate::engine::config::EngineConfig;
use crate::engine::search::AlphaBetaEngine;
use crate::engine::{Move, SearchLimit, SearchStats, Searcher};
use crate::logic::game::GameState;
use gloo_worker::{HandlerId, Worker, WorkerScope};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Serialize, Deserialize)]
pub enum Input {
    ComputeMove(GameState, SearchLimit, EngineConfig),
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    MoveFound(Move, SearchStats),
    /// The game in the request was already over.
    NoMove,
    Error(String),
}

pub struct GameWorker {
    engine: Option<AlphaBetaEngine>,
}

impl GameWorker {
    fn handle(&mut self, msg: Input) -> Output {
        match msg {
            Input::ComputeMove(game_state, limit, config) => {
                let config = Arc::new(config);
                if let Some(engine) = &mut self.engine {
                    engine.update_config(config.clone());
                }
                let engine = self
                    .engine
                    .get_or_insert_with(|| AlphaBetaEngine::new(config));

                match engine.search(&game_state, limit) {
                    Ok(Some((mv, stats))) => Output::MoveFound(mv, stats),
                    Ok(None) => Output::NoMove,
                    Err(err) => {
                        log::error!("worker search failed: {err}");
                        Output::Error(err.to_string())
                    }
                }
            }
        }
    }
}

impl Worker for GameWorker {
    type Input = Input;
    type Message = ();
    type Output = Output;

    fn create(_scope: &WorkerScope<Self>) -> Self {
        Self { engine: None }
    }

    fn update(&mut self, _scope: &WorkerScope<Self>, _msg: Self::Message) {}

    fn received(&mut self, scope: &WorkerScope<Self>, msg: Self::Input, id: HandlerId) {
        let output = self.handle(msg);
        scope.respond(id, output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::Feature;
    use crate::logic::board::{Board, Player};

    #[test]
    fn test_compute_move() {
        let mut worker = GameWorker { engine: None };
        let state = GameState::new();
        let output = worker.handle(Input::ComputeMove(
            state.clone(),
            SearchLimit::Depth(3),
            EngineConfig::default(),
        ));
        let Output::MoveFound(Move::Place(sq), stats) = output else {
            panic!("expected a placement, got {output:?}");
        };
        assert_ne!(state.get_valid_moves(Player::Black) & sq.bit(), 0);
        assert_eq!(stats.depth, 3);
        assert!(worker.engine.is_some());
    }

    #[test]
    fn test_config_is_replaced_between_requests() {
        let mut worker = GameWorker { engine: None };
        worker.handle(Input::ComputeMove(
            GameState::new(),
            SearchLimit::Depth(1),
            EngineConfig::default(),
        ));

        let config = EngineConfig {
            features: [Feature::Edges].into_iter().collect(),
            ..EngineConfig::default()
        };
        worker.handle(Input::ComputeMove(
            GameState::new(),
            SearchLimit::Depth(1),
            config.clone(),
        ));
        let engine = worker.engine.as_ref().unwrap();
        assert_eq!(engine.config(), &config);
    }

    #[test]
    fn test_finished_game_has_no_move() {
        let black = 0x0F0F_0F0F_0F0F_0F0F;
        let state = GameState::from_board(Board::from_masks(black, !black), Player::Black).unwrap();
        let mut worker = GameWorker { engine: None };
        let output = worker.handle(Input::ComputeMove(
            state,
            SearchLimit::Depth(2),
            EngineConfig::default(),
        ));
        assert_eq!(output, Output::NoMove);
    }

    #[test]
    fn test_messages_survive_json() {
        let input = Input::ComputeMove(
            GameState::new(),
            SearchLimit::Time(50),
            EngineConfig::default(),
        );
        let json = serde_json::to_string(&input).unwrap();
        let Input::ComputeMove(state, limit, config) =
            serde_json::from_str::<Input>(&json).unwrap();
        assert_eq!(state.snapshot(), GameState::new().snapshot());
        assert_eq!(limit, SearchLimit::Time(50));
        assert_eq!(config.features, EngineConfig::default().features);
        assert_eq!(config.default_depth, EngineConfig::default().default_depth);

        let output = Output::MoveFound(Move::Pass, SearchStats::default());
        let json = serde_json::to_string(&output).unwrap();
        assert_eq!(serde_json::from_str::<Output>(&json).unwrap(), output);
    }
}
