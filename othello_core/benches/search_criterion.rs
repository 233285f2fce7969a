use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use othello_core::engine::config::EngineConfig;
use othello_core::engine::eval::HeuristicEvaluator;
use othello_core::engine::search::get_best_move;
use othello_core::engine::tt::TranspositionTable;
use othello_core::logic::game::GameState;
use othello_core::logic::perft;

const OPENING_NODES: &[u64] = &[4, 12, 56, 244, 1396, 8200, 55_092];

const MIDGAME_MOVES: &[(usize, char)] = &[(2, 'D'), (2, 'C'), (3, 'C'), (2, 'E'), (2, 'F'), (4, 'C')];

fn midgame() -> GameState {
    let mut game = GameState::new();
    for &(row, col) in MIDGAME_MOVES {
        game.make_move(row, col).expect("benchmark opening should be legal");
    }
    game
}

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft_opening");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    for (depth_idx, expected_nodes) in OPENING_NODES.iter().enumerate() {
        let depth = (depth_idx + 1) as u8;
        let mut game = GameState::new();

        // Correctness guard before benchmarking.
        let warmup = perft(&mut game, depth).expect("perft should run");
        assert_eq!(warmup, *expected_nodes, "node mismatch at depth {depth}");

        group.throughput(Throughput::Elements(*expected_nodes));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("d{depth}")),
            expected_nodes,
            |b, expected| {
                b.iter(|| {
                    let count = perft(black_box(&mut game), black_box(depth))
                        .expect("perft benchmark run should succeed");
                    assert_eq!(count, *expected);
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_depth_search");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));
    group.sample_size(10);

    let cases = [
        ("opening_base", GameState::new(), EngineConfig::default()),
        ("midgame_base", midgame(), EngineConfig::default()),
        ("midgame_all", midgame(), EngineConfig::with_all_features()),
    ];

    for (name, game, config) in cases {
        let evaluator = HeuristicEvaluator::new(Arc::new(config));
        for depth in [3_u8, 5] {
            let mut state = game.clone();
            group.bench_function(BenchmarkId::new(name, depth), |b| {
                b.iter(|| {
                    let mut tt = TranspositionTable::new();
                    let outcome = get_best_move(black_box(&mut state), &evaluator, depth, &mut tt)
                        .expect("search should not fail");
                    black_box(outcome.best_move)
                });
            });
        }
    }

    group.finish();
}

criterion_group!(search_benches, bench_perft, bench_search);
criterion_main!(search_benches);
