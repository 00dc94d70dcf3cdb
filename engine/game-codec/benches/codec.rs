use criterion::{criterion_group, criterion_main, Criterion};
use engine_core::GameType;
use engine_games::AnyGameState;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// A late-game state, so the payload carries a realistic move history
fn late_game(game_type: GameType) -> AnyGameState {
    let mut rng = ChaCha20Rng::seed_from_u64(11);
    let mut state = AnyGameState::create_initial(game_type);
    loop {
        let legal = state.legal_moves();
        let next = state.apply_move(legal[rng.gen_range(0..legal.len())]);
        if next.is_done() {
            return state;
        }
        state = next;
    }
}

fn bench_codec(c: &mut Criterion) {
    for game_type in GameType::ALL {
        let mut group = c.benchmark_group(format!("{}_codec", game_type));
        let state = late_game(game_type);
        let text = game_codec::serialize(&state).unwrap();

        group.bench_function("serialize", |b| {
            b.iter(|| game_codec::serialize(&state).unwrap())
        });
        group.bench_function("deserialize", |b| {
            b.iter(|| game_codec::deserialize(game_type, &text).unwrap())
        });
        group.bench_function("deserialize_rejected", |b| {
            b.iter(|| game_codec::deserialize(game_type, "{}").is_err())
        });
        group.finish();
    }
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
