use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use engine_core::Game;
use games_tictactoe::{State, TicTacToe};

fn midgame() -> State {
    [4, 0, 8, 2].iter().fold(State::new(), |s, &p| s.apply_move(p))
}

fn bench_apply_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_apply_move");
    group.bench_function("center_opening", |b| {
        let state = TicTacToe::create_initial();
        b.iter(|| TicTacToe::apply_move(&state, 4));
    });
    group.bench_function("rejected_move", |b| {
        let state = midgame();
        b.iter(|| TicTacToe::apply_move(&state, 4));
    });
    group.bench_function("winning_move", |b| {
        let state = midgame();
        b.iter(|| TicTacToe::apply_move(&state, 1));
    });
    group.finish();
}

fn bench_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("tictactoe_json");

    group.bench_function("state_roundtrip", |b| {
        let state = midgame();
        b.iter_batched(
            || state.clone(),
            |state| {
                let text = serde_json::to_string(&state).unwrap();
                let decoded: State = serde_json::from_str(&text).unwrap();
                decoded.validate().unwrap();
                decoded
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_apply_move, bench_json);
criterion_main!(benches);
