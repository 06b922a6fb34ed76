use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{base_shape, collides, Board, GameState};
use blockfall::types::PieceKind;

fn bench_tick(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start();

    c.bench_function("game_tick_16ms", |b| {
        b.iter(|| {
            if state.game_over() {
                state.start();
            }
            state.tick(black_box(16));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            black_box(board.clear_full_rows());
        })
    });
}

fn bench_piece_spawn(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start();

    c.bench_function("spawn_piece", |b| {
        b.iter(|| {
            state.spawn_piece();
        })
    });
}

fn bench_collides(c: &mut Criterion) {
    let mut board = Board::new();
    for x in 0..9 {
        board.set(x, 19, Some(PieceKind::O));
    }
    let shape = base_shape(PieceKind::T);

    c.bench_function("collides", |b| {
        b.iter(|| collides(black_box(&board), black_box(&shape), black_box(4), black_box(18)))
    });
}

fn bench_try_move(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start();
    let mut dx = 1;

    c.bench_function("try_move", |b| {
        b.iter(|| {
            if !state.try_move(dx) {
                dx = -dx;
            }
        })
    });
}

fn bench_try_spin(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start();

    c.bench_function("try_spin", |b| {
        b.iter(|| {
            state.try_spin();
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_piece_spawn,
    bench_collides,
    bench_try_move,
    bench_try_spin
);
criterion_main!(benches);
