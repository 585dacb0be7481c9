//! Criterion benchmarks for pathfinding and round resolution.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hexsupply::campaign::scenario::{standard_game, NORTH, SOUTH};
use hexsupply::campaign::{find_path, HexCoord, HexGrid, RoadState, SeededRolls, Terrain};
use hexsupply::core::config::{MovementRules, RulesConfig};

/// Square-ish grid with every third column upgraded
fn make_bench_grid(size: i32) -> HexGrid {
    let mut grid = HexGrid::rectangle(size, size, Terrain::Plain);
    for cell in grid.cells_mut() {
        if cell.coord.q % 3 == 0 {
            cell.road = RoadState::Upgraded;
        }
    }
    grid
}

fn bench_find_path(c: &mut Criterion) {
    let rules = MovementRules::default();
    let mut group = c.benchmark_group("find_path");

    for size in [16, 64] {
        let grid = make_bench_grid(size);
        let goal = HexCoord::new(size - 1, size - 1);
        group.bench_function(format!("corner_to_corner_{size}x{size}"), |b| {
            b.iter(|| find_path(black_box(&grid), HexCoord::new(0, 0), goal, &rules))
        });
    }

    // Goal walled off: the search has to drain the whole frontier
    let mut grid = make_bench_grid(32);
    let island = HexCoord::new(100, 100);
    grid.add_cell(island.q, island.r, Terrain::Plain);
    group.bench_function("unreachable_32x32", |b| {
        b.iter(|| find_path(black_box(&grid), HexCoord::new(0, 0), island, &rules))
    });

    group.finish();
}

fn bench_run_round(c: &mut Criterion) {
    c.bench_function("run_round_standard", |b| {
        b.iter(|| {
            let mut engine = standard_game(RulesConfig::default(), SeededRolls::new(7));
            for _ in 0..10 {
                engine.queue_attack(NORTH, SOUTH, 5);
                engine.queue_attack(SOUTH, NORTH, 5);
                black_box(engine.run_round());
            }
        })
    });
}

criterion_group!(benches, bench_find_path, bench_run_round);
criterion_main!(benches);
