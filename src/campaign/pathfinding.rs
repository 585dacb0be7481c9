//! A* pathfinding and movement-cost accounting over the hex grid

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::map::{HexCoord, HexGrid};
use crate::core::config::MovementRules;

/// A found route and what it costs to drive it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    /// Coordinates from start to goal, both inclusive
    pub path: Vec<HexCoord>,
    /// Sum of entry costs of every cell after the start
    pub cost: u32,
}

impl PathResult {
    /// The cells a truck has to enter, i.e. the path without its start
    pub fn steps(&self) -> &[HexCoord] {
        self.path.get(1..).unwrap_or(&[])
    }
}

/// Hex distance between two axial coordinates
pub fn hex_distance(a: HexCoord, b: HexCoord) -> u32 {
    a.distance(&b)
}

/// Cost of entering the cell at `coord`
///
/// Cells missing from the grid get the (finite) impassable cost.
pub fn entry_cost(grid: &HexGrid, coord: &HexCoord, rules: &MovementRules) -> u32 {
    match grid.get(coord) {
        Some(cell) if cell.road_upgraded() => rules.upgraded_road_cost,
        Some(_) => rules.unupgraded_road_cost,
        None => rules.impassable_cost,
    }
}

/// Total cost of entering every cell of `path` in turn
pub fn path_cost(grid: &HexGrid, path: &[HexCoord], rules: &MovementRules) -> u32 {
    path.iter()
        .fold(0u32, |acc, c| acc.saturating_add(entry_cost(grid, c, rules)))
}

/// Frontier entry. Ordered as a min-heap on `f_cost`, earlier pushes first.
struct Node {
    coord: HexCoord,
    f_cost: u32,
    seq: u64,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}
impl Eq for Node {}

impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}
impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* search from `start` to `goal`
///
/// Only cells present on the grid are expanded, which keeps the search
/// finite on any grid. Returns `None` when either endpoint is missing or the
/// frontier runs dry before reaching the goal.
pub fn find_path(
    grid: &HexGrid,
    start: HexCoord,
    goal: HexCoord,
    rules: &MovementRules,
) -> Option<PathResult> {
    if !grid.contains(&start) || !grid.contains(&goal) {
        return None;
    }

    if start == goal {
        return Some(PathResult {
            path: vec![start],
            cost: 0,
        });
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<HexCoord, HexCoord> = AHashMap::new();
    let mut g_score: AHashMap<HexCoord, u32> = AHashMap::new();
    let mut closed_set: AHashSet<HexCoord> = AHashSet::new();
    let mut seq = 0u64;

    g_score.insert(start, 0);
    open_set.push(Node {
        coord: start,
        f_cost: hex_distance(start, goal),
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.coord == goal {
            let mut path = vec![goal];
            let mut current_coord = goal;
            while let Some(&prev) = came_from.get(&current_coord) {
                path.push(prev);
                current_coord = prev;
            }
            path.reverse();
            let cost = g_score.get(&goal).copied().unwrap_or(0);
            return Some(PathResult { path, cost });
        }

        if !closed_set.insert(current.coord) {
            continue;
        }

        let current_g = g_score.get(&current.coord).copied().unwrap_or(u32::MAX);

        for neighbor in grid.neighbor_coords(&current.coord) {
            if closed_set.contains(&neighbor) {
                continue;
            }

            let tentative_g = current_g.saturating_add(entry_cost(grid, &neighbor, rules));
            if tentative_g < g_score.get(&neighbor).copied().unwrap_or(u32::MAX) {
                came_from.insert(neighbor, current.coord);
                g_score.insert(neighbor, tentative_g);
                seq += 1;
                open_set.push(Node {
                    coord: neighbor,
                    f_cost: tentative_g.saturating_add(hex_distance(neighbor, goal)),
                    seq,
                });
            }
        }
    }

    None
}
