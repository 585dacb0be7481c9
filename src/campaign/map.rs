//! Hex grid - the board trucks drive across
//!
//! Cells are addressed by axial coordinates and stored sparsely, so a grid
//! may have any shape. Adjacency only exists between cells that are both
//! present.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::BTreeSet;
use std::fmt;

/// Axial hex coordinate (q, r system)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32, // Column
    pub r: i32, // Row
}

/// Axial unit steps, in the order neighbors are reported
pub const HEX_DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl HexCoord {
    pub fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Adjacent coordinates, whether or not they exist on a grid
    ///
    /// Steps that would leave the `i32` range are dropped, so a coordinate
    /// on the edge of that range has fewer than six neighbors.
    pub fn neighbors(&self) -> Vec<HexCoord> {
        HEX_DIRECTIONS
            .iter()
            .filter_map(|&(dq, dr)| {
                Some(HexCoord::new(self.q.checked_add(dq)?, self.r.checked_add(dr)?))
            })
            .collect()
    }

    /// Distance in hex steps using axial coordinate formula
    ///
    /// Saturates at `u32::MAX` for coordinates at opposite ends of the range.
    pub fn distance(&self, other: &HexCoord) -> u32 {
        let dq = i64::from(self.q) - i64::from(other.q);
        let dr = i64::from(self.r) - i64::from(other.r);
        let steps = (dq.abs() + dr.abs() + (dq + dr).abs()) / 2;
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    pub fn is_adjacent(&self, other: &HexCoord) -> bool {
        self.distance(other) == 1
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

impl std::str::FromStr for HexCoord {
    type Err = String;

    /// Parse the `q,r` form used in logs and command lines
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (q, r) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'q,r', got '{}'", s))?;
        let q = q.trim().parse().map_err(|e| format!("bad q in '{}': {}", s, e))?;
        let r = r.trim().parse().map_err(|e| format!("bad r in '{}': {}", s, e))?;
        Ok(HexCoord::new(q, r))
    }
}

/// Terrain types
///
/// Terrain is descriptive only; movement cost depends on the road state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Plain,
    Forest,
    Hills,
    Marsh,
}

/// Road upgrade state of a cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoadState {
    #[default]
    Unupgraded,
    InProgress { turns_left: u32 },
    Upgraded,
}

/// Tags marking what sits on a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Occupant {
    /// A warehouse; trucks may not end a move here
    Warehouse,
}

/// A single hex cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub coord: HexCoord,
    pub terrain: Terrain,
    pub road: RoadState,
    pub occupants: BTreeSet<Occupant>,
}

impl Cell {
    pub fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            terrain,
            road: RoadState::Unupgraded,
            occupants: BTreeSet::new(),
        }
    }

    pub fn road_upgraded(&self) -> bool {
        self.road == RoadState::Upgraded
    }

    pub fn upgrade_in_progress(&self) -> bool {
        matches!(self.road, RoadState::InProgress { .. })
    }

    /// Rounds left on a running upgrade, zero otherwise
    pub fn upgrade_turns_left(&self) -> u32 {
        match self.road {
            RoadState::InProgress { turns_left } => turns_left,
            _ => 0,
        }
    }

    pub fn has_occupant(&self, tag: Occupant) -> bool {
        self.occupants.contains(&tag)
    }
}

/// The hex grid containing all cells
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HexGrid {
    cells: AHashMap<HexCoord, Cell>,
}

impl HexGrid {
    /// Create a new empty grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a grid from a list of coordinates, all with the same terrain
    pub fn from_coords(coords: impl IntoIterator<Item = HexCoord>, terrain: Terrain) -> Self {
        let mut grid = Self::new();
        for coord in coords {
            grid.add_cell(coord.q, coord.r, terrain);
        }
        grid
    }

    /// Axial parallelogram covering `0..width` x `0..height`
    pub fn rectangle(width: i32, height: i32, terrain: Terrain) -> Self {
        Self::from_coords(
            (0..width).flat_map(|q| (0..height).map(move |r| HexCoord::new(q, r))),
            terrain,
        )
    }

    /// A single row of cells at `r`, spanning `q_min..=q_max`
    pub fn line(q_min: i32, q_max: i32, r: i32) -> Self {
        Self::from_coords((q_min..=q_max).map(|q| HexCoord::new(q, r)), Terrain::Plain)
    }

    /// Insert a new cell, replacing any existing cell at the same key
    pub fn add_cell(&mut self, q: i32, r: i32, terrain: Terrain) -> &mut Cell {
        let coord = HexCoord::new(q, r);
        let cell = Cell::new(coord, terrain);
        match self.cells.entry(coord) {
            Entry::Occupied(mut slot) => {
                slot.insert(cell);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(cell),
        }
    }

    pub fn get_cell(&self, q: i32, r: i32) -> Option<&Cell> {
        self.cells.get(&HexCoord::new(q, r))
    }

    pub fn get(&self, coord: &HexCoord) -> Option<&Cell> {
        self.cells.get(coord)
    }

    pub fn get_mut(&mut self, coord: &HexCoord) -> Option<&mut Cell> {
        self.cells.get_mut(coord)
    }

    pub fn contains(&self, coord: &HexCoord) -> bool {
        self.cells.contains_key(coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Existing cells around (q, r), in `HEX_DIRECTIONS` order
    pub fn neighbors(&self, q: i32, r: i32) -> Vec<&Cell> {
        HexCoord::new(q, r)
            .neighbors()
            .iter()
            .filter_map(|n| self.cells.get(n))
            .collect()
    }

    /// Coordinates of existing neighbors, in `HEX_DIRECTIONS` order
    pub fn neighbor_coords(&self, coord: &HexCoord) -> Vec<HexCoord> {
        coord
            .neighbors()
            .into_iter()
            .filter(|n| self.contains(n))
            .collect()
    }

    /// Both cells exist and share an edge
    pub fn are_adjacent(&self, a: &HexCoord, b: &HexCoord) -> bool {
        a.is_adjacent(b) && self.contains(a) && self.contains(b)
    }

    /// Tag a cell with an occupant. Returns false if the cell does not exist.
    pub fn add_occupant(&mut self, coord: &HexCoord, tag: Occupant) -> bool {
        match self.cells.get_mut(coord) {
            Some(cell) => {
                cell.occupants.insert(tag);
                true
            }
            None => false,
        }
    }

    pub fn has_occupant(&self, coord: &HexCoord, tag: Occupant) -> bool {
        self.cells
            .get(coord)
            .map(|c| c.has_occupant(tag))
            .unwrap_or(false)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.values_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_coord_distance() {
        let a = HexCoord::new(0, 0);
        let b = HexCoord::new(2, 1);
        assert_eq!(a.distance(&b), 3);

        let c = HexCoord::new(0, 0);
        let d = HexCoord::new(0, 3);
        assert_eq!(c.distance(&d), 3);

        assert_eq!(HexCoord::new(1, -1).distance(&HexCoord::new(-1, 1)), 2);
    }

    #[test]
    fn test_hex_neighbors() {
        let center = HexCoord::new(0, 0);
        assert_eq!(center.neighbors().len(), 6);
        for n in center.neighbors() {
            assert_eq!(center.distance(&n), 1);
        }
    }

    #[test]
    fn test_neighbors_at_coordinate_limits() {
        let edge = HexCoord::new(i32::MAX, 0);
        let around = edge.neighbors();
        // (+1,0) and (+1,-1) would overflow q
        assert_eq!(around.len(), 4);
        assert!(around.iter().all(|n| n.q <= i32::MAX));

        let mut grid = HexGrid::new();
        grid.add_cell(i32::MAX, 0, Terrain::Plain);
        grid.add_cell(i32::MAX - 1, 0, Terrain::Plain);
        let coords: Vec<_> = grid.neighbors(i32::MAX, 0).iter().map(|c| c.coord).collect();
        assert_eq!(coords, vec![HexCoord::new(i32::MAX - 1, 0)]);
        assert!(grid.are_adjacent(
            &HexCoord::new(i32::MAX, 0),
            &HexCoord::new(i32::MAX - 1, 0)
        ));

        let far = HexCoord::new(i32::MIN, 0).distance(&HexCoord::new(i32::MAX, 0));
        assert_eq!(far, u32::MAX);
    }

    #[test]
    fn test_grid_neighbors_fixed_order() {
        let mut grid = HexGrid::new();
        grid.add_cell(0, 0, Terrain::Plain);
        grid.add_cell(0, 1, Terrain::Plain);
        grid.add_cell(1, 0, Terrain::Forest);
        grid.add_cell(-1, 1, Terrain::Plain);

        let coords: Vec<_> = grid.neighbors(0, 0).iter().map(|c| c.coord).collect();
        assert_eq!(
            coords,
            vec![HexCoord::new(1, 0), HexCoord::new(-1, 1), HexCoord::new(0, 1)]
        );
    }

    #[test]
    fn test_sparse_grid_neighbors() {
        let grid = HexGrid::line(0, 3, 0);
        assert_eq!(grid.neighbors(0, 0).len(), 1);
        assert_eq!(grid.neighbors(1, 0).len(), 2);
        assert!(grid.neighbors(10, 10).is_empty());
    }

    #[test]
    fn test_add_cell_replaces() {
        let mut grid = HexGrid::new();
        grid.add_cell(0, 0, Terrain::Plain).road = RoadState::Upgraded;
        grid.add_cell(0, 0, Terrain::Hills);

        let cell = grid.get_cell(0, 0).unwrap();
        assert_eq!(cell.terrain, Terrain::Hills);
        assert!(!cell.road_upgraded());
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_get_missing_cell() {
        let grid = HexGrid::rectangle(3, 3, Terrain::Plain);
        assert_eq!(grid.len(), 9);
        assert!(grid.get_cell(5, 5).is_none());
    }

    #[test]
    fn test_occupants() {
        let mut grid = HexGrid::line(0, 2, 0);
        let here = HexCoord::new(1, 0);
        assert!(!grid.has_occupant(&here, Occupant::Warehouse));
        assert!(grid.add_occupant(&here, Occupant::Warehouse));
        assert!(grid.has_occupant(&here, Occupant::Warehouse));
        assert!(!grid.add_occupant(&HexCoord::new(9, 9), Occupant::Warehouse));
    }

    #[test]
    fn test_are_adjacent_requires_both_cells() {
        let grid = HexGrid::line(0, 1, 0);
        assert!(grid.are_adjacent(&HexCoord::new(0, 0), &HexCoord::new(1, 0)));
        assert!(!grid.are_adjacent(&HexCoord::new(1, 0), &HexCoord::new(2, 0)));
        assert!(!grid.are_adjacent(&HexCoord::new(0, 0), &HexCoord::new(0, 0)));
    }

    #[test]
    fn test_road_state_flags_exclusive() {
        let mut cell = Cell::new(HexCoord::new(0, 0), Terrain::Plain);
        cell.road = RoadState::InProgress { turns_left: 2 };
        assert!(cell.upgrade_in_progress());
        assert!(!cell.road_upgraded());
        assert_eq!(cell.upgrade_turns_left(), 2);

        cell.road = RoadState::Upgraded;
        assert!(!cell.upgrade_in_progress());
        assert!(cell.road_upgraded());
        assert_eq!(cell.upgrade_turns_left(), 0);
    }

    #[test]
    fn test_coord_parse() {
        assert_eq!("-2,3".parse::<HexCoord>(), Ok(HexCoord::new(-2, 3)));
        assert!("nope".parse::<HexCoord>().is_err());
        assert_eq!(HexCoord::new(-2, 3).to_string(), "-2,3");
    }
}
