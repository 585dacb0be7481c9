//! Truck movement along a chosen path
//!
//! A move is all-or-nothing: either the truck ends on the last cell of the
//! path with the cost deducted, or nothing about its position or budget
//! changes.

use thiserror::Error;

use super::entities::Truck;
use super::map::{HexCoord, HexGrid, Occupant};
use super::pathfinding::path_cost;
use crate::core::config::MovementRules;

/// Reasons a move is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("path is empty")]
    EmptyPath,

    #[error("path costs {cost} but only {available} movement points remain")]
    InsufficientMp { cost: u32, available: u32 },

    #[error("cell {0} holds a warehouse and cannot be entered")]
    WarehouseCell(HexCoord),
}

/// Result of a successful move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub from: HexCoord,
    pub to: HexCoord,
    pub cost: u32,
    pub remaining_mp: u32,
}

/// Move `truck` along `path` (cells to enter, current cell excluded)
///
/// An exhausted budget is refilled to `mp_per_round` before the cost check.
pub fn move_truck(
    grid: &HexGrid,
    truck: &mut Truck,
    path: &[HexCoord],
    rules: &MovementRules,
) -> Result<MoveOutcome, MoveError> {
    let Some(&destination) = path.last() else {
        return Err(MoveError::EmptyPath);
    };

    if truck.refill_mp_if_exhausted(rules.mp_per_round) {
        tracing::debug!(truck = %truck.id, mp = truck.remaining_mp, "movement points refilled");
    }

    let cost = path_cost(grid, path, rules);
    if cost > truck.remaining_mp {
        return Err(MoveError::InsufficientMp {
            cost,
            available: truck.remaining_mp,
        });
    }

    if grid.has_occupant(&destination, Occupant::Warehouse) {
        return Err(MoveError::WarehouseCell(destination));
    }

    let from = truck.position;
    truck.position = destination;
    truck.remaining_mp -= cost;

    tracing::debug!(
        truck = %truck.id,
        %from,
        to = %destination,
        cost,
        remaining = truck.remaining_mp,
        "truck moved"
    );

    Ok(MoveOutcome {
        from,
        to: destination,
        cost,
        remaining_mp: truck.remaining_mp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::campaign::map::RoadState;
    use crate::core::types::{FactionId, TruckId};

    fn truck_at(q: i32, r: i32, mp: u32) -> Truck {
        Truck::new(TruckId(1), FactionId(1), HexCoord::new(q, r)).with_mp(mp)
    }

    #[test]
    fn test_move_truck_success_and_mp_deduction() {
        let grid = HexGrid::line(0, 1, 0);
        let rules = MovementRules::default();
        let mut truck = truck_at(0, 0, 6);

        let outcome = move_truck(&grid, &mut truck, &[HexCoord::new(1, 0)], &rules).unwrap();
        assert_eq!(truck.position, HexCoord::new(1, 0));
        assert_eq!(truck.remaining_mp, 6 - rules.unupgraded_road_cost);
        assert_eq!(outcome.cost, rules.unupgraded_road_cost);
        assert_eq!(outcome.from, HexCoord::new(0, 0));
    }

    #[test]
    fn test_move_truck_insufficient_mp() {
        let grid = HexGrid::line(0, 2, 0);
        let rules = MovementRules::default();
        let mut truck = truck_at(0, 0, 2);

        // Two cells cost 4
        let err = move_truck(
            &grid,
            &mut truck,
            &[HexCoord::new(1, 0), HexCoord::new(2, 0)],
            &rules,
        )
        .unwrap_err();

        assert_eq!(err, MoveError::InsufficientMp { cost: 4, available: 2 });
        assert_eq!(truck.position, HexCoord::new(0, 0));
        assert_eq!(truck.remaining_mp, 2);
    }

    #[test]
    fn test_exhausted_budget_is_refilled() {
        let grid = HexGrid::line(0, 3, 0);
        let rules = MovementRules::default();
        let mut truck = truck_at(0, 0, 0);

        let path = [HexCoord::new(1, 0), HexCoord::new(2, 0), HexCoord::new(3, 0)];
        move_truck(&grid, &mut truck, &path, &rules).unwrap();
        assert_eq!(truck.position, HexCoord::new(3, 0));
        assert_eq!(truck.remaining_mp, 0);
    }

    #[test]
    fn test_leftover_budget_is_not_topped_up() {
        let grid = HexGrid::line(0, 3, 0);
        let rules = MovementRules::default();
        let mut truck = truck_at(0, 0, 2);

        let path = [HexCoord::new(1, 0), HexCoord::new(2, 0)];
        assert!(move_truck(&grid, &mut truck, &path, &rules).is_err());
        assert_eq!(truck.remaining_mp, 2);
    }

    #[test]
    fn test_cannot_end_on_warehouse() {
        let mut grid = HexGrid::line(0, 2, 0);
        grid.add_occupant(&HexCoord::new(1, 0), Occupant::Warehouse);
        let rules = MovementRules::default();
        let mut truck = truck_at(0, 0, 6);

        let err = move_truck(&grid, &mut truck, &[HexCoord::new(1, 0)], &rules).unwrap_err();
        assert_eq!(err, MoveError::WarehouseCell(HexCoord::new(1, 0)));
        assert_eq!(truck.position, HexCoord::new(0, 0));
        assert_eq!(truck.remaining_mp, 6);
    }

    #[test]
    fn test_upgraded_road_is_cheaper() {
        let mut grid = HexGrid::line(0, 3, 0);
        for q in 1..=3 {
            grid.get_mut(&HexCoord::new(q, 0)).unwrap().road = RoadState::Upgraded;
        }
        let rules = MovementRules::default();
        let mut truck = truck_at(0, 0, 3);

        let path = [HexCoord::new(1, 0), HexCoord::new(2, 0), HexCoord::new(3, 0)];
        move_truck(&grid, &mut truck, &path, &rules).unwrap();
        assert_eq!(truck.remaining_mp, 0);
    }

    #[test]
    fn test_off_grid_cell_is_effectively_impassable() {
        let grid = HexGrid::line(0, 1, 0);
        let rules = MovementRules::default();
        let mut truck = truck_at(1, 0, 6);

        let err = move_truck(&grid, &mut truck, &[HexCoord::new(2, 0)], &rules).unwrap_err();
        assert!(matches!(err, MoveError::InsufficientMp { cost: 9999, .. }));
    }

    #[test]
    fn test_empty_path_rejected() {
        let grid = HexGrid::line(0, 1, 0);
        let rules = MovementRules::default();
        let mut truck = truck_at(0, 0, 6);
        assert_eq!(move_truck(&grid, &mut truck, &[], &rules), Err(MoveError::EmptyPath));
    }
}
