//! Road upgrades
//!
//! A road goes `Unupgraded -> InProgress { turns_left } -> Upgraded` and never
//! leaves `Upgraded`. Upgrades advance once per call to [`advance_upgrades`].

use thiserror::Error;

use super::entities::Engineer;
use super::map::{HexCoord, HexGrid, RoadState};

/// Reasons an upgrade cannot start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpgradeError {
    #[error("cell {0} not found")]
    CellNotFound(HexCoord),

    #[error("road at {0} is already upgraded")]
    AlreadyUpgraded(HexCoord),

    #[error("upgrade already in progress at {0}")]
    AlreadyInProgress(HexCoord),
}

/// Send `engineer` to `coord` and begin upgrading its road
pub fn start_upgrade(
    grid: &mut HexGrid,
    engineer: &mut Engineer,
    coord: HexCoord,
    turns: u32,
) -> Result<(), UpgradeError> {
    let cell = grid
        .get_mut(&coord)
        .ok_or(UpgradeError::CellNotFound(coord))?;

    match cell.road {
        RoadState::Upgraded => return Err(UpgradeError::AlreadyUpgraded(coord)),
        RoadState::InProgress { .. } => return Err(UpgradeError::AlreadyInProgress(coord)),
        RoadState::Unupgraded => {}
    }

    engineer.position = coord;
    cell.road = RoadState::InProgress { turns_left: turns };

    tracing::debug!(engineer = %engineer.id, %coord, turns, "road upgrade started");
    Ok(())
}

/// Advance every running upgrade by one round
///
/// Returns the cells whose upgrade completed, sorted by coordinate.
pub fn advance_upgrades(grid: &mut HexGrid) -> Vec<HexCoord> {
    let mut completed = Vec::new();

    for cell in grid.cells_mut() {
        if let RoadState::InProgress { turns_left } = cell.road {
            let turns_left = turns_left.saturating_sub(1);
            cell.road = if turns_left == 0 {
                completed.push(cell.coord);
                RoadState::Upgraded
            } else {
                RoadState::InProgress { turns_left }
            };
        }
    }

    completed.sort();
    for coord in &completed {
        tracing::debug!(%coord, "road upgrade complete");
    }
    completed
}
