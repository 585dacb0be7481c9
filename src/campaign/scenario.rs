//! Standard two-faction scenario
//!
//! A single row of cells with one warehouse at each end. Each faction's
//! trucks and engineers start on the cell next to its warehouse.

use super::combat::RollSource;
use super::entities::{Engineer, Faction, Truck, Warehouse};
use super::map::{HexCoord, HexGrid};
use super::round::RoundEngine;
use crate::core::config::{RulesConfig, ScenarioRules};
use crate::core::types::{EngineerId, FactionId, Resource, ResourceStore, TruckId, WarehouseId};

pub const NORTH: FactionId = FactionId(1);
pub const SOUTH: FactionId = FactionId(2);

/// Build one faction anchored at `home` with its staging cell at `staging`.
///
/// Ids are offset per faction so they stay unique across the whole game.
fn build_faction(
    id: FactionId,
    name: &str,
    home: HexCoord,
    staging: HexCoord,
    rules: &ScenarioRules,
) -> Faction {
    let base = (id.0 - 1) * 100;
    let mut faction = Faction::new(id, name)
        .with_forces(rules.initial_soldiers, rules.initial_ammo, rules.initial_food)
        .with_engineers(rules.initial_engineers);

    // Reserve stock equal to the opening pools
    let stock = ResourceStore::new()
        .with(Resource::Ammo, rules.initial_ammo)
        .with(Resource::Food, rules.initial_food);
    faction.add_warehouse(Warehouse::new(WarehouseId(base + 1), id, home).with_stock(stock));

    for n in 1..=rules.trucks_per_faction {
        faction.add_truck(
            Truck::new(TruckId(base + n), id, staging).with_capacity(rules.truck_capacity),
        );
    }
    for n in 1..=rules.initial_engineers {
        faction.add_engineer(Engineer::new(EngineerId(base + n), id, staging));
    }

    faction
}

/// Grid and factions for the standard scenario
pub fn standard_setup(rules: &ScenarioRules) -> (HexGrid, Vec<Faction>) {
    let hw = rules.half_width;
    let grid = HexGrid::line(-hw, hw, 0);

    let north = build_faction(
        NORTH,
        "North",
        HexCoord::new(-hw, 0),
        HexCoord::new(-hw + 1, 0),
        rules,
    );
    let south = build_faction(
        SOUTH,
        "South",
        HexCoord::new(hw, 0),
        HexCoord::new(hw - 1, 0),
        rules,
    );

    (grid, vec![north, south])
}

/// Ready-to-play engine for the standard scenario
pub fn standard_game(rules: RulesConfig, rolls: impl RollSource + 'static) -> RoundEngine {
    let (grid, factions) = standard_setup(&rules.scenario);
    tracing::info!(
        cells = grid.len(),
        factions = factions.len(),
        "standard scenario ready"
    );
    RoundEngine::new(grid, factions, rules, rolls)
}
