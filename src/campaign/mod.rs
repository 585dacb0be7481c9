//! Campaign layer - the board, the units on it and the round loop

pub mod combat;
pub mod engineering;
pub mod entities;
pub mod map;
pub mod movement;
pub mod pathfinding;
pub mod round;
pub mod scenario;
pub mod supply;

pub use combat::{resolve_attack, AttackResult, FixedRoll, RollSource, SeededRolls};
pub use entities::{Engineer, Faction, Truck, Warehouse};
pub use map::{Cell, HexCoord, HexGrid, Occupant, RoadState, Terrain};
pub use movement::{move_truck, MoveError, MoveOutcome};
pub use pathfinding::{find_path, path_cost, PathResult};
pub use round::{FactionStatus, RoundEngine, RoundReport};
