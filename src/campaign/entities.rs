//! Factions and the units they own: trucks, warehouses and engineers

use serde::{Deserialize, Serialize};

use super::map::HexCoord;
use crate::core::types::{EngineerId, FactionId, Resource, ResourceStore, TruckId, WarehouseId};

/// Default cargo capacity of a truck
pub const DEFAULT_TRUCK_CAPACITY: u32 = 10;

/// A supply truck
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Truck {
    pub id: TruckId,
    pub owner: FactionId,
    pub position: HexCoord,
    pub capacity: u32,
    pub cargo: ResourceStore,
    /// Movement points left for the current round
    pub remaining_mp: u32,
}

impl Truck {
    pub fn new(id: TruckId, owner: FactionId, position: HexCoord) -> Self {
        Self {
            id,
            owner,
            position,
            capacity: DEFAULT_TRUCK_CAPACITY,
            cargo: ResourceStore::new(),
            remaining_mp: 0,
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_mp(mut self, mp: u32) -> Self {
        self.remaining_mp = mp;
        self
    }

    pub fn with_cargo(mut self, resource: Resource, amount: u32) -> Self {
        *self.cargo.get_mut(resource) = amount;
        self
    }

    /// Space left before the truck is full
    pub fn free_capacity(&self) -> u32 {
        self.capacity.saturating_sub(self.cargo.total())
    }

    /// Refill movement points if the budget is spent
    ///
    /// Leftover points carry over; only an exhausted budget is refilled.
    /// Returns true if a refill happened.
    pub fn refill_mp_if_exhausted(&mut self, allowance: u32) -> bool {
        if self.remaining_mp == 0 {
            self.remaining_mp = allowance;
            true
        } else {
            false
        }
    }
}

/// A warehouse holding a faction's stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: WarehouseId,
    pub owner: FactionId,
    pub position: HexCoord,
    pub stock: ResourceStore,
}

impl Warehouse {
    pub fn new(id: WarehouseId, owner: FactionId, position: HexCoord) -> Self {
        Self {
            id,
            owner,
            position,
            stock: ResourceStore::new(),
        }
    }

    pub fn with_stock(mut self, stock: ResourceStore) -> Self {
        self.stock = stock;
        self
    }
}

/// An engineer that can be sent to upgrade roads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engineer {
    pub id: EngineerId,
    pub owner: FactionId,
    pub position: HexCoord,
}

impl Engineer {
    pub fn new(id: EngineerId, owner: FactionId, position: HexCoord) -> Self {
        Self { id, owner, position }
    }
}

/// A player faction and everything it owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub soldiers: u32,
    pub ammo: u32,
    pub food: u32,
    pub engineers: u32,
    pub trucks: Vec<Truck>,
    pub warehouses: Vec<Warehouse>,
    pub engineer_units: Vec<Engineer>,
}

impl Faction {
    pub fn new(id: FactionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            soldiers: 0,
            ammo: 0,
            food: 0,
            engineers: 0,
            trucks: Vec::new(),
            warehouses: Vec::new(),
            engineer_units: Vec::new(),
        }
    }

    pub fn with_forces(mut self, soldiers: u32, ammo: u32, food: u32) -> Self {
        self.soldiers = soldiers;
        self.ammo = ammo;
        self.food = food;
        self
    }

    pub fn with_engineers(mut self, engineers: u32) -> Self {
        self.engineers = engineers;
        self
    }

    /// A faction with no soldiers left is out of the game
    pub fn is_eliminated(&self) -> bool {
        self.soldiers == 0
    }

    pub fn add_truck(&mut self, mut truck: Truck) {
        truck.owner = self.id;
        self.trucks.push(truck);
    }

    pub fn add_engineer(&mut self, mut engineer: Engineer) {
        engineer.owner = self.id;
        self.engineer_units.push(engineer);
    }

    /// Add a warehouse. Its grid cell is tagged when the engine is built.
    pub fn add_warehouse(&mut self, mut warehouse: Warehouse) {
        warehouse.owner = self.id;
        self.warehouses.push(warehouse);
    }

    pub fn get_truck(&self, id: TruckId) -> Option<&Truck> {
        self.trucks.iter().find(|t| t.id == id)
    }

    pub fn get_truck_mut(&mut self, id: TruckId) -> Option<&mut Truck> {
        self.trucks.iter_mut().find(|t| t.id == id)
    }

    pub fn get_warehouse(&self, id: WarehouseId) -> Option<&Warehouse> {
        self.warehouses.iter().find(|w| w.id == id)
    }

    pub fn get_engineer_mut(&mut self, id: EngineerId) -> Option<&mut Engineer> {
        self.engineer_units.iter_mut().find(|e| e.id == id)
    }

    /// Borrow a truck and a warehouse of this faction at the same time
    pub fn truck_and_warehouse_mut(
        &mut self,
        truck: TruckId,
        warehouse: WarehouseId,
    ) -> (Option<&mut Truck>, Option<&mut Warehouse>) {
        let truck = self.trucks.iter_mut().find(|t| t.id == truck);
        let warehouse = self.warehouses.iter_mut().find(|w| w.id == warehouse);
        (truck, warehouse)
    }
}
