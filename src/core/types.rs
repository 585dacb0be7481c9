//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a faction (player)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FactionId(pub u32);

/// Unique identifier for a supply truck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TruckId(pub u32);

/// Unique identifier for a warehouse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WarehouseId(pub u32);

/// Unique identifier for an engineer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EngineerId(pub u32);

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl fmt::Display for TruckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl fmt::Display for EngineerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Round counter (simulation time unit)
pub type Round = u32;

/// The fixed set of resources moved around by trucks and warehouses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Soldiers,
    Ammo,
    Food,
    Engineers,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Soldiers,
        Resource::Ammo,
        Resource::Food,
        Resource::Engineers,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Soldiers => "soldiers",
            Self::Ammo => "ammo",
            Self::Food => "food",
            Self::Engineers => "engineers",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.name() == s)
            .ok_or_else(|| format!("unknown resource '{}'", s))
    }
}

/// Quantities of every resource, used for truck cargo and warehouse stock
///
/// Fields are unsigned, so a store can never hold a negative quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceStore {
    pub soldiers: u32,
    pub ammo: u32,
    pub food: u32,
    pub engineers: u32,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, resource: Resource, amount: u32) -> Self {
        *self.get_mut(resource) = amount;
        self
    }

    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Soldiers => self.soldiers,
            Resource::Ammo => self.ammo,
            Resource::Food => self.food,
            Resource::Engineers => self.engineers,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut u32 {
        match resource {
            Resource::Soldiers => &mut self.soldiers,
            Resource::Ammo => &mut self.ammo,
            Resource::Food => &mut self.food,
            Resource::Engineers => &mut self.engineers,
        }
    }

    /// Sum over all resources, saturating at `u32::MAX`
    pub fn total(&self) -> u32 {
        Resource::ALL
            .iter()
            .fold(0u32, |acc, r| acc.saturating_add(self.get(*r)))
    }
}
