use thiserror::Error;

use crate::campaign::engineering::UpgradeError;
use crate::campaign::movement::MoveError;
use crate::campaign::supply::SupplyError;
use crate::core::config::ConfigError;
use crate::core::types::{EngineerId, FactionId, TruckId, WarehouseId};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Faction not found: {0}")]
    FactionNotFound(FactionId),

    #[error("Truck {truck} not found for faction {faction}")]
    TruckNotFound { faction: FactionId, truck: TruckId },

    #[error("Warehouse {warehouse} not found for faction {faction}")]
    WarehouseNotFound {
        faction: FactionId,
        warehouse: WarehouseId,
    },

    #[error("Engineer {engineer} not found for faction {faction}")]
    EngineerNotFound {
        faction: FactionId,
        engineer: EngineerId,
    },

    #[error("Truck {0} has already moved this round")]
    AlreadyMoved(TruckId),

    #[error("Move rejected: {0}")]
    Move(#[from] MoveError),

    #[error("Supply transfer rejected: {0}")]
    Supply(#[from] SupplyError),

    #[error("Upgrade rejected: {0}")]
    Upgrade(#[from] UpgradeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
