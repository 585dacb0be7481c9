//! Supply transfers between warehouses and trucks
//!
//! Both directions are atomic: a refused transfer leaves the truck cargo and
//! the warehouse stock exactly as they were.

use thiserror::Error;

use super::entities::{Truck, Warehouse};
use crate::core::types::Resource;

/// Reasons a transfer is refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SupplyError {
    #[error("amount must be positive")]
    NonPositiveAmount,

    #[error("warehouse holds {available} {resource}, {requested} requested")]
    InsufficientStock {
        resource: Resource,
        requested: u32,
        available: u32,
    },

    #[error("truck holds {available} {resource}, {requested} requested")]
    InsufficientCargo {
        resource: Resource,
        requested: u32,
        available: u32,
    },

    #[error("loading {requested} would exceed truck capacity ({free} free)")]
    CapacityExceeded { requested: u32, free: u32 },

    #[error("warehouse cannot hold {requested} more {resource} (holds {stock})")]
    StockOverflow {
        resource: Resource,
        requested: u32,
        stock: u32,
    },
}

/// Load `amount` of `resource` from a warehouse onto a truck
pub fn load(
    warehouse: &mut Warehouse,
    truck: &mut Truck,
    resource: Resource,
    amount: u32,
) -> Result<(), SupplyError> {
    if amount == 0 {
        return Err(SupplyError::NonPositiveAmount);
    }

    let available = warehouse.stock.get(resource);
    if available < amount {
        return Err(SupplyError::InsufficientStock {
            resource,
            requested: amount,
            available,
        });
    }

    let free = truck.free_capacity();
    if amount > free {
        return Err(SupplyError::CapacityExceeded {
            requested: amount,
            free,
        });
    }

    *warehouse.stock.get_mut(resource) -= amount;
    *truck.cargo.get_mut(resource) += amount;

    tracing::debug!(
        warehouse = %warehouse.id,
        truck = %truck.id,
        %resource,
        amount,
        "loaded"
    );
    Ok(())
}

/// Unload `amount` of `resource` from a truck into a warehouse
pub fn unload(
    truck: &mut Truck,
    warehouse: &mut Warehouse,
    resource: Resource,
    amount: u32,
) -> Result<(), SupplyError> {
    if amount == 0 {
        return Err(SupplyError::NonPositiveAmount);
    }

    let available = truck.cargo.get(resource);
    if available < amount {
        return Err(SupplyError::InsufficientCargo {
            resource,
            requested: amount,
            available,
        });
    }

    let stock = warehouse.stock.get(resource);
    let Some(new_stock) = stock.checked_add(amount) else {
        return Err(SupplyError::StockOverflow {
            resource,
            requested: amount,
            stock,
        });
    };

    *truck.cargo.get_mut(resource) -= amount;
    *warehouse.stock.get_mut(resource) = new_stock;

    tracing::debug!(
        truck = %truck.id,
        warehouse = %warehouse.id,
        %resource,
        amount,
        "unloaded"
    );
    Ok(())
}
