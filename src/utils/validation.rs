//! Validation utilities

use bigdecimal::BigDecimal;
use std::collections::HashSet;

use crate::types::*;

/// Validate that a unit cost is not negative
pub fn validate_cost(cost: &BigDecimal) -> InventoryResult<()> {
    if *cost < BigDecimal::from(0) {
        Err(InventoryError::Validation(
            "Cost cannot be negative".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that a machine code is usable
pub fn validate_machine(machine: &str) -> InventoryResult<()> {
    if machine.trim().is_empty() {
        return Err(InventoryError::Validation(
            "Machine code cannot be empty".to_string(),
        ));
    }

    if machine.chars().count() > 20 {
        return Err(InventoryError::Validation(
            "Machine code cannot exceed 20 characters".to_string(),
        ));
    }

    Ok(())
}

/// Validate a single inventory item
pub fn validate_item(item: &InventoryItem) -> InventoryResult<()> {
    validate_machine(&item.machine)?;
    validate_cost(&item.cost)?;

    if item.item.trim().is_empty() {
        return Err(InventoryError::Validation(format!(
            "Item {} has an empty name",
            item.id
        )));
    }

    Ok(())
}

/// Validate a full inventory list: every item valid, IDs unique
pub fn validate_items(items: &[InventoryItem]) -> InventoryResult<()> {
    let mut ids = HashSet::new();
    for item in items {
        validate_item(item)?;
        if !ids.insert(item.id) {
            return Err(InventoryError::Validation(format!(
                "Item ID {} appears more than once",
                item.id
            )));
        }
    }
    Ok(())
}
