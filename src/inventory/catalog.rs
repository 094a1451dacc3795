//! Inventory list management

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::validation::validate_items;

/// Ordered list of stocked items
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    /// Create an inventory from items in display order
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    /// The fixed sample stock a fresh session starts with
    pub fn sample() -> Self {
        Self::new(vec![
            InventoryItem::new(1, "A01", "吉伊卡哇童巾", BigDecimal::from(12), 50),
            InventoryItem::new(2, "A02", "滿天星洋芋片", BigDecimal::from(15), 32),
            InventoryItem::new(3, "B01", "鯊魚手偶", BigDecimal::from(40), 12),
            InventoryItem::new(4, "C03", "夾子園聯名奶茶", BigDecimal::from(20), 21),
        ])
    }

    /// All items in order
    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items whose machine code or name contains `query`, order preserved
    ///
    /// Matching is case-sensitive; an empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<&InventoryItem> {
        self.items.iter().filter(|item| item.matches(query)).collect()
    }

    /// Get an item by ID
    pub fn get(&self, id: u32) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// First item whose name equals `name` exactly
    pub fn find_by_name(&self, name: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.item == name)
    }

    pub(crate) fn find_by_name_mut(&mut self, name: &str) -> Option<&mut InventoryItem> {
        self.items.iter_mut().find(|item| item.item == name)
    }

    /// Replace the whole list after validating it
    pub fn replace(&mut self, items: Vec<InventoryItem>) -> InventoryResult<()> {
        validate_items(&items)?;
        self.items = items;
        Ok(())
    }

    /// Totals across the list
    pub fn summary(&self) -> InventorySummary {
        InventorySummary {
            item_count: self.items.len(),
            total_units: self.items.iter().map(|item| item.stock).sum(),
            total_value: self.items.iter().map(|item| item.stock_value()).sum(),
            negative_stock: self
                .items
                .iter()
                .filter(|item| item.stock < 0)
                .map(|item| item.id)
                .collect(),
        }
    }
}

/// Snapshot totals of an inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub item_count: usize,
    pub total_units: i64,
    /// Sum of cost × stock
    pub total_value: BigDecimal,
    /// IDs of items whose stock is below zero
    pub negative_stock: Vec<u32>,
}
