//! ============================================================================
//! Core Types for Larder
//! ============================================================================
//! Normalized domain records for shopping lists and pantry inventory.
//! These serialize to the same camelCase JSON documents the mobile app
//! persists, with dates as ISO-8601 strings.
//! ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{Category, StoreInfo};

/// Unit of measure for a shopping list item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitOfMeasure {
    Lb,
    Oz,
    Pieces,
    Pack,
}

impl UnitOfMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitOfMeasure::Lb => "lb",
            UnitOfMeasure::Oz => "oz",
            UnitOfMeasure::Pieces => "pieces",
            UnitOfMeasure::Pack => "pack",
        }
    }

    /// Parse a persisted unit string. Unknown units fall back to `pieces`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "lb" => UnitOfMeasure::Lb,
            "oz" => UnitOfMeasure::Oz,
            "pack" => UnitOfMeasure::Pack,
            _ => UnitOfMeasure::Pieces,
        }
    }
}

impl Default for UnitOfMeasure {
    fn default() -> Self {
        UnitOfMeasure::Pieces
    }
}

impl std::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single product line within a shopping list.
/// `price` is the line-item total, not a unit price; quantity never
/// multiplies into spend sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingListItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    pub unit: UnitOfMeasure,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub is_checked: bool,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreInfo>,
}

/// A named shopping trip with a budget, scoped to one store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    pub name: String,
    /// Absent when the persisted timestamp failed to parse
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub budget: f64,
    /// Stamped on creation; may be stale relative to `items`. Use
    /// `items_total` for a live figure.
    pub total_spent: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreInfo>,
    pub items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Create an empty list scoped to a store
    pub fn new(name: &str, budget: f64, store: StoreInfo) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            created_at: Some(Utc::now()),
            budget,
            total_spent: 0.0,
            store_id: Some(store.id.clone()),
            store: Some(store),
            items: Vec::new(),
        }
    }

    /// Live sum of item prices
    pub fn items_total(&self) -> f64 {
        self.items.iter().map(|i| i.price).sum()
    }

    /// Budget left after the current items. Lists without a budget report 0.
    pub fn remaining_budget(&self) -> f64 {
        if self.budget > 0.0 {
            self.budget - self.items_total()
        } else {
            0.0
        }
    }
}

/// Where a pantry item is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageLocation {
    Fridge,
    Freezer,
    Pantry,
}

impl StorageLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageLocation::Fridge => "Fridge",
            StorageLocation::Freezer => "Freezer",
            StorageLocation::Pantry => "Pantry",
        }
    }

    /// Parse a persisted location string. Unknown values fall back to `Pantry`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "fridge" => StorageLocation::Fridge,
            "freezer" => StorageLocation::Freezer,
            _ => StorageLocation::Pantry,
        }
    }
}

impl std::fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked household good with an optional expiration date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PantryItem {
    pub id: String,
    pub name: String,
    pub quantity: u32,
    /// Display emoji, one or two characters
    pub emoji: String,
    pub storage_location: StorageLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Typed domain failures surfaced by the managers
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum LarderError {
    #[error("Shopping list not found: {0}")]
    ListNotFound(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("This store has no catalog prices; a price must be entered manually")]
    PriceRequired,
}
