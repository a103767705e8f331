//! ============================================================================
//! Raw Records - Lenient decoding of persisted documents
//! ============================================================================
//! Mirror types for the stored JSON with every field defaulted, so documents
//! written by older app versions still decode. `normalize` turns them into
//! the typed records the engines consume: categories are matched against the
//! closed set, dates that fail to parse become absent, and store references
//! are re-resolved from the static catalog.
//! ============================================================================

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::catalog::{resolve_store, sanitize_category, StoreInfo};
use crate::types::{
    PantryItem, ShoppingList, ShoppingListItem, StorageLocation, UnitOfMeasure,
};

/// Emoji shown for pantry records persisted without one
const FALLBACK_EMOJI: &str = "📦";

/// Loosely-shaped persisted shopping list item
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawShoppingListItem {
    pub id: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub original_price: Option<f64>,
    pub is_checked: bool,
    pub category: Option<String>,
    pub store_id: Option<String>,
    pub store: Option<StoreInfo>,
}

impl RawShoppingListItem {
    pub fn normalize(self) -> ShoppingListItem {
        let store = self
            .store
            .or_else(|| self.store_id.as_deref().and_then(resolve_store));

        ShoppingListItem {
            id: self.id,
            name: self.name,
            quantity: normalize_quantity(self.quantity),
            unit: self
                .unit
                .as_deref()
                .map(UnitOfMeasure::parse_or_default)
                .unwrap_or_default(),
            price: normalize_price(self.price),
            original_price: self.original_price.filter(|p| p.is_finite() && *p >= 0.0),
            is_checked: self.is_checked,
            category: sanitize_category(self.category.as_deref()),
            store_id: self.store_id,
            store,
        }
    }
}

/// Loosely-shaped persisted shopping list
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawShoppingList {
    pub id: String,
    pub name: String,
    pub created_at: Option<String>,
    pub budget: Option<f64>,
    pub total_spent: Option<f64>,
    pub store_id: Option<String>,
    pub store: Option<StoreInfo>,
    pub items: Vec<RawShoppingListItem>,
}

impl RawShoppingList {
    pub fn normalize(self) -> ShoppingList {
        let store = self
            .store
            .or_else(|| self.store_id.as_deref().and_then(resolve_store));

        ShoppingList {
            id: self.id,
            name: self.name,
            created_at: parse_date(self.created_at.as_deref()),
            budget: normalize_price(self.budget),
            total_spent: normalize_price(self.total_spent),
            store_id: self.store_id,
            store,
            items: self.items.into_iter().map(RawShoppingListItem::normalize).collect(),
        }
    }
}

/// Loosely-shaped persisted pantry item
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPantryItem {
    pub id: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub emoji: Option<String>,
    pub storage_location: Option<String>,
    pub expiration_date: Option<String>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl RawPantryItem {
    pub fn normalize(self) -> PantryItem {
        PantryItem {
            id: self.id,
            name: self.name,
            quantity: normalize_quantity(self.quantity),
            emoji: self
                .emoji
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_EMOJI.to_string()),
            storage_location: self
                .storage_location
                .as_deref()
                .map(StorageLocation::parse_or_default)
                .unwrap_or(StorageLocation::Pantry),
            expiration_date: parse_date(self.expiration_date.as_deref()),
            notes: self.notes.filter(|n| !n.is_empty()),
            created_at: parse_date(self.created_at.as_deref()).unwrap_or(DateTime::<Utc>::MIN_UTC),
            updated_at: parse_date(self.updated_at.as_deref()).unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

/// Decode the `shopping_lists` document through the normalizer
pub fn decode_shopping_lists(json: &str) -> Result<Vec<ShoppingList>> {
    let raw: Vec<RawShoppingList> = serde_json::from_str(json)
        .map_err(|e| anyhow!("Failed to decode shopping lists document: {}", e))?;
    Ok(raw.into_iter().map(RawShoppingList::normalize).collect())
}

/// Decode the `pantry_items` document through the normalizer
pub fn decode_pantry_items(json: &str) -> Result<Vec<PantryItem>> {
    let raw: Vec<RawPantryItem> = serde_json::from_str(json)
        .map_err(|e| anyhow!("Failed to decode pantry items document: {}", e))?;
    Ok(raw.into_iter().map(RawPantryItem::normalize).collect())
}

/// Parse an ISO-8601 date string. Anything unparseable is absent, never an
/// error.
fn parse_date(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn normalize_quantity(raw: Option<f64>) -> u32 {
    match raw {
        Some(q) if q.is_finite() && q >= 1.0 => q as u32,
        _ => 1,
    }
}

fn normalize_price(raw: Option<f64>) -> f64 {
    match raw {
        Some(p) if p.is_finite() && p >= 0.0 => p,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    #[test]
    fn test_category_is_normalized_on_decode() {
        let json = r#"[{
            "id": "1", "name": "Trip", "createdAt": "2024-01-05T10:00:00.000Z",
            "budget": 100, "totalSpent": 0,
            "items": [
                {"id": "a", "name": "Apples", "quantity": 3, "unit": "lb",
                 "price": 4.5, "isChecked": false, "category": "produce"},
                {"id": "b", "name": "Mystery", "quantity": 1, "unit": "pieces",
                 "price": 2.0, "isChecked": true, "category": "General"}
            ]
        }]"#;

        let lists = decode_shopping_lists(json).expect("decode");
        assert_eq!(lists[0].items[0].category, Category::Produce);
        assert_eq!(lists[0].items[1].category, Category::Other);
    }

    #[test]
    fn test_bad_dates_become_absent() {
        let json = r#"[{
            "id": "1", "name": "Trip", "createdAt": "not-a-date",
            "budget": 0, "totalSpent": 0, "items": []
        }]"#;

        let lists = decode_shopping_lists(json).expect("decode");
        assert!(lists[0].created_at.is_none());
    }

    #[test]
    fn test_store_resolved_from_store_id() {
        let json = r#"[{
            "id": "1", "name": "Trip", "createdAt": "2024-01-05T10:00:00Z",
            "budget": 0, "totalSpent": 0, "storeId": "3", "items": []
        }]"#;

        let lists = decode_shopping_lists(json).expect("decode");
        let store = lists[0].store.as_ref().expect("resolved store");
        assert_eq!(store.name, "Kroger");
    }

    #[test]
    fn test_unknown_store_id_leaves_store_absent() {
        let json = r#"[{
            "id": "1", "name": "Trip", "createdAt": "2024-01-05T10:00:00Z",
            "budget": 0, "totalSpent": 0, "storeId": "42", "items": []
        }]"#;

        let lists = decode_shopping_lists(json).expect("decode");
        assert!(lists[0].store.is_none());
        assert_eq!(lists[0].store_id.as_deref(), Some("42"));
    }

    #[test]
    fn test_embedded_store_wins_over_catalog() {
        let json = r#"[{
            "id": "1", "name": "Trip", "createdAt": "2024-01-05T10:00:00Z",
            "budget": 0, "totalSpent": 0, "storeId": "1",
            "store": {"id": "1", "name": "Walmart Supercenter"},
            "items": []
        }]"#;

        let lists = decode_shopping_lists(json).expect("decode");
        let store = lists[0].store.as_ref().expect("embedded store");
        assert_eq!(store.name, "Walmart Supercenter");
    }

    #[test]
    fn test_pantry_bad_expiration_is_absent() {
        let json = r#"[{
            "id": "p1", "name": "Milk", "quantity": 1, "emoji": "🥛",
            "storageLocation": "Fridge", "expirationDate": "soon",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z"
        }]"#;

        let items = decode_pantry_items(json).expect("decode");
        assert!(items[0].expiration_date.is_none());
        assert_eq!(items[0].storage_location, StorageLocation::Fridge);
    }

    #[test]
    fn test_pantry_defaults_for_missing_fields() {
        let json = r#"[{"id": "p1", "name": "Beans"}]"#;

        let items = decode_pantry_items(json).expect("decode");
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].emoji, "📦");
        assert_eq!(items[0].storage_location, StorageLocation::Pantry);
        assert!(items[0].expiration_date.is_none());
    }

    #[test]
    fn test_negative_and_non_finite_prices_default_to_zero() {
        let json = r#"[{
            "id": "1", "name": "Trip", "createdAt": "2024-01-05T10:00:00Z",
            "budget": -20, "totalSpent": 0,
            "items": [{"id": "a", "name": "Ghost", "quantity": 0, "unit": "oz",
                       "price": -3.0, "isChecked": false}]
        }]"#;

        let lists = decode_shopping_lists(json).expect("decode");
        assert_eq!(lists[0].budget, 0.0);
        assert_eq!(lists[0].items[0].price, 0.0);
        assert_eq!(lists[0].items[0].quantity, 1);
        assert_eq!(lists[0].items[0].category, Category::Other);
    }

    #[test]
    fn test_round_trip_preserves_normalized_data() {
        let json = r#"[{
            "id": "1", "name": "Trip", "createdAt": "2024-01-05T10:00:00Z",
            "budget": 50, "totalSpent": 12.5, "storeId": "2",
            "items": [{"id": "a", "name": "Chips", "quantity": 2, "unit": "pack",
                       "price": 6.0, "isChecked": false, "category": "snacks",
                       "storeId": "2"}]
        }]"#;

        let first = decode_shopping_lists(json).expect("decode");
        let encoded = serde_json::to_string(&first).expect("encode");
        let second = decode_shopping_lists(&encoded).expect("re-decode");

        assert_eq!(first, second);
        assert_eq!(second[0].store.as_ref().map(|s| s.name.as_str()), Some("Target"));
        assert_eq!(second[0].items[0].category, Category::Snacks);
    }
}
