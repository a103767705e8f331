//! ============================================================================
//! Catalog - Fixed categories and the static store list
//! ============================================================================
//! The closed set of spend categories used for analytics grouping, and the
//! static catalog of stores a list can be scoped to. Neither is user-editable.
//! ============================================================================

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Closed set of spend-classification buckets. Persisted category strings are
/// always normalized into this set before any aggregation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Produce,
    Dairy,
    Meat,
    Bakery,
    Pantry,
    Snacks,
    Frozen,
    Beverages,
    Household,
    Party,
    Other,
}

/// Fallback for absent or unrecognized category strings
pub const DEFAULT_CATEGORY: Category = Category::Other;

impl Category {
    /// Every category, in display order
    pub const ALL: [Category; 11] = [
        Category::Produce,
        Category::Dairy,
        Category::Meat,
        Category::Bakery,
        Category::Pantry,
        Category::Snacks,
        Category::Frozen,
        Category::Beverages,
        Category::Household,
        Category::Party,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::Dairy => "Dairy",
            Category::Meat => "Meat",
            Category::Bakery => "Bakery",
            Category::Pantry => "Pantry",
            Category::Snacks => "Snacks",
            Category::Frozen => "Frozen",
            Category::Beverages => "Beverages",
            Category::Household => "Household",
            Category::Party => "Party",
            Category::Other => "Other",
        }
    }

    /// UI color token for this category's bar in the breakdown view
    pub fn color_class(&self) -> &'static str {
        match self {
            Category::Produce => "bg-primary-500",
            Category::Dairy => "bg-secondary-400",
            Category::Meat => "bg-danger",
            Category::Bakery => "bg-accent-400",
            Category::Pantry => "bg-secondary-600",
            Category::Snacks => "bg-warning",
            Category::Frozen => "bg-info",
            Category::Beverages => "bg-primary-400",
            Category::Household => "bg-neutral-500",
            Category::Party => "bg-accent-500",
            Category::Other => "bg-neutral-400",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        DEFAULT_CATEGORY
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a raw category string against the closed set.
/// Trims, matches case-insensitively, and falls back to `Other` when the
/// input is absent, empty, or not in the set.
pub fn sanitize_category(raw: Option<&str>) -> Category {
    let Some(raw) = raw else {
        return DEFAULT_CATEGORY;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_CATEGORY;
    }

    Category::ALL
        .iter()
        .copied()
        .find(|c| c.as_str().eq_ignore_ascii_case(trimmed))
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Color class for a raw category string (sanitizes first)
pub fn category_color_class(raw: Option<&str>) -> &'static str {
    sanitize_category(raw).color_class()
}

/// A store a shopping list can be scoped to. Static reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

/// Sentinel store id for "Not listed". Items added against this store carry
/// no catalog price source, so callers must supply a price manually.
pub const NOT_LISTED_STORE_ID: &str = "5";

/// The fixed store catalog, including the "Not listed" sentinel
pub static AVAILABLE_STORES: Lazy<Vec<StoreInfo>> = Lazy::new(|| {
    vec![
        StoreInfo {
            id: "1".to_string(),
            name: "Walmart".to_string(),
            address: Some("123 Main St".to_string()),
            distance: None,
        },
        StoreInfo {
            id: "2".to_string(),
            name: "Target".to_string(),
            address: Some("456 Oak Ave".to_string()),
            distance: None,
        },
        StoreInfo {
            id: "3".to_string(),
            name: "Kroger".to_string(),
            address: Some("789 Pine St".to_string()),
            distance: None,
        },
        StoreInfo {
            id: "4".to_string(),
            name: "Whole Foods".to_string(),
            address: Some("321 Elm St".to_string()),
            distance: None,
        },
        StoreInfo {
            id: NOT_LISTED_STORE_ID.to_string(),
            name: "Not listed".to_string(),
            address: None,
            distance: None,
        },
    ]
});

/// Resolve a store id against the static catalog. Unknown ids resolve to
/// nothing rather than an error.
pub fn resolve_store(id: &str) -> Option<StoreInfo> {
    AVAILABLE_STORES.iter().find(|s| s.id == id).cloned()
}

/// Whether items added to a list at this store require a manual price
pub fn store_requires_manual_price(store_id: &str) -> bool {
    store_id == NOT_LISTED_STORE_ID
}
