//! ============================================================================
//! LARDER-CORE: Grocery Management Engine
//! ============================================================================
//! This crate holds all domain logic for Larder:
//! - Shopping list and pantry records persisted as JSON documents in redb
//! - Spend analytics (period totals, category breakdowns, top categories)
//! - Pantry expiration classification (pantry status + home-feed banding)
//! - Managers implementing the full-document-replace write contract
//! ============================================================================

pub mod analytics;
pub mod catalog;
pub mod db;
pub mod expiry;
pub mod lists;
pub mod pantry;
pub mod types;

// Re-export main types for convenience
pub use analytics::{
    category_breakdown, list_matches, stored_lists_total, top_categories, total_spend,
    CategorySpend, ListFilter, SpendFilter, SpendPeriod,
};
pub use catalog::{
    category_color_class, resolve_store, sanitize_category, store_requires_manual_price,
    Category, StoreInfo, AVAILABLE_STORES, DEFAULT_CATEGORY, NOT_LISTED_STORE_ID,
};
pub use db::{
    DbStats, InMemoryStore, LarderDb, PantryRepository, ShoppingListRepository,
    PANTRY_ITEMS_KEY, SHOPPING_LISTS_KEY,
};
pub use expiry::{
    expiration_status, expiring_feed, ExpirationStatus, ExpiringItem, ExpiryBand, FeedPolicy,
};
pub use lists::{NewListItem, ShoppingListManager};
pub use pantry::{NewPantryItem, PantryItemUpdate, PantryManager};
pub use types::*;
