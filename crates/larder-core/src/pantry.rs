//! ============================================================================
//! Pantry Manager - inventory mutations and search
//! ============================================================================
//! Same full-document-replace contract as the shopping list manager: load the
//! whole pantry array, edit in memory, write it back. Expiration dates are
//! entered as MM/DD/YYYY strings; anything unparseable means no expiration.
//! ============================================================================

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::PantryRepository;
use crate::types::{LarderError, PantryItem, StorageLocation};

/// Fields for a new pantry item
#[derive(Debug, Clone)]
pub struct NewPantryItem {
    pub name: String,
    pub quantity: u32,
    pub emoji: String,
    pub storage_location: StorageLocation,
    /// Manually entered MM/DD/YYYY date; unparseable input means none
    pub expiration_date: Option<String>,
    pub notes: Option<String>,
}

/// Patch applied to an existing pantry item. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct PantryItemUpdate {
    pub name: Option<String>,
    pub quantity: Option<u32>,
    pub emoji: Option<String>,
    pub storage_location: Option<StorageLocation>,
    /// Some(None) clears the date, Some(Some(raw)) re-parses it
    pub expiration_date: Option<Option<String>>,
    pub notes: Option<Option<String>>,
}

/// Manager for the pantry document
pub struct PantryManager {
    repo: Arc<dyn PantryRepository>,
}

impl PantryManager {
    pub fn new(repo: Arc<dyn PantryRepository>) -> Self {
        Self { repo }
    }

    /// Every stored pantry item. A failed read logs and yields no data.
    pub async fn items(&self) -> Vec<PantryItem> {
        match self.repo.load().await {
            Ok(items) => items,
            Err(e) => {
                error!("Failed to load pantry items: {}", e);
                Vec::new()
            }
        }
    }

    /// Add a new pantry item. New items go to the front of the document.
    pub async fn add_item(&self, new_item: NewPantryItem) -> PantryItem {
        let now = Utc::now();
        let item = PantryItem {
            id: Uuid::new_v4().to_string(),
            name: new_item.name,
            quantity: new_item.quantity.max(1),
            emoji: new_item.emoji,
            storage_location: new_item.storage_location,
            expiration_date: new_item
                .expiration_date
                .as_deref()
                .and_then(parse_entry_date),
            notes: new_item.notes,
            created_at: now,
            updated_at: now,
        };

        let mut items = self.items().await;
        items.insert(0, item.clone());
        self.persist(&items).await;

        info!("Added pantry item '{}' ({})", item.name, item.id);
        item
    }

    /// Apply a patch to an item and refresh its `updated_at`
    pub async fn update_item(
        &self,
        item_id: &str,
        update: PantryItemUpdate,
    ) -> Result<PantryItem, LarderError> {
        let mut items = self.items().await;
        let item = items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| LarderError::ItemNotFound(item_id.to_string()))?;

        if let Some(name) = update.name {
            item.name = name;
        }
        if let Some(quantity) = update.quantity {
            item.quantity = quantity.max(1);
        }
        if let Some(emoji) = update.emoji {
            item.emoji = emoji;
        }
        if let Some(location) = update.storage_location {
            item.storage_location = location;
        }
        if let Some(raw) = update.expiration_date {
            item.expiration_date = raw.as_deref().and_then(parse_entry_date);
        }
        if let Some(notes) = update.notes {
            item.notes = notes;
        }
        item.updated_at = Utc::now();
        let updated = item.clone();

        self.persist(&items).await;
        Ok(updated)
    }

    /// Delete an item by id. Returns whether anything was removed.
    pub async fn delete_item(&self, item_id: &str) -> bool {
        let mut items = self.items().await;
        let before = items.len();
        items.retain(|i| i.id != item_id);
        let removed = items.len() != before;

        if removed {
            self.persist(&items).await;
            info!("Deleted pantry item {}", item_id);
        }
        removed
    }

    /// Case-insensitive name filter, most recently updated first
    pub async fn search(&self, query: &str) -> Vec<PantryItem> {
        let needle = query.to_lowercase();
        let mut items: Vec<PantryItem> = self
            .items()
            .await
            .into_iter()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect();
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        items
    }

    /// Write the whole document back; failures are logged and swallowed
    async fn persist(&self, items: &[PantryItem]) {
        if let Err(e) = self.repo.save(items).await {
            error!("Failed to save pantry items: {}", e);
        }
    }
}

/// Parse a manually entered MM/DD/YYYY date to midnight UTC. Anything
/// unparseable is treated as no expiration.
fn parse_entry_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw.trim(), "%m/%d/%Y")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| Utc.from_utc_datetime(&dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryStore;
    use chrono::Datelike;

    fn manager() -> (PantryManager, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (PantryManager::new(store.clone()), store)
    }

    fn new_item(name: &str, expiration: Option<&str>) -> NewPantryItem {
        NewPantryItem {
            name: name.to_string(),
            quantity: 1,
            emoji: "🥫".to_string(),
            storage_location: StorageLocation::Pantry,
            expiration_date: expiration.map(String::from),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_add_parses_entry_date() {
        let (manager, _) = manager();

        let item = manager.add_item(new_item("Milk", Some("01/15/2025"))).await;
        let expiration = item.expiration_date.expect("parsed date");
        assert_eq!(
            (expiration.year(), expiration.month(), expiration.day()),
            (2025, 1, 15)
        );
    }

    #[tokio::test]
    async fn test_bad_entry_date_means_no_expiration() {
        let (manager, _) = manager();

        let item = manager.add_item(new_item("Flour", Some("sometime soon"))).await;
        assert!(item.expiration_date.is_none());

        let also_bad = manager.add_item(new_item("Sugar", Some("2025-01-15"))).await;
        assert!(also_bad.expiration_date.is_none());
    }

    #[tokio::test]
    async fn test_new_items_are_prepended() {
        let (manager, _) = manager();

        manager.add_item(new_item("First", None)).await;
        manager.add_item(new_item("Second", None)).await;

        let items = manager.items().await;
        assert_eq!(items[0].name, "Second");
        assert_eq!(items[1].name, "First");
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at() {
        let (manager, _) = manager();
        let item = manager.add_item(new_item("Beans", None)).await;
        let created = item.updated_at;

        let updated = manager
            .update_item(
                &item.id,
                PantryItemUpdate {
                    quantity: Some(3),
                    expiration_date: Some(Some("03/01/2025".to_string())),
                    ..PantryItemUpdate::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.quantity, 3);
        assert!(updated.expiration_date.is_some());
        assert!(updated.updated_at >= created);
        assert_eq!(updated.created_at, item.created_at);
    }

    #[tokio::test]
    async fn test_update_can_clear_expiration() {
        let (manager, _) = manager();
        let item = manager.add_item(new_item("Yogurt", Some("02/01/2025"))).await;

        let updated = manager
            .update_item(
                &item.id,
                PantryItemUpdate {
                    expiration_date: Some(None),
                    ..PantryItemUpdate::default()
                },
            )
            .await
            .expect("update");

        assert!(updated.expiration_date.is_none());
    }

    #[tokio::test]
    async fn test_update_unknown_item_is_a_domain_error() {
        let (manager, _) = manager();

        let err = manager
            .update_item("ghost", PantryItemUpdate::default())
            .await
            .expect_err("missing item");
        assert!(matches!(err, LarderError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_item() {
        let (manager, _) = manager();
        let item = manager.add_item(new_item("Beans", None)).await;

        assert!(manager.delete_item(&item.id).await);
        assert!(manager.items().await.is_empty());
        assert!(!manager.delete_item(&item.id).await);
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_sorted() {
        let (manager, _) = manager();
        manager.add_item(new_item("Oat milk", None)).await;
        manager.add_item(new_item("Whole Milk", None)).await;
        manager.add_item(new_item("Butter", None)).await;

        let hits = manager.search("milk").await;
        assert_eq!(hits.len(), 2);
        // most recently updated first
        assert_eq!(hits[0].name, "Whole Milk");
        assert_eq!(hits[1].name, "Oat milk");
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_empty() {
        let (manager, store) = manager();
        store.fail_reads(true);

        assert!(manager.items().await.is_empty());
    }
}
