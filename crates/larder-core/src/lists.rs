//! ============================================================================
//! Shopping List Manager - list and item mutations
//! ============================================================================
//! High-level API over the shopping list document. Every mutation loads the
//! whole document, edits it in memory, and writes the whole array back; there
//! are no partial updates. Failed reads degrade to no data and failed writes
//! are logged and swallowed, so callers never see a storage error.
//! ============================================================================

use rand::Rng;
use std::sync::Arc;
use tracing::{error, info};

use crate::catalog::{store_requires_manual_price, Category, StoreInfo};
use crate::db::ShoppingListRepository;
use crate::types::{LarderError, ShoppingList, ShoppingListItem, UnitOfMeasure};
use uuid::Uuid;

/// Fields for a new list item. A missing price gets a mock price, unless the
/// list's store requires manual entry.
#[derive(Debug, Clone)]
pub struct NewListItem {
    pub name: String,
    pub quantity: u32,
    pub unit: UnitOfMeasure,
    pub price: Option<f64>,
    pub category: Category,
}

/// Manager for the shopping list document
pub struct ShoppingListManager {
    repo: Arc<dyn ShoppingListRepository>,
}

impl ShoppingListManager {
    pub fn new(repo: Arc<dyn ShoppingListRepository>) -> Self {
        Self { repo }
    }

    /// Every stored list. A failed read logs and yields no data.
    pub async fn lists(&self) -> Vec<ShoppingList> {
        match self.repo.load().await {
            Ok(lists) => lists,
            Err(e) => {
                error!("Failed to load shopping lists: {}", e);
                Vec::new()
            }
        }
    }

    /// Create a new empty list scoped to a store
    pub async fn create_list(&self, name: &str, budget: f64, store: StoreInfo) -> ShoppingList {
        let list = ShoppingList::new(name, budget, store);

        let mut lists = self.lists().await;
        lists.push(list.clone());
        self.persist(&lists).await;

        info!("Created shopping list '{}' ({})", list.name, list.id);
        list
    }

    /// Delete a list by id. Returns whether anything was removed.
    pub async fn delete_list(&self, list_id: &str) -> bool {
        let mut lists = self.lists().await;
        let before = lists.len();
        lists.retain(|l| l.id != list_id);
        let removed = lists.len() != before;

        if removed {
            self.persist(&lists).await;
            info!("Deleted shopping list {}", list_id);
        }
        removed
    }

    /// Add an item to a list. Items at the "Not listed" store must carry a
    /// manual price; elsewhere a missing price gets a mock price.
    pub async fn add_item(
        &self,
        list_id: &str,
        new_item: NewListItem,
    ) -> Result<ShoppingListItem, LarderError> {
        let mut lists = self.lists().await;
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| LarderError::ListNotFound(list_id.to_string()))?;

        let price = match new_item.price {
            Some(price) => price,
            None => {
                let manual_only = list
                    .store_id
                    .as_deref()
                    .is_some_and(store_requires_manual_price);
                if manual_only {
                    return Err(LarderError::PriceRequired);
                }
                mock_price()
            }
        };

        let item = ShoppingListItem {
            id: Uuid::new_v4().to_string(),
            name: new_item.name,
            quantity: new_item.quantity.max(1),
            unit: new_item.unit,
            price,
            original_price: None,
            is_checked: false,
            category: new_item.category,
            store_id: list.store_id.clone(),
            store: list.store.clone(),
        };
        list.items.push(item.clone());

        self.persist(&lists).await;
        Ok(item)
    }

    /// Flip an item's checked state
    pub async fn toggle_item(&self, list_id: &str, item_id: &str) -> Result<bool, LarderError> {
        let mut lists = self.lists().await;
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| LarderError::ListNotFound(list_id.to_string()))?;
        let item = list
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| LarderError::ItemNotFound(item_id.to_string()))?;

        item.is_checked = !item.is_checked;
        let checked = item.is_checked;

        self.persist(&lists).await;
        Ok(checked)
    }

    /// Remove an item from a list
    pub async fn remove_item(&self, list_id: &str, item_id: &str) -> Result<(), LarderError> {
        let mut lists = self.lists().await;
        let list = lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or_else(|| LarderError::ListNotFound(list_id.to_string()))?;

        let before = list.items.len();
        list.items.retain(|i| i.id != item_id);
        if list.items.len() == before {
            return Err(LarderError::ItemNotFound(item_id.to_string()));
        }

        self.persist(&lists).await;
        Ok(())
    }

    /// Case-insensitive name filter over the stored lists
    pub async fn search(&self, query: &str) -> Vec<ShoppingList> {
        let needle = query.to_lowercase();
        self.lists()
            .await
            .into_iter()
            .filter(|l| l.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Write the whole document back; failures are logged and swallowed
    async fn persist(&self, lists: &[ShoppingList]) {
        if let Err(e) = self.repo.save(lists).await {
            error!("Failed to save shopping lists: {}", e);
        }
    }
}

/// Mock price for items added without one, in dollars and whole cents
fn mock_price() -> f64 {
    let base: f64 = rand::thread_rng().gen_range(0.99..8.99);
    (base * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resolve_store;
    use crate::db::InMemoryStore;

    fn manager() -> (ShoppingListManager, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (ShoppingListManager::new(store.clone()), store)
    }

    fn new_item(name: &str, price: Option<f64>) -> NewListItem {
        NewListItem {
            name: name.to_string(),
            quantity: 1,
            unit: UnitOfMeasure::Pieces,
            price,
            category: Category::Produce,
        }
    }

    #[tokio::test]
    async fn test_create_and_delete_list() {
        let (manager, _) = manager();
        let store = resolve_store("1").expect("catalog store");

        let list = manager.create_list("Weekly run", 120.0, store).await;
        assert_eq!(manager.lists().await.len(), 1);

        assert!(manager.delete_list(&list.id).await);
        assert!(manager.lists().await.is_empty());
        assert!(!manager.delete_list(&list.id).await);
    }

    #[tokio::test]
    async fn test_add_item_inherits_list_store() {
        let (manager, _) = manager();
        let store = resolve_store("3").expect("catalog store");
        let list = manager.create_list("Kroger trip", 60.0, store).await;

        let item = manager
            .add_item(&list.id, new_item("Apples", Some(4.99)))
            .await
            .expect("add item");

        assert_eq!(item.store_id.as_deref(), Some("3"));
        assert_eq!(item.store.as_ref().map(|s| s.name.as_str()), Some("Kroger"));

        let lists = manager.lists().await;
        assert_eq!(lists[0].items.len(), 1);
        assert_eq!(lists[0].items_total(), 4.99);
    }

    #[tokio::test]
    async fn test_missing_price_gets_mock_price() {
        let (manager, _) = manager();
        let store = resolve_store("1").expect("catalog store");
        let list = manager.create_list("Walmart trip", 60.0, store).await;

        let item = manager
            .add_item(&list.id, new_item("Surprise", None))
            .await
            .expect("add item");

        assert!(item.price >= 0.99 && item.price < 8.99);
        // whole cents
        assert!((item.price * 100.0 - (item.price * 100.0).round()).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_not_listed_store_requires_price() {
        let (manager, _) = manager();
        let store = resolve_store("5").expect("catalog store");
        let list = manager.create_list("Corner shop", 30.0, store).await;

        let err = manager
            .add_item(&list.id, new_item("Bread", None))
            .await
            .expect_err("price required");
        assert!(matches!(err, LarderError::PriceRequired));

        // an explicit price is accepted
        assert!(manager
            .add_item(&list.id, new_item("Bread", Some(3.50)))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_toggle_and_remove_item() {
        let (manager, _) = manager();
        let store = resolve_store("1").expect("catalog store");
        let list = manager.create_list("Trip", 0.0, store).await;
        let item = manager
            .add_item(&list.id, new_item("Milk", Some(3.99)))
            .await
            .expect("add item");

        assert!(manager.toggle_item(&list.id, &item.id).await.expect("toggle"));
        assert!(!manager.toggle_item(&list.id, &item.id).await.expect("toggle back"));

        manager.remove_item(&list.id, &item.id).await.expect("remove");
        assert!(manager.lists().await[0].items.is_empty());

        let err = manager
            .remove_item(&list.id, &item.id)
            .await
            .expect_err("already removed");
        assert!(matches!(err, LarderError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_unknown_list_is_a_domain_error() {
        let (manager, _) = manager();
        let err = manager
            .add_item("nope", new_item("Milk", Some(1.0)))
            .await
            .expect_err("missing list");
        assert!(matches!(err, LarderError::ListNotFound(_)));
    }

    #[tokio::test]
    async fn test_search_filters_by_name() {
        let (manager, _) = manager();
        let store = resolve_store("1").expect("catalog store");
        manager.create_list("Weekly Groceries", 0.0, store.clone()).await;
        manager.create_list("Party Supplies", 0.0, store).await;

        let hits = manager.search("week").await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Weekly Groceries");
    }

    #[tokio::test]
    async fn test_read_failure_degrades_to_empty() {
        let (manager, store) = manager();
        store.fail_reads(true);

        assert!(manager.lists().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_is_swallowed() {
        let (manager, store) = manager();
        let catalog_store = resolve_store("1").expect("catalog store");
        store.fail_writes(true);

        // the mutation still reports the created list; the write is dropped
        let list = manager.create_list("Doomed", 10.0, catalog_store).await;
        assert_eq!(list.name, "Doomed");

        store.fail_writes(false);
        assert!(manager.lists().await.is_empty());
    }
}
