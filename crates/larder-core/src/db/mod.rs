// ============================================================================
// LarderDb - Embedded Database (redb)
// ============================================================================
// Persistent local storage for the two grocery documents: the shopping list
// array and the pantry item array, each stored as one JSON blob under a
// fixed key. Writes replace the whole document; there are no partial updates.
// Default path: ~/.larder/larder.redb (override via LARDER_DB_PATH env var)
// ============================================================================

pub mod memory;
pub mod raw;
pub mod seed;

pub use memory::InMemoryStore;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use redb::{Database, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::types::{PantryItem, ShoppingList};

// One table of JSON documents, keyed by document name
const DOCUMENTS: TableDefinition<&str, &str> = TableDefinition::new("documents");

/// Document key for the shopping list array
pub const SHOPPING_LISTS_KEY: &str = "shopping_lists";
/// Document key for the pantry item array
pub const PANTRY_ITEMS_KEY: &str = "pantry_items";

/// Storage seam for the shopping list document. `save` replaces the whole
/// array.
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<ShoppingList>>;
    async fn save(&self, lists: &[ShoppingList]) -> Result<()>;
}

/// Storage seam for the pantry document. `save` replaces the whole array.
#[async_trait]
pub trait PantryRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<PantryItem>>;
    async fn save(&self, items: &[PantryItem]) -> Result<()>;
}

/// Embedded database holding the grocery documents
pub struct LarderDb {
    db: Database,
    path: PathBuf,
}

impl LarderDb {
    /// Open (or create) the database at the given path.
    /// If `path` is None, uses LARDER_DB_PATH env var or ~/.larder/larder.redb
    pub fn open(path: Option<&str>) -> Result<Self> {
        let db_path = if let Some(p) = path {
            PathBuf::from(p)
        } else if let Ok(env_path) = std::env::var("LARDER_DB_PATH") {
            PathBuf::from(env_path)
        } else {
            let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
            let larder_dir = home.join(".larder");
            std::fs::create_dir_all(&larder_dir)
                .map_err(|e| anyhow!("Failed to create .larder directory: {}", e))?;
            larder_dir.join("larder.redb")
        };

        info!("Opening database at: {}", db_path.display());

        let db = Database::create(&db_path)
            .map_err(|e| anyhow!("Failed to open database: {}", e))?;

        // Ensure the documents table exists by doing a write transaction
        let write_txn = db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(DOCUMENTS)
                .map_err(|e| anyhow!("Failed to create documents table: {}", e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit init: {}", e))?;

        info!("Database ready");

        Ok(Self { db, path: db_path })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========================================================================
    // Document Primitives
    // ========================================================================

    /// Read one JSON document. Returns None when the key has never been
    /// written.
    pub fn read_document(&self, key: &str) -> Result<Option<String>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn.open_table(DOCUMENTS)
            .map_err(|e| anyhow!("Failed to open documents table: {}", e))?;

        match table.get(key).map_err(|e| anyhow!("Failed to get document '{}': {}", key, e))? {
            Some(value) => Ok(Some(value.value().to_string())),
            None => Ok(None),
        }
    }

    /// Write one JSON document, replacing any previous value under the key
    pub fn write_document(&self, key: &str, json: &str) -> Result<()> {
        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn.open_table(DOCUMENTS)
                .map_err(|e| anyhow!("Failed to open documents table: {}", e))?;
            table.insert(key, json)
                .map_err(|e| anyhow!("Failed to insert document '{}': {}", key, e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit: {}", e))?;

        debug!("Wrote document: {} ({} bytes)", key, json.len());
        Ok(())
    }

    // ========================================================================
    // Shopping List Document
    // ========================================================================

    /// Load every stored shopping list through the normalizer.
    /// A missing document is seeded with the starter lists on first read.
    pub fn load_shopping_lists(&self) -> Result<Vec<ShoppingList>> {
        match self.read_document(SHOPPING_LISTS_KEY)? {
            Some(json) => raw::decode_shopping_lists(&json),
            None => {
                info!("No shopping list document found, seeding starter lists");
                let starter = seed::starter_lists();
                self.save_shopping_lists(&starter)?;
                Ok(starter)
            }
        }
    }

    pub fn save_shopping_lists(&self, lists: &[ShoppingList]) -> Result<()> {
        let json = serde_json::to_string(lists)
            .map_err(|e| anyhow!("Failed to serialize shopping lists: {}", e))?;
        self.write_document(SHOPPING_LISTS_KEY, &json)
    }

    // ========================================================================
    // Pantry Document
    // ========================================================================

    /// Load every stored pantry item through the normalizer.
    /// A missing document is simply empty; the pantry is never seeded.
    pub fn load_pantry_items(&self) -> Result<Vec<PantryItem>> {
        match self.read_document(PANTRY_ITEMS_KEY)? {
            Some(json) => raw::decode_pantry_items(&json),
            None => Ok(Vec::new()),
        }
    }

    pub fn save_pantry_items(&self, items: &[PantryItem]) -> Result<()> {
        let json = serde_json::to_string(items)
            .map_err(|e| anyhow!("Failed to serialize pantry items: {}", e))?;
        self.write_document(PANTRY_ITEMS_KEY, &json)
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    pub fn stats(&self) -> Result<DbStats> {
        let lists = self.load_shopping_lists()?;
        let pantry = self.load_pantry_items()?;

        Ok(DbStats {
            list_count: lists.len(),
            list_item_count: lists.iter().map(|l| l.items.len()).sum(),
            pantry_item_count: pantry.len(),
        })
    }
}

#[async_trait]
impl ShoppingListRepository for LarderDb {
    async fn load(&self) -> Result<Vec<ShoppingList>> {
        self.load_shopping_lists()
    }

    async fn save(&self, lists: &[ShoppingList]) -> Result<()> {
        self.save_shopping_lists(lists)
    }
}

#[async_trait]
impl PantryRepository for LarderDb {
    async fn load(&self) -> Result<Vec<PantryItem>> {
        self.load_pantry_items()
    }

    async fn save(&self, items: &[PantryItem]) -> Result<()> {
        self.save_pantry_items(items)
    }
}

/// Document statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct DbStats {
    pub list_count: usize,
    pub list_item_count: usize,
    pub pantry_item_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn temp_db() -> (LarderDb, PathBuf) {
        let path = std::env::temp_dir().join(format!("larder-test-{}.redb", Uuid::new_v4()));
        let db = LarderDb::open(path.to_str()).expect("open temp db");
        (db, path)
    }

    #[test]
    fn test_first_read_seeds_starter_lists() {
        let (db, path) = temp_db();

        let lists = db.load_shopping_lists().expect("load");
        assert!(!lists.is_empty());

        // The seed is persisted, not just returned
        let stored = db.read_document(SHOPPING_LISTS_KEY).expect("read").expect("seeded");
        assert!(stored.starts_with('['));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_emptied_document_is_not_reseeded() {
        let (db, path) = temp_db();

        let _ = db.load_shopping_lists().expect("seed");
        db.save_shopping_lists(&[]).expect("clear");

        let lists = db.load_shopping_lists().expect("reload");
        assert!(lists.is_empty());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_pantry_round_trip() {
        let (db, path) = temp_db();

        assert!(db.load_pantry_items().expect("empty load").is_empty());

        let now = Utc::now();
        let item = PantryItem {
            id: "p1".to_string(),
            name: "Eggs".to_string(),
            quantity: 12,
            emoji: "🥚".to_string(),
            storage_location: crate::types::StorageLocation::Fridge,
            expiration_date: Some(now),
            notes: None,
            created_at: now,
            updated_at: now,
        };
        db.save_pantry_items(std::slice::from_ref(&item)).expect("save");

        let loaded = db.load_pantry_items().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Eggs");
        assert_eq!(loaded[0].storage_location, crate::types::StorageLocation::Fridge);
        assert!(loaded[0].expiration_date.is_some());

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_shopping_list_round_trip_re_resolves_stores() {
        let (db, path) = temp_db();

        let store = crate::catalog::resolve_store("2").expect("catalog store");
        let mut list = ShoppingList::new("Trip", 40.0, store);
        // persisted data may carry only the id; the read path re-resolves it
        list.store = None;
        db.save_shopping_lists(std::slice::from_ref(&list)).expect("save");

        let loaded = db.load_shopping_lists().expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, list.id);
        assert_eq!(loaded[0].created_at, list.created_at);
        assert_eq!(
            loaded[0].store.as_ref().map(|s| s.name.as_str()),
            Some("Target")
        );

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_write_document_replaces_previous_value() {
        let (db, path) = temp_db();

        db.write_document(PANTRY_ITEMS_KEY, "[]").expect("write");
        db.write_document(PANTRY_ITEMS_KEY, r#"[{"id":"x","name":"Salt"}]"#).expect("rewrite");

        let stored = db.read_document(PANTRY_ITEMS_KEY).expect("read").expect("value");
        assert!(stored.contains("Salt"));

        let _ = std::fs::remove_file(path);
    }
}
