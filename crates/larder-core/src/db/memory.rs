//! In-memory repository backend. Backs the engines and managers in tests
//! without touching a database file; reads and writes can be made to fail to
//! exercise the degrade paths.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

use super::{PantryRepository, ShoppingListRepository};
use crate::types::{PantryItem, ShoppingList};

#[derive(Default)]
pub struct InMemoryStore {
    lists: Mutex<Vec<ShoppingList>>,
    pantry: Mutex<Vec<PantryItem>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lists(lists: Vec<ShoppingList>) -> Self {
        Self {
            lists: Mutex::new(lists),
            ..Self::default()
        }
    }

    pub fn with_pantry(items: Vec<PantryItem>) -> Self {
        Self {
            pantry: Mutex::new(items),
            ..Self::default()
        }
    }

    /// Make every subsequent load return an error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent save return an error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            Err(anyhow!("simulated read failure"))
        } else {
            Ok(())
        }
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(anyhow!("simulated write failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ShoppingListRepository for InMemoryStore {
    async fn load(&self) -> Result<Vec<ShoppingList>> {
        self.check_read()?;
        Ok(self.lists.lock().await.clone())
    }

    async fn save(&self, lists: &[ShoppingList]) -> Result<()> {
        self.check_write()?;
        *self.lists.lock().await = lists.to_vec();
        Ok(())
    }
}

#[async_trait]
impl PantryRepository for InMemoryStore {
    async fn load(&self) -> Result<Vec<PantryItem>> {
        self.check_read()?;
        Ok(self.pantry.lock().await.clone())
    }

    async fn save(&self, items: &[PantryItem]) -> Result<()> {
        self.check_write()?;
        *self.pantry.lock().await = items.to_vec();
        Ok(())
    }
}
