//! Starter data written to the shopping list document on first run.

use chrono::Utc;
use uuid::Uuid;

use crate::catalog::{resolve_store, Category};
use crate::types::{ShoppingList, ShoppingListItem, UnitOfMeasure};

fn starter_item(
    name: &str,
    quantity: u32,
    unit: UnitOfMeasure,
    price: f64,
    category: Category,
    store_id: &str,
) -> ShoppingListItem {
    ShoppingListItem {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        quantity,
        unit,
        price,
        original_price: None,
        is_checked: false,
        category,
        store_id: Some(store_id.to_string()),
        store: resolve_store(store_id),
    }
}

/// The example lists a fresh install starts with
pub fn starter_lists() -> Vec<ShoppingList> {
    let mut lists = Vec::new();

    if let Some(walmart) = resolve_store("1") {
        let store_id = walmart.id.clone();
        let items = vec![
            starter_item("Bananas", 1, UnitOfMeasure::Lb, 1.49, Category::Produce, &store_id),
            starter_item("Milk", 1, UnitOfMeasure::Pieces, 3.99, Category::Dairy, &store_id),
            starter_item("Sourdough bread", 1, UnitOfMeasure::Pieces, 4.29, Category::Bakery, &store_id),
            starter_item("Chicken breast", 2, UnitOfMeasure::Lb, 9.98, Category::Meat, &store_id),
        ];
        let total_spent = items.iter().map(|i| i.price).sum();

        lists.push(ShoppingList {
            id: Uuid::new_v4().to_string(),
            name: "Weekly Groceries".to_string(),
            created_at: Some(Utc::now()),
            budget: 150.0,
            total_spent,
            store_id: Some(store_id),
            store: Some(walmart),
            items,
        });
    }

    if let Some(target) = resolve_store("2") {
        let store_id = target.id.clone();
        let items = vec![
            starter_item("Tortilla chips", 2, UnitOfMeasure::Pack, 7.58, Category::Snacks, &store_id),
            starter_item("Sparkling water", 1, UnitOfMeasure::Pack, 5.49, Category::Beverages, &store_id),
            starter_item("Paper plates", 1, UnitOfMeasure::Pack, 6.99, Category::Party, &store_id),
        ];
        let total_spent = items.iter().map(|i| i.price).sum();

        lists.push(ShoppingList {
            id: Uuid::new_v4().to_string(),
            name: "Party Supplies".to_string(),
            created_at: Some(Utc::now()),
            budget: 75.0,
            total_spent,
            store_id: Some(store_id),
            store: Some(target),
            items,
        });
    }

    lists
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_lists_are_store_scoped_and_priced() {
        let lists = starter_lists();
        assert_eq!(lists.len(), 2);

        for list in &lists {
            assert!(list.store.is_some());
            assert!(list.budget > 0.0);
            assert!(!list.items.is_empty());
            assert!((list.total_spent - list.items_total()).abs() < 1e-9);
            for item in &list.items {
                assert!(item.price > 0.0);
                assert!(!item.is_checked);
            }
        }
    }
}
