//! Item inventory store

use indexmap::IndexMap;

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item, ItemQuery, StockSummary, UpdateItem},
};

/// Catalog items keyed by id, in catalog order
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: IndexMap<String, Item>,
}

impl ItemStore {
    /// Build a store from persisted items, clamping availability into range
    pub fn from_items(items: Vec<Item>) -> Self {
        let items = items
            .into_iter()
            .map(|mut item| {
                if item.available_quantity > item.total_quantity {
                    tracing::warn!(
                        item_id = %item.id,
                        available = item.available_quantity,
                        total = item.total_quantity,
                        "Clamping restored availability to total quantity"
                    );
                    item.available_quantity = item.total_quantity;
                }
                (item.id.clone(), item)
            })
            .collect();
        Self { items }
    }

    pub fn to_vec(&self) -> Vec<Item> {
        self.items.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn get(&self, id: &str) -> AppResult<&Item> {
        self.items
            .get(id)
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    pub fn list(&self, query: &ItemQuery) -> Vec<&Item> {
        self.items.values().filter(|item| query.matches(item)).collect()
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for item in self.items.values() {
            if !categories.contains(&item.category) {
                categories.push(item.category.clone());
            }
        }
        categories
    }

    pub fn summary(&self) -> StockSummary {
        StockSummary {
            item_count: self.items.len(),
            total_units: self.items.values().map(|i| u64::from(i.total_quantity)).sum(),
            available_units: self.items.values().map(|i| u64::from(i.available_quantity)).sum(),
        }
    }

    /// Add a new item under `id`
    pub fn create(&mut self, id: String, data: CreateItem) -> AppResult<&Item> {
        if self.items.contains_key(&id) {
            return Err(AppError::Conflict(format!("Item {} already exists", id)));
        }

        let available = data.available_quantity.unwrap_or(data.total_quantity);
        check_quantities(available, data.total_quantity)?;

        let item = Item {
            id: id.clone(),
            name: data.name.trim().to_string(),
            category: data.category.trim().to_string(),
            rental_price: data.rental_price.unwrap_or_default(),
            total_quantity: data.total_quantity,
            available_quantity: available,
            image_url: data.image_url,
        };
        self.items.insert(id.clone(), item);
        self.get(&id)
    }

    pub fn update(&mut self, id: &str, data: UpdateItem) -> AppResult<&Item> {
        let current = self.get(id)?;
        let total = data.total_quantity.unwrap_or(current.total_quantity);
        let available = data.available_quantity.unwrap_or(current.available_quantity);
        check_quantities(available, total)?;

        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))?;

        if let Some(name) = data.name {
            item.name = name.trim().to_string();
        }
        if let Some(category) = data.category {
            item.category = category.trim().to_string();
        }
        if let Some(price) = data.rental_price {
            item.rental_price = price;
        }
        if data.image_url.is_some() {
            item.image_url = data.image_url;
        }
        item.total_quantity = total;
        item.available_quantity = available;

        Ok(item)
    }

    /// Remove an item. Loans referring to it keep their denormalized name.
    pub fn delete(&mut self, id: &str) -> AppResult<Item> {
        self.items
            .shift_remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))
    }

    /// Shift availability by `delta`, clamped into `[0, total_quantity]`
    pub fn adjust_availability(&mut self, id: &str, delta: i64) -> AppResult<&Item> {
        let item = self
            .items
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Item {} not found", id)))?;

        let next = (i64::from(item.available_quantity) + delta).clamp(0, i64::from(item.total_quantity));
        item.available_quantity = u32::try_from(next).unwrap_or(item.total_quantity);

        Ok(item)
    }
}

fn check_quantities(available: u32, total: u32) -> AppResult<()> {
    if available > total {
        return Err(AppError::Validation(format!(
            "Available quantity ({}) cannot exceed total quantity ({})",
            available, total
        )));
    }
    Ok(())
}
