//! Catalog item model and related types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ItemStatus;

/// Borrowable asset with a finite unit count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    pub rental_price: Decimal,
    pub total_quantity: u32,
    pub available_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Item {
    pub fn status(&self) -> ItemStatus {
        ItemStatus::from_available(self.available_quantity)
    }

    pub fn is_ready(&self) -> bool {
        self.status() == ItemStatus::Ready
    }
}

/// Item as returned by the API, with its derived status
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemDetails {
    #[serde(flatten)]
    pub item: Item,
    pub status: ItemStatus,
}

impl From<Item> for ItemDetails {
    fn from(item: Item) -> Self {
        let status = item.status();
        Self { item, status }
    }
}

/// Create item request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    /// Explicit identifier; generated when absent
    pub id: Option<String>,
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub rental_price: Option<Decimal>,
    pub total_quantity: u32,
    /// Defaults to the total quantity
    pub available_quantity: Option<u32>,
    pub image_url: Option<String>,
}

/// Update item request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: Option<String>,
    pub rental_price: Option<Decimal>,
    pub total_quantity: Option<u32>,
    pub available_quantity: Option<u32>,
    pub image_url: Option<String>,
}

/// Catalog query parameters
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
pub struct ItemQuery {
    /// Case-insensitive match on name or category
    pub search: Option<String>,
    /// Exact category
    pub category: Option<String>,
}

impl ItemQuery {
    pub fn matches(&self, item: &Item) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                item.name.to_lowercase().contains(&term)
                    || item.category.to_lowercase().contains(&term)
            }
            _ => true,
        };
        let matches_category = match self.category.as_deref() {
            Some(category) if !category.is_empty() => item.category == category,
            _ => true,
        };
        matches_search && matches_category
    }
}

/// Stock totals across the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub item_count: usize,
    pub total_units: u64,
    pub available_units: u64,
}

/// Catalog shipped with the binary, used when no snapshot can be restored
pub fn seed_items() -> Vec<Item> {
    let item = |id: &str, name: &str, category: &str, price: i64, total: u32, available: u32, image: &str| Item {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        rental_price: Decimal::from(price),
        total_quantity: total,
        available_quantity: available,
        image_url: Some(format!(
            "https://images.unsplash.com/{}?auto=format&fit=crop&q=80&w=800",
            image
        )),
    };

    vec![
        item("1", "Laptop Dell Latitude", "Elektronik", 0, 10, 10, "photo-1496181133206-80ce9b88a853"),
        item("2", "Proyektor Epson EB-X400", "Elektronik", 0, 5, 5, "photo-1517604931442-7e0c8ed2963c"),
        item("3", "Mobil Toyota Avanza", "Kendaraan", 50000, 2, 2, "photo-1549317661-bd32c8ce0db2"),
        item("4", "Ruang Meeting A", "Fasilitas", 0, 1, 0, "photo-1431540015161-0bf868a2d407"),
        item("5", "Kamera Sony Alpha 7", "Elektronik", 75000, 3, 3, "photo-1516035069371-29a1b244cc32"),
    ]
}
