//! Catalog management service

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        enums::Capability,
        item::{CreateItem, ItemDetails, ItemQuery, StockSummary, UpdateItem},
    },
    repository::SharedRepository,
    services::{codes, session::SessionService},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: SharedRepository,
    session: SessionService,
}

impl CatalogService {
    pub fn new(repository: SharedRepository, session: SessionService) -> Self {
        Self { repository, session }
    }

    /// Search items with filters
    pub async fn search_items(&self, query: &ItemQuery) -> Vec<ItemDetails> {
        self.repository
            .read(|repo| {
                repo.items
                    .list(query)
                    .into_iter()
                    .cloned()
                    .map(ItemDetails::from)
                    .collect()
            })
            .await
    }

    pub async fn get_item(&self, id: &str) -> AppResult<ItemDetails> {
        self.repository
            .read(|repo| repo.items.get(id).cloned().map(ItemDetails::from))
            .await
    }

    pub async fn categories(&self) -> Vec<String> {
        self.repository.read(|repo| repo.items.categories()).await
    }

    pub async fn summary(&self) -> StockSummary {
        self.repository.read(|repo| repo.items.summary()).await
    }

    pub async fn create_item(&self, data: CreateItem) -> AppResult<ItemDetails> {
        self.session.role().await.require(Capability::ManageCatalog)?;
        data.validate()?;

        let item = self
            .repository
            .transaction(|repo| {
                let id = match data.id.as_deref().map(str::trim) {
                    Some(id) if !id.is_empty() => id.to_string(),
                    _ => {
                        let mut id = codes::lower_code(9);
                        while repo.items.contains(&id) {
                            id = codes::lower_code(9);
                        }
                        id
                    }
                };
                repo.items.create(id, data).cloned()
            })
            .await?;

        tracing::info!(item_id = %item.id, name = %item.name, total = item.total_quantity, "Item created");
        Ok(ItemDetails::from(item))
    }

    pub async fn update_item(&self, id: &str, data: UpdateItem) -> AppResult<ItemDetails> {
        self.session.role().await.require(Capability::ManageCatalog)?;
        data.validate()?;

        let item = self
            .repository
            .transaction(|repo| repo.items.update(id, data).cloned())
            .await?;

        tracing::info!(
            item_id = %item.id,
            total = item.total_quantity,
            available = item.available_quantity,
            "Item updated"
        );
        Ok(ItemDetails::from(item))
    }

    /// Remove an item. Existing loans keep their copy of its name.
    pub async fn delete_item(&self, id: &str) -> AppResult<()> {
        self.session.role().await.require(Capability::ManageCatalog)?;
        let item = self
            .repository
            .transaction(|repo| repo.items.delete(id))
            .await?;
        tracing::info!(item_id = %item.id, name = %item.name, "Item deleted");
        Ok(())
    }
}
