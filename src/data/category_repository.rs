use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::repository::CategoryRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryCategoryRepository {
    storage: Arc<RwLock<HashMap<String, Category>>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    #[instrument(skip(self), fields(category_id = %category.id, name = %category.name))]
    async fn insert_category(&self, category: Category) -> Result<()> {
        let mut storage = self.storage.write().await;
        if storage.values().any(|c| c.name == category.name) {
            debug!("Category name already taken");
            return Err(DomainError::conflict("Category already exist").into());
        }
        storage.insert(category.id.clone(), category);
        debug!("Category saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rename_category(&self, id: &str, name: String) -> Result<Category> {
        let mut storage = self.storage.write().await;
        if storage.values().any(|c| c.name == name && c.id != id) {
            debug!("Category name already taken");
            return Err(DomainError::conflict("Category already exist").into());
        }
        let category = storage
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found(format!("Category {id} not found")))?;
        category.name = name;
        debug!("Category renamed in memory storage");
        Ok(category.clone())
    }

    async fn find_category_by_id(&self, id: &str) -> Result<Option<Category>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let storage = self.storage.read().await;
        let mut categories: Vec<Category> = storage.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        trace!(count = categories.len(), "Listed categories");
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: &str) -> Result<Option<Category>> {
        let mut storage = self.storage.write().await;
        let removed = storage.remove(id);
        debug!(removed = removed.is_some(), "Category delete applied");
        Ok(removed)
    }
}
