use crate::domain::category::{Category, CategoryForm};
use crate::domain::error::DomainError;
use crate::domain::repository::{CategoryRepository, MenuRepository};
use crate::domain::validation::validate_category;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct CategoryService<C: CategoryRepository, M: MenuRepository> {
    categories: Arc<C>,
    menus: Arc<M>,
}

impl<C: CategoryRepository, M: MenuRepository> CategoryService<C, M> {
    pub fn new(categories: Arc<C>, menus: Arc<M>) -> Self {
        Self { categories, menus }
    }

    pub async fn list(&self) -> Result<Vec<Category>> {
        self.categories.list_categories().await
    }

    /// Name uniqueness is enforced by the repository under its lock.
    #[instrument(skip(self, form))]
    pub async fn create(&self, form: CategoryForm) -> Result<Category> {
        let name = validate_category(&form)?;

        let category = Category {
            id: Uuid::new_v4().to_string(),
            name,
        };
        self.categories
            .insert_category(category.clone())
            .await
            .inspect_err(|e| warn!(error = %e, name = %category.name, "Category not created"))?;
        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &str, form: CategoryForm) -> Result<Category> {
        let name = validate_category(&form)?;

        let category = self
            .categories
            .rename_category(id, name)
            .await
            .inspect_err(|e| warn!(error = %e, "Category not updated"))?;
        info!(category_id = %category.id, name = %category.name, "Category updated");
        Ok(category)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<Category> {
        let removed = self
            .categories
            .delete_category(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Category {id} not found")))?;
        let detached = self.menus.detach_category(id).await?;
        info!(category_id = %id, name = %removed.name, detached, "Category deleted");
        Ok(removed)
    }
}
