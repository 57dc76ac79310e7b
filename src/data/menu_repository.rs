use crate::domain::error::DomainError;
use crate::domain::menu::{Image, ImageDiff, MenuRecord, diff_image_urls};
use crate::domain::repository::MenuRepository;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};
use uuid::Uuid;

#[derive(Default)]
struct MenuTables {
    menus: HashMap<String, MenuRecord>,
    // insertion order is the display order of a menu's images
    images: Vec<Image>,
    // menu id -> number of orders holding it
    holds: HashMap<String, usize>,
}

impl MenuTables {
    fn name_taken(&self, name: &str, except_id: &str) -> bool {
        self.menus.values().any(|m| m.name == name && m.id != except_id)
    }

    fn create_images(&mut self, menu_id: &str, urls: Vec<String>) {
        for url in urls {
            self.images.push(Image {
                id: Uuid::new_v4().to_string(),
                url,
                menu_id: menu_id.to_string(),
            });
        }
    }
}

/// Menus and their images share one lock so multi-row writes are atomic.
#[derive(Clone)]
pub struct InMemoryMenuRepository {
    storage: Arc<RwLock<MenuTables>>,
}

impl InMemoryMenuRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(MenuTables::default())),
        }
    }
}

impl Default for InMemoryMenuRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MenuRepository for InMemoryMenuRepository {
    #[instrument(skip(self, menu), fields(menu_id = %menu.id, images = image_urls.len()))]
    async fn insert_menu(&self, menu: MenuRecord, image_urls: Vec<String>) -> Result<()> {
        let mut tables = self.storage.write().await;
        if tables.name_taken(&menu.name, &menu.id) || tables.menus.contains_key(&menu.id) {
            debug!("Menu name already taken");
            return Err(DomainError::conflict("Menu already exist").into());
        }
        tables.create_images(&menu.id, image_urls);
        tables.menus.insert(menu.id.clone(), menu);
        debug!("Menu saved to memory storage");
        Ok(())
    }

    async fn find_menu_by_id(&self, id: &str) -> Result<Option<MenuRecord>> {
        let tables = self.storage.read().await;
        Ok(tables.menus.get(id).cloned())
    }

    async fn list_menus(&self) -> Result<Vec<MenuRecord>> {
        let tables = self.storage.read().await;
        let mut menus: Vec<MenuRecord> = tables.menus.values().cloned().collect();
        menus.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(menus)
    }

    async fn images_for_menu(&self, menu_id: &str) -> Result<Vec<Image>> {
        let tables = self.storage.read().await;
        Ok(tables
            .images
            .iter()
            .filter(|img| img.menu_id == menu_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self, menu, image_urls), fields(menu_id = %menu.id))]
    async fn update_menu(&self, menu: MenuRecord, image_urls: Vec<String>) -> Result<ImageDiff> {
        let mut tables = self.storage.write().await;
        let menu_id = menu.id.clone();
        if !tables.menus.contains_key(&menu_id) {
            return Err(DomainError::not_found(format!("Menu {menu_id} not found")).into());
        }
        if tables.name_taken(&menu.name, &menu_id) {
            debug!("Menu name already taken");
            return Err(DomainError::conflict("Menu already exist").into());
        }

        let current: Vec<String> = tables
            .images
            .iter()
            .filter(|img| img.menu_id == menu_id)
            .map(|img| img.url.clone())
            .collect();
        let diff = diff_image_urls(&current, &image_urls);

        tables
            .images
            .retain(|img| img.menu_id != menu_id || !diff.to_remove.contains(&img.url));
        tables.create_images(&menu_id, diff.to_add.clone());
        tables.menus.insert(menu_id, menu);
        debug!(added = diff.to_add.len(), removed = diff.to_remove.len(), "Menu updated in memory storage");
        Ok(diff)
    }

    #[instrument(skip(self))]
    async fn delete_menu(&self, id: &str) -> Result<Option<MenuRecord>> {
        let mut tables = self.storage.write().await;
        if tables.holds.get(id).is_some_and(|n| *n > 0) {
            debug!("Menu is held by orders");
            return Err(DomainError::conflict("Menu is referenced by existing orders").into());
        }
        let removed = tables.menus.remove(id);
        if removed.is_some() {
            tables.images.retain(|img| img.menu_id != id);
        }
        debug!(removed = removed.is_some(), "Menu delete applied");
        Ok(removed)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn hold_menus(&self, ids: &[String]) -> Result<Vec<MenuRecord>> {
        let mut tables = self.storage.write().await;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let record = tables
                .menus
                .get(id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("Menu {id} not found")))?;
            records.push(record);
        }
        for id in ids {
            *tables.holds.entry(id.clone()).or_insert(0) += 1;
        }
        trace!("Menus held");
        Ok(records)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn release_menus(&self, ids: &[String]) -> Result<()> {
        let mut tables = self.storage.write().await;
        for id in ids {
            if let Some(count) = tables.holds.get_mut(id) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    tables.holds.remove(id);
                }
            }
        }
        trace!("Menus released");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn detach_category(&self, category_id: &str) -> Result<usize> {
        let mut tables = self.storage.write().await;
        let mut touched = 0;
        for menu in tables.menus.values_mut() {
            let before = menu.category_ids.len();
            menu.category_ids.retain(|id| id != category_id);
            if menu.category_ids.len() != before {
                touched += 1;
            }
        }
        trace!(touched, "Category detached from menus");
        Ok(touched)
    }
}
