use crate::domain::category::Category;
use crate::domain::error::DomainError;
use crate::domain::menu::{Menu, MenuForm, MenuRecord};
use crate::domain::repository::{CategoryRepository, MenuRepository};
use crate::domain::validation::validate_menu;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub struct MenuService<M: MenuRepository, C: CategoryRepository> {
    menus: Arc<M>,
    categories: Arc<C>,
}

impl<M: MenuRepository, C: CategoryRepository> MenuService<M, C> {
    pub fn new(menus: Arc<M>, categories: Arc<C>) -> Self {
        Self { menus, categories }
    }

    async fn resolve_categories(&self, ids: &[String]) -> Result<Vec<Category>> {
        let mut resolved = Vec::with_capacity(ids.len());
        for id in ids {
            let category = self
                .categories
                .find_category_by_id(id)
                .await?
                .ok_or_else(|| DomainError::not_found(format!("Category {id} not found")))?;
            resolved.push(category);
        }
        Ok(resolved)
    }

    async fn load(&self, record: MenuRecord) -> Result<Menu> {
        let images = self.menus.images_for_menu(&record.id).await?;
        let mut categories = Vec::with_capacity(record.category_ids.len());
        for id in &record.category_ids {
            if let Some(category) = self.categories.find_category_by_id(id).await? {
                categories.push(category);
            }
        }
        Ok(Menu::from_parts(record, images, categories))
    }

    pub async fn list(&self) -> Result<Vec<Menu>> {
        let records = self.menus.list_menus().await?;
        let mut menus = Vec::with_capacity(records.len());
        for record in records {
            menus.push(self.load(record).await?);
        }
        Ok(menus)
    }

    pub async fn get(&self, id: &str) -> Result<Menu> {
        let record = self
            .menus
            .find_menu_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Menu {id} not found")))?;
        self.load(record).await
    }

    #[instrument(skip(self, form), fields(name = %form.menu_name))]
    pub async fn create(&self, form: MenuForm) -> Result<Menu> {
        let valid = validate_menu(&form)?;
        self.resolve_categories(&valid.category_ids).await?;

        let record = MenuRecord {
            id: Uuid::new_v4().to_string(),
            name: valid.name,
            description: valid.description,
            size: valid.size,
            price: valid.price,
            category_ids: valid.category_ids,
        };
        let menu_id = record.id.clone();
        self.menus
            .insert_menu(record, valid.image_urls)
            .await
            .inspect_err(|e| warn!(error = %e, "Menu not created"))?;
        info!(menu_id = %menu_id, "Menu created");
        self.get(&menu_id).await
    }

    /// Replaces every field and reconciles images: unchanged urls keep their
    /// rows, the rest are deleted or created.
    #[instrument(skip(self, form))]
    pub async fn update(&self, id: &str, form: MenuForm) -> Result<Menu> {
        let valid = validate_menu(&form)?;
        self.resolve_categories(&valid.category_ids).await?;

        let record = MenuRecord {
            id: id.to_string(),
            name: valid.name,
            description: valid.description,
            size: valid.size,
            price: valid.price,
            category_ids: valid.category_ids,
        };
        let diff = self
            .menus
            .update_menu(record, valid.image_urls)
            .await
            .inspect_err(|e| warn!(error = %e, "Menu not updated"))?;
        debug!(to_add = ?diff.to_add, to_remove = ?diff.to_remove, "Image diff applied");
        info!(menu_id = %id, "Menu updated");
        self.get(id).await
    }

    /// Refused with Conflict while any order holds the menu.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<MenuRecord> {
        let removed = self
            .menus
            .delete_menu(id)
            .await
            .inspect_err(|e| warn!(error = %e, "Menu not deleted"))?
            .ok_or_else(|| DomainError::not_found(format!("Menu {id} not found")))?;
        info!(menu_id = %id, name = %removed.name, "Menu deleted");
        Ok(removed)
    }

    /// Pins the menus for an order being placed. Pass the same ids to
    /// [`MenuService::release`] if the order is not stored.
    pub async fn hold(&self, ids: &[String]) -> Result<Vec<MenuRecord>> {
        self.menus.hold_menus(ids).await
    }

    pub async fn release(&self, ids: &[String]) -> Result<()> {
        self.menus.release_menus(ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::category_repository::InMemoryCategoryRepository;
    use crate::data::menu_repository::InMemoryMenuRepository;
    use crate::domain::menu::{MenuImageInput, MenuSize};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    type Service = MenuService<InMemoryMenuRepository, InMemoryCategoryRepository>;

    async fn service_with_category() -> (Service, String) {
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let category = Category {
            id: "cat-1".to_string(),
            name: "Pizza".to_string(),
        };
        categories.insert_category(category.clone()).await.unwrap();
        let service = MenuService::new(Arc::new(InMemoryMenuRepository::new()), categories);
        (service, category.id)
    }

    fn form(name: &str, category: &str, urls: &[&str]) -> MenuForm {
        MenuForm {
            menu_name: name.to_string(),
            menu_description: "Cheesy".to_string(),
            menu_image: urls
                .iter()
                .map(|u| MenuImageInput { url: u.to_string() })
                .collect(),
            menu_size: MenuSize::Normal,
            menu_category: vec![category.to_string()],
            menu_price: "9.90".to_string(),
        }
    }

    fn domain_err(err: anyhow::Error) -> DomainError {
        err.downcast::<DomainError>().expect("domain error")
    }

    #[tokio::test]
    async fn test_create_joins_categories_and_images() {
        let (service, cat) = service_with_category().await;
        let menu = service
            .create(form("Margherita", &cat, &["https://img.example.com/a.png"]))
            .await
            .unwrap();

        assert_eq!(menu.categories.len(), 1);
        assert_eq!(menu.images.len(), 1);
        assert_eq!(menu.price, Decimal::from_str("9.90").unwrap());
        assert_eq!(menu.formatted_price, "€9.9");
    }

    #[tokio::test]
    async fn test_create_duplicate_name_is_conflict() {
        let (service, cat) = service_with_category().await;
        service.create(form("Margherita", &cat, &[])).await.unwrap();

        let err = service.create(form("Margherita", &cat, &[])).await.unwrap_err();
        assert!(matches!(domain_err(err), DomainError::Conflict(_)));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_is_not_found() {
        let (service, _) = service_with_category().await;
        let err = service.create(form("Funghi", "missing", &[])).await.unwrap_err();
        assert!(matches!(domain_err(err), DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_reconciles_images() {
        let (service, cat) = service_with_category().await;
        let created = service
            .create(form(
                "Margherita",
                &cat,
                &["https://img.example.com/a.png", "https://img.example.com/b.png"],
            ))
            .await
            .unwrap();
        let kept = created
            .images
            .iter()
            .find(|i| i.url == "https://img.example.com/b.png")
            .unwrap()
            .clone();

        let updated = service
            .update(
                &created.id,
                form(
                    "Margherita",
                    &cat,
                    &["https://img.example.com/b.png", "https://img.example.com/c.png"],
                ),
            )
            .await
            .unwrap();

        let urls: Vec<&str> = updated.images.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["https://img.example.com/b.png", "https://img.example.com/c.png"]
        );
        assert!(updated.images.contains(&kept));
    }

    #[tokio::test]
    async fn test_update_missing_menu_is_not_found() {
        let (service, cat) = service_with_category().await;
        let err = service.update("ghost", form("Ghost", &cat, &[])).await.unwrap_err();
        assert!(matches!(domain_err(err), DomainError::NotFound(_)));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_create_same_name_keeps_one_menu() {
        let (service, cat) = service_with_category().await;

        let (a, b) = tokio::join!(
            service.create(form("Quattro", &cat, &[])),
            service.create(form("Quattro", &cat, &[]))
        );

        assert_eq!(u8::from(a.is_ok()) + u8::from(b.is_ok()), 1);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_image_urls_collapse() {
        let (service, cat) = service_with_category().await;
        let menu = service
            .create(form(
                "Diavola",
                &cat,
                &["https://img.example.com/a.png", "https://img.example.com/a.png"],
            ))
            .await
            .unwrap();
        assert_eq!(menu.images.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (service, cat) = service_with_category().await;
        let menu = service.create(form("Calzone", &cat, &[])).await.unwrap();

        service.delete(&menu.id).await.unwrap();

        let err = service.get(&menu.id).await.unwrap_err();
        assert!(matches!(domain_err(err), DomainError::NotFound(_)));
        let err = service.delete(&menu.id).await.unwrap_err();
        assert!(matches!(domain_err(err), DomainError::NotFound(_)));
    }
}
