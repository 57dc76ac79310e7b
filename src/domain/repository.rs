use crate::domain::category::Category;
use crate::domain::menu::{Image, ImageDiff, MenuRecord};
use crate::domain::order::Order;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

/// Writes enforce their own invariants under the store's lock and report
/// violations as `DomainError` inside the `anyhow` error.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Conflict when the name is taken.
    async fn insert_category(&self, category: Category) -> Result<()>;
    /// NotFound when the row is gone, Conflict when another row has `name`.
    async fn rename_category(&self, id: &str, name: String) -> Result<Category>;
    async fn find_category_by_id(&self, id: &str) -> Result<Option<Category>>;
    async fn list_categories(&self) -> Result<Vec<Category>>;
    async fn delete_category(&self, id: &str) -> Result<Option<Category>>;
}

#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// Conflict when the name is taken.
    async fn insert_menu(&self, menu: MenuRecord, image_urls: Vec<String>) -> Result<()>;
    async fn find_menu_by_id(&self, id: &str) -> Result<Option<MenuRecord>>;
    async fn list_menus(&self) -> Result<Vec<MenuRecord>>;
    async fn images_for_menu(&self, menu_id: &str) -> Result<Vec<Image>>;
    /// Replaces the menu row and reconciles its images against
    /// `image_urls` under one lock. NotFound when the row is gone, Conflict
    /// when another menu has the name.
    async fn update_menu(&self, menu: MenuRecord, image_urls: Vec<String>) -> Result<ImageDiff>;
    /// Removes the menu together with its images. Conflict while an order
    /// holds it.
    async fn delete_menu(&self, id: &str) -> Result<Option<MenuRecord>>;
    /// Marks every menu in `ids` as held by one more order and returns the
    /// rows in the same order. NotFound, and nothing held, if any is missing.
    async fn hold_menus(&self, ids: &[String]) -> Result<Vec<MenuRecord>>;
    /// Undoes one [`MenuRepository::hold_menus`] call.
    async fn release_menus(&self, ids: &[String]) -> Result<()>;
    /// Drops a category id from every menu that references it.
    async fn detach_category(&self, category_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Conflict when the id or the email (ignoring case) is taken.
    async fn insert_user(&self, user: User) -> Result<()>;
    /// Applies `change` to the stored row under the write lock. NotFound when
    /// the row is gone, Conflict when the new email belongs to someone else.
    async fn update_user<F>(&self, id: &str, change: F) -> Result<User>
    where
        F: FnOnce(&mut User) + Send + 'static;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn save_order(&self, order: Order) -> Result<()>;
    async fn find_order_by_id(&self, id: &str) -> Result<Option<Order>>;
    /// Newest first.
    async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>>;
}
