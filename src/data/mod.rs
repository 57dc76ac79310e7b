pub mod cart_storage;
pub mod category_repository;
pub mod menu_repository;
pub mod order_repository;
pub mod user_repository;
