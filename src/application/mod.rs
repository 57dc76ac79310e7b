pub mod auth_service;
pub mod cart_store;
pub mod category_service;
pub mod menu_service;
pub mod order_service;
pub mod user_service;
