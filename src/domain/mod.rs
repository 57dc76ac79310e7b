pub mod cart;
pub mod category;
pub mod error;
pub mod menu;
pub mod order;
pub mod price;
pub mod repository;
pub mod user;
pub mod validation;
