pub mod auth;
pub mod category;
pub mod handlers;
pub mod menu;
pub mod middleware;
pub mod orders;
pub mod routes;
pub mod user;
