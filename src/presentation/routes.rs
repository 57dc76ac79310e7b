use crate::presentation::auth::{login, oauth_google, register};
use crate::presentation::category::{
    create_category, delete_category, list_categories, update_category,
};
use crate::presentation::handlers::{health_check, json_config, path_config};
use crate::presentation::menu::{create_menu, delete_menu, get_menu, list_menus, update_menu};
use crate::presentation::orders::{checkout, list_orders, mark_order_paid};
use crate::presentation::user::{get_user, profile, update_auth, update_contact};
use actix_web::web;

pub const ROUTES: &str = "GET /api/health, POST /api/auth/{register,login,oauth/google}, \
GET|POST|PUT|DELETE /api/category, GET|POST|PUT|DELETE /api/menu, POST /api/checkout, \
GET /api/orders, PUT /api/orders/{id}/paid, GET|PUT /api/user";

/// Mounts every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(path_config()).service(
        web::scope("/api")
            .route("/health", web::get().to(health_check))
            .route("/auth/register", web::post().to(register))
            .route("/auth/login", web::post().to(login))
            .route("/auth/oauth/google", web::post().to(oauth_google))
            .route("/category", web::get().to(list_categories))
            .route("/category/create", web::post().to(create_category))
            .route("/category/{id}/update", web::put().to(update_category))
            .route("/category/{id}/delete", web::delete().to(delete_category))
            .route("/menu", web::get().to(list_menus))
            .route("/menu/create", web::post().to(create_menu))
            .route("/menu/{id}", web::get().to(get_menu))
            .route("/menu/{id}/update", web::put().to(update_menu))
            .route("/menu/{id}/delete", web::delete().to(delete_menu))
            .route("/checkout", web::post().to(checkout))
            .route("/orders", web::get().to(list_orders))
            .route("/orders/{id}/paid", web::put().to(mark_order_paid))
            .route("/user/profile", web::get().to(profile))
            .route("/user/{id}", web::get().to(get_user))
            .route("/user/{id}/auth/update", web::put().to(update_auth))
            .route("/user/{id}/contact/update", web::put().to(update_contact)),
    );
}
