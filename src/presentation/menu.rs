use crate::domain::menu::MenuForm;
use crate::presentation::handlers::{ApiError, AppState, envelope};
use crate::presentation::middleware::AdminUser;
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

#[instrument(skip(state))]
pub async fn list_menus(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let menus = state.menu_service.list().await?;
    Ok(HttpResponse::Ok().json(envelope(
        "menu",
        &menus,
        "All menu with records are returned",
    )?))
}

#[instrument(skip(state))]
pub async fn get_menu(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let menu = state.menu_service.get(&id).await?;
    Ok(HttpResponse::Ok().json(envelope("menu", &menu, format!("Menu id:{id} is returned"))?))
}

#[instrument(skip(state, admin, form), fields(admin_id = %admin.0.user_id, name = %form.menu_name))]
pub async fn create_menu(
    state: web::Data<AppState>,
    admin: AdminUser,
    form: web::Json<MenuForm>,
) -> Result<HttpResponse, ApiError> {
    let menu = state.menu_service.create(form.into_inner()).await?;
    info!(menu_id = %menu.id, "Menu created via API");
    Ok(HttpResponse::Created().json(envelope("menu", &menu, "Menu created")?))
}

#[instrument(skip(state, admin, form), fields(admin_id = %admin.0.user_id))]
pub async fn update_menu(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
    form: web::Json<MenuForm>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let menu = state.menu_service.update(&id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(envelope("menu", &menu, format!("Menu id:{id} is updated"))?))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.user_id))]
pub async fn delete_menu(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let removed = state.menu_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(envelope(
        "menuItem",
        Option::<()>::None,
        format!("Menu: {} with {} has been removed from the database", removed.name, id),
    )?))
}
