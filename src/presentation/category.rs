use crate::domain::category::CategoryForm;
use crate::presentation::handlers::{ApiError, AppState, envelope};
use crate::presentation::middleware::AdminUser;
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

#[instrument(skip(state))]
pub async fn list_categories(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories = state.category_service.list().await?;
    Ok(HttpResponse::Ok().json(envelope(
        "categoryList",
        &categories,
        "Category list with records are returned",
    )?))
}

#[instrument(skip(state, admin, form), fields(admin_id = %admin.0.user_id))]
pub async fn create_category(
    state: web::Data<AppState>,
    admin: AdminUser,
    form: web::Json<CategoryForm>,
) -> Result<HttpResponse, ApiError> {
    let category = state.category_service.create(form.into_inner()).await?;
    info!(category_id = %category.id, "Category created via API");
    Ok(HttpResponse::Created().json(envelope("category", &category, "Category created")?))
}

#[instrument(skip(state, admin, form), fields(admin_id = %admin.0.user_id))]
pub async fn update_category(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
    form: web::Json<CategoryForm>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let category = state.category_service.update(&id, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(envelope(
        "category",
        &category,
        format!("Category id:{id} is updated"),
    )?))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.user_id))]
pub async fn delete_category(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let removed = state.category_service.delete(&id).await?;
    Ok(HttpResponse::Ok().json(envelope(
        "categoryItem",
        Option::<()>::None,
        format!(
            "Category: {} with {} has been removed from the database",
            removed.name, id
        ),
    )?))
}
