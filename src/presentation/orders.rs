use crate::domain::order::CheckoutRequest;
use crate::presentation::handlers::{ApiError, AppState, envelope};
use crate::presentation::middleware::{AdminUser, AuthenticatedUser};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn checkout(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, ApiError> {
    let order = state
        .order_service
        .checkout(&user.user_id, req.into_inner())
        .await?;
    info!(order_id = %order.id, "Checkout completed");
    Ok(HttpResponse::Created().json(envelope(
        "order",
        &order,
        format!("Order id:{} is placed", order.id),
    )?))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_orders(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let orders = state.order_service.list_for_user(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(envelope(
        "orderList",
        &orders,
        format!("All orders to userId: {} are returned", user.user_id),
    )?))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.0.user_id))]
pub async fn mark_order_paid(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let order = state.order_service.mark_paid(&id).await?;
    Ok(HttpResponse::Ok().json(envelope("order", &order, format!("Order id:{id} is paid"))?))
}
