use crate::application::user_service::Requester;
use crate::domain::user::{AuthProfileUpdate, ContactUpdate};
use crate::presentation::handlers::{ApiError, AppState, envelope};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::instrument;

fn requester(user: &AuthenticatedUser) -> Requester<'_> {
    Requester {
        user_id: &user.user_id,
        is_admin: user.is_admin(),
    }
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.user_service.profile(&user.user_id).await?;
    Ok(HttpResponse::Ok().json(envelope(
        "profile",
        &profile,
        format!("User id:{} records are returned", user.user_id),
    )?))
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn get_user(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let found = state.user_service.get(requester(&user), &id).await?;
    Ok(HttpResponse::Ok().json(envelope("user", &found, format!("User id:{id} is returned"))?))
}

#[instrument(skip(state, user, form), fields(user_id = %user.user_id))]
pub async fn update_auth(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    form: web::Json<AuthProfileUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let updated = state
        .user_service
        .update_auth(requester(&user), &id, form.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(envelope("user", &updated, format!("Profile id:{id} is updated"))?))
}

#[instrument(skip(state, user, form), fields(user_id = %user.user_id))]
pub async fn update_contact(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    form: web::Json<ContactUpdate>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let updated = state
        .user_service
        .update_contact(requester(&user), &id, form.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(envelope(
        "user",
        &updated,
        format!("Contact details of id:{id} are updated"),
    )?))
}
