use crate::domain::user::{LoginRequest, OAuthProfile, RegisterRequest};
use crate::presentation::handlers::{ApiError, AppState, envelope};
use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{error, info, instrument, warn};

pub const PROVIDER_SECRET_HEADER: &str = "x-provider-secret";

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let user = state
        .auth_service
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = %user.id, "User registered successfully");
    Ok(HttpResponse::Created().json(envelope("user", &user, "User successfully created")?))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let session = state.auth_service.login(req.into_inner()).await.map_err(|e| {
        error!(error = %e, "Failed to login");
        ApiError::from(e)
    })?;

    info!(user_id = %session.user.id, "Login successful");
    Ok(HttpResponse::Ok().json(envelope("session", &session, "Signed in")?))
}

/// Called by the OAuth callback bridge once the provider has vouched for the
/// profile. Only a caller holding the bridge secret may use it.
#[instrument(skip(state, http, req), fields(sub = %req.sub))]
pub async fn oauth_google(
    state: web::Data<AppState>,
    http: HttpRequest,
    req: web::Json<OAuthProfile>,
) -> Result<HttpResponse, ApiError> {
    let presented = http
        .headers()
        .get(PROVIDER_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    match (state.oauth_bridge_secret.as_deref(), presented) {
        (Some(expected), Some(given)) if expected == given => {}
        (None, _) => {
            warn!("OAuth sign-in attempted while the bridge is disabled");
            return Err(ApiError::Unauthorized("OAuth sign-in is not enabled".to_string()));
        }
        _ => {
            warn!("OAuth sign-in with a wrong bridge secret");
            return Err(ApiError::Unauthorized("Invalid provider credentials".to_string()));
        }
    }

    let session = state
        .auth_service
        .oauth_sign_in(req.into_inner())
        .await
        .map_err(ApiError::from)?;

    info!(user_id = %session.user.id, "OAuth sign-in successful");
    Ok(HttpResponse::Ok().json(envelope("session", &session, "Signed in")?))
}
