use crate::application::auth_service::AuthService;
use crate::application::category_service::CategoryService;
use crate::application::menu_service::MenuService;
use crate::application::order_service::OrderService;
use crate::application::user_service::UserService;
use crate::data::category_repository::InMemoryCategoryRepository;
use crate::data::menu_repository::InMemoryMenuRepository;
use crate::data::order_repository::InMemoryOrderRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use actix_web::http::StatusCode;
use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    error::{JsonPayloadError, PathError},
    web,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

pub type Menus = MenuService<InMemoryMenuRepository, InMemoryCategoryRepository>;
pub type Categories = CategoryService<InMemoryCategoryRepository, InMemoryMenuRepository>;
pub type Orders = OrderService<
    InMemoryOrderRepository,
    InMemoryMenuRepository,
    InMemoryCategoryRepository,
    InMemoryUserRepository,
>;
pub type Users = UserService<InMemoryUserRepository>;
pub type Auth = AuthService<InMemoryUserRepository>;

// AppState holding the services
pub struct AppState {
    pub auth_service: Arc<Auth>,
    pub category_service: Categories,
    pub menu_service: Arc<Menus>,
    pub order_service: Orders,
    pub user_service: Users,
    /// Shared secret the OAuth callback bridge must present.
    pub oauth_bridge_secret: Option<String>,
}

impl AppState {
    /// Wires every service over fresh in-memory repositories.
    pub fn in_memory(
        jwt_secret: String,
        token_ttl_secs: u64,
        delivery_fee: Decimal,
        oauth_bridge_secret: Option<String>,
    ) -> Self {
        let users = Arc::new(InMemoryUserRepository::new());
        let categories = Arc::new(InMemoryCategoryRepository::new());
        let menus = Arc::new(InMemoryMenuRepository::new());
        let orders = Arc::new(InMemoryOrderRepository::new());

        let menu_service = Arc::new(MenuService::new(menus.clone(), categories.clone()));

        Self {
            auth_service: Arc::new(AuthService::new(users.clone(), jwt_secret, token_ttl_secs)),
            category_service: CategoryService::new(categories, menus),
            menu_service: menu_service.clone(),
            order_service: OrderService::new(orders, menu_service, users.clone(), delivery_fee),
            user_service: UserService::new(users),
            oauth_bridge_secret,
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // Internal details stay in the log.
        let message = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, status = %status, "Internal error");
                "Internal server error".to_string()
            }
            other => {
                let message = other.to_string();
                warn!(error = %message, status = %status, "Request rejected");
                message
            }
        };

        HttpResponse::build(status).json(ErrorResponse { message })
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => ApiError::Validation(msg),
            DomainError::Conflict(msg) => ApiError::Conflict(msg),
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            DomainError::Forbidden(msg) => ApiError::Forbidden(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(other) => ApiError::Internal(format!("{other:#}")),
        }
    }
}

/// Builds the `{<key>: data, message}` body every route answers with.
pub fn envelope<T: Serialize>(key: &str, data: T, message: impl Into<String>) -> Result<Value, ApiError> {
    let data = serde_json::to_value(data)
        .map_err(|e| ApiError::Internal(format!("Failed to serialize response: {e}")))?;
    let mut body = Map::new();
    body.insert(key.to_string(), data);
    body.insert("message".to_string(), Value::String(message.into()));
    Ok(Value::Object(body))
}

/// Malformed JSON bodies answer 400 in the regular error shape.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = %req.path(), error = %err, "Rejected request body");
    ApiError::Validation(format!("Invalid request body: {err}")).into()
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    warn!(path = %req.path(), error = %err, "Rejected path parameters");
    ApiError::Validation(format!("Invalid path: {err}")).into()
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}
