use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, web};
use food_store_api::infrastructure::config::AppConfig;
use food_store_api::infrastructure::logging::init_logging;
use food_store_api::presentation::handlers::AppState;
use food_store_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use food_store_api::presentation::routes::{ROUTES, configure};
use tracing::{error, info, instrument};

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE])
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[tokio::main]
#[instrument]
async fn main() -> std::io::Result<()> {
    info!("Initializing logging subsystem");
    init_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    info!(config = ?config, "Configuration loaded");

    let state = web::Data::new(AppState::in_memory(
        config.jwt_secret.clone(),
        config.token_ttl_secs,
        config.delivery_fee,
        config.oauth_bridge_secret.clone(),
    ));
    info!("Application state initialized");

    if let Some(admin) = &config.admin {
        state
            .auth_service
            .ensure_admin(&admin.email, &admin.password)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to seed administrator");
                std::io::Error::other(e.to_string())
            })?;
        info!(email = %admin.email, "Administrator account ready");
    }

    let jwt_secret = config.jwt_secret.clone();
    let cors_origin = config.cors_origin.clone();

    info!("Configuring HTTP server");
    let server = HttpServer::new(move || {
        tracing::trace!("Creating new application instance");
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(cors(cors_origin.as_deref()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(configure)
    });

    let bind_addr = config.socket_addr();
    info!(address = %bind_addr, "Binding server to address");
    let server = server.bind(bind_addr)?;

    info!(address = %bind_addr, routes = %ROUTES, "Starting HTTP server");
    server.run().await
}
