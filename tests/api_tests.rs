use actix_web::{App, test, web};
use food_store_api::domain::user::{
    AuthProfileUpdate, ContactUpdate, LoginRequest, RegisterRequest,
};
use food_store_api::presentation::handlers::AppState;
use food_store_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use food_store_api::presentation::routes::configure;
use rust_decimal::Decimal;

// Yields (app, user_id, token) for a registered "erin"
macro_rules! setup_test {
    () => {{
        let jwt_secret = "test-secret-key-for-testing-only".to_string();
        let state = web::Data::new(AppState::in_memory(
            jwt_secret.clone(),
            3600,
            Decimal::TWO,
            None,
        ));

        let user = state
            .auth_service
            .register_user(RegisterRequest {
                username: "erin".to_string(),
                email: "erin@example.com".to_string(),
                street: "Main St 1".to_string(),
                city: "Springfield".to_string(),
                phone: "555 0100".to_string(),
                password: "erin-pass".to_string(),
                confirm_password: "erin-pass".to_string(),
            })
            .await
            .unwrap();
        let token = state
            .auth_service
            .login(LoginRequest {
                email: "erin@example.com".to_string(),
                password: "erin-pass".to_string(),
            })
            .await
            .unwrap()
            .access_token;

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .wrap(TimingMiddleware)
                .wrap(RequestIdMiddleware)
                .configure(configure),
        )
        .await;

        (app, user.id, token)
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_health_carries_tracing_headers() {
    let (app, _, _) = setup_test!();

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("x-request-id"));
    assert!(resp.headers().contains_key("x-response-time"));
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_incoming_request_id_is_echoed() {
    let (app, _, _) = setup_test!();

    let req = test::TestRequest::get()
        .uri("/api/health")
        .insert_header(("x-request-id", "trace-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "trace-123");
}

#[actix_web::test]
async fn test_unauthorized_access() {
    let (app, _, _) = setup_test!();

    let req = test::TestRequest::get().uri("/api/user/profile").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    // A forged token is refused even on public routes
    let req = test::TestRequest::get()
        .uri("/api/menu")
        .insert_header(("Authorization", "Bearer invalid-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().is_some());

    let req = test::TestRequest::get()
        .uri("/api/menu")
        .insert_header(("Authorization", "Basic abc"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let (app, _, _) = setup_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_web::test]
async fn test_user_lookup_is_self_only() {
    let (app, user_id, token) = setup_test!();

    let req = test::TestRequest::get()
        .uri(&format!("/api/user/{user_id}"))
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["username"], "erin");

    let req = test::TestRequest::get()
        .uri("/api/user/someone-else")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}

#[actix_web::test]
async fn test_blank_password_update_keeps_login() {
    let (app, user_id, token) = setup_test!();

    let req = test::TestRequest::put()
        .uri(&format!("/api/user/{user_id}/auth/update"))
        .insert_header(bearer(&token))
        .set_json(AuthProfileUpdate {
            username: "erin2".to_string(),
            email: "erin@example.com".to_string(),
            password: Some(String::new()),
            confirm_password: Some(String::new()),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["username"], "erin2");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(LoginRequest {
            email: "erin@example.com".to_string(),
            password: "erin-pass".to_string(),
        })
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
}

#[actix_web::test]
async fn test_contact_update_on_other_account_is_forbidden() {
    let (app, user_id, token) = setup_test!();
    let contact = ContactUpdate {
        street: "Elm St 5".to_string(),
        city: "Shelbyville".to_string(),
        phone: "555 0199".to_string(),
    };

    let req = test::TestRequest::put()
        .uri(&format!("/api/user/{user_id}/contact/update"))
        .insert_header(bearer(&token))
        .set_json(contact.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["user"]["city"], "Shelbyville");

    let req = test::TestRequest::put()
        .uri("/api/user/someone-else/contact/update")
        .insert_header(bearer(&token))
        .set_json(contact)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 403);
}
