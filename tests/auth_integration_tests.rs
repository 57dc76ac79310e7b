use actix_web::{App, test, web};
use food_store_api::domain::user::{LoginRequest, OAuthProfile, RegisterRequest};
use food_store_api::presentation::handlers::AppState;
use food_store_api::presentation::middleware::JwtAuthMiddleware;
use food_store_api::presentation::routes::configure;
use rust_decimal::Decimal;

const BRIDGE_SECRET: &str = "bridge-secret-for-tests";

macro_rules! setup_auth_test {
    () => {{
        let jwt_secret = "test-secret-key-for-auth-tests".to_string();
        let state = web::Data::new(AppState::in_memory(
            jwt_secret.clone(),
            3600,
            Decimal::TWO,
            Some(BRIDGE_SECRET.to_string()),
        ));

        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .wrap(JwtAuthMiddleware::new(jwt_secret))
                .configure(configure),
        )
        .await;

        app
    }};
}

fn registration(email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: "flow".to_string(),
        email: email.to_string(),
        street: "Main St 1".to_string(),
        city: "Springfield".to_string(),
        phone: "555 0100".to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
    }
}

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[actix_web::test]
async fn test_full_registration_login_flow() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("flow@example.com", "password123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let resp: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(resp["user"]["email"], "flow@example.com");
    assert_eq!(resp["user"]["role"], "USER");
    assert_eq!(resp["user"]["login"], "CREDENTIALS");
    assert!(resp["user"].get("passwordHash").is_none());
    let user_id = resp["user"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(login("flow@example.com", "password123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let resp: serde_json::Value = test::read_body_json(resp).await;
    let token = resp["session"]["accessToken"].as_str().unwrap();
    assert_eq!(resp["session"]["user"]["id"], user_id.as_str());

    // The token opens the profile route
    let req = test::TestRequest::get()
        .uri("/api/user/profile")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let resp: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(resp["profile"]["id"], user_id.as_str());
    assert_eq!(resp["profile"]["city"], "Springfield");
}

#[actix_web::test]
async fn test_register_duplicate_email() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("dup@example.com", "password123"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 201);

    // Email lookup ignores case
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("DUP@example.com", "password456"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
    let resp: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(resp["message"], "User already exist");
}

#[actix_web::test]
async fn test_register_rejects_invalid_form() {
    let app = setup_auth_test!();

    let mut mismatched = registration("bad@example.com", "password123");
    mismatched.confirm_password = "password999".to_string();
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(mismatched)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("not-an-email", "password123"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("short@example.com", "abc"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 400);
}

#[actix_web::test]
async fn test_login_wrong_password() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(registration("wrong@example.com", "correctpassword"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(login("wrong@example.com", "wrongpassword"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_login_nonexistent_user() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(login("nobody@example.com", "password123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

fn google_profile() -> OAuthProfile {
    OAuthProfile {
        sub: "google-sub-42".to_string(),
        name: "Gina".to_string(),
        email: "gina@example.com".to_string(),
        image: Some("https://example.com/gina.png".to_string()),
    }
}

#[actix_web::test]
async fn test_oauth_requires_bridge_secret() {
    let app = setup_auth_test!();

    let req = test::TestRequest::post()
        .uri("/api/auth/oauth/google")
        .set_json(google_profile())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);

    let req = test::TestRequest::post()
        .uri("/api/auth/oauth/google")
        .insert_header(("x-provider-secret", "guess"))
        .set_json(google_profile())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}

#[actix_web::test]
async fn test_oauth_creates_provider_account_once() {
    let app = setup_auth_test!();

    let mut ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/auth/oauth/google")
            .insert_header(("x-provider-secret", BRIDGE_SECRET))
            .set_json(google_profile())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let resp: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(resp["session"]["user"]["login"], "GOOGLE");
        assert!(resp["session"]["accessToken"].as_str().is_some());
        ids.push(resp["session"]["user"]["id"].as_str().unwrap().to_string());
    }
    assert_eq!(ids[0], "google-sub-42");
    assert_eq!(ids[0], ids[1]);

    // Provider accounts carry no password
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(login("gina@example.com", "anything"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 401);
}
