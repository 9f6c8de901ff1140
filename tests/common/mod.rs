#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::{test, web};
use chrono::Duration;
use serde_json::json;
use todoforge::auth::{AuthResponse, TokenService};
use todoforge::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Builds the full application over `$state` the same way `main` does, minus CORS.
macro_rules! init_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state.clone())
                .wrap(actix_web::middleware::Logger::default())
                .configure(todoforge::routes::config),
        )
        .await
    };
}

/// Fresh in-memory state. bcrypt runs at its minimum cost to keep tests fast.
pub fn test_state() -> web::Data<AppState> {
    web::Data::new(AppState::in_memory(
        TokenService::new(TEST_SECRET, Duration::hours(24)),
        4,
    ))
}

// Helper struct to hold auth details
pub struct TestUser {
    pub id: i32,
    pub token: String,
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    email: &str,
    password: &str,
) -> TestUser {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        StatusCode::CREATED,
        "Failed to register {}. Body: {}",
        username,
        String::from_utf8_lossy(&body)
    );

    let auth: AuthResponse =
        serde_json::from_slice(&body).expect("Failed to parse registration response");
    TestUser {
        id: auth.user.id,
        token: auth.token,
    }
}

/// Sends `req` and returns the status with the JSON body.
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, serde_json::Value) {
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = serde_json::from_slice(&body).unwrap_or_else(|_| {
        panic!(
            "Response is not JSON. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        )
    });
    (status, json)
}
