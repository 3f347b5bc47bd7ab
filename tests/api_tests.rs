//! Tests de la capa HTTP: health check y mapeo de errores del dominio
//! a status codes. No requieren base de datos.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use parking_lot_api::config::environment::EnvironmentConfig;
use parking_lot_api::health_check;
use parking_lot_api::state::AppState;
use parking_lot_api::utils::errors::AppError;

fn test_router() -> Router {
    Router::new().route("/health", get(health_check))
}

fn test_config(environment: &str, cors_origins: Vec<String>) -> EnvironmentConfig {
    EnvironmentConfig {
        environment: environment.to_string(),
        port: 3000,
        host: "127.0.0.1".to_string(),
        cors_origins,
        mercadopago_access_token: None,
        mercadopago_base_url: "https://api.mercadopago.com".to_string(),
    }
}

/// Router completo con un pool perezoso: no abre ninguna conexión
/// mientras los tests no toquen la base
fn full_app(config: EnvironmentConfig) -> Router {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://postgres@localhost/parking_test")
        .expect("lazy pool");
    parking_lot_api::build_router(AppState::new(pool, config, None))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}

#[tokio::test]
async fn test_health_check() {
    let app = test_router();

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["service"], "parking-lot-api");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/no-such-route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_production_cors_allows_configured_origin() {
    let app = full_app(test_config(
        "production",
        vec!["http://app.example.com".to_string()],
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://app.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://app.example.com")
    );
}

#[tokio::test]
async fn test_production_cors_rejects_unknown_origin() {
    let app = full_app(test_config(
        "production",
        vec!["http://app.example.com".to_string()],
    ));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // La request responde pero sin header de CORS para ese origen
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_none());
}

#[tokio::test]
async fn test_development_cors_is_permissive() {
    let app = full_app(test_config("development", vec![]));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get("access-control-allow-origin")
        .is_some());
}

#[tokio::test]
async fn test_capacity_exceeded_maps_to_conflict() {
    let response =
        AppError::CapacityExceeded("No free car spots available".to_string()).into_response();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["code"], "CAPACITY_EXCEEDED");
}

#[tokio::test]
async fn test_duplicate_vehicle_maps_to_conflict() {
    let response = AppError::DuplicateActiveVehicle("ABC1234".to_string()).into_response();

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["code"], "DUPLICATE_ACTIVE_VEHICLE");
    assert!(body["message"].as_str().unwrap().contains("ABC1234"));
}

#[tokio::test]
async fn test_not_found_maps_to_404() {
    let response = AppError::NotFound("Reservation not found".to_string()).into_response();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invalid_state_maps_to_unprocessable() {
    let response = AppError::InvalidState("already cancelled".to_string()).into_response();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_payment_not_approved_maps_to_402() {
    let response = AppError::PaymentNotApproved("gateway says pending".to_string()).into_response();

    assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);

    let body = body_json(response).await;
    assert_eq!(body["code"], "PAYMENT_NOT_APPROVED");
}

#[tokio::test]
async fn test_gateway_error_maps_to_bad_gateway() {
    let response = AppError::Gateway("timeout".to_string()).into_response();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["code"], "GATEWAY_ERROR");
}

#[tokio::test]
async fn test_validation_error_maps_to_bad_request() {
    use parking_lot_api::utils::errors::validation_error;

    let response = validation_error("plate", "invalid Brazilian plate format").into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
