//! Parking Lot API
//!
//! Gestión de estacionamiento: entrada/salida de vehículos, asignación
//! de vagas, tarifas, reservas y cobro vía Mercado Pago (PIX/tarjeta).

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;

use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

/// Construir el router completo de la aplicación. En producción el
/// CORS se restringe a los orígenes configurados; en desarrollo es
/// permisivo.
pub fn build_router(app_state: AppState) -> Router {
    let cors = if app_state.config.is_production() {
        cors_middleware_with_origins(app_state.config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/vehicle", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/spot", routes::dashboard_routes::create_spot_router())
        .nest("/api/dashboard", routes::dashboard_routes::create_dashboard_router())
        .nest("/api/reservation", routes::reservation_routes::create_reservation_router())
        .nest("/api/payment", routes::payment_routes::create_payment_router())
        .nest("/api/history", routes::dashboard_routes::create_history_router())
        .layer(cors)
        .with_state(app_state)
}

/// Health check simple
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "parking-lot-api",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
