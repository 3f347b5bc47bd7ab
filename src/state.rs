//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El pool y el gateway se inyectan acá
//! explícitamente - ningún handle global.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::mercado_pago_service::{PaymentGateway, UnconfiguredGateway};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    /// Sin token de Mercado Pago el gateway es un stub que falla solo
    /// al intentar cobrar; el resto de la API sigue operativa
    gateway: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        config: EnvironmentConfig,
        gateway: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        Self {
            pool,
            config,
            gateway: gateway.unwrap_or_else(|| Arc::new(UnconfiguredGateway)),
        }
    }

    pub fn gateway(&self) -> Arc<dyn PaymentGateway> {
        self.gateway.clone()
    }
}
