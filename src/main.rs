use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};

use parking_lot_api::config::environment::EnvironmentConfig;
use parking_lot_api::database;
use parking_lot_api::services::mercado_pago_service::{MercadoPagoService, PaymentGateway};
use parking_lot_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🅿️  Parking Lot API - Gestión de estacionamiento");
    info!("================================================");

    let config = EnvironmentConfig::default();

    // Inicializar base de datos
    let pool = match database::connection::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Crear tablas y seedear las 70 vagas
    if let Err(e) = database::schema::initialize(&pool).await {
        error!("❌ Error inicializando el schema: {}", e);
        return Err(anyhow::anyhow!("Error de schema: {}", e));
    }

    // Gateway de pagos (opcional: sin token solo fallan los cobros)
    let gateway: Option<Arc<dyn PaymentGateway>> = match MercadoPagoService::new(&config) {
        Ok(service) => {
            info!("✅ Mercado Pago configurado");
            Some(Arc::new(service))
        }
        Err(e) => {
            error!("⚠️ Mercado Pago no configurado: {}", e);
            None
        }
    };

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone(), gateway);
    let app = parking_lot_api::build_router(app_state);

    // Puerto del servidor
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🚗 Vehículos:");
    info!("   POST /api/vehicle/entry - Registrar entrada");
    info!("   POST /api/vehicle/:id/exit - Procesar salida");
    info!("   GET  /api/vehicle - Listar vehículos");
    info!("   GET  /api/vehicle/:id - Obtener vehículo");
    info!("🅿️  Vagas y dashboard:");
    info!("   GET  /api/spot - Mapa de vagas (sincroniza primero)");
    info!("   GET  /api/dashboard/stats - Estadísticas");
    info!("   GET  /api/history - Histórico de operaciones");
    info!("📅 Reservas:");
    info!("   POST /api/reservation - Crear reserva");
    info!("   GET  /api/reservation - Listar reservas");
    info!("   GET  /api/reservation/:id - Obtener reserva");
    info!("   DELETE /api/reservation/:id - Cancelar reserva");
    info!("💳 Pagos:");
    info!("   POST /api/reservation/:id/payment/pix - Crear pago PIX");
    info!("   POST /api/reservation/:id/payment/card - Cobro con tarjeta");
    info!("   POST /api/reservation/:id/payment/confirm - Confirmar pago");
    info!("   GET  /api/payment/:id/status - Consultar estado del pago");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
