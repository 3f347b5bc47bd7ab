//! Services module
//!
//! Este módulo contiene la lógica de negocio: asignación de vagas,
//! cálculo de tarifas, ciclo de vida de reservas, operaciones de patio
//! y la integración con el gateway de pagos.

pub mod dashboard_service;
pub mod fee_calculator;
pub mod mercado_pago_service;
pub mod parking_service;
pub mod reservation_service;
pub mod spot_allocator;
