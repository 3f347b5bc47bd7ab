//! Repositorios
//!
//! Acceso a datos estilo colección: un repositorio por tabla, con el
//! pool inyectado por el caller (sin singletons globales).

pub mod history_repository;
pub mod payment_repository;
pub mod reservation_repository;
pub mod spot_repository;
pub mod vehicle_repository;
