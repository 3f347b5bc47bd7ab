//! Controllers
//!
//! Orquestación fina entre DTOs, servicios y repositorios. La lógica
//! de negocio vive en services; acá solo se valida y se traduce.

pub mod dashboard_controller;
pub mod payment_controller;
pub mod reservation_controller;
pub mod vehicle_controller;
