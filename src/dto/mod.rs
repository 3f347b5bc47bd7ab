//! DTOs de la API
//!
//! Structs de request/response por recurso. La validación vive en el
//! borde: los requests llevan derive de `validator` y el core recibe
//! datos ya tipados.

pub mod common;
pub mod dashboard_dto;
pub mod payment_dto;
pub mod reservation_dto;
pub mod vehicle_dto;
