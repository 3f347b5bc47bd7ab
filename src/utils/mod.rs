//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y
//! validaciones de dominio (placas, CPF).

pub mod errors;
pub mod validation;
