//! Middleware de la aplicación

pub mod cors;
