//! Base de datos: pool de conexiones e inicialización del schema

pub mod connection;
pub mod schema;
