//! Modelos de dominio
//!
//! Structs que mapean a las tablas de la base y enums cerrados de
//! estado/tipo (ningún estado ilegal es representable).

pub mod history;
pub mod payment;
pub mod reservation;
pub mod spot;
pub mod vehicle;
