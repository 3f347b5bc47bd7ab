//! Modelo de ParkingSpot
//!
//! Una vaga física del estacionamiento. Las 70 vagas se crean una sola
//! vez en la inicialización y nunca se borran; solo mutan sus flags.
//! La ocupación es un cache derivado de la tabla de vehículos - el
//! sincronizador la recalcula antes de cualquier lectura sensible.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::vehicle::VehicleType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ParkingSpot {
    /// Id con prefijo + ordinal: "A-01".."A-50" autos, "M-01".."M-20" motos
    pub id: String,
    #[sqlx(try_from = "String")]
    pub spot_type: VehicleType,
    pub is_occupied: bool,
    pub is_reserved: bool,
    pub vehicle_id: Option<Uuid>,
    pub reservation_id: Option<Uuid>,
}
