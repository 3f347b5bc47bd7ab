//! Asignación de vagas y sincronización de ocupación
//!
//! La política de asignación es determinista: siempre la vaga libre de
//! menor ordinal (no round-robin, no random), para que la reutilización
//! sea predecible y testeable.
//!
//! La tabla de vehículos es la única fuente de verdad de la ocupación;
//! la tabla de vagas es un cache derivado que puede driftear (crashes,
//! escrituras parciales, ediciones manuales). `synchronize` es la pasada
//! de reconciliación y debe correr antes de cualquier lectura que
//! necesite un snapshot consistente (dashboard, mapa de vagas). Es
//! idempotente, así que una sobreescritura parcial queda para la
//! próxima pasada.

use std::collections::{HashMap, HashSet};

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::vehicle::{VehicleStatus, VehicleType};
use crate::utils::errors::{AppError, AppResult};

/// Cantidad fija de vagas por tipo - se crean una vez y nunca cambian
pub const CAR_CAPACITY: u32 = 50;
pub const MOTORCYCLE_CAPACITY: u32 = 20;

/// Capacidad total del estacionamiento
pub const TOTAL_CAPACITY: u32 = CAR_CAPACITY + MOTORCYCLE_CAPACITY;

/// Prefijo del id de vaga por tipo
pub fn spot_prefix(vehicle_type: VehicleType) -> &'static str {
    match vehicle_type {
        VehicleType::Car => "A",
        VehicleType::Motorcycle => "M",
    }
}

pub fn capacity(vehicle_type: VehicleType) -> u32 {
    match vehicle_type {
        VehicleType::Car => CAR_CAPACITY,
        VehicleType::Motorcycle => MOTORCYCLE_CAPACITY,
    }
}

/// Construir el id de vaga: prefijo + ordinal de dos dígitos ("A-01")
pub fn spot_id(vehicle_type: VehicleType, ordinal: u32) -> String {
    format!("{}-{:02}", spot_prefix(vehicle_type), ordinal)
}

/// Seleccionar la vaga libre de menor ordinal para el tipo dado.
///
/// Recorre el rango fijo en orden ascendente y devuelve el primer id
/// que no esté en el conjunto ocupado. Falla con CapacityExceeded
/// cuando todas las vagas del tipo están tomadas.
pub fn first_free_spot(
    vehicle_type: VehicleType,
    occupied: &HashSet<String>,
) -> AppResult<String> {
    for ordinal in 1..=capacity(vehicle_type) {
        let candidate = spot_id(vehicle_type, ordinal);
        if !occupied.contains(&candidate) {
            return Ok(candidate);
        }
    }

    Err(AppError::CapacityExceeded(format!(
        "No free {} spots available",
        vehicle_type
    )))
}

/// Derivar el mapa {vaga -> vehículo} a partir de los vehículos estacionados
pub fn derive_occupancy(parked: &[(Uuid, String)]) -> HashMap<String, Uuid> {
    parked
        .iter()
        .map(|(vehicle_id, spot_id)| (spot_id.clone(), *vehicle_id))
        .collect()
}

/// Reclamar una vaga con un UPDATE condicional dentro de la transacción
/// de entrada. Devuelve false si otra entrada concurrente ganó la vaga
/// entre la lectura del candidato y el claim (el caller reintenta con
/// el siguiente ordinal). Esto cierra la carrera de doble asignación:
/// el claim es atómico del lado del storage.
pub async fn claim_spot(
    tx: &mut Transaction<'_, Postgres>,
    spot_id: &str,
    vehicle_id: Uuid,
) -> AppResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE parking_spots
        SET is_occupied = TRUE, vehicle_id = $2
        WHERE id = $1 AND is_occupied = FALSE
        "#,
    )
    .bind(spot_id)
    .bind(vehicle_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Asignar y reclamar una vaga libre dentro de la transacción de entrada.
///
/// Las vagas reservadas cuentan como bloqueadas para una entrada sin
/// reserva; una reserva activándose reclama su vaga pre-reservada por
/// el camino de `claim_spot` directo.
pub async fn allocate_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    vehicle_type: VehicleType,
    vehicle_id: Uuid,
) -> AppResult<String> {
    let blocked: Vec<(String,)> = sqlx::query_as(
        "SELECT id FROM parking_spots WHERE spot_type = $1 AND (is_occupied = TRUE OR is_reserved = TRUE)",
    )
    .bind(vehicle_type.as_str())
    .fetch_all(&mut **tx)
    .await?;

    let mut occupied: HashSet<String> = blocked.into_iter().map(|(id,)| id).collect();

    loop {
        let candidate = first_free_spot(vehicle_type, &occupied)?;
        if claim_spot(tx, &candidate, vehicle_id).await? {
            return Ok(candidate);
        }
        // Otra entrada ganó esta vaga; seguir con el próximo ordinal
        occupied.insert(candidate);
    }
}

/// Recalcular la ocupación de todas las vagas a partir de los vehículos
/// con status=parked, sobreescribiendo lo que hubiera. No genera entrada
/// de histórico: es una corrección, no una operación.
pub async fn synchronize(pool: &PgPool) -> AppResult<()> {
    let parked: Vec<(Uuid, String)> =
        sqlx::query_as("SELECT id, spot_id FROM vehicles WHERE status = $1")
            .bind(VehicleStatus::Parked.as_str())
            .fetch_all(pool)
            .await?;

    let occupancy = derive_occupancy(&parked);

    sqlx::query("UPDATE parking_spots SET is_occupied = FALSE, vehicle_id = NULL")
        .execute(pool)
        .await?;

    for (spot_id, vehicle_id) in &occupancy {
        sqlx::query("UPDATE parking_spots SET is_occupied = TRUE, vehicle_id = $2 WHERE id = $1")
            .bind(spot_id)
            .bind(vehicle_id)
            .execute(pool)
            .await?;
    }

    tracing::debug!(
        "🔄 Ocupación sincronizada: {} vagas ocupadas de {}",
        occupancy.len(),
        TOTAL_CAPACITY
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_allocates_first_ordinal() {
        let occupied = HashSet::new();
        assert_eq!(
            first_free_spot(VehicleType::Car, &occupied).unwrap(),
            "A-01"
        );
        assert_eq!(
            first_free_spot(VehicleType::Motorcycle, &occupied).unwrap(),
            "M-01"
        );
    }

    #[test]
    fn test_lowest_free_ordinal_wins() {
        let occupied: HashSet<String> =
            ["A-01", "A-02", "A-04"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            first_free_spot(VehicleType::Car, &occupied).unwrap(),
            "A-03"
        );
    }

    #[test]
    fn test_only_last_spot_remaining() {
        // A-01..A-49 ocupadas: queda exactamente A-50
        let occupied: HashSet<String> =
            (1..=49).map(|n| spot_id(VehicleType::Car, n)).collect();
        assert_eq!(
            first_free_spot(VehicleType::Car, &occupied).unwrap(),
            "A-50"
        );
    }

    #[test]
    fn test_full_section_exceeds_capacity() {
        let occupied: HashSet<String> =
            (1..=CAR_CAPACITY).map(|n| spot_id(VehicleType::Car, n)).collect();
        let err = first_free_spot(VehicleType::Car, &occupied).unwrap_err();
        assert!(matches!(err, AppError::CapacityExceeded(_)));
    }

    #[test]
    fn test_motorcycle_section_independent_of_cars() {
        // Toda la sección de autos llena no afecta a las motos
        let occupied: HashSet<String> =
            (1..=CAR_CAPACITY).map(|n| spot_id(VehicleType::Car, n)).collect();
        assert_eq!(
            first_free_spot(VehicleType::Motorcycle, &occupied).unwrap(),
            "M-01"
        );
    }

    #[test]
    fn test_reserved_spot_blocked_for_walk_in() {
        // Una vaga pre-reservada entra al conjunto bloqueado igual que
        // una ocupada: la entrada sin reserva salta al siguiente ordinal
        let blocked: HashSet<String> = ["A-01"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            first_free_spot(VehicleType::Car, &blocked).unwrap(),
            "A-02"
        );
    }

    #[test]
    fn test_spot_id_format() {
        assert_eq!(spot_id(VehicleType::Car, 1), "A-01");
        assert_eq!(spot_id(VehicleType::Car, 50), "A-50");
        assert_eq!(spot_id(VehicleType::Motorcycle, 9), "M-09");
        assert_eq!(spot_id(VehicleType::Motorcycle, 20), "M-20");
    }

    #[test]
    fn test_derive_occupancy() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let parked = vec![(a, "A-05".to_string()), (b, "M-02".to_string())];

        let occupancy = derive_occupancy(&parked);
        assert_eq!(occupancy.len(), 2);
        assert_eq!(occupancy.get("A-05"), Some(&a));
        assert_eq!(occupancy.get("M-02"), Some(&b));
        assert_eq!(occupancy.get("A-01"), None);
    }

    #[test]
    fn test_derive_occupancy_is_idempotent() {
        let parked = vec![(Uuid::new_v4(), "A-01".to_string())];
        assert_eq!(derive_occupancy(&parked), derive_occupancy(&parked));
    }
}
