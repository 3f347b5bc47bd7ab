//! Cálculo de tarifas
//!
//! Tarifa por minuto derivada de la tarifa horaria fija por tipo de
//! vehículo, con un piso de R$ 1,00. El monto se calcula y persiste
//! siempre como Decimal con punto; el formato con coma es presentación.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::vehicle::VehicleType;

const MINUTES_PER_HOUR: i64 = 60;

/// Piso de cobro: ninguna estadía paga menos de 1.00
fn minimum_fee() -> Decimal {
    Decimal::new(100, 2)
}

/// Tarifa horaria fija por tipo - configuración, no derivada
pub fn hourly_rate(vehicle_type: VehicleType) -> Decimal {
    match vehicle_type {
        VehicleType::Car => Decimal::new(1000, 2),       // 10.00/h
        VehicleType::Motorcycle => Decimal::new(700, 2), // 7.00/h
    }
}

/// Minutos transcurridos entre entrada y salida, clampeados a >= 0
/// para que un reloj desfasado nunca produzca una tarifa negativa
pub fn elapsed_minutes(entry_time: DateTime<Utc>, exit_time: DateTime<Utc>) -> i64 {
    (exit_time - entry_time).num_minutes().max(0)
}

/// Calcular la tarifa de una estadía cerrada.
///
/// amount = max(minutos x tarifa_por_minuto, 1.00), redondeado a 2 decimales.
pub fn compute_fee(
    entry_time: DateTime<Utc>,
    exit_time: DateTime<Utc>,
    vehicle_type: VehicleType,
) -> Decimal {
    let minutes = elapsed_minutes(entry_time, exit_time);
    let raw = (Decimal::from(minutes) * hourly_rate(vehicle_type)
        / Decimal::from(MINUTES_PER_HOUR))
    .round_dp(2);

    if raw < minimum_fee() {
        minimum_fee()
    } else {
        raw
    }
}

/// Tarifa estimada de una estadía en curso, contra el instante actual.
/// Solo para mostrar - nunca se persiste.
pub fn estimate_fee(entry_time: DateTime<Utc>, vehicle_type: VehicleType) -> Decimal {
    compute_fee(entry_time, Utc::now(), vehicle_type)
}

/// Tarifa de una reserva: tarifa horaria x horas reservadas
pub fn reservation_fee(vehicle_type: VehicleType, duration_hours: i32) -> Decimal {
    hourly_rate(vehicle_type) * Decimal::from(duration_hours)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, hour, minute, second).unwrap()
    }

    #[test]
    fn test_short_stay_hits_floor() {
        // 5 minutos de auto: 5 x 10/60 = 0.83 -> piso de 1.00
        let fee = compute_fee(at(10, 0, 0), at(10, 5, 0), VehicleType::Car);
        assert_eq!(fee, Decimal::new(100, 2));
    }

    #[test]
    fn test_three_hour_stay() {
        // 180 minutos de auto: 180 x 10/60 = 30.00
        let fee = compute_fee(at(10, 0, 0), at(13, 0, 0), VehicleType::Car);
        assert_eq!(fee, Decimal::new(3000, 2));
    }

    #[test]
    fn test_motorcycle_rate() {
        // 120 minutos de moto: 120 x 7/60 = 14.00
        let fee = compute_fee(at(8, 0, 0), at(10, 0, 0), VehicleType::Motorcycle);
        assert_eq!(fee, Decimal::new(1400, 2));
    }

    #[test]
    fn test_zero_and_negative_elapsed_clamped() {
        let entry = at(10, 0, 0);
        assert_eq!(compute_fee(entry, entry, VehicleType::Car), Decimal::new(100, 2));
        // Clock skew: salida "antes" de la entrada nunca da tarifa negativa
        let skewed_exit = entry - Duration::minutes(30);
        assert_eq!(
            compute_fee(entry, skewed_exit, VehicleType::Car),
            Decimal::new(100, 2)
        );
    }

    #[test]
    fn test_monotonically_non_decreasing() {
        let entry = at(10, 0, 0);
        let mut previous = Decimal::ZERO;
        for minutes in 0..600 {
            let fee = compute_fee(entry, entry + Duration::minutes(minutes), VehicleType::Car);
            assert!(fee >= previous, "fee decreased at minute {}", minutes);
            previous = fee;
        }
    }

    #[test]
    fn test_exact_value_above_floor() {
        // 7 minutos de auto: 7 x 10/60 = 1.17 (redondeado), ya sobre el piso
        let fee = compute_fee(at(10, 0, 0), at(10, 7, 0), VehicleType::Car);
        assert_eq!(fee, Decimal::new(117, 2));
    }

    #[test]
    fn test_reservation_fee() {
        // 2 horas de moto: 7 x 2 = 14.00
        assert_eq!(
            reservation_fee(VehicleType::Motorcycle, 2),
            Decimal::new(1400, 2)
        );
        assert_eq!(reservation_fee(VehicleType::Car, 12), Decimal::new(12000, 2));
    }
}
