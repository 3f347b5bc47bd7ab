//! Utilidades de validación
//!
//! Este módulo contiene las validaciones de dominio: placas brasileñas
//! (formato antiguo y Mercosur) y dígitos verificadores de CPF.

use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Formato antiguo: AAA9999
    static ref PLATE_LEGACY: Regex = Regex::new(r"^[A-Z]{3}[0-9]{4}$").unwrap();
    /// Formato Mercosur: AAA9A99
    static ref PLATE_MERCOSUL: Regex = Regex::new(r"^[A-Z]{3}[0-9][A-Z][0-9]{2}$").unwrap();
}

/// Normalizar una placa: mayúsculas, sin guiones ni espacios
pub fn normalize_plate(plate: &str) -> String {
    plate
        .trim()
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Verificar si una placa normalizada es válida en alguno de los dos formatos
pub fn is_valid_plate(plate: &str) -> bool {
    PLATE_LEGACY.is_match(plate) || PLATE_MERCOSUL.is_match(plate)
}

/// Validador de placa para el derive de `validator`
/// (la placa llega sin normalizar desde el request)
pub fn validate_plate(plate: &str) -> Result<(), ValidationError> {
    let normalized = normalize_plate(plate);
    if is_valid_plate(&normalized) {
        Ok(())
    } else {
        let mut error = ValidationError::new("plate_format");
        error.add_param("value".into(), &plate.to_string());
        error.add_param("expected".into(), &"AAA9999 | AAA9A99".to_string());
        Err(error)
    }
}

/// Validar los dígitos verificadores de un CPF (módulo 11).
/// Acepta el CPF con o sin puntuación.
pub fn is_valid_cpf(cpf: &str) -> bool {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }

    // CPFs con todos los dígitos iguales pasan el módulo 11 pero son inválidos
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, &d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let rest = (sum * 10) % 11;
        if rest == 10 {
            0
        } else {
            rest
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

/// Validador de CPF para el derive de `validator`
pub fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    if is_valid_cpf(cpf) {
        Ok(())
    } else {
        let mut error = ValidationError::new("cpf_checksum");
        error.add_param("value".into(), &cpf.to_string());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_legacy_format() {
        assert!(is_valid_plate("ABC1234"));
        assert!(is_valid_plate(&normalize_plate("abc-1234")));
    }

    #[test]
    fn test_plate_mercosul_format() {
        assert!(is_valid_plate("ABC1D23"));
        assert!(is_valid_plate(&normalize_plate("abc1d23")));
    }

    #[test]
    fn test_plate_invalid() {
        assert!(!is_valid_plate("ABCD123"));
        assert!(!is_valid_plate("AB12345"));
        assert!(!is_valid_plate("1234567"));
        assert!(!is_valid_plate(""));
        assert!(!is_valid_plate("ABC12345"));
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate(" abc-1d23 "), "ABC1D23");
        assert_eq!(normalize_plate("ABC 1234"), "ABC1234");
    }

    #[test]
    fn test_cpf_valid() {
        // CPF de ejemplo con dígitos verificadores correctos
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
    }

    #[test]
    fn test_cpf_invalid() {
        assert!(!is_valid_cpf("529.982.247-24"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("123"));
        assert!(!is_valid_cpf(""));
    }
}
