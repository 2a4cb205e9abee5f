//! Deterministic local grid codec - the terminal resolver tier.
//!
//! Quantizes each axis onto a 0.001-degree grid and packs the two indices
//! into an 8-digit code. Total for valid coordinates, requires no I/O, and
//! is safe to call concurrently without synchronization.
//!
//! The quantization is lossy by design: decoding returns the grid cell's
//! lower-left corner, and because each 4-digit field wraps modulo 10000 the
//! grid has a 10-degree period per axis, so the decoded point is the
//! canonical representative of the wrapped cell (latitude in [-90, -80),
//! longitude in [-180, -170)). Re-encoding a decoded point always
//! reproduces the same code.

use crate::errors::GeocodeError;
use crate::models::{Coordinate, LocationCode};

/// Grid cells per degree (0.001-degree resolution).
const GRID_SCALE: f64 = 1000.0;

/// Each axis index is a 4-digit zero-padded decimal field.
const FIELD_MOD: i64 = 10_000;

/// Digits per axis field.
const FIELD_WIDTH: usize = 4;

/// Nudge applied before flooring so inputs sitting exactly on a cell
/// boundary are not pushed into the previous cell by binary representation
/// error. Far below the grid step, far above f64 error at this magnitude.
const INDEX_EPSILON: f64 = 1e-9;

/// Separator inserted every `GROUP_LEN` characters of the packed code.
const SEPARATOR: char = '-';
const GROUP_LEN: usize = 3;

/// The deterministic coordinate/code grid codec.
pub struct GridCodec;

impl GridCodec {
    /// Encode a validated coordinate into a grid code.
    ///
    /// Truncating (floor) quantization; never fails for a valid coordinate.
    pub fn encode(coordinate: &Coordinate) -> LocationCode {
        let lat_index = Self::axis_index(coordinate.latitude, 90.0);
        let lng_index = Self::axis_index(coordinate.longitude, 180.0);

        let digits = format!(
            "{:0width$}{:0width$}",
            lat_index,
            lng_index,
            width = FIELD_WIDTH
        );
        Self::group(&digits)
    }

    /// Decode a grid code back into the canonical corner of its cell.
    ///
    /// Separators are stripped; anything other than exactly 8 decimal
    /// digits is rejected as [`GeocodeError::MalformedCode`].
    pub fn decode(code: &str) -> Result<Coordinate, GeocodeError> {
        let digits: String = code
            .trim()
            .chars()
            .filter(|c| *c != SEPARATOR)
            .collect();

        if digits.len() != 2 * FIELD_WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(GeocodeError::MalformedCode(code.to_string()));
        }

        // The length/digit check above guarantees both fields parse.
        let lat_index: i64 = digits[..FIELD_WIDTH]
            .parse()
            .map_err(|_| GeocodeError::MalformedCode(code.to_string()))?;
        let lng_index: i64 = digits[FIELD_WIDTH..]
            .parse()
            .map_err(|_| GeocodeError::MalformedCode(code.to_string()))?;

        let latitude = lat_index as f64 / GRID_SCALE - 90.0;
        let longitude = lng_index as f64 / GRID_SCALE - 180.0;
        Coordinate::new(latitude, longitude)
    }

    fn axis_index(value: f64, offset: f64) -> i64 {
        let scaled = (value + offset) * GRID_SCALE;
        (scaled + INDEX_EPSILON).floor() as i64 % FIELD_MOD
    }

    fn group(digits: &str) -> String {
        let mut grouped = String::with_capacity(digits.len() + digits.len() / GROUP_LEN);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && i % GROUP_LEN == 0 {
                grouped.push(SEPARATOR);
            }
            grouped.push(c);
        }
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate::new(latitude, longitude).unwrap()
    }

    #[test]
    fn test_mumbai_vector() {
        // lat index: floor((19.0760 + 90) * 1000) mod 10000 = 9076
        // lng index: floor((72.8777 + 180) * 1000) mod 10000 = 2877
        let code = GridCodec::encode(&coord(19.0760, 72.8777));
        assert_eq!(code, "907-628-77");
    }

    #[test]
    fn test_truncation_not_rounding() {
        // 72.8777 scales to 252877.7; truncation keeps 2877, rounding
        // would give 2878.
        let code = GridCodec::encode(&coord(19.0760, 72.8777));
        assert!(code.ends_with("77"));

        // -89.9995 scales to 0.5 on the latitude axis; truncation gives 0.
        let code = GridCodec::encode(&coord(-89.9995, -180.0));
        assert_eq!(code, "000-000-00");
    }

    #[test]
    fn test_code_shape() {
        let code = GridCodec::encode(&coord(0.0, 0.0));
        assert_eq!(code.len(), 10);
        assert_eq!(&code[3..4], "-");
        assert_eq!(&code[7..8], "-");
        assert!(code
            .chars()
            .all(|c| c.is_ascii_digit() || c == '-'));
    }

    #[test]
    fn test_decode_accepts_grouped_and_plain() {
        let grouped = GridCodec::decode("907-628-77").unwrap();
        let plain = GridCodec::decode("90762877").unwrap();
        assert_eq!(grouped, plain);
    }

    #[test]
    fn test_decode_inverts_the_grid_formula() {
        let position = GridCodec::decode("907-628-77").unwrap();
        assert!((position.latitude - (-80.924)).abs() < 1e-9);
        assert!((position.longitude - (-177.123)).abs() < 1e-9);
    }

    #[test]
    fn test_decode_rejects_malformed() {
        for bad in ["", "1234567", "123456789", "907-62A-77", "12 345 678", "???"] {
            assert!(
                matches!(GridCodec::decode(bad), Err(GeocodeError::MalformedCode(_))),
                "expected MalformedCode for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_round_trip_in_principal_band() {
        // Within the principal band the grid does not wrap, so the decoded
        // corner is within one cell (0.001 degree) of the input.
        for (lat, lng) in [
            (-85.1234, -175.5678),
            (-89.9999, -179.9999),
            (-80.0015, -170.0019),
        ] {
            let decoded = GridCodec::decode(&GridCodec::encode(&coord(lat, lng))).unwrap();
            assert!((decoded.latitude - lat).abs() <= 0.001, "lat {}", lat);
            assert!((decoded.longitude - lng).abs() <= 0.001, "lng {}", lng);
        }
    }

    #[test]
    fn test_encode_decode_encode_is_idempotent() {
        // Outside the principal band decode returns the wrapped
        // representative, but re-encoding it always reproduces the code.
        for (lat, lng) in [
            (19.0760, 72.8777),
            (0.0, 0.0),
            (90.0, 180.0),
            (47.6062, -122.3321),
            (-33.8688, 151.2093),
        ] {
            let code = GridCodec::encode(&coord(lat, lng));
            let decoded = GridCodec::decode(&code).unwrap();
            assert_eq!(GridCodec::encode(&decoded), code, "({}, {})", lat, lng);
        }
    }

    #[test]
    fn test_wrap_period_is_ten_degrees() {
        // Indices wrap modulo 10000 cells = 10 degrees per axis.
        let a = GridCodec::encode(&coord(-80.5, -170.5));
        let b = GridCodec::encode(&coord(-70.5, -160.5));
        assert_eq!(a, b);
    }

    #[test]
    fn test_boundary_coordinates_encode() {
        // Exact range ends stay in their own cells.
        assert_eq!(GridCodec::encode(&coord(-90.0, -180.0)), "000-000-00");
        // +90 scales to 180000 which wraps to index 0000.
        assert_eq!(GridCodec::encode(&coord(90.0, 180.0)), "000-000-00");
    }
}
