//! Booking identifier generation.
//!
//! Identifiers are human-legible: one literal discriminator character, a
//! hyphen, then 8 characters drawn uniformly from `[A-Z0-9]`
//! (e.g. `5-K3QZ81MB`). Uniqueness is checked against the store through a
//! caller-supplied callback at the moment of issuance; the insert path
//! still has to treat a unique-constraint violation as a signal to
//! regenerate, since a concurrent booking can commit between the check and
//! the write.

use rand::Rng;

use crate::errors::{Error, Result};

/// Literal discriminator prefixed to every booking id.
pub const ID_DISCRIMINATOR: char = '5';

/// The fixed uppercase+digit alphabet.
const ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random characters per identifier.
const ID_SUFFIX_LEN: usize = 8;

/// Draw budget before giving up. 36^8 candidates make hitting this in
/// practice a sign of a broken store, not of bad luck.
const MAX_DRAWS: u32 = 1000;

/// Generator for store-unique booking identifiers.
#[derive(Debug, Default)]
pub struct BookingIdGenerator;

impl BookingIdGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produce an identifier that `exists` does not know at the moment of
    /// issuance.
    ///
    /// Draws candidates and redraws while the callback reports a
    /// collision; fails with [`Error::IdSpaceExhausted`] after the draw
    /// budget. Callback errors propagate unchanged.
    pub fn next<F>(&self, mut exists: F) -> Result<String>
    where
        F: FnMut(&str) -> Result<bool>,
    {
        for _ in 0..MAX_DRAWS {
            let candidate = self.draw();
            if !exists(&candidate)? {
                return Ok(candidate);
            }
            log::debug!("Booking id '{}' already taken, redrawing", candidate);
        }
        Err(Error::IdSpaceExhausted {
            attempts: MAX_DRAWS,
        })
    }

    fn draw(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut id = String::with_capacity(2 + ID_SUFFIX_LEN);
        id.push(ID_DISCRIMINATOR);
        id.push('-');
        for _ in 0..ID_SUFFIX_LEN {
            let index = rng.gen_range(0..ID_ALPHABET.len());
            id.push(ID_ALPHABET[index] as char);
        }
        id
    }

    /// Whether a string has the booking-id shape (`5-` + 8 chars from
    /// `[A-Z0-9]`).
    pub fn is_valid(id: &str) -> bool {
        let bytes = id.as_bytes();
        bytes.len() == 2 + ID_SUFFIX_LEN
            && bytes[0] == ID_DISCRIMINATOR as u8
            && bytes[1] == b'-'
            && bytes[2..].iter().all(|b| ID_ALPHABET.contains(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_match_the_pattern() {
        let generator = BookingIdGenerator::new();
        for _ in 0..100 {
            let id = generator.next(|_| Ok(false)).unwrap();
            assert!(BookingIdGenerator::is_valid(&id), "bad id {:?}", id);
        }
    }

    #[test]
    fn test_is_valid_rejects_wrong_shapes() {
        assert!(BookingIdGenerator::is_valid("5-K3QZ81MB"));
        assert!(!BookingIdGenerator::is_valid("5-K3QZ81M")); // too short
        assert!(!BookingIdGenerator::is_valid("5-K3QZ81MBX")); // too long
        assert!(!BookingIdGenerator::is_valid("6-K3QZ81MB")); // wrong discriminator
        assert!(!BookingIdGenerator::is_valid("5_K3QZ81MB")); // wrong separator
        assert!(!BookingIdGenerator::is_valid("5-k3qz81mb")); // lowercase
        assert!(!BookingIdGenerator::is_valid(""));
    }

    #[test]
    fn test_ten_thousand_ids_stay_unique_and_terminate() {
        let generator = BookingIdGenerator::new();
        let mut issued: HashSet<String> = HashSet::new();

        for _ in 0..10_000 {
            let id = generator.next(|candidate| Ok(issued.contains(candidate))).unwrap();
            assert!(issued.insert(id));
        }
        assert_eq!(issued.len(), 10_000);
    }

    #[test]
    fn test_redraws_past_seeded_collisions() {
        let generator = BookingIdGenerator::new();
        let mut collisions_left = 3;
        let id = generator
            .next(|_| {
                if collisions_left > 0 {
                    collisions_left -= 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            })
            .unwrap();
        assert!(BookingIdGenerator::is_valid(&id));
        assert_eq!(collisions_left, 0);
    }

    #[test]
    fn test_exhaustion_is_reported_not_looped() {
        let generator = BookingIdGenerator::new();
        let result = generator.next(|_| Ok(true));
        assert!(matches!(result, Err(Error::IdSpaceExhausted { attempts: 1000 })));
    }

    #[test]
    fn test_callback_errors_propagate() {
        let generator = BookingIdGenerator::new();
        let result = generator.next(|_| {
            Err(crate::errors::DatabaseError::QueryFailed("down".to_string()).into())
        });
        assert!(matches!(
            result,
            Err(Error::Database(crate::errors::DatabaseError::QueryFailed(_)))
        ));
    }
}
