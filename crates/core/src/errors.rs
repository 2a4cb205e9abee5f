//! Core error types for the Driveline booking backend.
//!
//! This module defines database-agnostic error types. Storage-specific
//! errors are converted to these types by whichever repository
//! implementation is wired in.

use thiserror::Error;

use driveline_geocode::GeocodeError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the booking core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Geocode operation failed: {0}")]
    Geocode(#[from] GeocodeError),

    /// The identifier generator exhausted its draw budget. Should not
    /// occur in practice (36^8 space); indicates a deeper store problem.
    #[error("Booking identifier space exhausted after {attempts} draws")]
    IdSpaceExhausted { attempts: u32 },

    /// Creating a booking kept colliding on the store's unique constraint
    /// even after regenerating identifiers.
    #[error("Failed to create booking after {attempts} attempts")]
    BookingCreateFailed { attempts: u32 },

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Database-agnostic error type for storage operations.
///
/// Repository implementations convert their storage-specific errors into
/// this format; a unique-constraint violation is signaled distinctly
/// because the booking-create flow recovers from it.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A unique constraint was violated (e.g., duplicate booking id).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Failed to reach the store.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
