//! Driveline Core Crate
//!
//! Booking core for the Driveline test-drive backend: store-unique
//! identifier generation and the booking create/list flow, built on the
//! layered resolver from `driveline-geocode`.
//!
//! The HTTP surface and the real persistent store are external
//! collaborators; this crate exposes the traits they plug into
//! ([`BookingRepositoryTrait`], [`BookingServiceTrait`]) plus an
//! in-process repository for tests and store-less operation.

pub mod bookings;
pub mod errors;

pub use bookings::{
    Booking, BookingIdGenerator, BookingRepositoryTrait, BookingService, BookingServiceTrait,
    InMemoryBookingRepository, NewBooking,
};
pub use errors::{DatabaseError, Error, Result};
