//! Booking domain: models, repository/service traits, identifier
//! generation, and the create/list flow.

pub mod bookings_model;
pub mod bookings_service;
pub mod bookings_traits;
pub mod id_generator;
pub mod memory_repository;

pub use bookings_model::{Booking, NewBooking};
pub use bookings_service::BookingService;
pub use bookings_traits::{BookingRepositoryTrait, BookingServiceTrait};
pub use id_generator::{BookingIdGenerator, ID_DISCRIMINATOR};
pub use memory_repository::InMemoryBookingRepository;
