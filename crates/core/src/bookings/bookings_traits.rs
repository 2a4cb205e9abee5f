use async_trait::async_trait;

use crate::bookings::bookings_model::{Booking, NewBooking};
use crate::errors::Result;

/// Trait for booking repository operations.
///
/// The persistent store is an external collaborator; implementations must
/// signal a unique-constraint violation on the booking id distinctly via
/// [`DatabaseError::UniqueViolation`](crate::errors::DatabaseError::UniqueViolation)
/// so the create flow can regenerate and retry.
#[async_trait]
pub trait BookingRepositoryTrait: Send + Sync {
    fn load_bookings(&self) -> Result<Vec<Booking>>;
    fn exists_by_booking_id(&self, booking_id: &str) -> Result<bool>;
    async fn insert_new_booking(&self, booking: Booking) -> Result<Booking>;
}

/// Trait for booking service operations.
#[async_trait]
pub trait BookingServiceTrait: Send + Sync {
    fn get_bookings(&self) -> Result<Vec<Booking>>;
    async fn create_booking(&self, new_booking: NewBooking) -> Result<Booking>;
}
