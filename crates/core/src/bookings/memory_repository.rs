//! In-process booking repository.
//!
//! The real persistent store is an external collaborator; this
//! implementation backs tests and store-less operation. It enforces the
//! same contract a database would: duplicate booking ids are rejected as
//! [`DatabaseError::UniqueViolation`], distinctly from other failures.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use log::warn;

use crate::bookings::bookings_model::Booking;
use crate::bookings::bookings_traits::BookingRepositoryTrait;
use crate::errors::{DatabaseError, Result};

/// Mutex-guarded in-memory booking store.
#[derive(Debug, Default)]
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the store, recovering from poison if necessary.
    fn lock_bookings(&self) -> MutexGuard<'_, Vec<Booking>> {
        self.bookings.lock().unwrap_or_else(|poisoned| {
            warn!("Booking store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

#[async_trait]
impl BookingRepositoryTrait for InMemoryBookingRepository {
    fn load_bookings(&self) -> Result<Vec<Booking>> {
        Ok(self.lock_bookings().clone())
    }

    fn exists_by_booking_id(&self, booking_id: &str) -> Result<bool> {
        Ok(self.lock_bookings().iter().any(|b| b.id == booking_id))
    }

    async fn insert_new_booking(&self, booking: Booking) -> Result<Booking> {
        let mut bookings = self.lock_bookings();
        if bookings.iter().any(|b| b.id == booking.id) {
            return Err(DatabaseError::UniqueViolation(booking.id).into());
        }
        bookings.push(booking.clone());
        Ok(booking)
    }
}
