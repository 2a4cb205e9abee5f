//! Booking service: the create/list flow.
//!
//! `create_booking` resolves a location code for the pickup coordinate
//! (any tier), generates a store-unique identifier, and inserts. The
//! generator's existence check and the insert are two separate operations
//! against the store, so a concurrent booking can commit between them; the
//! store's unique constraint is the actual safety net, and a
//! `UniqueViolation` from the insert is treated as a recoverable signal to
//! regenerate and retry, bounded at 5 attempts.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};

use driveline_geocode::{CodeResolver, ResolvedValue};

use crate::bookings::bookings_model::{Booking, NewBooking};
use crate::bookings::bookings_traits::{BookingRepositoryTrait, BookingServiceTrait};
use crate::bookings::id_generator::BookingIdGenerator;
use crate::errors::{DatabaseError, Error, Result};

/// Insert attempts before the booking is reported as failed. A store that
/// keeps colliding past this has a deeper problem than id luck.
const MAX_INSERT_ATTEMPTS: u32 = 5;

pub struct BookingService {
    repository: Arc<dyn BookingRepositoryTrait>,
    resolver: Arc<CodeResolver>,
    id_generator: BookingIdGenerator,
}

impl BookingService {
    pub fn new(repository: Arc<dyn BookingRepositoryTrait>, resolver: Arc<CodeResolver>) -> Self {
        Self {
            repository,
            resolver,
            id_generator: BookingIdGenerator::new(),
        }
    }

    fn validate(new_booking: &NewBooking) -> Result<()> {
        if new_booking.customer_name.trim().is_empty() {
            return Err(Error::Validation("customer name is required".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingServiceTrait for BookingService {
    fn get_bookings(&self) -> Result<Vec<Booking>> {
        self.repository.load_bookings()
    }

    async fn create_booking(&self, new_booking: NewBooking) -> Result<Booking> {
        Self::validate(&new_booking)?;

        let resolution = self
            .resolver
            .encode(new_booking.latitude, new_booking.longitude)
            .await?;
        let location_code = match resolution.value {
            ResolvedValue::Code(code) => code,
            ResolvedValue::Position(_) => {
                return Err(Error::Unexpected(
                    "encode resolution carried a position".to_string(),
                ))
            }
        };

        for attempt in 1..=MAX_INSERT_ATTEMPTS {
            let id = self
                .id_generator
                .next(|candidate| self.repository.exists_by_booking_id(candidate))?;

            let booking = Booking {
                id,
                customer_name: new_booking.customer_name.clone(),
                customer_phone: new_booking.customer_phone.clone(),
                vehicle_model: new_booking.vehicle_model.clone(),
                latitude: new_booking.latitude,
                longitude: new_booking.longitude,
                location_code: location_code.clone(),
                address: new_booking.address.clone(),
                created_at: Utc::now(),
            };

            match self.repository.insert_new_booking(booking).await {
                Ok(created) => {
                    info!(
                        "Created booking '{}' at {} (source: {})",
                        created.id, created.location_code, resolution.source
                    );
                    return Ok(created);
                }
                Err(Error::Database(DatabaseError::UniqueViolation(id))) => {
                    warn!(
                        "Booking id '{}' collided on insert (attempt {}/{}), regenerating",
                        id, attempt, MAX_INSERT_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::BookingCreateFailed {
            attempts: MAX_INSERT_ATTEMPTS,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bookings::id_generator::BookingIdGenerator;
    use crate::bookings::memory_repository::InMemoryBookingRepository;
    use driveline_geocode::{GeocodeError, ResponseCache};
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Repository that rejects the first N inserts as unique violations.
    #[derive(Default)]
    struct CollidingRepository {
        bookings: Mutex<Vec<Booking>>,
        violations_left: AtomicU32,
        insert_calls: AtomicUsize,
    }

    impl CollidingRepository {
        fn with_violations(n: u32) -> Self {
            Self {
                bookings: Mutex::new(Vec::new()),
                violations_left: AtomicU32::new(n),
                insert_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BookingRepositoryTrait for CollidingRepository {
        fn load_bookings(&self) -> Result<Vec<Booking>> {
            Ok(self.bookings.lock().unwrap().clone())
        }

        fn exists_by_booking_id(&self, _booking_id: &str) -> Result<bool> {
            Ok(false)
        }

        async fn insert_new_booking(&self, booking: Booking) -> Result<Booking> {
            self.insert_calls.fetch_add(1, Ordering::SeqCst);
            let left = self.violations_left.load(Ordering::SeqCst);
            if left > 0 {
                self.violations_left.store(left - 1, Ordering::SeqCst);
                return Err(DatabaseError::UniqueViolation(booking.id).into());
            }
            self.bookings.lock().unwrap().push(booking.clone());
            Ok(booking)
        }
    }

    /// Resolver with no remote tiers: every encode lands on the grid codec.
    fn fallback_resolver() -> Arc<CodeResolver> {
        Arc::new(CodeResolver::new(vec![], Arc::new(ResponseCache::new())))
    }

    fn mumbai_booking() -> NewBooking {
        NewBooking {
            customer_name: "Asha Rao".to_string(),
            customer_phone: Some("+91 98200 00000".to_string()),
            vehicle_model: Some("Nexon EV".to_string()),
            latitude: 19.0760,
            longitude: 72.8777,
            address: Some("Marine Drive, Mumbai".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_booking_with_remotes_disabled_uses_fallback_code() {
        let repository = Arc::new(InMemoryBookingRepository::new());
        let service = BookingService::new(repository.clone(), fallback_resolver());

        let created = service.create_booking(mumbai_booking()).await.unwrap();
        assert!(BookingIdGenerator::is_valid(&created.id));
        assert_eq!(created.location_code, "907-628-77");
        assert_eq!(created.address.as_deref(), Some("Marine Drive, Mumbai"));

        let listed = service.get_bookings().unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_unique_violation_triggers_regeneration() {
        let repository = Arc::new(CollidingRepository::with_violations(2));
        let service = BookingService::new(repository.clone(), fallback_resolver());

        let created = service.create_booking(mumbai_booking()).await.unwrap();
        assert!(BookingIdGenerator::is_valid(&created.id));
        assert_eq!(repository.insert_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_persistent_collisions_fail_after_bounded_retries() {
        let repository = Arc::new(CollidingRepository::with_violations(u32::MAX));
        let service = BookingService::new(repository.clone(), fallback_resolver());

        let result = service.create_booking(mumbai_booking()).await;
        assert!(matches!(
            result,
            Err(Error::BookingCreateFailed { attempts: 5 })
        ));
        assert_eq!(repository.insert_calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_blank_customer_name_is_rejected() {
        let repository = Arc::new(InMemoryBookingRepository::new());
        let service = BookingService::new(repository, fallback_resolver());

        let mut booking = mumbai_booking();
        booking.customer_name = "   ".to_string();
        let result = service.create_booking(booking).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_coordinate_is_rejected_before_persisting() {
        let repository = Arc::new(InMemoryBookingRepository::new());
        let service = BookingService::new(repository.clone(), fallback_resolver());

        let mut booking = mumbai_booking();
        booking.latitude = 95.0;
        let result = service.create_booking(booking).await;
        assert!(matches!(
            result,
            Err(Error::Geocode(GeocodeError::InvalidCoordinate { .. }))
        ));
        assert!(service.get_bookings().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_unique_database_errors_propagate() {
        struct BrokenRepository;

        #[async_trait]
        impl BookingRepositoryTrait for BrokenRepository {
            fn load_bookings(&self) -> Result<Vec<Booking>> {
                Ok(Vec::new())
            }
            fn exists_by_booking_id(&self, _booking_id: &str) -> Result<bool> {
                Ok(false)
            }
            async fn insert_new_booking(&self, _booking: Booking) -> Result<Booking> {
                Err(DatabaseError::QueryFailed("disk full".to_string()).into())
            }
        }

        let service = BookingService::new(Arc::new(BrokenRepository), fallback_resolver());
        let result = service.create_booking(mumbai_booking()).await;
        assert!(matches!(
            result,
            Err(Error::Database(DatabaseError::QueryFailed(_)))
        ));
    }
}
