//! Booking domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain model representing a persisted test-drive booking.
///
/// Created once at booking time; never mutated by the core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique booking identifier (`5-` + 8 chars from `[A-Z0-9]`).
    pub id: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub vehicle_model: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// Location code resolved for the pickup coordinate.
    pub location_code: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input model for creating a new booking.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub vehicle_model: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}
