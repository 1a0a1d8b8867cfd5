use tracing::{info, warn};

use crate::error::BookingError;
use crate::models::{Booking, ClassId};

/// Hook invoked once per reservation attempt, after the transaction has
/// either committed or been rolled back.
pub trait ReservationObserver: Send + Sync {
    fn on_committed(&self, booking: &Booking);

    fn on_rejected(&self, class_id: ClassId, error: &BookingError);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl ReservationObserver for TracingObserver {
    fn on_committed(&self, booking: &Booking) {
        info!(
            booking_id = booking.id,
            class_id = booking.fitness_class_id,
            email = %booking.client_email,
            "Booking successful"
        );
    }

    fn on_rejected(&self, class_id: ClassId, error: &BookingError) {
        warn!(class_id, kind = error.kind(), "Booking rejected: {error}");
    }
}
