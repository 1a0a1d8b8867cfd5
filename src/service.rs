use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::catalog::Catalog;
use crate::error::BookingError;
use crate::ledger::Ledger;
use crate::models::{BookingDetails, BookingRequest, ClassId, FitnessClass, NewClass};
use crate::observer::{ReservationObserver, TracingObserver};
use crate::reservation::Reservations;
use crate::store::Store;
use crate::validation::{validate_email, validate_name};

/// Entry point used by the transport layer. Writes go through the catalog and
/// the reservation transaction; reads never take a class lock for longer
/// than it takes to copy a snapshot.
#[derive(Clone)]
pub struct BookingService {
    catalog: Catalog,
    reservations: Reservations,
    ledger: Ledger,
}

impl Default for BookingService {
    fn default() -> Self {
        Self::new(Arc::new(TracingObserver))
    }
}

impl BookingService {
    pub fn new(observer: Arc<dyn ReservationObserver>) -> Self {
        Self::with_store(Arc::new(Store::new()), observer)
    }

    pub fn with_store(store: Arc<Store>, observer: Arc<dyn ReservationObserver>) -> Self {
        Self {
            catalog: Catalog::new(Arc::clone(&store)),
            reservations: Reservations::new(Arc::clone(&store), observer),
            ledger: Ledger::new(store),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn reservations(&self) -> &Reservations {
        &self.reservations
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn create_class(&self, new_class: NewClass) -> Result<FitnessClass, BookingError> {
        self.catalog.create_class(new_class)
    }

    pub fn get_class(&self, id: ClassId) -> Result<FitnessClass, BookingError> {
        self.catalog.get(id)
    }

    pub fn delete_class(&self, id: ClassId) -> Result<usize, BookingError> {
        self.catalog.delete_class(id)
    }

    pub fn list_upcoming_classes(&self, now: DateTime<Utc>) -> Vec<FitnessClass> {
        self.catalog.list_upcoming(now)
    }

    /// Validates the request, rejects early on an unlocked read, then runs
    /// the reservation transaction.
    pub fn book(&self, request: &BookingRequest) -> Result<BookingDetails, BookingError> {
        let client_name = validate_name("client_name", &request.client_name)?;
        let client_email = validate_email(&request.client_email)?;
        self.reservations
            .precheck(request.class_id, &client_email, Utc::now())?;
        self.reservations
            .reserve_with_clock(request.class_id, &client_name, &client_email, Utc::now)
    }

    pub fn find_bookings_by_email(&self, email: &str) -> Vec<BookingDetails> {
        self.ledger.find_by_email(email)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::ClassName;

    fn request(class_id: ClassId, email: &str) -> BookingRequest {
        BookingRequest {
            class_id,
            client_name: "New Client".to_string(),
            client_email: email.to_string(),
        }
    }

    #[test]
    fn test_book_returns_class_snapshot() {
        let service = BookingService::default();
        let class = service
            .create_class(NewClass {
                name: ClassName::Zumba,
                instructor: "Instructor C".to_string(),
                scheduled_at: Utc::now() + Duration::days(1),
                total_slots: 5,
            })
            .unwrap();

        let details = service.book(&request(class.id, "newclient@example.com")).unwrap();
        assert_eq!(details.booking.client_name, "New Client");
        assert_eq!(details.class.available_slots, 4);

        let found = service.find_bookings_by_email("NEWCLIENT@example.com");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].booking.id, details.booking.id);
    }

    #[test]
    fn test_book_rejects_invalid_input() {
        let service = BookingService::default();
        let err = service.book(&request(1, "not-an-email")).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let mut blank_name = request(1, "a@x.com");
        blank_name.client_name = "  ".to_string();
        assert!(matches!(
            service.book(&blank_name).unwrap_err(),
            BookingError::Validation(_)
        ));

        assert_eq!(
            service.book(&request(1, "a@x.com")).unwrap_err(),
            BookingError::NotFound(1)
        );
    }
}
