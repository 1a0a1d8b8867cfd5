use std::sync::Arc;

use crate::error::BookingError;
use crate::models::{Booking, BookingDetails, ClassId};
use crate::store::Store;
use crate::validation::normalize_email;

/// Read side of the committed bookings.
#[derive(Clone)]
pub struct Ledger {
    store: Arc<Store>,
}

impl Ledger {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Bookings whose email matches `email` case-insensitively, newest first,
    /// each paired with its class as it is right now.
    pub fn find_by_email(&self, email: &str) -> Vec<BookingDetails> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        for entry in self.store.entries() {
            let guard = entry.read();
            if guard.deleted {
                continue;
            }
            found.extend(
                guard
                    .bookings
                    .iter()
                    .filter(|b| normalize_email(&b.client_email) == email)
                    .map(|b| BookingDetails {
                        booking: b.clone(),
                        class: guard.class.clone(),
                    }),
            );
        }
        found.sort_by(|a, b| {
            b.booking
                .booked_at
                .cmp(&a.booking.booked_at)
                .then(b.booking.id.cmp(&a.booking.id))
        });
        found
    }

    pub fn bookings_for_class(&self, class_id: ClassId) -> Result<Vec<Booking>, BookingError> {
        let entry = self
            .store
            .entry(class_id)
            .ok_or(BookingError::NotFound(class_id))?;
        let guard = entry.read();
        if guard.deleted {
            return Err(BookingError::NotFound(class_id));
        }
        Ok(guard.bookings.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{ClassName, NewClass};
    use crate::observer::TracingObserver;
    use crate::reservation::Reservations;

    fn setup() -> (Catalog, Reservations, Ledger) {
        let store = Arc::new(Store::new());
        (
            Catalog::new(Arc::clone(&store)),
            Reservations::new(Arc::clone(&store), Arc::new(TracingObserver)),
            Ledger::new(store),
        )
    }

    fn new_class(name: ClassName) -> NewClass {
        NewClass {
            name,
            instructor: "Instructor".to_string(),
            scheduled_at: Utc::now() + Duration::days(1),
            total_slots: 5,
        }
    }

    #[test]
    fn test_find_by_email_is_case_insensitive_and_newest_first() {
        let (catalog, reservations, ledger) = setup();
        let yoga = catalog.create_class(new_class(ClassName::Yoga)).unwrap();
        let hiit = catalog.create_class(new_class(ClassName::Hiit)).unwrap();
        let now = Utc::now();

        reservations
            .reserve_at(yoga.id, "Client", "client@example.com", now)
            .unwrap();
        reservations
            .reserve_at(hiit.id, "Client", "CLIENT@example.com", now + Duration::seconds(5))
            .unwrap();
        reservations
            .reserve_at(hiit.id, "Other", "other@example.com", now)
            .unwrap();

        let found = ledger.find_by_email("Client@Example.COM");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].class.id, hiit.id);
        assert_eq!(found[1].class.id, yoga.id);
        assert_eq!(found[0].class.available_slots, 3);
    }

    #[test]
    fn test_find_by_email_no_match_is_empty() {
        let (catalog, reservations, ledger) = setup();
        let class = catalog.create_class(new_class(ClassName::Zumba)).unwrap();
        reservations.reserve(class.id, "A", "a@x.com").unwrap();
        assert!(ledger.find_by_email("nobody@x.com").is_empty());
        assert!(ledger.find_by_email("   ").is_empty());
    }

    #[test]
    fn test_slot_accounting_matches_ledger() {
        let (catalog, reservations, ledger) = setup();
        let class = catalog.create_class(new_class(ClassName::Yoga)).unwrap();
        for i in 0..3 {
            reservations
                .reserve(class.id, "C", &format!("c{i}@x.com"))
                .unwrap();
        }
        let _ = reservations.reserve(class.id, "C", "c0@x.com");

        let class = catalog.get(class.id).unwrap();
        let booked = ledger.bookings_for_class(class.id).unwrap().len() as u32;
        assert_eq!(class.available_slots, class.total_slots - booked);
    }

    #[test]
    fn test_deleted_class_bookings_disappear() {
        let (catalog, reservations, ledger) = setup();
        let class = catalog.create_class(new_class(ClassName::Yoga)).unwrap();
        reservations.reserve(class.id, "A", "a@x.com").unwrap();
        catalog.delete_class(class.id).unwrap();
        assert!(ledger.find_by_email("a@x.com").is_empty());
        assert_eq!(
            ledger.bookings_for_class(class.id).unwrap_err(),
            BookingError::NotFound(class.id)
        );
    }
}
