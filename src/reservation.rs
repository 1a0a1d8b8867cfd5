//! Reservation transaction: turns a booking request into a committed booking
//! or a rejection, without ever overselling a class or double-booking a
//! client.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::BookingError;
use crate::models::{Booking, BookingDetails, ClassId};
use crate::observer::ReservationObserver;
use crate::store::{ClassTxn, Store};
use crate::validation::normalize_email;

#[derive(Clone)]
pub struct Reservations {
    store: Arc<Store>,
    observer: Arc<dyn ReservationObserver>,
}

impl Reservations {
    pub fn new(store: Arc<Store>, observer: Arc<dyn ReservationObserver>) -> Self {
        Self { store, observer }
    }

    pub fn reserve(
        &self,
        class_id: ClassId,
        client_name: &str,
        client_email: &str,
    ) -> Result<Booking, BookingError> {
        self.reserve_with_clock(class_id, client_name, client_email, Utc::now)
            .map(|details| details.booking)
    }

    /// Like [`Reservations::reserve`], with the commit time fixed to `now`.
    pub fn reserve_at(
        &self,
        class_id: ClassId,
        client_name: &str,
        client_email: &str,
        now: DateTime<Utc>,
    ) -> Result<Booking, BookingError> {
        self.reserve_with_clock(class_id, client_name, client_email, move || now)
            .map(|details| details.booking)
    }

    /// Runs the reservation and returns the booking with the class record it
    /// committed against. `clock` is read once, after the class lock is
    /// held, and that instant is used for both the expiry check and
    /// `booked_at`. The observer sees the outcome only after the lock has
    /// been released.
    pub fn reserve_with_clock(
        &self,
        class_id: ClassId,
        client_name: &str,
        client_email: &str,
        clock: impl Fn() -> DateTime<Utc>,
    ) -> Result<BookingDetails, BookingError> {
        let outcome = self.transact(class_id, client_name, client_email, clock);
        match &outcome {
            Ok(details) => self.observer.on_committed(&details.booking),
            Err(err) => self.observer.on_rejected(class_id, err),
        }
        outcome
    }

    fn transact(
        &self,
        class_id: ClassId,
        client_name: &str,
        client_email: &str,
        clock: impl Fn() -> DateTime<Utc>,
    ) -> Result<BookingDetails, BookingError> {
        let entry = self
            .store
            .entry(class_id)
            .ok_or(BookingError::NotFound(class_id))?;
        let mut txn = ClassTxn::begin(&entry);
        let now = clock();

        // Everything below runs under the class lock, whatever the caller
        // checked beforehand.
        if txn.is_deleted() {
            return Err(BookingError::NotFound(class_id));
        }
        if txn.class().scheduled_at <= now {
            return Err(BookingError::ClassExpired(class_id));
        }
        // A client who already holds a booking is told so even when the
        // class is full.
        let email = normalize_email(client_email);
        if txn.holds_email(&email) {
            return Err(BookingError::DuplicateBooking { class_id, email });
        }
        if txn.class().available_slots == 0 {
            return Err(BookingError::SlotsExhausted(class_id));
        }

        let booking = Booking {
            id: self.store.next_booking_id(),
            fitness_class_id: class_id,
            client_name: client_name.to_string(),
            client_email: client_email.trim().to_string(),
            booked_at: now,
        };
        txn.insert_booking(booking.clone());
        if !txn.take_slot() {
            return Err(BookingError::SlotsExhausted(class_id));
        }
        let class = txn.class().clone();
        txn.commit();
        Ok(BookingDetails { booking, class })
    }

    /// Fast-path rejection from a snapshot read, without the transaction
    /// lock. Its answer may already be stale when it returns;
    /// [`Reservations::reserve`] re-checks everything under the lock.
    pub fn precheck(
        &self,
        class_id: ClassId,
        client_email: &str,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        let outcome = self.check_unlocked(class_id, client_email, now);
        if let Err(err) = &outcome {
            self.observer.on_rejected(class_id, err);
        }
        outcome
    }

    fn check_unlocked(
        &self,
        class_id: ClassId,
        client_email: &str,
        now: DateTime<Utc>,
    ) -> Result<(), BookingError> {
        let entry = self
            .store
            .entry(class_id)
            .ok_or(BookingError::NotFound(class_id))?;
        let guard = entry.read();
        if guard.deleted {
            return Err(BookingError::NotFound(class_id));
        }
        if guard.class.scheduled_at <= now {
            return Err(BookingError::ClassExpired(class_id));
        }
        let email = normalize_email(client_email);
        if guard.holds_email(&email) {
            return Err(BookingError::DuplicateBooking { class_id, email });
        }
        if guard.class.available_slots == 0 {
            return Err(BookingError::SlotsExhausted(class_id));
        }
        Ok(())
    }
}
