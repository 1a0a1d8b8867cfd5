//! In-process backing store for the catalog and the ledger.
//!
//! Every class record lives in its own entry together with the bookings it
//! owns. The entry's `RwLock` is the transaction lock for that class: the
//! write guard is held for the whole reservation, so attempts on the same
//! class are serialized while attempts on different classes never contend.
//! Because a class and its bookings share one entry, a committed booking and
//! the matching slot decrement always become visible together.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::{RwLock, RwLockWriteGuard};

use crate::models::{Booking, BookingId, ClassId, FitnessClass};
use crate::validation::normalize_email;

#[derive(Debug)]
pub(crate) struct ClassEntry {
    pub(crate) class: FitnessClass,
    pub(crate) bookings: Vec<Booking>,
    // Lowercased client emails of `bookings`, kept in step with it.
    pub(crate) emails: HashSet<String>,
    // Set when the class is removed; a transaction that resolved the entry
    // before removal must treat it as absent.
    pub(crate) deleted: bool,
}

impl ClassEntry {
    /// `email` must already be normalized.
    pub(crate) fn holds_email(&self, email: &str) -> bool {
        self.emails.contains(email)
    }
}

type SharedEntry = Arc<RwLock<ClassEntry>>;

#[derive(Debug, Default)]
pub struct Store {
    classes: DashMap<ClassId, SharedEntry>,
    class_seq: AtomicU64,
    booking_seq: AtomicU64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn next_class_id(&self) -> ClassId {
        self.class_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn next_booking_id(&self) -> BookingId {
        self.booking_seq.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn insert_class(&self, class: FitnessClass) {
        let entry = ClassEntry {
            class,
            bookings: Vec::new(),
            emails: HashSet::new(),
            deleted: false,
        };
        self.classes
            .insert(entry.class.id, Arc::new(RwLock::new(entry)));
    }

    /// Clones the entry handle out of the map so the map shard is released
    /// before the entry lock is taken.
    pub(crate) fn entry(&self, id: ClassId) -> Option<SharedEntry> {
        self.classes.get(&id).map(|e| Arc::clone(e.value()))
    }

    pub(crate) fn entries(&self) -> Vec<SharedEntry> {
        self.classes.iter().map(|e| Arc::clone(e.value())).collect()
    }

    /// Removes a class and every booking it owns. Returns the removed
    /// bookings, or `None` if the class does not exist.
    pub(crate) fn remove_class(&self, id: ClassId) -> Option<Vec<Booking>> {
        let entry = self.entry(id)?;
        let mut guard = entry.write();
        if guard.deleted {
            return None;
        }
        guard.deleted = true;
        guard.emails.clear();
        self.classes.remove(&id);
        Some(std::mem::take(&mut guard.bookings))
    }

    pub(crate) fn snapshot(&self, id: ClassId) -> Option<FitnessClass> {
        let entry = self.entry(id)?;
        let guard = entry.read();
        (!guard.deleted).then(|| guard.class.clone())
    }

    pub(crate) fn snapshot_all(&self) -> Vec<FitnessClass> {
        self.entries()
            .into_iter()
            .filter_map(|entry| {
                let guard = entry.read();
                (!guard.deleted).then(|| guard.class.clone())
            })
            .collect()
    }
}

/// Exclusive, all-or-nothing transaction over one class entry.
///
/// Writes are staged against a copy of the class record and only applied by
/// [`ClassTxn::commit`]. Dropping the transaction without committing discards
/// them and releases the lock.
pub(crate) struct ClassTxn<'a> {
    guard: RwLockWriteGuard<'a, ClassEntry>,
    staged_class: FitnessClass,
    staged_bookings: Vec<Booking>,
    staged_emails: Vec<String>,
}

impl<'a> ClassTxn<'a> {
    pub(crate) fn begin(entry: &'a RwLock<ClassEntry>) -> Self {
        let guard = entry.write();
        let staged_class = guard.class.clone();
        Self {
            guard,
            staged_class,
            staged_bookings: Vec::new(),
            staged_emails: Vec::new(),
        }
    }

    pub(crate) fn is_deleted(&self) -> bool {
        self.guard.deleted
    }

    pub(crate) fn class(&self) -> &FitnessClass {
        &self.staged_class
    }

    /// `email` must already be normalized.
    pub(crate) fn holds_email(&self, email: &str) -> bool {
        self.guard.holds_email(email) || self.staged_emails.iter().any(|e| e == email)
    }

    pub(crate) fn insert_booking(&mut self, booking: Booking) {
        self.staged_emails.push(normalize_email(&booking.client_email));
        self.staged_bookings.push(booking);
    }

    /// Takes one slot from the staged record; `false` if none is left.
    pub(crate) fn take_slot(&mut self) -> bool {
        match self.staged_class.available_slots.checked_sub(1) {
            Some(left) => {
                self.staged_class.available_slots = left;
                true
            }
            None => false,
        }
    }

    pub(crate) fn commit(mut self) {
        let staged = std::mem::take(&mut self.staged_bookings);
        let emails = std::mem::take(&mut self.staged_emails);
        let entry = &mut *self.guard;
        entry.class = self.staged_class;
        entry.bookings.extend(staged);
        entry.emails.extend(emails);
    }
}
