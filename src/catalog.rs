use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::BookingError;
use crate::models::{ClassId, FitnessClass, NewClass};
use crate::store::Store;
use crate::validation::{validate_name, validate_total_slots};

#[derive(Clone)]
pub struct Catalog {
    store: Arc<Store>,
}

impl Catalog {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn create_class(&self, new_class: NewClass) -> Result<FitnessClass, BookingError> {
        self.create_class_at(new_class, Utc::now())
    }

    /// Creates a class, treating `now` as the current time for the
    /// future-schedule check.
    pub fn create_class_at(
        &self,
        new_class: NewClass,
        now: DateTime<Utc>,
    ) -> Result<FitnessClass, BookingError> {
        let instructor = validate_name("instructor", &new_class.instructor)?;
        let total_slots = validate_total_slots(new_class.total_slots)?;
        if new_class.scheduled_at <= now {
            return Err(BookingError::Validation(
                "Class must be scheduled for a future date and time.".into(),
            ));
        }

        let class = FitnessClass {
            id: self.store.next_class_id(),
            name: new_class.name,
            instructor,
            scheduled_at: new_class.scheduled_at,
            total_slots,
            available_slots: total_slots,
        };
        self.store.insert_class(class.clone());
        info!(
            class_id = class.id,
            name = class.name.display_name(),
            scheduled_at = %class.scheduled_at,
            "Fitness class created"
        );
        Ok(class)
    }

    pub fn get(&self, id: ClassId) -> Result<FitnessClass, BookingError> {
        self.store.snapshot(id).ok_or(BookingError::NotFound(id))
    }

    /// Classes scheduled strictly after `now`, earliest first.
    pub fn list_upcoming(&self, now: DateTime<Utc>) -> Vec<FitnessClass> {
        let mut classes: Vec<FitnessClass> = self
            .store
            .snapshot_all()
            .into_iter()
            .filter(|c| c.scheduled_at > now)
            .collect();
        classes.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
        classes
    }

    /// Removes a class together with all of its bookings. Returns how many
    /// bookings were removed.
    pub fn delete_class(&self, id: ClassId) -> Result<usize, BookingError> {
        let removed = self
            .store
            .remove_class(id)
            .ok_or(BookingError::NotFound(id))?;
        info!(
            class_id = id,
            bookings_removed = removed.len(),
            "Fitness class deleted"
        );
        Ok(removed.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::models::ClassName;

    fn catalog() -> Catalog {
        Catalog::new(Arc::new(Store::new()))
    }

    fn new_class(scheduled_at: DateTime<Utc>, total_slots: i64) -> NewClass {
        NewClass {
            name: ClassName::Yoga,
            instructor: "Instructor A".to_string(),
            scheduled_at,
            total_slots,
        }
    }

    #[test]
    fn test_create_class_sets_available_slots() {
        let catalog = catalog();
        let class = catalog
            .create_class(new_class(Utc::now() + Duration::days(2), 5))
            .unwrap();
        assert_eq!(class.total_slots, 5);
        assert_eq!(class.available_slots, 5);
        assert_eq!(catalog.get(class.id).unwrap(), class);
    }

    #[test]
    fn test_create_class_rejects_bad_input() {
        let catalog = catalog();
        let future = Utc::now() + Duration::days(1);

        let err = catalog.create_class(new_class(future, 0)).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let err = catalog
            .create_class(new_class(Utc::now() - Duration::minutes(1), 5))
            .unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        let now = Utc::now();
        let err = catalog.create_class_at(new_class(now, 5), now).unwrap_err();
        assert!(matches!(err, BookingError::Validation(_)));

        assert!(catalog.list_upcoming(now - Duration::days(1)).is_empty());
    }

    #[test]
    fn test_list_upcoming_filters_and_orders() {
        let catalog = catalog();
        let now = Utc::now();
        let later = catalog
            .create_class_at(new_class(now + Duration::days(3), 5), now)
            .unwrap();
        let sooner = catalog
            .create_class_at(new_class(now + Duration::days(1), 5), now)
            .unwrap();
        let past = catalog
            .create_class_at(
                new_class(now - Duration::days(1), 5),
                now - Duration::days(2),
            )
            .unwrap();

        let upcoming = catalog.list_upcoming(now);
        let ids: Vec<ClassId> = upcoming.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![sooner.id, later.id]);
        assert!(!ids.contains(&past.id));

        // A class scheduled exactly at `now` is not upcoming.
        assert!(
            catalog
                .list_upcoming(sooner.scheduled_at)
                .iter()
                .all(|c| c.id != sooner.id)
        );
    }

    #[test]
    fn test_delete_class() {
        let catalog = catalog();
        let class = catalog
            .create_class(new_class(Utc::now() + Duration::days(1), 2))
            .unwrap();
        assert_eq!(catalog.delete_class(class.id).unwrap(), 0);
        assert_eq!(
            catalog.get(class.id).unwrap_err(),
            BookingError::NotFound(class.id)
        );
        assert_eq!(
            catalog.delete_class(class.id).unwrap_err(),
            BookingError::NotFound(class.id)
        );
    }
}
