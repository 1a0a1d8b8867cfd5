use chrono::Duration;
use icalendar::{Calendar, Component, Event, EventLike};

use crate::models::FitnessClass;

const CLASS_LENGTH_MIN: i64 = 60;

#[derive(Clone)]
pub struct ICalExporter {
    calendar_name: String,
}

impl ICalExporter {
    pub fn new(calendar_name: impl Into<String>) -> Self {
        Self {
            calendar_name: calendar_name.into(),
        }
    }

    pub fn generate(&self, classes: &[FitnessClass]) -> Vec<u8> {
        if classes.is_empty() {
            return Vec::new();
        }

        let mut calendar = Calendar::new();
        calendar.name(&self.calendar_name);

        for class in classes {
            let mut event = Event::new();
            event.summary(&format!(
                "{} with {}",
                class.name.display_name(),
                class.instructor
            ));
            event.starts(class.scheduled_at);
            event.ends(class.scheduled_at + Duration::minutes(CLASS_LENGTH_MIN));
            event.description(&format!(
                "Instructor: {}\nAvailable slots: {}/{}",
                class.instructor, class.available_slots, class.total_slots
            ));
            event.uid(&format!("fitness-class-{}@fitness-booking", class.id));
            calendar.push(event);
        }

        calendar.to_string().into_bytes()
    }
}
