use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type ClassId = u64;
pub type BookingId = u64;

const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClassName {
    Yoga,
    Zumba,
    Hiit,
}

impl ClassName {
    pub fn display_name(&self) -> &'static str {
        match self {
            ClassName::Yoga => "Yoga",
            ClassName::Zumba => "Zumba",
            ClassName::Hiit => "HIIT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessClass {
    pub id: ClassId,
    pub name: ClassName,
    pub instructor: String,
    pub scheduled_at: DateTime<Utc>,
    pub total_slots: u32,
    pub available_slots: u32,
}

impl FitnessClass {
    pub fn booked_slots(&self) -> u32 {
        self.total_slots - self.available_slots
    }

    pub fn is_fully_booked(&self) -> bool {
        self.available_slots == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub fitness_class_id: ClassId,
    pub client_name: String,
    pub client_email: String,
    pub booked_at: DateTime<Utc>,
}

/// A committed booking together with its class as it looked when read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDetails {
    pub booking: Booking,
    pub class: FitnessClass,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewClass {
    pub name: ClassName,
    #[schema(example = "Asha Rao")]
    pub instructor: String,
    #[schema(value_type = String, format = "date-time", example = "2026-11-24T06:00:00+05:30")]
    pub scheduled_at: DateTime<Utc>,
    #[schema(example = 20)]
    pub total_slots: i64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BookingRequest {
    pub class_id: ClassId,
    #[schema(example = "Jane Doe")]
    pub client_name: String,
    #[schema(example = "jane@example.com")]
    pub client_email: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct ClassView {
    pub id: ClassId,
    pub name: ClassName,
    pub name_display: String,
    pub instructor: String,
    #[schema(value_type = String, format = "date-time")]
    pub scheduled_at: DateTime<Utc>,
    #[schema(example = "2026-11-24 06:00:00 IST")]
    pub scheduled_at_local: String,
    pub total_slots: u32,
    pub available_slots: u32,
    pub booked_slots: u32,
    pub is_fully_booked: bool,
}

impl ClassView {
    pub fn new(class: &FitnessClass, tz: Tz) -> Self {
        Self {
            id: class.id,
            name: class.name,
            name_display: class.name.display_name().to_string(),
            instructor: class.instructor.clone(),
            scheduled_at: class.scheduled_at,
            scheduled_at_local: format_local(class.scheduled_at, tz),
            total_slots: class.total_slots,
            available_slots: class.available_slots,
            booked_slots: class.booked_slots(),
            is_fully_booked: class.is_fully_booked(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
pub struct BookingView {
    pub id: BookingId,
    pub client_name: String,
    pub client_email: String,
    #[schema(value_type = String, format = "date-time")]
    pub booked_at: DateTime<Utc>,
    pub booked_at_local: String,
    pub fitness_class_details: ClassView,
}

impl BookingView {
    pub fn new(details: &BookingDetails, tz: Tz) -> Self {
        let booking = &details.booking;
        Self {
            id: booking.id,
            client_name: booking.client_name.clone(),
            client_email: booking.client_email.clone(),
            booked_at: booking.booked_at,
            booked_at_local: format_local(booking.booked_at, tz),
            fitness_class_details: ClassView::new(&details.class, tz),
        }
    }
}

pub fn format_local(at: DateTime<Utc>, tz: Tz) -> String {
    tz.from_utc_datetime(&at.naive_utc())
        .format(LOCAL_TIME_FORMAT)
        .to_string()
}
