use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::BookingError;

const MAX_NAME_LEN: usize = 100;
const MAX_EMAIL_LEN: usize = 254;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email regex compiles")
});

/// Trims and length-checks a free-text name such as a client or instructor.
pub fn validate_name(field: &str, value: &str) -> Result<String, BookingError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BookingError::Validation(format!("{field} must not be blank")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(BookingError::Validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_email(value: &str) -> Result<String, BookingError> {
    let trimmed = value.trim();
    if trimmed.len() > MAX_EMAIL_LEN || !EMAIL_RE.is_match(trimmed) {
        return Err(BookingError::Validation(
            "Enter a valid email address.".into(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_total_slots(value: i64) -> Result<u32, BookingError> {
    if value < 1 {
        return Err(BookingError::Validation(
            "total_slots must be at least 1".into(),
        ));
    }
    u32::try_from(value)
        .map_err(|_| BookingError::Validation("total_slots is too large".into()))
}

/// Lowercased form used for every email comparison.
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}
