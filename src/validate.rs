//! Form validation for the booking and donation pages.
//!
//! Submissions are rejected here, before anything reaches the network. The
//! rules mirror what the backend enforces, so a form that passes locally is
//! expected to be accepted remotely.

use chrono::{Datelike, NaiveDate, Weekday};
use thiserror::Error;

use crate::models::BookingRequest;

// ============================================================================
// Constants
// ============================================================================

/// Mass times offered on the booking page.
pub const MASS_TIMES: [&str; 5] = ["06:00", "07:00", "08:30", "11:00", "17:30"];

/// Offering per day of requested masses, in whole currency units.
pub const MASS_OFFERING_PER_DAY: u32 = 150;

/// Number of digits a phone number must contain.
const PHONE_DIGITS: usize = 10;

/// The 07:00 Sunday mass is reserved for the parish and is never bookable.
const BLACKOUT_DAY: Weekday = Weekday::Sun;
const BLACKOUT_TIME: &str = "07:00";

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    #[error("phone number must contain exactly 10 digits")]
    InvalidPhone,

    #[error("no mass is offered at {0:?}")]
    UnknownTime(String),

    #[error("the {time} mass on {date} is not open for booking")]
    BlackoutSlot { date: NaiveDate, time: String },

    #[error("amount must be a positive number")]
    InvalidAmount,

    #[error("number of days must be at least 1")]
    InvalidDayCount,
}

// ============================================================================
// Field validators
// ============================================================================

/// Validate an email address: one `@`, a non-empty local part, a domain with
/// a dot and non-empty labels around it, and no whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return false,
    };

    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Validate a phone number: exactly ten digits once formatting characters
/// (spaces, dashes, parentheses, a country prefix sign) are stripped.
pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().filter(|c| c.is_ascii_digit()).count() == PHONE_DIGITS
}

/// Check a requested mass slot against the offered times and the standing
/// Sunday-morning blackout.
pub fn validate_mass_slot(date: NaiveDate, time: &str) -> Result<(), ValidationError> {
    if !MASS_TIMES.contains(&time) {
        return Err(ValidationError::UnknownTime(time.to_string()));
    }
    if date.weekday() == BLACKOUT_DAY && time == BLACKOUT_TIME {
        return Err(ValidationError::BlackoutSlot {
            date,
            time: time.to_string(),
        });
    }
    Ok(())
}

/// The donor's amount selection: a preset button or the custom field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountChoice {
    Preset(f64),
    /// `None` when the custom field is selected but empty.
    Custom(Option<f64>),
}

/// Resolve the effective donation amount. When the custom field is selected
/// it is authoritative, whatever preset was highlighted before.
pub fn donation_amount(choice: AmountChoice) -> Result<f64, ValidationError> {
    let value = match choice {
        AmountChoice::Preset(value) => value,
        AmountChoice::Custom(Some(value)) => value,
        AmountChoice::Custom(None) => return Err(ValidationError::InvalidAmount),
    };
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidAmount)
    }
}

/// Total offering for a booking: the per-day rate times the requested days.
pub fn booking_total(number_of_days: u32) -> Result<u32, ValidationError> {
    if number_of_days < 1 {
        return Err(ValidationError::InvalidDayCount);
    }
    Ok(MASS_OFFERING_PER_DAY * number_of_days)
}

/// Validate a complete booking form.
pub fn validate_booking(request: &BookingRequest) -> Result<(), ValidationError> {
    if !is_valid_email(&request.email) {
        return Err(ValidationError::InvalidEmail(request.email.clone()));
    }
    if !is_valid_phone(&request.phone) {
        return Err(ValidationError::InvalidPhone);
    }
    validate_mass_slot(request.date, &request.time)?;
    booking_total(request.number_of_days)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        // Valid addresses
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("maria.dsouza@parish.example.org"));
        assert!(is_valid_email("office+feast@shrine.in"));

        // Invalid addresses
        assert!(!is_valid_email("")); // empty
        assert!(!is_valid_email("a@b")); // no dot in domain
        assert!(!is_valid_email("a.com")); // no @
        assert!(!is_valid_email("a@@b.co")); // two @
        assert!(!is_valid_email("@b.co")); // empty local part
        assert!(!is_valid_email("a@.co")); // empty host label
        assert!(!is_valid_email("a@b.")); // empty tld
        assert!(!is_valid_email("a b@c.co")); // whitespace
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("9876543210"));
        assert!(is_valid_phone("98765 43210"));
        assert!(is_valid_phone("(987) 654-3210"));

        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone(""));
        assert!(!is_valid_phone("+91 98765 43210")); // 12 digits with country code
    }

    #[test]
    fn test_sunday_morning_blackout() {
        let sunday = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        assert_eq!(sunday.weekday(), Weekday::Sun);

        assert_eq!(
            validate_mass_slot(sunday, "07:00"),
            Err(ValidationError::BlackoutSlot {
                date: sunday,
                time: "07:00".to_string()
            })
        );
        // Same day, different time is fine
        assert_eq!(validate_mass_slot(sunday, "06:00"), Ok(()));

        // Same time on any other day is fine
        let monday = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        assert_eq!(validate_mass_slot(monday, "07:00"), Ok(()));
    }

    #[test]
    fn test_unlisted_time_is_rejected() {
        let monday = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        assert_eq!(
            validate_mass_slot(monday, "03:15"),
            Err(ValidationError::UnknownTime("03:15".to_string()))
        );
    }

    #[test]
    fn test_donation_amount_resolution() {
        assert_eq!(donation_amount(AmountChoice::Preset(100.0)), Ok(100.0));
        assert_eq!(donation_amount(AmountChoice::Custom(Some(33.5))), Ok(33.5));

        assert!(donation_amount(AmountChoice::Preset(0.0)).is_err());
        assert!(donation_amount(AmountChoice::Preset(-5.0)).is_err());
        assert!(donation_amount(AmountChoice::Custom(Some(0.0))).is_err());
        assert!(donation_amount(AmountChoice::Custom(None)).is_err());
        assert!(donation_amount(AmountChoice::Custom(Some(f64::NAN))).is_err());
    }

    #[test]
    fn test_booking_total() {
        assert_eq!(booking_total(1), Ok(150));
        assert_eq!(booking_total(3), Ok(450));
        assert_eq!(booking_total(0), Err(ValidationError::InvalidDayCount));
    }

    #[test]
    fn test_validate_booking_happy_path() {
        let request = BookingRequest {
            name: "Anthony Fernandes".to_string(),
            email: "anthony@example.com".to_string(),
            phone: "98765 43210".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            time: "06:00".to_string(),
            intention: "In thanksgiving".to_string(),
            number_of_days: 3,
        };
        assert_eq!(validate_booking(&request), Ok(()));

        let mut bad_email = request.clone();
        bad_email.email = "anthony@example".to_string();
        assert!(matches!(
            validate_booking(&bad_email),
            Err(ValidationError::InvalidEmail(_))
        ));

        let mut blackout = request;
        blackout.date = NaiveDate::from_ymd_opt(2026, 8, 9).unwrap();
        blackout.time = "07:00".to_string();
        assert!(matches!(
            validate_booking(&blackout),
            Err(ValidationError::BlackoutSlot { .. })
        ));
    }
}
