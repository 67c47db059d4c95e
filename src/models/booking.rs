use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ModerationStatus;

/// A mass intention booking. Created `pending`; an administrator approves or
/// rejects it once the offering is confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct MassBooking {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// First day of the requested masses.
    pub date: NaiveDate,
    /// One of the fixed mass times, e.g. "06:00".
    pub time: String,
    pub intention: String,
    pub number_of_days: u32,
    /// Total offering: per-day rate times `number_of_days`.
    pub amount: u32,
    pub status: ModerationStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Booking form input, also the POST body for the booking endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub date: NaiveDate,
    pub time: String,
    pub intention: String,
    pub number_of_days: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_wire_format() {
        let json = r#"{
            "id": 42,
            "name": "Anthony Fernandes",
            "email": "anthony@example.com",
            "phone": "9876543210",
            "date": "2026-08-09",
            "time": "06:00",
            "intention": "In thanksgiving",
            "numberOfDays": 3,
            "amount": 450,
            "status": "pending",
            "submittedAt": "2026-08-06T08:00:00Z"
        }"#;
        let parsed: MassBooking = serde_json::from_str(json).expect("booking should parse");
        assert_eq!(parsed.number_of_days, 3);
        assert_eq!(parsed.amount, 450);
        assert_eq!(parsed.status, ModerationStatus::Pending);
        assert_eq!(parsed.date, NaiveDate::from_ymd_opt(2026, 8, 9).unwrap());
    }
}
