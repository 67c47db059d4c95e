use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A prayer request submitted from the public site. Listed and deleted only
/// in the admin view; there is no moderation state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct PrayerRequest {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub prayer: String,
    pub date: DateTime<Utc>,
}

/// POST body for submitting a prayer request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewPrayer {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub prayer: String,
}
