use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ModerationStatus;

/// A devotee testimony. Submitted `pending`; only approved testimonies are
/// shown on the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Testimony {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub testimony: String,
    pub date: DateTime<Utc>,
    pub status: ModerationStatus,
}

/// POST body for submitting a testimony.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct NewTestimony {
    pub name: String,
    pub testimony: String,
}
