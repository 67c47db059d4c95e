use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded offering. Donations are captured client-side after checkout
/// and kept in the local snapshot; the API only serves purposes and stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Donation {
    #[serde(default)]
    pub id: i64,
    pub donor_name: String,
    pub amount: f64,
    pub purpose: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Input for recording a donation; the store assigns the id and timestamp.
#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor_name: String,
    pub amount: f64,
    pub purpose: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct DonationPurpose {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    pub description: String,
}

/// Purposes offered when the remote list has never been fetched.
pub fn default_purposes() -> Vec<DonationPurpose> {
    let entries = [
        ("General Offering", "Support the day-to-day running of the shrine"),
        ("Shrine Maintenance", "Upkeep of the church, grounds and facilities"),
        ("Charity Outreach", "Feeding programmes and aid for families in need"),
        ("Candle Offering", "Votive candles lit at the grotto"),
        ("Annual Feast", "Celebrations and processions for the feast days"),
    ];
    entries
        .iter()
        .enumerate()
        .map(|(i, (name, description))| DonationPurpose {
            id: i as i64 + 1,
            name: (*name).to_string(),
            description: (*description).to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct PurposeTotal {
    pub purpose: String,
    pub amount: f64,
}

/// Aggregate donation figures, normally served by the stats endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct DonationStats {
    pub total_amount: f64,
    pub donation_count: u64,
    #[serde(default)]
    pub by_purpose: Vec<PurposeTotal>,
}

impl DonationStats {
    /// Compute stats from locally recorded donations, used when the stats
    /// endpoint is unreachable.
    pub fn from_donations(donations: &[Donation]) -> Self {
        let mut by_purpose: Vec<PurposeTotal> = Vec::new();
        for donation in donations {
            match by_purpose.iter_mut().find(|p| p.purpose == donation.purpose) {
                Some(entry) => entry.amount += donation.amount,
                None => by_purpose.push(PurposeTotal {
                    purpose: donation.purpose.clone(),
                    amount: donation.amount,
                }),
            }
        }
        Self {
            total_amount: donations.iter().map(|d| d.amount).sum(),
            donation_count: donations.len() as u64,
            by_purpose,
        }
    }
}
