use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Editable page copy for the public site. Mutated locally by the admin
/// content editor and kept in the local snapshot only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SiteContent {
    pub shrine_name: String,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub hero_image_url: String,
    pub welcome_message: String,
    pub history_text: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub office_hours: String,
    pub mass_schedule_note: String,
    pub map_latitude: f64,
    pub map_longitude: f64,
    pub facebook_url: String,
    pub instagram_url: String,
    pub youtube_url: String,
    pub whatsapp_number: String,
    pub donation_note: String,
    pub footer_text: String,
}

impl Default for SiteContent {
    fn default() -> Self {
        Self {
            shrine_name: "St. Anne's Shrine".to_string(),
            hero_title: "Welcome to St. Anne's Shrine".to_string(),
            hero_subtitle: "A place of prayer, healing and thanksgiving".to_string(),
            hero_image_url: "/images/hero.jpg".to_string(),
            welcome_message: "The shrine welcomes pilgrims of all faiths every day of the year."
                .to_string(),
            history_text: "Founded over a century ago, the shrine has grown from a small \
                           chapel into a centre of pilgrimage for the whole region."
                .to_string(),
            address: "Shrine Road, Hill Town 600001".to_string(),
            phone: "9876543210".to_string(),
            email: "office@stannesshrine.example".to_string(),
            office_hours: "Mon-Sat 09:00-17:00".to_string(),
            mass_schedule_note: "Daily masses at the times listed on the booking page".to_string(),
            map_latitude: 13.0475,
            map_longitude: 80.2090,
            facebook_url: "https://facebook.com/stannesshrine".to_string(),
            instagram_url: "https://instagram.com/stannesshrine".to_string(),
            youtube_url: "https://youtube.com/@stannesshrine".to_string(),
            whatsapp_number: "9876543210".to_string(),
            donation_note: "All offerings are acknowledged by receipt at the shrine office."
                .to_string(),
            footer_text: "St. Anne's Shrine - all are welcome".to_string(),
        }
    }
}

/// Contact details served by the contact endpoint and shown on the public
/// contact page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ContactInfo {
    pub address: String,
    pub phone: String,
    pub email: String,
    pub office_hours: String,
    pub map_latitude: f64,
    pub map_longitude: f64,
    pub whatsapp_number: String,
}

impl Default for ContactInfo {
    fn default() -> Self {
        let content = SiteContent::default();
        Self {
            address: content.address,
            phone: content.phone,
            email: content.email,
            office_hours: content.office_hours,
            map_latitude: content.map_latitude,
            map_longitude: content.map_longitude,
            whatsapp_number: content.whatsapp_number,
        }
    }
}

/// One saved revision of the contact record (admin history view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ContactRevision {
    pub id: i64,
    pub snapshot: ContactInfo,
    pub changed_at: DateTime<Utc>,
}

/// Aggregate contact-record figures (admin stats view).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct ContactStats {
    pub total_updates: u64,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_contact_matches_default_content() {
        let content = SiteContent::default();
        let contact = ContactInfo::default();
        assert_eq!(contact.address, content.address);
        assert_eq!(contact.phone, content.phone);
        assert_eq!(contact.email, content.email);
    }

    #[test]
    fn test_site_content_round_trips() {
        let content = SiteContent::default();
        let json = serde_json::to_string(&content).unwrap();
        let back: SiteContent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, content);
    }
}
