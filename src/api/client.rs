//! API client for the shrine web backend.
//!
//! This module provides the `ApiClient` struct for making requests against
//! the shrine REST API and the external gallery service. Reads and writes
//! are single-shot: callers own the fallback behavior, so a failed call is
//! reported, never retried here.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::Config;
use crate::models::{
    Announcement, AnnouncementDraft, BookingRequest, ContactInfo, ContactRevision, ContactStats,
    DonationPurpose, DonationStats, GalleryItem, MassBooking, ModerationStatus, NewPrayer,
    NewTestimony, PrayerRequest, Testimony,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow shared hosting while still failing fast enough that
/// the local fallback kicks in at an acceptable delay.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Response envelope
// ============================================================================

/// Every shrine endpoint wraps its payload the same way.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, turning `success: false` into a typed rejection.
    fn into_data(self, what: &str) -> Result<T> {
        if !self.success {
            let message = self
                .message
                .unwrap_or_else(|| format!("{} request failed", what));
            return Err(ApiError::Rejected(message).into());
        }
        self.data.ok_or_else(|| {
            ApiError::InvalidResponse(format!("{} response carried no data", what)).into()
        })
    }

    /// Like `into_data` but for endpoints whose payload we don't use.
    fn into_ack(self, what: &str) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            let message = self
                .message
                .unwrap_or_else(|| format!("{} request failed", what));
            Err(ApiError::Rejected(message).into())
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// API client for the shrine backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    api_base: String,
    gallery_base: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base_url.trim_end_matches('/').to_string(),
            gallery_base: config.gallery_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    /// Check if response is successful, returning a typed error with the
    /// body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to send GET request to {}", url))?;

        let response = Self::check_response(response).await?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;

        envelope.into_data(what)
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        what: &str,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send POST request to {}", url))?;

        let response = Self::check_response(response).await?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;

        envelope.into_data(what)
    }

    async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: &str,
        body: &B,
        what: &str,
    ) -> Result<T> {
        let response = self
            .client
            .put(url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to send PUT request to {}", url))?;

        let response = Self::check_response(response).await?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;

        envelope.into_data(what)
    }

    async fn patch_json<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let response = self
            .client
            .patch(url)
            .send()
            .await
            .with_context(|| format!("Failed to send PATCH request to {}", url))?;

        let response = Self::check_response(response).await?;

        let envelope: Envelope<T> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;

        envelope.into_data(what)
    }

    async fn delete_resource(&self, url: &str, what: &str) -> Result<()> {
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .with_context(|| format!("Failed to send DELETE request to {}", url))?;

        let response = Self::check_response(response).await?;

        let envelope: Envelope<serde_json::Value> = response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", url))?;

        envelope.into_ack(what)
    }

    // ===== Announcements =====

    /// Fetch only the announcements marked active, for the public site
    pub async fn fetch_public_announcements(&self) -> Result<Vec<Announcement>> {
        self.get_json(&self.url("/announcements/public"), "announcements")
            .await
    }

    /// Fetch all announcements, including inactive ones (admin view)
    pub async fn fetch_admin_announcements(&self) -> Result<Vec<Announcement>> {
        self.get_json(&self.url("/announcements/admin"), "announcements")
            .await
    }

    pub async fn create_announcement(&self, draft: &AnnouncementDraft) -> Result<Announcement> {
        self.post_json(&self.url("/announcements/admin"), draft, "announcement create")
            .await
    }

    pub async fn update_announcement(
        &self,
        id: i64,
        draft: &AnnouncementDraft,
    ) -> Result<Announcement> {
        let url = self.url(&format!("/announcements/admin/{}", id));
        self.put_json(&url, draft, "announcement update").await
    }

    pub async fn delete_announcement(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("/announcements/admin/{}", id));
        self.delete_resource(&url, "announcement delete").await
    }

    /// Flip the active flag on an announcement, returning the updated record
    pub async fn toggle_announcement_active(&self, id: i64) -> Result<Announcement> {
        let url = self.url(&format!("/announcements/admin/{}/toggle-active", id));
        self.patch_json(&url, "announcement toggle").await
    }

    // ===== Contact =====

    pub async fn fetch_contact(&self) -> Result<ContactInfo> {
        self.get_json(&self.url("/contact"), "contact").await
    }

    pub async fn update_contact(&self, contact: &ContactInfo) -> Result<ContactInfo> {
        self.put_json(&self.url("/contact"), contact, "contact update")
            .await
    }

    pub async fn fetch_contact_history(&self) -> Result<Vec<ContactRevision>> {
        self.get_json(&self.url("/contact/history"), "contact history")
            .await
    }

    pub async fn fetch_contact_stats(&self) -> Result<ContactStats> {
        self.get_json(&self.url("/contact/stats"), "contact stats")
            .await
    }

    // ===== Prayer requests =====

    pub async fn submit_prayer(&self, prayer: &NewPrayer) -> Result<PrayerRequest> {
        self.post_json(&self.url("/prayers"), prayer, "prayer submit")
            .await
    }

    /// Fetch all prayer requests (admin view)
    pub async fn fetch_prayers(&self) -> Result<Vec<PrayerRequest>> {
        self.get_json(&self.url("/prayers"), "prayers").await
    }

    pub async fn delete_prayer(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("/prayers/{}", id));
        self.delete_resource(&url, "prayer delete").await
    }

    // ===== Testimonies =====

    pub async fn submit_testimony(&self, testimony: &NewTestimony) -> Result<Testimony> {
        self.post_json(&self.url("/testimonies"), testimony, "testimony submit")
            .await
    }

    pub async fn fetch_approved_testimonies(&self) -> Result<Vec<Testimony>> {
        self.get_json(&self.url("/testimonies/approved"), "testimonies")
            .await
    }

    pub async fn fetch_pending_testimonies(&self) -> Result<Vec<Testimony>> {
        self.get_json(&self.url("/testimonies/pending"), "testimonies")
            .await
    }

    pub async fn fetch_admin_testimonies(&self) -> Result<Vec<Testimony>> {
        self.get_json(&self.url("/testimonies/admin"), "testimonies")
            .await
    }

    /// Update a testimony's moderation status, returning the updated record
    pub async fn set_testimony_status(
        &self,
        id: i64,
        status: ModerationStatus,
    ) -> Result<Testimony> {
        let url = self.url(&format!("/testimonies/{}", id));
        debug!(id, %status, "Updating testimony status");
        self.put_json(&url, &json!({ "status": status }), "testimony status")
            .await
    }

    pub async fn delete_testimony(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("/testimonies/{}", id));
        self.delete_resource(&url, "testimony delete").await
    }

    // ===== Donations =====

    pub async fn fetch_donation_purposes(&self) -> Result<Vec<DonationPurpose>> {
        self.get_json(&self.url("/donations/purposes"), "donation purposes")
            .await
    }

    pub async fn fetch_donation_stats(&self) -> Result<DonationStats> {
        self.get_json(&self.url("/donations/stats"), "donation stats")
            .await
    }

    // ===== Mass bookings =====

    pub async fn submit_booking(&self, booking: &BookingRequest) -> Result<MassBooking> {
        self.post_json(&self.url("/mass-bookings"), booking, "booking submit")
            .await
    }

    /// Fetch all bookings (admin view)
    pub async fn fetch_bookings(&self) -> Result<Vec<MassBooking>> {
        self.get_json(&self.url("/mass-bookings"), "bookings").await
    }

    /// Update a booking's moderation status, returning the updated record
    pub async fn set_booking_status(
        &self,
        id: i64,
        status: ModerationStatus,
    ) -> Result<MassBooking> {
        let url = self.url(&format!("/mass-bookings/{}", id));
        debug!(id, %status, "Updating booking status");
        self.put_json(&url, &json!({ "status": status }), "booking status")
            .await
    }

    // ===== Gallery =====

    /// Fetch the public gallery list from the gallery collaborator service
    pub async fn fetch_public_gallery(&self) -> Result<Vec<GalleryItem>> {
        let url = format!("{}/gallery/public", self.gallery_base);
        self.get_json(&url, "gallery").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;

    #[test]
    fn test_envelope_unwraps_data() {
        let json = r#"{"success": true, "data": [1, 2, 3]}"#;
        let envelope: Envelope<Vec<i64>> = serde_json::from_str(json).unwrap();
        let data = envelope.into_data("numbers").expect("payload expected");
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_envelope_rejection_carries_message() {
        let json = r#"{"success": false, "message": "title is required"}"#;
        let envelope: Envelope<Vec<i64>> = serde_json::from_str(json).unwrap();
        let err = envelope.into_data("numbers").unwrap_err();
        let api_err = err.downcast_ref::<ApiError>().expect("typed error expected");
        assert!(matches!(api_err, ApiError::Rejected(m) if m == "title is required"));
    }

    #[test]
    fn test_envelope_success_without_data_is_invalid() {
        let json = r#"{"success": true}"#;
        let envelope: Envelope<Vec<i64>> = serde_json::from_str(json).unwrap();
        let err = envelope.into_data("numbers").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_envelope_ack_ignores_payload() {
        let json = r#"{"success": true, "data": {"deleted": 1}}"#;
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(json).unwrap();
        assert!(envelope.into_ack("delete").is_ok());
    }

    #[test]
    fn test_parse_announcement_envelope() {
        let json = r#"{
            "success": true,
            "data": [{
                "id": 11,
                "title": "Feast novena begins",
                "content": "Nine days of evening prayer start this Friday.",
                "date": "2026-08-28T12:00:00Z",
                "priority": "high",
                "isActive": true
            }]
        }"#;
        let envelope: Envelope<Vec<Announcement>> = serde_json::from_str(json).unwrap();
        let list = envelope.into_data("announcements").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].priority, Priority::High);
        assert!(list[0].is_active);
    }

    #[test]
    fn test_status_body_shape() {
        let body = json!({ "status": ModerationStatus::Approved });
        assert_eq!(body.to_string(), r#"{"status":"approved"}"#);
    }
}
