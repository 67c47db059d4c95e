use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

use crate::models::{
    Announcement, ContactInfo, Donation, DonationPurpose, GalleryItem, MassBooking, PrayerRequest,
    SiteContent, Testimony,
};
use crate::sync::Collection;

/// Snapshot store backing every collection. Values are persisted as the
/// bare JSON-serialized collection under the collection's storage key.
pub struct LocalStore {
    data_dir: PathBuf,
}

impl LocalStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
        Ok(Self { data_dir })
    }

    fn snapshot_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let path = self.snapshot_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot: {}", key))?;

        let value: T = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot: {}", key))?;

        Ok(Some(value))
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let path = self.snapshot_path(key);
        let contents = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write snapshot: {}", key))?;
        Ok(())
    }

    // ===== Donations =====

    pub fn load_donations(&self) -> Result<Option<Vec<Donation>>> {
        self.load(Collection::Donations.storage_key())
    }

    pub fn save_donations(&self, donations: &[Donation]) -> Result<()> {
        self.save(Collection::Donations.storage_key(), &donations)
    }

    // ===== Mass bookings =====

    pub fn load_bookings(&self) -> Result<Option<Vec<MassBooking>>> {
        self.load(Collection::MassBookings.storage_key())
    }

    pub fn save_bookings(&self, bookings: &[MassBooking]) -> Result<()> {
        self.save(Collection::MassBookings.storage_key(), &bookings)
    }

    // ===== Prayer requests =====

    pub fn load_prayers(&self) -> Result<Option<Vec<PrayerRequest>>> {
        self.load(Collection::PrayerRequests.storage_key())
    }

    pub fn save_prayers(&self, prayers: &[PrayerRequest]) -> Result<()> {
        self.save(Collection::PrayerRequests.storage_key(), &prayers)
    }

    // ===== Testimonies =====

    pub fn load_testimonies(&self) -> Result<Option<Vec<Testimony>>> {
        self.load(Collection::Testimonies.storage_key())
    }

    pub fn save_testimonies(&self, testimonies: &[Testimony]) -> Result<()> {
        self.save(Collection::Testimonies.storage_key(), &testimonies)
    }

    // ===== Gallery =====

    pub fn load_gallery(&self) -> Result<Option<Vec<GalleryItem>>> {
        self.load(Collection::Gallery.storage_key())
    }

    pub fn save_gallery(&self, items: &[GalleryItem]) -> Result<()> {
        self.save(Collection::Gallery.storage_key(), &items)
    }

    // ===== Announcements =====

    pub fn load_announcements(&self) -> Result<Option<Vec<Announcement>>> {
        self.load(Collection::Announcements.storage_key())
    }

    pub fn save_announcements(&self, announcements: &[Announcement]) -> Result<()> {
        self.save(Collection::Announcements.storage_key(), &announcements)
    }

    // ===== Donation purposes =====

    pub fn load_purposes(&self) -> Result<Option<Vec<DonationPurpose>>> {
        self.load(Collection::DonationPurposes.storage_key())
    }

    pub fn save_purposes(&self, purposes: &[DonationPurpose]) -> Result<()> {
        self.save(Collection::DonationPurposes.storage_key(), &purposes)
    }

    // ===== Site content =====

    pub fn load_content(&self) -> Result<Option<SiteContent>> {
        self.load(Collection::SiteContent.storage_key())
    }

    pub fn save_content(&self, content: &SiteContent) -> Result<()> {
        self.save(Collection::SiteContent.storage_key(), content)
    }

    // ===== Contact =====

    pub fn load_contact(&self) -> Result<Option<ContactInfo>> {
        self.load(Collection::Contact.storage_key())
    }

    pub fn save_contact(&self, contact: &ContactInfo) -> Result<()> {
        self.save(Collection::Contact.storage_key(), contact)
    }
}
