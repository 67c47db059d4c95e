//! State management for the shrine site's collections.
//!
//! This module contains the `ShrineStore`, the single source of truth for
//! every collection shown on the site. The store seeds each collection from
//! its local snapshot, refreshes from the remote API in the background, and
//! exposes the mutating actions the pages use. Remote-backed mutations are
//! two-phase: the local patch lands first, then the remote call, then a
//! reconciling re-fetch - so the UI is never waiting on the network, and a
//! dead backend degrades to flagged local data instead of an empty page.

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::cache::LocalStore;
use crate::config::Config;
use crate::models::{
    default_purposes, Announcement, AnnouncementDraft, BookingRequest, ContactInfo,
    ContactRevision, ContactStats, Donation, DonationPurpose, DonationStats, GalleryItem,
    MassBooking, ModerationStatus, NewDonation, NewGalleryItem, NewPrayer, NewTestimony,
    PrayerRequest, SiteContent, Testimony,
};
use crate::session::{CheckoutSession, PaymentData};
use crate::sync::{Collection, SyncState};
use crate::validate;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background refresh channel.
/// A single refresh produces at most six messages, so 32 leaves headroom
/// for overlapping refreshes.
const CHANNEL_BUFFER_SIZE: usize = 32;

// ============================================================================
// Refresh plumbing
// ============================================================================

/// Which side of the site a refresh serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshScope {
    /// Public pages: active announcements, approved testimonies, gallery,
    /// donation purposes, contact details.
    Public,
    /// Admin dashboard: full announcement and testimony lists, prayer
    /// requests, bookings, contact details.
    Admin,
}

impl RefreshScope {
    fn collections(self) -> &'static [Collection] {
        match self {
            RefreshScope::Public => &[
                Collection::Announcements,
                Collection::Testimonies,
                Collection::Gallery,
                Collection::DonationPurposes,
                Collection::Contact,
            ],
            RefreshScope::Admin => &[
                Collection::Announcements,
                Collection::Testimonies,
                Collection::PrayerRequests,
                Collection::MassBookings,
                Collection::Contact,
            ],
        }
    }
}

/// Result types from the background refresh task, one per refreshed
/// collection plus a completion marker.
enum RefreshResult {
    Announcements(Vec<Announcement>),
    Testimonies(Vec<Testimony>),
    Prayers(Vec<PrayerRequest>),
    Bookings(Vec<MassBooking>),
    Gallery(Vec<GalleryItem>),
    Purposes(Vec<DonationPurpose>),
    Contact(ContactInfo),
    /// A fetch failed; the collection keeps its fallback data.
    Failed(Collection, String),
    /// All fetches for this refresh have resolved.
    Complete,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no {collection} record with id {id}")]
    UnknownId { collection: Collection, id: i64 },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: ModerationStatus,
        to: ModerationStatus,
    },
}

// ============================================================================
// Store
// ============================================================================

/// Single source of truth for the site's collections.
pub struct ShrineStore {
    api: ApiClient,
    local: LocalStore,
    checkout: CheckoutSession,

    donations: Vec<Donation>,
    bookings: Vec<MassBooking>,
    prayers: Vec<PrayerRequest>,
    testimonies: Vec<Testimony>,
    gallery: Vec<GalleryItem>,
    announcements: Vec<Announcement>,
    purposes: Vec<DonationPurpose>,
    content: SiteContent,
    contact: ContactInfo,

    sync: HashMap<Collection, SyncState>,

    /// Last issued client id; ids are time-derived but forced strictly
    /// monotonic so two mutations in the same millisecond stay distinct.
    last_id: i64,

    refresh_rx: mpsc::Receiver<RefreshResult>,
    refresh_tx: mpsc::Sender<RefreshResult>,
    refreshing: bool,
}

impl ShrineStore {
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(&config)?;
        let data_dir = config.data_dir()?;
        let local = LocalStore::new(data_dir.clone())?;
        let checkout = CheckoutSession::new(data_dir);

        let mut sync = HashMap::new();
        for collection in Collection::ALL {
            sync.insert(collection, SyncState::Uninitialized);
        }

        let (refresh_tx, refresh_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            api,
            local,
            checkout,

            donations: Vec::new(),
            bookings: Vec::new(),
            prayers: Vec::new(),
            testimonies: Vec::new(),
            gallery: Vec::new(),
            announcements: Vec::new(),
            purposes: Vec::new(),
            content: SiteContent::default(),
            contact: ContactInfo::default(),

            sync,
            last_id: 0,
            refresh_rx,
            refresh_tx,
            refreshing: false,
        })
    }

    // =========================================================================
    // Seeding
    // =========================================================================

    /// Load every collection from its local snapshot, falling back to the
    /// built-in defaults where no snapshot exists. Synchronous: the caller
    /// can render immediately afterwards.
    pub fn seed_from_local(&mut self) {
        if let Ok(Some(donations)) = self.local.load_donations() {
            self.donations = donations;
        }
        if let Ok(Some(bookings)) = self.local.load_bookings() {
            self.bookings = bookings;
        }
        if let Ok(Some(prayers)) = self.local.load_prayers() {
            self.prayers = prayers;
        }
        if let Ok(Some(testimonies)) = self.local.load_testimonies() {
            self.testimonies = testimonies;
        }
        if let Ok(Some(gallery)) = self.local.load_gallery() {
            self.gallery = gallery;
        }
        if let Ok(Some(announcements)) = self.local.load_announcements() {
            self.announcements = announcements;
        }
        if let Ok(Some(content)) = self.local.load_content() {
            self.content = content;
        }
        if let Ok(Some(contact)) = self.local.load_contact() {
            self.contact = contact;
        }
        self.purposes = match self.local.load_purposes() {
            Ok(Some(purposes)) => purposes,
            _ => default_purposes(),
        };

        if let Err(e) = self.checkout.load() {
            debug!(error = %e, "No usable checkout session");
        }

        for collection in Collection::ALL {
            self.sync_transition(collection, SyncState::after_seed);
        }
    }

    // =========================================================================
    // Background refresh
    // =========================================================================

    /// Spawn a background task refreshing every collection in `scope`.
    /// Fetches are independent; each result is applied as it arrives via
    /// `process_pending`.
    pub fn refresh_all_background(&mut self, scope: RefreshScope) {
        if self.refreshing {
            debug!("Refresh already in flight");
            return;
        }

        for &collection in scope.collections() {
            self.sync_transition(collection, SyncState::fetch_started);
        }

        // Clone is cheap - the client shares its connection pool.
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            Self::execute_refresh(tx, api, scope).await;
        });

        self.refreshing = true;
    }

    /// Whether a background refresh has not yet reported completion.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    /// Drain and apply any refresh results that have arrived.
    pub fn process_pending(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.refresh_rx.try_recv() {
            results.push(result);
        }
        for result in results {
            self.apply_refresh(result);
        }
    }

    async fn execute_refresh(tx: mpsc::Sender<RefreshResult>, api: ApiClient, scope: RefreshScope) {
        info!(?scope, "Background refresh started");

        match scope {
            RefreshScope::Public => {
                let (announcements, testimonies, gallery, purposes, contact) = futures::join!(
                    api.fetch_public_announcements(),
                    api.fetch_approved_testimonies(),
                    api.fetch_public_gallery(),
                    api.fetch_donation_purposes(),
                    api.fetch_contact(),
                );

                Self::forward(
                    &tx,
                    Collection::Announcements,
                    announcements.map(RefreshResult::Announcements),
                )
                .await;
                Self::forward(
                    &tx,
                    Collection::Testimonies,
                    testimonies.map(RefreshResult::Testimonies),
                )
                .await;
                Self::forward(&tx, Collection::Gallery, gallery.map(RefreshResult::Gallery)).await;
                Self::forward(
                    &tx,
                    Collection::DonationPurposes,
                    purposes.map(RefreshResult::Purposes),
                )
                .await;
                Self::forward(&tx, Collection::Contact, contact.map(RefreshResult::Contact)).await;
            }
            RefreshScope::Admin => {
                let (announcements, testimonies, prayers, bookings, contact) = futures::join!(
                    api.fetch_admin_announcements(),
                    api.fetch_admin_testimonies(),
                    api.fetch_prayers(),
                    api.fetch_bookings(),
                    api.fetch_contact(),
                );

                Self::forward(
                    &tx,
                    Collection::Announcements,
                    announcements.map(RefreshResult::Announcements),
                )
                .await;
                Self::forward(
                    &tx,
                    Collection::Testimonies,
                    testimonies.map(RefreshResult::Testimonies),
                )
                .await;
                Self::forward(
                    &tx,
                    Collection::PrayerRequests,
                    prayers.map(RefreshResult::Prayers),
                )
                .await;
                Self::forward(
                    &tx,
                    Collection::MassBookings,
                    bookings.map(RefreshResult::Bookings),
                )
                .await;
                Self::forward(&tx, Collection::Contact, contact.map(RefreshResult::Contact)).await;
            }
        }

        info!("Background refresh complete");
        Self::send(&tx, RefreshResult::Complete).await;
    }

    async fn forward(
        tx: &mpsc::Sender<RefreshResult>,
        collection: Collection,
        result: Result<RefreshResult>,
    ) {
        match result {
            Ok(update) => Self::send(tx, update).await,
            Err(e) => {
                debug!(%collection, error = %e, "Fetch failed");
                Self::send(tx, RefreshResult::Failed(collection, e.to_string())).await;
            }
        }
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to queue refresh result - channel closed");
        }
    }

    /// Apply one refresh result. Results for a collection that is no longer
    /// `Syncing` arrived after their refresh was superseded and are dropped.
    fn apply_refresh(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Announcements(list) => {
                if self.should_adopt(Collection::Announcements) {
                    self.announcements = list;
                    self.persist_announcements();
                    self.sync_transition(Collection::Announcements, SyncState::fetch_succeeded);
                }
            }
            RefreshResult::Testimonies(list) => {
                if self.should_adopt(Collection::Testimonies) {
                    self.testimonies = list;
                    self.persist_testimonies();
                    self.sync_transition(Collection::Testimonies, SyncState::fetch_succeeded);
                }
            }
            RefreshResult::Prayers(list) => {
                if self.should_adopt(Collection::PrayerRequests) {
                    self.prayers = list;
                    self.persist_prayers();
                    self.sync_transition(Collection::PrayerRequests, SyncState::fetch_succeeded);
                }
            }
            RefreshResult::Bookings(list) => {
                if self.should_adopt(Collection::MassBookings) {
                    self.bookings = list;
                    self.persist_bookings();
                    self.sync_transition(Collection::MassBookings, SyncState::fetch_succeeded);
                }
            }
            RefreshResult::Gallery(list) => {
                if self.should_adopt(Collection::Gallery) {
                    self.gallery = list;
                    self.persist_gallery();
                    self.sync_transition(Collection::Gallery, SyncState::fetch_succeeded);
                }
            }
            RefreshResult::Purposes(list) => {
                if self.should_adopt(Collection::DonationPurposes) {
                    self.purposes = list;
                    self.persist_purposes();
                    self.sync_transition(Collection::DonationPurposes, SyncState::fetch_succeeded);
                }
            }
            RefreshResult::Contact(contact) => {
                if self.should_adopt(Collection::Contact) {
                    self.contact = contact;
                    self.persist_contact();
                    self.sync_transition(Collection::Contact, SyncState::fetch_succeeded);
                }
            }
            RefreshResult::Failed(collection, message) => {
                warn!(%collection, error = %message, "Refresh failed, keeping local fallback");
                self.sync_transition(collection, SyncState::fetch_failed);
            }
            RefreshResult::Complete => {
                self.refreshing = false;
            }
        }
    }

    fn should_adopt(&self, collection: Collection) -> bool {
        if self.sync_state(collection) == SyncState::Syncing {
            true
        } else {
            debug!(%collection, "Dropping refresh result for superseded refresh");
            false
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    pub fn bookings(&self) -> &[MassBooking] {
        &self.bookings
    }

    pub fn prayers(&self) -> &[PrayerRequest] {
        &self.prayers
    }

    pub fn testimonies(&self) -> &[Testimony] {
        &self.testimonies
    }

    pub fn gallery(&self) -> &[GalleryItem] {
        &self.gallery
    }

    pub fn announcements(&self) -> &[Announcement] {
        &self.announcements
    }

    /// Announcements shown on the public site.
    pub fn active_announcements(&self) -> Vec<&Announcement> {
        self.announcements.iter().filter(|a| a.is_active).collect()
    }

    pub fn purposes(&self) -> &[DonationPurpose] {
        &self.purposes
    }

    pub fn content(&self) -> &SiteContent {
        &self.content
    }

    pub fn contact(&self) -> &ContactInfo {
        &self.contact
    }

    /// Testimonies awaiting review, from the local collection.
    pub fn pending_testimonies(&self) -> Vec<&Testimony> {
        self.testimonies
            .iter()
            .filter(|t| t.status.is_pending())
            .collect()
    }

    pub fn sync_state(&self, collection: Collection) -> SyncState {
        self.sync
            .get(&collection)
            .copied()
            .unwrap_or(SyncState::Uninitialized)
    }

    pub fn record_count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Donations => self.donations.len(),
            Collection::MassBookings => self.bookings.len(),
            Collection::PrayerRequests => self.prayers.len(),
            Collection::Testimonies => self.testimonies.len(),
            Collection::Gallery => self.gallery.len(),
            Collection::Announcements => self.announcements.len(),
            Collection::DonationPurposes => self.purposes.len(),
            Collection::SiteContent => 1,
            Collection::Contact => 1,
        }
    }

    // =========================================================================
    // Local-only mutations
    // =========================================================================

    /// Record a donation. Donations have no remote endpoint; the record goes
    /// straight to the local collection.
    pub fn add_donation(&mut self, donation: NewDonation) -> Result<&Donation> {
        let record = Donation {
            id: self.next_id(),
            donor_name: donation.donor_name,
            amount: donation.amount,
            purpose: donation.purpose,
            date: Utc::now(),
            email: donation.email,
            phone: donation.phone,
        };
        self.donations.insert(0, record);
        self.persist_donations();
        Ok(&self.donations[0])
    }

    pub fn add_gallery_item(&mut self, item: NewGalleryItem) -> Result<&GalleryItem> {
        let record = GalleryItem {
            id: self.next_id(),
            media_type: item.media_type,
            url: item.url,
            title: item.title,
            category: item.category,
            date: Utc::now(),
        };
        self.gallery.insert(0, record);
        self.persist_gallery();
        Ok(&self.gallery[0])
    }

    pub fn remove_gallery_item(&mut self, id: i64) -> Result<()> {
        let position = self
            .gallery
            .iter()
            .position(|item| item.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::Gallery,
                id,
            })?;
        self.gallery.remove(position);
        self.persist_gallery();
        Ok(())
    }

    pub fn add_purpose(&mut self, name: String, description: String) -> Result<&DonationPurpose> {
        let record = DonationPurpose {
            id: self.next_id(),
            name,
            description,
        };
        self.purposes.insert(0, record);
        self.persist_purposes();
        Ok(&self.purposes[0])
    }

    pub fn remove_purpose(&mut self, id: i64) -> Result<()> {
        let position = self
            .purposes
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::DonationPurposes,
                id,
            })?;
        self.purposes.remove(position);
        self.persist_purposes();
        Ok(())
    }

    /// Replace the site copy. Content is local-only.
    pub fn update_site_content(&mut self, content: SiteContent) {
        self.content = content;
        self.persist_content();
    }

    // =========================================================================
    // Checkout session
    // =========================================================================

    /// Stash the donor's details while payment is in progress.
    pub fn begin_checkout(&mut self, payment: PaymentData) -> Result<()> {
        self.checkout.update(payment);
        self.checkout.save()
    }

    pub fn checkout(&self) -> Option<&PaymentData> {
        self.checkout.current()
    }

    /// Finish the checkout: the stashed details become a recorded donation.
    /// Returns `None` when no checkout is in progress or it has expired.
    pub fn complete_checkout(&mut self) -> Result<Option<&Donation>> {
        match self.checkout.take()? {
            Some(payment) => {
                let donation = self.add_donation(NewDonation {
                    donor_name: payment.donor_name,
                    amount: payment.amount,
                    purpose: payment.purpose,
                    email: payment.email,
                    phone: payment.phone,
                })?;
                Ok(Some(donation))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // Remote-backed mutations
    // =========================================================================

    /// Submit a mass booking. The form is validated first; nothing invalid
    /// reaches the network.
    pub async fn submit_booking(&mut self, request: BookingRequest) -> Result<()> {
        validate::validate_booking(&request)?;
        let amount = validate::booking_total(request.number_of_days)?;

        let booking = MassBooking {
            id: self.next_id(),
            name: request.name.clone(),
            email: request.email.clone(),
            phone: request.phone.clone(),
            date: request.date,
            time: request.time.clone(),
            intention: request.intention.clone(),
            number_of_days: request.number_of_days,
            amount,
            status: ModerationStatus::Pending,
            submitted_at: Utc::now(),
        };
        self.bookings.insert(0, booking);
        self.persist_bookings();

        match self.api.submit_booking(&request).await {
            Ok(created) => {
                self.bookings[0] = created;
                self.persist_bookings();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Booking submit failed, keeping local copy");
                self.sync_transition(Collection::MassBookings, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn set_booking_status(&mut self, id: i64, status: ModerationStatus) -> Result<()> {
        let position = self
            .bookings
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::MassBookings,
                id,
            })?;
        let current = self.bookings[position].status;
        if !current.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                from: current,
                to: status,
            }
            .into());
        }
        if current == status {
            return Ok(());
        }

        self.bookings[position].status = status;
        self.persist_bookings();

        match self.api.set_booking_status(id, status).await {
            Ok(_) => {
                self.reconcile_bookings().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "Booking status update failed, keeping local copy");
                self.sync_transition(Collection::MassBookings, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn submit_prayer(&mut self, prayer: NewPrayer) -> Result<()> {
        let record = PrayerRequest {
            id: self.next_id(),
            name: prayer.name.clone(),
            email: prayer.email.clone(),
            prayer: prayer.prayer.clone(),
            date: Utc::now(),
        };
        self.prayers.insert(0, record);
        self.persist_prayers();

        match self.api.submit_prayer(&prayer).await {
            Ok(created) => {
                self.prayers[0] = created;
                self.persist_prayers();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Prayer submit failed, keeping local copy");
                self.sync_transition(Collection::PrayerRequests, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn delete_prayer(&mut self, id: i64) -> Result<()> {
        let position = self
            .prayers
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::PrayerRequests,
                id,
            })?;
        self.prayers.remove(position);
        self.persist_prayers();

        match self.api.delete_prayer(id).await {
            Ok(()) => {
                self.reconcile_prayers().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "Prayer delete failed, keeping local removal");
                self.sync_transition(Collection::PrayerRequests, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn submit_testimony(&mut self, testimony: NewTestimony) -> Result<()> {
        let record = Testimony {
            id: self.next_id(),
            name: testimony.name.clone(),
            testimony: testimony.testimony.clone(),
            date: Utc::now(),
            status: ModerationStatus::Pending,
        };
        self.testimonies.insert(0, record);
        self.persist_testimonies();

        match self.api.submit_testimony(&testimony).await {
            Ok(created) => {
                self.testimonies[0] = created;
                self.persist_testimonies();
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Testimony submit failed, keeping local copy");
                self.sync_transition(Collection::Testimonies, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn set_testimony_status(&mut self, id: i64, status: ModerationStatus) -> Result<()> {
        let position = self
            .testimonies
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::Testimonies,
                id,
            })?;
        let current = self.testimonies[position].status;
        if !current.can_transition_to(status) {
            return Err(StoreError::InvalidTransition {
                from: current,
                to: status,
            }
            .into());
        }
        if current == status {
            return Ok(());
        }

        self.testimonies[position].status = status;
        self.persist_testimonies();

        match self.api.set_testimony_status(id, status).await {
            Ok(_) => {
                self.reconcile_testimonies().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "Testimony status update failed, keeping local copy");
                self.sync_transition(Collection::Testimonies, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn delete_testimony(&mut self, id: i64) -> Result<()> {
        let position = self
            .testimonies
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::Testimonies,
                id,
            })?;
        self.testimonies.remove(position);
        self.persist_testimonies();

        match self.api.delete_testimony(id).await {
            Ok(()) => {
                self.reconcile_testimonies().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "Testimony delete failed, keeping local removal");
                self.sync_transition(Collection::Testimonies, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn create_announcement(&mut self, draft: AnnouncementDraft) -> Result<()> {
        let record = Announcement {
            id: self.next_id(),
            title: draft.title.clone(),
            content: draft.content.clone(),
            date: Utc::now(),
            priority: draft.priority,
            is_active: true,
        };
        self.announcements.insert(0, record);
        self.persist_announcements();

        match self.api.create_announcement(&draft).await {
            Ok(_) => {
                self.reconcile_announcements().await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Announcement create failed, keeping local copy");
                self.sync_transition(Collection::Announcements, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn update_announcement(&mut self, id: i64, draft: AnnouncementDraft) -> Result<()> {
        let position = self
            .announcements
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::Announcements,
                id,
            })?;
        {
            let announcement = &mut self.announcements[position];
            announcement.title = draft.title.clone();
            announcement.content = draft.content.clone();
            announcement.priority = draft.priority;
        }
        self.persist_announcements();

        match self.api.update_announcement(id, &draft).await {
            Ok(_) => {
                self.reconcile_announcements().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "Announcement update failed, keeping local copy");
                self.sync_transition(Collection::Announcements, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn delete_announcement(&mut self, id: i64) -> Result<()> {
        let position = self
            .announcements
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::Announcements,
                id,
            })?;
        self.announcements.remove(position);
        self.persist_announcements();

        match self.api.delete_announcement(id).await {
            Ok(()) => {
                self.reconcile_announcements().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "Announcement delete failed, keeping local removal");
                self.sync_transition(Collection::Announcements, SyncState::write_failed);
                Err(e)
            }
        }
    }

    pub async fn toggle_announcement(&mut self, id: i64) -> Result<()> {
        let position = self
            .announcements
            .iter()
            .position(|a| a.id == id)
            .ok_or(StoreError::UnknownId {
                collection: Collection::Announcements,
                id,
            })?;
        self.announcements[position].is_active = !self.announcements[position].is_active;
        self.persist_announcements();

        match self.api.toggle_announcement_active(id).await {
            Ok(_) => {
                self.reconcile_announcements().await;
                Ok(())
            }
            Err(e) => {
                warn!(id, error = %e, "Announcement toggle failed, keeping local flag");
                self.sync_transition(Collection::Announcements, SyncState::write_failed);
                Err(e)
            }
        }
    }

    /// Update the contact record. The server's response is canonical.
    pub async fn update_contact(&mut self, contact: ContactInfo) -> Result<()> {
        self.contact = contact;
        self.persist_contact();

        match self.api.update_contact(&self.contact).await {
            Ok(canonical) => {
                self.contact = canonical;
                self.persist_contact();
                self.sync.insert(Collection::Contact, SyncState::Synced);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Contact update failed, keeping local copy");
                self.sync_transition(Collection::Contact, SyncState::write_failed);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Read passthroughs with degraded fallback
    // =========================================================================

    /// Donation figures from the stats endpoint, or computed from the local
    /// donations collection when the endpoint is unreachable.
    pub async fn donation_stats(&self) -> DonationStats {
        match self.api.fetch_donation_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Donation stats fetch failed, computing from local records");
                DonationStats::from_donations(&self.donations)
            }
        }
    }

    /// The moderation queue: pending testimonies from the server, or the
    /// local pending filter when the server is unreachable.
    pub async fn moderation_queue(&self) -> Vec<Testimony> {
        match self.api.fetch_pending_testimonies().await {
            Ok(pending) => pending,
            Err(e) => {
                warn!(error = %e, "Pending testimonies fetch failed, using local filter");
                self.pending_testimonies().into_iter().cloned().collect()
            }
        }
    }

    pub async fn contact_history(&self) -> Vec<ContactRevision> {
        match self.api.fetch_contact_history().await {
            Ok(history) => history,
            Err(e) => {
                warn!(error = %e, "Contact history fetch failed");
                Vec::new()
            }
        }
    }

    pub async fn contact_stats(&self) -> ContactStats {
        match self.api.fetch_contact_stats().await {
            Ok(stats) => stats,
            Err(e) => {
                warn!(error = %e, "Contact stats fetch failed");
                ContactStats::default()
            }
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    async fn reconcile_announcements(&mut self) {
        self.sync_transition(Collection::Announcements, SyncState::fetch_started);
        match self.api.fetch_admin_announcements().await {
            Ok(list) => {
                self.announcements = list;
                self.persist_announcements();
                self.sync_transition(Collection::Announcements, SyncState::fetch_succeeded);
            }
            Err(e) => {
                warn!(error = %e, "Announcement reconcile failed");
                self.sync_transition(Collection::Announcements, SyncState::fetch_failed);
            }
        }
    }

    async fn reconcile_testimonies(&mut self) {
        self.sync_transition(Collection::Testimonies, SyncState::fetch_started);
        match self.api.fetch_admin_testimonies().await {
            Ok(list) => {
                self.testimonies = list;
                self.persist_testimonies();
                self.sync_transition(Collection::Testimonies, SyncState::fetch_succeeded);
            }
            Err(e) => {
                warn!(error = %e, "Testimony reconcile failed");
                self.sync_transition(Collection::Testimonies, SyncState::fetch_failed);
            }
        }
    }

    async fn reconcile_prayers(&mut self) {
        self.sync_transition(Collection::PrayerRequests, SyncState::fetch_started);
        match self.api.fetch_prayers().await {
            Ok(list) => {
                self.prayers = list;
                self.persist_prayers();
                self.sync_transition(Collection::PrayerRequests, SyncState::fetch_succeeded);
            }
            Err(e) => {
                warn!(error = %e, "Prayer reconcile failed");
                self.sync_transition(Collection::PrayerRequests, SyncState::fetch_failed);
            }
        }
    }

    async fn reconcile_bookings(&mut self) {
        self.sync_transition(Collection::MassBookings, SyncState::fetch_started);
        match self.api.fetch_bookings().await {
            Ok(list) => {
                self.bookings = list;
                self.persist_bookings();
                self.sync_transition(Collection::MassBookings, SyncState::fetch_succeeded);
            }
            Err(e) => {
                warn!(error = %e, "Booking reconcile failed");
                self.sync_transition(Collection::MassBookings, SyncState::fetch_failed);
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn sync_transition(&mut self, collection: Collection, apply: fn(SyncState) -> SyncState) {
        let next = apply(self.sync_state(collection));
        self.sync.insert(collection, next);
    }

    /// Time-derived client id, clamped strictly above the last issued id.
    fn next_id(&mut self) -> i64 {
        let mut id = Utc::now().timestamp_millis();
        if id <= self.last_id {
            id = self.last_id + 1;
        }
        self.last_id = id;
        id
    }

    fn persist_donations(&self) {
        if let Err(e) = self.local.save_donations(&self.donations) {
            warn!(error = %e, "Failed to persist donations");
        }
    }

    fn persist_bookings(&self) {
        if let Err(e) = self.local.save_bookings(&self.bookings) {
            warn!(error = %e, "Failed to persist bookings");
        }
    }

    fn persist_prayers(&self) {
        if let Err(e) = self.local.save_prayers(&self.prayers) {
            warn!(error = %e, "Failed to persist prayers");
        }
    }

    fn persist_testimonies(&self) {
        if let Err(e) = self.local.save_testimonies(&self.testimonies) {
            warn!(error = %e, "Failed to persist testimonies");
        }
    }

    fn persist_gallery(&self) {
        if let Err(e) = self.local.save_gallery(&self.gallery) {
            warn!(error = %e, "Failed to persist gallery");
        }
    }

    fn persist_announcements(&self) {
        if let Err(e) = self.local.save_announcements(&self.announcements) {
            warn!(error = %e, "Failed to persist announcements");
        }
    }

    fn persist_purposes(&self) {
        if let Err(e) = self.local.save_purposes(&self.purposes) {
            warn!(error = %e, "Failed to persist donation purposes");
        }
    }

    fn persist_content(&self) {
        if let Err(e) = self.local.save_content(&self.content) {
            warn!(error = %e, "Failed to persist site content");
        }
    }

    fn persist_contact(&self) {
        if let Err(e) = self.local.save_contact(&self.contact) {
            warn!(error = %e, "Failed to persist contact");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaType, Priority};
    use crate::validate::ValidationError;
    use chrono::NaiveDate;

    /// Config pointing at a port nothing listens on, so every remote call
    /// fails fast with a connection error.
    fn scratch_config(name: &str) -> Config {
        let dir = std::env::temp_dir()
            .join("shrinesync-tests")
            .join(format!("store-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        Config {
            api_base_url: "http://127.0.0.1:9/api".to_string(),
            gallery_base_url: "http://127.0.0.1:9/api".to_string(),
            data_dir: Some(dir),
        }
    }

    async fn drain(store: &mut ShrineStore) {
        for _ in 0..600 {
            store.process_pending();
            if !store.is_refreshing() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("background refresh never completed");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_local_snapshot() {
        let config = scratch_config("fallback");
        let seeded = vec![Announcement {
            id: 1,
            title: "Kept".to_string(),
            content: "The local copy survives a dead backend.".to_string(),
            date: Utc::now(),
            priority: Priority::Low,
            is_active: true,
        }];
        LocalStore::new(config.data_dir().unwrap())
            .unwrap()
            .save_announcements(&seeded)
            .unwrap();

        let mut store = ShrineStore::new(config).unwrap();
        store.seed_from_local();
        assert_eq!(
            store.sync_state(Collection::Announcements),
            SyncState::LocalOnly
        );

        store.refresh_all_background(RefreshScope::Public);
        drain(&mut store).await;

        assert_eq!(store.announcements(), &seeded[..]);
        assert_eq!(
            store.sync_state(Collection::Announcements),
            SyncState::SyncFailed
        );
        // Collections without a snapshot fall back to their defaults.
        assert_eq!(store.purposes(), &default_purposes()[..]);
        // Collections outside the refresh scope are untouched.
        assert_eq!(store.sync_state(Collection::Donations), SyncState::LocalOnly);
    }

    #[test]
    fn test_add_donation_prepends_and_persists() {
        let config = scratch_config("donations");
        let mut store = ShrineStore::new(config.clone()).unwrap();
        store.seed_from_local();

        let donation = |name: &str| NewDonation {
            donor_name: name.to_string(),
            amount: 100.0,
            purpose: "General Offering".to_string(),
            email: None,
            phone: None,
        };
        store.add_donation(donation("First")).unwrap();
        store.add_donation(donation("Second")).unwrap();

        assert_eq!(store.donations()[0].donor_name, "Second");
        assert!(store.donations()[0].id > store.donations()[1].id);

        let on_disk = LocalStore::new(config.data_dir().unwrap())
            .unwrap()
            .load_donations()
            .unwrap()
            .expect("snapshot should exist");
        assert_eq!(on_disk.as_slice(), store.donations());
    }

    #[tokio::test]
    async fn test_testimony_approval_is_guarded_and_idempotent() {
        let config = scratch_config("moderation");
        let seeded = vec![Testimony {
            id: 7,
            name: "Grace".to_string(),
            testimony: "Prayers answered".to_string(),
            date: Utc::now(),
            status: ModerationStatus::Pending,
        }];
        LocalStore::new(config.data_dir().unwrap())
            .unwrap()
            .save_testimonies(&seeded)
            .unwrap();

        let mut store = ShrineStore::new(config).unwrap();
        store.seed_from_local();

        // Remote is unreachable: the approval applies locally, the
        // collection is flagged, and the error reaches the caller.
        let result = store
            .set_testimony_status(7, ModerationStatus::Approved)
            .await;
        assert!(result.is_err());
        assert_eq!(store.testimonies()[0].status, ModerationStatus::Approved);
        assert_eq!(
            store.sync_state(Collection::Testimonies),
            SyncState::SyncFailed
        );

        // Re-applying the current status is a no-op, not an error.
        store
            .set_testimony_status(7, ModerationStatus::Approved)
            .await
            .unwrap();
        assert_eq!(store.testimonies()[0].status, ModerationStatus::Approved);

        // Terminal states never move again.
        let err = store
            .set_testimony_status(7, ModerationStatus::Rejected)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::InvalidTransition { .. })
        ));

        let err = store
            .set_testimony_status(99, ModerationStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::UnknownId { .. })
        ));
    }

    #[tokio::test]
    async fn test_booking_submit_validates_before_network() {
        let mut store = ShrineStore::new(scratch_config("booking")).unwrap();
        store.seed_from_local();

        let request = |time: &str| BookingRequest {
            name: "Anthony Fernandes".to_string(),
            email: "anthony@example.com".to_string(),
            phone: "9876543210".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 9).unwrap(), // a Sunday
            time: time.to_string(),
            intention: "In thanksgiving".to_string(),
            number_of_days: 3,
        };

        // Blackout slot: rejected before anything is recorded.
        let err = store.submit_booking(request("07:00")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::BlackoutSlot { .. })
        ));
        assert!(store.bookings().is_empty());

        // Valid booking: recorded locally even though the remote call fails.
        assert!(store.submit_booking(request("06:00")).await.is_err());
        assert_eq!(store.bookings().len(), 1);
        assert_eq!(store.bookings()[0].amount, 450);
        assert_eq!(store.bookings()[0].status, ModerationStatus::Pending);
        assert_eq!(
            store.sync_state(Collection::MassBookings),
            SyncState::SyncFailed
        );
    }

    #[test]
    fn test_gallery_mutations_are_local() {
        let mut store = ShrineStore::new(scratch_config("gallery")).unwrap();
        store.seed_from_local();

        store
            .add_gallery_item(NewGalleryItem {
                media_type: MediaType::Image,
                url: "/images/grotto.jpg".to_string(),
                title: "The grotto at dusk".to_string(),
                category: "Shrine".to_string(),
            })
            .unwrap();
        assert_eq!(store.gallery().len(), 1);

        let id = store.gallery()[0].id;
        store.remove_gallery_item(id).unwrap();
        assert!(store.gallery().is_empty());
        assert!(store.remove_gallery_item(id).is_err());
    }

    #[test]
    fn test_checkout_records_a_donation_once() {
        let mut store = ShrineStore::new(scratch_config("checkout")).unwrap();
        store.seed_from_local();

        store
            .begin_checkout(PaymentData::new(
                "A Devotee".to_string(),
                250.0,
                "Candle Offering".to_string(),
                None,
                None,
            ))
            .unwrap();
        assert!(store.checkout().is_some());

        let amount = store
            .complete_checkout()
            .unwrap()
            .expect("checkout should complete")
            .amount;
        assert_eq!(amount, 250.0);
        assert_eq!(store.donations().len(), 1);
        assert_eq!(store.donations()[0].purpose, "Candle Offering");

        // The session is spent.
        assert!(store.checkout().is_none());
        assert!(store.complete_checkout().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prayer_lifecycle_degrades_when_remote_fails() {
        let mut store = ShrineStore::new(scratch_config("prayers")).unwrap();
        store.seed_from_local();

        let submitted = store
            .submit_prayer(NewPrayer {
                name: "Lucy".to_string(),
                email: None,
                prayer: "For a safe journey".to_string(),
            })
            .await;
        assert!(submitted.is_err());
        assert_eq!(store.prayers().len(), 1);
        assert_eq!(
            store.sync_state(Collection::PrayerRequests),
            SyncState::SyncFailed
        );

        let id = store.prayers()[0].id;
        assert!(store.delete_prayer(id).await.is_err());
        assert!(store.prayers().is_empty());

        let err = store.delete_prayer(id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::UnknownId { .. })
        ));
    }

    #[tokio::test]
    async fn test_announcement_crud_applies_locally_when_remote_fails() {
        let mut store = ShrineStore::new(scratch_config("announcements")).unwrap();
        store.seed_from_local();

        let draft = AnnouncementDraft {
            title: "Feast novena begins".to_string(),
            content: "Nine days of evening prayer start this Friday.".to_string(),
            priority: Priority::High,
        };
        assert!(store.create_announcement(draft.clone()).await.is_err());
        assert_eq!(store.announcements().len(), 1);
        assert!(store.announcements()[0].is_active);

        let id = store.announcements()[0].id;
        assert!(store.toggle_announcement(id).await.is_err());
        assert!(!store.announcements()[0].is_active);
        assert!(store.active_announcements().is_empty());

        let updated = AnnouncementDraft {
            title: "Novena postponed".to_string(),
            ..draft
        };
        assert!(store.update_announcement(id, updated).await.is_err());
        assert_eq!(store.announcements()[0].title, "Novena postponed");

        assert!(store.delete_announcement(id).await.is_err());
        assert!(store.announcements().is_empty());
        assert_eq!(
            store.sync_state(Collection::Announcements),
            SyncState::SyncFailed
        );
    }

    #[tokio::test]
    async fn test_booking_status_shares_the_transition_guard() {
        let config = scratch_config("booking-status");
        let seeded = vec![MassBooking {
            id: 5,
            name: "Anthony Fernandes".to_string(),
            email: "anthony@example.com".to_string(),
            phone: "9876543210".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            time: "06:00".to_string(),
            intention: "In thanksgiving".to_string(),
            number_of_days: 1,
            amount: 150,
            status: ModerationStatus::Pending,
            submitted_at: Utc::now(),
        }];
        LocalStore::new(config.data_dir().unwrap())
            .unwrap()
            .save_bookings(&seeded)
            .unwrap();

        let mut store = ShrineStore::new(config).unwrap();
        store.seed_from_local();

        assert!(store
            .set_booking_status(5, ModerationStatus::Rejected)
            .await
            .is_err()); // remote unreachable
        assert_eq!(store.bookings()[0].status, ModerationStatus::Rejected);

        let err = store
            .set_booking_status(5, ModerationStatus::Approved)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_purpose_edits_persist() {
        let config = scratch_config("purposes");
        let mut store = ShrineStore::new(config.clone()).unwrap();
        store.seed_from_local();
        let seeded_count = store.purposes().len();

        store
            .add_purpose(
                "Roof Restoration".to_string(),
                "Replacing the chapel roof before the monsoon".to_string(),
            )
            .unwrap();
        assert_eq!(store.purposes().len(), seeded_count + 1);
        assert_eq!(store.purposes()[0].name, "Roof Restoration");

        let on_disk = LocalStore::new(config.data_dir().unwrap())
            .unwrap()
            .load_purposes()
            .unwrap()
            .expect("snapshot should exist");
        assert_eq!(on_disk.as_slice(), store.purposes());

        let id = store.purposes()[0].id;
        store.remove_purpose(id).unwrap();
        assert_eq!(store.purposes().len(), seeded_count);
    }

    #[test]
    fn test_site_content_update_persists() {
        let config = scratch_config("content");
        let mut store = ShrineStore::new(config.clone()).unwrap();
        store.seed_from_local();

        let mut content = store.content().clone();
        content.hero_title = "Centenary celebrations".to_string();
        store.update_site_content(content.clone());
        assert_eq!(store.content(), &content);

        let on_disk = LocalStore::new(config.data_dir().unwrap())
            .unwrap()
            .load_content()
            .unwrap()
            .expect("snapshot should exist");
        assert_eq!(on_disk, content);
    }

    #[tokio::test]
    async fn test_contact_update_keeps_local_copy_on_failure() {
        let config = scratch_config("contact");
        let mut store = ShrineStore::new(config.clone()).unwrap();
        store.seed_from_local();

        let mut contact = store.contact().clone();
        contact.phone = "9123456789".to_string();
        assert!(store.update_contact(contact.clone()).await.is_err());
        assert_eq!(store.contact(), &contact);
        assert_eq!(store.sync_state(Collection::Contact), SyncState::SyncFailed);

        let on_disk = LocalStore::new(config.data_dir().unwrap())
            .unwrap()
            .load_contact()
            .unwrap()
            .expect("snapshot should exist");
        assert_eq!(on_disk, contact);
    }

    #[tokio::test]
    async fn test_moderation_queue_falls_back_to_local_filter() {
        let config = scratch_config("queue");
        let seeded = vec![
            Testimony {
                id: 1,
                name: "Grace".to_string(),
                testimony: "Prayers answered".to_string(),
                date: Utc::now(),
                status: ModerationStatus::Pending,
            },
            Testimony {
                id: 2,
                name: "Thomas".to_string(),
                testimony: "Recovered well".to_string(),
                date: Utc::now(),
                status: ModerationStatus::Approved,
            },
        ];
        LocalStore::new(config.data_dir().unwrap())
            .unwrap()
            .save_testimonies(&seeded)
            .unwrap();

        let mut store = ShrineStore::new(config).unwrap();
        store.seed_from_local();

        let queue = store.moderation_queue().await;
        assert_eq!(queue.len(), 1);
        assert_eq!(queue[0].id, 1);
    }

    #[tokio::test]
    async fn test_donation_stats_fall_back_to_local_records() {
        let mut store = ShrineStore::new(scratch_config("stats")).unwrap();
        store.seed_from_local();
        store
            .add_donation(NewDonation {
                donor_name: "A Devotee".to_string(),
                amount: 300.0,
                purpose: "Annual Feast".to_string(),
                email: None,
                phone: None,
            })
            .unwrap();

        let stats = store.donation_stats().await;
        assert_eq!(stats.total_amount, 300.0);
        assert_eq!(stats.donation_count, 1);
    }
}
