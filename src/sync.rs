//! Per-collection synchronization state.
//!
//! Each collection resolves its displayed data from exactly one of two
//! sources: the last successful remote fetch, or the last local snapshot
//! (falling back to a built-in default). `SyncState` makes that resolution
//! explicit instead of leaving it implicit in call order.

/// The collections managed by the store, each owning its storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Donations,
    MassBookings,
    PrayerRequests,
    Testimonies,
    Gallery,
    Announcements,
    DonationPurposes,
    SiteContent,
    Contact,
}

impl Collection {
    pub const ALL: [Collection; 9] = [
        Collection::Donations,
        Collection::MassBookings,
        Collection::PrayerRequests,
        Collection::Testimonies,
        Collection::Gallery,
        Collection::Announcements,
        Collection::DonationPurposes,
        Collection::SiteContent,
        Collection::Contact,
    ];

    /// Local snapshot key, matching the keys the web frontend persisted
    /// under. `DonationPurposes` predates the snapshot scheme and uses the
    /// same naming convention.
    pub fn storage_key(self) -> &'static str {
        match self {
            Collection::Donations => "shrine_donations",
            Collection::MassBookings => "shrine_mass_bookings",
            Collection::PrayerRequests => "shrine_prayer_requests",
            Collection::Testimonies => "shrine_testimonies",
            Collection::Gallery => "shrine_gallery",
            Collection::Announcements => "shrine_announcements",
            Collection::DonationPurposes => "shrine_donation_purposes",
            Collection::SiteContent => "shrine_site_content",
            Collection::Contact => "shrine_contact",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Collection::Donations => "donations",
            Collection::MassBookings => "mass bookings",
            Collection::PrayerRequests => "prayer requests",
            Collection::Testimonies => "testimonies",
            Collection::Gallery => "gallery",
            Collection::Announcements => "announcements",
            Collection::DonationPurposes => "donation purposes",
            Collection::SiteContent => "site content",
            Collection::Contact => "contact",
        };
        write!(f, "{}", name)
    }
}

/// Resolution state of one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Nothing has been loaded yet.
    Uninitialized,
    /// Seeded from the local snapshot or a built-in default.
    LocalOnly,
    /// A fetch is in flight; the previous data is still displayed.
    Syncing,
    /// The remote data won; memory and disk hold the server's copy.
    Synced,
    /// The last fetch or remote write failed; local data is retained.
    SyncFailed,
}

impl SyncState {
    /// Seeding only moves an untouched collection to `LocalOnly`; a later
    /// re-seed never downgrades a synced collection.
    pub fn after_seed(self) -> SyncState {
        match self {
            SyncState::Uninitialized => SyncState::LocalOnly,
            other => other,
        }
    }

    pub fn fetch_started(self) -> SyncState {
        SyncState::Syncing
    }

    /// A fetch result only lands while the collection is `Syncing`; a
    /// response that resolves after its refresh was superseded is dropped.
    pub fn fetch_succeeded(self) -> SyncState {
        match self {
            SyncState::Syncing => SyncState::Synced,
            other => other,
        }
    }

    pub fn fetch_failed(self) -> SyncState {
        match self {
            SyncState::Syncing => SyncState::SyncFailed,
            other => other,
        }
    }

    /// A remote write failed after the local patch was applied; the
    /// collection carries local changes the server has not accepted.
    pub fn write_failed(self) -> SyncState {
        SyncState::SyncFailed
    }

    /// Whether the displayed data is the server's copy.
    pub fn uses_remote_data(self) -> bool {
        self == SyncState::Synced
    }
}

impl std::fmt::Display for SyncState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SyncState::Uninitialized => "uninitialized",
            SyncState::LocalOnly => "local-only",
            SyncState::Syncing => "syncing",
            SyncState::Synced => "synced",
            SyncState::SyncFailed => "sync-failed",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_initializes_once() {
        assert_eq!(SyncState::Uninitialized.after_seed(), SyncState::LocalOnly);
        assert_eq!(SyncState::Synced.after_seed(), SyncState::Synced);
        assert_eq!(SyncState::SyncFailed.after_seed(), SyncState::SyncFailed);
    }

    #[test]
    fn test_fetch_lifecycle() {
        let state = SyncState::LocalOnly.fetch_started();
        assert_eq!(state, SyncState::Syncing);
        assert_eq!(state.fetch_succeeded(), SyncState::Synced);
        assert_eq!(state.fetch_failed(), SyncState::SyncFailed);
    }

    #[test]
    fn test_late_results_are_dropped() {
        // A response landing after the refresh was superseded must not
        // flip the state.
        assert_eq!(SyncState::Synced.fetch_succeeded(), SyncState::Synced);
        assert_eq!(SyncState::LocalOnly.fetch_succeeded(), SyncState::LocalOnly);
        assert_eq!(SyncState::Synced.fetch_failed(), SyncState::Synced);
    }

    #[test]
    fn test_only_synced_uses_remote_data() {
        for state in [
            SyncState::Uninitialized,
            SyncState::LocalOnly,
            SyncState::Syncing,
            SyncState::SyncFailed,
        ] {
            assert!(!state.uses_remote_data());
        }
        assert!(SyncState::Synced.uses_remote_data());
    }

    #[test]
    fn test_storage_keys_are_unique() {
        let keys: Vec<_> = Collection::ALL.iter().map(|c| c.storage_key()).collect();
        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len());
    }
}
