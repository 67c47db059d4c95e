//! Data models for the shrine website collections.
//!
//! This module contains the wire-level data structures exchanged with the
//! shrine REST API and persisted to the local snapshot store:
//!
//! - `Donation`, `DonationPurpose`, `DonationStats`: offerings and reporting
//! - `MassBooking`, `BookingRequest`: mass intention bookings
//! - `PrayerRequest`, `Testimony`: devotee submissions with moderation
//! - `GalleryItem`: public photo/video gallery entries
//! - `Announcement`: shrine notices with priority and active flag
//! - `SiteContent`, `ContactInfo`: page copy and contact details

pub mod announcement;
pub mod booking;
pub mod content;
pub mod donation;
pub mod gallery;
pub mod moderation;
pub mod prayer;
pub mod testimony;

pub use announcement::{Announcement, AnnouncementDraft, Priority};
pub use booking::{BookingRequest, MassBooking};
pub use content::{ContactInfo, ContactRevision, ContactStats, SiteContent};
pub use donation::{
    default_purposes, Donation, DonationPurpose, DonationStats, NewDonation, PurposeTotal,
};
pub use gallery::{GalleryItem, MediaType, NewGalleryItem};
pub use moderation::ModerationStatus;
pub use prayer::{NewPrayer, PrayerRequest};
pub use testimony::{NewTestimony, Testimony};
