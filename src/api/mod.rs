//! REST client module for the shrine web API.
//!
//! This module provides the `ApiClient` for talking to the shrine backend
//! (announcements, testimonies, prayers, bookings, contact, donation reads)
//! and to the external gallery collaborator.
//!
//! Every endpoint wraps its payload in the `{success, data, message}`
//! envelope; a 2xx response carrying `success: false` is a server-side
//! rejection and surfaces as `ApiError::Rejected`.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
