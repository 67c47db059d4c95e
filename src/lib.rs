//! Offline-first data layer for the shrine website.
//!
//! The crate mirrors what the site actually needs: a REST client for the
//! shrine backend, a local snapshot store standing in for the browser's
//! local storage, the domain models, the booking/donation form validators,
//! and the `ShrineStore` that ties them together - seed from the snapshot,
//! refresh from the server in the background, and let either side fail
//! without taking the other down.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod session;
pub mod store;
pub mod sync;
pub mod validate;

pub use api::{ApiClient, ApiError};
pub use cache::LocalStore;
pub use config::Config;
pub use session::{CheckoutSession, PaymentData};
pub use store::{RefreshScope, ShrineStore, StoreError};
pub use sync::{Collection, SyncState};
pub use validate::ValidationError;
