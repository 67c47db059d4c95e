//! Local snapshot persistence.
//!
//! This module provides the `LocalStore`, the crate's stand-in for the
//! browser's local storage: one JSON file per collection under the data
//! directory, written synchronously after every mutation so the snapshot on
//! disk always matches the collection in memory.

pub mod local;

pub use local::LocalStore;
