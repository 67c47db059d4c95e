//! shrinesync CLI - sync the shrine site's collections and report status.
//!
//! Runs one refresh against the configured backend and prints what each
//! collection resolved to. Pass `--admin` to sync the admin-side reads
//! (full announcement and testimony lists, prayers, bookings) instead of
//! the public ones.

use std::io;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use shrinesync::{Collection, Config, RefreshScope, ShrineStore};

// ============================================================================
// Constants
// ============================================================================

/// Interval between drains of the refresh channel (in milliseconds)
const POLL_INTERVAL_MS: u64 = 100;

/// Give up waiting for the refresh after this many polls (60s total)
const MAX_POLLS: u32 = 600;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let scope = if args.iter().any(|a| a == "--admin") {
        RefreshScope::Admin
    } else {
        RefreshScope::Public
    };

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    };
    info!(api = %config.api_base_url, ?scope, "shrinesync starting");

    let mut store = ShrineStore::new(config)?;
    store.seed_from_local();

    store.refresh_all_background(scope);
    let mut polls = 0;
    while store.is_refreshing() && polls < MAX_POLLS {
        tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        store.process_pending();
        polls += 1;
    }
    if store.is_refreshing() {
        warn!("Refresh did not complete in time; reporting current state");
    }

    println!("collection          records  state");
    for collection in Collection::ALL {
        println!(
            "{:<20} {:>6}  {}",
            collection.to_string(),
            store.record_count(collection),
            store.sync_state(collection)
        );
    }

    if scope == RefreshScope::Admin {
        let queue = store.moderation_queue().await;
        let stats = store.donation_stats().await;
        let contact_stats = store.contact_stats().await;
        let history = store.contact_history().await;
        println!();
        println!("testimonies awaiting review: {}", queue.len());
        println!(
            "donations: {} totalling {:.2}",
            stats.donation_count, stats.total_amount
        );
        println!(
            "contact record: {} updates, {} revisions on file",
            contact_stats.total_updates,
            history.len()
        );
    }

    Ok(())
}
