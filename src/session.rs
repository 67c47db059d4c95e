//! Transient checkout state.
//!
//! The donation flow collects the donor's details on one page and completes
//! payment on another; `CheckoutSession` carries that state across the gap.
//! It is deliberately short-lived: an abandoned checkout expires after 30
//! minutes and is discarded on the next load.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Session file name in the data directory
const SESSION_FILE: &str = "paymentData.json";

/// Minutes before an unfinished checkout is discarded
const CHECKOUT_EXPIRY_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentData {
    pub donor_name: String,
    pub amount: f64,
    pub purpose: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PaymentData {
    pub fn new(
        donor_name: String,
        amount: f64,
        purpose: String,
        email: Option<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            donor_name,
            amount,
            purpose,
            email,
            phone,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        let expiry = self.created_at + Duration::minutes(CHECKOUT_EXPIRY_MINUTES);
        Utc::now() > expiry
    }
}

pub struct CheckoutSession {
    data_dir: PathBuf,
    data: Option<PaymentData>,
}

impl CheckoutSession {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            data: None,
        }
    }

    /// Load checkout state from disk; expired state is dropped.
    pub fn load(&mut self) -> Result<bool> {
        let path = self.session_path();
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .context("Failed to read checkout session file")?;
            let data: PaymentData = serde_json::from_str(&contents)
                .context("Failed to parse checkout session file")?;

            if !data.is_expired() {
                self.data = Some(data);
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn save(&self) -> Result<()> {
        if let Some(ref data) = self.data {
            let path = self.session_path();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let contents = serde_json::to_string_pretty(data)?;
            std::fs::write(path, contents)?;
        }
        Ok(())
    }

    /// Replace the checkout state.
    pub fn update(&mut self, data: PaymentData) {
        self.data = Some(data);
    }

    /// Current checkout state, if a non-expired checkout is in progress.
    pub fn current(&self) -> Option<&PaymentData> {
        self.data.as_ref().filter(|d| !d.is_expired())
    }

    /// Take the checkout state, clearing it from memory and disk.
    pub fn take(&mut self) -> Result<Option<PaymentData>> {
        let data = self.data.take().filter(|d| !d.is_expired());
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to clear checkout session file")?;
        }
        Ok(data)
    }

    fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_session(name: &str) -> CheckoutSession {
        let dir = std::env::temp_dir()
            .join("shrinesync-tests")
            .join(format!("session-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        CheckoutSession::new(dir)
    }

    fn payment() -> PaymentData {
        PaymentData::new(
            "A Devotee".to_string(),
            500.0,
            "General Offering".to_string(),
            None,
            None,
        )
    }

    #[test]
    fn test_take_clears_state() {
        let mut session = scratch_session("take");
        session.update(payment());
        session.save().unwrap();

        let taken = session.take().unwrap();
        assert!(taken.is_some());
        assert!(session.current().is_none());
        assert!(session.take().unwrap().is_none());
    }

    #[test]
    fn test_expired_checkout_is_dropped() {
        let mut session = scratch_session("expired");
        let mut data = payment();
        data.created_at = Utc::now() - Duration::minutes(CHECKOUT_EXPIRY_MINUTES + 1);
        session.update(data);
        session.save().unwrap();

        assert!(session.current().is_none());
        assert!(session.take().unwrap().is_none());
    }

    #[test]
    fn test_round_trip_via_disk() {
        let mut session = scratch_session("disk");
        session.update(payment());
        session.save().unwrap();

        let mut reloaded = CheckoutSession::new(session.data_dir.clone());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.current().unwrap().amount, 500.0);
    }
}
