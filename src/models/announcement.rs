use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort weight, highest priority first.
    pub fn weight(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

fn default_active() -> bool {
    true
}

/// A shrine notice. The public endpoint serves only active announcements;
/// the admin endpoint serves all of them and backs the CRUD operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct Announcement {
    #[serde(default)]
    pub id: i64,
    pub title: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub priority: Priority,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Body for announcement create and update calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct AnnouncementDraft {
    pub title: String,
    pub content: String,
    pub priority: Priority,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_defaults_to_active() {
        let json = r#"{
            "id": 3,
            "title": "Novena timings",
            "content": "The evening novena moves to 18:30 from next week.",
            "date": "2026-08-01T09:00:00Z",
            "priority": "medium"
        }"#;
        let parsed: Announcement = serde_json::from_str(json).expect("announcement should parse");
        assert!(parsed.is_active);
        assert_eq!(parsed.priority, Priority::Medium);
    }

    #[test]
    fn test_priority_ordering() {
        let mut priorities = vec![Priority::Low, Priority::High, Priority::Medium];
        priorities.sort_by_key(|p| p.weight());
        assert_eq!(priorities, vec![Priority::High, Priority::Medium, Priority::Low]);
    }
}
