use serde::{Deserialize, Serialize};

/// Review status shared by mass bookings and testimonies.
///
/// Items are created `Pending` and move to `Approved` or `Rejected` exactly
/// once, by an administrative action. There is no path back to `Pending` and
/// no path between the two terminal states; re-applying the current status is
/// a permitted no-op so that a double-click on "approve" stays harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    /// Whether a transition from `self` to `next` is allowed.
    pub fn can_transition_to(self, next: ModerationStatus) -> bool {
        self == next || self == ModerationStatus::Pending
    }

    pub fn is_pending(self) -> bool {
        self == ModerationStatus::Pending
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModerationStatus::Pending => write!(f, "pending"),
            ModerationStatus::Approved => write!(f, "approved"),
            ModerationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ModerationStatus::*;

    #[test]
    fn test_pending_can_be_resolved() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
    }

    #[test]
    fn test_same_state_is_allowed() {
        assert!(Pending.can_transition_to(Pending));
        assert!(Approved.can_transition_to(Approved));
        assert!(Rejected.can_transition_to(Rejected));
    }

    #[test]
    fn test_terminal_states_are_final() {
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Approved.can_transition_to(Pending));
        assert!(!Rejected.can_transition_to(Pending));
    }

    #[test]
    fn test_wire_format_is_lowercase() {
        assert_eq!(serde_json::to_string(&Approved).unwrap(), "\"approved\"");
        let parsed: super::ModerationStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, Pending);
    }
}
