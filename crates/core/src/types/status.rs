//! Order status enum and its transition table.
//!
//! The backend stores order status as a bare string and is the final
//! arbiter of transitions. The client still models the status as a closed
//! enum with an explicit transition table so it can reject impossible
//! edits before a network round trip and never render an unknown state.

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// An order starts as [`New`](Self::New). Valid transitions:
///
/// ```text
/// new ──────────► in_progress ──► completed
///  │                   │
///  └──► canceled ◄─────┘
/// ```
///
/// Every status may also transition to itself (idempotent update).
/// `completed` and `canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    New,
    InProgress,
    Completed,
    Canceled,
}

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::Completed, Self::Canceled];

    /// Whether no further transitions are possible out of this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }

    /// Whether moving from `self` to `next` is a valid transition.
    ///
    /// Any status may transition to itself; nothing leaves a terminal
    /// status. The backend enforces the same table - this check only
    /// saves a round trip and keeps cached state sane.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next {
            return true;
        }
        match self {
            Self::New => matches!(next, Self::InProgress | Self::Canceled),
            Self::InProgress => matches!(next, Self::Completed | Self::Canceled),
            Self::Completed | Self::Canceled => false,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "canceled" => Ok(Self::Canceled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_transitions_allowed() {
        for status in OrderStatus::ALL {
            assert!(status.can_transition_to(status), "{status} -> {status}");
        }
    }

    #[test]
    fn test_new_transitions() {
        assert!(OrderStatus::New.can_transition_to(OrderStatus::InProgress));
        assert!(OrderStatus::New.can_transition_to(OrderStatus::Canceled));
        assert!(!OrderStatus::New.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn test_in_progress_transitions() {
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::InProgress.can_transition_to(OrderStatus::Canceled));
        assert!(!OrderStatus::InProgress.can_transition_to(OrderStatus::New));
    }

    #[test]
    fn test_terminal_states_are_closed() {
        for terminal in [OrderStatus::Completed, OrderStatus::Canceled] {
            assert!(terminal.is_terminal());
            for next in OrderStatus::ALL {
                if next != terminal {
                    assert!(!terminal.can_transition_to(next), "{terminal} -> {next}");
                }
            }
        }
    }

    #[test]
    fn test_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).expect("serialize"),
            "\"in_progress\""
        );
        let status: OrderStatus = serde_json::from_str("\"canceled\"").expect("deserialize");
        assert_eq!(status, OrderStatus::Canceled);
    }

    #[test]
    fn test_display_from_str_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
