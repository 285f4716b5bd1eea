use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::EntityType;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub entity_id: String,
    pub entity_type: EntityType,
    pub staff_id: Option<String>,
    pub customer_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub status: BookingStatus,
    pub verification_code: String,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
    Fulfilled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
            BookingStatus::Fulfilled => "fulfilled",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => BookingStatus::Confirmed,
            "in_progress" => BookingStatus::InProgress,
            "completed" => BookingStatus::Completed,
            "cancelled" => BookingStatus::Cancelled,
            "no_show" => BookingStatus::NoShow,
            "fulfilled" => BookingStatus::Fulfilled,
            _ => BookingStatus::Pending,
        }
    }

    /// A cancelled booking stops counting against slot capacity; every other
    /// status holds its reservation.
    pub fn holds_capacity(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed
                | BookingStatus::Cancelled
                | BookingStatus::NoShow
                | BookingStatus::Fulfilled
        )
    }

    /// Legal status transitions:
    /// pending -> confirmed | cancelled
    /// confirmed -> in_progress | cancelled | no_show
    /// in_progress -> completed
    /// completed -> fulfilled
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (InProgress, Completed)
                | (Completed, Fulfilled)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in [
            "pending",
            "confirmed",
            "in_progress",
            "completed",
            "cancelled",
            "no_show",
            "fulfilled",
        ] {
            assert_eq!(BookingStatus::parse(s).as_str(), s);
        }
    }

    #[test]
    fn test_unknown_status_defaults_to_pending() {
        assert_eq!(BookingStatus::parse("garbage"), BookingStatus::Pending);
    }

    #[test]
    fn test_legal_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(InProgress));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Fulfilled));
    }

    #[test]
    fn test_illegal_transitions() {
        use BookingStatus::*;
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(InProgress));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!NoShow.can_transition_to(Confirmed));
        assert!(!InProgress.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states() {
        use BookingStatus::*;
        for s in [Completed, Cancelled, NoShow, Fulfilled] {
            assert!(s.is_terminal());
        }
        for s in [Pending, Confirmed, InProgress] {
            assert!(!s.is_terminal());
        }
    }

    #[test]
    fn test_cancelled_releases_capacity() {
        assert!(!BookingStatus::Cancelled.holds_capacity());
        assert!(BookingStatus::Pending.holds_capacity());
        assert!(BookingStatus::NoShow.holds_capacity());
    }
}
