pub mod admission;
pub mod availability;
pub mod calendar;
pub mod notify;
pub mod rules;
pub mod slots;

/// Scheduling outcomes a client can act on. `SlotNoLongerAvailable` is the
/// benign race (someone else took the slot between query and write) and maps
/// to 409 so callers know to re-query and retry with a different slot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("the store is closed that day. Open hours: {hours}")]
    StoreClosed { hours: String },

    #[error("that time is outside operating hours. Open hours: {hours}")]
    OutsideOperatingHours { hours: String },

    #[error("bookings must be made at least {min_minutes} minutes in advance")]
    TooSoon { min_minutes: i64 },

    #[error("bookings can be made at most {max_minutes} minutes in advance")]
    TooFar { max_minutes: i64 },

    #[error("this service is not currently accepting bookings")]
    BookingDisabled,

    #[error("this service requires a consultation and cannot be booked by slot")]
    NotSlotBookable,

    #[error("that slot is no longer available, please pick another time")]
    SlotNoLongerAvailable,

    #[error("cannot move a booking from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl ScheduleError {
    /// Stable machine-readable code carried in error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            ScheduleError::StoreClosed { .. } => "store_closed",
            ScheduleError::OutsideOperatingHours { .. } => "outside_operating_hours",
            ScheduleError::TooSoon { .. } => "too_soon",
            ScheduleError::TooFar { .. } => "too_far",
            ScheduleError::BookingDisabled => "booking_disabled",
            ScheduleError::NotSlotBookable => "not_slot_bookable",
            ScheduleError::SlotNoLongerAvailable => "slot_no_longer_available",
            ScheduleError::InvalidTransition { .. } => "invalid_transition",
        }
    }
}
