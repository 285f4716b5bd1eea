use chrono::NaiveDateTime;

use crate::models::BookableEntity;
use crate::services::ScheduleError;

/// Entity-level gate applied before any slot math. Dynamic services (no fixed
/// duration) need a consultation and are never slot-booked.
pub fn ensure_bookable(entity: &BookableEntity) -> Result<(), ScheduleError> {
    if !entity.booking_enabled || !entity.active {
        return Err(ScheduleError::BookingDisabled);
    }
    if entity.is_dynamic() {
        return Err(ScheduleError::NotSlotBookable);
    }
    Ok(())
}

/// Advance-booking window, relative to the injected clock. A slot starting at
/// exactly `now + min_advance_minutes` is accepted; both bounds are
/// inclusive. Re-applied at admission time because `now` moves between the
/// availability query and the write.
pub fn validate_advance(
    slot_start: NaiveDateTime,
    entity: &BookableEntity,
    now: NaiveDateTime,
) -> Result<(), ScheduleError> {
    let advance = (slot_start - now).num_minutes();
    if advance < entity.min_advance_minutes {
        return Err(ScheduleError::TooSoon {
            min_minutes: entity.min_advance_minutes,
        });
    }
    if let Some(max) = entity.max_advance_minutes {
        if advance > max {
            return Err(ScheduleError::TooFar { max_minutes: max });
        }
    }
    Ok(())
}
