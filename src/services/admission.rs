use chrono::{Duration, NaiveDateTime};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, EntityType, Slot};
use crate::services::calendar::operating_window;
use crate::services::slots::overlaps;
use crate::services::{rules, ScheduleError};

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub customer_id: String,
    pub start_time: NaiveDateTime,
    pub notes: Option<String>,
}

/// The write path. Re-derives the requested slot from current entity state
/// and re-runs the calendar, rule, and conflict checks before inserting, so a
/// slot that was free at query time but is taken now comes back as
/// `SlotNoLongerAvailable`.
///
/// The caller holds the connection mutex for the whole call and the
/// conflict-check-plus-insert runs in one SQLite transaction, which together
/// serialize racing admissions: for a capacity-1 slot, exactly one of N
/// concurrent attempts commits. A rejection leaves no partial state behind.
pub fn admit_booking(
    conn: &mut Connection,
    req: &BookingRequest,
    now: NaiveDateTime,
) -> Result<Booking, AppError> {
    let entity = queries::get_entity(conn, &req.entity_id, req.entity_type)?
        .ok_or_else(|| AppError::NotFound(format!("entity {}", req.entity_id)))?;

    rules::ensure_bookable(&entity)?;
    let duration = entity
        .duration_minutes
        .ok_or(ScheduleError::NotSlotBookable)?;
    let end_time = req.start_time + Duration::minutes(duration);

    let profile = queries::get_operating_profile(conn, &entity.store_id, entity.branch_id.as_deref())?
        .ok_or_else(|| AppError::NotFound(format!("operating profile for store {}", entity.store_id)))?;

    let window = match operating_window(&profile, req.start_time.date()) {
        Ok(w) => w,
        Err(ScheduleError::StoreClosed { hours }) => {
            return Err(ScheduleError::OutsideOperatingHours { hours }.into());
        }
        Err(e) => return Err(e.into()),
    };
    if req.start_time < window.open || end_time > window.close {
        return Err(ScheduleError::OutsideOperatingHours {
            hours: profile.to_human_readable(),
        }
        .into());
    }

    rules::validate_advance(req.start_time, &entity, now)?;

    let slot = Slot::new(req.start_time, end_time);
    let buffer = Duration::minutes(entity.buffer_minutes);

    let tx = conn.transaction()?;

    let existing =
        queries::find_active_bookings(&tx, &entity, slot.start - buffer, slot.end)?;
    let taken = existing
        .iter()
        .filter(|b| b.status.holds_capacity())
        .filter(|b| overlaps(slot.start, slot.end, b.start_time, b.end_time + buffer))
        .count() as i64;
    if taken >= entity.max_concurrent && !entity.allow_overbooking {
        // dropping the transaction rolls it back
        return Err(ScheduleError::SlotNoLongerAvailable.into());
    }

    let status = if entity.auto_confirm {
        BookingStatus::Confirmed
    } else {
        BookingStatus::Pending
    };
    let booking = Booking {
        id: Uuid::new_v4().to_string(),
        entity_id: entity.id.clone(),
        entity_type: entity.entity_type,
        staff_id: entity.staff_id.clone(),
        customer_id: req.customer_id.clone(),
        start_time: slot.start,
        end_time: slot.end,
        status,
        verification_code: new_verification_code(),
        notes: req.notes.clone(),
        created_at: now,
        updated_at: now,
    };
    queries::insert_booking(&tx, &booking)?;
    tx.commit()?;

    Ok(booking)
}

/// Merchant/staff status change, constrained to the booking state machine.
pub fn transition_booking(
    conn: &Connection,
    id: &str,
    next: BookingStatus,
    now: NaiveDateTime,
) -> Result<Booking, AppError> {
    let mut booking = queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    if !booking.status.can_transition_to(next) {
        return Err(ScheduleError::InvalidTransition {
            from: booking.status.as_str(),
            to: next.as_str(),
        }
        .into());
    }

    queries::update_booking_status(conn, id, next, now)?;
    booking.status = next;
    booking.updated_at = now;
    Ok(booking)
}

fn new_verification_code() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..8].to_uppercase()
}
