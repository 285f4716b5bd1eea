use chrono::{Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookableEntity, Booking, OperatingProfile, Slot};
use crate::services::calendar::operating_window;
use crate::services::slots::{generate_slots, overlaps};
use crate::services::{rules, ScheduleError};

/// Read-path result: the bookable slots for one day, plus an explanatory
/// message when the day is closed. A closed or fully-booked day is an empty
/// list, never an error.
#[derive(Debug, Serialize)]
pub struct DayAvailability {
    pub available_slots: Vec<Slot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Removes candidates whose buffered conflict count has reached the entity's
/// capacity. Bookings are "busy" over `[start, end + buffer)`; a candidate
/// starting exactly at a booking's unbuffered end is legal. The empty booking
/// list and overbookable entities short-circuit untouched.
pub fn filter_available(
    candidates: Vec<Slot>,
    bookings: &[Booking],
    entity: &BookableEntity,
) -> Vec<Slot> {
    if bookings.is_empty() || entity.allow_overbooking {
        return candidates;
    }
    let buffer = Duration::minutes(entity.buffer_minutes);
    candidates
        .into_iter()
        .filter(|slot| {
            let taken = bookings
                .iter()
                .filter(|b| b.status.holds_capacity())
                .filter(|b| overlaps(slot.start, slot.end, b.start_time, b.end_time + buffer))
                .count() as i64;
            taken < entity.max_concurrent
        })
        .collect()
}

/// Full read path for `GET /api/availability`: operating window, candidate
/// generation, conflict filtering, advance-window filtering. Recomputed from
/// current state on every call; nothing is cached.
pub fn day_availability(
    conn: &Connection,
    entity: &BookableEntity,
    profile: &OperatingProfile,
    date: NaiveDate,
    now: NaiveDateTime,
) -> Result<DayAvailability, AppError> {
    rules::ensure_bookable(entity)?;

    let window = match operating_window(profile, date) {
        Ok(w) => w,
        Err(ScheduleError::StoreClosed { hours }) => {
            return Ok(DayAvailability {
                available_slots: Vec::new(),
                message: Some(format!("Closed that day. Open hours: {hours}")),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let duration = entity
        .duration_minutes
        .ok_or(ScheduleError::NotSlotBookable)?;
    let interval = entity
        .effective_interval()
        .ok_or(ScheduleError::NotSlotBookable)?;

    let candidates = generate_slots(&window, duration, interval);

    // Bookings whose buffered interval can touch the window.
    let from = window.open - Duration::minutes(entity.buffer_minutes);
    let bookings = queries::find_active_bookings(conn, entity, from, window.close)?;

    let mut slots = filter_available(candidates, &bookings, entity);
    slots.retain(|s| rules::validate_advance(s.start, entity, now).is_ok());

    Ok(DayAvailability {
        available_slots: slots,
        message: None,
    })
}
