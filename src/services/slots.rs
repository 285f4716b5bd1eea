use chrono::{Duration, NaiveDateTime};

use crate::models::Slot;
use crate::services::calendar::OperatingWindow;

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
/// Back-to-back intervals (one ends exactly where the other starts) do not
/// overlap.
pub fn overlaps(
    a_start: NaiveDateTime,
    a_end: NaiveDateTime,
    b_start: NaiveDateTime,
    b_end: NaiveDateTime,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Enumerates candidate slots for one operating window: starts at opening,
/// steps by `interval_minutes`, keeps a slot only when it fits entirely
/// before closing. Pure function of its inputs; booking state is applied by
/// the availability filter, not here.
pub fn generate_slots(
    window: &OperatingWindow,
    duration_minutes: i64,
    interval_minutes: i64,
) -> Vec<Slot> {
    if duration_minutes <= 0 || interval_minutes <= 0 {
        return Vec::new();
    }
    let duration = Duration::minutes(duration_minutes);
    let step = Duration::minutes(interval_minutes);

    let mut slots = Vec::new();
    let mut start = window.open;
    while start + duration <= window.close {
        slots.push(Slot::new(start, start + duration));
        start = start + step;
    }
    slots
}
