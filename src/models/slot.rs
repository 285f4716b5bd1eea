use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A candidate start/end pair for one appointment. Computed fresh on every
/// availability query; never persisted or cached, since it depends on current
/// booking state and the current wall-clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Slot {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }
}
