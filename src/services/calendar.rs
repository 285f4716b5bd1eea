use chrono::{NaiveDate, NaiveDateTime};

use crate::models::OperatingProfile;
use crate::services::ScheduleError;

/// The raw window in which slots can exist on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatingWindow {
    pub open: NaiveDateTime,
    pub close: NaiveDateTime,
}

/// Resolves the working window for `date`, or `StoreClosed` when the weekday
/// is not among the profile's working days. Callers on the availability read
/// path treat `StoreClosed` as "zero slots", not a failure.
pub fn operating_window(
    profile: &OperatingProfile,
    date: NaiveDate,
) -> Result<OperatingWindow, ScheduleError> {
    let day = date.format("%a").to_string().to_lowercase();
    if !profile.is_open_on(&day) {
        return Err(ScheduleError::StoreClosed {
            hours: profile.to_human_readable(),
        });
    }
    Ok(OperatingWindow {
        open: date.and_time(profile.opening_time),
        close: date.and_time(profile.closing_time),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn profile(days: &str) -> OperatingProfile {
        OperatingProfile::parse(days, "09:00", "17:00").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_open_weekday_yields_window() {
        // 2025-06-17 is a Tuesday
        let w = operating_window(&profile("mon,tue,wed,thu,fri"), date("2025-06-17")).unwrap();
        assert_eq!(w.open.format("%Y-%m-%d %H:%M").to_string(), "2025-06-17 09:00");
        assert_eq!(w.close.format("%Y-%m-%d %H:%M").to_string(), "2025-06-17 17:00");
    }

    #[test]
    fn test_closed_weekday_is_store_closed() {
        // 2025-06-15 is a Sunday
        let err = operating_window(&profile("mon,tue,wed,thu,fri"), date("2025-06-15")).unwrap_err();
        assert!(matches!(err, ScheduleError::StoreClosed { .. }));
    }

    #[test]
    fn test_json_working_days_accepted() {
        let p = OperatingProfile::parse(r#"["sat","sun"]"#, "10:00", "14:00").unwrap();
        assert!(operating_window(&p, date("2025-06-15")).is_ok());
        assert!(operating_window(&p, date("2025-06-16")).is_err());
    }
}
