use std::collections::BTreeSet;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

const DAY_ORDER: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Working days plus daily opening window for a store or branch. Legacy rows
/// store `working_days` as either a comma-separated string ("Mon,Tue" or
/// "monday,tuesday") or a JSON array (["mon","tue"]); both are normalized to
/// a set of lowercase three-letter day keys here, at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingProfile {
    pub working_days: BTreeSet<String>,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl OperatingProfile {
    pub fn parse(working_days: &str, opening: &str, closing: &str) -> anyhow::Result<Self> {
        let working_days = parse_working_days(working_days)?;
        let opening_time = parse_time(opening)?;
        let closing_time = parse_time(closing)?;
        if closing_time <= opening_time {
            anyhow::bail!("closing time {closing} is not after opening time {opening}");
        }
        Ok(Self {
            working_days,
            opening_time,
            closing_time,
        })
    }

    /// `day` is a lowercase three-letter key ("mon".."sun").
    pub fn is_open_on(&self, day: &str) -> bool {
        self.working_days.contains(day)
    }

    pub fn to_human_readable(&self) -> String {
        let days: Vec<String> = DAY_ORDER
            .iter()
            .filter(|d| self.working_days.contains(**d))
            .map(|d| capitalize(d))
            .collect();
        format!(
            "{}: {}-{}",
            days.join(", "),
            self.opening_time.format("%H:%M"),
            self.closing_time.format("%H:%M")
        )
    }
}

fn parse_working_days(raw: &str) -> anyhow::Result<BTreeSet<String>> {
    let trimmed = raw.trim();

    let names: Vec<String> = if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<String>>(trimmed)
            .map_err(|e| anyhow::anyhow!("invalid working_days JSON array: {e}"))?
    } else {
        trimmed
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    };

    let mut days = BTreeSet::new();
    for name in &names {
        days.insert(day_key(name)?);
    }
    Ok(days)
}

/// Accepts "mon", "Mon", "monday", "MONDAY"; anything recognizable collapses
/// to its three-letter key.
pub fn day_key(name: &str) -> anyhow::Result<String> {
    let lower = name.trim().to_lowercase();
    let key: String = lower.chars().take(3).collect();
    if DAY_ORDER.contains(&key.as_str()) {
        Ok(key)
    } else {
        Err(anyhow::anyhow!("invalid weekday: {name}"))
    }
}

pub fn parse_time(s: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| anyhow::anyhow!("invalid time (expected HH:MM): {s}"))
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + c.as_str(),
    }
}
