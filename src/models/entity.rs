use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Service,
    Offer,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Service => "service",
            EntityType::Offer => "offer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "service" => Some(EntityType::Service),
            "offer" => Some(EntityType::Offer),
            _ => None,
        }
    }
}

/// A thing customers can reserve: a service, or an offer wrapping a service.
/// `duration_minutes` of `None` marks a dynamic service (priceable only after
/// consultation) which is excluded from slot generation entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookableEntity {
    pub id: String,
    pub entity_type: EntityType,
    pub name: String,
    pub store_id: String,
    pub branch_id: Option<String>,
    pub staff_id: Option<String>,
    pub duration_minutes: Option<i64>,
    pub slot_interval: Option<i64>,
    pub buffer_minutes: i64,
    pub max_concurrent: i64,
    pub allow_overbooking: bool,
    pub min_advance_minutes: i64,
    pub max_advance_minutes: Option<i64>,
    pub booking_enabled: bool,
    pub auto_confirm: bool,
    pub active: bool,
}

impl BookableEntity {
    pub fn is_dynamic(&self) -> bool {
        self.duration_minutes.is_none()
    }

    /// Slot stepping interval: explicit `slot_interval` when set, else the
    /// service duration.
    pub fn effective_interval(&self) -> Option<i64> {
        self.slot_interval.or(self.duration_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(duration: Option<i64>, interval: Option<i64>) -> BookableEntity {
        BookableEntity {
            id: "svc-1".to_string(),
            entity_type: EntityType::Service,
            name: "Haircut".to_string(),
            store_id: "store-1".to_string(),
            branch_id: None,
            staff_id: None,
            duration_minutes: duration,
            slot_interval: interval,
            buffer_minutes: 0,
            max_concurrent: 1,
            allow_overbooking: false,
            min_advance_minutes: 0,
            max_advance_minutes: None,
            booking_enabled: true,
            auto_confirm: false,
            active: true,
        }
    }

    #[test]
    fn test_interval_defaults_to_duration() {
        assert_eq!(entity(Some(45), None).effective_interval(), Some(45));
        assert_eq!(entity(Some(45), Some(30)).effective_interval(), Some(30));
    }

    #[test]
    fn test_dynamic_entity_has_no_interval() {
        let e = entity(None, None);
        assert!(e.is_dynamic());
        assert_eq!(e.effective_interval(), None);
    }

    #[test]
    fn test_entity_type_parse() {
        assert_eq!(EntityType::parse("service"), Some(EntityType::Service));
        assert_eq!(EntityType::parse("offer"), Some(EntityType::Offer));
        assert_eq!(EntityType::parse("store"), None);
    }
}
