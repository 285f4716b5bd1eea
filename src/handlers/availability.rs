use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::EntityType;
use crate::services::availability::{self, DayAvailability};
use crate::state::AppState;

// GET /api/availability?entity_id=&entity_type=&date=YYYY-MM-DD
#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub entity_id: String,
    pub entity_type: String,
    pub date: String,
}

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<DayAvailability>, AppError> {
    let entity_type = EntityType::parse(&query.entity_type)
        .ok_or_else(|| AppError::BadRequest(format!("invalid entity_type: {}", query.entity_type)))?;
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date (expected YYYY-MM-DD): {}", query.date)))?;

    let now = state.clock.now();
    let result = {
        let db = state.db.lock().unwrap();
        let entity = queries::get_entity(&db, &query.entity_id, entity_type)?
            .ok_or_else(|| AppError::NotFound(format!("entity {}", query.entity_id)))?;
        let profile =
            queries::get_operating_profile(&db, &entity.store_id, entity.branch_id.as_deref())?
                .ok_or_else(|| {
                    AppError::NotFound(format!("operating profile for store {}", entity.store_id))
                })?;
        availability::day_availability(&db, &entity, &profile, date, now)?
    };

    Ok(Json(result))
}
