use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, EntityType};
use crate::services::admission::{self, BookingRequest};
use crate::state::AppState;

fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    if token != expected_token {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

#[derive(Serialize)]
pub struct BookingResponse {
    id: String,
    entity_id: String,
    entity_type: String,
    staff_id: Option<String>,
    customer_id: String,
    start_time: String,
    end_time: String,
    status: String,
    verification_code: String,
    notes: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        BookingResponse {
            id: b.id,
            entity_id: b.entity_id,
            entity_type: b.entity_type.as_str().to_string(),
            staff_id: b.staff_id,
            customer_id: b.customer_id,
            start_time: b.start_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            end_time: b.end_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            status: b.status.as_str().to_string(),
            verification_code: b.verification_code,
            notes: b.notes,
            created_at: b.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            updated_at: b.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

fn parse_start_time(s: &str) -> Result<NaiveDateTime, AppError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .map_err(|_| {
            AppError::BadRequest(format!("invalid start_time (expected YYYY-MM-DD HH:MM): {s}"))
        })
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub entity_id: String,
    pub entity_type: String,
    pub customer_id: String,
    pub start_time: String,
    pub notes: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let entity_type = EntityType::parse(&body.entity_type)
        .ok_or_else(|| AppError::BadRequest(format!("invalid entity_type: {}", body.entity_type)))?;
    let start_time = parse_start_time(&body.start_time)?;

    let request = BookingRequest {
        entity_id: body.entity_id,
        entity_type,
        customer_id: body.customer_id,
        start_time,
        notes: body.notes,
    };

    let now = state.clock.now();
    let booking = {
        let mut db = state.db.lock().unwrap();
        admission::admit_booking(&mut db, &request, now)?
    };

    // Best-effort event for the notification service; never unwinds the
    // booking.
    if let Err(e) = state.notifier.booking_created(&booking).await {
        tracing::warn!(booking_id = %booking.id, "booking-created notification failed: {e:#}");
    }

    Ok((StatusCode::CREATED, Json(booking.into())))
}

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub limit: Option<i64>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let limit = query.limit.unwrap_or(50);
    let bookings = {
        let db = state.db.lock().unwrap();
        queries::get_all_bookings(&db, query.status.as_deref(), limit)?
    };

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let booking = {
        let db = state.db.lock().unwrap();
        queries::get_booking_by_id(&db, &id)?
    }
    .ok_or_else(|| AppError::NotFound(format!("booking {id}")))?;

    Ok(Json(booking.into()))
}

// POST /api/bookings/:id/status
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let next = BookingStatus::parse(&body.status);
    if next.as_str() != body.status {
        return Err(AppError::BadRequest(format!("invalid status: {}", body.status)));
    }

    let now = state.clock.now();
    let booking = {
        let db = state.db.lock().unwrap();
        admission::transition_booking(&db, &id, next, now)?
    };

    Ok(Json(booking.into()))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BookingResponse>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let now = state.clock.now();
    let booking = {
        let db = state.db.lock().unwrap();
        admission::transition_booking(&db, &id, BookingStatus::Cancelled, now)?
    };

    Ok(Json(booking.into()))
}
