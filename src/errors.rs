use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::services::ScheduleError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            // 409 for conflicts the client can resolve by re-querying; 400
            // for requests that were never valid.
            AppError::Schedule(e) => match e {
                ScheduleError::SlotNoLongerAvailable
                | ScheduleError::BookingDisabled
                | ScheduleError::StoreClosed { .. } => StatusCode::CONFLICT,
                _ => StatusCode::BAD_REQUEST,
            },
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Schedule(e) => {
                serde_json::json!({ "error": self.to_string(), "code": e.code() })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_statuses() {
        assert_eq!(
            AppError::Schedule(ScheduleError::SlotNoLongerAvailable).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Schedule(ScheduleError::BookingDisabled).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_validation_statuses() {
        assert_eq!(
            AppError::Schedule(ScheduleError::TooSoon { min_minutes: 30 }).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Schedule(ScheduleError::NotSlotBookable).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::NotFound("x".to_string()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
