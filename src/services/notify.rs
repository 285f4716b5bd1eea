use async_trait::async_trait;

use crate::models::Booking;

/// Outbound "booking created" event, consumed by the notification service
/// downstream. Best-effort: a failure here is logged by the caller and never
/// rolls back the booking.
#[async_trait]
pub trait BookingNotifier: Send + Sync {
    async fn booking_created(&self, booking: &Booking) -> anyhow::Result<()>;
}

/// Default sink: log the event and move on. Deployments wire a real
/// dispatcher here.
pub struct LogNotifier;

#[async_trait]
impl BookingNotifier for LogNotifier {
    async fn booking_created(&self, booking: &Booking) -> anyhow::Result<()> {
        tracing::info!(
            booking_id = %booking.id,
            entity_id = %booking.entity_id,
            start = %booking.start_time,
            status = booking.status.as_str(),
            "booking created"
        );
        Ok(())
    }
}
