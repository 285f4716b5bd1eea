pub mod booking;
pub mod entity;
pub mod operating;
pub mod slot;

pub use booking::{Booking, BookingStatus};
pub use entity::{BookableEntity, EntityType};
pub use operating::OperatingProfile;
pub use slot::Slot;
