//! Storage components. Each one owns a pool handle given at construction;
//! the `pub(crate)` helpers take a connection so callers can compose them
//! inside one transaction.

mod bookings;
mod guests;
mod maintenance;
mod payments;
mod rooms;
mod tasks;

pub use bookings::{validate_stay, BookingLedger};
pub use guests::GuestDirectory;
pub use maintenance::MaintenanceLog;
pub use payments::PaymentLedger;
pub use rooms::RoomRegistry;
pub use tasks::TaskBoard;
