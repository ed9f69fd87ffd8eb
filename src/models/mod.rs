pub mod amount;
pub mod booking;
pub mod guest;
pub mod maintenance;
pub mod payment;
pub mod room;
pub mod task;

pub use amount::Amount;
pub use booking::{Booking, BookingDetails, BookingStatus, CreateBooking, PaymentStatus, UpdateBooking};
pub use guest::{CreateGuest, Guest};
pub use maintenance::{
    AssignMaintenance, CreateMaintenanceRequest, MaintenanceRequest, MaintenanceStatus, Priority,
};
pub use payment::{Payment, PaymentMethod, ProcessPayment};
pub use room::{CreateRoom, Room, RoomStatus, RoomStatusUpdate, RoomType};
pub use task::{CreateTask, HousekeepingTask, TaskStatus, TaskStatusUpdate, TaskType};
