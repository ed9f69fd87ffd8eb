use sqlx::SqlitePool;

use crate::lifecycle::LifecycleManager;
use crate::store::{
    BookingLedger, GuestDirectory, MaintenanceLog, PaymentLedger, RoomRegistry, TaskBoard,
};

/// Components shared by every request handler.
#[derive(Clone)]
pub struct AppState {
    pub rooms: RoomRegistry,
    pub guests: GuestDirectory,
    pub bookings: BookingLedger,
    pub payments: PaymentLedger,
    pub lifecycle: LifecycleManager,
    pub maintenance: MaintenanceLog,
    pub tasks: TaskBoard,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            rooms: RoomRegistry::new(pool.clone()),
            guests: GuestDirectory::new(pool.clone()),
            bookings: BookingLedger::new(pool.clone()),
            payments: PaymentLedger::new(pool.clone()),
            lifecycle: LifecycleManager::new(pool.clone()),
            maintenance: MaintenanceLog::new(pool.clone()),
            tasks: TaskBoard::new(pool),
        }
    }
}
