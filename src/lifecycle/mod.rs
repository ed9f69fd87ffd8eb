//! Booking lifecycle manager.
//!
//! The only writer of `bookings.status` and of room occupancy. Each event
//! runs in one transaction that starts with a write on the affected row, so
//! concurrent events on the same room serialize and a failed event leaves
//! both the booking and the room untouched.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::models::{Booking, Room, RoomStatus};
use crate::store::{validate_stay, BookingLedger, GuestDirectory, RoomRegistry};

mod state;
pub use state::{LifecycleEvent, RoomEffect};

#[derive(Clone)]
pub struct LifecycleManager {
    pool: SqlitePool,
}

/// Public API
impl LifecycleManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Reserve `room_id` for `guest_id`. The total is nights × the room's
    /// nightly price at this moment.
    pub async fn create(
        &self,
        guest_id: i64,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<Booking> {
        validate_stay(check_in, check_out)?;

        let mut tx = self.pool.begin().await?;

        let room = Self::occupy(&mut *tx, room_id).await?;

        if !GuestDirectory::exists(&mut *tx, guest_id).await? {
            return Err(AppError::NotFound("Guest"));
        }
        if BookingLedger::overlaps(&mut *tx, room_id, check_in, check_out, None).await? {
            return Err(AppError::Conflict(format!(
                "room {} already has a booking between {check_in} and {check_out}",
                room.room_number
            )));
        }

        let nights = (check_out - check_in).num_days();
        let total = room.price_per_night.times(nights).ok_or_else(|| {
            AppError::validation(format!(
                "total for {nights} nights at {} per night is too large",
                room.price_per_night
            ))
        })?;
        let booking =
            BookingLedger::insert(&mut *tx, guest_id, room_id, check_in, check_out, total).await?;

        tx.commit().await?;
        log::info!(
            "booking {} created: room {} {} -> {}, {} nights, total {}",
            booking.id,
            room.room_number,
            check_in,
            check_out,
            nights,
            total
        );
        Ok(booking)
    }

    pub async fn check_in(&self, booking_id: i64) -> AppResult<Booking> {
        self.apply(booking_id, LifecycleEvent::CheckIn).await
    }

    pub async fn check_out(&self, booking_id: i64) -> AppResult<Booking> {
        self.apply(booking_id, LifecycleEvent::CheckOut).await
    }

    pub async fn cancel(&self, booking_id: i64) -> AppResult<Booking> {
        self.apply(booking_id, LifecycleEvent::Cancel).await
    }
}

/// Private API
impl LifecycleManager {
    async fn apply(&self, booking_id: i64, event: LifecycleEvent) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;

        let current = BookingLedger::lock(&mut *tx, booking_id)
            .await?
            .ok_or(AppError::NotFound("Booking"))?;

        let Some(next) = event.next(current.status) else {
            log::warn!(
                "{} rejected for booking {}: status is {}",
                event.verb(),
                booking_id,
                current.status
            );
            return Err(AppError::transition(event.verb(), booking_id, current.status));
        };

        let booking = BookingLedger::set_status(&mut *tx, booking_id, next).await?;
        let room_changed = Self::apply_room_effect(&mut *tx, booking.room_id, event.room_effect()).await?;

        tx.commit().await?;
        log::info!(
            "booking {} {}: {} -> {} (room {} changed: {})",
            booking_id,
            event.verb(),
            current.status,
            next,
            booking.room_id,
            room_changed
        );
        Ok(booking)
    }

    /// Marks the room occupied, failing if it is missing or not available.
    async fn occupy(conn: &mut SqliteConnection, room_id: i64) -> AppResult<Room> {
        let occupied =
            Self::apply_room_effect(&mut *conn, room_id, LifecycleEvent::Create.room_effect())
                .await?;

        let room = RoomRegistry::fetch(&mut *conn, room_id)
            .await?
            .ok_or(AppError::NotFound("Room"))?;

        if !occupied {
            return Err(AppError::Conflict(format!(
                "room {} is {}",
                room.room_number, room.status
            )));
        }
        Ok(room)
    }

    async fn apply_room_effect(
        conn: &mut SqliteConnection,
        room_id: i64,
        effect: RoomEffect,
    ) -> AppResult<bool> {
        match effect {
            RoomEffect::Keep => Ok(false),
            RoomEffect::Occupy => {
                RoomRegistry::swap_status(conn, room_id, RoomStatus::Available, RoomStatus::Occupied)
                    .await
            }
            RoomEffect::Release => {
                RoomRegistry::swap_status(conn, room_id, RoomStatus::Occupied, RoomStatus::Available)
                    .await
            }
        }
    }
}
