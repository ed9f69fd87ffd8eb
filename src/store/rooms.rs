use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{CreateRoom, MaintenanceStatus, Room, RoomStatus, TaskStatus, TaskType};

/// Room inventory and the current availability flag of each room.
#[derive(Clone)]
pub struct RoomRegistry {
    pool: SqlitePool,
}

impl RoomRegistry {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY room_number")
            .fetch_all(&self.pool)
            .await?;
        Ok(rooms)
    }

    pub async fn list_available(&self) -> AppResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms WHERE status = ? ORDER BY room_number",
        )
        .bind(RoomStatus::Available)
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    pub async fn get(&self, id: i64) -> AppResult<Room> {
        let mut conn = self.pool.acquire().await?;
        Self::fetch(&mut *conn, id)
            .await?
            .ok_or(AppError::NotFound("Room"))
    }

    pub async fn create(&self, input: CreateRoom) -> AppResult<Room> {
        input.validate()?;

        let room_number = input.room_number.trim();
        if room_number.is_empty() {
            return Err(AppError::validation("room_number must not be empty"));
        }
        if !input.price_per_night.is_positive() {
            return Err(AppError::validation("price_per_night must be greater than zero"));
        }

        let result = sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (room_number, room_type, price_per_night, status, description)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(room_number)
        .bind(input.room_type)
        .bind(input.price_per_night)
        .bind(RoomStatus::Available)
        .bind(input.description.trim())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(room) => {
                log::info!("room {} added (id {})", room.room_number, room.id);
                Ok(room)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(AppError::validation(
                format!("room number {room_number} already exists"),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// Housekeeping toggle between `available` and `maintenance`.
    ///
    /// Occupancy belongs to the booking lifecycle, so an occupied room cannot
    /// be touched here and nothing here can mark a room occupied. A room with
    /// open maintenance requests or cleaning tasks stays out of service.
    pub async fn set_housekeeping_status(&self, id: i64, status: RoomStatus) -> AppResult<Room> {
        if status == RoomStatus::Occupied {
            return Err(AppError::InvalidTransition(
                "room occupancy is managed by bookings".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Room>(
            "UPDATE rooms SET status = ? WHERE id = ? AND status != ? RETURNING *",
        )
        .bind(status)
        .bind(id)
        .bind(RoomStatus::Occupied)
        .fetch_optional(&mut *tx)
        .await?;

        let room = match updated {
            Some(room) => room,
            None => {
                return match Self::fetch(&mut *tx, id).await? {
                    None => Err(AppError::NotFound("Room")),
                    Some(room) => Err(AppError::InvalidTransition(format!(
                        "room {} is occupied",
                        room.room_number
                    ))),
                }
            }
        };

        if status == RoomStatus::Available {
            let open = Self::open_work(&mut *tx, id).await?;
            if open > 0 {
                return Err(AppError::InvalidTransition(format!(
                    "room {} has {open} open maintenance or cleaning items",
                    room.room_number
                )));
            }
        }

        tx.commit().await?;
        log::info!("room {} set to {} by housekeeping", room.room_number, room.status);
        Ok(room)
    }

    pub(crate) async fn fetch(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
            .bind(id)
            .fetch_optional(conn)
            .await?;
        Ok(room)
    }

    /// Moves the room from `from` to `to` only if it currently is `from`.
    /// Returns whether the row changed.
    pub(crate) async fn swap_status(
        conn: &mut SqliteConnection,
        id: i64,
        from: RoomStatus,
        to: RoomStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query("UPDATE rooms SET status = ? WHERE id = ? AND status = ?")
            .bind(to)
            .bind(id)
            .bind(from)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Open maintenance requests plus unfinished cleaning tasks for the room.
    pub(crate) async fn open_work(conn: &mut SqliteConnection, id: i64) -> AppResult<i64> {
        let open: i64 = sqlx::query_scalar(
            r#"
            SELECT
                (SELECT COUNT(*) FROM maintenance_requests WHERE room_id = ? AND status != ?)
              + (SELECT COUNT(*) FROM housekeeping_tasks
                  WHERE room_id = ? AND task_type = ? AND status != ?)
            "#,
        )
        .bind(id)
        .bind(MaintenanceStatus::Completed)
        .bind(id)
        .bind(TaskType::Cleaning)
        .bind(TaskStatus::Completed)
        .fetch_one(conn)
        .await?;
        Ok(open)
    }

    /// Puts a room in `maintenance` back to `available` once no open work
    /// remains. Returns whether it moved.
    pub(crate) async fn return_to_service(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        if Self::open_work(&mut *conn, id).await? > 0 {
            return Ok(false);
        }
        Self::swap_status(conn, id, RoomStatus::Maintenance, RoomStatus::Available).await
    }
}
