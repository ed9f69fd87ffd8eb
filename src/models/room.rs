use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "PascalCase")]
pub enum RoomType {
    Standard,
    Deluxe,
    Suite,
    Executive,
    Presidential,
}

/// Availability flag of a room.
///
/// `Occupied` is only ever written by the booking lifecycle; housekeeping
/// toggles between `Available` and `Maintenance`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    pub id: i64,
    pub room_number: String,
    pub room_type: RoomType,
    pub price_per_night: Amount,
    pub status: RoomStatus,
    pub description: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoom {
    #[validate(length(min = 1, max = 16))]
    pub room_number: String,
    pub room_type: RoomType,
    pub price_per_night: Amount,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RoomStatusUpdate {
    pub status: RoomStatus,
}
