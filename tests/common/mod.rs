#![allow(dead_code)]

use chrono::NaiveDate;
use hotel_bookings::models::{Amount, CreateGuest, CreateRoom, Guest, Room, RoomStatus, RoomType};
use hotel_bookings::{db, AppState};
use sqlx::SqlitePool;

pub async fn setup() -> (SqlitePool, AppState) {
    let pool = db::in_memory_pool().await.unwrap();
    let state = AppState::new(pool.clone());
    (pool, state)
}

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

pub async fn add_room(state: &AppState, number: &str, price: f64) -> Room {
    state
        .rooms
        .create(CreateRoom {
            room_number: number.to_string(),
            room_type: RoomType::Standard,
            price_per_night: Amount::from_float(price),
            description: String::new(),
        })
        .await
        .unwrap()
}

pub async fn add_guest(state: &AppState, first: &str, last: &str) -> Guest {
    state
        .guests
        .create(CreateGuest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: Some(format!("{}@example.com", first.to_lowercase())),
            phone: "555-0100".to_string(),
            address: None,
        })
        .await
        .unwrap()
}

pub async fn room_status(state: &AppState, room_id: i64) -> RoomStatus {
    state.rooms.get(room_id).await.unwrap().status
}

/// Every occupied room has exactly one live booking and every available
/// room has none.
pub async fn assert_occupancy_consistent(pool: &SqlitePool) {
    let rows: Vec<(String, String, i64)> = sqlx::query_as(
        r#"
        SELECT r.room_number, r.status,
               (SELECT COUNT(*) FROM bookings b
                 WHERE b.room_id = r.id AND b.status IN ('confirmed', 'checked-in'))
        FROM rooms r
        "#,
    )
    .fetch_all(pool)
    .await
    .unwrap();

    for (room_number, status, live) in rows {
        match status.as_str() {
            "occupied" => assert_eq!(live, 1, "room {room_number} occupied with {live} live bookings"),
            "available" => assert_eq!(live, 0, "room {room_number} available with {live} live bookings"),
            _ => assert!(live <= 1, "room {room_number} has {live} live bookings"),
        }
    }
}
