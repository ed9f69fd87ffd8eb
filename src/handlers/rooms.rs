use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::models::{CreateRoom, RoomStatusUpdate};
use crate::state::AppState;

pub async fn get_rooms(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.rooms.list_all().await?))
}

pub async fn get_available_rooms(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.rooms.list_available().await?))
}

pub async fn get_room(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.rooms.get(path.into_inner()).await?))
}

pub async fn create_room(
    state: web::Data<AppState>,
    body: web::Json<CreateRoom>,
) -> AppResult<HttpResponse> {
    let room = state.rooms.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": room.id,
        "message": "Room added successfully"
    })))
}

pub async fn set_room_status(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<RoomStatusUpdate>,
) -> AppResult<HttpResponse> {
    let room = state
        .rooms
        .set_housekeeping_status(path.into_inner(), body.status)
        .await?;
    Ok(HttpResponse::Ok().json(room))
}
