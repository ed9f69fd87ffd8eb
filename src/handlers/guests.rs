use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::models::CreateGuest;
use crate::state::AppState;

pub async fn get_guests(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.guests.list_all().await?))
}

pub async fn get_guest(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.guests.get(path.into_inner()).await?))
}

pub async fn create_guest(
    state: web::Data<AppState>,
    body: web::Json<CreateGuest>,
) -> AppResult<HttpResponse> {
    let guest = state.guests.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": guest.id,
        "message": "Guest added successfully"
    })))
}
