use actix_web::{web, HttpResponse};

use crate::error::{AppError, AppResult};
use crate::models::{BookingStatus, CreateBooking, UpdateBooking};
use crate::state::AppState;

pub async fn get_bookings(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let bookings = state.bookings.list_all().await?;
    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn get_booking(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let booking = state.bookings.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(booking))
}

pub async fn search_bookings(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let bookings = state.bookings.search(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn filter_bookings(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let status: BookingStatus = path.into_inner().parse().map_err(AppError::Validation)?;
    let bookings = state.bookings.filter_by_status(status).await?;
    Ok(HttpResponse::Ok().json(bookings))
}

pub async fn create_booking(
    state: web::Data<AppState>,
    body: web::Json<CreateBooking>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();

    let booking = state
        .lifecycle
        .create(body.guest_id, body.room_id, body.check_in, body.check_out)
        .await?;

    if let Some(sent) = body.total_amount {
        if sent != booking.total_amount {
            log::debug!(
                "booking {}: client total {} replaced by computed {}",
                booking.id,
                sent,
                booking.total_amount
            );
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": booking.id,
        "status": booking.status,
        "total_amount": booking.total_amount,
        "message": "Booking created successfully"
    })))
}

pub async fn update_booking(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateBooking>,
) -> AppResult<HttpResponse> {
    let booking = state
        .bookings
        .update(path.into_inner(), body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Booking updated successfully",
        "booking": booking
    })))
}

pub async fn check_in(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let booking = state.lifecycle.check_in(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Guest checked in successfully",
        "booking": booking
    })))
}

pub async fn check_out(state: web::Data<AppState>, path: web::Path<i64>) -> AppResult<HttpResponse> {
    let booking = state.lifecycle.check_out(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Guest checked out successfully",
        "booking": booking
    })))
}

pub async fn cancel_booking(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let booking = state.lifecycle.cancel(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Booking cancelled successfully",
        "booking": booking
    })))
}
