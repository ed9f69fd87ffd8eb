use actix_web::{web, HttpResponse};

use crate::error::AppError;

pub mod bookings;
pub mod guests;
pub mod housekeeping;
pub mod maintenance;
pub mod payments;
pub mod rooms;

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "message": "Hotel Management System API" }))
}

/// Mounts every route. Malformed bodies and path segments become 400s with a
/// JSON error body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::validation(err.to_string()).into()),
    )
    .route("/", web::get().to(index))
    .service(
        web::scope("/api/rooms")
            .route("", web::get().to(rooms::get_rooms))
            .route("", web::post().to(rooms::create_room))
            .route("/available", web::get().to(rooms::get_available_rooms))
            .route("/{id}", web::get().to(rooms::get_room))
            .route("/{id}/status", web::put().to(rooms::set_room_status)),
    )
    .service(
        web::scope("/api/guests")
            .route("", web::get().to(guests::get_guests))
            .route("", web::post().to(guests::create_guest))
            .route("/{id}", web::get().to(guests::get_guest)),
    )
    .service(
        web::scope("/api/bookings")
            .route("", web::get().to(bookings::get_bookings))
            .route("", web::post().to(bookings::create_booking))
            .route("/search/{query}", web::get().to(bookings::search_bookings))
            .route("/filter/{status}", web::get().to(bookings::filter_bookings))
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}", web::put().to(bookings::update_booking))
            .route("/{id}/checkin", web::put().to(bookings::check_in))
            .route("/{id}/checkout", web::put().to(bookings::check_out))
            .route("/{id}/cancel", web::put().to(bookings::cancel_booking)),
    )
    .service(
        web::scope("/api/payments")
            .route("/process", web::post().to(payments::process_payment))
            .route("/booking/{booking_id}", web::get().to(payments::get_booking_payments)),
    )
    .service(
        web::scope("/api/maintenance")
            .route("", web::get().to(maintenance::get_requests))
            .route("", web::post().to(maintenance::create_request))
            .route("/{id}/assign", web::put().to(maintenance::assign_request))
            .route("/{id}/complete", web::put().to(maintenance::complete_request)),
    )
    .service(
        web::scope("/api/housekeeping")
            .route("/tasks", web::get().to(housekeeping::get_tasks))
            .route("/tasks", web::post().to(housekeeping::create_task))
            .route("/tasks/assigned/{name}", web::get().to(housekeeping::get_assigned_tasks))
            .route("/tasks/{id}/status", web::put().to(housekeeping::set_task_status)),
    );
}
