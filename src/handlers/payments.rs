use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::models::ProcessPayment;
use crate::state::AppState;

pub async fn process_payment(
    state: web::Data<AppState>,
    body: web::Json<ProcessPayment>,
) -> AppResult<HttpResponse> {
    let (payment, payment_status) = state.payments.record(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": payment.id,
        "message": "Payment processed successfully",
        "payment_status": payment_status
    })))
}

pub async fn get_booking_payments(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let payments = state.payments.list_by_booking(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(payments))
}
