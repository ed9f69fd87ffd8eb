use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub id: i64,
    pub booking_id: i64,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub payment_status: String,
    pub payment_date: chrono::NaiveDateTime,
}

/// Body of `POST /payments/process`. A `full_amount` field sent by older
/// clients is ignored; the booking's stored total decides the payment status.
#[derive(Debug, Deserialize)]
pub struct ProcessPayment {
    pub booking_id: i64,
    pub amount: Amount,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
}
