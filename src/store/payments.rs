use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::models::{Amount, Payment, PaymentMethod, PaymentStatus, ProcessPayment};
use crate::store::BookingLedger;

const COMPLETED: &str = "completed";

/// Payment recording. May write a booking's payment status, never its
/// lifecycle status or the room.
#[derive(Clone)]
pub struct PaymentLedger {
    pool: SqlitePool,
}

impl PaymentLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Records a completed payment and returns it with the booking's new
    /// payment status. Payments beyond the booking total are rejected.
    pub async fn record(&self, input: ProcessPayment) -> AppResult<(Payment, PaymentStatus)> {
        if !input.amount.is_positive() {
            return Err(AppError::validation("amount must be greater than zero"));
        }
        let transaction_id = input
            .transaction_id
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if input.payment_method != PaymentMethod::Cash && transaction_id.is_none() {
            return Err(AppError::validation(
                "transaction_id is required for card and transfer payments",
            ));
        }

        let mut tx = self.pool.begin().await?;

        let booking = BookingLedger::lock(&mut *tx, input.booking_id)
            .await?
            .ok_or(AppError::NotFound("Booking"))?;

        let paid_before = Self::completed_total(&mut *tx, booking.id).await?;
        let paid = paid_before
            .checked_add(input.amount)
            .filter(|paid| *paid <= booking.total_amount);
        let Some(paid) = paid else {
            let outstanding = booking
                .total_amount
                .checked_sub(paid_before)
                .unwrap_or(Amount::ZERO);
            return Err(AppError::Validation(format!(
                "payment of {} exceeds outstanding balance of {} for booking {}",
                input.amount, outstanding, booking.id
            )));
        };

        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (booking_id, amount, payment_method, transaction_id, payment_status)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(booking.id)
        .bind(input.amount)
        .bind(input.payment_method)
        .bind(transaction_id)
        .bind(COMPLETED)
        .fetch_one(&mut *tx)
        .await?;

        let status = PaymentStatus::derive(paid, booking.total_amount);
        BookingLedger::set_payment_status(&mut *tx, booking.id, status).await?;

        tx.commit().await?;
        log::info!(
            "payment {} of {} recorded for booking {} ({:?})",
            payment.id,
            payment.amount,
            booking.id,
            status
        );
        Ok((payment, status))
    }

    pub async fn list_by_booking(&self, booking_id: i64) -> AppResult<Vec<Payment>> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM bookings WHERE id = ?)")
            .bind(booking_id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(AppError::NotFound("Booking"));
        }

        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE booking_id = ? ORDER BY payment_date DESC, id DESC",
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }

    /// Sum of the completed payments of `booking_id`.
    pub(crate) async fn completed_total(conn: &mut SqliteConnection, booking_id: i64) -> AppResult<Amount> {
        let total: Amount = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE booking_id = ? AND payment_status = ?",
        )
        .bind(booking_id)
        .bind(COMPLETED)
        .fetch_one(conn)
        .await?;
        Ok(total)
    }
}
