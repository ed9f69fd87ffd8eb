use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::models::{Amount, Booking, BookingDetails, BookingStatus, PaymentStatus, UpdateBooking};
use crate::store::PaymentLedger;

const DETAILS_SELECT: &str = r#"
    SELECT
        b.id, b.guest_id, b.room_id, b.check_in, b.check_out, b.total_amount,
        b.status, b.payment_status, b.created_at,
        g.first_name, g.last_name, g.email AS guest_email, g.phone,
        r.room_number, r.room_type, r.price_per_night,
        (SELECT COALESCE(SUM(p.amount), 0) FROM payments p
          WHERE p.booking_id = b.id AND p.payment_status = 'completed') AS paid_amount
    FROM bookings b
    JOIN guests g ON b.guest_id = g.id
    JOIN rooms r ON b.room_id = r.id
"#;

const NEWEST_FIRST: &str = " ORDER BY b.created_at DESC, b.id DESC";

/// Rejects stays whose check-out is not strictly after check-in.
pub fn validate_stay(check_in: NaiveDate, check_out: NaiveDate) -> AppResult<()> {
    if check_out <= check_in {
        return Err(AppError::validation("check-out must be after check-in"));
    }
    Ok(())
}

/// Booking records and lookups. Status writes go through the lifecycle manager.
#[derive(Clone)]
pub struct BookingLedger {
    pool: SqlitePool,
}

impl BookingLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<BookingDetails>> {
        let query = format!("{DETAILS_SELECT}{NEWEST_FIRST}");
        let bookings = sqlx::query_as::<_, BookingDetails>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    pub async fn get_by_id(&self, id: i64) -> AppResult<BookingDetails> {
        let query = format!("{DETAILS_SELECT} WHERE b.id = ?");
        sqlx::query_as::<_, BookingDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("Booking"))
    }

    /// Case-insensitive substring match on guest name, email, phone and room
    /// number or type.
    pub async fn search(&self, term: &str) -> AppResult<Vec<BookingDetails>> {
        let pattern = format!("%{}%", escape_like(term.trim()));
        let query = format!(
            r#"{DETAILS_SELECT}
            WHERE g.first_name LIKE ? ESCAPE '\'
               OR g.last_name LIKE ? ESCAPE '\'
               OR g.email LIKE ? ESCAPE '\'
               OR g.phone LIKE ? ESCAPE '\'
               OR r.room_number LIKE ? ESCAPE '\'
               OR r.room_type LIKE ? ESCAPE '\'
            {NEWEST_FIRST}"#
        );

        let mut q = sqlx::query_as::<_, BookingDetails>(&query);
        for _ in 0..6 {
            q = q.bind(pattern.as_str());
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    pub async fn filter_by_status(&self, status: BookingStatus) -> AppResult<Vec<BookingDetails>> {
        let query = format!("{DETAILS_SELECT} WHERE b.status = ?{NEWEST_FIRST}");
        let bookings = sqlx::query_as::<_, BookingDetails>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// Changes dates or total of a booking that is still `confirmed`. The total
    /// may not drop below what has been paid, and the payment status follows it.
    pub async fn update(&self, id: i64, changes: UpdateBooking) -> AppResult<Booking> {
        if let Some(total) = changes.total_amount {
            if !total.is_positive() {
                return Err(AppError::validation("total_amount must be greater than zero"));
            }
        }

        let mut tx = self.pool.begin().await?;

        let current = Self::lock(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Booking"))?;
        if current.status != BookingStatus::Confirmed {
            return Err(AppError::transition("update", id, current.status));
        }

        let check_in = changes.check_in.unwrap_or(current.check_in);
        let check_out = changes.check_out.unwrap_or(current.check_out);
        let total_amount = changes.total_amount.unwrap_or(current.total_amount);
        validate_stay(check_in, check_out)?;

        if Self::overlaps(&mut *tx, current.room_id, check_in, check_out, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "room {} already has a booking between {check_in} and {check_out}",
                current.room_id
            )));
        }

        let paid = PaymentLedger::completed_total(&mut *tx, id).await?;
        if total_amount < paid {
            return Err(AppError::Validation(format!(
                "total_amount {total_amount} is below the {paid} already paid for booking {id}"
            )));
        }
        let payment_status = PaymentStatus::derive(paid, total_amount);

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET check_in = ?, check_out = ?, total_amount = ?, payment_status = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(check_in)
        .bind(check_out)
        .bind(total_amount)
        .bind(payment_status)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        log::info!("booking {id} updated: {check_in} -> {check_out}, total {total_amount}");
        Ok(booking)
    }

    pub(crate) async fn insert(
        conn: &mut SqliteConnection,
        guest_id: i64,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
        total_amount: Amount,
    ) -> AppResult<Booking> {
        validate_stay(check_in, check_out)?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (guest_id, room_id, check_in, check_out, total_amount, status, payment_status)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(guest_id)
        .bind(room_id)
        .bind(check_in)
        .bind(check_out)
        .bind(total_amount)
        .bind(BookingStatus::Confirmed)
        .bind(PaymentStatus::Unpaid)
        .fetch_one(conn)
        .await?;
        Ok(booking)
    }

    /// Touches the booking row and returns it. Being a write, this takes the
    /// database write lock before the caller decides anything.
    pub(crate) async fn lock(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET updated_at = CURRENT_TIMESTAMP WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(booking)
    }

    pub(crate) async fn set_status(
        conn: &mut SqliteConnection,
        id: i64,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("UPDATE bookings SET status = ? WHERE id = ? RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(conn)
            .await?
            .ok_or(AppError::NotFound("Booking"))
    }

    pub(crate) async fn set_payment_status(
        conn: &mut SqliteConnection,
        id: i64,
        status: PaymentStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE bookings SET payment_status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Whether a live booking of `room_id` other than `exclude` intersects
    /// `[check_in, check_out)`.
    pub(crate) async fn overlaps(
        conn: &mut SqliteConnection,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude: Option<i64>,
    ) -> AppResult<bool> {
        let [confirmed, checked_in] = BookingStatus::LIVE;
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE room_id = ?
                  AND status IN (?, ?)
                  AND check_in < ?
                  AND check_out > ?
                  AND id IS NOT ?
            )
            "#,
        )
        .bind(room_id)
        .bind(confirmed)
        .bind(checked_in)
        .bind(check_out)
        .bind(check_in)
        .bind(exclude)
        .fetch_one(conn)
        .await?;
        Ok(found)
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
