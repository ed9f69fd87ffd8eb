use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{Amount, RoomType};

/// Lifecycle status of a booking. `CheckedOut` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum BookingStatus {
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub const LIVE: [BookingStatus; 2] = [BookingStatus::Confirmed, BookingStatus::CheckedIn];

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::CheckedOut | BookingStatus::Cancelled)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::CheckedIn => "checked-in",
            BookingStatus::CheckedOut => "checked-out",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "checked-in" => Ok(BookingStatus::CheckedIn),
            "checked-out" => Ok(BookingStatus::CheckedOut),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived from the completed payments recorded against a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Partial,
    Paid,
}

impl PaymentStatus {
    pub fn derive(paid: Amount, total: Amount) -> Self {
        if paid >= total && paid.is_positive() {
            PaymentStatus::Paid
        } else if paid.is_positive() {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub guest_id: i64,
    pub room_id: i64,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    pub total_amount: Amount,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Booking {
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

/// Booking joined with the guest and room fields shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BookingDetails {
    pub id: i64,
    pub guest_id: i64,
    pub room_id: i64,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    pub total_amount: Amount,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub created_at: chrono::NaiveDateTime,
    pub first_name: String,
    pub last_name: String,
    pub guest_email: Option<String>,
    pub phone: String,
    pub room_number: String,
    pub room_type: RoomType,
    pub price_per_night: Amount,
    pub paid_amount: Amount,
}

#[derive(Debug, Deserialize)]
pub struct CreateBooking {
    pub guest_id: i64,
    pub room_id: i64,
    pub check_in: chrono::NaiveDate,
    pub check_out: chrono::NaiveDate,
    /// Accepted for client compatibility; the server computes the total.
    pub total_amount: Option<Amount>,
}

/// Fields a confirmed booking may change. Anything else in the body is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBooking {
    pub check_in: Option<chrono::NaiveDate>,
    pub check_out: Option<chrono::NaiveDate>,
    pub total_amount: Option<Amount>,
}
