use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Money as a whole number of cents.
///
/// Stored as INTEGER in the database and rendered as a two-place decimal in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, sqlx::Type)]
#[sqlx(transparent)]
pub struct Amount(i64);

impl Amount {
    const SCALE: i64 = 100;

    pub const ZERO: Amount = Amount(0);

    /// Largest magnitude accepted from clients: one billion in whole units.
    pub const MAX: Amount = Amount(1_000_000_000 * Self::SCALE);

    pub fn from_float(value: f64) -> Self {
        Amount((value * Self::SCALE as f64).round() as i64)
    }

    /// Like `from_float`, but `None` for non-finite values or anything beyond `MAX`.
    pub fn try_from_float(value: f64) -> Option<Self> {
        if !value.is_finite() || value.abs() > Self::MAX.to_float() {
            return None;
        }
        Some(Self::from_float(value))
    }

    pub fn from_cents(cents: i64) -> Self {
        Amount(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn to_float(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Price for `nights` nights at this nightly rate, `None` on overflow.
    pub fn times(self, nights: i64) -> Option<Self> {
        self.0.checked_mul(nights).map(Amount)
    }

    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{sign}{}.{:02}", abs / Self::SCALE, abs % Self::SCALE)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_float())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Amount::try_from_float(value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "amount must be a finite number no larger than {}",
                Amount::MAX
            ))
        })
    }
}
