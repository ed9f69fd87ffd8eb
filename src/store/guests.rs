use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{CreateGuest, Guest};

#[derive(Clone)]
pub struct GuestDirectory {
    pool: SqlitePool,
}

impl GuestDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<Guest>> {
        let guests =
            sqlx::query_as::<_, Guest>("SELECT * FROM guests ORDER BY created_at DESC, id DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(guests)
    }

    pub async fn get(&self, id: i64) -> AppResult<Guest> {
        sqlx::query_as::<_, Guest>("SELECT * FROM guests WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::NotFound("Guest"))
    }

    pub async fn create(&self, input: CreateGuest) -> AppResult<Guest> {
        input.validate()?;

        let first_name = input.first_name.trim();
        let last_name = input.last_name.trim();
        let phone = input.phone.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(AppError::validation("guest first and last name are required"));
        }
        if phone.is_empty() {
            return Err(AppError::validation("guest phone is required"));
        }

        let guest = sqlx::query_as::<_, Guest>(
            r#"
            INSERT INTO guests (first_name, last_name, email, phone, address)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(non_blank(input.email.as_deref()))
        .bind(phone)
        .bind(non_blank(input.address.as_deref()))
        .fetch_one(&self.pool)
        .await?;

        log::info!("guest {} registered", guest.id);
        Ok(guest)
    }

    pub(crate) async fn exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let found: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM guests WHERE id = ?)")
            .bind(id)
            .fetch_one(conn)
            .await?;
        Ok(found)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
