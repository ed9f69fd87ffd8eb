use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{
    AssignMaintenance, CreateMaintenanceRequest, MaintenanceRequest, MaintenanceStatus, RoomStatus,
};
use crate::store::RoomRegistry;

/// Maintenance requests raised by housekeeping. Opening one takes an
/// available room out of service; the room returns once no request or
/// cleaning task for it is left open.
#[derive(Clone)]
pub struct MaintenanceLog {
    pool: SqlitePool,
}

impl MaintenanceLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<MaintenanceRequest>> {
        let requests = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT * FROM maintenance_requests
            ORDER BY
                CASE priority
                    WHEN 'urgent' THEN 1
                    WHEN 'high' THEN 2
                    WHEN 'medium' THEN 3
                    ELSE 4
                END,
                created_at DESC,
                id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(requests)
    }

    pub async fn create(&self, input: CreateMaintenanceRequest) -> AppResult<MaintenanceRequest> {
        input.validate()?;

        let mut tx = self.pool.begin().await?;

        // occupied rooms keep their flag until the guest leaves
        let taken_out =
            RoomRegistry::swap_status(&mut *tx, input.room_id, RoomStatus::Available, RoomStatus::Maintenance)
                .await?;
        if !taken_out && RoomRegistry::fetch(&mut *tx, input.room_id).await?.is_none() {
            return Err(AppError::NotFound("Room"));
        }

        let request = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            INSERT INTO maintenance_requests (room_id, issue_type, description, priority, status)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(input.room_id)
        .bind(input.issue_type.trim())
        .bind(input.description.trim())
        .bind(input.priority)
        .bind(MaintenanceStatus::Open)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        log::info!(
            "maintenance request {} opened for room {} (room out of service: {taken_out})",
            request.id,
            request.room_id
        );
        Ok(request)
    }

    /// Hands an open request to a member of staff. Reassigning is allowed
    /// until the request is completed.
    pub async fn assign(&self, id: i64, input: AssignMaintenance) -> AppResult<MaintenanceRequest> {
        input.validate()?;
        let assignee = input.assigned_to.trim();
        if assignee.is_empty() {
            return Err(AppError::validation("assigned_to must not be empty"));
        }

        let mut tx = self.pool.begin().await?;

        let assigned = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            UPDATE maintenance_requests
            SET assigned_to = ?, status = ?
            WHERE id = ? AND status != ?
            RETURNING *
            "#,
        )
        .bind(assignee)
        .bind(MaintenanceStatus::Assigned)
        .bind(id)
        .bind(MaintenanceStatus::Completed)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = assigned else {
            return Err(Self::not_open(&mut *tx, id).await?);
        };

        tx.commit().await?;
        log::info!("maintenance request {id} assigned to {assignee}");
        Ok(request)
    }

    pub async fn complete(&self, id: i64) -> AppResult<MaintenanceRequest> {
        let mut tx = self.pool.begin().await?;

        let completed = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            UPDATE maintenance_requests
            SET status = ?, completed_at = CURRENT_TIMESTAMP
            WHERE id = ? AND status != ?
            RETURNING *
            "#,
        )
        .bind(MaintenanceStatus::Completed)
        .bind(id)
        .bind(MaintenanceStatus::Completed)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = completed else {
            return Err(Self::not_open(&mut *tx, id).await?);
        };

        let returned = RoomRegistry::return_to_service(&mut *tx, request.room_id).await?;

        tx.commit().await?;
        log::info!(
            "maintenance request {id} completed (room {} back in service: {returned})",
            request.room_id
        );
        Ok(request)
    }

    /// Error for a request that is missing or already completed.
    async fn not_open(conn: &mut SqliteConnection, id: i64) -> AppResult<AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM maintenance_requests WHERE id = ?)")
                .bind(id)
                .fetch_one(conn)
                .await?;
        Ok(if exists {
            AppError::InvalidTransition(format!("maintenance request {id} is already completed"))
        } else {
            AppError::NotFound("Maintenance request")
        })
    }
}
