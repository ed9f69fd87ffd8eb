use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::{CreateTask, HousekeepingTask, RoomStatus, TaskStatus, TaskType};
use crate::store::RoomRegistry;

const BY_PRIORITY: &str = r#"
    ORDER BY
        CASE priority
            WHEN 'urgent' THEN 1
            WHEN 'high' THEN 2
            WHEN 'medium' THEN 3
            ELSE 4
        END,
        created_at DESC,
        id DESC
"#;

/// Housekeeping tasks. A cleaning task holds an available room in
/// `maintenance` until it is completed; other task types leave the room alone.
#[derive(Clone)]
pub struct TaskBoard {
    pool: SqlitePool,
}

impl TaskBoard {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> AppResult<Vec<HousekeepingTask>> {
        let query = format!("SELECT * FROM housekeeping_tasks{BY_PRIORITY}");
        let tasks = sqlx::query_as::<_, HousekeepingTask>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    pub async fn list_assigned_to(&self, assignee: &str) -> AppResult<Vec<HousekeepingTask>> {
        let query = format!("SELECT * FROM housekeeping_tasks WHERE assigned_to = ?{BY_PRIORITY}");
        let tasks = sqlx::query_as::<_, HousekeepingTask>(&query)
            .bind(assignee.trim())
            .fetch_all(&self.pool)
            .await?;
        Ok(tasks)
    }

    pub async fn create(&self, input: CreateTask) -> AppResult<HousekeepingTask> {
        input.validate()?;

        let mut tx = self.pool.begin().await?;

        let taken_out = input.task_type == TaskType::Cleaning
            && RoomRegistry::swap_status(
                &mut *tx,
                input.room_id,
                RoomStatus::Available,
                RoomStatus::Maintenance,
            )
            .await?;
        if !taken_out && RoomRegistry::fetch(&mut *tx, input.room_id).await?.is_none() {
            return Err(AppError::NotFound("Room"));
        }

        let assignee = input
            .assigned_to
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let task = sqlx::query_as::<_, HousekeepingTask>(
            r#"
            INSERT INTO housekeeping_tasks (room_id, task_type, priority, assigned_to, notes, status)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(input.room_id)
        .bind(input.task_type)
        .bind(input.priority)
        .bind(assignee)
        .bind(input.notes.trim())
        .bind(TaskStatus::Pending)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        log::info!(
            "{:?} task {} created for room {} (room out of service: {taken_out})",
            task.task_type,
            task.id,
            task.room_id
        );
        Ok(task)
    }

    /// Moves a task forward. Completing a cleaning task returns its room to
    /// service when nothing else keeps it out.
    pub async fn set_status(&self, id: i64, status: TaskStatus) -> AppResult<HousekeepingTask> {
        let mut tx = self.pool.begin().await?;

        let current = Self::lock(&mut *tx, id)
            .await?
            .ok_or(AppError::NotFound("Task"))?;
        if !current.status.can_move_to(status) {
            return Err(AppError::InvalidTransition(format!(
                "task {id} cannot move from {} to {status}",
                current.status
            )));
        }

        let task = sqlx::query_as::<_, HousekeepingTask>(
            r#"
            UPDATE housekeeping_tasks
            SET status = ?,
                completed_at = CASE WHEN ? THEN CURRENT_TIMESTAMP ELSE completed_at END
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(status == TaskStatus::Completed)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        let returned = task.status == TaskStatus::Completed
            && task.task_type == TaskType::Cleaning
            && RoomRegistry::return_to_service(&mut *tx, task.room_id).await?;

        tx.commit().await?;
        log::info!(
            "task {id}: {} -> {} (room {} back in service: {returned})",
            current.status,
            task.status,
            task.room_id
        );
        Ok(task)
    }

    /// No-op write that takes the database write lock and returns the row.
    async fn lock(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<HousekeepingTask>> {
        let task = sqlx::query_as::<_, HousekeepingTask>(
            "UPDATE housekeeping_tasks SET status = status WHERE id = ? RETURNING *",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(task)
    }
}
