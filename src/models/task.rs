use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Priority;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum TaskType {
    /// Takes an available room out of service until the task is done.
    Cleaning,
    Inspection,
    Turndown,
    Restock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    fn rank(self) -> u8 {
        match self {
            TaskStatus::Pending => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Completed => 2,
        }
    }

    /// Tasks only move forward: pending, in-progress, completed.
    pub fn can_move_to(self, next: TaskStatus) -> bool {
        next.rank() > self.rank()
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HousekeepingTask {
    pub id: i64,
    pub room_id: i64,
    pub task_type: TaskType,
    pub priority: Priority,
    pub assigned_to: Option<String>,
    pub notes: String,
    pub status: TaskStatus,
    pub created_at: chrono::NaiveDateTime,
    pub completed_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTask {
    pub room_id: i64,
    pub task_type: TaskType,
    #[serde(default = "super::maintenance::default_priority")]
    pub priority: Priority,
    #[validate(length(min = 1, max = 100))]
    pub assigned_to: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}
