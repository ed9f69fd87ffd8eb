use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MaintenanceStatus {
    Open,
    Assigned,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRequest {
    pub id: i64,
    pub room_id: i64,
    pub issue_type: String,
    pub description: String,
    pub priority: Priority,
    pub status: MaintenanceStatus,
    pub assigned_to: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub completed_at: Option<chrono::NaiveDateTime>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    pub room_id: i64,
    #[validate(length(min = 1, max = 64))]
    pub issue_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_priority")]
    pub priority: Priority,
}

pub(crate) fn default_priority() -> Priority {
    Priority::Medium
}

#[derive(Debug, Deserialize, Validate)]
pub struct AssignMaintenance {
    #[validate(length(min = 1, max = 100))]
    pub assigned_to: String,
}
