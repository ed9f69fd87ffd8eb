use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::models::{CreateTask, TaskStatusUpdate};
use crate::state::AppState;

pub async fn get_tasks(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.tasks.list_all().await?))
}

pub async fn get_assigned_tasks(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.tasks.list_assigned_to(&path).await?))
}

pub async fn create_task(
    state: web::Data<AppState>,
    body: web::Json<CreateTask>,
) -> AppResult<HttpResponse> {
    let task = state.tasks.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": task.id,
        "message": "Task created successfully"
    })))
}

pub async fn set_task_status(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<TaskStatusUpdate>,
) -> AppResult<HttpResponse> {
    let task = state
        .tasks
        .set_status(path.into_inner(), body.status)
        .await?;
    Ok(HttpResponse::Ok().json(task))
}
