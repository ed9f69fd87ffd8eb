use actix_web::{web, HttpResponse};

use crate::error::AppResult;
use crate::models::{AssignMaintenance, CreateMaintenanceRequest};
use crate::state::AppState;

pub async fn get_requests(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.maintenance.list_all().await?))
}

pub async fn create_request(
    state: web::Data<AppState>,
    body: web::Json<CreateMaintenanceRequest>,
) -> AppResult<HttpResponse> {
    let request = state.maintenance.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "id": request.id,
        "message": "Maintenance request created successfully"
    })))
}

pub async fn complete_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let request = state.maintenance.complete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(request))
}

pub async fn assign_request(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<AssignMaintenance>,
) -> AppResult<HttpResponse> {
    let request = state
        .maintenance
        .assign(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(request))
}
