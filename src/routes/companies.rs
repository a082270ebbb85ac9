use axum::Json;
use axum::extract::{Path, State};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{self, Company};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CompanyRequest {
    pub name: String,
    pub website: Option<String>,
    pub email: Option<String>,
    pub founding_date: Option<NaiveDate>,
    pub employee_count: Option<i64>,
    pub revenue: Option<f64>,
    pub parent_company_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Company>>, AppError> {
    let companies = db::companies::list(&state.pool).await?;
    Ok(Json(companies))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<CompanyRequest>,
) -> Result<Json<Company>, AppError> {
    validate(&req, None)?;

    let company = Company {
        id: Uuid::now_v7(),
        name: req.name,
        website: req.website,
        email: req.email,
        founding_date: req.founding_date,
        employee_count: req.employee_count,
        revenue: req.revenue,
        parent_company_id: req.parent_company_id,
        notes: req.notes,
        created_at: models::now(),
        updated_at: None,
    };

    let mut uow = state.unit_of_work();
    uow.add(company.clone());
    uow.save_changes(&auth).await?;

    Ok(Json(company))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Company>, AppError> {
    let company = find(&state, id).await?;
    Ok(Json(company))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CompanyRequest>,
) -> Result<Json<Company>, AppError> {
    validate(&req, Some(id))?;

    let original = find(&state, id).await?;
    let updated = Company {
        name: req.name,
        website: req.website,
        email: req.email,
        founding_date: req.founding_date,
        employee_count: req.employee_count,
        revenue: req.revenue,
        parent_company_id: req.parent_company_id,
        notes: req.notes,
        updated_at: Some(models::now()),
        ..original.clone()
    };

    let mut uow = state.unit_of_work();
    uow.update(&original, updated.clone());
    uow.save_changes(&auth).await?;

    Ok(Json(updated))
}

pub async fn delete(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let company = find(&state, id).await?;

    let mut uow = state.unit_of_work();
    uow.remove(company);
    uow.save_changes(&auth).await?;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

async fn find(state: &SharedState, id: Uuid) -> Result<Company, AppError> {
    db::companies::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))
}

fn validate(req: &CompanyRequest, id: Option<Uuid>) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if req.employee_count.is_some_and(|n| n < 0) {
        return Err(AppError::BadRequest(
            "Employee count cannot be negative".to_string(),
        ));
    }
    if id.is_some() && req.parent_company_id == id {
        return Err(AppError::BadRequest(
            "A company cannot be its own parent".to_string(),
        ));
    }
    Ok(())
}
