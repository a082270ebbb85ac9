use axum::Json;
use axum::extract::{Path, State};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{self, Person};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct PersonRequest {
    pub title: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub company_id: Option<Uuid>,
    pub notes: Option<String>,
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Person>>, AppError> {
    let persons = db::persons::list(&state.pool).await?;
    Ok(Json(persons))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<PersonRequest>,
) -> Result<Json<Person>, AppError> {
    validate(&req)?;

    let person = Person {
        id: Uuid::now_v7(),
        title: req.title,
        first_name: req.first_name,
        last_name: req.last_name,
        date_of_birth: req.date_of_birth,
        company_id: req.company_id,
        notes: req.notes,
        created_at: models::now(),
        updated_at: None,
    };

    let mut uow = state.unit_of_work();
    uow.add(person.clone());
    uow.save_changes(&auth).await?;

    Ok(Json(person))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Person>, AppError> {
    let person = find(&state, id).await?;
    Ok(Json(person))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PersonRequest>,
) -> Result<Json<Person>, AppError> {
    validate(&req)?;

    let original = find(&state, id).await?;
    let updated = Person {
        title: req.title,
        first_name: req.first_name,
        last_name: req.last_name,
        date_of_birth: req.date_of_birth,
        company_id: req.company_id,
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
    let person = find(&state, id).await?;

    let mut uow = state.unit_of_work();
    uow.remove(person);
    uow.save_changes(&auth).await?;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

async fn find(state: &SharedState, id: Uuid) -> Result<Person, AppError> {
    db::persons::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Person not found".to_string()))
}

fn validate(req: &PersonRequest) -> Result<(), AppError> {
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "First and last name are required".to_string(),
        ));
    }
    Ok(())
}
