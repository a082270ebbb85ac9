use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::{self, Product};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let products = db::products::list(&state.pool).await?;
    Ok(Json(products))
}

pub async fn create(
    auth: AuthUser,
    State(state): State<SharedState>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    validate(&req)?;

    let product = Product {
        id: Uuid::now_v7(),
        name: req.name,
        description: req.description,
        price: req.price,
        stock: req.stock,
        is_active: req.is_active,
        created_at: models::now(),
        updated_at: None,
    };

    let mut uow = state.unit_of_work();
    uow.add(product.clone());
    uow.save_changes(&auth).await?;

    Ok(Json(product))
}

pub async fn get(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Product>, AppError> {
    let product = find(&state, id).await?;
    Ok(Json(product))
}

pub async fn update(
    auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ProductRequest>,
) -> Result<Json<Product>, AppError> {
    validate(&req)?;

    let original = find(&state, id).await?;
    let updated = Product {
        name: req.name,
        description: req.description,
        price: req.price,
        stock: req.stock,
        is_active: req.is_active,
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
    let product = find(&state, id).await?;

    let mut uow = state.unit_of_work();
    uow.remove(product);
    uow.save_changes(&auth).await?;

    Ok(Json(serde_json::json!({ "message": "Deleted" })))
}

async fn find(state: &SharedState, id: Uuid) -> Result<Product, AppError> {
    db::products::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

fn validate(req: &ProductRequest) -> Result<(), AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::BadRequest("Name is required".to_string()));
    }
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(AppError::BadRequest(
            "Price must be a non-negative number".to_string(),
        ));
    }
    if req.stock < 0 {
        return Err(AppError::BadRequest("Stock cannot be negative".to_string()));
    }
    Ok(())
}
