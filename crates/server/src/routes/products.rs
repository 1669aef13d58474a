//! Product route handlers.
//!
//! The listing and owner lookup are public; every mutation is gated on
//! `ManageProducts`. Deletion goes through the repository's
//! delete-with-audit transaction so the audit record and the row removal
//! commit together.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use stockroom_core::{Capability, ProductId, Role, UserId, Username};

use crate::db::products::{ProductPatch, ProductRepository};
use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::middleware::{RequireAuth, require};
use crate::state::AppState;

/// Product creation request body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

/// Sparse product update body; absent fields keep their stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

/// Owner info response for `GET /products/{id}/owner`.
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub owner_id: UserId,
    pub owner_username: Username,
    pub owner_role: Role,
    pub owner_created_at: DateTime<Utc>,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "product name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::InvalidInput(
            "price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

fn validate_quantity(quantity: i64) -> Result<(), AppError> {
    if quantity < 0 {
        return Err(AppError::InvalidInput(
            "quantity must be non-negative".to_string(),
        ));
    }
    Ok(())
}

/// `POST /products` - create a product.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Json(req): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ManageProducts)?;

    validate_name(&req.name)?;
    validate_price(req.price)?;
    validate_quantity(req.quantity)?;

    let product = ProductRepository::new(state.pool())
        .create(
            &req.name,
            req.description.as_deref(),
            req.price,
            req.quantity,
            Some(actor.id),
        )
        .await?;

    tracing::info!(product_id = %product.id, performed_by = %actor.username, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `GET /products` - list all products. Public.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// `PUT /products/{id}` - sparse update.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ManageProducts)?;

    if let Some(name) = req.name.as_deref() {
        validate_name(name)?;
    }
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(quantity) = req.quantity {
        validate_quantity(quantity)?;
    }

    let product = ProductRepository::new(state.pool())
        .update(
            ProductId::new(id),
            ProductPatch {
                name: req.name,
                description: req.description,
                price: req.price,
                quantity: req.quantity,
            },
        )
        .await?;

    tracing::info!(product_id = %product.id, performed_by = %actor.username, "product updated");
    Ok(Json(product))
}

/// `DELETE /products/{id}` - delete a product with its audit record.
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ManageProducts)?;

    let record = ProductRepository::new(state.pool())
        .delete_with_audit(ProductId::new(id), actor.username.as_str())
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                AppError::NotFound(format!("product {id} not found"))
            }
            other => AppError::from(other),
        })?;

    tracing::info!(
        product_id = id,
        target_name = %record.target_name,
        performed_by = %record.performed_by,
        "product deleted"
    );
    Ok(Json(
        json!({ "message": format!("Product '{}' deleted", record.target_name) }),
    ))
}

/// `GET /products/{id}/owner` - owner info for a product. Public.
pub async fn owner(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id} not found")))?;

    let Some(owner_id) = product.owner_id else {
        return Ok(Json(json!({ "message": "This product has no owner" })).into_response());
    };

    // Weak reference: the owner may have been deleted since
    let Some(user) = UserRepository::new(state.pool()).get_by_id(owner_id).await? else {
        return Ok(Json(json!({ "message": "This product has no owner" })).into_response());
    };

    Ok(Json(OwnerResponse {
        owner_id: user.id,
        owner_username: user.username,
        owner_role: user.role,
        owner_created_at: user.created_at,
    })
    .into_response())
}
