//! Inventory statistics route handlers.
//!
//! Read-only aggregations over users and products, gated on `ViewStats`.

use std::cmp::Ordering;

use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;

use stockroom_core::{Capability, ProductId, Role, UserId, Username};

use crate::db::products::ProductRepository;
use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::middleware::{RequireAuth, require};
use crate::models::Product;
use crate::state::AppState;

// =============================================================================
// Response Types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ProductLine {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub total_value: f64,
}

#[derive(Debug, Serialize)]
pub struct UserStats {
    pub user_id: UserId,
    pub username: Username,
    pub role: Role,
    pub product_count: usize,
    pub total_inventory_value: f64,
    pub products: Vec<ProductLine>,
}

#[derive(Debug, Serialize)]
pub struct UserProductsResponse {
    pub total_users: usize,
    pub total_products: usize,
    pub total_inventory_value: f64,
    pub users_stats: Vec<UserStats>,
}

#[derive(Debug, Serialize)]
pub struct UserCounts {
    pub total: usize,
    pub admins: usize,
    pub clients: usize,
}

#[derive(Debug, Serialize)]
pub struct MostExpensiveProduct {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Serialize)]
pub struct MostStockedProduct {
    pub id: ProductId,
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct ProductCounts {
    pub total: usize,
    pub with_owner: usize,
    pub without_owner: usize,
    pub total_inventory_value: f64,
    pub most_expensive_product: Option<MostExpensiveProduct>,
    pub most_stocked_product: Option<MostStockedProduct>,
}

#[derive(Debug, Serialize)]
pub struct GeneralStatsResponse {
    pub users: UserCounts,
    pub products: ProductCounts,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /stats/user-products` - per-user inventory statistics, sorted by
/// product count descending.
pub async fn user_products(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ViewStats)?;

    let users = UserRepository::new(state.pool()).list().await?;
    let products_repo = ProductRepository::new(state.pool());

    let mut users_stats = Vec::with_capacity(users.len());
    for user in users {
        let products = products_repo.list_by_owner(user.id).await?;
        let total_inventory_value = products.iter().map(Product::inventory_value).sum();

        users_stats.push(UserStats {
            user_id: user.id,
            username: user.username,
            role: user.role,
            product_count: products.len(),
            total_inventory_value,
            products: products
                .into_iter()
                .map(|p| {
                    let total_value = p.inventory_value();
                    ProductLine {
                        id: p.id,
                        name: p.name,
                        price: p.price,
                        quantity: p.quantity,
                        total_value,
                    }
                })
                .collect(),
        });
    }

    users_stats.sort_by(|a, b| b.product_count.cmp(&a.product_count));

    Ok(Json(UserProductsResponse {
        total_users: users_stats.len(),
        total_products: users_stats.iter().map(|s| s.product_count).sum(),
        total_inventory_value: users_stats.iter().map(|s| s.total_inventory_value).sum(),
        users_stats,
    }))
}

/// `GET /stats/general` - system-wide statistics.
pub async fn general(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ViewStats)?;

    let users = UserRepository::new(state.pool()).list().await?;
    let products = ProductRepository::new(state.pool()).list().await?;

    let admins = users.iter().filter(|u| u.role == Role::Admin).count();
    let with_owner = products.iter().filter(|p| p.owner_id.is_some()).count();

    let most_expensive_product = products
        .iter()
        .max_by(|a, b| a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal))
        .map(|p| MostExpensiveProduct {
            id: p.id,
            name: p.name.clone(),
            price: p.price,
        });

    let most_stocked_product = products
        .iter()
        .max_by_key(|p| p.quantity)
        .map(|p| MostStockedProduct {
            id: p.id,
            name: p.name.clone(),
            quantity: p.quantity,
        });

    Ok(Json(GeneralStatsResponse {
        users: UserCounts {
            total: users.len(),
            admins,
            clients: users.len() - admins,
        },
        products: ProductCounts {
            total: products.len(),
            with_owner,
            without_owner: products.len() - with_owner,
            total_inventory_value: products.iter().map(Product::inventory_value).sum(),
            most_expensive_product,
            most_stocked_product,
        },
    }))
}
