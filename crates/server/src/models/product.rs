//! Catalog product model.

use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{ProductId, UserId};

/// A priced, quantity-tracked catalog item.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Server-assigned ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Unit price, non-negative.
    pub price: f64,
    /// Units in stock, non-negative.
    pub quantity: i64,
    /// Weak reference to the creating user; lookup only, no lifecycle
    /// ownership.
    pub owner_id: Option<UserId>,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Total inventory value of this line (price x quantity).
    ///
    /// Stock counts stay far below 2^52, so the cast is lossless.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn inventory_value(&self) -> f64 {
        self.price * self.quantity as f64
    }
}
