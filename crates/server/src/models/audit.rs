//! Audit trail model.
//!
//! Records are immutable once written. The structured fields (action,
//! target, actor, numeric snapshot) are the source of truth; the
//! human-readable sentence is derived at read time via
//! [`AuditRecord::detail`] and never parsed back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::AuditRecordId;

/// The destructive action an audit record documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    /// A catalog product was deleted.
    #[serde(rename = "DELETE_PRODUCT")]
    DeleteProduct,
}

impl AuditAction {
    /// The wire/storage representation of the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeleteProduct => "DELETE_PRODUCT",
        }
    }

    /// Parse an action from its stored form.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DELETE_PRODUCT" => Some(Self::DeleteProduct),
            _ => None,
        }
    }
}

/// One immutable entry in the append-only audit trail.
///
/// `target_name` and `performed_by` are denormalized snapshots captured at
/// action time, so the record stays meaningful after the target row (or the
/// acting user) is gone.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    /// Monotonic record ID.
    pub id: AuditRecordId,
    /// What happened.
    pub action: AuditAction,
    /// ID the target had at action time.
    pub target_id: i64,
    /// Name the target had at action time.
    pub target_name: String,
    /// Username of the actor at action time (snapshot, not a foreign key).
    pub performed_by: String,
    /// Unit price the target had at action time.
    pub price: f64,
    /// Quantity the target had at action time.
    pub quantity: i64,
    /// Server clock, UTC.
    pub performed_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Human-readable summary, derived from the structured fields.
    #[must_use]
    pub fn detail(&self) -> String {
        match self.action {
            AuditAction::DeleteProduct => format!(
                "Product '{}' (price: ${:.2}, quantity: {}) deleted by {}",
                self.target_name, self.price, self.quantity, self.performed_by
            ),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_form() {
        assert_eq!(AuditAction::DeleteProduct.as_str(), "DELETE_PRODUCT");
        assert_eq!(
            AuditAction::parse("DELETE_PRODUCT"),
            Some(AuditAction::DeleteProduct)
        );
        assert_eq!(AuditAction::parse("DELETE_USER"), None);

        let json = serde_json::to_string(&AuditAction::DeleteProduct).unwrap();
        assert_eq!(json, "\"DELETE_PRODUCT\"");
    }

    #[test]
    fn test_detail_is_derived_from_snapshot() {
        let record = AuditRecord {
            id: AuditRecordId::new(1),
            action: AuditAction::DeleteProduct,
            target_id: 7,
            target_name: "Widget".to_string(),
            performed_by: "root".to_string(),
            price: 9.99,
            quantity: 5,
            performed_at: Utc::now(),
        };

        assert_eq!(
            record.detail(),
            "Product 'Widget' (price: $9.99, quantity: 5) deleted by root"
        );
    }
}
