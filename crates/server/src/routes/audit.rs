//! Audit trail route handlers.

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use stockroom_core::{AuditRecordId, Capability};

use crate::db::audit::AuditRepository;
use crate::error::AppError;
use crate::middleware::{RequireAuth, require};
use crate::models::{AuditAction, AuditRecord};
use crate::state::AppState;

/// One audit trail entry as served to clients: the structured record plus
/// the `detail` sentence derived from it at read time.
#[derive(Debug, Serialize)]
pub struct AuditRecordResponse {
    pub id: AuditRecordId,
    pub action: AuditAction,
    pub target_id: i64,
    pub target_name: String,
    pub performed_by: String,
    pub price: f64,
    pub quantity: i64,
    pub performed_at: DateTime<Utc>,
    pub detail: String,
}

impl From<AuditRecord> for AuditRecordResponse {
    fn from(record: AuditRecord) -> Self {
        let detail = record.detail();
        Self {
            id: record.id,
            action: record.action,
            target_id: record.target_id,
            target_name: record.target_name,
            performed_by: record.performed_by,
            price: record.price,
            quantity: record.quantity,
            performed_at: record.performed_at,
            detail,
        }
    }
}

/// `GET /audit/history` - every destructive action, newest first.
pub async fn history(
    State(state): State<AppState>,
    RequireAuth(actor): RequireAuth,
) -> Result<impl IntoResponse, AppError> {
    require(&actor, Capability::ViewAudit)?;

    let records = AuditRepository::new(state.pool()).list_all().await?;
    let response: Vec<AuditRecordResponse> =
        records.into_iter().map(AuditRecordResponse::from).collect();

    Ok(Json(response))
}
