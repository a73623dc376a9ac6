use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opaque per-user attendance token. At most one row per user is active;
/// issuing a new token deactivates the rest.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct QrCode {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = "QR_42_1704067200000_a1b2c3d4e")]
    pub qr_data: String,
    pub is_active: bool,
    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}
