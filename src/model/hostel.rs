use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Hostel {
    pub id: u64,
    pub name: String,
    pub address: Option<String>,
    pub capacity: u32,
    pub warden_id: Option<u64>,
}
