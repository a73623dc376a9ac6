use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::model::hostel::Hostel;
use crate::utils::errors::internal_error;

/// Hostel row joined with the warden name and a live student head count.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct HostelRecord {
    pub id: u64,
    #[schema(example = "North Wing")]
    pub name: String,
    pub address: Option<String>,
    #[schema(example = 120)]
    pub capacity: u32,
    pub warden_id: Option<u64>,
    pub warden_name: Option<String>,
    #[schema(example = 87)]
    pub total_students: i64,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHostel {
    #[schema(example = "North Wing")]
    pub name: Option<String>,
    pub address: Option<String>,
    #[schema(example = 120)]
    pub capacity: Option<u32>,
    pub warden_id: Option<u64>,
}

/// List hostels with warden names and student counts.
#[utoipa::path(
    get,
    path = "/api/hostels",
    responses(
        (status = 200, description = "Hostels ordered by name"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Hostels"
)]
pub async fn list_hostels(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let hostels = sqlx::query_as::<_, HostelRecord>(
        r#"
        SELECT h.id, h.name, h.address, h.capacity, h.warden_id,
               w.name AS warden_name,
               COUNT(DISTINCT s.id) AS total_students
        FROM hostels h
        LEFT JOIN users w ON h.warden_id = w.id
        LEFT JOIN users s ON s.hostel_id = h.id AND s.role = 'student'
        GROUP BY h.id, h.name, h.address, h.capacity, h.warden_id, w.name
        ORDER BY h.name
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch hostels");
        internal_error("Failed to fetch hostels")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "hostels": hostels })))
}

/// Create a hostel.
#[utoipa::path(
    post,
    path = "/api/hostels",
    request_body = CreateHostel,
    responses(
        (status = 200, description = "Created hostel", body = Object, example = json!({
            "hostel": { "id": 1, "name": "North Wing", "capacity": 120 }
        })),
        (status = 400, description = "Missing name or capacity"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Hostels"
)]
pub async fn create_hostel(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateHostel>,
) -> actix_web::Result<impl Responder> {
    let (name, capacity) = match (payload.name.as_deref(), payload.capacity) {
        (Some(n), Some(c)) if !n.trim().is_empty() => (n.trim(), c),
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "Name and capacity are required"
            })));
        }
    };

    let result = sqlx::query(
        r#"
        INSERT INTO hostels (name, address, capacity, warden_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(payload.address.clone())
    .bind(capacity)
    .bind(payload.warden_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to create hostel");
        internal_error("Failed to create hostel")
    })?;

    let hostel = sqlx::query_as::<_, Hostel>(
        r#"
        SELECT id, name, address, capacity, warden_id
        FROM hostels
        WHERE id = ?
        "#,
    )
    .bind(result.last_insert_id())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch created hostel");
        internal_error("Failed to create hostel")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "hostel": hostel })))
}
