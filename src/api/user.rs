use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::auth::password::hash_password;
use crate::model::role::Role;
use crate::utils::errors::internal_error;
use crate::utils::filter::{FilterValue, SqlFilter, bind_filters};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    /// Filter by role (admin/staff/student)
    #[param(example = "student")]
    pub role: Option<String>,
    /// Filter by hostel assignment
    #[param(example = 1)]
    pub hostel_id: Option<u64>,
}

/// User row joined with the hostel name. The credential hash is never
/// selected, so nothing needs stripping after the fact.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct UserRecord {
    pub id: u64,
    #[schema(example = "Rahim Uddin")]
    pub name: String,
    #[schema(example = "rahim@hostel.edu")]
    pub email: String,
    #[schema(example = "student")]
    pub role: String,
    pub hostel_id: Option<u64>,
    pub room_no: Option<String>,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
    pub hostel_name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[schema(example = "Rahim Uddin")]
    pub name: Option<String>,
    #[schema(example = "rahim@hostel.edu")]
    pub email: Option<String>,
    #[schema(example = "secret")]
    pub password: Option<String>,
    #[schema(example = "student")]
    pub role: Option<String>,
    pub hostel_id: Option<u64>,
    pub room_no: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
}

/// List users, optionally filtered by role and hostel.
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserQuery),
    responses(
        (status = 200, description = "Users ordered by name, hashes stripped"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn list_users(
    pool: web::Data<MySqlPool>,
    query: web::Query<UserQuery>,
) -> actix_web::Result<impl Responder> {
    let mut filter = SqlFilter::new();

    if let Some(role) = query.role.as_deref() {
        filter.push("u.role = ?", FilterValue::Str(role.to_string()));
    }
    if let Some(hostel_id) = query.hostel_id {
        filter.push("u.hostel_id = ?", FilterValue::U64(hostel_id));
    }

    let sql = format!(
        r#"
        SELECT u.id, u.name, u.email, u.role, u.hostel_id, u.room_no,
               u.student_id, u.phone, u.created_at,
               h.name AS hostel_name
        FROM users u
        LEFT JOIN hostels h ON u.hostel_id = h.id
        {}
        ORDER BY u.name
        "#,
        filter.where_clause()
    );

    let users = bind_filters(sqlx::query_as::<_, UserRecord>(&sql), filter.values())
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch users");
            internal_error("Failed to fetch users")
        })?;

    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

/// Create a user. The password is argon2-hashed before it is stored.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 200, description = "Created user without the hash", body = Object, example = json!({
            "user": { "id": 1, "name": "Rahim Uddin", "email": "rahim@hostel.edu", "role": "student" }
        })),
        (status = 400, description = "Missing or invalid field"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Users"
)]
pub async fn create_user(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateUser>,
) -> actix_web::Result<impl Responder> {
    let (name, email, password, role) = match (
        payload.name.as_deref(),
        payload.email.as_deref(),
        payload.password.as_deref(),
        payload.role.as_deref(),
    ) {
        (Some(n), Some(e), Some(p), Some(r))
            if !n.trim().is_empty() && !e.trim().is_empty() && !p.is_empty() =>
        {
            (n.trim(), e.trim(), p, r)
        }
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "Name, email, password, and role are required"
            })));
        }
    };

    let role = match Role::from_str(role) {
        Ok(r) => r,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "Invalid role. Allowed: admin, staff, student"
            })));
        }
    };

    let password_hash = hash_password(password).map_err(|e| {
        error!(error = %e, "Failed to hash password");
        internal_error("Failed to create user")
    })?;

    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, password_hash, role, hostel_id, room_no, phone, student_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(&password_hash)
    .bind(role.to_string())
    .bind(payload.hostel_id)
    .bind(payload.room_no.clone())
    .bind(payload.phone.clone())
    .bind(payload.student_id.clone())
    .execute(pool.get_ref())
    .await;

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            // Duplicate email hits the unique key
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::Conflict().json(json!({
                        "error": "Email already exists"
                    })));
                }
            }

            error!(error = %e, "Failed to create user");
            return Ok(HttpResponse::InternalServerError().json(json!({
                "error": "Failed to create user"
            })));
        }
    };

    let user = sqlx::query_as::<_, UserRecord>(
        r#"
        SELECT u.id, u.name, u.email, u.role, u.hostel_id, u.room_no,
               u.student_id, u.phone, u.created_at,
               h.name AS hostel_name
        FROM users u
        LEFT JOIN hostels h ON u.hostel_id = h.id
        WHERE u.id = ?
        "#,
    )
    .bind(result.last_insert_id())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch created user");
        internal_error("Failed to create user")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "user": user })))
}
