use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};
use utoipa::ToSchema;

use crate::auth::password::verify_password;

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "rahim@hostel.edu")]
    pub email: Option<String>,
    #[schema(example = "secret")]
    pub password: Option<String>,
}

#[derive(sqlx::FromRow)]
struct LoginRow {
    id: u64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    hostel_id: Option<u64>,
    room_no: Option<String>,
    student_id: Option<String>,
    phone: Option<String>,
    created_at: Option<DateTime<Utc>>,
    hostel_name: Option<String>,
}

/// What login hands back to the client: the user row with its hostel name
/// joined in and the credential hash stripped. The client persists this
/// object locally; there is no server-side session.
#[derive(Serialize, ToSchema)]
pub struct LoginUser {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub hostel_id: Option<u64>,
    pub room_no: Option<String>,
    pub student_id: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
    pub hostel_name: Option<String>,
}

impl From<LoginRow> for LoginUser {
    fn from(row: LoginRow) -> Self {
        LoginUser {
            id: row.id,
            name: row.name,
            email: row.email,
            role: row.role,
            hostel_id: row.hostel_id,
            room_no: row.room_no,
            student_id: row.student_id,
            phone: row.phone,
            created_at: row.created_at,
            hostel_name: row.hostel_name,
        }
    }
}

/// Login by email and password.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = Object, example = json!({
            "success": true,
            "user": { "id": 1, "name": "Rahim Uddin", "email": "rahim@hostel.edu", "role": "student" }
        })),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(pool, payload))]
pub async fn login(
    payload: web::Json<LoginRequest>,
    pool: web::Data<MySqlPool>,
) -> impl Responder {
    let (email, password) = match (payload.email.as_deref(), payload.password.as_deref()) {
        (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e.trim(), p),
        _ => {
            return HttpResponse::BadRequest().json(json!({
                "error": "Email and password are required"
            }));
        }
    };

    debug!("Fetching user by email");

    let row = match sqlx::query_as::<_, LoginRow>(
        r#"
        SELECT u.id, u.name, u.email, u.password_hash, u.role,
               u.hostel_id, u.room_no, u.student_id, u.phone, u.created_at,
               h.name AS hostel_name
        FROM users u
        LEFT JOIN hostels h ON u.hostel_id = h.id
        WHERE u.email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(row)) => row,
        Ok(None) => {
            info!("Invalid credentials: email not found");
            return HttpResponse::Unauthorized().json(json!({
                "error": "Invalid credentials"
            }));
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Login failed"
            }));
        }
    };

    if verify_password(password, &row.password_hash).is_err() {
        info!(user_id = row.id, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().json(json!({
            "error": "Invalid credentials"
        }));
    }

    info!(user_id = row.id, "Login successful");

    HttpResponse::Ok().json(json!({
        "success": true,
        "user": LoginUser::from(row)
    }))
}
