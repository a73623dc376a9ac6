use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::model::qr_code::QrCode;
use crate::utils::errors::internal_error;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeQuery {
    /// List active codes for this user
    #[param(example = 42)]
    pub user_id: Option<u64>,
    /// Resolve a scanned token to its owner
    #[param(example = "QR_42_1704067200000_a1b2c3d4e")]
    pub qr_data: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueQrCode {
    #[schema(example = 42)]
    pub user_id: Option<u64>,
}

/// Active code joined with its owner's identity, for scan resolution.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct QrCodeLookup {
    pub id: u64,
    pub user_id: u64,
    pub qr_data: String,
    pub is_active: bool,
    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(example = "Rahim Uddin")]
    pub name: String,
    pub student_id: Option<String>,
    pub room_no: Option<String>,
    #[schema(example = "student")]
    pub role: String,
    pub hostel_name: Option<String>,
}

/// Token material for a fresh code. Uniqueness leans on the millisecond
/// timestamp plus nine hex chars of a v4 UUID; there is no registry-wide
/// collision check.
fn generate_qr_data(user_id: u64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "QR_{}_{}_{}",
        user_id,
        Utc::now().timestamp_millis(),
        &suffix[..9]
    )
}

/// Resolve a scanned token or list a user's active codes.
#[utoipa::path(
    get,
    path = "/api/qr-codes",
    params(QrCodeQuery),
    responses(
        (status = 200, description = "Matched code with owner info, or the user's active codes"),
        (status = 400, description = "Neither userId nor qrData given"),
        (status = 404, description = "Invalid or inactive QR code"),
        (status = 500, description = "Internal server error")
    ),
    tag = "QR codes"
)]
pub async fn list_qr_codes(
    pool: web::Data<MySqlPool>,
    query: web::Query<QrCodeQuery>,
) -> actix_web::Result<impl Responder> {
    if let Some(qr_data) = query.qr_data.as_deref() {
        let lookup = sqlx::query_as::<_, QrCodeLookup>(
            r#"
            SELECT qr.id, qr.user_id, qr.qr_data, qr.is_active, qr.created_at,
                   u.name, u.student_id, u.room_no, u.role,
                   h.name AS hostel_name
            FROM qr_codes qr
            JOIN users u ON qr.user_id = u.id
            LEFT JOIN hostels h ON u.hostel_id = h.id
            WHERE qr.qr_data = ? AND qr.is_active = TRUE
            "#,
        )
        .bind(qr_data)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to resolve QR code");
            internal_error("Failed to fetch QR codes")
        })?;

        return match lookup {
            Some(code) => Ok(HttpResponse::Ok().json(json!({ "qrCode": code }))),
            None => Ok(HttpResponse::NotFound().json(json!({
                "error": "Invalid or inactive QR code"
            }))),
        };
    }

    if let Some(user_id) = query.user_id {
        let codes = sqlx::query_as::<_, QrCode>(
            r#"
            SELECT id, user_id, qr_data, is_active, created_at
            FROM qr_codes
            WHERE user_id = ? AND is_active = TRUE
            "#,
        )
        .bind(user_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to fetch QR codes");
            internal_error("Failed to fetch QR codes")
        })?;

        return Ok(HttpResponse::Ok().json(json!({ "qrCodes": codes })));
    }

    Ok(HttpResponse::BadRequest().json(json!({
        "error": "User ID or QR data required"
    })))
}

/// Issue a fresh code for a user, deactivating any prior ones. The
/// deactivate and the insert are two sequential statements; after either
/// order of interleaving the newest insert wins the "active" slot.
#[utoipa::path(
    post,
    path = "/api/qr-codes",
    request_body = IssueQrCode,
    responses(
        (status = 200, description = "New active code for the user", body = Object, example = json!({
            "qrCode": {
                "id": 7, "user_id": 42,
                "qr_data": "QR_42_1704067200000_a1b2c3d4e", "is_active": true
            }
        })),
        (status = 400, description = "Missing userId"),
        (status = 500, description = "Internal server error")
    ),
    tag = "QR codes"
)]
pub async fn issue_qr_code(
    pool: web::Data<MySqlPool>,
    payload: web::Json<IssueQrCode>,
) -> actix_web::Result<impl Responder> {
    let Some(user_id) = payload.user_id else {
        return Ok(HttpResponse::BadRequest().json(json!({
            "error": "User ID is required"
        })));
    };

    let qr_data = generate_qr_data(user_id);

    sqlx::query("UPDATE qr_codes SET is_active = FALSE WHERE user_id = ?")
        .bind(user_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to deactivate old QR codes");
            internal_error("Failed to generate QR code")
        })?;

    let result = sqlx::query("INSERT INTO qr_codes (user_id, qr_data) VALUES (?, ?)")
        .bind(user_id)
        .bind(&qr_data)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, user_id, "Failed to insert QR code");
            internal_error("Failed to generate QR code")
        })?;

    let code = sqlx::query_as::<_, QrCode>(
        r#"
        SELECT id, user_id, qr_data, is_active, created_at
        FROM qr_codes
        WHERE id = ?
        "#,
    )
    .bind(result.last_insert_id())
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, user_id, "Failed to fetch issued QR code");
        internal_error("Failed to generate QR code")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "qrCode": code })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_data_carries_prefix_and_user_id() {
        let data = generate_qr_data(42);
        assert!(data.starts_with("QR_42_"));
    }

    #[test]
    fn qr_data_has_four_parts_with_nine_char_suffix() {
        let data = generate_qr_data(7);
        let parts: Vec<&str> = data.split('_').collect();
        assert_eq!(parts.len(), 4);
        assert_eq!(parts[0], "QR");
        assert_eq!(parts[1], "7");
        assert!(parts[2].parse::<i64>().is_ok());
        assert_eq!(parts[3].len(), 9);
    }

    #[test]
    fn consecutive_tokens_differ() {
        assert_ne!(generate_qr_data(1), generate_qr_data(1));
    }
}
