use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::utils::errors::internal_error;
use crate::utils::filter::{FilterValue, SqlFilter, bind_filters};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    /// Filter to a single calendar date
    #[param(example = "2024-01-01", value_type = String, format = "date")]
    pub date: Option<NaiveDate>,
    /// Filter by the student the record belongs to
    #[param(example = 42)]
    pub user_id: Option<u64>,
    /// Filter by the student's hostel
    #[param(example = 1)]
    pub hostel_id: Option<u64>,
    /// Filter by status (present/absent)
    #[param(example = "present")]
    pub status: Option<String>,
}

/// Attendance row joined with the student, hostel, and marker names.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "present")]
    pub status: String,
    pub marked_by: Option<u64>,
    #[schema(example = "2024-01-01T08:30:00Z", format = "date-time", value_type = String)]
    pub marked_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    #[schema(example = "Rahim Uddin")]
    pub user_name: String,
    pub student_id: Option<String>,
    pub room_no: Option<String>,
    pub hostel_name: Option<String>,
    pub marked_by_name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendance {
    #[schema(example = 42)]
    pub user_id: Option<u64>,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    #[schema(example = "present")]
    pub status: Option<String>,
    #[schema(example = 2)]
    pub marked_by: Option<u64>,
    pub notes: Option<String>,
}

/// List attendance records, optionally filtered.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceQuery),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = Object, example = json!({
            "attendance": [{
                "id": 1, "user_id": 42, "date": "2024-01-01", "status": "present",
                "marked_by": 2, "notes": null, "user_name": "Rahim Uddin",
                "hostel_name": "North Wing", "marked_by_name": "Warden Khan"
            }]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let mut filter = SqlFilter::new();

    if let Some(date) = query.date {
        filter.push("a.date = ?", FilterValue::Date(date));
    }
    if let Some(user_id) = query.user_id {
        filter.push("a.user_id = ?", FilterValue::U64(user_id));
    }
    if let Some(hostel_id) = query.hostel_id {
        filter.push("u.hostel_id = ?", FilterValue::U64(hostel_id));
    }
    if let Some(status) = query.status.as_deref() {
        filter.push("a.status = ?", FilterValue::Str(status.to_string()));
    }

    let sql = format!(
        r#"
        SELECT a.id, a.user_id, a.date, a.status, a.marked_by, a.marked_at, a.notes,
               u.name AS user_name, u.student_id, u.room_no,
               h.name AS hostel_name, m.name AS marked_by_name
        FROM attendance a
        JOIN users u ON a.user_id = u.id
        LEFT JOIN hostels h ON u.hostel_id = h.id
        LEFT JOIN users m ON a.marked_by = m.id
        {}
        ORDER BY a.date DESC, u.name
        "#,
        filter.where_clause()
    );

    let records = bind_filters(
        sqlx::query_as::<_, AttendanceRecord>(&sql),
        filter.values(),
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch attendance");
        internal_error("Failed to fetch attendance")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "attendance": records })))
}

/// Mark attendance for a user on a date. One row per (user, date): marking
/// again replaces status, marker, and notes. The existence check and the
/// write are two sequential statements, matching the wire contract rather
/// than guarding against concurrent markers.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 200, description = "Attendance marked", body = Object, example = json!({
            "attendance": {
                "id": 1, "user_id": 42, "date": "2024-01-01",
                "status": "present", "marked_by": 2
            }
        })),
        (status = 400, description = "Missing or invalid field"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    pool: web::Data<MySqlPool>,
    payload: web::Json<MarkAttendance>,
) -> actix_web::Result<impl Responder> {
    let (user_id, date, status) = match (payload.user_id, payload.date, payload.status.as_deref()) {
        (Some(u), Some(d), Some(s)) => (u, d, s),
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "User ID, date, and status are required"
            })));
        }
    };

    let status = match AttendanceStatus::from_str(status) {
        Ok(s) => s,
        Err(_) => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "Invalid status. Allowed: present, absent"
            })));
        }
    };

    let existing: Option<u64> =
        sqlx::query_scalar("SELECT id FROM attendance WHERE user_id = ? AND date = ?")
            .bind(user_id)
            .bind(date)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, user_id, "Failed to look up attendance");
                internal_error("Failed to mark attendance")
            })?;

    let result = if existing.is_some() {
        sqlx::query(
            r#"
            UPDATE attendance
            SET status = ?, marked_by = ?, notes = ?, marked_at = NOW()
            WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(status.to_string())
        .bind(payload.marked_by)
        .bind(payload.notes.clone())
        .bind(user_id)
        .bind(date)
        .execute(pool.get_ref())
        .await
    } else {
        sqlx::query(
            r#"
            INSERT INTO attendance (user_id, date, status, marked_by, notes)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(status.to_string())
        .bind(payload.marked_by)
        .bind(payload.notes.clone())
        .execute(pool.get_ref())
        .await
    };

    result.map_err(|e| {
        error!(error = %e, user_id, "Failed to mark attendance");
        internal_error("Failed to mark attendance")
    })?;

    let record = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, user_id, date, status, marked_by, marked_at, notes
        FROM attendance
        WHERE user_id = ? AND date = ?
        "#,
    )
    .bind(user_id)
    .bind(date)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, user_id, "Failed to fetch marked attendance");
        internal_error("Failed to mark attendance")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "attendance": record })))
}
