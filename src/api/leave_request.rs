use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::utils::errors::internal_error;
use crate::utils::filter::{FilterValue, SqlFilter, bind_filters};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequestQuery {
    /// Filter by the requester
    #[param(example = 42)]
    pub user_id: Option<u64>,
    /// Filter by status (pending/approved/rejected)
    #[param(example = "pending")]
    pub status: Option<String>,
    /// Filter by the requester's hostel
    #[param(example = 1)]
    pub hostel_id: Option<u64>,
}

/// Leave request joined with requester and approver names.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequestRecord {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-08", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    #[schema(example = "personal")]
    pub leave_type: String,
    #[schema(example = "pending")]
    pub status: String,
    pub approved_by: Option<u64>,
    #[schema(example = "2024-01-02T10:00:00Z", format = "date-time", value_type = String)]
    pub approved_at: Option<DateTime<Utc>>,
    #[schema(example = "2024-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
    #[schema(example = "2024-01-02T10:00:00Z", format = "date-time", value_type = String)]
    pub updated_at: Option<DateTime<Utc>>,
    #[schema(example = "Rahim Uddin")]
    pub user_name: String,
    pub student_id: Option<String>,
    pub room_no: Option<String>,
    pub hostel_name: Option<String>,
    pub approved_by_name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeaveRequest {
    #[schema(example = 42)]
    pub user_id: Option<u64>,
    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2024-01-08", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "Family function at home")]
    pub reason: Option<String>,
    #[schema(example = "personal")]
    pub leave_type: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLeaveRequest {
    #[schema(example = 1)]
    pub id: Option<u64>,
    #[schema(example = "approved")]
    pub status: Option<String>,
    #[schema(example = 2)]
    pub approved_by: Option<u64>,
}

/// List leave requests, optionally filtered, newest first.
#[utoipa::path(
    get,
    path = "/api/leave-requests",
    params(LeaveRequestQuery),
    responses(
        (status = 200, description = "Leave requests ordered by creation time", body = Object, example = json!({
            "leaveRequests": [{
                "id": 1, "user_id": 42, "start_date": "2024-01-05", "end_date": "2024-01-08",
                "reason": "Family function at home", "leave_type": "personal",
                "status": "pending", "user_name": "Rahim Uddin"
            }]
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn list_leave_requests(
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveRequestQuery>,
) -> actix_web::Result<impl Responder> {
    let mut filter = SqlFilter::new();

    if let Some(user_id) = query.user_id {
        filter.push("lr.user_id = ?", FilterValue::U64(user_id));
    }
    if let Some(status) = query.status.as_deref() {
        filter.push("lr.status = ?", FilterValue::Str(status.to_string()));
    }
    if let Some(hostel_id) = query.hostel_id {
        filter.push("u.hostel_id = ?", FilterValue::U64(hostel_id));
    }

    let sql = format!(
        r#"
        SELECT lr.id, lr.user_id, lr.start_date, lr.end_date, lr.reason, lr.leave_type,
               lr.status, lr.approved_by, lr.approved_at, lr.created_at, lr.updated_at,
               u.name AS user_name, u.student_id, u.room_no,
               h.name AS hostel_name, a.name AS approved_by_name
        FROM leave_requests lr
        JOIN users u ON lr.user_id = u.id
        LEFT JOIN hostels h ON u.hostel_id = h.id
        LEFT JOIN users a ON lr.approved_by = a.id
        {}
        ORDER BY lr.created_at DESC
        "#,
        filter.where_clause()
    );

    let records = bind_filters(
        sqlx::query_as::<_, LeaveRequestRecord>(&sql),
        filter.values(),
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch leave requests");
        internal_error("Failed to fetch leave requests")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "leaveRequests": records })))
}

/// Create a pending leave request. The date range is passed through as
/// given; an end date before the start date is accepted.
#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body = CreateLeaveRequest,
    responses(
        (status = 200, description = "Leave request created as pending", body = Object, example = json!({
            "leaveRequest": {
                "id": 1, "user_id": 42, "start_date": "2024-01-05",
                "end_date": "2024-01-08", "status": "pending"
            }
        })),
        (status = 400, description = "Missing required field"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn create_leave_request(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveRequest>,
) -> actix_web::Result<impl Responder> {
    let (user_id, start_date, end_date, reason) = match (
        payload.user_id,
        payload.start_date,
        payload.end_date,
        payload.reason.as_deref(),
    ) {
        (Some(u), Some(s), Some(e), Some(r)) if !r.trim().is_empty() => (u, s, e, r),
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "User ID, dates, and reason are required"
            })));
        }
    };

    let leave_type = payload.leave_type.as_deref().unwrap_or("personal");

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests (user_id, start_date, end_date, reason, leave_type)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(start_date)
    .bind(end_date)
    .bind(reason)
    .bind(leave_type)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, user_id, "Failed to create leave request");
        internal_error("Failed to create leave request")
    })?;

    let record = fetch_leave_request(pool.get_ref(), result.last_insert_id())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch created leave request");
            internal_error("Failed to create leave request")
        })?;

    Ok(HttpResponse::Ok().json(json!({ "leaveRequest": record })))
}

/// Transition a pending request to approved or rejected. Terminal rows stay
/// terminal: re-transitioning answers 409.
#[utoipa::path(
    put,
    path = "/api/leave-requests",
    request_body = UpdateLeaveRequest,
    responses(
        (status = 200, description = "Leave request transitioned", body = Object, example = json!({
            "leaveRequest": { "id": 1, "status": "approved", "approved_by": 2 }
        })),
        (status = 400, description = "Missing id/status or invalid target status"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn update_leave_request(
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpdateLeaveRequest>,
) -> actix_web::Result<impl Responder> {
    let (id, status) = match (payload.id, payload.status.as_deref()) {
        (Some(id), Some(status)) => (id, status),
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "ID and status are required"
            })));
        }
    };

    let status = match LeaveStatus::from_str(status) {
        Ok(s) if s.is_terminal() => s,
        _ => {
            return Ok(HttpResponse::BadRequest().json(json!({
                "error": "Invalid status. Allowed: approved, rejected"
            })));
        }
    };

    let current: Option<String> =
        sqlx::query_scalar("SELECT status FROM leave_requests WHERE id = ?")
            .bind(id)
            .fetch_optional(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, id, "Failed to look up leave request");
                internal_error("Failed to update leave request")
            })?;

    match current.as_deref() {
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "error": "Leave request not found"
            })));
        }
        Some("pending") => {}
        Some(_) => {
            return Ok(HttpResponse::Conflict().json(json!({
                "error": "Leave request already processed"
            })));
        }
    }

    sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, approved_by = ?, approved_at = NOW(), updated_at = NOW()
        WHERE id = ? AND status = 'pending'
        "#,
    )
    .bind(status.to_string())
    .bind(payload.approved_by)
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to update leave request");
        internal_error("Failed to update leave request")
    })?;

    let record = fetch_leave_request(pool.get_ref(), id).await.map_err(|e| {
        error!(error = %e, id, "Failed to fetch updated leave request");
        internal_error("Failed to update leave request")
    })?;

    Ok(HttpResponse::Ok().json(json!({ "leaveRequest": record })))
}

async fn fetch_leave_request(pool: &MySqlPool, id: u64) -> Result<LeaveRequest, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, user_id, start_date, end_date, reason, leave_type,
               status, approved_by, approved_at, created_at, updated_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_one(pool)
    .await
}
