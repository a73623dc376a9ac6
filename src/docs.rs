use crate::api::attendance::{AttendanceRecord, MarkAttendance};
use crate::api::hostel::{CreateHostel, HostelRecord};
use crate::api::leave_request::{CreateLeaveRequest, LeaveRequestRecord, UpdateLeaveRequest};
use crate::api::qr_code::{IssueQrCode, QrCodeLookup};
use crate::api::user::{CreateUser, UserRecord};
use crate::auth::handlers::{LoginRequest, LoginUser};
use crate::model::attendance::Attendance;
use crate::model::hostel::Hostel;
use crate::model::leave_request::LeaveRequest;
use crate::model::qr_code::QrCode;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Hostel Attendance Management API",
        version = "1.0.0",
        description = r#"
## Hostel Attendance Management System

REST backend for hostel attendance tracking.

### Key Features
- **Attendance** — mark students present/absent per date (upsert), filtered listings
- **Leave requests** — students apply, wardens approve or reject
- **QR codes** — per-user attendance tokens, one active code per user
- **Users & hostels** — directory of students, staff, and buildings

### Response Format
JSON throughout; failures carry a flat `{"error": "..."}` body.
"#,
    ),
    paths(
        crate::api::attendance::list_attendance,
        crate::api::attendance::mark_attendance,

        crate::api::leave_request::list_leave_requests,
        crate::api::leave_request::create_leave_request,
        crate::api::leave_request::update_leave_request,

        crate::api::qr_code::list_qr_codes,
        crate::api::qr_code::issue_qr_code,

        crate::api::user::list_users,
        crate::api::user::create_user,

        crate::api::hostel::list_hostels,
        crate::api::hostel::create_hostel,

        crate::auth::handlers::login,
    ),
    components(
        schemas(
            AttendanceRecord,
            MarkAttendance,
            Attendance,
            LeaveRequestRecord,
            CreateLeaveRequest,
            UpdateLeaveRequest,
            LeaveRequest,
            QrCodeLookup,
            IssueQrCode,
            QrCode,
            UserRecord,
            CreateUser,
            CreateHostel,
            HostelRecord,
            Hostel,
            LoginRequest,
            LoginUser,
        )
    ),
    tags(
        (name = "Attendance", description = "Attendance marking and listings"),
        (name = "Leave", description = "Leave request lifecycle"),
        (name = "QR codes", description = "Per-user attendance token registry"),
        (name = "Users", description = "User directory"),
        (name = "Hostels", description = "Hostel directory"),
        (name = "Auth", description = "Login"),
    )
)]
pub struct ApiDoc;
