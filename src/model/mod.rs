pub mod attendance;
pub mod hostel;
pub mod leave_request;
pub mod qr_code;
pub mod role;
