use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

impl LeaveStatus {
    /// Only the two terminal states are valid transition targets; a request
    /// is created pending and never returns there.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LeaveStatus::Approved | LeaveStatus::Rejected)
    }
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = "2024-01-05", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-08", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Family function at home")]
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn only_approved_and_rejected_are_terminal() {
        assert!(LeaveStatus::Approved.is_terminal());
        assert!(LeaveStatus::Rejected.is_terminal());
        assert!(!LeaveStatus::Pending.is_terminal());
    }

    #[test]
    fn parses_lowercase_status() {
        assert_eq!(
            LeaveStatus::from_str("approved").unwrap(),
            LeaveStatus::Approved
        );
        assert!(LeaveStatus::from_str("cancelled").is_err());
    }
}
