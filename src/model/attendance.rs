use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

/// One row per (user, date); marking the same pair again updates in place.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 42)]
    pub user_id: u64,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "present")]
    pub status: String,
    pub marked_by: Option<u64>,
    #[schema(example = "2024-01-01T08:30:00Z", format = "date-time", value_type = String)]
    pub marked_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_as_lowercase() {
        assert_eq!(AttendanceStatus::Present.to_string(), "present");
        assert_eq!(
            AttendanceStatus::from_str("absent").unwrap(),
            AttendanceStatus::Absent
        );
    }

    #[test]
    fn status_rejects_unknown_values() {
        assert!(AttendanceStatus::from_str("late").is_err());
        assert!(AttendanceStatus::from_str("").is_err());
    }
}
