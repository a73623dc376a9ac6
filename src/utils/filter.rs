use chrono::NaiveDate;
use sqlx::mysql::MySqlArguments;
use sqlx::{MySql, query::QueryAs};

/// SQL bindable value for dynamically assembled WHERE clauses.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

/// Accumulates `AND column = ?` conditions alongside their bind values.
/// Starts from `WHERE 1=1` so conditions can be appended unconditionally.
#[derive(Debug, Default)]
pub struct SqlFilter {
    conditions: Vec<String>,
    values: Vec<FilterValue>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, condition: &str, value: FilterValue) {
        self.conditions.push(condition.to_string());
        self.values.push(value);
    }

    pub fn where_clause(&self) -> String {
        let mut sql = String::from(" WHERE 1=1");
        for condition in &self.conditions {
            sql.push_str(" AND ");
            sql.push_str(condition);
        }
        sql
    }

    pub fn values(&self) -> &[FilterValue] {
        &self.values
    }
}

/// Binds accumulated filter values onto a `query_as` in push order.
pub fn bind_filters<'q, O>(
    mut query: QueryAs<'q, MySql, O, MySqlArguments>,
    values: &[FilterValue],
) -> QueryAs<'q, MySql, O, MySqlArguments> {
    for value in values {
        query = match value {
            FilterValue::U64(v) => query.bind(*v),
            FilterValue::Str(s) => query.bind(s.clone()),
            FilterValue::Date(d) => query.bind(*d),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_is_a_no_op_where() {
        let filter = SqlFilter::new();
        assert_eq!(filter.where_clause(), " WHERE 1=1");
        assert!(filter.values().is_empty());
    }

    #[test]
    fn conditions_are_and_combined_in_push_order() {
        let mut filter = SqlFilter::new();
        filter.push("a.date = ?", FilterValue::Date("2024-01-01".parse().unwrap()));
        filter.push("a.user_id = ?", FilterValue::U64(7));
        filter.push("a.status = ?", FilterValue::Str("present".into()));

        assert_eq!(
            filter.where_clause(),
            " WHERE 1=1 AND a.date = ? AND a.user_id = ? AND a.status = ?"
        );
        assert_eq!(filter.values().len(), 3);
        assert_eq!(filter.values()[1], FilterValue::U64(7));
    }

    #[test]
    fn values_keep_their_types() {
        let mut filter = SqlFilter::new();
        filter.push("u.role = ?", FilterValue::Str("student".into()));
        match &filter.values()[0] {
            FilterValue::Str(s) => assert_eq!(s, "student"),
            other => panic!("unexpected value {:?}", other),
        }
    }
}
