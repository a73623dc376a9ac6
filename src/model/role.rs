use strum_macros::{Display, EnumString};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    Staff,
    Student,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_known_roles() {
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("staff").unwrap(), Role::Staff);
        assert_eq!(Role::from_str("student").unwrap(), Role::Student);
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(Role::from_str("warden").is_err());
    }

    #[test]
    fn renders_lowercase() {
        assert_eq!(Role::Student.to_string(), "student");
    }
}
