//! Closed enums for user roles and account lifecycle status.
//!
//! Both are stored as lower-case text in the database; parsing happens at
//! the API boundary so an invalid value is rejected with a 400 instead of
//! surfacing as a query-time surprise.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marketplace role. New users default to [`UserRole::Student`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Teacher,
}

impl UserRole {
    /// Canonical database / JWT-claim representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Teacher => "teacher",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    /// Case-insensitive parse. Anything outside the closed set is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "teacher" => Ok(UserRole::Teacher),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Account lifecycle status. Accounts start [`AccountStatus::Inactive`] and
/// become [`AccountStatus::Active`] once the email address is verified.
/// Login is permitted only from `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Inactive,
    Suspended,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(AccountStatus::Active),
            "inactive" => Ok(AccountStatus::Inactive),
            "suspended" => Ok(AccountStatus::Suspended),
            other => Err(format!("Unknown account status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [UserRole::Student, UserRole::Teacher] {
            let parsed: UserRole = role.as_str().parse().expect("parse should succeed");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!("STUDENT".parse::<UserRole>().unwrap(), UserRole::Student);
        assert_eq!("Teacher".parse::<UserRole>().unwrap(), UserRole::Teacher);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("admin".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Inactive,
            AccountStatus::Suspended,
        ] {
            let parsed: AccountStatus = status.as_str().parse().expect("parse should succeed");
            assert_eq!(parsed, status);
        }
    }
}
