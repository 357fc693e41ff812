use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role attached to a user account.
///
/// `Web` marks accounts used by the desktop/web dashboard rather than the
/// mobile time-clock client; `Admin` unlocks the /api/admin routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    Web,
}

impl UserRole {
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    pub fn is_web_dashboard(&self) -> bool {
        matches!(self, UserRole::Web)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
            UserRole::Web => "web",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(UserRole::User),
            "admin" => Ok(UserRole::Admin),
            "web" => Ok(UserRole::Web),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// Current UTC timestamp in the ISO-8601 form every table stores.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in [UserRole::User, UserRole::Admin, UserRole::Web] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("superuser".parse::<UserRole>().is_err());
    }

    #[test]
    fn admin_flags() {
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Web.is_admin());
        assert!(UserRole::Web.is_web_dashboard());
    }
}
