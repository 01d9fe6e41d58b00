//! Account entity representing a registered user of the marketplace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account class an identity belongs to
///
/// The same mobile number may hold one account per role; challenges and
/// rate-limit budgets are likewise scoped per role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A rider booking seats
    Customer,
    /// A vehicle owner listing rides
    Driver,
}

impl Role {
    /// The lowercase wire name of this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Driver => "driver",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "driver" => Ok(Role::Driver),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// A registered account, keyed by (mobile, role)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: Uuid,

    /// Mobile number the account is bound to (10 digits)
    pub mobile: String,

    /// Account class
    pub role: Role,

    /// Display name collected at registration
    pub full_name: String,

    /// Timestamp when the account was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the account was last updated
    pub updated_at: DateTime<Utc>,

    /// Timestamp of the last successful login
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates a new account
    pub fn new(mobile: String, role: Role, full_name: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            mobile,
            role,
            full_name,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    /// Records a successful login
    pub fn touch_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account() {
        let account = Account::new(
            "9876543210".to_string(),
            Role::Customer,
            "Asha Rao".to_string(),
        );

        assert_eq!(account.mobile, "9876543210");
        assert_eq!(account.role, Role::Customer);
        assert_eq!(account.full_name, "Asha Rao");
        assert!(account.last_login_at.is_none());
    }

    #[test]
    fn test_touch_login() {
        let mut account = Account::new(
            "9876543210".to_string(),
            Role::Driver,
            "Vikram Shah".to_string(),
        );

        account.touch_login();
        assert!(account.last_login_at.is_some());
        assert!(account.updated_at >= account.created_at);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("customer".parse::<Role>().unwrap(), Role::Customer);
        assert_eq!("driver".parse::<Role>().unwrap(), Role::Driver);
        assert!("admin".parse::<Role>().is_err());
        assert!("Customer".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Driver).unwrap(), "\"driver\"");
        let role: Role = serde_json::from_str("\"customer\"").unwrap();
        assert_eq!(role, Role::Customer);
    }
}
