//! # Session-level domain types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Role`] | `STUDENT` or `ADMIN`. Parsing is lenient (case-insensitive, `ROLE_` prefix accepted) and anything unknown reads as [`Role::Student`]. |
//! | [`AccountStatus`] | `ACTIVE`, `SUSPENDED` or `INACTIVE`. Unknown values read as [`AccountStatus::Active`]. |
//! | [`StoredUser`] | The JSON object persisted under the `user` key: `{fullName, email, role, accountStatus}`. |
//!
//! These values only gate UI affordances. The server enforces roles on every
//! privileged call, so a stale or forged local copy changes what is shown, not
//! what is allowed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The role a user holds on the portal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Admin => "ADMIN",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::from(value.as_str())
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        let upper = value.trim().to_ascii_uppercase();
        match upper.strip_prefix("ROLE_").unwrap_or(&upper) {
            "ADMIN" => Role::Admin,
            _ => Role::Student,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account standing as reported by the server.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum AccountStatus {
    #[default]
    Active,
    Suspended,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Suspended => "SUSPENDED",
            AccountStatus::Inactive => "INACTIVE",
        }
    }

    /// Why this account may not upload projects, or `None` when it may.
    pub fn upload_block_reason(&self) -> Option<&'static str> {
        match self {
            AccountStatus::Active => None,
            AccountStatus::Suspended => Some(
                "You are suspended and cannot upload projects. Please contact admin for assistance.",
            ),
            AccountStatus::Inactive => Some("Your account is inactive. Please contact admin."),
        }
    }
}

impl From<String> for AccountStatus {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&str> for AccountStatus {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "SUSPENDED" => AccountStatus::Suspended,
            "INACTIVE" => AccountStatus::Inactive,
            _ => AccountStatus::Active,
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User object persisted under the `user` storage key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_status: Option<AccountStatus>,
}

impl StoredUser {
    /// The display name, if one is set and not blank.
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn role_or_default(&self) -> Role {
        self.role.unwrap_or_default()
    }

    pub fn status_or_default(&self) -> AccountStatus {
        self.account_status.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_lenient() {
        assert_eq!(Role::from("ADMIN"), Role::Admin);
        assert_eq!(Role::from("admin"), Role::Admin);
        assert_eq!(Role::from("ROLE_ADMIN"), Role::Admin);
        assert_eq!(Role::from("STUDENT"), Role::Student);
        assert_eq!(Role::from("faculty"), Role::Student);
        assert_eq!(Role::from(""), Role::Student);
    }

    #[test]
    fn test_stored_user_json_shape() {
        let user = StoredUser {
            full_name: Some("Jane Doe".to_string()),
            email: Some("jane@x.com".to_string()),
            role: Some(Role::Admin),
            account_status: Some(AccountStatus::Suspended),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "fullName": "Jane Doe",
                "email": "jane@x.com",
                "role": "ADMIN",
                "accountStatus": "SUSPENDED",
            })
        );
    }

    #[test]
    fn test_stored_user_tolerates_partial_objects() {
        let user: StoredUser =
            serde_json::from_str(r#"{"email":"a@b.co","role":"weird","extra":1}"#).unwrap();
        assert_eq!(user.display_name(), None);
        assert_eq!(user.role_or_default(), Role::Student);
        assert_eq!(user.status_or_default(), AccountStatus::Active);
    }

    #[test]
    fn test_blank_name_is_not_a_display_name() {
        let user = StoredUser {
            full_name: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(user.display_name(), None);
    }

    #[test]
    fn test_upload_block_reason() {
        assert!(AccountStatus::Active.upload_block_reason().is_none());
        assert!(AccountStatus::Suspended
            .upload_block_reason()
            .unwrap()
            .starts_with("You are suspended"));
        assert_eq!(
            AccountStatus::Inactive.upload_block_reason(),
            Some("Your account is inactive. Please contact admin.")
        );
    }
}
