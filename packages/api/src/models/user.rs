//! # Authentication and profile models
//!
//! - [`Credentials`], [`Registration`], [`AdminRegistration`]: request bodies
//!   for `/auth/login`, `/auth/register` and `/auth/register-admin`.
//! - [`AuthResponse`]: `{token, email, role, user?}`; the token is what the
//!   session layer persists.
//! - [`UserProfile`]: `GET /users/profile`. [`UserProfile::to_stored_user`]
//!   projects it into the object kept in local storage.

use serde::{Deserialize, Serialize};
use store::{AccountStatus, Role, StoredUser};

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub full_name: String,
    pub email: String,
    pub roll_number: String,
    pub course: String,
    pub semester: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRegistration {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub user: Option<StoredUser>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// The user object to persist alongside the token.
    ///
    /// Prefers the embedded `user`; otherwise builds one from the top-level
    /// `email`/`role`/`fullName` when at least one of them is present.
    pub fn stored_user(&self) -> Option<StoredUser> {
        if let Some(user) = &self.user {
            return Some(user.clone());
        }
        if self.email.is_none() && self.role.is_none() && self.full_name.is_none() {
            return None;
        }
        Some(StoredUser {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            role: self.role,
            account_status: None,
        })
    }
}

/// Profile of the logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub account_status: Option<AccountStatus>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "crate::models::project::lenient_string")]
    pub semester: Option<String>,
    #[serde(default)]
    pub projects_uploaded: Option<u32>,
    #[serde(default)]
    pub projects_collaborated: Option<u32>,
}

impl UserProfile {
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// The subset of the profile that is persisted locally.
    pub fn to_stored_user(&self) -> StoredUser {
        StoredUser {
            full_name: self.display_name().map(str::to_string),
            email: self.email.clone(),
            role: Some(self.role.unwrap_or_default()),
            account_status: Some(self.account_status.unwrap_or_default()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_number: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_builds_user_from_top_level_fields() {
        let resp: AuthResponse =
            serde_json::from_str(r#"{"token":"t","email":"a@b.co","role":"ADMIN"}"#).unwrap();
        let user = resp.stored_user().unwrap();
        assert_eq!(user.email.as_deref(), Some("a@b.co"));
        assert_eq!(user.role, Some(Role::Admin));
        assert_eq!(user.full_name, None);
    }

    #[test]
    fn test_auth_response_prefers_embedded_user() {
        let resp: AuthResponse = serde_json::from_str(
            r#"{"token":"t","email":"x@y.co","user":{"fullName":"Jane","email":"jane@x.com"}}"#,
        )
        .unwrap();
        assert_eq!(resp.stored_user().unwrap().full_name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_auth_response_without_identity_has_no_user() {
        let resp: AuthResponse = serde_json::from_str(r#"{"token":"t"}"#).unwrap();
        assert!(resp.stored_user().is_none());
    }

    #[test]
    fn test_profile_to_stored_user_fills_defaults() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"fullName":"Ravi Kumar","email":"r@x.com","semester":3,"accountStatus":"SUSPENDED"}"#,
        )
        .unwrap();
        assert_eq!(profile.semester.as_deref(), Some("3"));

        let stored = profile.to_stored_user();
        assert_eq!(stored.full_name.as_deref(), Some("Ravi Kumar"));
        assert_eq!(stored.role, Some(Role::Student));
        assert_eq!(stored.account_status, Some(AccountStatus::Suspended));
    }

    #[test]
    fn test_registration_serializes_camel_case() {
        let body = serde_json::to_value(Registration {
            full_name: "A".into(),
            email: "SCFP1@mitvpu.ac.in".into(),
            roll_number: "42".into(),
            course: "MCA".into(),
            semester: "1st".into(),
            password: "secret1".into(),
        })
        .unwrap();
        assert_eq!(body["fullName"], "A");
        assert_eq!(body["rollNumber"], "42");
    }
}
