use serde::{Deserialize, Serialize};
use store::AccountStatus;

use crate::models::project::lenient_string;
use crate::recipients::Recipient;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    #[serde(default)]
    pub total_students: u64,
    #[serde(default)]
    pub total_projects: u64,
    #[serde(default)]
    pub pending_projects: u64,
    #[serde(default)]
    pub pending_requests: u64,
    #[serde(default)]
    pub active_collaborations: u64,
}

/// A registered student as listed by `/admin/students`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub semester: Option<String>,
    #[serde(default)]
    pub account_status: Option<AccountStatus>,
    #[serde(default)]
    pub status: Option<AccountStatus>,
    #[serde(default)]
    pub project_count: Option<u32>,
    #[serde(default)]
    pub projects: Option<u32>,
    #[serde(default)]
    pub join_date: Option<String>,
}

impl Student {
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .or(self.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.email)
    }

    pub fn standing(&self) -> AccountStatus {
        self.account_status.or(self.status).unwrap_or_default()
    }

    pub fn project_total(&self) -> u32 {
        self.project_count.or(self.projects).unwrap_or(0)
    }
}

/// Body of `PUT /admin/students/{id}`. Admins may change every field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUpdate {
    pub full_name: String,
    pub email: String,
    pub roll_number: String,
    pub course: String,
    #[serde(serialize_with = "semester_number")]
    pub semester: String,
    pub status: AccountStatus,
}

impl StudentUpdate {
    /// Prefill the edit form from a roster entry.
    pub fn from_student(student: &Student) -> Self {
        Self {
            full_name: student
                .full_name
                .clone()
                .or_else(|| student.name.clone())
                .unwrap_or_default(),
            email: student.email.clone(),
            roll_number: student.roll_number.clone().unwrap_or_default(),
            course: student.course.clone().unwrap_or_default(),
            semester: student.semester.clone().unwrap_or_default(),
            status: student.standing(),
        }
    }

    /// First reason the edit cannot be saved, if any.
    pub fn problem(&self) -> Option<&'static str> {
        if self.full_name.trim().is_empty() || self.email.trim().is_empty() {
            return Some("Name and Email are required!");
        }
        None
    }
}

// Semesters go over the wire as their leading number ("4th" is 4) when they
// have one.
fn semester_number<S: serde::Serializer>(semester: &str, serializer: S) -> Result<S::Ok, S::Error> {
    let digits: String = semester
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<u32>() {
        Ok(n) => serializer.serialize_u32(n),
        Err(_) => serializer.serialize_str(semester),
    }
}

/// Minimum length for a password an admin sets on a student's behalf.
pub const MIN_ADMIN_SET_PASSWORD_LEN: usize = 6;

/// First problem with an admin-set password, if any.
pub fn new_password_problem(password: &str, confirm: &str) -> Option<&'static str> {
    if password.is_empty() || confirm.is_empty() {
        return Some("Please enter both password fields!");
    }
    if password.chars().count() < MIN_ADMIN_SET_PASSWORD_LEN {
        return Some("Password must be at least 6 characters!");
    }
    if password != confirm {
        return Some("Passwords do not match!");
    }
    None
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub projects: u32,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub collaborations: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub id: i64,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_full_name: Option<String>,
    #[serde(default)]
    pub action_type: Option<String>,
    #[serde(default)]
    pub action_category: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub old_value: Option<String>,
    #[serde(default)]
    pub new_value: Option<String>,
    #[serde(default)]
    pub time_ago: Option<String>,
}

/// JSON carried in the `emailData` part of `/admin/send-bulk-email`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkEmailRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_ids: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_recipients: Option<Vec<Recipient>>,
    pub subject: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_accepts_aliases() {
        let student: Student = serde_json::from_str(
            r#"{"id":9,"name":"Amit Kumar","email":"SCFP9@mitvpu.ac.in","semester":4,"status":"INACTIVE","projects":2}"#,
        )
        .unwrap();
        assert_eq!(student.display_name(), "Amit Kumar");
        assert_eq!(student.semester.as_deref(), Some("4"));
        assert_eq!(student.standing(), AccountStatus::Inactive);
        assert_eq!(student.project_total(), 2);
    }

    #[test]
    fn test_student_name_falls_back_to_email() {
        let student: Student =
            serde_json::from_str(r#"{"id":1,"fullName":" ","email":"a@b.co"}"#).unwrap();
        assert_eq!(student.display_name(), "a@b.co");
    }

    #[test]
    fn test_student_update_wire_format() {
        let student: Student = serde_json::from_str(
            r#"{"id":9,"name":"Amit Kumar","email":"SCFP9@mitvpu.ac.in","rollNumber":"R9","course":"BCA","semester":4,"status":"ACTIVE"}"#,
        )
        .unwrap();
        let mut update = StudentUpdate::from_student(&student);
        assert_eq!(update.full_name, "Amit Kumar");
        update.status = AccountStatus::Suspended;

        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({
                "fullName": "Amit Kumar",
                "email": "SCFP9@mitvpu.ac.in",
                "rollNumber": "R9",
                "course": "BCA",
                "semester": 4,
                "status": "SUSPENDED",
            })
        );

        update.semester = "5th".into();
        assert_eq!(serde_json::to_value(&update).unwrap()["semester"], 5);
        update.semester = "Final".into();
        assert_eq!(serde_json::to_value(&update).unwrap()["semester"], "Final");
    }

    #[test]
    fn test_student_update_requires_name_and_email() {
        let mut update = StudentUpdate {
            full_name: "Amit".into(),
            email: "a@b.co".into(),
            ..Default::default()
        };
        assert_eq!(update.problem(), None);
        update.full_name = "  ".into();
        assert_eq!(update.problem(), Some("Name and Email are required!"));
    }

    #[test]
    fn test_admin_set_password_rules() {
        assert_eq!(
            new_password_problem("", "abcdef"),
            Some("Please enter both password fields!")
        );
        assert_eq!(
            new_password_problem("abc", "abc"),
            Some("Password must be at least 6 characters!")
        );
        assert_eq!(
            new_password_problem("abcdef", "abcdeg"),
            Some("Passwords do not match!")
        );
        assert_eq!(new_password_problem("abcdef", "abcdef"), None);
    }

    #[test]
    fn test_bulk_email_request_omits_empty_groups() {
        let request = BulkEmailRequest {
            student_ids: None,
            additional_recipients: Some(vec![Recipient {
                email: "jane@x.com".into(),
                name: None,
            }]),
            subject: "Hi".into(),
            message: "Body".into(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "additionalRecipients": [{"email": "jane@x.com", "name": null}],
                "subject": "Hi",
                "message": "Body",
            })
        );
    }
}
