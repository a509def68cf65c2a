//! # Project and contribution models
//!
//! [`Project`] is read-only on the client; mutations go through dedicated
//! endpoints (like, request access, admin moderation). The server has used a
//! few spellings over time (`likeCount`/`likes`, `viewCount`/`views`,
//! `projectName`/`title`), all of which are accepted.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::access::AccessState;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum ProjectStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "PENDING",
            ProjectStatus::Approved => "APPROVED",
            ProjectStatus::Rejected => "REJECTED",
        }
    }

    /// Lowercase form used as a CSS modifier.
    pub fn css_class(&self) -> &'static str {
        match self {
            ProjectStatus::Pending => "pending",
            ProjectStatus::Approved => "approved",
            ProjectStatus::Rejected => "rejected",
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => ProjectStatus::Approved,
            "REJECTED" => ProjectStatus::Rejected,
            _ => ProjectStatus::Pending,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    #[serde(default, alias = "title")]
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, alias = "views")]
    pub view_count: u64,
    #[serde(default, alias = "likes")]
    pub like_count: u64,
    #[serde(default)]
    pub team_leader_name: String,
    #[serde(default)]
    pub course: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub semester: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub live_link: Option<String>,
    #[serde(default)]
    pub code_link: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_datetime")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    /// "dd Mon yyyy" or an empty string when the date is unknown.
    pub fn created_label(&self) -> String {
        self.created_at
            .map(|at| at.format("%d %b %Y").to_string())
            .unwrap_or_default()
    }

    pub fn is_owned_by(&self, email: &str) -> bool {
        self.owner_email
            .as_deref()
            .is_some_and(|owner| owner.eq_ignore_ascii_case(email))
    }
}

/// Fields of the `/projects/upload` multipart form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProject {
    pub project_name: String,
    pub team_leader_name: String,
    pub course: String,
    pub semester: String,
    /// Comma-separated, as typed.
    pub tech_stack: String,
    pub description: String,
    pub live_link: String,
    pub code_link: String,
}

impl NewProject {
    /// The text parts of the upload form, in the order the server expects.
    pub fn form_fields(&self) -> [(&'static str, String); 8] {
        [
            ("projectName", self.project_name.trim().to_string()),
            ("teamLeaderName", self.team_leader_name.trim().to_string()),
            ("course", self.course.clone()),
            ("semester", self.semester.clone()),
            ("techStack", self.tech_stack.trim().to_string()),
            ("description", self.description.trim().to_string()),
            ("liveLink", self.live_link.trim().to_string()),
            ("codeLink", self.code_link.trim().to_string()),
        ]
    }

    /// First missing required field, phrased for the user.
    pub fn missing_field(&self) -> Option<&'static str> {
        let required = [
            (&self.project_name, "Project name is required."),
            (&self.team_leader_name, "Team leader name is required."),
            (&self.course, "Please select a course."),
            (&self.semester, "Please select a semester."),
            (&self.tech_stack, "Tech stack is required."),
            (&self.code_link, "Code repository link is required."),
        ];
        required
            .into_iter()
            .find(|(value, _)| value.trim().is_empty())
            .map(|(_, message)| message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_link: Option<String>,
}

impl ProjectUpdate {
    /// Prefill the owner's edit form.
    pub fn from_project(project: &Project) -> Self {
        Self {
            project_name: Some(project.project_name.clone()),
            description: Some(project.description.clone()),
            live_link: project.live_link.clone(),
            code_link: project.code_link.clone(),
        }
    }

    /// First reason the edit cannot be saved, if any.
    pub fn problem(&self) -> Option<&'static str> {
        let blank = |value: &Option<String>| value.as_deref().map(str::trim).unwrap_or_default().is_empty();
        if blank(&self.project_name) {
            return Some("Project name is required");
        }
        if blank(&self.description) {
            return Some("Description is required");
        }
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub liked: Option<bool>,
}

/// `GET /contributions/access/{id}` answers with either a status string or a
/// bare `hasAccess` flag.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub has_access: Option<bool>,
}

impl AccessResponse {
    pub fn to_state(&self) -> AccessState {
        if let Some(state) = self.status.as_deref().and_then(AccessState::from_server) {
            return state;
        }
        match self.has_access {
            Some(true) => AccessState::Approved,
            _ => AccessState::NoRequest,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
        }
    }
}

impl From<String> for RequestStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "APPROVED" => RequestStatus::Approved,
            "REJECTED" => RequestStatus::Rejected,
            _ => RequestStatus::Pending,
        }
    }
}

/// A request by one student for access to another's project source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionRequest {
    pub id: i64,
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub requester_name: Option<String>,
    #[serde(default)]
    pub requester_email: Option<String>,
    #[serde(default)]
    pub requester_course: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub requester_semester: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, alias = "requestedDate", deserialize_with = "lenient_datetime")]
    pub requested_at: Option<DateTime<Utc>>,
}

/// Accept a JSON string, number or null as an optional string.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accept `["a","b"]`, `"a, b"` or null.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        Many(Vec<String>),
        One(String),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::Many(items)) => items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Some(OneOrMany::One(joined)) => joined
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => Vec::new(),
    })
}

/// Accept RFC 3339 timestamps and the server's zone-less `LocalDateTime`
/// format. Anything else reads as unknown rather than failing the record.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(serde_json::Value::String(raw)) = Option::<serde_json::Value>::deserialize(deserializer)?
    else {
        return Ok(None);
    };
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    Ok(NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc()))
}
