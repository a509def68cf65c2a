//! # REST client
//!
//! [`ApiClient`] is a thin typed layer over `reqwest`. It is cheap to clone and
//! carries the bearer token it was built with; the UI rebuilds it whenever the
//! session changes, so the client itself never reads storage.
//!
//! Every response goes through one handler:
//!
//! - non-2xx: the message from the body (see [`error_message_from_body`])
//!   becomes [`ApiError::Server`];
//! - 2xx JSON: decoded into the endpoint's type;
//! - 2xx plain text: becomes `{message, success: true}` for endpoints that
//!   return a [`MessageResponse`].
//!
//! Calls that need a token fail fast with [`ApiError::Unauthenticated`] when
//! none is set, without touching the network.

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{IntoUrl, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use store::ClientConfig;

use crate::access::{AccessSource, AccessState};
use crate::activity::{ActivityDigest, ActivityFilter};
use crate::attachments::{Attachment, AttachmentSet};
use crate::browse::ProjectQuery;
use crate::error::{error_message_from_body, ApiError};
use crate::models::*;
use crate::session::ProfileSource;

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: build_http(config),
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Same client, different credentials. Blank tokens count as none.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `path` followed by `segment` as one percent-encoded path segment, for
    /// user-supplied values such as email addresses.
    fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.url(path)).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(segment);
        Ok(url)
    }

    /// The token, or an error telling the user to log in to do `action`.
    fn bearer(&self, action: &str) -> Result<&str, ApiError> {
        self.token
            .as_deref()
            .ok_or_else(|| ApiError::Unauthenticated(format!("Please login to {action}")))
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.url(path))
    }

    fn authed(
        &self,
        method: reqwest::Method,
        path: &str,
        action: &str,
    ) -> Result<RequestBuilder, ApiError> {
        self.authed_at(method, self.url(path), action)
    }

    fn authed_at(
        &self,
        method: reqwest::Method,
        url: impl IntoUrl,
        action: &str,
    ) -> Result<RequestBuilder, ApiError> {
        let token = self.bearer(action)?;
        Ok(self.http.request(method, url).bearer_auth(token))
    }

    fn authed_get(&self, path: &str, action: &str) -> Result<RequestBuilder, ApiError> {
        self.authed(reqwest::Method::GET, path, action)
    }

    fn authed_post(&self, path: &str, action: &str) -> Result<RequestBuilder, ApiError> {
        self.authed(reqwest::Method::POST, path, action)
    }

    fn authed_put(&self, path: &str, action: &str) -> Result<RequestBuilder, ApiError> {
        self.authed(reqwest::Method::PUT, path, action)
    }

    fn authed_delete(&self, path: &str, action: &str) -> Result<RequestBuilder, ApiError> {
        self.authed(reqwest::Method::DELETE, path, action)
    }

    // ---- auth ----

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = self.http.post(self.url("auth/login")).json(credentials);
        fetch_json(request).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let request = self.http.post(self.url("auth/register")).json(registration);
        fetch_json(request).await
    }

    pub async fn register_admin(
        &self,
        registration: &AdminRegistration,
    ) -> Result<AuthResponse, ApiError> {
        let request = self
            .http
            .post(self.url("auth/register-admin"))
            .json(registration);
        fetch_json(request).await
    }

    /// Best effort: failures are logged and swallowed. Callers clear local
    /// state regardless.
    pub async fn logout(&self) {
        let Ok(request) = self.authed_post("auth/logout", "logout") else {
            return;
        };
        if let Err(e) = fetch_message(request).await {
            tracing::warn!("logout call failed: {e}");
        }
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let request = self
            .http
            .post(self.url("auth/forgot-password"))
            .json(&json!({ "email": email }));
        fetch_message(request).await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .http
            .post(self.url("auth/reset-password"))
            .json(&json!({ "token": token, "newPassword": new_password }));
        fetch_message(request).await
    }

    pub async fn validate_reset_token(&self, token: &str) -> Result<MessageResponse, ApiError> {
        let request = self
            .get("auth/validate-reset-token")
            .query(&[("token", token)]);
        fetch_message(request).await
    }

    // ---- projects ----

    /// Multipart upload: the text fields of `project` plus one `screenshots`
    /// part per image.
    pub async fn upload_project(
        &self,
        project: &NewProject,
        screenshots: &[Attachment],
    ) -> Result<MessageResponse, ApiError> {
        let mut form = Form::new();
        for (name, value) in project.form_fields() {
            form = form.text(name, value);
        }
        for shot in screenshots {
            form = form.part("screenshots", file_part(shot)?);
        }
        let request = self
            .authed_post("projects/upload", "upload projects")?
            .multipart(form);
        fetch_message(request).await
    }

    pub async fn browse_projects(&self) -> Result<Vec<Project>, ApiError> {
        fetch_list(self.get("projects/browse")).await
    }

    pub async fn approved_projects(&self) -> Result<Vec<Project>, ApiError> {
        fetch_list(self.get("projects/approved")).await
    }

    pub async fn search_projects(&self, query: &ProjectQuery) -> Result<Vec<Project>, ApiError> {
        let request = self.get("projects/search").query(&query.search_params());
        fetch_list(request).await
    }

    pub async fn project(&self, id: i64) -> Result<Project, ApiError> {
        fetch_json(self.get(&format!("projects/{id}"))).await
    }

    pub async fn update_project(
        &self,
        id: i64,
        update: &ProjectUpdate,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .authed_put(&format!("projects/{id}"), "update projects")?
            .json(update);
        fetch_message(request).await
    }

    pub async fn toggle_like(&self, id: i64) -> Result<LikeResponse, ApiError> {
        let request = self.authed_post(&format!("projects/{id}/like"), "like projects")?;
        fetch_json(request).await
    }

    // ---- contributions ----

    /// Access status for one project. Without a token the answer is
    /// [`AccessState::NotLoggedIn`] and no request is made.
    pub async fn download_access(&self, project_id: i64) -> Result<AccessState, ApiError> {
        let Ok(request) = self.authed_get(
            &format!("contributions/access/{project_id}"),
            "check access",
        ) else {
            return Ok(AccessState::NotLoggedIn);
        };
        let response: AccessResponse = fetch_json(request).await?;
        Ok(response.to_state())
    }

    pub async fn request_contribution(
        &self,
        project_id: i64,
        message: &str,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .authed_post(
                &format!("contributions/{project_id}"),
                "request download access",
            )?
            .json(&json!({ "message": message }));
        fetch_message(request).await
    }

    pub async fn contribution_requests(
        &self,
        project_id: i64,
    ) -> Result<Vec<ContributionRequest>, ApiError> {
        let request = self.authed_get(
            &format!("contributions/project/{project_id}"),
            "view requests",
        )?;
        fetch_list(request).await
    }

    pub async fn update_contribution_status(
        &self,
        request_id: i64,
        status: RequestStatus,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .authed_put(
                &format!("contributions/{request_id}/status"),
                "update requests",
            )?
            .json(&json!({ "status": status.as_str() }));
        fetch_message(request).await
    }

    // ---- users ----

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        fetch_json(self.authed_get("users/profile", "view your profile")?).await
    }

    pub async fn update_profile(
        &self,
        update: &ProfileUpdate,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .authed_put("users/profile", "update your profile")?
            .json(update);
        fetch_message(request).await
    }

    /// Requests waiting on the current user's projects.
    pub async fn pending_requests(&self) -> Result<Vec<ContributionRequest>, ApiError> {
        fetch_list(self.authed_get("users/pending-requests", "view requests")?).await
    }

    pub async fn approve_request(&self, request_id: i64) -> Result<MessageResponse, ApiError> {
        let request = self.authed_post(
            &format!("users/requests/{request_id}/approve"),
            "approve requests",
        )?;
        fetch_message(request).await
    }

    pub async fn reject_request(&self, request_id: i64) -> Result<MessageResponse, ApiError> {
        let request = self.authed_post(
            &format!("users/requests/{request_id}/reject"),
            "reject requests",
        )?;
        fetch_message(request).await
    }

    pub async fn change_password(
        &self,
        change: &PasswordChange,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .authed_put("users/change-password", "change your password")?
            .json(change);
        fetch_message(request).await
    }

    // ---- admin ----

    pub async fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        fetch_json(self.authed_get("admin/stats", "access admin dashboard")?).await
    }

    /// All students, optionally only those in `course`.
    pub async fn students(&self, course: Option<&str>) -> Result<Vec<Student>, ApiError> {
        let mut request = self.authed_get("admin/students", "access student list")?;
        if let Some(course) = course.map(str::trim).filter(|c| !c.is_empty()) {
            request = request.query(&[("course", course)]);
        }
        fetch_list(request).await
    }

    pub async fn update_student(
        &self,
        id: i64,
        update: &StudentUpdate,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .authed_put(&format!("admin/students/{id}"), "update students")?
            .json(update);
        fetch_message(request).await
    }

    pub async fn delete_student(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let request = self.authed_delete(&format!("admin/students/{id}"), "delete students")?;
        fetch_message(request).await
    }

    pub async fn change_student_password(
        &self,
        id: i64,
        new_password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let request = self
            .authed_put(
                &format!("admin/students/{id}/change-password"),
                "change student passwords",
            )?
            .json(&json!({ "newPassword": new_password }));
        fetch_message(request).await
    }

    pub async fn admin_projects(&self) -> Result<Vec<Project>, ApiError> {
        fetch_list(self.authed_get("admin/projects", "access projects")?).await
    }

    pub async fn approve_project(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let request =
            self.authed_put(&format!("admin/projects/{id}/approve"), "approve projects")?;
        fetch_message(request).await
    }

    pub async fn reject_project(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let request =
            self.authed_put(&format!("admin/projects/{id}/reject"), "reject projects")?;
        fetch_message(request).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let request = self.authed_delete(&format!("admin/projects/{id}"), "delete projects")?;
        fetch_message(request).await
    }

    pub async fn admin_requests(&self) -> Result<Vec<ContributionRequest>, ApiError> {
        fetch_list(self.authed_get("admin/requests", "access requests")?).await
    }

    pub async fn admin_approve_request(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let request =
            self.authed_put(&format!("admin/requests/{id}/approve"), "approve requests")?;
        fetch_message(request).await
    }

    pub async fn admin_reject_request(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let request =
            self.authed_put(&format!("admin/requests/{id}/reject"), "reject requests")?;
        fetch_message(request).await
    }

    /// One multipart request: `emailData` as JSON plus an `attachments` part
    /// per staged file.
    pub async fn send_bulk_email(
        &self,
        email: &BulkEmailRequest,
        attachments: &AttachmentSet,
    ) -> Result<MessageResponse, ApiError> {
        let email_data = Part::text(serde_json::to_string(email)?).mime_str("application/json")?;
        let mut form = Form::new().part("emailData", email_data);
        for attachment in attachments.iter() {
            form = form.part("attachments", file_part(attachment)?);
        }
        let request = self
            .authed_post("admin/send-bulk-email", "send emails")?
            .multipart(form);
        tracing::info!(
            attachments = attachments.len(),
            "sending bulk email"
        );
        fetch_message(request).await
    }

    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, ApiError> {
        let request = self
            .authed_get("admin/leaderboard", "access leaderboard")?
            .query(&[("limit", limit)]);
        fetch_list(request).await
    }

    // ---- activity logs ----

    pub async fn activity_logs(&self, page: u32, size: u32) -> Result<Page<ActivityLog>, ApiError> {
        let request = self
            .authed_get("activity-logs", "access activity logs")?
            .query(&[("page", page), ("size", size)]);
        fetch_json(request).await
    }

    pub async fn activity_logs_by_user(
        &self,
        email: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ActivityLog>, ApiError> {
        let url = self.url_with_segment("activity-logs/user", email)?;
        let request = self
            .authed_at(reqwest::Method::GET, url, "access activity logs")?
            .query(&[("page", page), ("size", size)]);
        fetch_json(request).await
    }

    pub async fn activity_logs_by_category(
        &self,
        category: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ActivityLog>, ApiError> {
        let url = self.url_with_segment("activity-logs/category", category)?;
        let request = self
            .authed_at(reqwest::Method::GET, url, "access activity logs")?
            .query(&[("page", page), ("size", size)]);
        fetch_json(request).await
    }

    pub async fn search_activity_logs(
        &self,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<ActivityLog>, ApiError> {
        let request = self
            .authed_get("activity-logs/search", "search activity logs")?
            .query(&[("query", query)])
            .query(&[("page", page), ("size", size)]);
        fetch_json(request).await
    }

    /// Free-form statistics object; shape is owned by the server.
    pub async fn activity_statistics(&self, days: u32) -> Result<serde_json::Value, ApiError> {
        let request = self
            .authed_get("activity-logs/statistics", "access activity statistics")?
            .query(&[("days", days)]);
        fetch_json(request).await
    }

    pub async fn recent_activity_count(&self, hours: u32) -> Result<serde_json::Value, ApiError> {
        let request = self
            .authed_get("activity-logs/recent-count", "access activity logs")?
            .query(&[("hours", hours)]);
        fetch_json(request).await
    }

    pub async fn most_active_users(&self, limit: u32) -> Result<serde_json::Value, ApiError> {
        let request = self
            .authed_get("activity-logs/most-active-users", "access activity logs")?
            .query(&[("limit", limit)]);
        fetch_json(request).await
    }

    /// One page of the activity log, narrowed by `filter`.
    pub async fn activity_page(
        &self,
        filter: &ActivityFilter,
        page: u32,
        size: u32,
    ) -> Result<Page<ActivityLog>, ApiError> {
        match filter {
            ActivityFilter::All => self.activity_logs(page, size).await,
            ActivityFilter::Search(query) => self.search_activity_logs(query, page, size).await,
            ActivityFilter::Category(category) => {
                self.activity_logs_by_category(category, page, size).await
            }
            ActivityFilter::User(email) => self.activity_logs_by_user(email, page, size).await,
        }
    }

    /// Summary numbers for the activity tab. Each source is optional; one
    /// that fails is logged and left out.
    pub async fn activity_digest(
        &self,
        days: u32,
        hours: u32,
        top: u32,
    ) -> Result<ActivityDigest, ApiError> {
        self.bearer("access activity statistics")?;
        let statistics = self.activity_statistics(days).await;
        let recent = self.recent_activity_count(hours).await;
        let most_active = self.most_active_users(top).await;
        let value = |result: Result<serde_json::Value, ApiError>, what: &str| {
            result.unwrap_or_else(|e| {
                tracing::warn!("could not load {what}: {e}");
                serde_json::Value::Null
            })
        };
        Ok(ActivityDigest::from_values(
            &value(statistics, "activity statistics"),
            &value(recent, "recent activity count"),
            &value(most_active, "most active users"),
        ))
    }

    pub async fn clear_activity_logs(&self) -> Result<MessageResponse, ApiError> {
        let request = self.authed_delete("activity-logs/clear-all", "clear activity logs")?;
        fetch_message(request).await
    }
}

impl ProfileSource for ApiClient {
    async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.profile().await
    }
}

impl AccessSource for ApiClient {
    async fn check_access(&self, project_id: i64) -> Result<AccessState, ApiError> {
        self.download_access(project_id).await
    }

    async fn request_access(&self, project_id: i64, message: &str) -> Result<(), ApiError> {
        self.request_contribution(project_id, message).await.map(|_| ())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http(config: &ClientConfig) -> reqwest::Client {
    let builder = reqwest::Client::builder();
    let builder = if config.api.timeout_secs > 0 {
        builder.timeout(std::time::Duration::from_secs(config.api.timeout_secs))
    } else {
        builder
    };
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("falling back to default HTTP client: {e}");
        reqwest::Client::new()
    })
}

#[cfg(target_arch = "wasm32")]
fn build_http(_config: &ClientConfig) -> reqwest::Client {
    reqwest::Client::new()
}

fn file_part(file: &Attachment) -> Result<Part, ApiError> {
    Ok(Part::bytes(file.bytes.clone())
        .file_name(file.name.clone())
        .mime_str(&file.mime)?)
}

/// Success body plus whether it was JSON, or the server's error.
async fn read_body(response: Response) -> Result<(bool, String), ApiError> {
    let status = response.status();
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    let body = response.text().await?;

    if status.is_success() {
        Ok((is_json, body))
    } else {
        let message = error_message_from_body(is_json, &body);
        tracing::debug!(status = status.as_u16(), %message, "request failed");
        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let (_, body) = read_body(request.send().await?).await?;
    Ok(serde_json::from_str(&body)?)
}

async fn fetch_list<T: DeserializeOwned>(request: RequestBuilder) -> Result<Vec<T>, ApiError> {
    let list: ListResponse<T> = fetch_json(request).await?;
    Ok(list.into_vec())
}

async fn fetch_message(request: RequestBuilder) -> Result<MessageResponse, ApiError> {
    let (is_json, body) = read_body(request.send().await?).await?;
    message_from_body(is_json, &body)
}

/// Interpret a 2xx body as an acknowledgement.
fn message_from_body(is_json: bool, body: &str) -> Result<MessageResponse, ApiError> {
    if is_json && !body.trim().is_empty() {
        return Ok(serde_json::from_str(body)?);
    }
    Ok(MessageResponse {
        message: Some(body.trim().to_string()).filter(|m| !m.is_empty()),
        success: Some(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ClientConfig::default().with_base_url("http://api.test/api/"))
    }

    #[test]
    fn test_urls_are_joined_without_double_slashes() {
        let client = client();
        assert_eq!(client.base_url(), "http://api.test/api");
        assert_eq!(client.url("/projects/7"), "http://api.test/api/projects/7");
        assert_eq!(client.url("auth/login"), "http://api.test/api/auth/login");
    }

    #[test]
    fn test_missing_token_fails_fast_with_action() {
        let client = client().with_token(Some("   ".into()));
        assert!(!client.has_token());
        let err = client.authed_post("projects/upload", "upload projects").unwrap_err();
        assert!(err.is_auth_failure());
        assert_eq!(err.user_message(), "Please login to upload projects");
    }

    #[test]
    fn test_token_is_attached() {
        let client = client().with_token(Some("abc".into()));
        let request = client
            .authed_get("users/profile", "view your profile")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get("authorization").unwrap(),
            "Bearer abc"
        );
    }

    #[tokio::test]
    async fn test_access_without_token_skips_network() {
        let state = client().download_access(3).await.unwrap();
        assert_eq!(state, AccessState::NotLoggedIn);
    }

    #[tokio::test]
    async fn test_upload_without_token_never_sends() {
        let err = client()
            .upload_project(&NewProject::default(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[test]
    fn test_plain_text_success_becomes_message() {
        let message = message_from_body(false, "Request approved").unwrap();
        assert_eq!(message.message.as_deref(), Some("Request approved"));
        assert_eq!(message.success, Some(true));

        let json = message_from_body(true, r#"{"message":"ok","success":false}"#).unwrap();
        assert_eq!(json.success, Some(false));

        let empty = message_from_body(true, "").unwrap();
        assert_eq!(empty.message, None);
    }

    #[test]
    fn test_search_query_string() {
        let query = ProjectQuery {
            search: "chat".into(),
            tech: "React".into(),
            ..Default::default()
        };
        let request = client()
            .get("projects/search")
            .query(&query.search_params())
            .build()
            .unwrap();
        assert_eq!(request.url().query(), Some("search=chat&techStack=React"));
    }

    #[test]
    fn test_password_change_body() {
        let change = PasswordChange {
            current_password: "old".into(),
            new_password: "New#1234".into(),
        };
        assert_eq!(
            serde_json::to_value(&change).unwrap(),
            json!({"currentPassword": "old", "newPassword": "New#1234"})
        );
    }

    #[test]
    fn test_user_supplied_segments_are_encoded() {
        let client = client();
        assert_eq!(
            client
                .url_with_segment("activity-logs/user", "a+b@x.com")
                .unwrap()
                .as_str(),
            "http://api.test/api/activity-logs/user/a+b@x.com"
        );
        assert_eq!(
            client
                .url_with_segment("activity-logs/user", "x/y?z#w@x.com")
                .unwrap()
                .as_str(),
            "http://api.test/api/activity-logs/user/x%2Fy%3Fz%23w@x.com"
        );
    }

    #[test]
    fn test_bad_base_url_is_reported() {
        let client = ApiClient::new(&ClientConfig::default().with_base_url("not a url"));
        assert!(matches!(
            client.url_with_segment("activity-logs/user", "a@x.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_activity_filter_without_token_fails_fast() {
        let err = client()
            .activity_page(&ActivityFilter::User("a@x.com".into()), 0, 20)
            .await
            .unwrap_err();
        assert!(err.is_auth_failure());
        assert!(client().activity_digest(7, 24, 5).await.unwrap_err().is_auth_failure());
    }

    #[tokio::test]
    async fn test_truncated_body_is_a_network_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 2048];
            let _ = socket.read(&mut request).await;
            // Promise more bytes than are sent, then hang up
            socket
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"id\":",
                )
                .await
                .unwrap();
        });

        let client =
            ApiClient::new(&ClientConfig::default().with_base_url(format!("http://{addr}/api")));
        let err = client.project(1).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
    }
}
