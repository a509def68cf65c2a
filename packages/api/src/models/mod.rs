//! Wire models for the StudentHub REST API.
//!
//! Field names follow the server's camelCase JSON. Most fields are optional or
//! defaulted because the server omits what it does not know, and the UI would
//! rather show a blank than fail a whole page.

mod admin;
mod common;
mod project;
mod user;

pub use admin::{
    new_password_problem, ActivityLog, AdminStats, BulkEmailRequest, LeaderboardEntry, Student,
    StudentUpdate, MIN_ADMIN_SET_PASSWORD_LEN,
};
pub use common::{ListResponse, MessageResponse, Page};
pub use project::{
    AccessResponse, ContributionRequest, LikeResponse, NewProject, Project, ProjectStatus,
    ProjectUpdate, RequestStatus,
};
pub use user::{
    AdminRegistration, AuthResponse, Credentials, PasswordChange, ProfileUpdate, Registration,
    UserProfile,
};
