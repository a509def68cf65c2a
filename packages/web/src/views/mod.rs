use api::{AdminGate, ApiError};
use dioxus::prelude::*;
use dioxus::router::Navigator;
use ui::{use_session, use_toast, Toaster};

use crate::Route;

mod home;
pub use home::Home;

mod about;
pub use about::About;

mod login;
pub use login::Login;

mod register;
pub use register::Register;

mod admin_register;
pub use admin_register::AdminRegister;

mod forgot_password;
pub use forgot_password::ForgotPassword;

mod reset_password;
pub use reset_password::ResetPassword;

mod projects;
pub use projects::Projects;

mod project_details;
pub use project_details::ProjectDetails;

mod upload_project;
pub use upload_project::UploadProject;

mod profile;
pub use profile::Profile;

mod admin_dashboard;
pub use admin_dashboard::AdminDashboard;

mod bulk_email;
pub use bulk_email::BulkEmail;

/// Unknown paths go home.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let nav = use_navigator();
    tracing::debug!(path = segments.join("/"), "unknown route");
    nav.replace(Route::Home {});
    rsx! {}
}

/// Check the admin gate once per mount and redirect when it fails.
/// Returns whether the page may render.
pub(crate) fn use_admin_guard() -> bool {
    let gate = use_session().admin_gate();
    let toast = use_toast();
    let nav = use_navigator();

    use_effect(move || {
        if let Some(message) = gate.message() {
            toast.error(message);
        }
        match gate {
            AdminGate::Allowed => {}
            AdminGate::LoginRequired => {
                nav.replace(Route::Login {});
            }
            AdminGate::Denied => {
                nav.replace(Route::Home {});
            }
        }
    });

    gate == AdminGate::Allowed
}

/// Send anonymous visitors to the login page. Returns whether a token is
/// stored.
pub(crate) fn use_login_required(message: &'static str) -> bool {
    let logged_in = use_session().is_logged_in();
    let toast = use_toast();
    let nav = use_navigator();

    use_effect(move || {
        if !logged_in {
            toast.info(message);
            nav.replace(Route::Login {});
        }
    });

    logged_in
}

/// Toast a failed call; authentication failures also go to the login page.
pub(crate) fn report_error(toast: Toaster, nav: Navigator, context: &str, error: &ApiError) {
    tracing::warn!("{context}: {error}");
    toast.error(error.user_message());
    if error.is_auth_failure() {
        nav.push(Route::Login {});
    }
}
