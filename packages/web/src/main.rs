use dioxus::logger::tracing::Level;
use dioxus::prelude::*;

use ui::{Navbar, SessionProvider, ToastHost};
use views::{
    About, AdminDashboard, AdminRegister, BulkEmail, ForgotPassword, Home, Login, NotFound,
    Profile, ProjectDetails, Projects, Register, ResetPassword, UploadProject,
};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(AppLayout)]
        #[route("/")]
        Home {},
        #[route("/about")]
        About {},
        #[route("/login")]
        Login {},
        #[route("/register")]
        Register {},
        #[route("/admin-register")]
        AdminRegister {},
        #[route("/forgot-password")]
        ForgotPassword {},
        #[route("/reset-password?:token")]
        ResetPassword { token: String },
        #[route("/projects")]
        Projects {},
        #[route("/projects/:id")]
        ProjectDetails { id: i64 },
        #[route("/upload-project")]
        UploadProject {},
        #[route("/profile")]
        Profile {},
        #[route("/admin")]
        AdminDashboard {},
    #[end_layout]
    #[route("/admin/bulk-email")]
    BulkEmail {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    if let Err(e) = dioxus::logger::init(Level::INFO) {
        eprintln!("logger not initialised: {e}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Title { "StudentHub" }

        SessionProvider {
            ToastHost {
                Router::<Route> {}
            }
        }
    }
}

/// Navbar, page, footer. The bulk email page renders outside this layout.
#[component]
fn AppLayout() -> Element {
    let session = ui::use_session();
    let is_admin = session.snapshot().is_admin();
    let nav = use_navigator();

    rsx! {
        Navbar {
            onlogout: move |_| {
                nav.push(Route::Home {});
            },
            Link { to: Route::Home {}, class: "navbar__link", "Home" }
            Link { to: Route::Projects {}, class: "navbar__link", "Projects" }
            Link { to: Route::About {}, class: "navbar__link", "About" }
            if is_admin {
                Link { to: Route::AdminDashboard {}, class: "navbar__link", "Dashboard" }
                Link { to: Route::BulkEmail {}, class: "navbar__link", "Bulk Email" }
            }
        }
        main {
            class: "page",
            Outlet::<Route> {}
        }
        footer {
            class: "footer",
            p { "StudentHub: share, discover and collaborate on student projects." }
        }
    }
}
