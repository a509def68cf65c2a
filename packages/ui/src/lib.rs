//! Shared Dioxus components and hooks for StudentHub.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

mod session;
pub use session::{
    make_store, use_api, use_session, LogoutButton, PlatformStore, SessionContext,
    SessionProvider,
};

mod toast;
pub use toast::{use_toast, Toast, ToastHost, ToastKind, Toaster};

mod navbar;
pub use navbar::{Navbar, UploadLink};

mod project_card;
pub use project_card::{DownloadAccess, LikeButton, ProjectCard};

mod bulk_email;
pub use bulk_email::BulkEmailComposer;

mod password_strength;
pub use password_strength::PasswordStrength;
