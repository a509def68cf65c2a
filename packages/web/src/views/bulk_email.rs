use dioxus::prelude::*;
use ui::icons::{FaArrowLeft, FaEnvelope};
use ui::{BulkEmailComposer, Icon};

use super::use_admin_guard;
use crate::Route;

/// Full-page composer, rendered without the site navbar.
#[component]
pub fn BulkEmail() -> Element {
    if !use_admin_guard() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "bulk-page",
            header {
                class: "bulk-page__header",
                Link {
                    to: Route::AdminDashboard {},
                    class: "back-link",
                    Icon { icon: FaArrowLeft, width: 12, height: 12 }
                    " Back to dashboard"
                }
                h1 {
                    Icon { icon: FaEnvelope, width: 20, height: 20 }
                    " Send Bulk Email"
                }
                p { class: "muted", "Write to registered students or any other address." }
            }
            BulkEmailComposer {}
        }
    }
}
