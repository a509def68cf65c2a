use dioxus::prelude::*;

use crate::icons::{FaGraduationCap, FaUpload};
use crate::session::{use_session, LogoutButton};
use crate::toast::use_toast;
use crate::Icon;

/// Top navigation bar. `children` are the page links, chosen by the app from
/// the session role; the user area on the right is rendered here.
#[component]
pub fn Navbar(children: Element, #[props(default)] onlogout: EventHandler<()>) -> Element {
    let session = use_session();
    let snapshot = session.snapshot();
    let avatar = snapshot.initials();
    let toast = use_toast();

    rsx! {
        nav {
            class: "navbar",
            Link {
                to: "/",
                class: "navbar__brand",
                Icon { icon: FaGraduationCap, width: 20, height: 20 }
                span { "StudentHub" }
            }
            div {
                class: "navbar__links",
                {children}
            }
            div {
                class: "navbar__user",
                if snapshot.is_logged_in {
                    if !snapshot.user_role.is_admin() {
                        UploadLink {}
                    }
                    span {
                        class: "avatar",
                        title: "{snapshot.user_name}",
                        "{avatar}"
                    }
                    Link { to: "/profile", class: "navbar__name", "{snapshot.user_name}" }
                    if snapshot.user_role.is_admin() {
                        span { class: "badge badge--admin", "Admin" }
                    }
                    LogoutButton {
                        class: "btn btn--ghost",
                        onlogout: move |_| {
                            toast.success("Logged out successfully");
                            onlogout.call(());
                        },
                    }
                } else {
                    Link { to: "/login", class: "btn btn--ghost", "Login" }
                    Link { to: "/register", class: "btn btn--primary", "Register" }
                }
            }
        }
    }
}

/// Upload entry point. Suspended and inactive accounts get an explanation
/// instead of the form.
#[component]
pub fn UploadLink() -> Element {
    let status = use_session().snapshot().user_status;
    let toast = use_toast();

    match status.upload_block_reason() {
        None => rsx! {
            Link {
                to: "/upload",
                class: "btn btn--primary",
                Icon { icon: FaUpload, width: 14, height: 14 }
                span { "Upload" }
            }
        },
        Some(reason) => rsx! {
            button {
                class: "btn btn--primary btn--disabled",
                title: reason,
                onclick: move |_| toast.error(reason),
                Icon { icon: FaUpload, width: 14, height: 14 }
                span { "Upload" }
            }
        },
    }
}
