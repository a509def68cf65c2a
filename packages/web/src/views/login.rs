//! Login with college email and password.

use api::models::Credentials;
use api::validation::is_college_email;
use dioxus::prelude::*;
use ui::icons::{FaEye, FaEyeSlash, FaGraduationCap};
use ui::{use_session, use_toast, Icon};

use crate::Route;

#[component]
pub fn Login() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut show_password = use_signal(|| false);
    let mut as_admin = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_login = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        spawn(async move {
            error.set(None);

            let e = email().trim().to_string();
            let p = password();

            if e.is_empty() || p.is_empty() {
                error.set(Some("Please enter both email and password.".to_string()));
                return;
            }
            // Admin accounts are not issued college addresses
            if !as_admin() && !is_college_email(&e) {
                error.set(Some(
                    "Only official MIT VPU student email IDs are allowed.".to_string(),
                ));
                return;
            }

            loading.set(true);
            let credentials = Credentials { email: e, password: p };
            match session.client().login(&credentials).await {
                Ok(response) => {
                    let Some(token) = response.token.as_deref().filter(|t| !t.is_empty()) else {
                        loading.set(false);
                        error.set(Some(
                            response
                                .message
                                .clone()
                                .unwrap_or_else(|| "Login failed. Please try again.".to_string()),
                        ));
                        return;
                    };
                    let user = response.stored_user();
                    if let Err(e) = session.sign_in(token, user.as_ref()) {
                        tracing::error!("could not persist session: {e}");
                        loading.set(false);
                        error.set(Some("Could not save your session.".to_string()));
                        return;
                    }
                    tracing::info!("logged in");
                    toast.success("Login successful!");

                    let is_admin = user
                        .and_then(|u| u.role)
                        .or(response.role)
                        .is_some_and(|role| role.is_admin());
                    if is_admin {
                        nav.push(Route::AdminDashboard {});
                    } else {
                        nav.push(Route::Projects {});
                    }
                }
                Err(e) => {
                    tracing::warn!("login failed: {e}");
                    loading.set(false);
                    error.set(Some(e.user_message()));
                }
            }
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                div {
                    class: "auth-card__brand",
                    Icon { icon: FaGraduationCap, width: 22, height: 22 }
                    h1 { "StudentHub" }
                }
                h3 { "Login" }
                p { class: "muted", "Login using your official college email" }

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                form {
                    class: "form",
                    onsubmit: handle_login,

                    label { r#for: "login-email", "College Email" }
                    input {
                        id: "login-email",
                        r#type: "email",
                        placeholder: if as_admin() { "admin@example.com" } else { "SCFPxxxxxx@mitvpu.ac.in" },
                        value: email(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }

                    label { r#for: "login-password", "Password" }
                    div {
                        class: "input-with-toggle",
                        input {
                            id: "login-password",
                            r#type: if show_password() { "text" } else { "password" },
                            placeholder: "Enter your password",
                            value: password(),
                            oninput: move |evt: FormEvent| password.set(evt.value()),
                        }
                        button {
                            r#type: "button",
                            class: "input-with-toggle__button",
                            onclick: move |_| show_password.toggle(),
                            if show_password() {
                                Icon { icon: FaEyeSlash, width: 14, height: 14 }
                            } else {
                                Icon { icon: FaEye, width: 14, height: 14 }
                            }
                        }
                    }

                    label {
                        class: "checkbox",
                        input {
                            r#type: "checkbox",
                            checked: as_admin(),
                            onchange: move |evt: FormEvent| as_admin.set(evt.checked()),
                        }
                        " I am an administrator"
                    }

                    div {
                        class: "form__actions",
                        Link { to: Route::ForgotPassword {}, "Forgot Password?" }
                    }

                    button {
                        class: "btn btn--primary btn--block",
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Logging in..." } else { "Login" }
                    }
                }

                p {
                    class: "auth-card__footer",
                    "Don't have an account? "
                    Link { to: Route::Register {}, "Register" }
                }
            }
        }
    }
}
