use api::models::AdminRegistration;
use dioxus::prelude::*;
use ui::icons::FaUserShield;
use ui::{use_session, use_toast, Icon, PasswordStrength};

use super::register::MIN_SIGNUP_PASSWORD_LEN;
use crate::Route;

/// Administrator sign-up. Which addresses may register is the server's call.
#[component]
pub fn AdminRegister() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let mut full_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let client = session.client();
        spawn(async move {
            error.set(None);

            let form = AdminRegistration {
                full_name: full_name().trim().to_string(),
                email: email().trim().to_string(),
                password: password(),
            };
            if form.full_name.is_empty() {
                error.set(Some("Full name is required.".to_string()));
                return;
            }
            if !form.email.contains('@') {
                error.set(Some("Please enter a valid email address.".to_string()));
                return;
            }
            if form.password.chars().count() < MIN_SIGNUP_PASSWORD_LEN {
                error.set(Some("Password must be at least 6 characters.".to_string()));
                return;
            }
            if form.password != confirm_password() {
                error.set(Some("Passwords do not match.".to_string()));
                return;
            }

            loading.set(true);
            match client.register_admin(&form).await {
                Ok(_) => {
                    toast.success("Admin account created! Please login.");
                    nav.push(Route::Login {});
                }
                Err(e) => {
                    tracing::warn!("admin registration failed: {e}");
                    error.set(Some(e.user_message()));
                }
            }
            loading.set(false);
        });
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                div {
                    class: "auth-card__brand",
                    Icon { icon: FaUserShield, width: 22, height: 22 }
                    h1 { "Admin Registration" }
                }
                p { class: "muted", "Only authorized administrators can register here." }

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                form {
                    class: "form",
                    onsubmit: handle_register,

                    label { r#for: "admin-name", "Full Name" }
                    input {
                        id: "admin-name",
                        r#type: "text",
                        value: full_name(),
                        oninput: move |evt: FormEvent| full_name.set(evt.value()),
                    }

                    label { r#for: "admin-email", "Email" }
                    input {
                        id: "admin-email",
                        r#type: "email",
                        value: email(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }

                    label { r#for: "admin-password", "Password" }
                    input {
                        id: "admin-password",
                        r#type: "password",
                        value: password(),
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                    PasswordStrength { password: password() }

                    label { r#for: "admin-confirm", "Confirm Password" }
                    input {
                        id: "admin-confirm",
                        r#type: "password",
                        value: confirm_password(),
                        oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                    }

                    button {
                        class: "btn btn--primary btn--block",
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Registering..." } else { "Register as Admin" }
                    }
                }

                p {
                    class: "auth-card__footer",
                    Link { to: Route::Login {}, "Back to Login" }
                }
            }
        }
    }
}
