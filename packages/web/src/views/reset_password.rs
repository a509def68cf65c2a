use api::validation::PasswordStrength as Strength;
use dioxus::prelude::*;
use ui::{use_session, use_toast, PasswordStrength};

use crate::Route;

/// Landing page for the emailed reset link. The token is checked before the
/// form is shown.
#[component]
pub fn ResetPassword(token: String) -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let mut new_password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut loading = use_signal(|| false);

    let check_session = session.clone();
    let token_valid = use_resource(use_reactive((&token,), move |(token,)| {
        let client = check_session.client();
        async move {
            if token.trim().is_empty() {
                return false;
            }
            match client.validate_reset_token(&token).await {
                Ok(response) => response.success.unwrap_or(true),
                Err(e) => {
                    tracing::warn!("reset token rejected: {e}");
                    false
                }
            }
        }
    }));

    let submit_token = token.clone();
    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let client = session.client();
        let token = submit_token.clone();
        spawn(async move {
            let password = new_password();
            if !Strength::check(&password).is_strong() {
                toast.error("Password does not meet all requirements.");
                return;
            }
            if password != confirm_password() {
                toast.error("Passwords do not match.");
                return;
            }
            loading.set(true);
            match client.reset_password(&token, &password).await {
                Ok(_) => {
                    toast.success("Password reset successful! Please login.");
                    nav.push(Route::Login {});
                }
                Err(e) => {
                    tracing::warn!("password reset failed: {e}");
                    toast.error(e.user_message());
                }
            }
            loading.set(false);
        });
    };

    let body = match token_valid() {
        None => rsx! { p { class: "muted", "Checking your reset link..." } },
        Some(false) => rsx! {
            div {
                class: "form-error",
                "This reset link is invalid or has expired."
            }
            Link { to: Route::ForgotPassword {}, class: "btn btn--outline", "Request a new link" }
        },
        Some(true) => rsx! {
            form {
                class: "form",
                onsubmit: handle_submit,
                label { r#for: "reset-new", "New Password" }
                input {
                    id: "reset-new",
                    r#type: "password",
                    value: new_password(),
                    oninput: move |evt: FormEvent| new_password.set(evt.value()),
                }
                PasswordStrength { password: new_password() }
                label { r#for: "reset-confirm", "Confirm Password" }
                input {
                    id: "reset-confirm",
                    r#type: "password",
                    value: confirm_password(),
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }
                button {
                    class: "btn btn--primary btn--block",
                    r#type: "submit",
                    disabled: loading(),
                    if loading() { "Resetting..." } else { "Reset Password" }
                }
            }
        },
    };

    rsx! {
        div {
            class: "auth-page",
            div {
                class: "auth-card",
                h3 { "Reset Password" }
                {body}
            }
        }
    }
}
