use dioxus::prelude::*;
use ui::{use_session, use_toast};

use crate::Route;

#[component]
pub fn ForgotPassword() -> Element {
    let session = use_session();
    let toast = use_toast();

    let mut email = use_signal(String::new);
    let mut sent = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let client = session.client();
        spawn(async move {
            let address = email().trim().to_string();
            if address.is_empty() {
                toast.error("Please enter your email address.");
                return;
            }
            loading.set(true);
            match client.forgot_password(&address).await {
                Ok(response) => {
                    sent.set(true);
                    toast.success(
                        response
                            .message
                            .unwrap_or_else(|| "Password reset link sent to your email.".to_string()),
                    );
                }
                Err(e) => {
                    tracing::warn!("forgot-password failed: {e}");
                    toast.error(e.user_message());
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
                h3 { "Forgot Password" }
                if sent() {
                    p {
                        "If an account exists for "
                        strong { "{email}" }
                        ", a reset link is on its way. Check your inbox."
                    }
                } else {
                    p { class: "muted", "Enter your email and we'll send you a reset link." }
                    form {
                        class: "form",
                        onsubmit: handle_submit,
                        label { r#for: "forgot-email", "Email" }
                        input {
                            id: "forgot-email",
                            r#type: "email",
                            value: email(),
                            oninput: move |evt: FormEvent| email.set(evt.value()),
                        }
                        button {
                            class: "btn btn--primary btn--block",
                            r#type: "submit",
                            disabled: loading(),
                            if loading() { "Sending..." } else { "Send Reset Link" }
                        }
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
