//! Student registration with official college details.

use api::browse::COURSES;
use api::models::Registration;
use api::validation::is_college_email;
use dioxus::prelude::*;
use ui::icons::FaGraduationCap;
use ui::{use_session, use_toast, Icon, PasswordStrength};

use crate::Route;

pub(crate) const SEMESTERS: [&str; 6] = ["1st", "2nd", "3rd", "4th", "5th", "6th"];
pub(crate) const MIN_SIGNUP_PASSWORD_LEN: usize = 6;

/// First problem with a registration form, if any.
fn registration_error(form: &Registration, confirm: &str) -> Option<&'static str> {
    if form.full_name.trim().is_empty() {
        return Some("Full name is required.");
    }
    if !is_college_email(&form.email) {
        return Some("Only official MIT VPU student email IDs are allowed.");
    }
    if form.roll_number.trim().is_empty() {
        return Some("Roll number is required.");
    }
    if form.course.is_empty() {
        return Some("Please select your course.");
    }
    if form.semester.is_empty() {
        return Some("Please select your semester.");
    }
    if form.password.chars().count() < MIN_SIGNUP_PASSWORD_LEN {
        return Some("Password must be at least 6 characters.");
    }
    if form.password != confirm {
        return Some("Passwords do not match.");
    }
    None
}

#[component]
pub fn Register() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let mut full_name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut roll_number = use_signal(String::new);
    let mut course = use_signal(String::new);
    let mut semester = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut loading = use_signal(|| false);

    let handle_register = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        spawn(async move {
            error.set(None);

            let form = Registration {
                full_name: full_name().trim().to_string(),
                email: email().trim().to_string(),
                roll_number: roll_number().trim().to_string(),
                course: course(),
                semester: semester(),
                password: password(),
            };
            if let Some(problem) = registration_error(&form, &confirm_password()) {
                error.set(Some(problem.to_string()));
                return;
            }

            loading.set(true);
            match session.client().register(&form).await {
                Ok(response) => {
                    let token = response.token.as_deref().filter(|t| !t.is_empty());
                    match token {
                        Some(token) => {
                            if let Err(e) = session.sign_in(token, response.stored_user().as_ref()) {
                                tracing::error!("could not persist session: {e}");
                            }
                            toast.success("Registration successful! Welcome to StudentHub.");
                            nav.push(Route::Projects {});
                        }
                        None => {
                            toast.success("Registration successful! Please login.");
                            nav.push(Route::Login {});
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("registration failed: {e}");
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
                class: "auth-card auth-card--wide",
                div {
                    class: "auth-card__brand",
                    Icon { icon: FaGraduationCap, width: 22, height: 22 }
                    h1 { "StudentHub" }
                }
                h3 { "Registration" }
                p { class: "muted", "Register using your official college details" }

                if let Some(err) = error() {
                    div { class: "form-error", "{err}" }
                }

                form {
                    class: "form",
                    onsubmit: handle_register,

                    label { r#for: "reg-name", "Full Name" }
                    input {
                        id: "reg-name",
                        r#type: "text",
                        placeholder: "Enter your full name",
                        value: full_name(),
                        oninput: move |evt: FormEvent| full_name.set(evt.value()),
                    }

                    label { r#for: "reg-email", "College Email" }
                    input {
                        id: "reg-email",
                        r#type: "email",
                        placeholder: "SCFPxxxxxx@mitvpu.ac.in",
                        value: email(),
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }

                    label { r#for: "reg-roll", "Roll Number" }
                    input {
                        id: "reg-roll",
                        r#type: "text",
                        value: roll_number(),
                        oninput: move |evt: FormEvent| roll_number.set(evt.value()),
                    }

                    div {
                        class: "form__row",
                        div {
                            label { r#for: "reg-course", "Course" }
                            select {
                                id: "reg-course",
                                value: course(),
                                onchange: move |evt: FormEvent| course.set(evt.value()),
                                option { value: "", "Select course" }
                                for c in COURSES {
                                    option { key: "{c}", value: "{c}", "{c}" }
                                }
                            }
                        }
                        div {
                            label { r#for: "reg-semester", "Semester" }
                            select {
                                id: "reg-semester",
                                value: semester(),
                                onchange: move |evt: FormEvent| semester.set(evt.value()),
                                option { value: "", "Select semester" }
                                for s in SEMESTERS {
                                    option { key: "{s}", value: "{s}", "{s}" }
                                }
                            }
                        }
                    }

                    label { r#for: "reg-password", "Password" }
                    input {
                        id: "reg-password",
                        r#type: "password",
                        value: password(),
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                    PasswordStrength { password: password() }

                    label { r#for: "reg-confirm", "Confirm Password" }
                    input {
                        id: "reg-confirm",
                        r#type: "password",
                        value: confirm_password(),
                        oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                    }

                    button {
                        class: "btn btn--primary btn--block",
                        r#type: "submit",
                        disabled: loading(),
                        if loading() { "Creating account..." } else { "Register" }
                    }
                }

                p {
                    class: "auth-card__footer",
                    "Already have an account? "
                    Link { to: Route::Login {}, "Login" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> Registration {
        Registration {
            full_name: "Asha Patil".to_string(),
            email: "SCFP12345@mitvpu.ac.in".to_string(),
            roll_number: "42".to_string(),
            course: "MCA".to_string(),
            semester: "2nd".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_valid_registration_passes() {
        assert_eq!(registration_error(&valid_form(), "secret1"), None);
    }

    #[test]
    fn test_registration_checks_in_order() {
        let mut form = valid_form();
        form.email = "asha@gmail.com".to_string();
        form.roll_number.clear();
        assert_eq!(
            registration_error(&form, "secret1"),
            Some("Only official MIT VPU student email IDs are allowed.")
        );
    }

    #[test]
    fn test_short_and_mismatched_passwords() {
        let mut form = valid_form();
        form.password = "abc".to_string();
        assert_eq!(
            registration_error(&form, "abc"),
            Some("Password must be at least 6 characters.")
        );
        assert_eq!(
            registration_error(&valid_form(), "other1"),
            Some("Passwords do not match.")
        );
    }
}
