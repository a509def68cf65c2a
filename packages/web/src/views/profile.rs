//! The logged-in user's profile: details, incoming access requests and
//! password change.

use api::models::{ContributionRequest, PasswordChange, ProfileUpdate, RequestStatus, UserProfile};
use api::validation::PasswordStrength as Strength;
use dioxus::prelude::*;
use ui::{use_session, use_toast, PasswordStrength};

use super::project_details::RequestRow;
use super::{report_error, use_login_required};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Details,
    Requests,
    Settings,
}

#[component]
pub fn Profile() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let logged_in = use_login_required("Please login to view your profile");
    let mut tab = use_signal(|| Tab::Details);

    let load_session = session.clone();
    let mut profile = use_resource(move || {
        let ctx = load_session.clone();
        async move {
            if !ctx.is_logged_in() {
                return None;
            }
            match ctx.client().profile().await {
                Ok(profile) => {
                    ctx.update_user(&profile.to_stored_user());
                    Some(profile)
                }
                Err(e) => {
                    report_error(toast, nav, "could not load profile", &e);
                    None
                }
            }
        }
    });

    if !logged_in {
        return rsx! {};
    }

    let snapshot = session.snapshot();
    let avatar = snapshot.initials();
    let role = snapshot.user_role.as_str();
    let loaded: Option<UserProfile> = profile.read().clone().flatten();

    rsx! {
        div {
            class: "profile",
            header {
                class: "profile__header",
                div { class: "avatar avatar--large", "{avatar}" }
                div {
                    h1 { "{snapshot.user_name}" }
                    span { class: "badge", "{role}" }
                }
            }

            nav {
                class: "tabs",
                TabButton { current: tab(), value: Tab::Details, onselect: move |t| tab.set(t), "Profile" }
                TabButton { current: tab(), value: Tab::Requests, onselect: move |t| tab.set(t), "Access Requests" }
                TabButton { current: tab(), value: Tab::Settings, onselect: move |t| tab.set(t), "Settings" }
            }

            match tab() {
                Tab::Details => match loaded {
                    None => rsx! { p { class: "muted", "Loading profile..." } },
                    Some(loaded) => rsx! {
                        ProfileDetails {
                            profile: loaded,
                            onsaved: move |_| profile.restart(),
                        }
                    },
                },
                Tab::Requests => rsx! { PendingRequests {} },
                Tab::Settings => rsx! { ChangePassword {} },
            }
        }
    }
}

#[component]
fn TabButton(current: Tab, value: Tab, onselect: EventHandler<Tab>, children: Element) -> Element {
    rsx! {
        button {
            class: if current == value { "tabs__button tabs__button--active" } else { "tabs__button" },
            onclick: move |_| onselect.call(value),
            {children}
        }
    }
}

#[component]
fn ProfileDetails(profile: UserProfile, onsaved: EventHandler<()>) -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let mut editing = use_signal(|| false);
    let mut saving = use_signal(|| false);
    let mut full_name = use_signal(|| profile.full_name.clone().unwrap_or_default());
    let mut course = use_signal(|| profile.course.clone().unwrap_or_default());
    let mut semester = use_signal(|| profile.semester.clone().unwrap_or_default());
    let mut roll_number = use_signal(|| profile.roll_number.clone().unwrap_or_default());

    let save = move |evt: FormEvent| {
        evt.prevent_default();
        let session = session.clone();
        spawn(async move {
            let name = full_name().trim().to_string();
            if name.is_empty() {
                toast.error("Full name is required.");
                return;
            }
            let update = ProfileUpdate {
                full_name: name,
                course: non_blank(course()),
                semester: non_blank(semester()),
                roll_number: non_blank(roll_number()),
            };
            saving.set(true);
            match session.client().update_profile(&update).await {
                Ok(_) => {
                    // The navbar follows the stored user
                    if let Ok(Some(mut stored)) = session.store().load_user() {
                        stored.full_name = Some(update.full_name.clone());
                        session.update_user(&stored);
                    }
                    toast.success("Profile updated successfully!");
                    editing.set(false);
                    onsaved.call(());
                }
                Err(e) => report_error(toast, nav, "profile update failed", &e),
            }
            saving.set(false);
        });
    };

    let email = profile.email.clone().unwrap_or_default();
    let status = profile.account_status.unwrap_or_default().as_str();
    let uploaded = profile.projects_uploaded.unwrap_or(0);
    let collaborated = profile.projects_collaborated.unwrap_or(0);

    if !editing() {
        return rsx! {
            dl {
                class: "profile__details",
                dt { "Full Name" } dd { "{full_name}" }
                dt { "Email" } dd { "{email}" }
                dt { "Roll Number" } dd { "{roll_number}" }
                dt { "Course" } dd { "{course}" }
                dt { "Semester" } dd { "{semester}" }
                dt { "Account Status" } dd { "{status}" }
                dt { "Projects Uploaded" } dd { "{uploaded}" }
                dt { "Projects Collaborated" } dd { "{collaborated}" }
            }
            button {
                class: "btn btn--outline",
                onclick: move |_| editing.set(true),
                "Edit Profile"
            }
        };
    }

    rsx! {
        form {
            class: "form",
            onsubmit: save,
            label { r#for: "pf-name", "Full Name" }
            input {
                id: "pf-name",
                value: full_name(),
                oninput: move |evt: FormEvent| full_name.set(evt.value()),
            }
            label { r#for: "pf-roll", "Roll Number" }
            input {
                id: "pf-roll",
                value: roll_number(),
                oninput: move |evt: FormEvent| roll_number.set(evt.value()),
            }
            label { r#for: "pf-course", "Course" }
            input {
                id: "pf-course",
                value: course(),
                oninput: move |evt: FormEvent| course.set(evt.value()),
            }
            label { r#for: "pf-semester", "Semester" }
            input {
                id: "pf-semester",
                value: semester(),
                oninput: move |evt: FormEvent| semester.set(evt.value()),
            }
            div {
                class: "form__actions",
                button {
                    r#type: "button",
                    class: "btn btn--ghost",
                    onclick: move |_| editing.set(false),
                    "Cancel"
                }
                button {
                    r#type: "submit",
                    class: "btn btn--primary",
                    disabled: saving(),
                    if saving() { "Saving..." } else { "Save Changes" }
                }
            }
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Requests from other students for the user's projects.
#[component]
fn PendingRequests() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let load_session = session.clone();
    let mut requests = use_resource(move || {
        let client = load_session.client();
        async move {
            match client.pending_requests().await {
                Ok(list) => list,
                Err(e) => {
                    report_error(toast, nav, "could not load pending requests", &e);
                    Vec::new()
                }
            }
        }
    });

    let decide = use_callback(move |(request_id, status): (i64, RequestStatus)| {
        let client = session.client();
        spawn(async move {
            let result = match status {
                RequestStatus::Approved => client.approve_request(request_id).await,
                _ => client.reject_request(request_id).await,
            };
            match result {
                Ok(_) => {
                    if status == RequestStatus::Approved {
                        toast.success("Request approved! The requester can now download the code.");
                    } else {
                        toast.success("Request rejected.");
                    }
                    requests.restart();
                }
                Err(e) => report_error(toast, nav, "request decision failed", &e),
            }
        });
    });

    let list: Vec<ContributionRequest> = requests.read().clone().unwrap_or_default();

    rsx! {
        if list.is_empty() {
            p { class: "muted", "No pending requests." }
        }
        ul {
            class: "request-list",
            for request in list {
                RequestRow { key: "{request.id}", request, ondecide: decide }
            }
        }
    }
}

#[component]
fn ChangePassword() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let mut current = use_signal(String::new);
    let mut new_password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut saving = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let client = session.client();
        spawn(async move {
            if current().is_empty() {
                toast.error("Please enter your current password.");
                return;
            }
            if !Strength::check(&new_password()).is_strong() {
                toast.error("Password does not meet all requirements.");
                return;
            }
            if new_password() != confirm() {
                toast.error("Passwords do not match.");
                return;
            }
            saving.set(true);
            let change = PasswordChange {
                current_password: current(),
                new_password: new_password(),
            };
            match client.change_password(&change).await {
                Ok(_) => {
                    toast.success("Password changed successfully!");
                    current.set(String::new());
                    new_password.set(String::new());
                    confirm.set(String::new());
                }
                Err(e) => report_error(toast, nav, "password change failed", &e),
            }
            saving.set(false);
        });
    };

    rsx! {
        form {
            class: "form",
            onsubmit: submit,
            h3 { "Change Password" }
            label { r#for: "cp-current", "Current Password" }
            input {
                id: "cp-current",
                r#type: "password",
                value: current(),
                oninput: move |evt: FormEvent| current.set(evt.value()),
            }
            label { r#for: "cp-new", "New Password" }
            input {
                id: "cp-new",
                r#type: "password",
                value: new_password(),
                oninput: move |evt: FormEvent| new_password.set(evt.value()),
            }
            PasswordStrength { password: new_password() }
            label { r#for: "cp-confirm", "Confirm New Password" }
            input {
                id: "cp-confirm",
                r#type: "password",
                value: confirm(),
                oninput: move |evt: FormEvent| confirm.set(evt.value()),
            }
            button {
                r#type: "submit",
                class: "btn btn--primary",
                disabled: saving(),
                if saving() { "Updating..." } else { "Update Password" }
            }
        }
    }
}
