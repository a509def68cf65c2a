//! Upload form. Blocked for suspended or inactive accounts; the server keeps
//! new projects pending until an admin approves them.

use api::attachments::{format_file_size, Attachment, AttachmentError, MAX_ATTACHMENT_BYTES};
use api::browse::COURSES;
use api::models::NewProject;
use dioxus::prelude::*;
use ui::icons::{FaArrowLeft, FaBan, FaXmark};
use ui::{use_session, use_toast, Icon};

use super::register::SEMESTERS;
use super::{report_error, use_login_required};
use crate::Route;

/// Screenshots must be images even though the shared allow-list takes PDFs.
fn check_screenshot(shot: &Attachment) -> Result<(), String> {
    shot.validate().map_err(|e| e.to_string())?;
    if !shot.mime.starts_with("image/") {
        return Err(AttachmentError::UnsupportedType(shot.name.clone()).to_string());
    }
    Ok(())
}

#[component]
pub fn UploadProject() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let logged_in = use_login_required("Please login to upload projects");
    let block_reason = session.snapshot().user_status.upload_block_reason();

    let mut form = use_signal(NewProject::default);
    let mut screenshots = use_signal(Vec::<Attachment>::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut uploading = use_signal(|| false);

    let on_files = move |evt: FormEvent| async move {
        for file in evt.files() {
            let name = file.name();
            if file.size() > MAX_ATTACHMENT_BYTES {
                toast.error(AttachmentError::TooLarge(name).to_string());
                continue;
            }
            let bytes = match file.read_bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(e) => {
                    tracing::warn!("could not read {name}: {e}");
                    toast.error(format!("Could not read {name}"));
                    continue;
                }
            };
            let shot = Attachment::new(name, file.content_type(), bytes);
            match check_screenshot(&shot) {
                Ok(()) => screenshots.write().push(shot),
                Err(message) => toast.error(message),
            }
        }
    };

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let client = session.client();
        spawn(async move {
            error.set(None);
            if let Some(reason) = block_reason {
                toast.error(reason);
                return;
            }
            let project = form();
            if let Some(missing) = project.missing_field() {
                error.set(Some(missing.to_string()));
                return;
            }

            uploading.set(true);
            match client.upload_project(&project, &screenshots()).await {
                Ok(response) => {
                    tracing::info!(name = %project.project_name, "project uploaded");
                    toast.success(response.message.unwrap_or_else(|| {
                        "Project uploaded successfully! It will be visible after admin approval."
                            .to_string()
                    }));
                    nav.push(Route::Projects {});
                }
                Err(e) => report_error(toast, nav, "upload failed", &e),
            }
            uploading.set(false);
        });
    };

    if !logged_in {
        return rsx! {};
    }

    if let Some(reason) = block_reason {
        return rsx! {
            div {
                class: "empty-state",
                Icon { icon: FaBan, width: 28, height: 28 }
                h3 { "Upload unavailable" }
                p { "{reason}" }
                Link { to: Route::Projects {}, class: "btn btn--outline", "Back to projects" }
            }
        };
    }

    let current = form();
    let staged: Vec<(String, String)> = screenshots()
        .iter()
        .map(|shot| (shot.name.clone(), format_file_size(shot.size())))
        .collect();

    rsx! {
        div {
            class: "upload",
            Link {
                to: Route::Projects {},
                class: "back-link",
                Icon { icon: FaArrowLeft, width: 12, height: 12 }
                " Back to projects"
            }
            h1 { "Upload Project" }
            p { class: "muted", "Share your project with the StudentHub community." }

            if let Some(err) = error() {
                div { class: "form-error", "{err}" }
            }

            form {
                class: "form",
                onsubmit: handle_submit,

                label { r#for: "up-name", "Project Name *" }
                input {
                    id: "up-name",
                    value: "{current.project_name}",
                    oninput: move |evt: FormEvent| form.write().project_name = evt.value(),
                }

                label { r#for: "up-leader", "Team Leader Name *" }
                input {
                    id: "up-leader",
                    value: "{current.team_leader_name}",
                    oninput: move |evt: FormEvent| form.write().team_leader_name = evt.value(),
                }

                div {
                    class: "form__row",
                    div {
                        label { r#for: "up-course", "Course *" }
                        select {
                            id: "up-course",
                            value: "{current.course}",
                            onchange: move |evt: FormEvent| form.write().course = evt.value(),
                            option { value: "", "Select course" }
                            for c in COURSES {
                                option { key: "{c}", value: "{c}", "{c}" }
                            }
                        }
                    }
                    div {
                        label { r#for: "up-semester", "Semester *" }
                        select {
                            id: "up-semester",
                            value: "{current.semester}",
                            onchange: move |evt: FormEvent| form.write().semester = evt.value(),
                            option { value: "", "Select semester" }
                            for s in SEMESTERS {
                                option { key: "{s}", value: "{s}", "{s} Semester" }
                            }
                        }
                    }
                }

                label { r#for: "up-tech", "Tech Stack * (comma separated)" }
                input {
                    id: "up-tech",
                    placeholder: "React, Node.js, MongoDB",
                    value: "{current.tech_stack}",
                    oninput: move |evt: FormEvent| form.write().tech_stack = evt.value(),
                }

                label { r#for: "up-description", "Description" }
                textarea {
                    id: "up-description",
                    rows: "5",
                    value: "{current.description}",
                    oninput: move |evt: FormEvent| form.write().description = evt.value(),
                }

                label { r#for: "up-live", "Live Demo Link" }
                input {
                    id: "up-live",
                    r#type: "url",
                    value: "{current.live_link}",
                    oninput: move |evt: FormEvent| form.write().live_link = evt.value(),
                }

                label { r#for: "up-code", "Code Repository Link *" }
                input {
                    id: "up-code",
                    r#type: "url",
                    placeholder: "https://github.com/...",
                    value: "{current.code_link}",
                    oninput: move |evt: FormEvent| form.write().code_link = evt.value(),
                }

                label { r#for: "up-shots", "Screenshots (JPG, PNG, GIF, max 5MB each)" }
                input {
                    id: "up-shots",
                    r#type: "file",
                    multiple: true,
                    accept: ".jpg,.jpeg,.png,.gif",
                    onchange: on_files,
                }
                if !staged.is_empty() {
                    ul {
                        class: "attachment-list",
                        for (index, (name, size)) in staged.into_iter().enumerate() {
                            li {
                                key: "{index}-{name}",
                                span { "{name}" }
                                span { class: "muted", " ({size})" }
                                button {
                                    r#type: "button",
                                    class: "chip__remove",
                                    onclick: move |_| {
                                        if index < screenshots.read().len() {
                                            screenshots.write().remove(index);
                                        }
                                    },
                                    Icon { icon: FaXmark, width: 10, height: 10 }
                                }
                            }
                        }
                    }
                }

                div {
                    class: "form__actions",
                    Link { to: Route::Projects {}, class: "btn btn--ghost", "Cancel" }
                    button {
                        class: "btn btn--primary",
                        r#type: "submit",
                        disabled: uploading(),
                        if uploading() { "Uploading..." } else { "Upload Project" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenshots_must_be_images() {
        let png = Attachment::new("shot.png", None, vec![0; 10]);
        assert!(check_screenshot(&png).is_ok());

        let pdf = Attachment::new("report.pdf", None, vec![0; 10]);
        assert_eq!(
            check_screenshot(&pdf),
            Err("report.pdf is not a valid file type".to_string())
        );
    }

    #[test]
    fn test_oversized_screenshot_rejected() {
        let big = Attachment::new("big.png", None, vec![0; (MAX_ATTACHMENT_BYTES + 1) as usize]);
        assert_eq!(
            check_screenshot(&big),
            Err("big.png exceeds 5MB limit".to_string())
        );
    }
}
