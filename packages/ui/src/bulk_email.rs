//! Bulk email composer.
//!
//! Recipients come from two places: the registered-student roster (filter,
//! pick, select all) and free text typed into the "To" field. Both end up in
//! one [`RecipientList`]; sending splits them back into ids and ad-hoc
//! addresses.

use api::attachments::{Attachment, ACCEPT_ATTR, MAX_ATTACHMENT_BYTES};
use api::models::Student;
use api::recipients::{filter_roster, roster_courses, roster_semesters, suggest, AddOutcome};
use api::{AttachmentError, BulkEmailDraft};
use dioxus::prelude::*;

use crate::icons::{FaPaperPlane, FaPaperclip, FaUsers, FaXmark};
use crate::session::use_session;
use crate::toast::{use_toast, Toaster};
use crate::Icon;

const SUGGESTION_LIMIT: usize = 6;

#[component]
pub fn BulkEmailComposer() -> Element {
    let session = use_session();
    let toast = use_toast();

    let mut draft = use_signal(BulkEmailDraft::new);
    let mut to_input = use_signal(String::new);
    let mut filter_course = use_signal(String::new);
    let mut filter_semester = use_signal(String::new);
    let mut show_roster = use_signal(|| false);
    let mut sending = use_signal(|| false);

    let roster_session = session.clone();
    let roster = use_resource(move || {
        let client = roster_session.client();
        async move {
            match client.students(None).await {
                Ok(students) => students,
                Err(e) => {
                    tracing::warn!("could not load student roster: {e}");
                    toast.error(e.user_message());
                    Vec::new()
                }
            }
        }
    });
    let students: Vec<Student> = roster.read().clone().unwrap_or_default();

    let courses = roster_courses(&students);
    let semesters = roster_semesters(&students);
    let filtered: Vec<Student> = filter_roster(&students, &filter_course(), &filter_semester())
        .into_iter()
        .cloned()
        .collect();
    let filtered_refs: Vec<&Student> = filtered.iter().collect();
    let all_selected = !filtered.is_empty() && draft.read().recipients.contains_all(&filtered_refs);
    let suggestions: Vec<Student> = suggest(&students, &to_input(), &draft.read().recipients, SUGGESTION_LIMIT)
        .into_iter()
        .cloned()
        .collect();

    let report = move |outcomes: Vec<AddOutcome>| {
        for outcome in outcomes {
            match outcome {
                AddOutcome::Added => {}
                AddOutcome::Duplicate => toast.info("Recipient already added"),
                AddOutcome::Rejected => toast.error("Please enter a valid email address"),
            }
        }
    };

    // Enter commits the whole field
    let mut commit_input = move |raw: String| {
        let outcomes = draft.write().recipients.add_many(&raw);
        report(outcomes);
        to_input.set(String::new());
    };

    // A separator commits what precedes it; the tail stays in the field
    let mut commit_typed = move |raw: String| {
        let (outcomes, rest) = draft.write().recipients.add_typed(&raw);
        report(outcomes);
        to_input.set(rest);
    };

    let toggle_filtered = {
        let filtered = filtered.clone();
        move |_: MouseEvent| {
            let refs: Vec<&Student> = filtered.iter().collect();
            draft.write().recipients.toggle_all(&refs);
        }
    };

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
            let attachment = Attachment::new(name, file.content_type(), bytes);
            if let Err(e) = draft.write().attachments.stage(attachment) {
                toast.error(e.to_string());
            }
        }
    };

    let send_session = session.clone();
    let on_send = move |evt: FormEvent| {
        evt.prevent_default();
        let client = send_session.client();
        let roster = students_snapshot(&roster);
        async move {
            if sending() {
                return;
            }
            let request = match draft.read().to_request(&roster) {
                Ok(request) => request,
                Err(e) => {
                    toast.error(e.to_string());
                    return;
                }
            };
            sending.set(true);
            let attachments = draft.read().attachments.clone();
            match client.send_bulk_email(&request, &attachments).await {
                Ok(_) => {
                    toast.success(draft.read().sent_summary());
                    draft.write().clear();
                }
                Err(e) => report_send_error(toast, e),
            }
            sending.set(false);
        }
    };

    let current = draft.read().clone();
    let filtered_count = filtered.len();

    rsx! {
        form {
            class: "bulk-email",
            onsubmit: on_send,

            div {
                class: "bulk-email__field",
                label { r#for: "bulk-to", "To" }
                div {
                    class: "recipient-box",
                    for recipient in current.recipients.iter() {
                        RecipientChip {
                            key: "{recipient.email}",
                            draft,
                            email: recipient.email.clone(),
                            label: recipient.label(),
                        }
                    }
                    input {
                        id: "bulk-to",
                        class: "recipient-box__input",
                        r#type: "text",
                        placeholder: "Type a name or email, press Enter",
                        value: to_input(),
                        oninput: move |evt: FormEvent| {
                            commit_typed(evt.value());
                        },
                        onkeydown: move |evt: KeyboardEvent| {
                            if evt.key() == Key::Enter {
                                evt.prevent_default();
                                let raw = to_input();
                                if !raw.trim().is_empty() {
                                    commit_input(raw);
                                }
                            }
                        },
                    }
                    button {
                        r#type: "button",
                        class: "btn btn--ghost",
                        title: "Choose from registered students",
                        onclick: move |_| show_roster.toggle(),
                        Icon { icon: FaUsers, width: 14, height: 14 }
                    }
                }

                if !suggestions.is_empty() {
                    ul {
                        class: "suggestions",
                        for student in suggestions {
                            SuggestionItem {
                                key: "{student.id}",
                                draft,
                                to_input,
                                student,
                            }
                        }
                    }
                }
            }

            if show_roster() {
                div {
                    class: "roster",
                    div {
                        class: "roster__header",
                        span { "Select Students ({filtered_count})" }
                        button {
                            r#type: "button",
                            class: "btn btn--small",
                            onclick: toggle_filtered,
                            if all_selected { "Deselect All" } else { "Select All" }
                        }
                    }
                    div {
                        class: "roster__filters",
                        select {
                            value: filter_course(),
                            onchange: move |evt: FormEvent| filter_course.set(evt.value()),
                            option { value: "", "All Courses" }
                            for course in courses {
                                option { key: "{course}", value: "{course}", "{course}" }
                            }
                        }
                        select {
                            value: filter_semester(),
                            onchange: move |evt: FormEvent| filter_semester.set(evt.value()),
                            option { value: "", "All Semesters" }
                            for semester in semesters {
                                option { key: "{semester}", value: "{semester}", "Semester {semester}" }
                            }
                        }
                    }
                    ul {
                        class: "roster__list",
                        for student in filtered {
                            RosterRow {
                                key: "{student.id}",
                                draft,
                                selected: current.recipients.contains(&student.email),
                                student,
                            }
                        }
                    }
                }
            }

            div {
                class: "bulk-email__field",
                label { r#for: "bulk-subject", "Subject" }
                input {
                    id: "bulk-subject",
                    r#type: "text",
                    value: "{current.subject}",
                    oninput: move |evt: FormEvent| draft.write().subject = evt.value(),
                }
            }

            div {
                class: "bulk-email__field",
                label { r#for: "bulk-message", "Message" }
                textarea {
                    id: "bulk-message",
                    rows: "8",
                    value: "{current.message}",
                    oninput: move |evt: FormEvent| draft.write().message = evt.value(),
                }
            }

            div {
                class: "bulk-email__field",
                label {
                    class: "btn btn--outline",
                    r#for: "bulk-attachments",
                    Icon { icon: FaPaperclip, width: 14, height: 14 }
                    " Attach files (PDF, JPG, PNG, GIF, max 5MB each)"
                }
                input {
                    id: "bulk-attachments",
                    class: "visually-hidden",
                    r#type: "file",
                    multiple: true,
                    accept: ACCEPT_ATTR,
                    onchange: on_files,
                }
                if !current.attachments.is_empty() {
                    ul {
                        class: "attachment-list",
                        for (index, file) in current.attachments.iter().enumerate() {
                            AttachmentRow {
                                key: "{index}-{file.name}",
                                draft,
                                index,
                                name: file.name.clone(),
                                size: file.size_label(),
                            }
                        }
                    }
                }
            }

            button {
                r#type: "submit",
                class: "btn btn--primary",
                disabled: sending(),
                Icon { icon: FaPaperPlane, width: 14, height: 14 }
                if sending() { " Sending..." } else { " Send Email" }
            }
        }
    }
}

#[component]
fn RecipientChip(draft: Signal<BulkEmailDraft>, email: String, label: String) -> Element {
    rsx! {
        span {
            class: "chip chip--removable",
            title: "{email}",
            "{label}"
            button {
                r#type: "button",
                class: "chip__remove",
                onclick: move |_| {
                    draft.write().recipients.remove(&email);
                },
                Icon { icon: FaXmark, width: 10, height: 10 }
            }
        }
    }
}

#[component]
fn SuggestionItem(
    draft: Signal<BulkEmailDraft>,
    to_input: Signal<String>,
    student: Student,
) -> Element {
    let name = student.display_name().to_string();
    let email = student.email.clone();
    rsx! {
        li {
            onclick: move |_| {
                draft.write().recipients.add_student(&student);
                to_input.set(String::new());
            },
            strong { "{name}" }
            span { class: "muted", " {email}" }
        }
    }
}

#[component]
fn RosterRow(draft: Signal<BulkEmailDraft>, student: Student, selected: bool) -> Element {
    let name = student.display_name().to_string();
    let email = student.email.clone();
    let semester = student.semester.clone().unwrap_or_default();
    let course = student.course.clone().unwrap_or_default();
    rsx! {
        li {
            class: if selected { "roster__row roster__row--selected" } else { "roster__row" },
            onclick: move |_| {
                let mut d = draft.write();
                if !d.recipients.remove(&student.email) {
                    d.recipients.add_student(&student);
                }
            },
            input { r#type: "checkbox", checked: selected, readonly: true }
            div {
                strong { "{name}" }
                div { class: "muted", "{email}" }
            }
            span { class: "badge", "{course}" }
            if !semester.is_empty() {
                span { class: "badge", "Sem {semester}" }
            }
        }
    }
}

#[component]
fn AttachmentRow(draft: Signal<BulkEmailDraft>, index: usize, name: String, size: String) -> Element {
    rsx! {
        li {
            span { "{name}" }
            span { class: "muted", " ({size})" }
            button {
                r#type: "button",
                class: "chip__remove",
                onclick: move |_| {
                    draft.write().attachments.remove(index);
                },
                Icon { icon: FaXmark, width: 10, height: 10 }
            }
        }
    }
}

fn students_snapshot(roster: &Resource<Vec<Student>>) -> Vec<Student> {
    roster.read().clone().unwrap_or_default()
}

fn report_send_error(toast: Toaster, error: api::ApiError) {
    tracing::error!("bulk email failed: {error}");
    if error.is_forbidden() {
        toast.error("Access Denied - Admin Only");
    } else {
        toast.error(error.user_message());
    }
}
