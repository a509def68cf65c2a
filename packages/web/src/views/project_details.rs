use api::models::{ContributionRequest, Project, ProjectUpdate, RequestStatus};
use dioxus::prelude::*;
use ui::icons::{FaArrowLeft, FaArrowUpRightFromSquare, FaEye, FaPenToSquare};
use ui::{use_session, use_toast, DownloadAccess, Icon, LikeButton};

use super::report_error;
use crate::Route;

#[component]
pub fn ProjectDetails(id: i64) -> Element {
    let session = use_session();
    let toast = use_toast();

    let viewer_email = session
        .store()
        .load_user()
        .ok()
        .flatten()
        .and_then(|user| user.email);

    let load_session = session.clone();
    let mut loaded = use_resource(use_reactive((&id,), move |(id,)| {
        let client = load_session.client();
        async move {
            client.project(id).await.map_err(|e| {
                tracing::warn!(project_id = id, "could not load project: {e}");
                toast.error(e.user_message());
                e.user_message()
            })
        }
    }));

    let content = match &*loaded.read() {
        None => rsx! { p { class: "muted", "Loading project..." } },
        Some(Err(message)) => rsx! {
            div {
                class: "empty-state",
                h3 { "Project unavailable" }
                p { class: "muted", "{message}" }
            }
        },
        Some(Ok(project)) => {
            let is_owner = viewer_email
                .as_deref()
                .is_some_and(|email| project.is_owned_by(email));
            rsx! {
                ProjectBody { project: project.clone() }
                if is_owner {
                    ProjectEditor {
                        key: "{project.id}",
                        project: project.clone(),
                        onsaved: move |_| loaded.restart(),
                    }
                    OwnerRequests { project_id: project.id }
                }
            }
        }
    };

    rsx! {
        div {
            class: "project-details",
            Link {
                to: Route::Projects {},
                class: "back-link",
                Icon { icon: FaArrowLeft, width: 12, height: 12 }
                " Back to projects"
            }
            {content}
        }
    }
}

#[component]
fn ProjectBody(project: Project) -> Element {
    let status_class = format!("status {}", project.status.css_class());
    let created = project.created_label();
    let semester = project.semester.clone().unwrap_or_default();
    let owner = project.owner_name.clone().unwrap_or_else(|| project.team_leader_name.clone());

    rsx! {
        header {
            class: "project-details__header",
            div {
                span { class: "{status_class}", "{project.status}" }
                h1 { "{project.project_name}" }
                p { class: "muted", "by {owner}" }
            }
            div {
                class: "project-details__stats",
                span {
                    Icon { icon: FaEye, width: 14, height: 14 }
                    " {project.view_count} views"
                }
                LikeButton { project_id: project.id, initial_count: project.like_count }
            }
        }

        if !project.screenshots.is_empty() {
            div {
                class: "gallery",
                for (index, shot) in project.screenshots.iter().enumerate() {
                    img { key: "{index}", src: "{shot}", alt: "Screenshot {index}" }
                }
            }
        }

        section {
            class: "project-details__section",
            h2 { "About this project" }
            p { "{project.description}" }
        }

        section {
            class: "project-details__section project-details__meta",
            div { strong { "Team Leader: " } "{project.team_leader_name}" }
            div { strong { "Course: " } "{project.course}" }
            if !semester.is_empty() {
                div { strong { "Semester: " } "{semester}" }
            }
            if !created.is_empty() {
                div { strong { "Uploaded: " } "{created}" }
            }
            div {
                strong { "Tech Stack:" }
                div {
                    class: "chips",
                    for tech in project.tech_stack.iter() {
                        span { key: "{tech}", class: "chip", "{tech}" }
                    }
                }
            }
        }

        div {
            class: "project-details__actions",
            if let Some(live) = project.live_link.clone().filter(|l| !l.trim().is_empty()) {
                a {
                    class: "btn btn--outline",
                    href: "{live}",
                    target: "_blank",
                    rel: "noopener noreferrer",
                    Icon { icon: FaArrowUpRightFromSquare, width: 12, height: 12 }
                    " Live Demo"
                }
            }
            DownloadAccess { project_id: project.id, code_link: project.code_link.clone() }
        }
    }
}

/// Owner-only form for the editable project fields.
#[component]
fn ProjectEditor(project: Project, onsaved: EventHandler<()>) -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let id = project.id;
    let mut open = use_signal(|| false);
    let mut form = use_signal(|| ProjectUpdate::from_project(&project));
    let mut saving = use_signal(|| false);

    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        let client = session.client();
        async move {
            let update = form();
            if let Some(problem) = update.problem() {
                toast.error(problem);
                return;
            }
            saving.set(true);
            let result = client.update_project(id, &update).await;
            saving.set(false);
            match result {
                Ok(_) => {
                    toast.success("Project updated");
                    open.set(false);
                    onsaved.call(());
                }
                Err(e) => report_error(toast, nav, "project update failed", &e),
            }
        }
    };

    if !open() {
        return rsx! {
            button {
                class: "btn btn--outline",
                onclick: move |_| open.set(true),
                Icon { icon: FaPenToSquare, width: 12, height: 12 }
                " Edit Project"
            }
        };
    }

    let current = form();
    let name = current.project_name.clone().unwrap_or_default();
    let description = current.description.clone().unwrap_or_default();
    let live = current.live_link.clone().unwrap_or_default();
    let code = current.code_link.clone().unwrap_or_default();

    rsx! {
        form {
            class: "student-editor",
            onsubmit: on_save,
            h3 { "Edit Project" }
            label { "Project Name" }
            input {
                value: "{name}",
                oninput: move |evt: FormEvent| form.write().project_name = Some(evt.value()),
            }
            label { "Description" }
            textarea {
                rows: "5",
                value: "{description}",
                oninput: move |evt: FormEvent| form.write().description = Some(evt.value()),
            }
            label { "Live Link" }
            input {
                r#type: "url",
                value: "{live}",
                oninput: move |evt: FormEvent| form.write().live_link = Some(evt.value()),
            }
            label { "Code Link" }
            input {
                r#type: "url",
                value: "{code}",
                oninput: move |evt: FormEvent| form.write().code_link = Some(evt.value()),
            }
            div {
                class: "form-actions",
                button {
                    r#type: "button",
                    class: "btn btn--outline",
                    onclick: move |_| open.set(false),
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

/// Access requests for a project the viewer owns.
#[component]
fn OwnerRequests(project_id: i64) -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let load_session = session.clone();
    let mut requests = use_resource(use_reactive((&project_id,), move |(project_id,)| {
        let client = load_session.client();
        async move {
            match client.contribution_requests(project_id).await {
                Ok(list) => list,
                Err(e) => {
                    tracing::warn!(project_id, "could not load access requests: {e}");
                    Vec::new()
                }
            }
        }
    }));

    let decide = use_callback(move |(request_id, status): (i64, RequestStatus)| {
        let client = session.client();
        spawn(async move {
            match client.update_contribution_status(request_id, status).await {
                Ok(_) => {
                    let verb = if status == RequestStatus::Approved { "approved" } else { "rejected" };
                    toast.success(format!("Request {verb}"));
                    requests.restart();
                }
                Err(e) => report_error(toast, nav, "update access request", &e),
            }
        });
    });

    let list: Vec<ContributionRequest> = requests.read().clone().unwrap_or_default();

    rsx! {
        section {
            class: "project-details__section",
            h2 { "Access Requests" }
            if list.is_empty() {
                p { class: "muted", "No access requests yet." }
            }
            ul {
                class: "request-list",
                for request in list {
                    RequestRow {
                        key: "{request.id}",
                        request,
                        ondecide: decide,
                    }
                }
            }
        }
    }
}

/// One access request with approve/reject buttons while it is pending.
/// Shared with the profile page.
#[component]
pub(crate) fn RequestRow(
    request: ContributionRequest,
    ondecide: EventHandler<(i64, RequestStatus)>,
) -> Element {
    let requester = request.requester_name.clone().unwrap_or_else(|| "Unknown".to_string());
    let email = request.requester_email.clone().unwrap_or_default();
    let project = request.project_name.clone().unwrap_or_default();
    let message = request.message.clone().unwrap_or_default();
    let status = request.status.as_str();
    let id = request.id;

    rsx! {
        li {
            class: "request-row",
            div {
                strong { "{requester}" }
                if !email.is_empty() {
                    span { class: "muted", " {email}" }
                }
                if !project.is_empty() {
                    div { class: "muted", "Project: {project}" }
                }
                if !message.is_empty() {
                    p { class: "request-row__message", "{message}" }
                }
            }
            if request.status == RequestStatus::Pending {
                div {
                    class: "request-row__actions",
                    button {
                        class: "btn btn--success btn--small",
                        onclick: move |_| ondecide.call((id, RequestStatus::Approved)),
                        "Approve"
                    }
                    button {
                        class: "btn btn--danger btn--small",
                        onclick: move |_| ondecide.call((id, RequestStatus::Rejected)),
                        "Reject"
                    }
                }
            } else {
                span { class: "badge", "{status}" }
            }
        }
    }
}
