//! Project card for the gallery, with its like button and download-access
//! action.

use api::access::check_on_mount;
use api::models::Project;
use api::validation::initials;
use api::{AccessSource, AccessState, AccessTracker, RequestBlocked, Role};
use dioxus::prelude::*;

use crate::icons::{FaCode, FaDownload, FaEye, FaHeart, FaLock};
use crate::session::use_session;
use crate::toast::use_toast;
use crate::Icon;

#[component]
pub fn ProjectCard(project: Project) -> Element {
    let leader_initials = initials(&project.team_leader_name, Role::Student);
    let detail_href = format!("/projects/{}", project.id);
    let created = project.created_label();
    let status_class = format!("status {}", project.status.css_class());

    rsx! {
        div {
            class: "project-card",
            div {
                class: "project-card__top",
                span { class: "{status_class}", "{project.status}" }
                span {
                    class: "project-card__views",
                    Icon { icon: FaEye, width: 12, height: 12 }
                    " {project.view_count}"
                }
            }

            h3 { class: "project-card__title", "{project.project_name}" }
            p { class: "project-card__description", "{project.description}" }

            if let Some(shot) = project.screenshots.first() {
                div {
                    class: "project-card__image",
                    img { src: "{shot}", alt: "{project.project_name}" }
                }
            }

            div {
                class: "project-card__info",
                div { strong { "Team Leader: " } span { "{project.team_leader_name}" } }
                div { strong { "Course: " } span { "{project.course}" } }
            }

            div {
                class: "project-card__tech",
                strong { "Tech Stack:" }
                div {
                    class: "chips",
                    for tech in project.tech_stack.iter() {
                        span { class: "chip", "{tech}" }
                    }
                }
            }

            hr {}

            div {
                class: "project-card__footer",
                div {
                    class: "project-card__author",
                    div { class: "avatar", "{leader_initials}" }
                    div {
                        p { "{project.team_leader_name}" }
                        small { "{created}" }
                    }
                }
                LikeButton { project_id: project.id, initial_count: project.like_count }
            }

            div {
                class: "project-card__buttons",
                Link { to: detail_href, class: "btn btn--outline", "View Details" }
                DownloadAccess { project_id: project.id, code_link: project.code_link.clone() }
            }
        }
    }
}

/// Heart button with an optimistic count, corrected by the server's
/// `likeCount`.
#[component]
pub fn LikeButton(project_id: i64, initial_count: u64) -> Element {
    let session = use_session();
    let toast = use_toast();
    let mut count = use_signal(|| initial_count);
    let mut liked = use_signal(|| false);
    let mut busy = use_signal(|| false);

    let onclick = move |_: MouseEvent| {
        let client = session.client();
        async move {
            if !client.has_token() {
                toast.info("Please login to like projects");
                return;
            }
            if busy() {
                return;
            }
            busy.set(true);

            let was_liked = liked();
            let before = count();
            liked.set(!was_liked);
            count.set(if was_liked { before.saturating_sub(1) } else { before + 1 });

            match client.toggle_like(project_id).await {
                Ok(response) => {
                    count.set(response.like_count);
                    if let Some(now_liked) = response.liked {
                        liked.set(now_liked);
                    }
                }
                Err(e) => {
                    liked.set(was_liked);
                    count.set(before);
                    toast.error(e.user_message());
                }
            }
            busy.set(false);
        }
    };

    rsx! {
        button {
            class: if liked() { "like-button like-button--active" } else { "like-button" },
            disabled: busy(),
            onclick: onclick,
            Icon { icon: FaHeart, width: 14, height: 14 }
            " {count}"
        }
    }
}

/// Download / request-access action for one project.
///
/// Every mount (and every change of project or login state) starts from
/// `Loading`; the access check that answers late for an older mount is
/// dropped by the tracker.
#[component]
pub fn DownloadAccess(project_id: i64, code_link: Option<String>) -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let mut tracker = use_signal(AccessTracker::new);
    let logged_in = session.snapshot().is_logged_in;

    let check_session = session.clone();
    use_effect(use_reactive(
        (&project_id, &logged_in),
        move |(project_id, logged_in)| {
            let generation = tracker.write().mount();
            let client = check_session.client();
            spawn(async move {
                let state = check_on_mount(&client, logged_in, project_id).await;
                tracker.write().resolve(generation, state);
            });
        },
    ));

    let on_request = move |_: MouseEvent| {
        let client = session.client();
        async move {
            let ticket = match tracker.write().begin_request() {
                Ok(ticket) => ticket,
                Err(RequestBlocked::LoginRequired) => {
                    toast.info(RequestBlocked::LoginRequired.to_string());
                    nav.push("/login");
                    return;
                }
                Err(blocked) => {
                    tracing::debug!(project_id, "request not sent: {blocked}");
                    return;
                }
            };

            let result = client.request_access(project_id, "").await;
            match &result {
                Ok(()) => toast.success("Access request sent to project owner!"),
                Err(e) => toast.error(e.user_message()),
            }
            tracker.write().finish_request(ticket, result.is_ok());
        }
    };

    let current = tracker();
    let state = current.state();
    let label = state.action_label();

    match state {
        AccessState::Owner | AccessState::Approved => match code_link {
            Some(link) if !link.trim().is_empty() => rsx! {
                a {
                    class: "btn btn--success",
                    href: "{link}",
                    target: "_blank",
                    rel: "noopener noreferrer",
                    Icon { icon: FaDownload, width: 14, height: 14 }
                    " {label}"
                }
            },
            _ => rsx! {
                button { class: "btn btn--success", disabled: true, title: "No code link provided",
                    Icon { icon: FaCode, width: 14, height: 14 }
                    " {label}"
                }
            },
        },
        AccessState::Loading | AccessState::Pending => rsx! {
            button { class: "btn btn--muted", disabled: true, "{label}" }
        },
        AccessState::NotLoggedIn | AccessState::Rejected | AccessState::NoRequest => rsx! {
            button {
                class: "btn btn--primary",
                disabled: current.is_requesting(),
                onclick: on_request,
                Icon { icon: FaLock, width: 14, height: 14 }
                if current.is_requesting() { " Sending..." } else { " {label}" }
            }
        },
    }
}
