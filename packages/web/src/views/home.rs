use api::ProjectQuery;
use dioxus::prelude::*;
use ui::icons::{FaCodeBranch, FaLayerGroup, FaUsers};
use ui::{use_session, Icon, ProjectCard};

use crate::Route;

const FEATURED_COUNT: usize = 3;

#[component]
pub fn Home() -> Element {
    let session = use_session();
    let logged_in = session.snapshot().is_logged_in;

    let featured = use_resource(move || {
        let client = session.client();
        async move {
            match client.approved_projects().await {
                Ok(projects) => ProjectQuery::default()
                    .apply(&projects)
                    .into_iter()
                    .take(FEATURED_COUNT)
                    .cloned()
                    .collect::<Vec<_>>(),
                Err(e) => {
                    tracing::warn!("could not load featured projects: {e}");
                    Vec::new()
                }
            }
        }
    });

    rsx! {
        section {
            class: "hero",
            h1 { "Academic Projects" span { class: "hero__accent", " That Continue Forward" } }
            p {
                "Share what your team built, find projects worth extending and request access "
                "to their source when you want to contribute."
            }
            div {
                class: "hero__actions",
                Link { to: Route::Projects {}, class: "btn btn--primary", "Browse Projects" }
                if logged_in {
                    Link { to: Route::UploadProject {}, class: "btn btn--outline", "Upload a Project" }
                } else {
                    Link { to: Route::Register {}, class: "btn btn--outline", "Join StudentHub" }
                }
            }
        }

        section {
            class: "features",
            Feature {
                title: "Project Continuity",
                body: "Final-year work does not have to stop at submission. Juniors pick up where seniors left off.",
                Icon { icon: FaCodeBranch, width: 22, height: 22 }
            }
            Feature {
                title: "Structured Collaboration",
                body: "Source access is granted by the project owner, one request at a time.",
                Icon { icon: FaUsers, width: 22, height: 22 }
            }
            Feature {
                title: "Reusable Knowledge",
                body: "Every approved project is searchable by course and technology.",
                Icon { icon: FaLayerGroup, width: 22, height: 22 }
            }
        }

        section {
            class: "featured",
            h2 { "Latest Projects" }
            match &*featured.read() {
                None => rsx! { p { class: "muted", "Loading projects..." } },
                Some(projects) if projects.is_empty() => rsx! {
                    p { class: "muted", "No approved projects yet." }
                },
                Some(projects) => rsx! {
                    div {
                        class: "project-grid",
                        for project in projects.iter().cloned() {
                            ProjectCard { key: "{project.id}", project }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn Feature(title: &'static str, body: &'static str, children: Element) -> Element {
    rsx! {
        div {
            class: "feature",
            div { class: "feature__icon", {children} }
            h3 { "{title}" }
            p { "{body}" }
        }
    }
}
