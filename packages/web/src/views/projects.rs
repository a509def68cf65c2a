//! Project gallery. Course and technology selections go to the server;
//! free-text search and ordering run on the client.

use api::browse::{ALL, COURSES, TECHNOLOGIES};
use api::models::Project;
use api::{ProjectQuery, SortOrder};
use dioxus::prelude::*;
use ui::icons::FaMagnifyingGlass;
use ui::{use_session, use_toast, Icon, ProjectCard, UploadLink};

#[component]
pub fn Projects() -> Element {
    let session = use_session();
    let toast = use_toast();
    let logged_in = session.snapshot().is_logged_in;
    let is_admin = session.snapshot().is_admin();

    let mut query = use_signal(ProjectQuery::default);
    let server_filter = use_memo(move || query.read().server_filter());

    let projects = use_resource(move || {
        let client = session.client();
        let filter = server_filter();
        async move {
            let result = match filter {
                Some(filter) => client.search_projects(&filter).await,
                None => client.browse_projects().await,
            };
            match result {
                Ok(projects) => projects,
                Err(e) => {
                    tracing::warn!("could not load projects: {e}");
                    toast.error(e.user_message());
                    Vec::new()
                }
            }
        }
    });

    let current = query();
    let loaded: Option<Vec<Project>> = projects.read().as_ref().map(|all| {
        current.apply(all).into_iter().cloned().collect()
    });

    rsx! {
        section {
            class: "page-header",
            div {
                h1 { "Explore Projects" }
                p { class: "muted", "Discover projects built by students across courses." }
            }
            if logged_in && !is_admin {
                UploadLink {}
            }
        }

        div {
            class: "filters",
            div {
                class: "filters__search",
                Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
                input {
                    r#type: "search",
                    placeholder: "Search projects, courses or technologies",
                    value: "{current.search}",
                    oninput: move |evt: FormEvent| query.write().search = evt.value(),
                }
            }
            select {
                value: "{current.course}",
                onchange: move |evt: FormEvent| query.write().course = evt.value(),
                option { value: ALL, "All Courses" }
                for course in COURSES {
                    option { key: "{course}", value: "{course}", "{course}" }
                }
            }
            select {
                value: "{current.tech}",
                onchange: move |evt: FormEvent| query.write().tech = evt.value(),
                option { value: ALL, "All Technologies" }
                for tech in TECHNOLOGIES {
                    option { key: "{tech}", value: "{tech}", "{tech}" }
                }
            }
            select {
                value: current.sort.label(),
                onchange: move |evt: FormEvent| query.write().sort = SortOrder::from_label(&evt.value()),
                for order in SortOrder::ALL {
                    option { key: "{order:?}", value: order.label(), {order.label()} }
                }
            }
        }

        match loaded {
            None => rsx! { p { class: "muted", "Loading projects..." } },
            Some(list) if list.is_empty() => rsx! {
                div {
                    class: "empty-state",
                    h3 { "No projects found" }
                    p { class: "muted", "Try a different search or clear the filters." }
                    button {
                        class: "btn btn--outline",
                        onclick: move |_| query.set(ProjectQuery::default()),
                        "Clear filters"
                    }
                }
            },
            Some(list) => {
                let count = list.len();
                rsx! {
                    p { class: "muted", "{count} projects" }
                    div {
                        class: "project-grid",
                        for project in list {
                            ProjectCard { key: "{project.id}", project }
                        }
                    }
                }
            }
        }
    }
}
