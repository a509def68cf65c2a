//! Admin dashboard: platform statistics, moderation queues, the student
//! roster and the activity log.

use api::activity::FILTER_MODES;
use api::browse::COURSES;
use api::models::{
    new_password_problem, ActivityLog, AdminStats, ContributionRequest, LeaderboardEntry, Project,
    ProjectStatus, RequestStatus, Student, StudentUpdate, MIN_ADMIN_SET_PASSWORD_LEN,
};
use api::{AccountStatus, ActivityDigest, ActivityFilter};
use dioxus::prelude::*;
use ui::icons::{FaCheck, FaEnvelope, FaKey, FaPenToSquare, FaTrash, FaXmark};
use ui::{use_session, use_toast, Icon};

use super::project_details::RequestRow;
use super::register::SEMESTERS;
use super::{report_error, use_admin_guard};
use crate::Route;

const LEADERBOARD_SIZE: u32 = 10;
const ACTIVITY_PAGE_SIZE: u32 = 20;
const STATS_DAYS: u32 = 7;
const RECENT_HOURS: u32 = 24;
const TOP_USERS: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    Overview,
    Projects,
    Requests,
    Students,
    Activity,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Overview, Tab::Projects, Tab::Requests, Tab::Students, Tab::Activity];

    fn label(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Projects => "Projects",
            Tab::Requests => "Requests",
            Tab::Students => "Students",
            Tab::Activity => "Activity",
        }
    }
}

#[component]
pub fn AdminDashboard() -> Element {
    let allowed = use_admin_guard();
    let mut tab = use_signal(|| Tab::Overview);

    if !allowed {
        return rsx! {};
    }

    rsx! {
        div {
            class: "admin",
            header {
                class: "page-header",
                div {
                    h1 { "Admin Dashboard" }
                    p { class: "muted", "Moderate projects, requests and students." }
                }
                Link {
                    to: Route::BulkEmail {},
                    class: "btn btn--primary",
                    Icon { icon: FaEnvelope, width: 14, height: 14 }
                    " Bulk Email"
                }
            }

            nav {
                class: "tabs",
                for t in Tab::ALL {
                    button {
                        key: "{t:?}",
                        class: if tab() == t { "tabs__button tabs__button--active" } else { "tabs__button" },
                        onclick: move |_| tab.set(t),
                        {t.label()}
                    }
                }
            }

            match tab() {
                Tab::Overview => rsx! { Overview {} },
                Tab::Projects => rsx! { ProjectQueue {} },
                Tab::Requests => rsx! { RequestQueue {} },
                Tab::Students => rsx! { StudentRoster {} },
                Tab::Activity => rsx! { ActivityFeed {} },
            }
        }
    }
}

#[component]
fn Overview() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let stats_session = session.clone();
    let stats = use_resource(move || {
        let client = stats_session.client();
        async move {
            client
                .admin_stats()
                .await
                .map_err(|e| report_error(toast, nav, "could not load admin stats", &e))
                .ok()
        }
    });
    let leaders = use_resource(move || {
        let client = session.client();
        async move {
            client.leaderboard(LEADERBOARD_SIZE).await.unwrap_or_else(|e| {
                tracing::warn!("could not load leaderboard: {e}");
                Vec::new()
            })
        }
    });

    let stats: AdminStats = stats.read().clone().flatten().unwrap_or_default();
    let leaders: Vec<LeaderboardEntry> = leaders.read().clone().unwrap_or_default();

    rsx! {
        div {
            class: "stat-grid",
            StatCard { label: "Total Students", value: stats.total_students }
            StatCard { label: "Total Projects", value: stats.total_projects }
            StatCard { label: "Pending Projects", value: stats.pending_projects }
            StatCard { label: "Pending Requests", value: stats.pending_requests }
            StatCard { label: "Active Collaborations", value: stats.active_collaborations }
        }

        section {
            class: "leaderboard",
            h2 { "Leaderboard" }
            if leaders.is_empty() {
                p { class: "muted", "No contributors yet." }
            } else {
                table {
                    thead {
                        tr {
                            th { "Rank" }
                            th { "Student" }
                            th { "Projects" }
                            th { "Likes" }
                            th { "Collaborations" }
                        }
                    }
                    tbody {
                        for entry in leaders {
                            tr {
                                key: "{entry.rank}-{entry.name}",
                                td { "#{entry.rank}" }
                                td { "{entry.name}" }
                                td { "{entry.projects}" }
                                td { "{entry.likes}" }
                                td { "{entry.collaborations}" }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StatCard(label: &'static str, value: u64) -> Element {
    rsx! {
        div {
            class: "stat-card",
            span { class: "stat-card__value", "{value}" }
            span { class: "stat-card__label", "{label}" }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Moderation {
    Approve,
    Reject,
    Delete,
}

#[component]
fn ProjectQueue() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let mut show_all = use_signal(|| false);

    let load_session = session.clone();
    let mut projects = use_resource(move || {
        let client = load_session.client();
        async move {
            client
                .admin_projects()
                .await
                .unwrap_or_else(|e| {
                    report_error(toast, nav, "could not load projects", &e);
                    Vec::new()
                })
        }
    });

    let moderate = use_callback(move |(id, action): (i64, Moderation)| {
        let client = session.client();
        spawn(async move {
            let result = match action {
                Moderation::Approve => client.approve_project(id).await,
                Moderation::Reject => client.reject_project(id).await,
                Moderation::Delete => client.delete_project(id).await,
            };
            match result {
                Ok(_) => {
                    let done = match action {
                        Moderation::Approve => "Project approved",
                        Moderation::Reject => "Project rejected",
                        Moderation::Delete => "Project deleted",
                    };
                    toast.success(done);
                    projects.restart();
                }
                Err(e) => report_error(toast, nav, "project moderation failed", &e),
            }
        });
    });

    let all: Vec<Project> = projects.read().clone().unwrap_or_default();
    let visible: Vec<Project> = all
        .into_iter()
        .filter(|p| show_all() || p.status == ProjectStatus::Pending)
        .collect();

    rsx! {
        label {
            class: "checkbox",
            input {
                r#type: "checkbox",
                checked: show_all(),
                onchange: move |evt: FormEvent| show_all.set(evt.checked()),
            }
            " Show approved and rejected projects"
        }
        if visible.is_empty() {
            p { class: "muted", "Nothing waiting for review." }
        }
        ul {
            class: "moderation-list",
            for project in visible {
                ProjectRow { key: "{project.id}", project, onmoderate: moderate }
            }
        }
    }
}

#[component]
fn ProjectRow(project: Project, onmoderate: EventHandler<(i64, Moderation)>) -> Element {
    let id = project.id;
    let status_class = format!("status {}", project.status.css_class());
    let tech = project.tech_stack.join(", ");
    let pending = project.status == ProjectStatus::Pending;
    let detail = Route::ProjectDetails { id };

    rsx! {
        li {
            class: "moderation-row",
            div {
                Link { to: detail, strong { "{project.project_name}" } }
                span { class: "{status_class}", " {project.status}" }
                div { class: "muted", "{project.team_leader_name} · {project.course} · {tech}" }
            }
            div {
                class: "moderation-row__actions",
                if pending {
                    button {
                        class: "btn btn--success btn--small",
                        onclick: move |_| onmoderate.call((id, Moderation::Approve)),
                        Icon { icon: FaCheck, width: 12, height: 12 }
                        " Approve"
                    }
                    button {
                        class: "btn btn--danger btn--small",
                        onclick: move |_| onmoderate.call((id, Moderation::Reject)),
                        Icon { icon: FaXmark, width: 12, height: 12 }
                        " Reject"
                    }
                }
                button {
                    class: "btn btn--ghost btn--small",
                    title: "Delete project",
                    onclick: move |_| onmoderate.call((id, Moderation::Delete)),
                    Icon { icon: FaTrash, width: 12, height: 12 }
                }
            }
        }
    }
}

#[component]
fn RequestQueue() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();

    let load_session = session.clone();
    let mut requests = use_resource(move || {
        let client = load_session.client();
        async move {
            client.admin_requests().await.unwrap_or_else(|e| {
                report_error(toast, nav, "could not load requests", &e);
                Vec::new()
            })
        }
    });

    let decide = use_callback(move |(id, status): (i64, RequestStatus)| {
        let client = session.client();
        spawn(async move {
            let result = match status {
                RequestStatus::Approved => client.admin_approve_request(id).await,
                _ => client.admin_reject_request(id).await,
            };
            match result {
                Ok(_) => {
                    toast.success(if status == RequestStatus::Approved {
                        "Request approved"
                    } else {
                        "Request rejected"
                    });
                    requests.restart();
                }
                Err(e) => report_error(toast, nav, "request moderation failed", &e),
            }
        });
    });

    let list: Vec<ContributionRequest> = requests.read().clone().unwrap_or_default();

    rsx! {
        if list.is_empty() {
            p { class: "muted", "No access requests." }
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
fn StudentRoster() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let mut course = use_signal(String::new);
    let mut editing = use_signal(|| None::<(i64, StudentUpdate)>);
    let mut password_for = use_signal(|| None::<(i64, String)>);

    let load_session = session.clone();
    let mut students = use_resource(move || {
        let client = load_session.client();
        let filter = course();
        async move {
            let filter = (!filter.is_empty()).then_some(filter);
            client.students(filter.as_deref()).await.unwrap_or_else(|e| {
                report_error(toast, nav, "could not load students", &e);
                Vec::new()
            })
        }
    });

    let remove = use_callback(move |id: i64| {
        let client = session.client();
        spawn(async move {
            match client.delete_student(id).await {
                Ok(_) => {
                    toast.success("Student deleted");
                    students.restart();
                }
                Err(e) => report_error(toast, nav, "student delete failed", &e),
            }
        });
    });
    let edit = use_callback(move |student: Student| {
        password_for.set(None);
        editing.set(Some((student.id, StudentUpdate::from_student(&student))));
    });
    let change_password = use_callback(move |student: Student| {
        editing.set(None);
        password_for.set(Some((student.id, student.display_name().to_string())));
    });

    let list: Vec<Student> = students.read().clone().unwrap_or_default();

    rsx! {
        div {
            class: "filters",
            select {
                value: course(),
                onchange: move |evt: FormEvent| course.set(evt.value()),
                option { value: "", "All Courses" }
                for c in COURSES {
                    option { key: "{c}", value: "{c}", "{c}" }
                }
            }
        }
        if let Some((id, form)) = editing() {
            StudentEditor {
                key: "edit-{id}",
                id,
                initial: form,
                onclose: move |saved: bool| {
                    editing.set(None);
                    if saved {
                        students.restart();
                    }
                },
            }
        }
        if let Some((id, name)) = password_for() {
            StudentPasswordForm {
                key: "password-{id}",
                id,
                name,
                onclose: move |_| password_for.set(None),
            }
        }
        if list.is_empty() {
            p { class: "muted", "No students found." }
        } else {
            table {
                class: "roster-table",
                thead {
                    tr {
                        th { "Name" }
                        th { "Email" }
                        th { "Course" }
                        th { "Semester" }
                        th { "Projects" }
                        th { "Status" }
                        th {}
                    }
                }
                tbody {
                    for student in list {
                        StudentRow {
                            key: "{student.id}",
                            student,
                            onedit: edit,
                            onpassword: change_password,
                            ondelete: remove,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StudentRow(
    student: Student,
    onedit: EventHandler<Student>,
    onpassword: EventHandler<Student>,
    ondelete: EventHandler<i64>,
) -> Element {
    let id = student.id;
    let name = student.display_name().to_string();
    let course = student.course.clone().unwrap_or_default();
    let semester = student.semester.clone().unwrap_or_default();
    let projects = student.project_total();
    let status = student.standing().as_str();
    let for_edit = student.clone();
    let for_password = student.clone();

    rsx! {
        tr {
            td { "{name}" }
            td { "{student.email}" }
            td { "{course}" }
            td { "{semester}" }
            td { "{projects}" }
            td { span { class: "badge", "{status}" } }
            td {
                class: "roster-table__actions",
                button {
                    class: "btn btn--ghost btn--small",
                    title: "Edit",
                    onclick: move |_| onedit.call(for_edit.clone()),
                    Icon { icon: FaPenToSquare, width: 12, height: 12 }
                }
                button {
                    class: "btn btn--ghost btn--small",
                    title: "Change Password",
                    onclick: move |_| onpassword.call(for_password.clone()),
                    Icon { icon: FaKey, width: 12, height: 12 }
                }
                button {
                    class: "btn btn--ghost btn--small",
                    title: "Delete student",
                    onclick: move |_| ondelete.call(id),
                    Icon { icon: FaTrash, width: 12, height: 12 }
                }
            }
        }
    }
}

const STATUSES: [AccountStatus; 3] = [
    AccountStatus::Active,
    AccountStatus::Suspended,
    AccountStatus::Inactive,
];

/// Edit form for one student. `onclose` receives whether the change was saved.
#[component]
fn StudentEditor(id: i64, initial: StudentUpdate, onclose: EventHandler<bool>) -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let mut form = use_signal(|| initial);
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
            let result = client.update_student(id, &update).await;
            saving.set(false);
            match result {
                Ok(_) => {
                    toast.success("Student details updated successfully!");
                    onclose.call(true);
                }
                Err(e) => report_error(toast, nav, "student update failed", &e),
            }
        }
    };

    let current = form();
    let status = current.status.as_str();

    rsx! {
        form {
            class: "student-editor",
            onsubmit: on_save,
            h3 { "Edit Student" }
            label { "Full Name" }
            input {
                value: "{current.full_name}",
                oninput: move |evt: FormEvent| form.write().full_name = evt.value(),
            }
            label { "Email" }
            input {
                r#type: "email",
                value: "{current.email}",
                oninput: move |evt: FormEvent| form.write().email = evt.value(),
            }
            label { "Roll Number" }
            input {
                value: "{current.roll_number}",
                oninput: move |evt: FormEvent| form.write().roll_number = evt.value(),
            }
            label { "Course" }
            select {
                value: "{current.course}",
                onchange: move |evt: FormEvent| form.write().course = evt.value(),
                option { value: "", "Select course" }
                for c in COURSES {
                    option { key: "{c}", value: "{c}", "{c}" }
                }
            }
            label { "Semester" }
            select {
                value: "{current.semester}",
                onchange: move |evt: FormEvent| form.write().semester = evt.value(),
                option { value: "", "Select semester" }
                for s in SEMESTERS {
                    option { key: "{s}", value: "{s}", "{s}" }
                }
            }
            label { "Status" }
            select {
                value: "{status}",
                onchange: move |evt: FormEvent| {
                    form.write().status = AccountStatus::from(evt.value().as_str());
                },
                for option_status in STATUSES {
                    StatusOption { key: "{option_status:?}", status: option_status }
                }
            }
            div {
                class: "form-actions",
                button {
                    r#type: "button",
                    class: "btn btn--outline",
                    onclick: move |_| onclose.call(false),
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

#[component]
fn StatusOption(status: AccountStatus) -> Element {
    let value = status.as_str();
    rsx! {
        option { value: "{value}", "{value}" }
    }
}

#[component]
fn StudentPasswordForm(id: i64, name: String, onclose: EventHandler<()>) -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let mut password = use_signal(String::new);
    let mut confirm = use_signal(String::new);
    let mut saving = use_signal(|| false);

    let student_name = name.clone();
    let on_save = move |evt: FormEvent| {
        evt.prevent_default();
        let client = session.client();
        let name = student_name.clone();
        async move {
            let new_password = password();
            if let Some(problem) = new_password_problem(&new_password, &confirm()) {
                toast.error(problem);
                return;
            }
            saving.set(true);
            let result = client.change_student_password(id, &new_password).await;
            saving.set(false);
            match result {
                Ok(_) => {
                    toast.success(format!("Password changed successfully for {name}!"));
                    onclose.call(());
                }
                Err(e) => report_error(toast, nav, "student password change failed", &e),
            }
        }
    };

    rsx! {
        form {
            class: "student-editor",
            onsubmit: on_save,
            h3 { "Change Password for {name}" }
            label { "New Password" }
            input {
                r#type: "password",
                placeholder: "At least {MIN_ADMIN_SET_PASSWORD_LEN} characters",
                value: password(),
                oninput: move |evt: FormEvent| password.set(evt.value()),
            }
            label { "Confirm New Password" }
            input {
                r#type: "password",
                value: confirm(),
                oninput: move |evt: FormEvent| confirm.set(evt.value()),
            }
            div {
                class: "form-actions",
                button {
                    r#type: "button",
                    class: "btn btn--outline",
                    onclick: move |_| onclose.call(()),
                    "Cancel"
                }
                button {
                    r#type: "submit",
                    class: "btn btn--primary",
                    disabled: saving(),
                    if saving() { "Saving..." } else { "Change Password" }
                }
            }
        }
    }
}

#[component]
fn ActivityFeed() -> Element {
    let session = use_session();
    let toast = use_toast();
    let nav = use_navigator();
    let mut page = use_signal(|| 0u32);
    let mut filter = use_signal(ActivityFilter::default);
    let mut mode = use_signal(|| "all".to_string());
    let mut text = use_signal(String::new);

    let load_session = session.clone();
    let mut logs = use_resource(move || {
        let client = load_session.client();
        let page = page();
        let filter = filter();
        async move {
            client
                .activity_page(&filter, page, ACTIVITY_PAGE_SIZE)
                .await
                .map_err(|e| report_error(toast, nav, "could not load activity", &e))
                .ok()
        }
    });

    let digest_session = session.clone();
    let mut digest = use_resource(move || {
        let client = digest_session.client();
        async move {
            client
                .activity_digest(STATS_DAYS, RECENT_HOURS, TOP_USERS)
                .await
                .unwrap_or_else(|e| {
                    tracing::warn!("could not load activity summary: {e}");
                    ActivityDigest::default()
                })
        }
    });

    let apply_filter = move |evt: FormEvent| {
        evt.prevent_default();
        page.set(0);
        filter.set(ActivityFilter::from_parts(&mode(), &text()));
    };

    let clear = move |_: MouseEvent| {
        let client = session.client();
        spawn(async move {
            match client.clear_activity_logs().await {
                Ok(_) => {
                    toast.success("Activity log cleared");
                    page.set(0);
                    logs.restart();
                    digest.restart();
                }
                Err(e) => report_error(toast, nav, "clear activity failed", &e),
            }
        });
    };

    let summary: Option<ActivityDigest> = digest.read().clone();
    let filter_form = rsx! {
        form {
            class: "filters",
            onsubmit: apply_filter,
            select {
                value: mode(),
                onchange: move |evt: FormEvent| mode.set(evt.value()),
                for (key, label) in FILTER_MODES {
                    option { key: "{key}", value: "{key}", "{label}" }
                }
            }
            input {
                r#type: "search",
                placeholder: "Text, category or email",
                value: text(),
                oninput: move |evt: FormEvent| text.set(evt.value()),
            }
            button { r#type: "submit", class: "btn btn--outline btn--small", "Apply" }
        }
    };

    let Some(current) = logs.read().clone().flatten() else {
        return rsx! {
            {filter_form}
            p { class: "muted", "Loading activity..." }
        };
    };
    let entries: Vec<ActivityLog> = current.content;
    let shown_page = current.number + 1;
    let total_pages = current.total_pages.max(1);
    let has_prev = current.number > 0;
    let has_next = current.number + 1 < current.total_pages;

    rsx! {
        if let Some(summary) = summary.filter(|d| !d.is_empty()) {
            ActivitySummary { digest: summary }
        }
        div {
            class: "activity__toolbar",
            {filter_form}
            button { class: "btn btn--danger btn--small", onclick: clear, "Clear all" }
        }
        if entries.is_empty() {
            p { class: "muted", "No activity recorded." }
        }
        ul {
            class: "activity",
            for entry in entries {
                ActivityRow { key: "{entry.id}", entry }
            }
        }
        div {
            class: "pager",
            button {
                class: "btn btn--ghost btn--small",
                disabled: !has_prev,
                onclick: move |_| page -= 1,
                "Previous"
            }
            span { "Page {shown_page} of {total_pages}" }
            button {
                class: "btn btn--ghost btn--small",
                disabled: !has_next,
                onclick: move |_| page += 1,
                "Next"
            }
        }
    }
}

#[component]
fn ActivitySummary(digest: ActivityDigest) -> Element {
    rsx! {
        div {
            class: "stat-grid",
            if let Some(recent) = digest.recent {
                StatCard { label: "Last 24 hours", value: recent }
            }
            for (label, value) in digest.totals {
                div {
                    key: "{label}",
                    class: "stat-card",
                    span { class: "stat-card__value", "{value}" }
                    span { class: "stat-card__label", "{label}" }
                }
            }
        }
        if !digest.top_users.is_empty() {
            section {
                class: "leaderboard",
                h3 { "Most active users" }
                ol {
                    for (who, count) in digest.top_users {
                        li { key: "{who}", "{who} ({count})" }
                    }
                }
            }
        }
    }
}

#[component]
fn ActivityRow(entry: ActivityLog) -> Element {
    let who = entry
        .user_full_name
        .clone()
        .or_else(|| entry.user_email.clone())
        .unwrap_or_else(|| "System".to_string());
    let category = entry.action_category.clone().unwrap_or_default();
    let description = entry
        .description
        .clone()
        .or_else(|| entry.action_type.clone())
        .unwrap_or_default();
    let when = entry.time_ago.clone().unwrap_or_default();

    rsx! {
        li {
            class: "activity__row",
            strong { "{who}" }
            if !category.is_empty() {
                span { class: "badge", "{category}" }
            }
            span { " {description}" }
            small { class: "muted", " {when}" }
        }
    }
}
