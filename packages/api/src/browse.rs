//! Filtering and ordering for the project gallery.
//!
//! The gallery loads the approved list once and narrows it locally; the same
//! [`ProjectQuery`] also renders the query string for `/projects/search`.

use std::cmp::Reverse;

use crate::models::Project;

/// Sentinel used by the filter dropdowns for "no filter".
pub const ALL: &str = "All";

pub const COURSES: [&str; 4] = ["MCA", "BCA", "B.Tech", "B.Sc"];
pub const TECHNOLOGIES: [&str; 5] = ["React", "Node.js", "Python", "Java", "Angular"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Latest,
    MostPopular,
    MostLiked,
}

impl SortOrder {
    pub const ALL: [SortOrder; 3] = [SortOrder::Latest, SortOrder::MostPopular, SortOrder::MostLiked];

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Latest => "Latest",
            SortOrder::MostPopular => "Most Popular",
            SortOrder::MostLiked => "Most Liked",
        }
    }

    /// Inverse of [`Self::label`]; unknown labels mean `Latest`.
    pub fn from_label(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|order| order.label() == label)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    pub search: String,
    pub course: String,
    pub tech: String,
    pub status: String,
    pub sort: SortOrder,
}

impl Default for ProjectQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            course: ALL.to_string(),
            tech: ALL.to_string(),
            status: ALL.to_string(),
            sort: SortOrder::Latest,
        }
    }
}

fn is_set(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty() && value != ALL
}

impl ProjectQuery {
    pub fn matches(&self, project: &Project) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || project.project_name.to_lowercase().contains(&needle)
            || project.description.to_lowercase().contains(&needle)
            || project.course.to_lowercase().contains(&needle)
            || project
                .tech_stack
                .iter()
                .any(|tech| tech.to_lowercase().contains(&needle));

        let matches_course = !is_set(&self.course) || project.course.contains(self.course.trim());
        let matches_tech =
            !is_set(&self.tech) || project.tech_stack.iter().any(|t| t == self.tech.trim());
        let matches_status = !is_set(&self.status)
            || project.status.as_str().eq_ignore_ascii_case(self.status.trim());

        matches_search && matches_course && matches_tech && matches_status
    }

    /// Filter then sort. Ties keep their incoming order.
    pub fn apply<'a>(&self, projects: &'a [Project]) -> Vec<&'a Project> {
        let mut out: Vec<&Project> = projects.iter().filter(|p| self.matches(p)).collect();
        match self.sort {
            SortOrder::Latest => out.sort_by_key(|p| Reverse((p.created_at, p.id))),
            SortOrder::MostPopular => out.sort_by_key(|p| Reverse(p.view_count)),
            SortOrder::MostLiked => out.sort_by_key(|p| Reverse(p.like_count)),
        }
        out
    }

    /// The part of the query worth sending to `/projects/search`: the select
    /// filters, without free text or ordering. `None` when nothing is
    /// selected and the plain browse list will do.
    pub fn server_filter(&self) -> Option<ProjectQuery> {
        let filter = ProjectQuery {
            course: self.course.clone(),
            tech: self.tech.clone(),
            status: self.status.clone(),
            ..ProjectQuery::default()
        };
        (!filter.search_params().is_empty()).then_some(filter)
    }

    /// `(name, value)` pairs for `/projects/search`; empty and `All` filters
    /// are left out.
    pub fn search_params(&self) -> Vec<(&'static str, String)> {
        [
            ("search", &self.search),
            ("status", &self.status),
            ("course", &self.course),
            ("techStack", &self.tech),
        ]
        .into_iter()
        .filter(|(_, value)| is_set(value))
        .map(|(name, value)| (name, value.trim().to_string()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProjectStatus;
    use chrono::{TimeZone, Utc};

    fn project(id: i64, name: &str, course: &str, tech: &[&str], views: u64, likes: u64) -> Project {
        Project {
            id,
            project_name: name.into(),
            description: format!("{name} description"),
            course: course.into(),
            tech_stack: tech.iter().map(|t| t.to_string()).collect(),
            view_count: views,
            like_count: likes,
            status: ProjectStatus::Approved,
            ..Default::default()
        }
    }

    fn gallery() -> Vec<Project> {
        vec![
            project(1, "Library System", "MCA 1st Semester", &["Angular", "Node.js"], 50, 3),
            project(2, "College ERP", "BCA 5th Semester", &["Python", "Django"], 120, 9),
            project(3, "Chat App", "MCA 3rd Semester", &["React", "Node.js"], 80, 12),
        ]
    }

    fn ids(projects: Vec<&Project>) -> Vec<i64> {
        projects.into_iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_search_covers_name_description_course_and_tech() {
        let projects = gallery();
        let mut query = ProjectQuery {
            search: "django".into(),
            ..Default::default()
        };
        assert_eq!(ids(query.apply(&projects)), vec![2]);

        query.search = "mca".into();
        assert_eq!(ids(query.apply(&projects)), vec![3, 1]);

        query.search = "CHAT".into();
        assert_eq!(ids(query.apply(&projects)), vec![3]);
    }

    #[test]
    fn test_course_is_substring_and_tech_is_exact() {
        let projects = gallery();
        let query = ProjectQuery {
            course: "MCA".into(),
            tech: "Node.js".into(),
            ..Default::default()
        };
        assert_eq!(ids(query.apply(&projects)), vec![3, 1]);

        let query = ProjectQuery {
            tech: "Node".into(),
            ..Default::default()
        };
        assert!(query.apply(&projects).is_empty());
    }

    #[test]
    fn test_sort_orders() {
        let mut projects = gallery();
        projects[0].created_at = Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap());
        projects[1].created_at = Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());

        let mut query = ProjectQuery::default();
        assert_eq!(ids(query.apply(&projects)), vec![1, 2, 3]);

        query.sort = SortOrder::MostPopular;
        assert_eq!(ids(query.apply(&projects)), vec![2, 3, 1]);

        query.sort = SortOrder::from_label("Most Liked");
        assert_eq!(ids(query.apply(&projects)), vec![3, 2, 1]);
    }

    #[test]
    fn test_search_params_omit_unset_filters() {
        let query = ProjectQuery {
            search: " chat ".into(),
            course: "".into(),
            tech: "React".into(),
            ..Default::default()
        };
        assert_eq!(
            query.search_params(),
            vec![("search", "chat".to_string()), ("techStack", "React".to_string())]
        );
        assert!(ProjectQuery::default().search_params().is_empty());
    }

    #[test]
    fn test_server_filter_keeps_only_selects() {
        assert_eq!(ProjectQuery::default().server_filter(), None);

        let typed = ProjectQuery {
            search: "chat".into(),
            sort: SortOrder::MostLiked,
            ..Default::default()
        };
        assert_eq!(typed.server_filter(), None);

        let selected = ProjectQuery {
            search: "chat".into(),
            course: "MCA".into(),
            ..Default::default()
        };
        let filter = selected.server_filter().unwrap();
        assert_eq!(filter.search_params(), vec![("course", "MCA".to_string())]);
        assert_eq!(filter.sort, SortOrder::Latest);
    }
}
