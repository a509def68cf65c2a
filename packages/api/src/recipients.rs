//! # Bulk email recipients and drafts
//!
//! People type recipients in whatever shape they have at hand. Each raw entry
//! is tried against these forms, first match wins:
//!
//! | # | Form | Example |
//! |---|------|---------|
//! | 1 | `Name <email>` | `Jane Doe <jane@x.com>` |
//! | 2 | `email (Name)` | `jane@x.com (Jane Doe)` |
//! | 3 | `Name email` | `Jane Doe jane@x.com` |
//! | 4 | bare email | `jane@x.com` |
//!
//! Whatever the form, the extracted address must pass [`is_valid_email`] or the
//! entry is rejected. [`RecipientList`] only ever holds accepted entries and
//! never holds two with the same address.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::attachments::AttachmentSet;
use crate::models::{BulkEmailRequest, Student};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub email: String,
    pub name: Option<String>,
}

impl Recipient {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
        }
    }

    /// What a chip in the "To" field shows.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name} <{}>", self.email),
            None => self.email.clone(),
        }
    }

    fn same_address(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

/// `local@domain.tld`: no whitespace, one `@`, a dot after it.
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Failed to compile email regex")
    });
    regex.is_match(email)
}

/// Parse one raw entry. `None` when the extracted address is not valid.
pub fn parse_recipient(input: &str) -> Option<Recipient> {
    static NAME_ANGLE: OnceLock<Regex> = OnceLock::new();
    static EMAIL_PAREN: OnceLock<Regex> = OnceLock::new();

    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let name_angle = NAME_ANGLE.get_or_init(|| {
        Regex::new(r"^(.+?)\s*<([^>]+)>$").expect("Failed to compile name/angle regex")
    });
    let email_paren = EMAIL_PAREN.get_or_init(|| {
        Regex::new(r"^([^\s(]+)\s*\(([^)]+)\)$").expect("Failed to compile email/paren regex")
    });

    let candidate = if let Some(caps) = name_angle.captures(input) {
        Recipient::new(caps[2].trim(), non_empty(&caps[1]))
    } else if let Some(caps) = email_paren.captures(input) {
        Recipient::new(caps[1].trim(), non_empty(&caps[2]))
    } else {
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.split_last() {
            Some((last, rest)) if !rest.is_empty() && last.contains('@') => {
                Recipient::new(*last, non_empty(&rest.join(" ")))
            }
            _ => Recipient::new(input, None),
        }
    };

    is_valid_email(&candidate.email).then_some(candidate)
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

/// Outcome of offering an entry to a [`RecipientList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
    Rejected,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipientList {
    entries: Vec<Recipient>,
}

impl RecipientList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add a typed entry. Invalid entries are dropped.
    pub fn add_input(&mut self, raw: &str) -> AddOutcome {
        match parse_recipient(raw) {
            Some(recipient) => self.add(recipient),
            None => AddOutcome::Rejected,
        }
    }

    /// Add several comma-separated entries at once (paste).
    pub fn add_many(&mut self, raw: &str) -> Vec<AddOutcome> {
        raw.split([',', ';', '\n'])
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| self.add_input(entry))
            .collect()
    }

    /// Add the finished entries of text still being typed: everything before
    /// the last separator. Returns the outcomes and the unfinished tail.
    pub fn add_typed(&mut self, raw: &str) -> (Vec<AddOutcome>, String) {
        match raw.rfind([',', ';', '\n']) {
            Some(at) => {
                let outcomes = self.add_many(&raw[..at]);
                (outcomes, raw[at + 1..].trim_start().to_string())
            }
            None => (Vec::new(), raw.to_string()),
        }
    }

    pub fn add(&mut self, recipient: Recipient) -> AddOutcome {
        if !is_valid_email(&recipient.email) {
            return AddOutcome::Rejected;
        }
        if self.contains(&recipient.email) {
            return AddOutcome::Duplicate;
        }
        self.entries.push(recipient);
        AddOutcome::Added
    }

    /// Add a roster student by address, keeping their name.
    pub fn add_student(&mut self, student: &Student) -> AddOutcome {
        self.add(Recipient::new(
            student.email.clone(),
            Some(student.display_name().to_string()),
        ))
    }

    pub fn remove(&mut self, email: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| !r.same_address(email));
        before != self.entries.len()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.entries.iter().any(|r| r.same_address(email))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// True when every student in `students` is already a recipient.
    pub fn contains_all(&self, students: &[&Student]) -> bool {
        students.iter().all(|s| self.contains(&s.email))
    }

    /// Select-all button: deselect the group when fully selected, otherwise
    /// add whoever is missing.
    pub fn toggle_all(&mut self, students: &[&Student]) {
        if self.contains_all(students) {
            for student in students {
                self.remove(&student.email);
            }
        } else {
            for student in students {
                self.add_student(student);
            }
        }
    }
}

/// Narrow the roster by course and semester; empty filters match everyone.
pub fn filter_roster<'a>(roster: &'a [Student], course: &str, semester: &str) -> Vec<&'a Student> {
    roster
        .iter()
        .filter(|s| course.is_empty() || s.course.as_deref() == Some(course))
        .filter(|s| semester.is_empty() || s.semester.as_deref() == Some(semester))
        .collect()
}

/// Distinct courses on the roster, sorted.
pub fn roster_courses(roster: &[Student]) -> Vec<String> {
    let mut courses: Vec<String> = roster
        .iter()
        .filter_map(|s| s.course.clone())
        .filter(|c| !c.trim().is_empty())
        .collect();
    courses.sort();
    courses.dedup();
    courses
}

/// Distinct semesters on the roster, numeric ones in numeric order.
pub fn roster_semesters(roster: &[Student]) -> Vec<String> {
    let mut semesters: Vec<String> = roster
        .iter()
        .filter_map(|s| s.semester.clone())
        .filter(|s| !s.trim().is_empty())
        .collect();
    semesters.sort_by_key(|s| (s.parse::<u32>().unwrap_or(u32::MAX), s.clone()));
    semesters.dedup();
    semesters
}

/// Type-ahead matches by name or email, skipping students already chosen.
pub fn suggest<'a>(
    roster: &'a [Student],
    query: &str,
    chosen: &RecipientList,
    limit: usize,
) -> Vec<&'a Student> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    roster
        .iter()
        .filter(|s| !chosen.contains(&s.email))
        .filter(|s| {
            s.display_name().to_lowercase().contains(&query)
                || s.email.to_lowercase().contains(&query)
        })
        .take(limit)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Please fill all required fields")]
    MissingFields,
}

/// A bulk email being composed. Discarded after sending or on navigation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkEmailDraft {
    pub recipients: RecipientList,
    pub subject: String,
    pub message: String,
    pub attachments: AttachmentSet,
}

impl BulkEmailDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the `emailData` payload.
    ///
    /// Recipients whose address belongs to a roster student go out as ids;
    /// everyone else as `{email, name}`. Empty groups are omitted.
    pub fn to_request(&self, roster: &[Student]) -> Result<BulkEmailRequest, DraftError> {
        let subject = self.subject.trim();
        let message = self.message.trim();
        if self.recipients.is_empty() || subject.is_empty() || message.is_empty() {
            return Err(DraftError::MissingFields);
        }

        let mut student_ids = Vec::new();
        let mut additional = Vec::new();
        for recipient in self.recipients.iter() {
            match roster.iter().find(|s| recipient.same_address(&s.email)) {
                Some(student) => {
                    if !student_ids.contains(&student.id) {
                        student_ids.push(student.id);
                    }
                }
                None => additional.push(recipient.clone()),
            }
        }

        Ok(BulkEmailRequest {
            student_ids: (!student_ids.is_empty()).then_some(student_ids),
            additional_recipients: (!additional.is_empty()).then_some(additional),
            subject: subject.to_string(),
            message: message.to_string(),
        })
    }

    /// Confirmation text shown after a successful send.
    pub fn sent_summary(&self) -> String {
        let recipients = self.recipients.len();
        let attachments = self.attachments.len();
        let mut summary = format!(
            "Email sent successfully to {recipients} recipient{}",
            plural(recipients)
        );
        if attachments > 0 {
            summary.push_str(&format!(
                " with {attachments} attachment{}",
                plural(attachments)
            ));
        }
        summary.push('!');
        summary
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::Attachment;

    fn jane() -> Recipient {
        Recipient::new("jane@x.com", Some("Jane Doe".to_string()))
    }

    #[test]
    fn test_parse_each_form() {
        assert_eq!(parse_recipient("Jane Doe <jane@x.com>"), Some(jane()));
        assert_eq!(parse_recipient("jane@x.com (Jane Doe)"), Some(jane()));
        assert_eq!(parse_recipient("Jane Doe jane@x.com"), Some(jane()));
        assert_eq!(
            parse_recipient("  jane@x.com  "),
            Some(Recipient::new("jane@x.com", None))
        );
    }

    #[test]
    fn test_parse_rejects_invalid_addresses() {
        assert_eq!(parse_recipient("not-an-email"), None);
        assert_eq!(parse_recipient(""), None);
        assert_eq!(parse_recipient("Jane <jane@x>"), None);
        assert_eq!(parse_recipient("jane@@x.com"), None);
        assert_eq!(parse_recipient("Jane Doe"), None);
    }

    #[test]
    fn test_parse_tight_spacing() {
        assert_eq!(parse_recipient("Jane Doe<jane@x.com>"), Some(jane()));
        assert_eq!(parse_recipient("jane@x.com(Jane Doe)"), Some(jane()));
    }

    #[test]
    fn test_list_drops_rejected_and_duplicates() {
        let mut list = RecipientList::new();
        assert_eq!(list.add_input("Jane Doe <jane@x.com>"), AddOutcome::Added);
        assert_eq!(list.add_input("JANE@x.com"), AddOutcome::Duplicate);
        assert_eq!(list.add_input("not-an-email"), AddOutcome::Rejected);
        assert_eq!(list.len(), 1);
        assert_eq!(list.iter().next(), Some(&jane()));

        assert!(list.remove("jane@X.com"));
        assert!(list.is_empty());
        assert!(!list.remove("jane@x.com"));
    }

    #[test]
    fn test_add_many() {
        let mut list = RecipientList::new();
        let outcomes = list.add_many("a@x.com, Bob <b@x.com>; nope\nc@x.com (Cee)");
        assert_eq!(
            outcomes,
            vec![
                AddOutcome::Added,
                AddOutcome::Added,
                AddOutcome::Rejected,
                AddOutcome::Added
            ]
        );
        assert_eq!(list.len(), 3);
    }

    fn roster() -> Vec<Student> {
        vec![Student {
            id: 11,
            full_name: Some("Priya Patel".into()),
            email: "SCFP11@mitvpu.ac.in".into(),
            ..Default::default()
        }]
    }

    fn class_roster() -> Vec<Student> {
        let student = |id: i64, name: &str, course: &str, semester: &str| Student {
            id,
            full_name: Some(name.into()),
            email: format!("SCFP{id}@mitvpu.ac.in"),
            course: Some(course.into()),
            semester: Some(semester.into()),
            ..Default::default()
        };
        vec![
            student(1, "Asha Rao", "MCA", "1"),
            student(2, "Ben Thomas", "MCA", "3"),
            student(3, "Chitra Iyer", "BCA", "1"),
            student(4, "Dev Shah", "MCA", "1"),
        ]
    }

    #[test]
    fn test_add_typed_keeps_unfinished_tail() {
        let mut list = RecipientList::new();

        let (outcomes, rest) = list.add_typed("jane@x.com, jo");
        assert_eq!(outcomes, vec![AddOutcome::Added]);
        assert_eq!(rest, "jo");
        assert_eq!(list.len(), 1);

        let (outcomes, rest) = list.add_typed("Bob <bob@x.com>,");
        assert_eq!(outcomes, vec![AddOutcome::Added]);
        assert_eq!(rest, "");

        let (outcomes, rest) = list.add_typed("still typing");
        assert!(outcomes.is_empty());
        assert_eq!(rest, "still typing");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_roster_filters() {
        let roster = class_roster();
        let ids = |list: Vec<&Student>| list.iter().map(|s| s.id).collect::<Vec<_>>();

        assert_eq!(ids(filter_roster(&roster, "", "")), vec![1, 2, 3, 4]);
        assert_eq!(ids(filter_roster(&roster, "MCA", "1")), vec![1, 4]);
        assert_eq!(ids(filter_roster(&roster, "", "1")), vec![1, 3, 4]);
        assert_eq!(roster_courses(&roster), vec!["BCA", "MCA"]);
        assert_eq!(roster_semesters(&roster), vec!["1", "3"]);
    }

    #[test]
    fn test_select_all_toggles_group() {
        let roster = class_roster();
        let mca_first = filter_roster(&roster, "MCA", "1");
        let mut list = RecipientList::new();
        list.add_input("SCFP1@mitvpu.ac.in");

        list.toggle_all(&mca_first);
        assert_eq!(list.len(), 2);
        assert!(list.contains_all(&mca_first));

        list.toggle_all(&mca_first);
        assert!(list.is_empty());
    }

    #[test]
    fn test_suggestions_skip_chosen_students() {
        let roster = class_roster();
        let mut list = RecipientList::new();
        assert!(suggest(&roster, "  ", &list, 5).is_empty());

        let names = |found: Vec<&Student>| {
            found.iter().map(|s| s.display_name().to_string()).collect::<Vec<_>>()
        };
        assert_eq!(names(suggest(&roster, "sh", &list, 5)), vec!["Asha Rao", "Dev Shah"]);

        list.add_student(&roster[0]);
        assert_eq!(names(suggest(&roster, "sh", &list, 5)), vec!["Dev Shah"]);
        assert_eq!(suggest(&roster, "scfp", &list, 2).len(), 2);
    }

    #[test]
    fn test_request_splits_known_and_ad_hoc_recipients() {
        let mut draft = BulkEmailDraft::new();
        draft.recipients.add_student(&roster()[0]);
        draft.recipients.add_input("jane@x.com (Jane Doe)");
        draft.subject = "  Demo day ".into();
        draft.message = "See you there".into();

        let request = draft.to_request(&roster()).unwrap();
        assert_eq!(request.student_ids, Some(vec![11]));
        assert_eq!(request.additional_recipients, Some(vec![jane()]));
        assert_eq!(request.subject, "Demo day");
    }

    #[test]
    fn test_typed_address_of_known_student_goes_by_id() {
        let mut draft = BulkEmailDraft::new();
        draft.recipients.add_input("scfp11@mitvpu.ac.in");
        draft.subject = "s".into();
        draft.message = "m".into();

        let request = draft.to_request(&roster()).unwrap();
        assert_eq!(request.student_ids, Some(vec![11]));
        assert_eq!(request.additional_recipients, None);
    }

    #[test]
    fn test_request_requires_all_fields() {
        let mut draft = BulkEmailDraft::new();
        draft.subject = "s".into();
        draft.message = "m".into();
        assert_eq!(draft.to_request(&[]), Err(DraftError::MissingFields));

        draft.recipients.add_input("a@x.com");
        draft.message = "   ".into();
        assert_eq!(draft.to_request(&[]), Err(DraftError::MissingFields));
    }

    #[test]
    fn test_sent_summary() {
        let mut draft = BulkEmailDraft::new();
        draft.recipients.add_input("a@x.com");
        assert_eq!(draft.sent_summary(), "Email sent successfully to 1 recipient!");

        draft.recipients.add_input("b@x.com");
        draft
            .attachments
            .stage(Attachment::new("notes.pdf", None, vec![0; 10]))
            .unwrap();
        assert_eq!(
            draft.sent_summary(),
            "Email sent successfully to 2 recipients with 1 attachment!"
        );

        draft.clear();
        assert!(draft.recipients.is_empty());
        assert!(draft.attachments.is_empty());
    }
}
