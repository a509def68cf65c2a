use std::sync::OnceLock;

use regex::Regex;
use store::Role;

/// Special characters that satisfy the "special character" password rule.
pub const PASSWORD_SPECIALS: &str = "!@#$%^&*(),.?\":{}|<>";

pub const MIN_PASSWORD_LEN: usize = 8;

/// Student logins use the college address, e.g. `SCFP12345@mitvpu.ac.in`.
pub fn is_college_email(email: &str) -> bool {
    static COLLEGE_EMAIL: OnceLock<Regex> = OnceLock::new();
    let regex = COLLEGE_EMAIL.get_or_init(|| {
        Regex::new(r"^SCFP\d+@mitvpu\.ac\.in$").expect("Failed to compile college email regex")
    });
    regex.is_match(email.trim())
}

/// Individual password rules, as shown in the checklist under the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordStrength {
    pub length: bool,
    pub uppercase: bool,
    pub lowercase: bool,
    pub number: bool,
    pub special: bool,
}

impl PasswordStrength {
    pub fn check(password: &str) -> Self {
        Self {
            length: password.chars().count() >= MIN_PASSWORD_LEN,
            uppercase: password.chars().any(|c| c.is_ascii_uppercase()),
            lowercase: password.chars().any(|c| c.is_ascii_lowercase()),
            number: password.chars().any(|c| c.is_ascii_digit()),
            special: password.chars().any(|c| PASSWORD_SPECIALS.contains(c)),
        }
    }

    pub fn score(&self) -> u8 {
        [
            self.length,
            self.uppercase,
            self.lowercase,
            self.number,
            self.special,
        ]
        .into_iter()
        .filter(|ok| *ok)
        .count() as u8
    }

    pub fn is_strong(&self) -> bool {
        self.score() == 5
    }

    /// `(label, satisfied)` pairs in display order.
    pub fn rules(&self) -> [(&'static str, bool); 5] {
        [
            ("At least 8 characters", self.length),
            ("One uppercase letter", self.uppercase),
            ("One lowercase letter", self.lowercase),
            ("One number", self.number),
            ("One special character", self.special),
        ]
    }

    pub fn label(&self) -> &'static str {
        match self.score() {
            0..=2 => "Weak",
            3..=4 => "Medium",
            _ => "Strong",
        }
    }
}

/// Avatar initials: first letter of up to two name parts, uppercased.
///
/// An empty name or the placeholder "Student" falls back to `S`, or `A` for
/// admins.
pub fn initials(name: &str, role: Role) -> String {
    let name = name.trim();
    if name.is_empty() || name == crate::session::DEFAULT_USER_NAME {
        return if role.is_admin() { "A" } else { "S" }.to_string();
    }
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}
