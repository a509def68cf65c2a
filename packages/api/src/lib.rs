//! # API crate: StudentHub REST client and client-side rules
//!
//! Everything here is platform-neutral and free of UI code, so the web crate
//! and the unit tests share one implementation.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`ApiClient`]: every REST endpoint, bearer auth, response/error handling |
//! | [`models`] | wire types for the server's camelCase JSON |
//! | [`error`] | [`ApiError`] and the error-body message extraction |
//! | [`session`] | turns stored token/user into a [`SessionSnapshot`]; admin page guard |
//! | [`jwt`] | unverified token payload decoding, email-derived names |
//! | [`access`] | per-card download-access state machine with in-flight and stale-response guards |
//! | [`activity`] | admin activity log filters and the statistics digest |
//! | [`recipients`] | bulk email recipient parsing, [`BulkEmailDraft`] |
//! | [`attachments`] | attachment validation and staging |
//! | [`browse`] | gallery filter/sort and search query parameters |
//! | [`validation`] | college email, password strength, avatar initials |

pub mod access;
pub mod activity;
pub mod attachments;
pub mod browse;
pub mod client;
pub mod error;
pub mod jwt;
pub mod models;
pub mod recipients;
pub mod session;
pub mod validation;

pub use access::{AccessSource, AccessState, AccessTracker, RequestBlocked};
pub use activity::{ActivityDigest, ActivityFilter};
pub use attachments::{Attachment, AttachmentError, AttachmentSet};
pub use browse::{ProjectQuery, SortOrder};
pub use client::ApiClient;
pub use error::ApiError;
pub use recipients::{BulkEmailDraft, DraftError, Recipient, RecipientList};
pub use session::{AdminGate, ProfileSource, SessionSnapshot};

pub use store::{AccountStatus, ClientConfig, Role, StoredUser};
