//! # Session resolver
//!
//! Turns whatever is in local storage into a [`SessionSnapshot`] the navbar
//! can render right away, then improves it with a profile fetch when the
//! stored data is incomplete.
//!
//! | Stored token | Stored user | Result |
//! |--------------|-------------|--------|
//! | none | - | logged out, `Student`/`STUDENT` |
//! | present | parses, has a name | ready from the stored user |
//! | present | parses, no name | provisional from the user, then profile fetch |
//! | present | missing or corrupt | provisional from token claims, then profile fetch |
//!
//! Resolution never fails. The worst case is the default name and role with
//! `is_logged_in` set.

use std::future::Future;

use store::{AccountStatus, KeyValueStore, Role, SessionEvent, SessionStore, StoredUser};

use crate::error::ApiError;
use crate::jwt::{decode_claims, name_from_email};
use crate::models::UserProfile;
use crate::validation::initials;

/// Placeholder name when nothing better is known.
pub const DEFAULT_USER_NAME: &str = "Student";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub is_logged_in: bool,
    pub user_name: String,
    pub user_role: Role,
    pub user_status: AccountStatus,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self::logged_out()
    }
}

impl SessionSnapshot {
    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            user_name: DEFAULT_USER_NAME.to_string(),
            user_role: Role::Student,
            user_status: AccountStatus::Active,
        }
    }

    /// Logged in, nothing else known.
    pub fn anonymous() -> Self {
        Self {
            is_logged_in: true,
            ..Self::logged_out()
        }
    }

    /// Built from a stored user. The name falls back to the email-derived one,
    /// then to [`DEFAULT_USER_NAME`].
    pub fn from_user(user: &StoredUser) -> Self {
        let user_name = user
            .display_name()
            .map(str::to_string)
            .or_else(|| user.email.as_deref().and_then(name_from_email))
            .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
        Self {
            is_logged_in: true,
            user_name,
            user_role: user.role_or_default(),
            user_status: user.status_or_default(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.is_logged_in && self.user_role.is_admin()
    }

    pub fn initials(&self) -> String {
        initials(&self.user_name, self.user_role)
    }

    /// Fold a bus event into the snapshot. A login without a user object
    /// reads what it can from the token.
    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::LoggedOut => *self = Self::logged_out(),
            SessionEvent::UserUpdated(user) => *self = Self::from_user(user),
            SessionEvent::LoggedIn {
                token,
                user: Some(user),
            } => *self = merge_with_token(user, token),
            SessionEvent::LoggedIn { token, user: None } => *self = snapshot_from_token(token),
        }
    }
}

/// Whether a bus event leaves the stored user without a name, so the profile
/// has to be fetched.
pub fn needs_profile(event: &SessionEvent) -> bool {
    match event {
        SessionEvent::LoggedIn { user, .. } => {
            user.as_ref().and_then(StoredUser::display_name).is_none()
        }
        SessionEvent::UserUpdated(_) | SessionEvent::LoggedOut => false,
    }
}

/// Where a fresh profile comes from. Implemented by [`crate::ApiClient`].
pub trait ProfileSource {
    fn fetch_profile(&self) -> impl Future<Output = Result<UserProfile, ApiError>>;
}

/// Outcome of the synchronous part of resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing more to do.
    Ready(SessionSnapshot),
    /// Render `provisional` now and call [`refresh`].
    NeedsProfile { provisional: SessionSnapshot },
}

impl Resolution {
    pub fn snapshot(&self) -> &SessionSnapshot {
        match self {
            Resolution::Ready(snapshot) => snapshot,
            Resolution::NeedsProfile { provisional } => provisional,
        }
    }
}

/// Resolve from storage alone. Never touches the network.
pub fn resolve_local<S: KeyValueStore>(session: &SessionStore<S>) -> Resolution {
    let Some(token) = session.token() else {
        return Resolution::Ready(SessionSnapshot::logged_out());
    };

    match session.load_user() {
        Ok(Some(user)) if user.display_name().is_some() => {
            Resolution::Ready(SessionSnapshot::from_user(&user))
        }
        Ok(Some(user)) => Resolution::NeedsProfile {
            provisional: merge_with_token(&user, &token),
        },
        Ok(None) => Resolution::NeedsProfile {
            provisional: snapshot_from_token(&token),
        },
        Err(e) => {
            tracing::warn!("discarding unreadable stored user: {e}");
            session.discard_user();
            Resolution::NeedsProfile {
                provisional: snapshot_from_token(&token),
            }
        }
    }
}

/// Fetch the profile and persist it. On failure the provisional snapshot
/// stands.
pub async fn refresh<S, P>(
    session: &SessionStore<S>,
    source: &P,
    provisional: SessionSnapshot,
) -> SessionSnapshot
where
    S: KeyValueStore,
    P: ProfileSource,
{
    match source.fetch_profile().await {
        Ok(profile) => {
            let mut user = profile.to_stored_user();
            if user.display_name().is_none() {
                let derived = user.email.as_deref().and_then(name_from_email);
                user.full_name = Some(derived.unwrap_or(provisional.user_name));
            }
            if let Err(e) = session.update_user(&user) {
                tracing::warn!("could not persist refreshed profile: {e}");
            }
            SessionSnapshot::from_user(&user)
        }
        Err(e) => {
            tracing::info!("profile fetch failed, keeping provisional session: {e}");
            provisional
        }
    }
}

/// Both steps back to back.
pub async fn resolve_session<S, P>(session: &SessionStore<S>, source: &P) -> SessionSnapshot
where
    S: KeyValueStore,
    P: ProfileSource,
{
    match resolve_local(session) {
        Resolution::Ready(snapshot) => snapshot,
        Resolution::NeedsProfile { provisional } => refresh(session, source, provisional).await,
    }
}

/// Read role and name hints from the token payload. A token that does not
/// decode yields [`SessionSnapshot::anonymous`].
pub fn snapshot_from_token(token: &str) -> SessionSnapshot {
    match decode_claims(token) {
        Ok(claims) => {
            let user_name = claims
                .display_name()
                .map(str::to_string)
                .or_else(|| claims.email_claim().and_then(name_from_email))
                .unwrap_or_else(|| DEFAULT_USER_NAME.to_string());
            SessionSnapshot {
                is_logged_in: true,
                user_name,
                user_role: claims.role.unwrap_or_default(),
                user_status: AccountStatus::Active,
            }
        }
        Err(e) => {
            tracing::debug!("token payload unreadable: {e}");
            SessionSnapshot::anonymous()
        }
    }
}

fn merge_with_token(user: &StoredUser, token: &str) -> SessionSnapshot {
    let mut snapshot = SessionSnapshot::from_user(user);
    if user.email.is_none() {
        snapshot.user_name = snapshot_from_token(token).user_name;
    }
    if user.role.is_none() {
        snapshot.user_role = snapshot_from_token(token).user_role;
    }
    snapshot
}

/// Verdict for an admin-only page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminGate {
    Allowed,
    /// Send to the login page.
    LoginRequired,
    /// Send back home.
    Denied,
}

impl AdminGate {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AdminGate::Allowed => None,
            AdminGate::LoginRequired => Some("Only Admin can access this page"),
            AdminGate::Denied => Some("Access Denied - Admin Only"),
        }
    }
}

/// Decide whether an admin-only page may render.
///
/// A stored role is authoritative for this check. Without one, the token's
/// role claim decides; a token that does not decode means logging in again.
/// The server enforces the real rule either way.
pub fn admin_gate<S: KeyValueStore>(session: &SessionStore<S>) -> AdminGate {
    let Some(token) = session.token() else {
        return AdminGate::LoginRequired;
    };

    if let Ok(Some(StoredUser { role: Some(role), .. })) = session.load_user() {
        return if role.is_admin() {
            AdminGate::Allowed
        } else {
            AdminGate::Denied
        };
    }

    match decode_claims(&token) {
        Ok(claims) => match claims.role {
            Some(Role::Student) => AdminGate::Denied,
            Some(Role::Admin) | None => AdminGate::Allowed,
        },
        Err(e) => {
            tracing::warn!("admin check could not read token: {e}");
            AdminGate::LoginRequired
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::tests::token_with;
    use std::cell::Cell;
    use store::{MemoryStore, USER_KEY};

    struct FakeProfiles {
        profile: Option<UserProfile>,
        calls: Cell<u32>,
    }

    impl FakeProfiles {
        fn answering(profile: UserProfile) -> Self {
            Self {
                profile: Some(profile),
                calls: Cell::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                profile: None,
                calls: Cell::new(0),
            }
        }
    }

    impl ProfileSource for FakeProfiles {
        async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
            self.calls.set(self.calls.get() + 1);
            self.profile.clone().ok_or(ApiError::Server {
                status: 500,
                message: "boom".into(),
            })
        }
    }

    fn session_with(token: Option<&str>, user: Option<&str>) -> SessionStore<MemoryStore> {
        let kv = MemoryStore::new();
        if let Some(token) = token {
            kv.set(store::TOKEN_KEY, token).unwrap();
        }
        if let Some(user) = user {
            kv.set(USER_KEY, user).unwrap();
        }
        SessionStore::new(kv)
    }

    #[tokio::test]
    async fn test_no_token_is_logged_out_without_fetching() {
        let session = session_with(None, Some(r#"{"fullName":"Ghost"}"#));
        let source = FakeProfiles::failing();

        let snapshot = resolve_session(&session, &source).await;
        assert_eq!(snapshot, SessionSnapshot::logged_out());
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_stored_name_is_used_directly() {
        let session = session_with(
            Some("tok"),
            Some(r#"{"fullName":"Jane Doe","role":"ADMIN","accountStatus":"SUSPENDED"}"#),
        );
        let source = FakeProfiles::failing();

        let snapshot = resolve_session(&session, &source).await;
        assert_eq!(snapshot.user_name, "Jane Doe");
        assert_eq!(snapshot.user_role, Role::Admin);
        assert_eq!(snapshot.user_status, AccountStatus::Suspended);
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_missing_name_is_fetched_and_persisted() {
        let session = session_with(Some("tok"), Some(r#"{"email":"jane@x.com"}"#));
        let source = FakeProfiles::answering(UserProfile {
            full_name: Some("Jane Doe".into()),
            email: Some("jane@x.com".into()),
            role: Some(Role::Student),
            ..Default::default()
        });
        let mut events = session.bus().subscribe();

        let snapshot = resolve_session(&session, &source).await;
        assert_eq!(snapshot.user_name, "Jane Doe");
        assert_eq!(
            session.load_user().unwrap().unwrap().full_name.as_deref(),
            Some("Jane Doe")
        );
        assert!(matches!(events.try_recv(), Some(SessionEvent::UserUpdated(_))));
    }

    #[tokio::test]
    async fn test_missing_name_and_failed_fetch_uses_email() {
        let session = session_with(Some("tok"), Some(r#"{"email":"SCFP12345@mitvpu.ac.in"}"#));
        let snapshot = resolve_session(&session, &FakeProfiles::failing()).await;
        assert_eq!(snapshot.user_name, "Scfp12345");
        assert!(snapshot.is_logged_in);
    }

    #[tokio::test]
    async fn test_profile_without_name_never_yields_empty_name() {
        let session = session_with(Some("tok"), None);
        let source = FakeProfiles::answering(UserProfile {
            full_name: Some("   ".into()),
            email: Some("john.smith@x.com".into()),
            ..Default::default()
        });

        let snapshot = resolve_session(&session, &source).await;
        assert_eq!(snapshot.user_name, "John Smith");

        let nameless = session_with(Some("tok"), None);
        let snapshot = resolve_session(
            &nameless,
            &FakeProfiles::answering(UserProfile::default()),
        )
        .await;
        assert_eq!(snapshot.user_name, DEFAULT_USER_NAME);
    }

    #[tokio::test]
    async fn test_no_user_falls_back_to_token_claims() {
        let token = token_with(r#"{"sub":"SCFP12345@mitvpu.ac.in","role":"ADMIN"}"#);
        let session = session_with(Some(&token), None);

        let snapshot = resolve_session(&session, &FakeProfiles::failing()).await;
        assert_eq!(snapshot.user_name, "Scfp12345");
        assert_eq!(snapshot.user_role, Role::Admin);
        assert_eq!(snapshot.user_status, AccountStatus::Active);
    }

    #[tokio::test]
    async fn test_corrupt_user_is_discarded() {
        let token = token_with(r#"{"fullName":"From Token"}"#);
        let session = session_with(Some(&token), Some("{not json"));

        match resolve_local(&session) {
            Resolution::NeedsProfile { provisional } => {
                assert_eq!(provisional.user_name, "From Token")
            }
            other => panic!("expected NeedsProfile, got {other:?}"),
        }
        assert_eq!(session.load_user().unwrap(), None);
        assert!(session.is_logged_in());
    }

    #[test]
    fn test_unparseable_token_defaults() {
        let snapshot = snapshot_from_token("h.%%%.s");
        assert!(snapshot.is_logged_in);
        assert_eq!(snapshot.user_name, "Student");
        assert_eq!(snapshot.user_role, Role::Student);
        assert_eq!(snapshot.user_status, AccountStatus::Active);
    }

    #[test]
    fn test_logout_resets_snapshot() {
        let session = session_with(Some("tok"), Some(r#"{"fullName":"Jane","role":"ADMIN"}"#));
        let mut snapshot = resolve_local(&session).snapshot().clone();
        let mut events = session.bus().subscribe();

        session.clear();
        assert!(session.token().is_none());
        assert_eq!(session.load_user().unwrap(), None);

        let event = events.try_recv().unwrap();
        snapshot.apply(&event);
        assert_eq!(snapshot, SessionSnapshot::logged_out());
    }

    #[test]
    fn test_user_updated_changes_name_without_reload() {
        let mut snapshot = SessionSnapshot::anonymous();
        snapshot.apply(&SessionEvent::UserUpdated(StoredUser {
            full_name: Some("Priya Patel".into()),
            ..Default::default()
        }));
        assert_eq!(snapshot.user_name, "Priya Patel");
        assert_eq!(snapshot.initials(), "PP");
    }

    #[test]
    fn test_login_without_user_reads_name_from_token() {
        let token = token_with(r#"{"sub":"SCFP12345@mitvpu.ac.in"}"#);
        let event = SessionEvent::LoggedIn { token, user: None };

        let mut snapshot = SessionSnapshot::logged_out();
        snapshot.apply(&event);
        assert!(snapshot.is_logged_in);
        assert_eq!(snapshot.user_name, "Scfp12345");
        assert!(needs_profile(&event));

        // Replaces a previous session's name rather than keeping it
        let mut stale = SessionSnapshot::from_user(&StoredUser {
            full_name: Some("Old User".into()),
            ..Default::default()
        });
        stale.apply(&event);
        assert_eq!(stale.user_name, "Scfp12345");
    }

    #[test]
    fn test_login_with_nameless_user_uses_token_role_and_fetches() {
        let token = token_with(r#"{"sub":"priya@x.com","role":"ADMIN"}"#);
        let event = SessionEvent::LoggedIn {
            token,
            user: Some(StoredUser {
                email: Some("priya.patel@x.com".into()),
                ..Default::default()
            }),
        };

        let mut snapshot = SessionSnapshot::logged_out();
        snapshot.apply(&event);
        assert_eq!(snapshot.user_name, "Priya Patel");
        assert_eq!(snapshot.user_role, Role::Admin);
        assert!(needs_profile(&event));
    }

    #[test]
    fn test_named_login_needs_no_fetch() {
        let event = SessionEvent::LoggedIn {
            token: "opaque".into(),
            user: Some(StoredUser {
                full_name: Some("Jane Doe".into()),
                ..Default::default()
            }),
        };
        let mut snapshot = SessionSnapshot::logged_out();
        snapshot.apply(&event);
        assert_eq!(snapshot.user_name, "Jane Doe");
        assert!(!needs_profile(&event));
        assert!(!needs_profile(&SessionEvent::LoggedOut));
    }

    #[tokio::test]
    async fn test_login_then_refresh_persists_fetched_name() {
        let session = session_with(None, None);
        let mut events = session.bus().subscribe();
        session.login(&token_with(r#"{"sub":"jane@x.com"}"#), None).unwrap();

        let event = events.try_recv().unwrap();
        let mut snapshot = SessionSnapshot::logged_out();
        snapshot.apply(&event);
        assert!(needs_profile(&event));

        let source = FakeProfiles::answering(UserProfile {
            full_name: Some("Jane Doe".into()),
            email: Some("jane@x.com".into()),
            ..Default::default()
        });
        let resolved = resolve_session(&session, &source).await;
        assert_eq!(resolved.user_name, "Jane Doe");
        assert_eq!(
            session.load_user().unwrap().unwrap().full_name.as_deref(),
            Some("Jane Doe")
        );

        snapshot.apply(&events.try_recv().unwrap());
        assert_eq!(snapshot, resolved);
    }

    #[test]
    fn test_admin_gate() {
        assert_eq!(admin_gate(&session_with(None, None)), AdminGate::LoginRequired);

        let stored_student = session_with(Some("tok"), Some(r#"{"role":"STUDENT"}"#));
        assert_eq!(admin_gate(&stored_student), AdminGate::Denied);

        let stored_admin = session_with(Some("tok"), Some(r#"{"role":"ADMIN"}"#));
        assert_eq!(admin_gate(&stored_admin), AdminGate::Allowed);

        let claims_admin = session_with(Some(&token_with(r#"{"role":"ROLE_ADMIN"}"#)), None);
        assert_eq!(admin_gate(&claims_admin), AdminGate::Allowed);

        let claims_student = session_with(Some(&token_with(r#"{"role":"STUDENT"}"#)), None);
        assert_eq!(admin_gate(&claims_student), AdminGate::Denied);

        let opaque = session_with(Some("opaque"), None);
        assert_eq!(admin_gate(&opaque), AdminGate::LoginRequired);
        assert_eq!(
            AdminGate::Denied.message(),
            Some("Access Denied - Admin Only")
        );
    }
}
