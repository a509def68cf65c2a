//! # Download-access state per project card
//!
//! ```text
//!            mount
//!              │
//!           Loading ──(no session)──▶ NotLoggedIn
//!              │
//!     server status
//!              ▼
//!   Owner | Approved | Pending | Rejected | NoRequest
//!                                  │          │
//!                                  └─request ok─▶ Pending
//! ```
//!
//! [`AccessTracker`] holds the state plus two guards:
//!
//! - an in-flight flag, so a second click while a request-access call is
//!   outstanding never reaches the network;
//! - a mount generation, so an access check that answers after the card was
//!   remounted (or unmounted and reused) is dropped instead of applied.
//!
//! `Pending` only leaves on remount; the server does not push status changes.

use std::future::Future;

use thiserror::Error;

use crate::error::ApiError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AccessState {
    #[default]
    Loading,
    NotLoggedIn,
    Owner,
    Approved,
    Pending,
    Rejected,
    NoRequest,
}

impl AccessState {
    /// Map a server status string. Unknown strings yield `None`.
    pub fn from_server(status: &str) -> Option<Self> {
        match status.trim().to_ascii_lowercase().as_str() {
            "owner" => Some(AccessState::Owner),
            "approved" => Some(AccessState::Approved),
            "pending" => Some(AccessState::Pending),
            "rejected" => Some(AccessState::Rejected),
            "no_request" | "none" => Some(AccessState::NoRequest),
            "not_logged_in" => Some(AccessState::NotLoggedIn),
            _ => None,
        }
    }

    pub fn can_download(&self) -> bool {
        matches!(self, AccessState::Owner | AccessState::Approved)
    }

    pub fn can_request(&self) -> bool {
        matches!(self, AccessState::Rejected | AccessState::NoRequest)
    }

    /// Button caption for this state.
    pub fn action_label(&self) -> &'static str {
        match self {
            AccessState::Loading => "Checking access...",
            AccessState::NotLoggedIn => "Login to Request Access",
            AccessState::Owner | AccessState::Approved => "Download Code",
            AccessState::Pending => "Request Pending",
            AccessState::Rejected => "Request Again",
            AccessState::NoRequest => "Request Access",
        }
    }
}

/// Why a request-access click did not turn into a network call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RequestBlocked {
    #[error("Please login to request download access")]
    LoginRequired,
    #[error("A request is already being sent")]
    InFlight,
    #[error("Access status is still loading")]
    StillLoading,
    #[error("You already have access to this project")]
    AlreadyGranted,
    #[error("Your request is awaiting approval")]
    AlreadyPending,
}

/// Proof that [`AccessTracker::begin_request`] succeeded; hand it back to
/// [`AccessTracker::finish_request`].
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub struct RequestTicket {
    generation: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessTracker {
    state: AccessState,
    in_flight: bool,
    generation: u64,
}

impl AccessTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    pub fn is_requesting(&self) -> bool {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start a new mount: back to `Loading`, older responses invalidated.
    /// Returns the generation the access check must present to [`Self::resolve`].
    pub fn mount(&mut self) -> u64 {
        self.generation += 1;
        self.state = AccessState::Loading;
        self.in_flight = false;
        self.generation
    }

    /// Apply the outcome of an access check.
    ///
    /// Ignored (returns `false`) when it belongs to an older mount or the state
    /// already left `Loading`.
    pub fn resolve(&mut self, generation: u64, state: AccessState) -> bool {
        if generation != self.generation || self.state != AccessState::Loading {
            tracing::debug!(generation, current = self.generation, "dropping stale access check");
            return false;
        }
        self.state = if state == AccessState::Loading {
            AccessState::NoRequest
        } else {
            state
        };
        true
    }

    /// Claim the single request slot for this card.
    pub fn begin_request(&mut self) -> Result<RequestTicket, RequestBlocked> {
        if self.in_flight {
            return Err(RequestBlocked::InFlight);
        }
        match self.state {
            AccessState::Rejected | AccessState::NoRequest => {
                self.in_flight = true;
                Ok(RequestTicket {
                    generation: self.generation,
                })
            }
            AccessState::NotLoggedIn => Err(RequestBlocked::LoginRequired),
            AccessState::Loading => Err(RequestBlocked::StillLoading),
            AccessState::Owner | AccessState::Approved => Err(RequestBlocked::AlreadyGranted),
            AccessState::Pending => Err(RequestBlocked::AlreadyPending),
        }
    }

    /// Release the request slot. Success moves to `Pending`; failure leaves the
    /// state as it was so the user can retry.
    pub fn finish_request(&mut self, ticket: RequestTicket, succeeded: bool) {
        if ticket.generation != self.generation {
            return;
        }
        self.in_flight = false;
        if succeeded && self.state.can_request() {
            self.state = AccessState::Pending;
        }
    }
}

/// Where access status comes from. Implemented by [`crate::ApiClient`].
pub trait AccessSource {
    fn check_access(
        &self,
        project_id: i64,
    ) -> impl Future<Output = Result<AccessState, ApiError>>;

    fn request_access(
        &self,
        project_id: i64,
        message: &str,
    ) -> impl Future<Output = Result<(), ApiError>>;
}

/// Run the mount-time access check.
///
/// Without a session the answer is `NotLoggedIn` and the server is not asked.
/// A failed check degrades to `NoRequest`.
pub async fn check_on_mount<A: AccessSource>(
    source: &A,
    logged_in: bool,
    project_id: i64,
) -> AccessState {
    if !logged_in {
        return AccessState::NotLoggedIn;
    }
    match source.check_access(project_id).await {
        Ok(state) => state,
        Err(e) => {
            tracing::warn!(project_id, "access check failed: {e}");
            AccessState::NoRequest
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_every_mount_starts_loading() {
        let mut tracker = AccessTracker::new();
        assert_eq!(tracker.state(), AccessState::Loading);

        let generation = tracker.mount();
        assert!(tracker.resolve(generation, AccessState::Approved));
        assert_eq!(tracker.state(), AccessState::Approved);

        tracker.mount();
        assert_eq!(tracker.state(), AccessState::Loading);
    }

    #[test]
    fn test_granted_states_never_regress_without_remount() {
        let mut tracker = AccessTracker::new();
        let generation = tracker.mount();
        tracker.resolve(generation, AccessState::Owner);

        // A second, late answer for the same mount is ignored
        assert!(!tracker.resolve(generation, AccessState::NoRequest));
        assert_eq!(tracker.state(), AccessState::Owner);

        assert_eq!(tracker.begin_request(), Err(RequestBlocked::AlreadyGranted));
        assert_eq!(tracker.state(), AccessState::Owner);
        assert!(tracker.state().can_download());
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut tracker = AccessTracker::new();
        let old = tracker.mount();
        let current = tracker.mount();

        assert!(!tracker.resolve(old, AccessState::Approved));
        assert_eq!(tracker.state(), AccessState::Loading);
        assert!(tracker.resolve(current, AccessState::Rejected));
        assert_eq!(tracker.state(), AccessState::Rejected);
    }

    #[test]
    fn test_request_moves_to_pending_on_success() {
        let mut tracker = AccessTracker::new();
        let generation = tracker.mount();
        tracker.resolve(generation, AccessState::NoRequest);

        let ticket = tracker.begin_request().unwrap();
        assert!(tracker.is_requesting());
        assert_eq!(tracker.begin_request(), Err(RequestBlocked::InFlight));

        tracker.finish_request(ticket, true);
        assert_eq!(tracker.state(), AccessState::Pending);
        assert!(!tracker.is_requesting());
        assert_eq!(tracker.begin_request(), Err(RequestBlocked::AlreadyPending));
    }

    #[test]
    fn test_failed_request_leaves_state_for_retry() {
        let mut tracker = AccessTracker::new();
        let generation = tracker.mount();
        tracker.resolve(generation, AccessState::Rejected);

        let ticket = tracker.begin_request().unwrap();
        tracker.finish_request(ticket, false);
        assert_eq!(tracker.state(), AccessState::Rejected);
        assert!(tracker.begin_request().is_ok());
    }

    #[test]
    fn test_not_logged_in_and_loading_block_requests() {
        let mut tracker = AccessTracker::new();
        let generation = tracker.mount();
        assert_eq!(tracker.begin_request(), Err(RequestBlocked::StillLoading));

        tracker.resolve(generation, AccessState::NotLoggedIn);
        assert_eq!(tracker.begin_request(), Err(RequestBlocked::LoginRequired));
    }

    #[test]
    fn test_ticket_from_previous_mount_does_not_touch_new_mount() {
        let mut tracker = AccessTracker::new();
        let generation = tracker.mount();
        tracker.resolve(generation, AccessState::NoRequest);
        let ticket = tracker.begin_request().unwrap();

        tracker.mount();
        tracker.finish_request(ticket, true);
        assert_eq!(tracker.state(), AccessState::Loading);
    }

    #[test]
    fn test_server_status_strings() {
        assert_eq!(AccessState::from_server("OWNER"), Some(AccessState::Owner));
        assert_eq!(AccessState::from_server("no_request"), Some(AccessState::NoRequest));
        assert_eq!(AccessState::from_server("not_logged_in"), Some(AccessState::NotLoggedIn));
        assert_eq!(AccessState::from_server("???"), None);
    }

    /// Counts calls and yields once before answering, so two submissions can
    /// interleave.
    struct CountingSource {
        requests: Cell<u32>,
        status: AccessState,
    }

    impl AccessSource for CountingSource {
        async fn check_access(&self, _project_id: i64) -> Result<AccessState, ApiError> {
            Ok(self.status)
        }

        async fn request_access(&self, _project_id: i64, _message: &str) -> Result<(), ApiError> {
            self.requests.set(self.requests.get() + 1);
            tokio::task::yield_now().await;
            Ok(())
        }
    }

    async fn click_request(tracker: &RefCell<AccessTracker>, source: &CountingSource) {
        let ticket = match tracker.borrow_mut().begin_request() {
            Ok(ticket) => ticket,
            Err(_) => return,
        };
        let result = source.request_access(1, "").await;
        tracker.borrow_mut().finish_request(ticket, result.is_ok());
    }

    #[tokio::test]
    async fn test_double_click_sends_one_request() {
        let source = CountingSource {
            requests: Cell::new(0),
            status: AccessState::NoRequest,
        };
        let tracker = RefCell::new(AccessTracker::new());
        let generation = tracker.borrow_mut().mount();
        let state = check_on_mount(&source, true, 1).await;
        tracker.borrow_mut().resolve(generation, state);

        tokio::join!(click_request(&tracker, &source), click_request(&tracker, &source));

        assert_eq!(source.requests.get(), 1);
        assert_eq!(tracker.borrow().state(), AccessState::Pending);
    }

    #[tokio::test]
    async fn test_check_without_session_skips_server() {
        let source = CountingSource {
            requests: Cell::new(0),
            status: AccessState::Approved,
        };
        assert_eq!(check_on_mount(&source, false, 1).await, AccessState::NotLoggedIn);
        assert_eq!(check_on_mount(&source, true, 1).await, AccessState::Approved);
    }
}
