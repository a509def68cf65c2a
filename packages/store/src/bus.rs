//! Typed publish/subscribe channel for session changes.
//!
//! Components subscribe explicitly instead of listening for untyped window
//! events. Publishing with no subscribers is fine; a subscriber that falls too
//! far behind skips the missed events and keeps going.

use tokio::sync::broadcast;

use crate::models::StoredUser;

const DEFAULT_CAPACITY: usize = 16;

/// A change to the persisted session.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// A token was stored; `user` is the accompanying user object, if any.
    LoggedIn {
        token: String,
        user: Option<StoredUser>,
    },
    /// The stored user object was refreshed (profile fetch or profile edit).
    UserUpdated(StoredUser),
    /// Token and user were cleared.
    LoggedOut,
}

#[derive(Clone, Debug)]
pub struct SessionBus {
    tx: broadcast::Sender<SessionEvent>,
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SessionBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn publish(&self, event: SessionEvent) {
        // An error only means nobody is listening right now.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription {
            rx: self.tx.subscribe(),
        }
    }
}

pub struct SessionSubscription {
    rx: broadcast::Receiver<SessionEvent>,
}

impl SessionSubscription {
    /// Wait for the next event. Returns `None` once every bus handle is gone.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("session subscriber lagged, skipped {missed} events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next event if one is already queued.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in() -> SessionEvent {
        SessionEvent::LoggedIn {
            token: "a.b.c".into(),
            user: None,
        }
    }

    #[tokio::test]
    async fn test_subscribers_receive_in_order() {
        let bus = SessionBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(logged_in());
        bus.publish(SessionEvent::LoggedOut);

        assert_eq!(first.recv().await, Some(logged_in()));
        assert_eq!(first.recv().await, Some(SessionEvent::LoggedOut));
        assert_eq!(second.try_recv(), Some(logged_in()));
        assert_eq!(second.try_recv(), Some(SessionEvent::LoggedOut));
        assert_eq!(second.try_recv(), None);
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let bus = SessionBus::default();
        bus.publish(SessionEvent::LoggedOut);

        // Late subscribers do not see earlier events
        let mut late = bus.subscribe();
        assert_eq!(late.try_recv(), None);
    }

    #[test]
    fn test_lagging_subscriber_skips_ahead() {
        let bus = SessionBus::new(2);
        let mut sub = bus.subscribe();
        for _ in 0..5 {
            bus.publish(SessionEvent::LoggedOut);
        }
        bus.publish(logged_in());

        let mut last = None;
        while let Some(event) = sub.try_recv() {
            last = Some(event);
        }
        assert_eq!(last, Some(logged_in()));
    }
}
