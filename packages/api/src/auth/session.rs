//! # Sessions and session-change notification
//!
//! [`SessionHub`] is the in-process source of truth for "who is signed in". It keeps
//! the current [`Session`] and a registry of listeners; every [`SessionEvent`]
//! published to it updates the session and is delivered to each listener.
//!
//! ## Subscriptions
//!
//! [`SessionHub::subscribe`] returns a [`Subscription`] guard. The listener stays
//! registered exactly as long as the guard lives: dropping it (or calling
//! [`Subscription::unsubscribe`]) removes the listener on every exit path, including
//! unwinding. A guard that outlives its hub does nothing when dropped.
//!
//! Listeners are invoked after the registry lock is released, so a listener may
//! itself subscribe, unsubscribe or read the current session.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::UserInfo;
use super::AuthError;

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub user: UserInfo,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Id of the owning identity.
    pub fn user_id(&self) -> &str {
        &self.user.id
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// A change in authentication state.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    SignedIn(Session),
    TokenRefreshed(Session),
    SignedOut,
}

impl SessionEvent {
    /// The session in effect after this event.
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionEvent::SignedIn(session) | SessionEvent::TokenRefreshed(session) => Some(session),
            SessionEvent::SignedOut => None,
        }
    }
}

/// Identity/session provider.
pub trait SessionProvider {
    fn current_session(&self) -> Option<Session>;

    /// Register `callback` for every future session change. The callback is
    /// released when the returned guard is dropped.
    fn on_session_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static;

    fn sign_out(&self) -> impl Future<Output = Result<(), AuthError>>;
}

type Listener = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

#[derive(Default)]
struct Registry {
    session: Option<Session>,
    listeners: Vec<(u64, Listener)>,
    next_id: u64,
}

/// In-process session state with change notification.
#[derive(Clone, Default)]
pub struct SessionHub {
    inner: Arc<Mutex<Registry>>,
}

impl std::fmt::Debug for SessionHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        f.debug_struct("SessionHub")
            .field("session", &registry.session)
            .field("listeners", &registry.listeners.len())
            .finish()
    }
}

/// Scoped registration of a session listener.
#[must_use = "dropping a Subscription unsubscribes its listener immediately"]
pub struct Subscription {
    registry: Weak<Mutex<Registry>>,
    id: u64,
}

impl Subscription {
    /// Release the listener now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            registry.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn current(&self) -> Option<Session> {
        self.registry().session.clone()
    }

    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        let mut registry = self.registry();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Arc::new(callback);
        registry.listeners.push((id, listener));
        Subscription {
            registry: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Record the event's session and notify every listener.
    pub fn publish(&self, event: SessionEvent) {
        let listeners: Vec<Listener> = {
            let mut registry = self.registry();
            registry.session = event.session().cloned();
            registry.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };
        tracing::debug!(?event, listeners = listeners.len(), "session changed");
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.registry().listeners.len()
    }
}

impl SessionProvider for SessionHub {
    fn current_session(&self) -> Option<Session> {
        self.current()
    }

    fn on_session_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&SessionEvent) + Send + Sync + 'static,
    {
        self.subscribe(callback)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.current().is_some() {
            self.publish(SessionEvent::SignedOut);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn session(id: &str) -> Session {
        Session {
            user: UserInfo {
                id: id.to_string(),
                email: Some(format!("{id}@example.com")),
            },
            access_token: format!("token-{id}"),
            refresh_token: None,
            expires_at: None,
        }
    }

    #[test]
    fn test_publish_updates_session_and_notifies() {
        let hub = SessionHub::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = hub.subscribe(move |event| {
            sink.lock().unwrap().push(event.session().map(|s| s.user_id().to_string()));
        });

        hub.publish(SessionEvent::SignedIn(session("u1")));
        assert_eq!(hub.current_session().unwrap().user_id(), "u1");
        hub.publish(SessionEvent::SignedOut);
        assert!(hub.current_session().is_none());

        assert_eq!(*seen.lock().unwrap(), vec![Some("u1".to_string()), None]);
    }

    #[test]
    fn test_dropping_subscription_releases_listener() {
        let hub = SessionHub::new();
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let counter = Arc::clone(&calls);
            let _sub = hub.on_session_change(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
            assert_eq!(hub.listener_count(), 1);
            hub.publish(SessionEvent::SignedIn(session("u1")));
        }

        assert_eq!(hub.listener_count(), 0);
        hub.publish(SessionEvent::SignedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_explicit_unsubscribe_leaves_others() {
        let hub = SessionHub::new();
        let first = hub.subscribe(|_| {});
        let _second = hub.subscribe(|_| {});
        assert_eq!(hub.listener_count(), 2);

        first.unsubscribe();
        assert_eq!(hub.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outliving_hub_is_inert() {
        let hub = SessionHub::new();
        let sub = hub.subscribe(|_| {});
        drop(hub);
        drop(sub);
    }

    #[test]
    fn test_listener_may_read_hub_during_notification() {
        let hub = SessionHub::new();
        let inner = hub.clone();
        let observed = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&observed);
        let _sub = hub.subscribe(move |_| {
            *sink.lock().unwrap() = inner.current().map(|s| s.user_id().to_string());
        });

        hub.publish(SessionEvent::SignedIn(session("u7")));
        assert_eq!(observed.lock().unwrap().as_deref(), Some("u7"));
    }

    #[tokio::test]
    async fn test_sign_out_clears_session_once() {
        let hub = SessionHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let _sub = hub.subscribe(move |event| {
            if event == &SessionEvent::SignedOut {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        hub.sign_out().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        hub.publish(SessionEvent::SignedIn(session("u1")));
        hub.sign_out().await.unwrap();
        assert!(hub.current_session().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_session_expiry() {
        let now = Utc::now();
        let mut s = session("u1");
        assert!(!s.is_expired(now));
        s.expires_at = Some(now - chrono::Duration::seconds(1));
        assert!(s.is_expired(now));
    }
}
