//! Authentication context and hooks for the UI.

use std::cell::RefCell;
use std::rc::Rc;

use api::{Session, SessionProvider, UserInfo};
use dioxus::prelude::*;
use futures::StreamExt;

use crate::backend::use_backend;
use crate::notices::{notify, use_notices, NoticeLevel};

/// Authentication state for the application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
}

impl AuthState {
    fn from_session(session: Option<&Session>) -> Self {
        Self {
            user: session.map(|s| s.user.clone()),
        }
    }

    /// Id of the owning identity, if signed in.
    pub fn user_id(&self) -> Option<String> {
        self.user.as_ref().map(|u| u.id.clone())
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user signs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

/// Provider component that mirrors the backend session into `Signal<AuthState>`.
///
/// Session changes may arrive at any time (token refresh, sign-out from another
/// view). The subscription is held for as long as the provider is mounted and
/// released when it unmounts.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let backend = use_backend();
    let mut auth_state = use_signal(|| {
        let backend = backend.peek();
        let session = backend.auth.current_session();
        backend
            .store
            .set_access_token(session.as_ref().map(|s| s.access_token.clone()));
        AuthState::from_session(session.as_ref())
    });

    let events = use_coroutine(move |mut rx: UnboundedReceiver<Option<Session>>| async move {
        while let Some(session) = rx.next().await {
            auth_state.set(AuthState::from_session(session.as_ref()));
        }
    });

    let subscription = use_hook(move || {
        let tx = events.tx();
        let backend = backend.peek();
        let store = backend.store.clone();
        let subscription = backend.auth.on_session_change(move |event| {
            let session = event.session().cloned();
            store.set_access_token(session.as_ref().map(|s| s.access_token.clone()));
            let _ = tx.unbounded_send(session);
        });
        Rc::new(RefCell::new(Some(subscription)))
    });

    use_drop(move || {
        if let Some(subscription) = subscription.borrow_mut().take() {
            subscription.unsubscribe();
        }
    });

    use_context_provider(|| auth_state);

    rsx! {
        {children}
    }
}

/// Button to sign out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    on_signed_out: EventHandler<()>,
) -> Element {
    let backend = use_backend();
    let mut notices = use_notices();

    let onclick = move |_| async move {
        let auth = backend().auth;
        if let Err(e) = auth.sign_out().await {
            notify(&mut notices, NoticeLevel::Warning, &format!("Signed out locally: {e}"));
        }
        on_signed_out.call(());
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
