//! Session context and hooks for the UI.

use std::ops::Deref;
use std::sync::Arc;

use api::{Session, SessionState};
use dioxus::prelude::*;

/// Shared handle to the process-wide [`Session`].
#[derive(Clone)]
pub struct SessionHandle(Arc<Session>);

impl SessionHandle {
    pub fn new(session: Session) -> Self {
        Self(Arc::new(session))
    }
}

impl Deref for SessionHandle {
    type Target = Session;

    fn deref(&self) -> &Session {
        &self.0
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Get the current session state.
/// Returns a signal that updates on every sign-in, sign-out and error.
pub fn use_auth() -> Signal<SessionState> {
    use_context::<Signal<SessionState>>()
}

/// Get the session to run auth operations against.
pub fn use_session() -> SessionHandle {
    use_context::<SessionHandle>()
}

/// Provider component that publishes the session to the tree.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(session: SessionHandle, children: Element) -> Element {
    let mut auth_state = use_signal(|| session.state());
    use_context_provider(|| auth_state);
    let provided = session.clone();
    use_context_provider(move || provided);

    // Mirror session changes into the signal
    let watched = session.clone();
    use_future(move || {
        let session = watched.clone();
        async move {
            let mut changes = session.subscribe();
            auth_state.set(changes.borrow_and_update().clone());
            while changes.changed().await.is_ok() {
                auth_state.set(changes.borrow_and_update().clone());
            }
        }
    });

    // Check for an existing session on mount
    use_future(move || {
        let session = session.clone();
        async move { session.initialize().await }
    });

    rsx! {
        {children}
    }
}

/// Button to sign the current user out.
#[component]
pub fn SignOutButton(
    #[props(default = "Sign Out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let session = use_session();
    let mut loading = use_signal(|| false);

    let onclick = move |_| {
        let session = session.clone();
        async move {
            loading.set(true);
            if let Err(e) = session.sign_out().await {
                tracing::error!("Failed to sign out: {}", e);
            }
            loading.set(false);
        }
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick: onclick,
            if loading() {
                "Signing out..."
            } else {
                "{label}"
            }
        }
    }
}
