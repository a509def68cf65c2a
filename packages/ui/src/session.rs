//! Session context and hooks for the UI.
//!
//! [`SessionProvider`] opens the platform store once, renders immediately from
//! whatever storage holds, and finishes resolution (profile fetch) in the
//! background. Views read the result through [`use_session`].

use api::session::{admin_gate, needs_profile, refresh, resolve_local, Resolution};
use api::{AdminGate, ApiClient, SessionSnapshot};
use dioxus::prelude::*;
use store::{ClientConfig, SessionStore, StoreError, StoredUser};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStore = store::LocalStorageStore;
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type PlatformStore = store::MemoryStore;
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformStore = store::FileStore;

/// Create the platform-appropriate session store.
///
/// - **Web** (WASM + `web` feature): browser `localStorage`
/// - **Native**: one file per key under `<data_dir>/studenthub/`
/// - **WASM without `web`**: in-memory, nothing survives a reload
pub fn make_store() -> SessionStore<PlatformStore> {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        SessionStore::new(store::LocalStorageStore::new())
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        SessionStore::new(store::MemoryStore::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("studenthub");
        SessionStore::new(store::FileStore::new(base))
    }
}

/// Shared session handle provided by [`SessionProvider`].
#[derive(Clone)]
pub struct SessionContext {
    store: SessionStore<PlatformStore>,
    config: ClientConfig,
    snapshot: Signal<SessionSnapshot>,
}

impl SessionContext {
    /// Current snapshot. Reading it subscribes the calling component.
    pub fn snapshot(&self) -> SessionSnapshot {
        (self.snapshot)()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore<PlatformStore> {
        &self.store
    }

    /// A client carrying the currently stored token.
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.config).with_token(self.store.token())
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    pub fn admin_gate(&self) -> AdminGate {
        admin_gate(&self.store)
    }

    /// Persist a fresh login. A user object without a name is completed by a
    /// profile fetch that [`SessionProvider`] runs, so it survives the caller
    /// navigating away.
    pub fn sign_in(&self, token: &str, user: Option<&StoredUser>) -> Result<(), StoreError> {
        self.store.login(token, user)
    }

    /// Re-resolve from storage, fetching the profile when needed.
    pub async fn refresh_profile(&self) {
        let resolved = match resolve_local(&self.store) {
            Resolution::Ready(snapshot) => snapshot,
            Resolution::NeedsProfile { provisional } => {
                refresh(&self.store, &self.client(), provisional).await
            }
        };
        let mut snapshot = self.snapshot;
        snapshot.set(resolved);
    }

    /// Store a profile the user just edited.
    pub fn update_user(&self, user: &StoredUser) {
        if let Err(e) = self.store.update_user(user) {
            tracing::warn!("could not store updated profile: {e}");
        }
    }

    /// Tell the server (best effort), then clear local state.
    pub async fn logout(&self) {
        self.client().logout().await;
        self.store.clear();
        let mut snapshot = self.snapshot;
        snapshot.set(SessionSnapshot::logged_out());
    }
}

/// Get the session context.
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
}

/// A REST client for the current session.
pub fn use_api() -> ApiClient {
    use_session().client()
}

/// Provider component that resolves and tracks the session.
/// Wrap the router with this component.
#[component]
pub fn SessionProvider(children: Element) -> Element {
    let session = use_hook(make_store);
    let config = use_hook(ClientConfig::from_env);
    let resolution = use_hook({
        let session = session.clone();
        move || resolve_local(&session)
    });
    let snapshot = use_signal({
        let initial = resolution.snapshot().clone();
        move || initial
    });

    let ctx = use_context_provider(|| SessionContext {
        store: session.clone(),
        config: config.clone(),
        snapshot,
    });

    // Complete resolution without blocking the first render
    let refresh_ctx = ctx.clone();
    use_future(move || {
        let ctx = refresh_ctx.clone();
        let resolution = resolution.clone();
        async move {
            if let Resolution::NeedsProfile { provisional } = resolution {
                let resolved = refresh(&ctx.store, &ctx.client(), provisional).await;
                let mut snapshot = ctx.snapshot;
                snapshot.set(resolved);
            }
        }
    });

    // Follow logins, profile edits and logouts from anywhere in the app.
    // Profile fetches are spawned here so they belong to this scope.
    let bus_ctx = ctx.clone();
    use_future(move || {
        let ctx = bus_ctx.clone();
        async move {
            let mut events = ctx.store.bus().subscribe();
            let mut snapshot = ctx.snapshot;
            while let Some(event) = events.recv().await {
                snapshot.write().apply(&event);
                if needs_profile(&event) {
                    tracing::debug!("signed in without a name, fetching profile");
                    let ctx = ctx.clone();
                    spawn(async move { ctx.refresh_profile().await });
                }
            }
        }
    });

    rsx! {
        {children}
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
    #[props(default)] onlogout: EventHandler<()>,
) -> Element {
    let session = use_session();

    let onclick = move |_| {
        let session = session.clone();
        async move {
            session.logout().await;
            onlogout.call(());
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
