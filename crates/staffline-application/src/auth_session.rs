//! Auth Session Controller.
//!
//! Holds the in-memory view of "who is signed in" for one client process
//! and keeps it consistent with the [`SessionStore`]. Every forced logout
//! (a 401 seen by the API client) goes through the same path as a user
//! logout.

use staffline_core::Result;
use staffline_core::gateway::{AuthGateway, LoginResponse, SignupRequest};
use staffline_core::session::{SessionEvent, SessionStore, UserProfile};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio::task::JoinHandle;

/// Snapshot of the controller state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub is_authenticated: bool,
    /// True until [`AuthSession::initialize`] has finished.
    pub loading: bool,
    /// Set when the server invalidated the session, cleared by the next login.
    pub invalidated: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            loading: true,
            invalidated: false,
        }
    }
}

impl AuthState {
    pub fn phase(&self) -> AuthPhase {
        if self.loading {
            AuthPhase::Unknown
        } else if self.is_authenticated {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }
}

/// Coarse authentication state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    /// Stored session not checked yet.
    Unknown,
    Anonymous,
    Authenticated,
}

/// Login, logout and session restore for one client process.
#[derive(Clone)]
pub struct AuthSession {
    store: SessionStore,
    gateway: Arc<dyn AuthGateway>,
    state: Arc<RwLock<AuthState>>,
}

impl AuthSession {
    pub fn new(store: SessionStore, gateway: Arc<dyn AuthGateway>) -> Self {
        Self {
            store,
            gateway,
            state: Arc::new(RwLock::new(AuthState::default())),
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> AuthState {
        self.read().clone()
    }

    pub fn phase(&self) -> AuthPhase {
        self.read().phase()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    /// Restores a stored session.
    ///
    /// Authenticated only when both a profile and a live token are stored;
    /// otherwise the in-memory state is anonymous. `loading` ends false on
    /// every path.
    pub fn initialize(&self) {
        let _done = LoadingGuard { state: &self.state };

        let user = self.store.current_user();
        let live = self.store.is_live();

        let mut state = self.write();
        match user {
            Some(user) if live => {
                tracing::info!("Session restored from storage");
                state.user = Some(user);
                state.is_authenticated = true;
            }
            _ => {
                tracing::info!("No saved login found");
                state.user = None;
                state.is_authenticated = false;
            }
        }
    }

    /// Logs in and persists the session into the scope chosen by `remember_me`.
    ///
    /// A rejected login leaves the in-memory state alone, so an existing
    /// session survives a failed attempt. Once the server accepts, any earlier
    /// session is cleared from both scopes first; if the new one then cannot
    /// be stored the controller ends up logged out. The error's display text
    /// is the message to show the user.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginResponse> {
        let response = self.gateway.login(email, password).await.inspect_err(|e| {
            tracing::info!("Login rejected: {}", e);
        })?;

        // The new login decides the scope; nothing of the previous one may shadow it.
        self.store.clear();
        if let Err(e) = self
            .store
            .persist(&response.access_token, &response.user, remember_me)
        {
            self.logout();
            return Err(e);
        }

        let mut state = self.write();
        state.user = Some(response.user.clone());
        state.is_authenticated = true;
        state.invalidated = false;
        drop(state);

        tracing::info!(remember_me, "User logged in");
        Ok(response)
    }

    /// Creates an account. Never signs in.
    pub async fn signup(&self, request: &SignupRequest) -> Result<serde_json::Value> {
        let created = self.gateway.signup(request).await?;
        tracing::info!("Signup successful, user needs to login");
        Ok(created)
    }

    /// Clears both storage scopes and the in-memory state. No API call.
    pub fn logout(&self) {
        self.store.clear();
        let mut state = self.write();
        state.user = None;
        state.is_authenticated = false;
    }

    /// Checks the stored token against `GET /auth/me`.
    ///
    /// A rejected token clears the session. A network failure leaves the
    /// session alone and reports `false`.
    pub async fn verify_token(&self) -> bool {
        let Some(token) = self.store.current_token() else {
            return false;
        };

        match self.gateway.current_user(&token).await {
            Ok(_) => true,
            Err(e) if e.is_transport() => {
                tracing::warn!("Token verification failed: {}", e);
                false
            }
            Err(e) => {
                tracing::info!("Stored token rejected ({}), logging out", e);
                self.logout();
                false
            }
        }
    }

    /// Reacts to an event raised by the API client.
    pub fn on_session_event(&self, event: SessionEvent) {
        match event {
            SessionEvent::Invalidated => {
                let was_authenticated = self.is_authenticated();
                self.logout();
                self.write().invalidated = true;
                if was_authenticated {
                    tracing::info!("Session invalidated by the server");
                }
            }
        }
    }

    /// Applies events already queued on `events` without waiting.
    ///
    /// Returns true if at least one event was applied.
    pub fn drain_session_events(&self, events: &mut broadcast::Receiver<SessionEvent>) -> bool {
        let mut applied = false;
        loop {
            match events.try_recv() {
                Ok(event) => {
                    self.on_session_event(event);
                    applied = true;
                }
                Err(TryRecvError::Lagged(_)) => {
                    self.on_session_event(SessionEvent::Invalidated);
                    applied = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return applied,
            }
        }
    }

    /// Subscribes once and applies every event until the channel closes.
    pub fn spawn_invalidation_watcher(
        &self,
        mut events: broadcast::Receiver<SessionEvent>,
    ) -> JoinHandle<()> {
        let session = self.clone();
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => session.on_session_event(event),
                    // Only one kind of event exists, so missing some changes nothing.
                    Err(RecvError::Lagged(_)) => {
                        session.on_session_event(SessionEvent::Invalidated)
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            tracing::debug!("Session event channel closed");
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Ends the loading phase when dropped, including during unwinding.
struct LoadingGuard<'a> {
    state: &'a RwLock<AuthState>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .loading = false;
    }
}
