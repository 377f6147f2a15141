//! Session Store: the single answer to "is there a usable credential right now".
//!
//! Reads look in the durable scope first and fall back to the tab scope.
//! Read failures never escape this type; they degrade to "no session".

use super::model::{
    DEFAULT_SESSION_MAX_AGE_DAYS, LOGIN_TIME_KEY, MILLIS_PER_DAY, REMEMBER_ME_KEY, SESSION_KEYS,
    StoredSession, TOKEN_KEY, USER_KEY, UserProfile,
};
use crate::error::Result;
use crate::scope::{ScopeKind, ScopeStorage};
use std::sync::Arc;

/// Token and profile persistence over the durable and tab scopes.
#[derive(Clone)]
pub struct SessionStore {
    durable: Arc<dyn ScopeStorage>,
    tab: Arc<dyn ScopeStorage>,
    max_age_days: u32,
}

impl SessionStore {
    /// Creates a store with the default 30-day absolute session lifetime.
    pub fn new(durable: Arc<dyn ScopeStorage>, tab: Arc<dyn ScopeStorage>) -> Self {
        Self {
            durable,
            tab,
            max_age_days: DEFAULT_SESSION_MAX_AGE_DAYS,
        }
    }

    /// Overrides the absolute session lifetime.
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = days;
        self
    }

    pub fn max_age_days(&self) -> u32 {
        self.max_age_days
    }

    /// Returns the backing scope of the given kind.
    pub fn scope(&self, kind: ScopeKind) -> &Arc<dyn ScopeStorage> {
        match kind {
            ScopeKind::Durable => &self.durable,
            ScopeKind::Tab => &self.tab,
        }
    }

    /// Writes token, profile, remember-me flag and login time into the scope
    /// selected by `remember_me`. The other scope is left untouched.
    ///
    /// If the write fails, whatever was partially written is removed again so
    /// token and profile never exist without each other.
    pub fn persist(&self, token: &str, user: &UserProfile, remember_me: bool) -> Result<()> {
        self.persist_at(token, user, remember_me, now_millis())
    }

    /// Same as [`persist`](Self::persist) with an explicit login time.
    pub fn persist_at(
        &self,
        token: &str,
        user: &UserProfile,
        remember_me: bool,
        login_time_ms: i64,
    ) -> Result<()> {
        let kind = ScopeKind::for_remember_me(remember_me);
        let scope = self.scope(kind);
        let user_json = serde_json::to_string(user)?;

        let items = [
            (TOKEN_KEY, token.to_string()),
            (USER_KEY, user_json),
            (REMEMBER_ME_KEY, remember_me.to_string()),
            (LOGIN_TIME_KEY, login_time_ms.to_string()),
        ];

        if let Err(e) = scope.set_items(&items) {
            tracing::warn!(scope = ?kind, error = %e, "Failed to persist session, rolling back");
            if let Err(rollback) = scope.remove_items(&SESSION_KEYS) {
                tracing::warn!(scope = ?kind, error = %rollback, "Failed to roll back session keys");
            }
            return Err(e);
        }

        tracing::info!(scope = ?kind, remember_me, "Session persisted");
        Ok(())
    }

    /// Returns the stored profile, or `None` when absent or unparseable.
    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "Stored user profile is not valid JSON");
                None
            }
        }
    }

    /// Returns the stored bearer token.
    pub fn current_token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    /// Returns the recorded login time in epoch milliseconds, if parseable.
    pub fn login_time(&self) -> Option<i64> {
        self.read(LOGIN_TIME_KEY)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }

    /// True when remember-me was chosen and the session sits in the durable scope.
    pub fn is_remembered(&self) -> bool {
        read_scope(self.durable.as_ref(), REMEMBER_ME_KEY, ScopeKind::Durable).as_deref()
            == Some("true")
    }

    /// Checks liveness and enforces the absolute lifetime.
    ///
    /// Without a token the session is not live. A session older than the
    /// maximum age is cleared from both scopes. A session without a recorded
    /// login time is considered live.
    pub fn is_live(&self) -> bool {
        self.is_live_at(now_millis())
    }

    /// Same as [`is_live`](Self::is_live) evaluated at `now_ms`.
    pub fn is_live_at(&self, now_ms: i64) -> bool {
        if self.current_token().is_none() {
            return false;
        }

        let Some(login_time) = self.login_time() else {
            return true;
        };

        let days_since_login = (now_ms - login_time) as f64 / MILLIS_PER_DAY as f64;
        if days_since_login > f64::from(self.max_age_days) {
            tracing::info!(
                days_since_login,
                max_age_days = self.max_age_days,
                "Login expired, clearing session"
            );
            self.clear();
            return false;
        }

        true
    }

    /// Snapshot of the active session, if a token is stored.
    pub fn load(&self) -> Option<StoredSession> {
        let token = self.current_token()?;
        let remember_me = self.read(REMEMBER_ME_KEY).as_deref() == Some("true");
        Some(StoredSession {
            token,
            user: self.current_user(),
            remember_me,
            login_time: self.login_time(),
        })
    }

    /// Removes every session key from both scopes, whichever was used at login.
    pub fn clear(&self) {
        for kind in [ScopeKind::Durable, ScopeKind::Tab] {
            if let Err(e) = self.scope(kind).remove_items(&SESSION_KEYS) {
                tracing::warn!(scope = ?kind, error = %e, "Failed to clear session keys");
            }
        }
        tracing::info!("Session cleared");
    }

    fn read(&self, key: &str) -> Option<String> {
        read_scope(self.durable.as_ref(), key, ScopeKind::Durable)
            .or_else(|| read_scope(self.tab.as_ref(), key, ScopeKind::Tab))
    }
}

fn read_scope(scope: &dyn ScopeStorage, key: &str, kind: ScopeKind) -> Option<String> {
    match scope.get_item(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            tracing::warn!(scope = ?kind, key, error = %e, "Storage read failed");
            None
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
