//! Session domain models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key for the JSON-serialized [`UserProfile`].
pub const USER_KEY: &str = "user";
/// Storage key for the remember-me flag (`"true"` / `"false"`).
pub const REMEMBER_ME_KEY: &str = "rememberMe";
/// Storage key for the login timestamp in epoch milliseconds.
pub const LOGIN_TIME_KEY: &str = "loginTime";

/// Every key owned by a session. `clear` removes all of them from both scopes.
pub const SESSION_KEYS: [&str; 4] = [TOKEN_KEY, USER_KEY, REMEMBER_ME_KEY, LOGIN_TIME_KEY];

/// Milliseconds in one day.
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Absolute session lifetime counted from login, independent of the server TTL.
pub const DEFAULT_SESSION_MAX_AGE_DAYS: u32 = 30;

/// Last-known profile of the signed-in recruiter.
///
/// The server is loose about which name fields it fills in, so all of them
/// are optional. Unknown fields are kept so a stored profile round-trips.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Profile carrying only an email address.
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Name shown in headers and prompts.
    ///
    /// Fallback chain: first + last name, then `name`, then the local part
    /// of the email, then `"User"`.
    pub fn display_name(&self) -> String {
        if let (Some(first), Some(last)) = (non_empty(&self.first_name), non_empty(&self.last_name))
        {
            return format!("{} {}", first, last);
        }
        if let Some(name) = non_empty(&self.name) {
            return name.to_string();
        }
        if let Some(email) = non_empty(&self.email) {
            let local = email.split('@').next().unwrap_or(email);
            if !local.is_empty() {
                return local.to_string();
            }
        }
        "User".to_string()
    }

    /// Upper-case initials for an avatar badge.
    ///
    /// Follows the same chain as [`display_name`](Self::display_name):
    /// first + last initials, then the first and last word of `name`, then
    /// the first letter of the email, then `"U"`.
    pub fn initials(&self) -> String {
        if let (Some(first), Some(last)) = (non_empty(&self.first_name), non_empty(&self.last_name))
        {
            return upper_initials(&[first, last]);
        }
        if let Some(name) = non_empty(&self.name) {
            let words: Vec<&str> = name.split_whitespace().collect();
            match words.as_slice() {
                [] => {}
                [only] => return upper_initials(&[*only]),
                [first, .., last] => return upper_initials(&[*first, *last]),
            }
        }
        if let Some(email) = non_empty(&self.email) {
            return upper_initials(&[email]);
        }
        "U".to_string()
    }

    /// Email for display, or a placeholder.
    pub fn display_email(&self) -> &str {
        non_empty(&self.email).unwrap_or("No email")
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn upper_initials(words: &[&str]) -> String {
    words
        .iter()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// A session as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user: Option<UserProfile>,
    pub remember_me: bool,
    pub login_time: Option<i64>,
}
