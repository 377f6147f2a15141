//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: stored session keys and the cached user profile
//! - `store`: [`SessionStore`], token persistence over two storage scopes
//! - `event`: events broadcast when the server invalidates a session

mod event;
mod model;
mod store;

pub use event::SessionEvent;
pub use model::{
    DEFAULT_SESSION_MAX_AGE_DAYS, LOGIN_TIME_KEY, MILLIS_PER_DAY, REMEMBER_ME_KEY, SESSION_KEYS,
    StoredSession, TOKEN_KEY, USER_KEY, UserProfile,
};
pub use store::{SessionStore, now_millis};
