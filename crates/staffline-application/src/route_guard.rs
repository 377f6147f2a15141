//! Access decision for protected views.

use crate::auth_session::{AuthPhase, AuthState};

/// Notice shown on the login view after a forced logout.
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please login again.";

/// What a protected view should do for the current auth state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// The stored session has not been checked yet.
    Wait,
    /// Send the user to login, optionally with a notice.
    Redirect { notice: Option<&'static str> },
    Allow,
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn decide(state: &AuthState) -> GuardDecision {
        match state.phase() {
            AuthPhase::Unknown => GuardDecision::Wait,
            AuthPhase::Authenticated => GuardDecision::Allow,
            AuthPhase::Anonymous => GuardDecision::Redirect {
                notice: state.invalidated.then_some(SESSION_EXPIRED_NOTICE),
            },
        }
    }
}
