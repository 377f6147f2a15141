//! Application layer for Staffline.
//!
//! This crate provides the auth session controller, the route guard and the
//! per-screen use cases. Everything here depends on the gateway traits from
//! `staffline-core`, never on the HTTP client directly.

pub mod alert_usecase;
pub mod auth_session;
pub mod candidate_usecase;
pub mod dashboard_usecase;
pub mod email_usecase;
pub mod import_usecase;
pub mod job_usecase;
pub mod matching_usecase;
pub mod record_usecase;
pub mod route_guard;

#[cfg(test)]
mod test_support;

pub use alert_usecase::AlertUseCase;
pub use auth_session::{AuthPhase, AuthSession, AuthState};
pub use candidate_usecase::CandidateUseCase;
pub use dashboard_usecase::{DashboardUseCase, DashboardView};
pub use email_usecase::EmailUseCase;
pub use import_usecase::ImportUseCase;
pub use job_usecase::JobUseCase;
pub use matching_usecase::MatchingUseCase;
pub use record_usecase::RecordUseCase;
pub use route_guard::{GuardDecision, RouteGuard};
