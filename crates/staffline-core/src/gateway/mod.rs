//! External API contract.
//!
//! # Module Structure
//!
//! - `model`: request/response payloads
//! - `traits`: one async trait per endpoint group

mod model;
mod traits;

pub use model::{
    AlertStats, AssignmentStats, BulkUpdate, CandidateStats, DashboardStats, EmailReceipt,
    EmailRequest, ImportSummary, JobStats, ListQuery, LoginResponse, SignupRequest,
};
pub use traits::{
    AlertGateway, AuthGateway, DashboardGateway, EmailGateway, ImportGateway, MatchingGateway,
    RecordGateway, SpecialtyGateway,
};
