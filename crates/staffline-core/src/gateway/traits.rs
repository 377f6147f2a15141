//! Gateway traits for the external ATS API.
//!
//! The application layer depends only on these traits. The HTTP
//! implementation lives in `staffline-interaction`; tests supply stubs.

use super::model::{
    BulkUpdate, DashboardStats, EmailReceipt, EmailRequest, ImportSummary, ListQuery,
    LoginResponse, SignupRequest,
};
use crate::error::Result;
use crate::overlay::{EntityKind, Record};
use crate::session::UserProfile;
use async_trait::async_trait;
use serde_json::Value;

/// Authentication endpoints.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// `POST /auth/login` with form-encoded credentials.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;

    /// `POST /auth/signup`. Returns the created-account payload.
    async fn signup(&self, request: &SignupRequest) -> Result<Value>;

    /// `GET /auth/me` for an explicit bearer token.
    async fn current_user(&self, token: &str) -> Result<UserProfile>;
}

/// Generic list/read/create over entity collections.
#[async_trait]
pub trait RecordGateway: Send + Sync {
    /// `GET /<collection>` returning the named array of the envelope.
    async fn list(&self, kind: EntityKind, query: &ListQuery) -> Result<Vec<Record>>;

    /// `GET /<collection>/<id>`.
    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record>;

    /// `POST /<collection>` returning the created record.
    async fn create(&self, kind: EntityKind, record: Record) -> Result<Record>;
}

/// Alert read-state mutations.
#[async_trait]
pub trait AlertGateway: Send + Sync {
    /// `GET /alerts`, optionally filtered by read state.
    async fn list_alerts(&self, is_read: Option<bool>) -> Result<Vec<Record>>;

    async fn mark_read(&self, alert_id: &str) -> Result<()>;

    async fn mark_unread(&self, alert_id: &str) -> Result<()>;

    async fn mark_all_unread(&self) -> Result<BulkUpdate>;
}

/// Dashboard summary endpoints.
#[async_trait]
pub trait DashboardGateway: Send + Sync {
    async fn stats(&self) -> Result<DashboardStats>;

    /// Active assignments ending within `days` days.
    async fn ending_assignments(&self, days: u32) -> Result<Vec<Record>>;
}

/// Precomputed match scores. This client never scores anything itself.
#[async_trait]
pub trait MatchingGateway: Send + Sync {
    async fn matches_for_job(&self, job_id: &str, min_score: u32) -> Result<Vec<Record>>;

    async fn matches_for_candidate(&self, candidate_id: &str, min_score: u32)
    -> Result<Vec<Record>>;

    async fn ending_assignments_with_matches(&self, days: Option<u32>) -> Result<Vec<Record>>;
}

/// Bulk file import.
#[async_trait]
pub trait ImportGateway: Send + Sync {
    async fn import(&self, kind: EntityKind, file_name: &str, bytes: Vec<u8>)
    -> Result<ImportSummary>;
}

/// Outbound email to candidates.
#[async_trait]
pub trait EmailGateway: Send + Sync {
    async fn send_to_candidate(&self, request: &EmailRequest) -> Result<EmailReceipt>;
}

/// Specialty vocabularies used to populate filters.
#[async_trait]
pub trait SpecialtyGateway: Send + Sync {
    async fn specialties(&self, kind: EntityKind) -> Result<Vec<String>>;
}
