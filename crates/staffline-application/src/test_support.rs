//! Stub gateways shared by the use case tests.

use async_trait::async_trait;
use serde_json::{Value, json};
use staffline_core::gateway::{
    AlertGateway, AuthGateway, BulkUpdate, DashboardGateway, DashboardStats, EmailGateway,
    EmailReceipt, EmailRequest, ImportGateway, ImportSummary, ListQuery, LoginResponse,
    MatchingGateway, RecordGateway, SignupRequest, SpecialtyGateway,
};
use staffline_core::overlay::{EntityKind, Record, record_id};
use staffline_core::scope::MemoryScope;
use staffline_core::session::{SessionStore, UserProfile};
use staffline_core::{Result, StafflineError};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn memory_store() -> SessionStore {
    SessionStore::new(Arc::new(MemoryScope::new()), Arc::new(MemoryScope::new()))
}

pub fn profile() -> UserProfile {
    UserProfile {
        first_name: Some("Ada".into()),
        last_name: Some("Lovelace".into()),
        ..UserProfile::with_email("ada@ats.io")
    }
}

pub fn record(value: Value) -> Record {
    value.as_object().cloned().unwrap()
}

/// Auth endpoints that either accept everything or fail with one error.
pub struct StubAuth {
    outcome: std::result::Result<String, StafflineError>,
}

impl StubAuth {
    pub fn accepting(token: &str) -> Self {
        Self {
            outcome: Ok(token.to_string()),
        }
    }

    pub fn rejecting(error: StafflineError) -> Self {
        Self {
            outcome: Err(error),
        }
    }
}

#[async_trait]
impl AuthGateway for StubAuth {
    async fn login(&self, _email: &str, _password: &str) -> Result<LoginResponse> {
        let token = self.outcome.clone()?;
        Ok(LoginResponse {
            access_token: token,
            token_type: Some("bearer".into()),
            user: profile(),
        })
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Value> {
        self.outcome.clone()?;
        Ok(json!({ "email": request.email }))
    }

    async fn current_user(&self, _token: &str) -> Result<UserProfile> {
        self.outcome.clone()?;
        Ok(profile())
    }
}

/// In-memory stand-in for every data endpoint.
///
/// Records are seeded per kind; operations named in `failing` return the
/// configured error. Every call is recorded by name.
#[derive(Default)]
pub struct StubApi {
    pub records: Mutex<HashMap<EntityKind, Vec<Record>>>,
    pub failing: Mutex<HashSet<&'static str>>,
    pub calls: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<ListQuery>>,
    pub emails: Mutex<Vec<EmailRequest>>,
    pub uploads: Mutex<Vec<(EntityKind, String, usize)>>,
    pub stats: DashboardStats,
}

impl StubApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(self, kind: EntityKind, records: Vec<Value>) -> Self {
        self.records
            .lock()
            .unwrap()
            .insert(kind, records.into_iter().map(record).collect());
        self
    }

    pub fn failing_on(self, operation: &'static str) -> Self {
        self.failing.lock().unwrap().insert(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, operation: &'static str, detail: impl Into<String>) -> Result<()> {
        let detail = detail.into();
        self.calls.lock().unwrap().push(if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{operation} {detail}")
        });
        if self.failing.lock().unwrap().contains(operation) {
            return Err(StafflineError::api(500, format!("{operation} failed")));
        }
        Ok(())
    }

    fn stored(&self, kind: EntityKind) -> Vec<Record> {
        self.records
            .lock()
            .unwrap()
            .get(&kind)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordGateway for StubApi {
    async fn list(&self, kind: EntityKind, query: &ListQuery) -> Result<Vec<Record>> {
        self.enter("list", kind.collection())?;
        self.queries.lock().unwrap().push(query.clone());
        let mut records = self.stored(kind);
        if let Some(status) = &query.status {
            records.retain(|r| r.get("status").and_then(Value::as_str) == Some(status));
        }
        if let Some(is_read) = query.is_read {
            records.retain(|r| r.get("is_read").and_then(Value::as_bool) == Some(is_read));
        }
        Ok(records)
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record> {
        self.enter("get", format!("{} {}", kind.collection(), id))?;
        self.stored(kind)
            .into_iter()
            .find(|r| record_id(kind, r).as_deref() == Some(id))
            .ok_or_else(|| StafflineError::api(404, "Not found"))
    }

    async fn create(&self, kind: EntityKind, mut record: Record) -> Result<Record> {
        self.enter("create", kind.collection())?;
        record.insert("id".into(), json!(format!("NEW-{}", kind)));
        self.records
            .lock()
            .unwrap()
            .entry(kind)
            .or_default()
            .push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl AlertGateway for StubApi {
    async fn list_alerts(&self, is_read: Option<bool>) -> Result<Vec<Record>> {
        let query = ListQuery {
            is_read,
            ..ListQuery::default()
        };
        self.list(EntityKind::Alert, &query).await
    }

    async fn mark_read(&self, alert_id: &str) -> Result<()> {
        self.enter("mark_read", alert_id)
    }

    async fn mark_unread(&self, alert_id: &str) -> Result<()> {
        self.enter("mark_unread", alert_id)
    }

    async fn mark_all_unread(&self) -> Result<BulkUpdate> {
        self.enter("mark_all_unread", "")?;
        Ok(BulkUpdate {
            message: "Marked all alerts as unread".into(),
            count: self.stored(EntityKind::Alert).len() as u64,
        })
    }
}

#[async_trait]
impl DashboardGateway for StubApi {
    async fn stats(&self) -> Result<DashboardStats> {
        self.enter("stats", "")?;
        Ok(self.stats.clone())
    }

    async fn ending_assignments(&self, days: u32) -> Result<Vec<Record>> {
        self.enter("ending_assignments", days.to_string())?;
        Ok(self.stored(EntityKind::Assignment))
    }
}

#[async_trait]
impl MatchingGateway for StubApi {
    async fn matches_for_job(&self, job_id: &str, min_score: u32) -> Result<Vec<Record>> {
        self.enter("matches_for_job", format!("{job_id} {min_score}"))?;
        Ok(self.stored(EntityKind::Match))
    }

    async fn matches_for_candidate(
        &self,
        candidate_id: &str,
        min_score: u32,
    ) -> Result<Vec<Record>> {
        self.enter("matches_for_candidate", format!("{candidate_id} {min_score}"))?;
        Ok(self.stored(EntityKind::Match))
    }

    async fn ending_assignments_with_matches(&self, days: Option<u32>) -> Result<Vec<Record>> {
        let detail = days.map(|d| d.to_string()).unwrap_or_default();
        self.enter("ending_assignments_with_matches", detail)?;
        Ok(self.stored(EntityKind::Assignment))
    }
}

#[async_trait]
impl ImportGateway for StubApi {
    async fn import(
        &self,
        kind: EntityKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportSummary> {
        self.enter("import", kind.collection())?;
        self.uploads
            .lock()
            .unwrap()
            .push((kind, file_name.to_string(), bytes.len()));
        Ok(ImportSummary {
            imported: 2,
            skipped: 1,
            errors: vec!["Row 3: missing email".into()],
        })
    }
}

#[async_trait]
impl EmailGateway for StubApi {
    async fn send_to_candidate(&self, request: &EmailRequest) -> Result<EmailReceipt> {
        self.enter("send_to_candidate", request.to_email.clone())?;
        self.emails.lock().unwrap().push(request.clone());
        Ok(EmailReceipt {
            success: true,
            message: format!("Email sent to {}", request.to_email),
        })
    }
}

#[async_trait]
impl SpecialtyGateway for StubApi {
    async fn specialties(&self, kind: EntityKind) -> Result<Vec<String>> {
        self.enter("specialties", kind.collection())?;
        Ok(vec!["ER".into(), "ICU".into()])
    }
}
