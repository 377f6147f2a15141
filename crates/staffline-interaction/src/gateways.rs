//! Gateway trait implementations for [`ApiClient`].

use crate::api_client::{ApiClient, Credentials, REQUEST_FAILED};
use crate::envelope::{extract_list, extract_strings, unwrap_created};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use staffline_core::gateway::{
    AlertGateway, AuthGateway, BulkUpdate, DashboardGateway, DashboardStats, EmailGateway,
    EmailReceipt, EmailRequest, ImportGateway, ImportSummary, ListQuery, LoginResponse,
    MatchingGateway, RecordGateway, SignupRequest, SpecialtyGateway,
};
use staffline_core::overlay::{EntityKind, Record};
use staffline_core::session::UserProfile;
use staffline_core::{Result, StafflineError};

const LOGIN_FAILED: &str = "Login failed";
const SIGNUP_FAILED: &str = "Signup failed";

fn require(supported: bool, kind: EntityKind, operation: &str) -> Result<()> {
    if supported {
        Ok(())
    } else {
        Err(StafflineError::unsupported(format!(
            "{} is not available for {}",
            operation,
            kind.collection()
        )))
    }
}

/// The ending-soon route reads `days`; anything else falls back to its default.
fn ending_soon_query(days: u32) -> [(&'static str, String); 1] {
    [("days", days.to_string())]
}

fn decode<T: serde::de::DeserializeOwned>(body: Value) -> Result<T> {
    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let request = self
            .http()
            .post(self.url("/auth/login"))
            .form(&[("username", email), ("password", password)]);
        let body = self
            .execute(request, Credentials::Anonymous, LOGIN_FAILED)
            .await?;
        decode(body)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Value> {
        let request = self.http().post(self.url("/auth/signup")).json(request);
        self.execute(request, Credentials::Anonymous, SIGNUP_FAILED)
            .await
    }

    async fn current_user(&self, token: &str) -> Result<UserProfile> {
        let request = self.http().get(self.url("/auth/me"));
        let body = self
            .execute(request, Credentials::Explicit(token), REQUEST_FAILED)
            .await?;
        decode(body)
    }
}

#[async_trait]
impl RecordGateway for ApiClient {
    async fn list(&self, kind: EntityKind, query: &ListQuery) -> Result<Vec<Record>> {
        require(kind.supports_list(), kind, "Listing")?;
        let path = format!("/{}", kind.collection());
        let body = self.get_json(&path, &query.to_pairs()).await?;
        extract_list(body, kind.collection())
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record> {
        require(kind.supports_get(), kind, "Detail view")?;
        let path = format!("/{}/{}", kind.collection(), id);
        match self.get_json(&path, &[]).await? {
            Value::Object(record) => Ok(record),
            _ => Err(StafflineError::not_found(kind.collection(), id)),
        }
    }

    async fn create(&self, kind: EntityKind, record: Record) -> Result<Record> {
        require(kind.supports_create(), kind, "Create")?;
        let path = format!("/{}", kind.collection());
        let body = self.post_json(&path, &record).await?;
        unwrap_created(body, kind.as_ref())
    }
}

#[async_trait]
impl AlertGateway for ApiClient {
    async fn list_alerts(&self, is_read: Option<bool>) -> Result<Vec<Record>> {
        let query = ListQuery {
            is_read,
            ..ListQuery::default()
        };
        self.list(EntityKind::Alert, &query).await
    }

    async fn mark_read(&self, alert_id: &str) -> Result<()> {
        self.put_empty(&format!("/alerts/{}/read", alert_id)).await?;
        Ok(())
    }

    async fn mark_unread(&self, alert_id: &str) -> Result<()> {
        self.put_empty(&format!("/alerts/{}/unread", alert_id))
            .await?;
        Ok(())
    }

    async fn mark_all_unread(&self) -> Result<BulkUpdate> {
        decode(self.put_empty("/alerts/unread-all").await?)
    }
}

#[async_trait]
impl DashboardGateway for ApiClient {
    async fn stats(&self) -> Result<DashboardStats> {
        decode(self.get_json("/dashboard/stats", &[]).await?)
    }

    async fn ending_assignments(&self, days: u32) -> Result<Vec<Record>> {
        let body = self
            .get_json("/assignments/ending-soon", &ending_soon_query(days))
            .await?;
        extract_list(body, "assignments")
    }
}

#[async_trait]
impl MatchingGateway for ApiClient {
    async fn matches_for_job(&self, job_id: &str, min_score: u32) -> Result<Vec<Record>> {
        let body = self
            .get_json(
                &format!("/matching/job/{}", job_id),
                &[("min_score", min_score.to_string())],
            )
            .await?;
        extract_list(body, "matches")
    }

    async fn matches_for_candidate(
        &self,
        candidate_id: &str,
        min_score: u32,
    ) -> Result<Vec<Record>> {
        let body = self
            .get_json(
                &format!("/matching/candidate/{}", candidate_id),
                &[("min_score", min_score.to_string())],
            )
            .await?;
        extract_list(body, "matches")
    }

    async fn ending_assignments_with_matches(&self, days: Option<u32>) -> Result<Vec<Record>> {
        let query: Vec<(&str, String)> = days.map(|d| ("days", d.to_string())).into_iter().collect();
        let body = self
            .get_json("/matching/ending-assignments", &query)
            .await?;
        extract_list(body, "ending_assignments")
    }
}

#[async_trait]
impl ImportGateway for ApiClient {
    async fn import(
        &self,
        kind: EntityKind,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<ImportSummary> {
        require(kind.supports_import(), kind, "Import")?;

        let mime = mime_guess::from_path(file_name).first_or_octet_stream();
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime.essence_str())
            .map_err(|e| StafflineError::internal(format!("Invalid upload type: {e}")))?;
        let form = Form::new().part("file", part);

        tracing::info!("[ApiClient] Importing {} from {}", kind.collection(), file_name);

        let request = self
            .http()
            .post(self.url(&format!("/import/{}", kind.collection())))
            .multipart(form);
        let body = self
            .execute(request, Credentials::Stored, REQUEST_FAILED)
            .await?;
        decode(body)
    }
}

#[async_trait]
impl EmailGateway for ApiClient {
    async fn send_to_candidate(&self, request: &EmailRequest) -> Result<EmailReceipt> {
        let body = self.post_json("/email/send-to-candidate", request).await?;
        decode(body)
    }
}

#[async_trait]
impl SpecialtyGateway for ApiClient {
    async fn specialties(&self, kind: EntityKind) -> Result<Vec<String>> {
        require(kind.supports_specialties(), kind, "Specialty list")?;
        let body = self
            .get_json(&format!("/specialties/{}", kind.collection()), &[])
            .await?;
        extract_strings(body, "specialties")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::CannedServer;
    use staffline_core::config::ClientConfig;
    use staffline_core::scope::MemoryScope;
    use staffline_core::session::SessionStore;
    use std::sync::Arc;

    fn client() -> ApiClient {
        client_at(&ClientConfig::default().api_base_url).0
    }

    fn client_at(base: &str) -> (ApiClient, SessionStore) {
        let store = SessionStore::new(Arc::new(MemoryScope::new()), Arc::new(MemoryScope::new()));
        let config = ClientConfig {
            api_base_url: base.to_string(),
            ..ClientConfig::default()
        };
        (ApiClient::new(&config, store.clone()).unwrap(), store)
    }

    #[test]
    fn test_ending_soon_query_uses_days() {
        assert_eq!(ending_soon_query(14), [("days", "14".to_string())]);
    }

    #[tokio::test]
    async fn test_ending_assignments_sends_configured_days() {
        let mut server =
            CannedServer::start(vec![(200, r#"{"assignments":[{"id":3}],"total":1}"#)]).await;
        let (api, _) = client_at(&server.base_url);

        let ending = api.ending_assignments(45).await.unwrap();

        assert_eq!(ending.len(), 1);
        let request = server.next_request().await;
        assert!(request.starts_with("get /api/assignments/ending-soon?days=45 "));
    }

    #[tokio::test]
    async fn test_login_is_form_encoded_and_anonymous() {
        let mut server = CannedServer::start(vec![
            (401, r#"{"detail":"Incorrect email or password"}"#),
            (
                200,
                r#"{"access_token":"NEW","token_type":"bearer","user":{"email":"b@x.io"}}"#,
            ),
        ])
        .await;
        let (api, store) = client_at(&server.base_url);
        store
            .persist("OLD", &UserProfile::with_email("a@x.io"), true)
            .unwrap();
        let mut events = api.subscribe();

        let err = api.login("b@x.io", "wrong").await.unwrap_err();
        assert!(matches!(
            err,
            StafflineError::Api { status: 401, ref detail } if detail == "Incorrect email or password"
        ));
        // A rejected password is not a session expiry.
        assert!(events.try_recv().is_err());

        let request = server.next_request().await;
        assert!(request.starts_with("post /api/auth/login "));
        assert!(request.contains("content-type: application/x-www-form-urlencoded"));
        assert!(request.ends_with("username=b%40x.io&password=wrong"));
        assert!(!request.contains("authorization:"));

        let response = api.login("b@x.io", "right").await.unwrap();
        assert_eq!(response.access_token, "NEW");
        assert_eq!(response.user.email.as_deref(), Some("b@x.io"));
    }

    #[tokio::test]
    async fn test_unsupported_operations_fail_before_sending() {
        let api = client();

        let err = api.get(EntityKind::Alert, "A1").await.unwrap_err();
        assert!(matches!(err, StafflineError::Unsupported(_)));

        let err = api
            .create(EntityKind::Assignment, Record::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StafflineError::Unsupported(_)));

        let err = api
            .import(EntityKind::Alert, "alerts.csv", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StafflineError::Unsupported(_)));

        let err = api.specialties(EntityKind::Expense).await.unwrap_err();
        assert!(matches!(err, StafflineError::Unsupported(_)));
    }
}
