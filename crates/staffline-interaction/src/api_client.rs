//! ApiClient - HTTP access to the ATS REST API.
//!
//! Every request except login and signup carries the stored bearer token.
//! A 401 from an authenticated request means the server no longer accepts
//! the session: the client broadcasts [`SessionEvent::Invalidated`] so the
//! auth controller can log out, then returns
//! [`StafflineError::Unauthorized`].

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use staffline_core::config::ClientConfig;
use staffline_core::session::{SessionEvent, SessionStore};
use staffline_core::{Result, StafflineError};
use std::time::Duration;
use tokio::sync::broadcast;

use crate::envelope::error_detail;

/// Capacity of the session event channel. Events are idempotent, so lagging
/// receivers lose nothing that matters.
const EVENT_CAPACITY: usize = 16;

/// Generic fallback when an error body has no usable `detail`.
pub(crate) const REQUEST_FAILED: &str = "Request failed";

/// Which token, if any, a request carries.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Credentials<'a> {
    /// Login and signup: no token, and a 401 is an ordinary failure.
    Anonymous,
    /// The token currently held by the session store.
    Stored,
    /// A caller-supplied token (token verification).
    Explicit(&'a str),
}

/// Client for the ATS API.
///
/// Cheap to clone; clones share the connection pool, the session store and
/// the event channel.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: SessionStore,
    events: broadcast::Sender<SessionEvent>,
}

impl ApiClient {
    /// Creates a client for `config.api_base_url` reading tokens from `session`.
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| StafflineError::transport(format!("Failed to build HTTP client: {e}")))?;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        tracing::debug!("[ApiClient] Using API at {}", config.base_url());

        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            session,
            events,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Subscribes to session events raised by this client.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Sends `request` and returns the decoded JSON body.
    ///
    /// An empty success body decodes to `Value::Null`.
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
        credentials: Credentials<'_>,
        fallback: &str,
    ) -> Result<Value> {
        let request = match credentials {
            Credentials::Anonymous => request,
            Credentials::Stored => match self.session.current_token() {
                Some(token) => request.bearer_auth(token),
                None => request,
            },
            Credentials::Explicit(token) => request.bearer_auth(token),
        };

        let request = request
            .build()
            .map_err(|e| StafflineError::transport(format!("Invalid request: {e}")))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();
        tracing::debug!("[ApiClient] {} {}", method, path);

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::warn!("[ApiClient] {} {} failed: {}", method, path, e);
            StafflineError::transport(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StafflineError::transport(format!("Failed to read response body: {e}")))?;

        if status == StatusCode::UNAUTHORIZED && !matches!(credentials, Credentials::Anonymous) {
            tracing::info!("[ApiClient] {} {} returned 401, invalidating session", method, path);
            self.notify_invalidated();
            return Err(StafflineError::Unauthorized);
        }

        if !status.is_success() {
            let detail = error_detail(&body, fallback);
            tracing::debug!("[ApiClient] {} {} -> {}: {}", method, path, status, detail);
            return Err(StafflineError::api(status.as_u16(), detail));
        }

        tracing::debug!("[ApiClient] {} {} -> {}", method, path, status);

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Authenticated `GET` with query pairs.
    pub(crate) async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = self.client.get(self.url(path)).query(query);
        self.execute(request, Credentials::Stored, REQUEST_FAILED).await
    }

    /// Authenticated `POST` with a JSON body.
    pub(crate) async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value> {
        let request = self.client.post(self.url(path)).json(body);
        self.execute(request, Credentials::Stored, REQUEST_FAILED).await
    }

    /// Authenticated `PUT` without a body.
    pub(crate) async fn put_empty(&self, path: &str) -> Result<Value> {
        let request = self.client.put(self.url(path));
        self.execute(request, Credentials::Stored, REQUEST_FAILED).await
    }

    fn notify_invalidated(&self) {
        // No receivers just means nobody is listening yet.
        if self.events.send(SessionEvent::Invalidated).is_err() {
            tracing::debug!("[ApiClient] No subscribers for session invalidation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::CannedServer;
    use staffline_core::scope::MemoryScope;
    use staffline_core::session::UserProfile;
    use std::sync::Arc;

    fn client(base: &str) -> ApiClient {
        let store = SessionStore::new(Arc::new(MemoryScope::new()), Arc::new(MemoryScope::new()));
        let config = ClientConfig {
            api_base_url: base.to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config, store).unwrap()
    }

    #[test]
    fn test_base_url_has_no_trailing_slash() {
        let api = client("https://ats.example.com/api/");
        assert_eq!(api.base_url(), "https://ats.example.com/api");
        assert_eq!(api.url("/candidates"), "https://ats.example.com/api/candidates");
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_an_invalidation() {
        // Port 9 on localhost is closed in test environments.
        let api = client("http://127.0.0.1:9/api");
        let mut events = api.subscribe();

        let err = api.get_json("/candidates", &[]).await.unwrap_err();
        assert!(err.is_transport());
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_invalidation_reaches_every_subscriber() {
        let api = client("http://localhost:8000/api");
        let mut first = api.subscribe();
        let mut second = api.clone().subscribe();

        api.notify_invalidated();

        assert_eq!(first.try_recv().unwrap(), SessionEvent::Invalidated);
        assert_eq!(second.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[tokio::test]
    async fn test_stored_token_is_sent_as_bearer() {
        let mut server = CannedServer::start(vec![(200, r#"{"candidates":[]}"#)]).await;
        let api = client(&server.base_url);
        api.session
            .persist("TOK-1", &UserProfile::with_email("a@x.io"), true)
            .unwrap();

        let body = api
            .get_json("/candidates", &[("status", "active".to_string())])
            .await
            .unwrap();

        assert_eq!(body["candidates"], serde_json::json!([]));
        let request = server.next_request().await;
        assert!(request.starts_with("get /api/candidates?status=active "));
        assert!(request.contains("authorization: bearer tok-1\r\n"));
    }

    #[tokio::test]
    async fn test_no_token_means_no_authorization_header() {
        let mut server = CannedServer::start(vec![(200, "")]).await;
        let api = client(&server.base_url);

        let body = api.put_empty("/alerts/A1/read").await.unwrap();

        assert_eq!(body, Value::Null);
        let request = server.next_request().await;
        assert!(request.starts_with("put /api/alerts/a1/read "));
        assert!(!request.contains("authorization:"));
    }

    #[tokio::test]
    async fn test_401_broadcasts_invalidation_and_returns_unauthorized() {
        let server = CannedServer::start(vec![(
            401,
            r#"{"detail":"Could not validate credentials"}"#,
        )])
        .await;
        let api = client(&server.base_url);
        api.session
            .persist("TOK-1", &UserProfile::with_email("a@x.io"), false)
            .unwrap();
        let mut events = api.subscribe();

        let err = api.get_json("/dashboard/stats", &[]).await.unwrap_err();

        assert!(matches!(err, StafflineError::Unauthorized));
        assert_eq!(events.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[tokio::test]
    async fn test_error_detail_is_mapped_with_fallback() {
        let server = CannedServer::start(vec![
            (400, r#"{"detail":"Candidate already exists"}"#),
            (422, r#"{"detail":[{"msg":"field required"},{"msg":"value is not a valid email"}]}"#),
            (500, "Internal Server Error"),
        ])
        .await;
        let api = client(&server.base_url);
        let mut events = api.subscribe();

        let err = api.post_json("/candidates", &serde_json::json!({})).await.unwrap_err();
        assert!(matches!(
            err,
            StafflineError::Api { status: 400, ref detail } if detail == "Candidate already exists"
        ));

        let err = api.post_json("/candidates", &serde_json::json!({})).await.unwrap_err();
        assert!(matches!(
            err,
            StafflineError::Api { status: 422, ref detail }
                if detail == "field required; value is not a valid email"
        ));

        let err = api.get_json("/candidates", &[]).await.unwrap_err();
        assert!(matches!(
            err,
            StafflineError::Api { status: 500, ref detail } if detail == REQUEST_FAILED
        ));

        assert!(events.try_recv().is_err());
    }
}
