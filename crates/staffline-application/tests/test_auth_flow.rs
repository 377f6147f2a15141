use async_trait::async_trait;
use serde_json::{Value, json};
use staffline_application::route_guard::SESSION_EXPIRED_NOTICE;
use staffline_application::{AuthPhase, AuthSession, CandidateUseCase, GuardDecision, RouteGuard};
use staffline_core::gateway::{
    AuthGateway, ListQuery, LoginResponse, RecordGateway, SignupRequest, SpecialtyGateway,
};
use staffline_core::overlay::{EditOverlay, EntityKind, Record};
use staffline_core::scope::{MemoryScope, ScopeStorage};
use staffline_core::session::{SessionEvent, SessionStore, TOKEN_KEY, UserProfile};
use staffline_core::{Result, StafflineError};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Accepts one password and serves a fixed candidate list.
struct FakeAts {
    password: &'static str,
    candidates: Vec<Value>,
}

#[async_trait]
impl AuthGateway for FakeAts {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        if password != self.password {
            return Err(StafflineError::api(401, "Incorrect email or password"));
        }
        Ok(LoginResponse {
            access_token: "T".into(),
            token_type: Some("bearer".into()),
            user: UserProfile::with_email(email),
        })
    }

    async fn signup(&self, request: &SignupRequest) -> Result<Value> {
        Ok(json!({ "email": request.email }))
    }

    async fn current_user(&self, _token: &str) -> Result<UserProfile> {
        Err(StafflineError::Unauthorized)
    }
}

#[async_trait]
impl RecordGateway for FakeAts {
    async fn list(&self, _kind: EntityKind, _query: &ListQuery) -> Result<Vec<Record>> {
        Ok(self
            .candidates
            .iter()
            .filter_map(|c| c.as_object().cloned())
            .collect())
    }

    async fn get(&self, kind: EntityKind, id: &str) -> Result<Record> {
        let all = self.list(kind, &ListQuery::new()).await?;
        all.into_iter()
            .find(|c| c.get("id").and_then(Value::as_str) == Some(id))
            .ok_or_else(|| StafflineError::api(404, "Candidate not found"))
    }

    async fn create(&self, _kind: EntityKind, record: Record) -> Result<Record> {
        Ok(record)
    }
}

#[async_trait]
impl SpecialtyGateway for FakeAts {
    async fn specialties(&self, _kind: EntityKind) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

fn fake() -> Arc<FakeAts> {
    Arc::new(FakeAts {
        password: "pw",
        candidates: vec![
            json!({"id": "C1", "first_name": "Maria", "status": "active"}),
            json!({"id": "C2", "first_name": "Sam", "status": "active"}),
        ],
    })
}

#[tokio::test]
async fn test_login_then_reload_restores_session() {
    let durable: Arc<dyn ScopeStorage> = Arc::new(MemoryScope::new());
    let tab: Arc<dyn ScopeStorage> = Arc::new(MemoryScope::new());
    let api = fake();

    let session = AuthSession::new(SessionStore::new(durable.clone(), tab.clone()), api.clone());
    session.initialize();
    assert_eq!(session.phase(), AuthPhase::Anonymous);
    assert!(!session.state().loading);

    session.login("a@b.com", "pw", true).await.unwrap();
    assert!(session.is_authenticated());
    assert_eq!(durable.get_item(TOKEN_KEY).unwrap().as_deref(), Some("T"));
    assert_eq!(tab.get_item(TOKEN_KEY).unwrap(), None);

    // A new controller over the same durable scope: the next process start.
    let reloaded = AuthSession::new(
        SessionStore::new(durable.clone(), Arc::new(MemoryScope::new())),
        api,
    );
    assert_eq!(RouteGuard::decide(&reloaded.state()), GuardDecision::Wait);
    reloaded.initialize();
    assert!(reloaded.is_authenticated());
    assert_eq!(
        reloaded.current_user().unwrap().email.as_deref(),
        Some("a@b.com")
    );
    assert_eq!(RouteGuard::decide(&reloaded.state()), GuardDecision::Allow);
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let store = SessionStore::new(Arc::new(MemoryScope::new()), Arc::new(MemoryScope::new()));
    let session = AuthSession::new(store.clone(), fake());
    session.initialize();
    session.login("a@b.com", "pw", false).await.unwrap();

    let err = session.login("a@b.com", "wrong", true).await.unwrap_err();
    assert_eq!(err.to_string(), "Incorrect email or password");
    assert!(session.is_authenticated());
    assert_eq!(store.current_token().as_deref(), Some("T"));
    assert!(!store.is_remembered());
}

#[tokio::test]
async fn test_invalidation_redirects_with_notice() {
    let session = AuthSession::new(
        SessionStore::new(Arc::new(MemoryScope::new()), Arc::new(MemoryScope::new())),
        fake(),
    );
    session.initialize();
    session.login("a@b.com", "pw", true).await.unwrap();

    let (tx, mut rx) = broadcast::channel(16);
    tx.send(SessionEvent::Invalidated).unwrap();
    assert!(session.drain_session_events(&mut rx));

    assert!(!session.is_authenticated());
    assert_eq!(session.store().current_token(), None);
    assert_eq!(
        RouteGuard::decide(&session.state()),
        GuardDecision::Redirect {
            notice: Some(SESSION_EXPIRED_NOTICE)
        }
    );
}

#[tokio::test]
async fn test_overlay_edits_show_up_in_list_and_detail() {
    let api = fake();
    let overlay = EditOverlay::new(Arc::new(MemoryScope::new()));
    let candidates = CandidateUseCase::new(api.clone(), api, overlay);

    let maria = candidates.detail("C1").await.unwrap();
    candidates
        .save_edit(&maria, json!({"phone": "555"}).as_object().cloned().unwrap())
        .unwrap();
    candidates.change_status(&maria, "inactive").unwrap();

    let listed = candidates.list(&ListQuery::new(), "").await.unwrap();
    assert_eq!(listed[0]["status"], "inactive");
    assert_eq!(listed[0]["phone"], "555");
    assert_eq!(listed[0]["first_name"], "Maria");
    assert_eq!(listed[1]["status"], "active");

    let detail = candidates.detail("C1").await.unwrap();
    assert_eq!(detail["phone"], "555");
    assert_eq!(candidates.pending_edits(), vec!["C1".to_string()]);
}
