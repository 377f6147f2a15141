//! Wiring of one client process: scopes, API client, session and use cases.

use anyhow::{Result, bail};
use colored::Colorize;
use staffline_application::{
    AlertUseCase, AuthSession, CandidateUseCase, DashboardUseCase, EmailUseCase, GuardDecision,
    ImportUseCase, JobUseCase, MatchingUseCase, RecordUseCase, RouteGuard,
};
use staffline_core::StafflineError;
use staffline_core::config::ClientConfig;
use staffline_core::session::SessionEvent;
use staffline_infrastructure::{LocalScopes, StafflinePaths};
use staffline_interaction::ApiClient;
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct App {
    pub config: ClientConfig,
    pub paths: StafflinePaths,
    pub auth: AuthSession,
    pub candidates: CandidateUseCase,
    pub jobs: JobUseCase,
    pub records: RecordUseCase,
    pub alerts: AlertUseCase,
    pub dashboard: DashboardUseCase,
    pub matching: MatchingUseCase,
    pub importer: ImportUseCase,
    pub email: EmailUseCase,
    /// True inside `staffline shell`, where the tab scope outlives one command.
    pub interactive: bool,
    events: broadcast::Receiver<SessionEvent>,
}

impl App {
    /// Opens the scopes under `paths` and restores any stored session.
    pub fn open(paths: StafflinePaths, config: ClientConfig) -> Result<Self> {
        let scopes = LocalScopes::open(&paths);
        let store = scopes.session_store(config.session_max_age_days);
        let api = Arc::new(ApiClient::new(&config, store.clone())?);
        let events = api.subscribe();

        let auth = AuthSession::new(store, api.clone());
        auth.initialize();

        let overlay = scopes.edit_overlay();
        Ok(Self {
            candidates: CandidateUseCase::new(api.clone(), api.clone(), overlay.clone()),
            jobs: JobUseCase::new(api.clone(), api.clone(), overlay.clone()),
            records: RecordUseCase::new(api.clone(), overlay),
            alerts: AlertUseCase::new(api.clone()),
            dashboard: DashboardUseCase::new(api.clone(), api.clone(), config.ending_soon_days),
            matching: MatchingUseCase::new(api.clone(), config.default_min_score),
            importer: ImportUseCase::new(api.clone()),
            email: EmailUseCase::new(api),
            auth,
            config,
            paths,
            interactive: false,
            events,
        })
    }

    /// Fails unless a session is active.
    pub fn require_login(&self) -> Result<()> {
        match RouteGuard::decide(&self.auth.state()) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Redirect {
                notice: Some(notice),
            } => bail!("{notice}"),
            GuardDecision::Redirect { notice: None } | GuardDecision::Wait => {
                bail!("Not logged in. Run `staffline login` first.")
            }
        }
    }

    /// Applies any 401 the API client reported during the last command.
    pub fn sync_session(&mut self) {
        if self.auth.drain_session_events(&mut self.events) {
            eprintln!(
                "{}",
                staffline_application::route_guard::SESSION_EXPIRED_NOTICE.yellow()
            );
        }
    }
}

/// True when `error` is the server rejecting the session. The expiry notice
/// from [`App::sync_session`] already covers it.
pub fn is_session_expiry(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<StafflineError>()
        .is_some_and(StafflineError::is_unauthorized)
}
