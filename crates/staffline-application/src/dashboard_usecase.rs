//! Dashboard use case: one screen, three concurrent fetches.

use staffline_core::Result;
use staffline_core::gateway::{AlertGateway, DashboardGateway, DashboardStats};
use staffline_core::overlay::Record;
use std::sync::Arc;

/// How many unread alerts the dashboard shows.
pub const DASHBOARD_ALERT_LIMIT: usize = 5;

/// Everything the dashboard renders.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub stats: DashboardStats,
    /// First few unread alerts.
    pub alerts: Vec<Record>,
    pub ending_assignments: Vec<Record>,
}

pub struct DashboardUseCase {
    dashboard: Arc<dyn DashboardGateway>,
    alerts: Arc<dyn AlertGateway>,
    ending_soon_days: u32,
}

impl DashboardUseCase {
    pub fn new(
        dashboard: Arc<dyn DashboardGateway>,
        alerts: Arc<dyn AlertGateway>,
        ending_soon_days: u32,
    ) -> Self {
        Self {
            dashboard,
            alerts,
            ending_soon_days,
        }
    }

    /// Fetches stats, unread alerts and ending assignments concurrently.
    ///
    /// If any fetch fails the whole load fails; nothing partial is returned.
    pub async fn load(&self) -> Result<DashboardView> {
        let (stats, mut alerts, ending_assignments) = tokio::try_join!(
            self.dashboard.stats(),
            self.alerts.list_alerts(Some(false)),
            self.dashboard.ending_assignments(self.ending_soon_days),
        )?;

        alerts.truncate(DASHBOARD_ALERT_LIMIT);
        tracing::debug!(
            "Dashboard loaded: {} alerts, {} ending assignments",
            alerts.len(),
            ending_assignments.len()
        );

        Ok(DashboardView {
            stats,
            alerts,
            ending_assignments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubApi;
    use serde_json::json;
    use staffline_core::gateway::CandidateStats;
    use staffline_core::overlay::EntityKind;

    fn api() -> StubApi {
        let alerts = (1..=7)
            .map(|i| json!({"id": i, "is_read": false}))
            .chain([json!({"id": 99, "is_read": true})])
            .collect();
        let mut api = StubApi::new()
            .with_records(EntityKind::Alert, alerts)
            .with_records(EntityKind::Assignment, vec![json!({"id": "A1"})]);
        api.stats.candidates = CandidateStats {
            total: 40,
            active: 31,
        };
        api
    }

    #[tokio::test]
    async fn test_load_combines_all_three() {
        let api = Arc::new(api());
        let view = DashboardUseCase::new(api.clone(), api.clone(), 30)
            .load()
            .await
            .unwrap();

        assert_eq!(view.stats.candidates.active, 31);
        assert_eq!(view.alerts.len(), DASHBOARD_ALERT_LIMIT);
        assert!(view.alerts.iter().all(|a| a["is_read"] == false));
        assert_eq!(view.ending_assignments.len(), 1);
        assert!(api.calls().contains(&"ending_assignments 30".to_string()));
    }

    #[tokio::test]
    async fn test_any_failure_fails_the_load() {
        for operation in ["stats", "list", "ending_assignments"] {
            let api = Arc::new(api().failing_on(operation));
            let result = DashboardUseCase::new(api.clone(), api, 30).load().await;
            assert!(result.is_err(), "{operation} failure should fail the load");
        }
    }
}
