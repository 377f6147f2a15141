//! Alert use case.

use futures::future::try_join_all;
use staffline_core::Result;
use staffline_core::gateway::{AlertGateway, BulkUpdate};
use staffline_core::overlay::Record;
use std::sync::Arc;

pub struct AlertUseCase {
    alerts: Arc<dyn AlertGateway>,
}

impl AlertUseCase {
    pub fn new(alerts: Arc<dyn AlertGateway>) -> Self {
        Self { alerts }
    }

    /// All alerts, or only unread ones.
    pub async fn list(&self, unread_only: bool) -> Result<Vec<Record>> {
        let filter = unread_only.then_some(false);
        self.alerts.list_alerts(filter).await
    }

    pub async fn mark_read(&self, alert_id: &str) -> Result<()> {
        self.alerts.mark_read(alert_id).await?;
        tracing::debug!("Alert {} marked as read", alert_id);
        Ok(())
    }

    pub async fn mark_unread(&self, alert_id: &str) -> Result<()> {
        self.alerts.mark_unread(alert_id).await?;
        tracing::debug!("Alert {} marked as unread", alert_id);
        Ok(())
    }

    /// Marks several alerts read concurrently. Fails if any single call fails;
    /// calls that already succeeded are not rolled back.
    pub async fn mark_many_read(&self, alert_ids: &[String]) -> Result<usize> {
        try_join_all(alert_ids.iter().map(|id| self.alerts.mark_read(id))).await?;
        tracing::info!("Marked {} alerts as read", alert_ids.len());
        Ok(alert_ids.len())
    }

    pub async fn mark_all_unread(&self) -> Result<BulkUpdate> {
        let update = self.alerts.mark_all_unread().await?;
        tracing::info!("Marked all alerts as unread ({})", update.count);
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StubApi;
    use serde_json::json;
    use staffline_core::overlay::EntityKind;

    fn seeded() -> StubApi {
        StubApi::new().with_records(
            EntityKind::Alert,
            vec![
                json!({"id": 1, "is_read": false, "title": "License expiring"}),
                json!({"id": 2, "is_read": true, "title": "Assignment ending"}),
            ],
        )
    }

    #[tokio::test]
    async fn test_unread_filter() {
        let usecase = AlertUseCase::new(Arc::new(seeded()));
        assert_eq!(usecase.list(false).await.unwrap().len(), 2);
        let unread = usecase.list(true).await.unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_mark_many_read_fans_out() {
        let api = Arc::new(seeded());
        let usecase = AlertUseCase::new(api.clone());

        let ids = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        assert_eq!(usecase.mark_many_read(&ids).await.unwrap(), 3);

        let mut calls = api.calls();
        calls.sort();
        assert_eq!(calls, vec!["mark_read 1", "mark_read 2", "mark_read 3"]);
    }

    #[tokio::test]
    async fn test_mark_many_read_fails_as_a_whole() {
        let usecase = AlertUseCase::new(Arc::new(seeded().failing_on("mark_read")));
        assert!(usecase.mark_many_read(&["1".to_string()]).await.is_err());
    }

    #[tokio::test]
    async fn test_mark_all_unread_reports_count() {
        let usecase = AlertUseCase::new(Arc::new(seeded()));
        assert_eq!(usecase.mark_all_unread().await.unwrap().count, 2);
    }
}
