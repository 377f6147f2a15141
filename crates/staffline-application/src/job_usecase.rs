//! Job use case.

use crate::candidate_usecase::DEFAULT_CONTRACT_WEEKS;
use crate::record_usecase::{check_max_lengths, require_fields};
use serde_json::Value;
use staffline_core::Result;
use staffline_core::gateway::{ListQuery, RecordGateway, SpecialtyGateway};
use staffline_core::overlay::{EditOverlay, EntityKind, Record};
use std::sync::Arc;

const KIND: EntityKind = EntityKind::Job;

pub struct JobUseCase {
    records: Arc<dyn RecordGateway>,
    specialties: Arc<dyn SpecialtyGateway>,
    overlay: EditOverlay,
}

impl JobUseCase {
    pub fn new(
        records: Arc<dyn RecordGateway>,
        specialties: Arc<dyn SpecialtyGateway>,
        overlay: EditOverlay,
    ) -> Self {
        Self {
            records,
            specialties,
            overlay,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Vec<Record>> {
        let fetched = self.records.list(KIND, query).await?;
        Ok(self.overlay.apply_patches(KIND, fetched))
    }

    pub async fn list_or_empty(&self, query: &ListQuery) -> Vec<Record> {
        self.list(query).await.unwrap_or_else(|e| {
            tracing::error!("Error fetching jobs: {}", e);
            Vec::new()
        })
    }

    pub async fn detail(&self, id: &str) -> Result<Record> {
        let fetched = self.records.get(KIND, id).await?;
        Ok(self.overlay.apply_patch(KIND, fetched))
    }

    /// Posts a job. Unset posting fields get the form defaults.
    pub async fn create(&self, mut job: Record) -> Result<Record> {
        require_fields(
            &job,
            &["title", "specialty_required", "facility", "city", "state"],
        )?;
        check_max_lengths(
            &job,
            &[("title", 200), ("facility", 200), ("city", 100), ("state", 50)],
        )?;
        job.entry("status")
            .or_insert(Value::String("open".into()));
        job.entry("urgency_level")
            .or_insert(Value::String("normal".into()));
        job.entry("contract_weeks")
            .or_insert(Value::from(DEFAULT_CONTRACT_WEEKS));
        job.entry("positions_available").or_insert(Value::from(1));

        let created = self.records.create(KIND, job).await?;
        tracing::info!("Job posted");
        Ok(created)
    }

    pub async fn specialties(&self) -> Vec<String> {
        self.specialties.specialties(KIND).await.unwrap_or_else(|e| {
            tracing::warn!("Error fetching job specialties: {}", e);
            Vec::new()
        })
    }
}
