//! Candidate use case.
//!
//! Candidates are the one kind recruiters edit inline. The API has no
//! update endpoint, so edits go to the [`EditOverlay`] and are merged over
//! every list and detail fetch.

use crate::record_usecase::{check_max_lengths, require_fields};
use serde_json::Value;
use staffline_core::gateway::{ListQuery, RecordGateway, SpecialtyGateway};
use staffline_core::overlay::{EditOverlay, EntityKind, Patch, Record, merge_into, record_id, str_field};
use staffline_core::validation::{validate_email, validate_phone};
use staffline_core::{Result, StafflineError};
use std::sync::Arc;

const CANDIDATE_FIELD_LIMITS: &[(&str, usize)] = &[
    ("first_name", 100),
    ("last_name", 100),
    ("email", 255),
    ("phone", 50),
];

/// The list view asks for everything at once and searches locally.
pub const CANDIDATE_FETCH_LIMIT: u32 = 10_000;

/// Default contract length for new candidates, in weeks.
pub const DEFAULT_CONTRACT_WEEKS: u64 = 13;

const KIND: EntityKind = EntityKind::Candidate;

pub struct CandidateUseCase {
    records: Arc<dyn RecordGateway>,
    specialties: Arc<dyn SpecialtyGateway>,
    overlay: EditOverlay,
}

impl CandidateUseCase {
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

    /// Fetches candidates matching the server-side filters, merges unsynced
    /// edits, then applies `search` locally.
    ///
    /// `search` matches case-insensitively against first, last and full
    /// name, email and primary specialty. `filters.search`, `limit` and
    /// `skip` are ignored.
    pub async fn list(&self, filters: &ListQuery, search: &str) -> Result<Vec<Record>> {
        let query = ListQuery {
            search: None,
            limit: Some(CANDIDATE_FETCH_LIMIT),
            skip: Some(0),
            ..filters.clone()
        };

        let fetched = self.records.list(KIND, &query).await?;
        let merged = self.overlay.apply_patches(KIND, fetched);

        let needle = search.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(merged);
        }

        let matched: Vec<Record> = merged
            .into_iter()
            .filter(|c| matches_search(c, &needle))
            .collect();
        tracing::debug!("Candidate search '{}' matched {}", needle, matched.len());
        Ok(matched)
    }

    /// Same as [`list`](Self::list), but a failure becomes an empty list.
    pub async fn list_or_empty(&self, filters: &ListQuery, search: &str) -> Vec<Record> {
        self.list(filters, search).await.unwrap_or_else(|e| {
            tracing::error!("Error fetching candidates: {}", e);
            Vec::new()
        })
    }

    /// Fetches one candidate with unsynced edits applied.
    pub async fn detail(&self, id: &str) -> Result<Record> {
        let fetched = self.records.get(KIND, id).await?;
        Ok(self.overlay.apply_patch(KIND, fetched))
    }

    /// Saves `fields` as an unsynced edit of `candidate` and returns the
    /// candidate as it should now be displayed.
    pub fn save_edit(&self, candidate: &Record, fields: Patch) -> Result<Record> {
        let id = candidate_id(candidate)?;
        let stored = self.overlay.set_patch(KIND, &id, fields)?;

        let mut updated = candidate.clone();
        merge_into(&mut updated, &stored);
        Ok(updated)
    }

    /// Records a status change as an unsynced edit. Other edits are kept.
    pub fn change_status(&self, candidate: &Record, status: &str) -> Result<Record> {
        let status = status.trim();
        if status.is_empty() {
            return Err(StafflineError::validation("Status cannot be empty"));
        }
        let mut fields = Patch::new();
        fields.insert("status".into(), Value::String(status.to_string()));
        self.save_edit(candidate, fields)
    }

    /// Ids of candidates with unsynced edits.
    pub fn pending_edits(&self) -> Vec<String> {
        self.overlay.pending_ids(KIND)
    }

    pub fn has_pending_edit(&self, id: &str) -> bool {
        self.overlay.has_pending(KIND, id)
    }

    /// Drops the unsynced edit for `id`.
    pub fn discard_edit(&self, id: &str) -> Result<bool> {
        self.overlay.discard(KIND, id)
    }

    /// Creates a candidate after the form checks.
    ///
    /// Names and email are trimmed, the email lower-cased, and a missing
    /// contract length defaults to 13 weeks. A phone number, when given,
    /// must be a US number.
    pub async fn create(&self, mut candidate: Record) -> Result<Record> {
        for field in ["first_name", "last_name", "email"] {
            if let Some(value) = str_field(&candidate, field) {
                let cleaned = if field == "email" {
                    value.trim().to_lowercase()
                } else {
                    value.trim().to_string()
                };
                candidate.insert(field.into(), Value::String(cleaned));
            }
        }
        require_fields(
            &candidate,
            &["first_name", "last_name", "email", "primary_specialty"],
        )?;
        check_max_lengths(&candidate, CANDIDATE_FIELD_LIMITS)?;
        if let Some(email) = str_field(&candidate, "email") {
            if !validate_email(email) {
                return Err(StafflineError::validation(
                    "Please enter a valid email address",
                ));
            }
        }
        if let Some(phone) = str_field(&candidate, "phone").filter(|p| !p.trim().is_empty()) {
            if !validate_phone(phone) {
                return Err(StafflineError::validation(
                    "Please enter a valid phone number",
                ));
            }
        }
        candidate
            .entry("desired_contract_weeks")
            .or_insert(Value::from(DEFAULT_CONTRACT_WEEKS));

        let created = self.records.create(KIND, candidate).await?;
        tracing::info!("Candidate created: {:?}", record_id(KIND, &created));
        Ok(created)
    }

    /// Specialty names for the filter menu; empty on failure.
    pub async fn specialties(&self) -> Vec<String> {
        self.specialties.specialties(KIND).await.unwrap_or_else(|e| {
            tracing::warn!("Error fetching candidate specialties: {}", e);
            Vec::new()
        })
    }
}

fn candidate_id(candidate: &Record) -> Result<String> {
    record_id(KIND, candidate)
        .ok_or_else(|| StafflineError::validation("Candidate has no id"))
}

fn matches_search(candidate: &Record, needle: &str) -> bool {
    let field = |name: &str| str_field(candidate, name).unwrap_or_default().to_lowercase();
    let first = field("first_name");
    let last = field("last_name");
    let full = format!("{} {}", first, last);

    [first, last, full, field("email"), field("primary_specialty")]
        .iter()
        .any(|value| value.contains(needle))
}
