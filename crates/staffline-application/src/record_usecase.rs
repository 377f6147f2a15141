//! Read-mostly record lists: assignments, documents, expenses.

use serde_json::Value;
use staffline_core::gateway::{ListQuery, RecordGateway};
use staffline_core::overlay::{EditOverlay, EntityKind, Record};
use staffline_core::validation::{validate_max_length, validate_positive_number, validate_required};
use staffline_core::{Result, StafflineError};
use std::sync::Arc;

const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

/// Fails with the form message when any of `fields` is missing or blank.
pub(crate) fn require_fields(record: &Record, fields: &[&str]) -> Result<()> {
    let missing = fields.iter().any(|field| match record.get(*field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => !validate_required(s),
        Some(_) => false,
    });
    if missing {
        Err(StafflineError::validation(REQUIRED_FIELDS_MESSAGE))
    } else {
        Ok(())
    }
}

/// Fails when a text field is longer than the server column holding it.
pub(crate) fn check_max_lengths(record: &Record, limits: &[(&str, usize)]) -> Result<()> {
    for (field, max) in limits {
        if let Some(Value::String(value)) = record.get(*field) {
            if !validate_max_length(value, *max) {
                return Err(StafflineError::validation(format!(
                    "{} must be at most {} characters",
                    field.replace('_', " "),
                    max
                )));
            }
        }
    }
    Ok(())
}

pub struct RecordUseCase {
    records: Arc<dyn RecordGateway>,
    overlay: EditOverlay,
}

impl RecordUseCase {
    pub fn new(records: Arc<dyn RecordGateway>, overlay: EditOverlay) -> Self {
        Self { records, overlay }
    }

    /// Lists `kind` with any unsynced edits applied.
    pub async fn list(&self, kind: EntityKind, query: &ListQuery) -> Result<Vec<Record>> {
        let fetched = self.records.list(kind, query).await?;
        Ok(self.overlay.apply_patches(kind, fetched))
    }

    /// Same as [`list`](Self::list), but a failure becomes an empty list.
    pub async fn list_or_empty(&self, kind: EntityKind, query: &ListQuery) -> Vec<Record> {
        self.list(kind, query).await.unwrap_or_else(|e| {
            tracing::error!("Error fetching {}: {}", kind.collection(), e);
            Vec::new()
        })
    }

    /// Submits an expense. New expenses start as `pending`.
    pub async fn create_expense(&self, mut expense: Record) -> Result<Record> {
        require_fields(
            &expense,
            &["expense_type", "description", "amount", "candidate_id"],
        )?;

        let amount = match expense.get("amount") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => String::new(),
        };
        if !validate_positive_number(&amount) {
            return Err(StafflineError::validation(
                "Amount must be a positive number",
            ));
        }

        expense
            .entry("status")
            .or_insert(Value::String("pending".into()));
        let created = self.records.create(EntityKind::Expense, expense).await?;
        tracing::info!("Expense created");
        Ok(created)
    }
}
