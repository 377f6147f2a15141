//! Entity kinds served by the ATS API.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// The record types the API exposes.
///
/// Parses from either the singular or the plural name, case-insensitively
/// (`"candidate"`, `"Candidates"`). Displays as the singular name.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum EntityKind {
    #[strum(to_string = "candidate", serialize = "candidates")]
    Candidate,
    #[strum(to_string = "job", serialize = "jobs")]
    Job,
    #[strum(to_string = "assignment", serialize = "assignments")]
    Assignment,
    #[strum(to_string = "document", serialize = "documents")]
    Document,
    #[strum(to_string = "expense", serialize = "expenses")]
    Expense,
    #[strum(to_string = "alert", serialize = "alerts")]
    Alert,
    #[strum(to_string = "match", serialize = "matches")]
    Match,
}

impl EntityKind {
    /// Path segment and list-envelope key (`candidates`, `matches`, ...).
    pub fn collection(&self) -> &'static str {
        match self {
            EntityKind::Candidate => "candidates",
            EntityKind::Job => "jobs",
            EntityKind::Assignment => "assignments",
            EntityKind::Document => "documents",
            EntityKind::Expense => "expenses",
            EntityKind::Alert => "alerts",
            EntityKind::Match => "matches",
        }
    }

    /// Tab-scope key holding this kind's unsynced edits (`candidateEdits`).
    pub fn overlay_key(&self) -> String {
        format!("{}Edits", self.as_ref())
    }

    /// Secondary id field some payloads carry instead of `id`.
    pub fn id_field(&self) -> String {
        format!("{}_id", self.as_ref())
    }

    /// Kinds with a `GET /<collection>` list endpoint.
    pub fn supports_list(&self) -> bool {
        !matches!(self, EntityKind::Match)
    }

    /// Kinds with a `GET /<collection>/<id>` detail endpoint.
    pub fn supports_get(&self) -> bool {
        matches!(self, EntityKind::Candidate | EntityKind::Job)
    }

    /// Kinds with a `POST /<collection>` create endpoint.
    pub fn supports_create(&self) -> bool {
        matches!(
            self,
            EntityKind::Candidate | EntityKind::Job | EntityKind::Expense
        )
    }

    /// Kinds accepted by `POST /import/<collection>`.
    pub fn supports_import(&self) -> bool {
        matches!(
            self,
            EntityKind::Candidate
                | EntityKind::Job
                | EntityKind::Assignment
                | EntityKind::Document
                | EntityKind::Expense
        )
    }

    /// Kinds with a `GET /specialties/<collection>` endpoint.
    pub fn supports_specialties(&self) -> bool {
        matches!(self, EntityKind::Candidate | EntityKind::Job)
    }
}
