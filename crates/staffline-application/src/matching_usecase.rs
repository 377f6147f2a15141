//! Matching use case. Scores come from the server; this is read-only.

use staffline_core::Result;
use staffline_core::gateway::MatchingGateway;
use staffline_core::overlay::Record;
use std::sync::Arc;

pub struct MatchingUseCase {
    matching: Arc<dyn MatchingGateway>,
    default_min_score: u32,
}

impl MatchingUseCase {
    pub fn new(matching: Arc<dyn MatchingGateway>, default_min_score: u32) -> Self {
        Self {
            matching,
            default_min_score,
        }
    }

    /// Candidates matching a job, best first.
    pub async fn for_job(&self, job_id: &str, min_score: Option<u32>) -> Result<Vec<Record>> {
        let min = min_score.unwrap_or(self.default_min_score);
        let mut matches = self.matching.matches_for_job(job_id, min).await?;
        sort_by_score(&mut matches);
        Ok(matches)
    }

    /// Jobs matching a candidate, best first.
    pub async fn for_candidate(
        &self,
        candidate_id: &str,
        min_score: Option<u32>,
    ) -> Result<Vec<Record>> {
        let min = min_score.unwrap_or(self.default_min_score);
        let mut matches = self.matching.matches_for_candidate(candidate_id, min).await?;
        sort_by_score(&mut matches);
        Ok(matches)
    }

    /// Ending assignments with potential replacements. `None` uses the
    /// server's default window.
    pub async fn ending_assignments(&self, days: Option<u32>) -> Result<Vec<Record>> {
        self.matching.ending_assignments_with_matches(days).await
    }
}

fn score(record: &Record) -> f64 {
    record
        .get("score")
        .and_then(serde_json::Value::as_f64)
        .unwrap_or(0.0)
}

fn sort_by_score(matches: &mut [Record]) {
    matches.sort_by(|a, b| score(b).total_cmp(&score(a)));
}
