use chrono::{DateTime, Utc};

use super::{BatchId, BatchStatus, ProjectId, UserId};

/// A set of responses submitted together for bulk transcription.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub id: BatchId,
    pub project_id: ProjectId,
    pub owner_id: UserId,
    pub status: BatchStatus,
    pub session_ids_requested: Vec<String>,
    pub session_ids_not_found: Vec<String>,
    pub total_count: u32,
    pub completed_count: u32,
    pub failed_count: u32,
    pub estimated_cost_usd: f64,
    pub actual_cost_usd: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub confirmed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Batch {
    pub fn quoted(
        project_id: ProjectId,
        owner_id: UserId,
        session_ids_requested: Vec<String>,
        session_ids_not_found: Vec<String>,
        total_count: u32,
        estimated_cost_usd: f64,
    ) -> Self {
        Self {
            id: BatchId::new(),
            project_id,
            owner_id,
            status: BatchStatus::PendingConfirmation,
            session_ids_requested,
            session_ids_not_found,
            total_count,
            completed_count: 0,
            failed_count: 0,
            estimated_cost_usd,
            actual_cost_usd: None,
            created_at: Utc::now(),
            confirmed_at: None,
            completed_at: None,
        }
    }

    /// Requested session ids that existed when the batch was quoted.
    pub fn valid_session_ids(&self) -> Vec<String> {
        self.session_ids_requested
            .iter()
            .filter(|id| !self.session_ids_not_found.contains(id))
            .cloned()
            .collect()
    }
}
