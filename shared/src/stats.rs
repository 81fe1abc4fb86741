use serde::{Deserialize, Serialize};

use crate::model::{AidRequest, RequestStatus, Severity};

/// Counts shown in the header. The severity split covers active requests only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestStats {
    pub active: usize,
    pub critical: usize,
    pub moderate: usize,
    pub low: usize,
    pub completed: usize,
}

impl RequestStats {
    #[must_use]
    pub fn from_requests(requests: &[AidRequest]) -> Self {
        requests
            .iter()
            .fold(Self::default(), |mut stats, request| {
                match request.status {
                    RequestStatus::Completed => stats.completed += 1,
                    RequestStatus::Active => {
                        stats.active += 1;
                        match request.severity {
                            Severity::Critical => stats.critical += 1,
                            Severity::Moderate => stats.moderate += 1,
                            Severity::Low => stats.low += 1,
                        }
                    }
                }
                stats
            })
    }
}
