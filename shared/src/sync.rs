//! Local snapshot of the request table, kept fresh by re-fetching whenever
//! the change feed reports anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::capabilities::RealtimeOutput;
use crate::model::{AidRequest, RequestId, RequestStatus};
use crate::{AppError, AppResult};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    #[default]
    Idle,
    Connecting,
    Live,
    /// The shell closed the channel.
    Paused { reason: Option<String> },
    Failed { message: String },
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { count: usize },
    Stale,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    requests: Vec<AidRequest>,
    fetch_seq: u64,
    applied_seq: u64,
    subscription: SubscriptionStatus,
    last_error: Option<AppError>,
    last_synced_at: Option<DateTime<Utc>>,
    /// Requests completed from this client, keyed to the newest fetch
    /// sequence issued at that moment. Fetches up to that sequence may have
    /// been answered before the write landed.
    completed_locally: HashMap<RequestId, u64>,
}

impl SyncState {
    #[must_use]
    pub fn requests(&self) -> &[AidRequest] {
        &self.requests
    }

    #[must_use]
    pub fn find(&self, id: &RequestId) -> Option<&AidRequest> {
        self.requests.iter().find(|r| &r.id == id)
    }

    #[must_use]
    pub const fn subscription(&self) -> &SubscriptionStatus {
        &self.subscription
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&AppError> {
        self.last_error.as_ref()
    }

    #[must_use]
    pub const fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.subscription == SubscriptionStatus::Stopped
    }

    /// Sequence number for a new full fetch.
    pub fn next_fetch(&mut self) -> u64 {
        self.fetch_seq += 1;
        self.fetch_seq
    }

    /// Applies the outcome of fetch `seq`. Anything older than the last
    /// applied snapshot is dropped, so the snapshot always reflects the
    /// newest successful fetch regardless of arrival order.
    pub fn apply(&mut self, seq: u64, result: AppResult<Vec<AidRequest>>) -> FetchOutcome {
        if seq <= self.applied_seq {
            debug!(seq, applied = self.applied_seq, "dropping stale fetch");
            return FetchOutcome::Stale;
        }

        match result {
            Ok(mut requests) => {
                self.completed_locally.retain(|_, issued| *issued >= seq);
                for request in &mut requests {
                    if request.is_active() && self.completed_locally.contains_key(&request.id) {
                        debug!(id = %request.id, seq, "fetch predates local completion");
                        request.status = RequestStatus::Completed;
                    }
                }
                let count = requests.len();
                self.requests = requests;
                self.applied_seq = seq;
                self.last_error = None;
                self.last_synced_at = Some(Utc::now());
                debug!(seq, count, "snapshot replaced");
                FetchOutcome::Applied { count }
            }
            Err(error) => {
                warn!(seq, error = %error, "fetching requests failed; keeping snapshot");
                self.last_error = Some(error);
                FetchOutcome::Failed
            }
        }
    }

    pub fn begin_subscribe(&mut self) {
        self.subscription = SubscriptionStatus::Connecting;
    }

    /// Tracks channel status. Returns whether a re-fetch is needed.
    pub fn on_realtime(&mut self, output: RealtimeOutput) -> bool {
        if self.is_stopped() {
            debug!("ignoring change feed output after stop");
            return false;
        }

        match output {
            RealtimeOutput::Subscribed => {
                info!("change feed live");
                self.subscription = SubscriptionStatus::Live;
                false
            }
            RealtimeOutput::Change(change) => {
                debug!(kind = ?change.kind, table = %change.table, "change notification");
                true
            }
            RealtimeOutput::Closed { reason } => {
                warn!(reason = ?reason, "change feed closed");
                self.subscription = SubscriptionStatus::Paused { reason };
                false
            }
            RealtimeOutput::Failed(error) => {
                warn!(error = %error, "change feed failed");
                self.subscription = SubscriptionStatus::Failed {
                    message: error.to_string(),
                };
                false
            }
        }
    }

    /// Returns whether there was a subscription to cancel.
    pub fn stop(&mut self) -> bool {
        let was_running = !matches!(
            self.subscription,
            SubscriptionStatus::Idle | SubscriptionStatus::Stopped
        );
        self.subscription = SubscriptionStatus::Stopped;
        was_running
    }

    /// Reflects a confirmed completion before the change feed catches up.
    /// Fetches already in flight cannot bring the request back to active.
    pub fn mark_completed(&mut self, id: &RequestId) {
        self.completed_locally.insert(id.clone(), self.fetch_seq);
        if let Some(request) = self.requests.iter_mut().find(|r| &r.id == id) {
            request.status = RequestStatus::Completed;
        }
    }

    /// Whether the live channel is down while the app is running.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        matches!(
            self.subscription,
            SubscriptionStatus::Paused { .. } | SubscriptionStatus::Failed { .. }
        )
    }
}
