// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup resumption of interrupted generation requests.
//!
//! Runs once after the host process regains external connectivity. Reads
//! a snapshot of every incomplete request, decides a per-request strategy
//! from the snapshot alone (the poller never reads the ledger), and
//! drives each through the operation poller with bounded concurrency and
//! an independent per-item timeout. One item's failure never aborts its
//! siblings.
//!
//! Starting a job is at-least-once: a `pending` row whose original start
//! call actually reached the remote gets started again. Resumption is
//! made safe by the ledger's conditional writes and by polling existing
//! handles instead of re-starting `generating` rows.

use crate::config::EngineConfig;
use crate::error::PollError;
use crate::poller::{PollJob, Poller};
use crate::semaphore::Semaphore;
use mg_adapters::{GenerationApi, NotifyChannel, ObjectStore, ObjectStoreExt};
use mg_core::{Clock, GenerationRequest, RequestId, RequestStatus};
use mg_storage::{Ledger, RequestStore};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Scan horizon for the startup sweep. Incomplete rows older than this
/// are left to the retention policy.
const RESUME_LOOKBACK: Duration = Duration::from_secs(7 * 24 * 3600);

/// How to resume a single request, decided from its persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeStrategy {
    /// Never handed to the generation API; start it now, then poll
    FromStart,
    /// Already started; poll the stored job handle
    PollExisting,
}

impl ResumeStrategy {
    pub fn for_request(request: &GenerationRequest) -> Self {
        match request.status {
            RequestStatus::Generating => ResumeStrategy::PollExisting,
            _ => ResumeStrategy::FromStart,
        }
    }
}

/// Aggregate outcome of one resumption sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumeSummary {
    /// Requests driven through the poller
    pub resumed: usize,
    pub completed: usize,
    pub failed: usize,
    pub timed_out: usize,
    /// Stale pending requests expired without resumption
    pub expired: usize,
}

enum ItemOutcome {
    Completed,
    Failed,
    TimedOut,
}

/// Drives interrupted requests back to a terminal state at startup
#[derive(Clone)]
pub struct Coordinator<S, A, O, N, C> {
    ledger: Ledger<S, C>,
    api: A,
    poller: Poller<A, O>,
    objects: O,
    notify: N,
    semaphore: Semaphore,
    config: EngineConfig,
}

impl<S, A, O, N, C> Coordinator<S, A, O, N, C>
where
    S: RequestStore,
    A: GenerationApi,
    O: ObjectStore,
    N: NotifyChannel,
    C: Clock,
{
    pub fn new(store: S, api: A, objects: O, notify: N, clock: C, config: EngineConfig) -> Self {
        let ledger = Ledger::new(store, clock);
        let poller = Poller::new(api.clone(), objects.clone(), config.poll.clone());
        let semaphore = Semaphore::new(config.download_concurrency, config.semaphore_timeout);
        Self {
            ledger,
            api,
            poller,
            objects,
            notify,
            semaphore,
            config,
        }
    }

    /// Run one full resumption sweep over the incomplete requests.
    pub async fn resume_all(&self) -> ResumeSummary {
        let mut summary = ResumeSummary::default();

        let incomplete = self.ledger.get_incomplete(RESUME_LOOKBACK).await;
        if incomplete.is_empty() {
            info!("no incomplete requests to resume");
            return summary;
        }

        let now_ms = self.ledger.now_ms();
        let max_age_ms = self.config.resume.max_age.as_millis() as u64;

        // Stale pending requests predate the outage by too much to be worth
        // retrying. Expire them instead of silently re-running them forever.
        let mut resumable = Vec::new();
        for request in incomplete {
            let age_ms = now_ms.saturating_sub(request.created_at_ms);
            if request.status == RequestStatus::Pending && age_ms > max_age_ms {
                let id = RequestId::new(&request.id);
                info!(request_id = %id, age_ms, "expiring stale pending request");
                self.ledger.set_timeout(&id, "expired while offline").await;
                summary.expired += 1;
            } else {
                resumable.push(request);
            }
        }

        if resumable.is_empty() {
            info!(expired = summary.expired, "resumption sweep complete");
            return summary;
        }

        info!(count = resumable.len(), "resuming interrupted requests");
        summary.resumed = resumable.len();

        // Oldest-first (the ledger query is ordered), fixed-size batches.
        // All-settled within a batch: every task runs to its own outcome.
        for batch in resumable.chunks(self.config.resume.batch_size.max(1)) {
            let mut set = JoinSet::new();
            for request in batch {
                let this = self.clone();
                let request = request.clone();
                let item_timeout = self.config.resume.item_timeout;
                set.spawn(async move {
                    let id = RequestId::new(&request.id);
                    match tokio::time::timeout(item_timeout, this.resume_one(request)).await {
                        Ok(outcome) => outcome,
                        Err(_) => {
                            warn!(request_id = %id, "resumption item timed out");
                            this.ledger.set_timeout(&id, "resumption timed out").await;
                            ItemOutcome::TimedOut
                        }
                    }
                });
            }
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok(ItemOutcome::Completed) => summary.completed += 1,
                    Ok(ItemOutcome::Failed) => summary.failed += 1,
                    Ok(ItemOutcome::TimedOut) => summary.timed_out += 1,
                    Err(e) => {
                        warn!(error = %e, "resumption task aborted");
                        summary.failed += 1;
                    }
                }
            }
        }

        info!(
            resumed = summary.resumed,
            completed = summary.completed,
            failed = summary.failed,
            timed_out = summary.timed_out,
            expired = summary.expired,
            "resumption sweep complete"
        );
        summary
    }

    /// Spawn `resume_all` fire-and-forget on the runtime.
    pub fn spawn_resume_all(&self) -> tokio::task::JoinHandle<ResumeSummary> {
        let this = self.clone();
        tokio::spawn(async move { this.resume_all().await })
    }

    /// Drive one request to a terminal state.
    async fn resume_one(&self, request: GenerationRequest) -> ItemOutcome {
        let id = RequestId::new(&request.id);

        let (job_handle, result_location) = match ResumeStrategy::for_request(&request) {
            ResumeStrategy::FromStart => {
                let location = derived_location(&request);
                info!(request_id = %id, "recovering: starting request never handed to the API");
                match self
                    .api
                    .start(&request.params, request.category, &location)
                    .await
                {
                    Ok(handle) => {
                        self.ledger.set_generating(&id, &handle, &location).await;
                        (handle, location)
                    }
                    Err(e) => {
                        warn!(request_id = %id, error = %e, "start rejected at recovery");
                        self.ledger.set_failed(&id, &e.to_string()).await;
                        return ItemOutcome::Failed;
                    }
                }
            }
            ResumeStrategy::PollExisting => {
                let Some(handle) = request.job_handle.clone() else {
                    warn!(request_id = %id, "no job handle, marking failed");
                    self.ledger.set_failed(&id, "no job handle at recovery").await;
                    return ItemOutcome::Failed;
                };
                let location = request
                    .result_location
                    .clone()
                    .unwrap_or_else(|| derived_location(&request));
                info!(request_id = %id, job_handle = %handle, "recovering: polling existing job");
                (handle, location)
            }
        };

        let tuning = self.config.category(request.category);
        let job = PollJob {
            job_handle: &job_handle,
            result_location: &result_location,
            category: request.category,
            deadline: tuning.poll_deadline,
            expected_duration: tuning.expected_duration,
        };

        match self.poller.poll(job, None).await {
            Ok(outcome) => {
                self.complete(&id, &request, &result_location, outcome.results)
                    .await;
                ItemOutcome::Completed
            }
            Err(e @ (PollError::NotFoundOrExpired | PollError::Deadline(_))) => {
                warn!(request_id = %id, error = %e, "resumed request timed out");
                self.ledger.set_timeout(&id, &e.to_string()).await;
                ItemOutcome::TimedOut
            }
            Err(PollError::Failed(message)) => {
                warn!(request_id = %id, error = %message, "resumed request failed");
                self.ledger.set_failed(&id, &message).await;
                ItemOutcome::Failed
            }
        }
    }

    /// Record completion and deliver the user-visible notice.
    ///
    /// The definitive result listing is fetched under the download gate.
    /// A notice that cannot be delivered never changes the outcome: the
    /// job itself succeeded.
    async fn complete(
        &self,
        id: &RequestId,
        request: &GenerationRequest,
        result_location: &str,
        poll_results: Vec<String>,
    ) {
        let results = match self
            .semaphore
            .run_exclusive(self.objects.list_results(result_location, request.category))
            .await
        {
            Ok(Ok(listed)) if !listed.is_empty() => listed,
            Ok(Ok(_)) => poll_results,
            Ok(Err(e)) => {
                warn!(request_id = %id, error = %e, "result listing failed, keeping poll results");
                poll_results
            }
            Err(e) => {
                warn!(request_id = %id, error = %e, "no download permit, keeping poll results");
                poll_results
            }
        };

        self.ledger.set_completed(id, results.clone()).await;
        info!(request_id = %id, results = results.len(), "resumed request completed");

        let message = format!("Your {} is ready", request.category);
        if let Err(e) = self
            .notify
            .deliver(&request.scope, &message, results.first().map(String::as_str))
            .await
        {
            warn!(request_id = %id, error = %e, "completion notice delivery failed");
        }
    }
}

/// Storage prefix where a request's output is expected.
fn derived_location(request: &GenerationRequest) -> String {
    format!("generations/{}/{}", request.category, request.id)
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
