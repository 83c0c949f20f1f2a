// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running operation poller.
//!
//! Drives a single generation job to completion against two completion
//! signals: the generation API's status capability and, because that API
//! is not always reliable for long-running jobs, a probe of the result
//! location for category-appropriate output. Transport errors from either
//! signal count as "not yet done" for that iteration; only deadline
//! exhaustion, an expired job handle, or an explicit error payload is
//! terminal.
//!
//! Progress is estimated from elapsed time (capped at 0.95 until actual
//! completion) and reported through a fire-and-forget callback.

use crate::config::PollConfig;
use crate::error::PollError;
use mg_adapters::{ApiError, GenerationApi, ObjectStore, ObjectStoreExt};
use mg_core::Category;
use std::time::Duration;
use tracing::debug;

/// Fire-and-forget progress callback, invoked with a fraction in [0, 1].
pub type ProgressFn = Box<dyn Fn(f64) + Send + Sync>;

/// Which signal reported completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionSignal {
    /// The status API reported done
    StatusApi,
    /// Output appeared at the result location
    StorageProbe,
}

/// Successful poll result.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub results: Vec<String>,
    pub via: CompletionSignal,
}

/// Inputs for a single poll run.
#[derive(Debug, Clone)]
pub struct PollJob<'a> {
    pub job_handle: &'a str,
    pub result_location: &'a str,
    pub category: Category,
    /// Hard wall-clock cutoff for the whole run
    pub deadline: Duration,
    /// Typical duration for this category, for estimated progress
    pub expected_duration: Duration,
}

/// Polls a job until done, errored, or past deadline
#[derive(Clone)]
pub struct Poller<A, O> {
    api: A,
    objects: O,
    config: PollConfig,
}

impl<A: GenerationApi, O: ObjectStore> Poller<A, O> {
    pub fn new(api: A, objects: O, config: PollConfig) -> Self {
        Self {
            api,
            objects,
            config,
        }
    }

    /// Drive one job to a terminal outcome.
    pub async fn poll(
        &self,
        job: PollJob<'_>,
        on_progress: Option<ProgressFn>,
    ) -> Result<PollOutcome, PollError> {
        let start = tokio::time::Instant::now();
        let mut interval = self.config.initial_interval;

        loop {
            let elapsed = start.elapsed();
            if elapsed >= job.deadline {
                break;
            }

            report(&on_progress, estimate(elapsed, job.expected_duration));

            match self.api.check_status(job.job_handle).await {
                Ok(status) if status.done => {
                    if let Some(error) = status.error {
                        return Err(PollError::Failed(error));
                    }
                    let results = if status.results.is_empty() {
                        // Some backends report done without locators
                        self.probe(&job).await.unwrap_or_default()
                    } else {
                        status.results
                    };
                    report(&on_progress, 1.0);
                    return Ok(PollOutcome {
                        results,
                        via: CompletionSignal::StatusApi,
                    });
                }
                Ok(_) => {}
                Err(ApiError::NotFoundOrExpired) => {
                    // The operation record aged out. One last probe: output
                    // that is already there wins over the expired handle.
                    if let Some(results) = self.probe(&job).await.filter(|r| !r.is_empty()) {
                        report(&on_progress, 1.0);
                        return Ok(PollOutcome {
                            results,
                            via: CompletionSignal::StorageProbe,
                        });
                    }
                    return Err(PollError::NotFoundOrExpired);
                }
                Err(e) => {
                    debug!(job_handle = job.job_handle, error = %e, "status check failed, treating as not done");
                }
            }

            if let Some(results) = self.probe(&job).await.filter(|r| !r.is_empty()) {
                report(&on_progress, 1.0);
                return Ok(PollOutcome {
                    results,
                    via: CompletionSignal::StorageProbe,
                });
            }

            let remaining = job.deadline.saturating_sub(start.elapsed());
            tokio::time::sleep(interval.min(remaining)).await;
            interval = grow(interval, self.config.backoff_multiplier, self.config.max_interval);
        }

        Err(PollError::Deadline(job.deadline))
    }

    /// Probe the result location. Errors degrade to None (treated as "no
    /// output yet" for this iteration).
    async fn probe(&self, job: &PollJob<'_>) -> Option<Vec<String>> {
        match self
            .objects
            .list_results(job.result_location, job.category)
            .await
        {
            Ok(names) => Some(names),
            Err(e) => {
                debug!(result_location = job.result_location, error = %e, "storage probe failed");
                None
            }
        }
    }
}

fn estimate(elapsed: Duration, expected: Duration) -> f64 {
    if expected.is_zero() {
        return 0.95;
    }
    (elapsed.as_secs_f64() / expected.as_secs_f64()).min(0.95)
}

fn grow(interval: Duration, multiplier: f64, max: Duration) -> Duration {
    interval.mul_f64(multiplier).min(max)
}

fn report(on_progress: &Option<ProgressFn>, fraction: f64) {
    if let Some(cb) = on_progress {
        cb(fraction);
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
