// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The request store seam.
//!
//! The system of record is SQL-like: it supports conditional update by
//! current-status predicate, count-with-time-filter, and oldest-timestamp
//! queries. [`RequestUpdate`] is a typed patch computed by the ledger, so
//! a backend can translate a write to a single
//! `UPDATE ... SET ... WHERE id = ? AND status IN (...)` without knowing
//! the transition rules.

use async_trait::async_trait;
use mg_core::{Category, GenerationRequest, RequestId, RequestStatus};
use thiserror::Error;

/// Errors from the request store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the operation failed.
    /// Never propagated past the ledger/quota boundary.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Typed patch applied by a conditional update.
///
/// `completed_at_ms` also derives `duration_ms` from the stored
/// `started_at_ms` at apply time (null-safe: never-started requests keep a
/// null duration).
#[derive(Debug, Clone)]
pub struct RequestUpdate {
    pub status: RequestStatus,
    pub started_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
    pub job_handle: Option<String>,
    pub result_location: Option<String>,
    pub results: Option<Vec<String>>,
    pub error: Option<String>,
}

impl RequestUpdate {
    /// Patch for the `pending → generating` transition.
    pub fn generating(
        job_handle: impl Into<String>,
        result_location: impl Into<String>,
        now_ms: u64,
    ) -> Self {
        Self {
            status: RequestStatus::Generating,
            started_at_ms: Some(now_ms),
            completed_at_ms: None,
            job_handle: Some(job_handle.into()),
            result_location: Some(result_location.into()),
            results: None,
            error: None,
        }
    }

    /// Patch for the `completed` terminal transition.
    pub fn completed(results: Vec<String>, now_ms: u64) -> Self {
        Self {
            status: RequestStatus::Completed,
            started_at_ms: None,
            completed_at_ms: Some(now_ms),
            job_handle: None,
            result_location: None,
            results: Some(results),
            error: None,
        }
    }

    /// Patch for the `failed` terminal transition.
    pub fn failed(error: impl Into<String>, now_ms: u64) -> Self {
        Self {
            status: RequestStatus::Failed,
            started_at_ms: None,
            completed_at_ms: Some(now_ms),
            job_handle: None,
            result_location: None,
            results: None,
            error: Some(error.into()),
        }
    }

    /// Patch for the `timeout` terminal transition.
    pub fn timeout(error: impl Into<String>, now_ms: u64) -> Self {
        Self {
            status: RequestStatus::Timeout,
            started_at_ms: None,
            completed_at_ms: Some(now_ms),
            job_handle: None,
            result_location: None,
            results: None,
            error: Some(error.into()),
        }
    }

    /// Apply the patch to a request row.
    pub fn apply(self, request: &mut GenerationRequest) {
        request.status = self.status;
        if let Some(ms) = self.started_at_ms {
            request.started_at_ms = Some(ms);
        }
        if let Some(ms) = self.completed_at_ms {
            request.completed_at_ms = Some(ms);
            request.duration_ms = request.started_at_ms.map(|s| ms.saturating_sub(s));
        }
        if let Some(handle) = self.job_handle {
            request.job_handle = Some(handle);
        }
        if let Some(location) = self.result_location {
            request.result_location = Some(location);
        }
        if let Some(results) = self.results {
            request.results = Some(results);
        }
        if let Some(error) = self.error {
            request.error = Some(error);
        }
    }
}

/// System of record for generation requests
#[async_trait]
pub trait RequestStore: Clone + Send + Sync + 'static {
    /// Insert a new request row.
    async fn insert(&self, request: &GenerationRequest) -> Result<(), StoreError>;

    /// Fetch a request by id.
    async fn get(&self, id: &RequestId) -> Result<Option<GenerationRequest>, StoreError>;

    /// Conditionally apply `update` if the stored status is in `expect`.
    ///
    /// Returns the updated row, or None when the row is missing or the
    /// predicate failed. The check-and-apply is atomic with respect to
    /// other writers.
    async fn update_if_status(
        &self,
        id: &RequestId,
        expect: &[RequestStatus],
        update: RequestUpdate,
    ) -> Result<Option<GenerationRequest>, StoreError>;

    /// All `pending`/`generating` requests created at or after `cutoff_ms`,
    /// oldest first.
    async fn incomplete_since(&self, cutoff_ms: u64)
        -> Result<Vec<GenerationRequest>, StoreError>;

    /// Count of a principal's requests of a category created at or after
    /// `cutoff_ms`.
    async fn count_since(
        &self,
        principal: &str,
        category: Category,
        cutoff_ms: u64,
    ) -> Result<u64, StoreError>;

    /// Creation timestamp of the oldest in-window request for a principal
    /// and category, if any.
    async fn oldest_since(
        &self,
        principal: &str,
        category: Category,
        cutoff_ms: u64,
    ) -> Result<Option<u64>, StoreError>;
}
