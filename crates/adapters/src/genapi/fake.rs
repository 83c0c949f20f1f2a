// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake generation API for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ApiError, GenerationApi, JobStatus};
use async_trait::async_trait;
use mg_core::{Category, GenerationParams};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Recorded call to FakeGenerationApi
#[derive(Debug, Clone)]
pub enum ApiCall {
    Start {
        prompt: String,
        category: Category,
        result_location: String,
    },
    CheckStatus {
        job_handle: String,
    },
}

struct FakeApiState {
    calls: Vec<ApiCall>,
    /// Scripted responses consumed in order by `check_status`; when empty,
    /// the last_status (or `running`) is returned.
    status_script: VecDeque<Result<JobStatus, ApiError>>,
    last_status: Option<Result<JobStatus, ApiError>>,
    start_error: Option<ApiError>,
    next_handle: u64,
}

/// Fake generation API for testing
///
/// Allows scripting `check_status` responses and records all calls.
#[derive(Clone)]
pub struct FakeGenerationApi {
    inner: Arc<Mutex<FakeApiState>>,
}

impl Default for FakeGenerationApi {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGenerationApi {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeApiState {
                calls: Vec::new(),
                status_script: VecDeque::new(),
                last_status: None,
                start_error: None,
                next_handle: 0,
            })),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ApiCall> {
        self.inner.lock().calls.clone()
    }

    /// Number of recorded `start` calls
    pub fn start_count(&self) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ApiCall::Start { .. }))
            .count()
    }

    /// Queue a `check_status` response. Responses are consumed in order;
    /// once the queue is empty, the final queued response repeats.
    pub fn push_status(&self, status: Result<JobStatus, ApiError>) {
        self.inner.lock().status_script.push_back(status);
    }

    /// Set the error returned by every subsequent `start` call
    pub fn set_start_error(&self, error: ApiError) {
        self.inner.lock().start_error = Some(error);
    }
}

#[async_trait]
impl GenerationApi for FakeGenerationApi {
    async fn start(
        &self,
        params: &GenerationParams,
        category: Category,
        result_location: &str,
    ) -> Result<String, ApiError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ApiCall::Start {
            prompt: params.prompt.clone(),
            category,
            result_location: result_location.to_string(),
        });
        if let Some(err) = inner.start_error.clone() {
            return Err(err);
        }
        inner.next_handle += 1;
        Ok(format!("op-{}", inner.next_handle))
    }

    async fn check_status(&self, job_handle: &str) -> Result<JobStatus, ApiError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ApiCall::CheckStatus {
            job_handle: job_handle.to_string(),
        });
        if let Some(next) = inner.status_script.pop_front() {
            inner.last_status = Some(next.clone());
            return next;
        }
        inner
            .last_status
            .clone()
            .unwrap_or_else(|| Ok(JobStatus::running()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
