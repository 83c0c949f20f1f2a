// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generation API adapter.
//!
//! The real client (HTTP transport, authentication, token refresh) lives
//! outside this workspace; the engine only depends on this narrow seam:
//! start an asynchronous job, check its status by handle.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ApiCall, FakeGenerationApi};

use async_trait::async_trait;
use mg_core::{Category, GenerationParams};
use thiserror::Error;

/// Errors from generation API operations
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The remote rejected the request (4xx/5xx with a payload)
    #[error("request rejected: {0}")]
    RequestRejected(String),
    /// Network/transport-level failure
    #[error("transport error: {0}")]
    Transport(String),
    /// The job handle no longer resolves (expired operation record)
    #[error("job handle not found or expired")]
    NotFoundOrExpired,
}

/// Status snapshot of an asynchronous generation job.
#[derive(Debug, Clone, Default)]
pub struct JobStatus {
    /// Whether the remote reports the job as finished
    pub done: bool,
    /// Result locators from the response payload, if any
    pub results: Vec<String>,
    /// Error payload from the remote, if the job finished unsuccessfully
    pub error: Option<String>,
}

impl JobStatus {
    /// A not-yet-done status.
    pub fn running() -> Self {
        Self::default()
    }

    /// A successfully finished status with the given result locators.
    pub fn done_with(results: Vec<String>) -> Self {
        Self {
            done: true,
            results,
            error: None,
        }
    }

    /// A finished status carrying an error payload.
    pub fn done_with_error(error: impl Into<String>) -> Self {
        Self {
            done: true,
            results: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Adapter for the asynchronous generation API
#[async_trait]
pub trait GenerationApi: Clone + Send + Sync + 'static {
    /// Submit a generation job. Returns the opaque job handle.
    ///
    /// `result_location` is the storage prefix the remote is instructed to
    /// deposit outputs under.
    async fn start(
        &self,
        params: &GenerationParams,
        category: Category,
        result_location: &str,
    ) -> Result<String, ApiError>;

    /// Query the status of a previously started job.
    async fn check_status(&self, job_handle: &str) -> Result<JobStatus, ApiError>;
}
