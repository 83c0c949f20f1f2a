// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::genapi::{ApiError, GenerationApi, JobStatus};
use crate::objstore::{ObjectStore, ObjectStoreError};
use async_trait::async_trait;
use mg_core::{Category, GenerationParams};
use tracing::Instrument;

/// Wrapper that adds tracing to any GenerationApi
#[derive(Clone)]
pub struct TracedGenerationApi<A> {
    inner: A,
}

impl<A> TracedGenerationApi<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<A: GenerationApi> GenerationApi for TracedGenerationApi<A> {
    async fn start(
        &self,
        params: &GenerationParams,
        category: Category,
        result_location: &str,
    ) -> Result<String, ApiError> {
        async {
            tracing::info!(prompt_len = params.prompt.len(), "submitting job");
            let start = std::time::Instant::now();
            let result = self.inner.start(params, category, result_location).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(handle) => tracing::info!(job_handle = handle.as_str(), elapsed_ms, "job started"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "start failed"),
            }
            result
        }
        .instrument(tracing::info_span!("genapi.start", %category, result_location))
        .await
    }

    async fn check_status(&self, job_handle: &str) -> Result<JobStatus, ApiError> {
        let result = self.inner.check_status(job_handle).await;
        tracing::info_span!("genapi.check_status", job_handle).in_scope(|| match &result {
            Ok(status) => tracing::debug!(done = status.done, "checked"),
            Err(e) => tracing::debug!(error = %e, "status check failed"),
        });
        result
    }
}

/// Wrapper that adds tracing to any ObjectStore
#[derive(Clone)]
pub struct TracedObjectStore<O> {
    inner: O,
}

impl<O> TracedObjectStore<O> {
    pub fn new(inner: O) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<O: ObjectStore> ObjectStore for TracedObjectStore<O> {
    async fn list(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        let result = self.inner.list(prefix).await;
        tracing::info_span!("objstore.list", prefix).in_scope(|| match &result {
            Ok(names) => tracing::debug!(count = names.len(), "listed"),
            Err(e) => tracing::debug!(error = %e, "list failed"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
