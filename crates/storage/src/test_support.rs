// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test helpers for storage consumers
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::store::{RequestStore, RequestUpdate, StoreError};
use async_trait::async_trait;
use mg_core::{Category, GenerationRequest, RequestId, RequestStatus};

/// Store whose every operation fails, for degradation tests.
#[derive(Clone, Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn err() -> StoreError {
        StoreError::Unavailable("connection refused".to_string())
    }
}

#[async_trait]
impl RequestStore for UnavailableStore {
    async fn insert(&self, _request: &GenerationRequest) -> Result<(), StoreError> {
        Err(Self::err())
    }

    async fn get(&self, _id: &RequestId) -> Result<Option<GenerationRequest>, StoreError> {
        Err(Self::err())
    }

    async fn update_if_status(
        &self,
        _id: &RequestId,
        _expect: &[RequestStatus],
        _update: RequestUpdate,
    ) -> Result<Option<GenerationRequest>, StoreError> {
        Err(Self::err())
    }

    async fn incomplete_since(
        &self,
        _cutoff_ms: u64,
    ) -> Result<Vec<GenerationRequest>, StoreError> {
        Err(Self::err())
    }

    async fn count_since(
        &self,
        _principal: &str,
        _category: Category,
        _cutoff_ms: u64,
    ) -> Result<u64, StoreError> {
        Err(Self::err())
    }

    async fn oldest_since(
        &self,
        _principal: &str,
        _category: Category,
        _cutoff_ms: u64,
    ) -> Result<Option<u64>, StoreError> {
        Err(Self::err())
    }
}
