// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory request store.
//!
//! Reference implementation of the [`RequestStore`] contract, used when no
//! SQL backend is wired in and by every test. The conditional update is
//! atomic under a single mutex.

use crate::store::{RequestStore, RequestUpdate, StoreError};
use async_trait::async_trait;
use mg_core::{Category, GenerationRequest, RequestId, RequestStatus};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory system of record
#[derive(Clone, Default)]
pub struct MemoryStore {
    rows: Arc<Mutex<HashMap<String, GenerationRequest>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored rows
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait]
impl RequestStore for MemoryStore {
    async fn insert(&self, request: &GenerationRequest) -> Result<(), StoreError> {
        self.rows
            .lock()
            .insert(request.id.clone(), request.clone());
        Ok(())
    }

    async fn get(&self, id: &RequestId) -> Result<Option<GenerationRequest>, StoreError> {
        Ok(self.rows.lock().get(id.as_str()).cloned())
    }

    async fn update_if_status(
        &self,
        id: &RequestId,
        expect: &[RequestStatus],
        update: RequestUpdate,
    ) -> Result<Option<GenerationRequest>, StoreError> {
        let mut rows = self.rows.lock();
        let Some(row) = rows.get_mut(id.as_str()) else {
            return Ok(None);
        };
        if !expect.contains(&row.status) {
            return Ok(None);
        }
        update.apply(row);
        Ok(Some(row.clone()))
    }

    async fn incomplete_since(
        &self,
        cutoff_ms: u64,
    ) -> Result<Vec<GenerationRequest>, StoreError> {
        let rows = self.rows.lock();
        let mut incomplete: Vec<GenerationRequest> = rows
            .values()
            .filter(|r| !r.is_terminal() && r.created_at_ms >= cutoff_ms)
            .cloned()
            .collect();
        incomplete.sort_by_key(|r| r.created_at_ms);
        Ok(incomplete)
    }

    async fn count_since(
        &self,
        principal: &str,
        category: Category,
        cutoff_ms: u64,
    ) -> Result<u64, StoreError> {
        let rows = self.rows.lock();
        Ok(rows
            .values()
            .filter(|r| {
                r.principal == principal && r.category == category && r.created_at_ms >= cutoff_ms
            })
            .count() as u64)
    }

    async fn oldest_since(
        &self,
        principal: &str,
        category: Category,
        cutoff_ms: u64,
    ) -> Result<Option<u64>, StoreError> {
        let rows = self.rows.lock();
        Ok(rows
            .values()
            .filter(|r| {
                r.principal == principal && r.category == category && r.created_at_ms >= cutoff_ms
            })
            .map(|r| r.created_at_ms)
            .min())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
