// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The request ledger: persisted state machine for generation requests.
//!
//! The ledger is the only writer of request rows. Every write is a
//! conditional update gated on the current status, so an illegal
//! transition (e.g. completing an already-failed request) is rejected at
//! the store, not just in memory.
//!
//! Writes degrade gracefully: a store failure is logged and swallowed and
//! the in-process caller proceeds as if the write succeeded. Losing a
//! status update must never abort an otherwise-successful generation.

use crate::store::{RequestStore, RequestUpdate, StoreError};
use mg_core::{
    truncate_error, Category, Clock, GenerationParams, GenerationRequest, IdGen, RequestId,
    RequestStatus, UuidIdGen,
};
use std::time::Duration;
use tracing::warn;

const NON_TERMINAL: &[RequestStatus] = &[RequestStatus::Pending, RequestStatus::Generating];

/// Persisted request state machine
#[derive(Clone)]
pub struct Ledger<S, C, G = UuidIdGen> {
    store: S,
    clock: C,
    id_gen: G,
}

impl<S: RequestStore, C: Clock> Ledger<S, C, UuidIdGen> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            id_gen: UuidIdGen,
        }
    }
}

impl<S: RequestStore, C: Clock, G: IdGen> Ledger<S, C, G> {
    pub fn with_id_gen(store: S, clock: C, id_gen: G) -> Self {
        Self {
            store,
            clock,
            id_gen,
        }
    }

    /// Create a new pending request and return its id.
    ///
    /// If the store is unreachable the id is returned anyway (synthetic,
    /// locally generated) so the surrounding flow continues uncoupled from
    /// ledger availability.
    pub async fn create(
        &self,
        principal: &str,
        scope: &str,
        category: Category,
        params: GenerationParams,
    ) -> RequestId {
        let id = RequestId::new(self.id_gen.next());
        let request = GenerationRequest::new(
            id.as_str(),
            principal,
            scope,
            category,
            params,
            self.clock.epoch_ms(),
        );
        if let Err(e) = self.store.insert(&request).await {
            warn!(request_id = %id, error = %e, "failed to persist new request, continuing with synthetic id");
        }
        id
    }

    /// Fetch a request snapshot. Degrades to None on store failure.
    pub async fn get(&self, id: &RequestId) -> Option<GenerationRequest> {
        match self.store.get(id).await {
            Ok(row) => row,
            Err(e) => {
                warn!(request_id = %id, error = %e, "failed to read request");
                None
            }
        }
    }

    /// Transition `pending → generating`, storing the job handle and the
    /// result location. Returns whether the write was persisted.
    pub async fn set_generating(
        &self,
        id: &RequestId,
        job_handle: &str,
        result_location: &str,
    ) -> bool {
        let update = RequestUpdate::generating(job_handle, result_location, self.clock.epoch_ms());
        self.write(id, &[RequestStatus::Pending], update, "generating")
            .await
    }

    /// Transition to `completed` with result locators.
    pub async fn set_completed(&self, id: &RequestId, results: Vec<String>) -> bool {
        let update = RequestUpdate::completed(results, self.clock.epoch_ms());
        self.write(id, NON_TERMINAL, update, "completed").await
    }

    /// Transition to `failed` with a truncated error message.
    pub async fn set_failed(&self, id: &RequestId, error: &str) -> bool {
        let update = RequestUpdate::failed(truncate_error(error), self.clock.epoch_ms());
        self.write(id, NON_TERMINAL, update, "failed").await
    }

    /// Transition to `timeout` with a truncated error message.
    pub async fn set_timeout(&self, id: &RequestId, error: &str) -> bool {
        let update = RequestUpdate::timeout(truncate_error(error), self.clock.epoch_ms());
        self.write(id, NON_TERMINAL, update, "timeout").await
    }

    /// All incomplete (`pending`/`generating`) requests created within
    /// `max_age`, oldest first. Degrades to an empty list on store failure.
    pub async fn get_incomplete(&self, max_age: Duration) -> Vec<GenerationRequest> {
        let cutoff = self.window_cutoff(max_age);
        match self.store.incomplete_since(cutoff).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "failed to query incomplete requests");
                Vec::new()
            }
        }
    }

    /// Count of a principal's requests of a category in the trailing
    /// window. Propagates store failure: the quota gate owns the fail-open
    /// decision.
    pub async fn count_in_window(
        &self,
        principal: &str,
        category: Category,
        window: Duration,
    ) -> Result<u64, StoreError> {
        self.store
            .count_since(principal, category, self.window_cutoff(window))
            .await
    }

    /// Creation timestamp of the oldest in-window request, if any.
    pub async fn oldest_in_window(
        &self,
        principal: &str,
        category: Category,
        window: Duration,
    ) -> Result<Option<u64>, StoreError> {
        self.store
            .oldest_since(principal, category, self.window_cutoff(window))
            .await
    }

    /// Current time per the injected clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    fn window_cutoff(&self, window: Duration) -> u64 {
        self.clock
            .epoch_ms()
            .saturating_sub(window.as_millis() as u64)
    }

    async fn write(
        &self,
        id: &RequestId,
        expect: &[RequestStatus],
        update: RequestUpdate,
        target: &str,
    ) -> bool {
        match self.store.update_if_status(id, expect, update).await {
            Ok(Some(_)) => true,
            Ok(None) => {
                warn!(request_id = %id, target, "status transition rejected or request missing");
                false
            }
            Err(e) => {
                warn!(request_id = %id, target, error = %e, "ledger write failed, continuing");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
