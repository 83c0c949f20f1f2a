// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generation request entity and status state machine.
//!
//! A [`GenerationRequest`] is the persisted unit of work. Its status moves
//! forward only: `pending → generating → {completed | failed | timeout}`,
//! with `pending` also allowed to fail/time out directly (expiry before
//! start). Terminal states admit no further transitions. All mutation goes
//! through the `mark_*` helpers, which enforce legality and derive the
//! timestamp/duration fields; the ledger is the only caller in production.

use crate::category::Category;
use crate::params::GenerationParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum stored length of an error message, in characters.
pub const MAX_ERROR_LEN: usize = 500;

/// Truncate an error message to [`MAX_ERROR_LEN`] characters.
pub fn truncate_error(message: &str) -> String {
    if message.chars().count() <= MAX_ERROR_LEN {
        message.to_string()
    } else {
        message.chars().take(MAX_ERROR_LEN).collect()
    }
}

/// Status of a generation request through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Created, generation not yet started
    Pending,
    /// Handed to the generation API, awaiting completion
    Generating,
    /// Finished successfully with results
    Completed,
    /// Finished with an error
    Failed,
    /// Deadline or staleness cutoff exceeded
    Timeout,
}

impl RequestStatus {
    /// Whether this status is terminal (no further transitions permitted).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Completed | RequestStatus::Failed | RequestStatus::Timeout
        )
    }

    /// Whether a transition from `self` to `next` is legal.
    ///
    /// Transitions are monotonic and one-directional. `pending` may reach
    /// any later state (a request can fail or expire before it starts);
    /// `generating` may only reach a terminal state; terminal states admit
    /// nothing.
    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        match self {
            RequestStatus::Pending => next != RequestStatus::Pending,
            RequestStatus::Generating => next.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Generating => write!(f, "generating"),
            RequestStatus::Completed => write!(f, "completed"),
            RequestStatus::Failed => write!(f, "failed"),
            RequestStatus::Timeout => write!(f, "timeout"),
        }
    }
}

/// Rejected status transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("illegal status transition: {from} -> {to}")]
pub struct TransitionError {
    pub from: RequestStatus,
    pub to: RequestStatus,
}

/// A persisted generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub id: String,
    /// Owning user id
    pub principal: String,
    /// Delivery routing context (guild/channel or equivalent)
    pub scope: String,
    pub category: Category,
    pub params: GenerationParams,
    pub status: RequestStatus,
    /// Job identifier at the external generation API, set on `generating`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_handle: Option<String>,
    /// Storage prefix where results are expected, set on `generating`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_location: Option<String>,
    /// Epoch milliseconds when created
    pub created_at_ms: u64,
    /// Epoch milliseconds when generation started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at_ms: Option<u64>,
    /// Epoch milliseconds when a terminal state was reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_ms: Option<u64>,
    /// `completed_at_ms - started_at_ms`, None if never started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Result object locators, non-empty only when completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<String>>,
    /// Truncated error message, set on failure/timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationRequest {
    /// Create a new pending request.
    pub fn new(
        id: impl Into<String>,
        principal: impl Into<String>,
        scope: impl Into<String>,
        category: Category,
        params: GenerationParams,
        now_ms: u64,
    ) -> Self {
        Self {
            id: id.into(),
            principal: principal.into(),
            scope: scope.into(),
            category,
            params,
            status: RequestStatus::Pending,
            job_handle: None,
            result_location: None,
            created_at_ms: now_ms,
            started_at_ms: None,
            completed_at_ms: None,
            duration_ms: None,
            results: None,
            error: None,
        }
    }

    /// Check if the request is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn transition(&mut self, next: RequestStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    fn finish(&mut self, now_ms: u64) {
        self.completed_at_ms = Some(now_ms);
        self.duration_ms = self.started_at_ms.map(|s| now_ms.saturating_sub(s));
    }

    /// Transition `pending → generating`, recording the job handle and the
    /// storage prefix where results are expected. Handle and location are
    /// set together and never cleared.
    pub fn mark_generating(
        &mut self,
        job_handle: impl Into<String>,
        result_location: impl Into<String>,
        now_ms: u64,
    ) -> Result<(), TransitionError> {
        if self.status != RequestStatus::Pending {
            return Err(TransitionError {
                from: self.status,
                to: RequestStatus::Generating,
            });
        }
        self.transition(RequestStatus::Generating)?;
        self.started_at_ms = Some(now_ms);
        self.job_handle = Some(job_handle.into());
        self.result_location = Some(result_location.into());
        Ok(())
    }

    /// Transition to `completed`, storing results and deriving duration.
    pub fn mark_completed(
        &mut self,
        results: Vec<String>,
        now_ms: u64,
    ) -> Result<(), TransitionError> {
        self.transition(RequestStatus::Completed)?;
        self.finish(now_ms);
        self.results = Some(results);
        Ok(())
    }

    /// Transition to `failed`, storing a truncated error message.
    pub fn mark_failed(&mut self, error: &str, now_ms: u64) -> Result<(), TransitionError> {
        self.transition(RequestStatus::Failed)?;
        self.finish(now_ms);
        self.error = Some(truncate_error(error));
        Ok(())
    }

    /// Transition to `timeout`, storing a truncated error message.
    pub fn mark_timeout(&mut self, error: &str, now_ms: u64) -> Result<(), TransitionError> {
        self.transition(RequestStatus::Timeout)?;
        self.finish(now_ms);
        self.error = Some(truncate_error(error));
        Ok(())
    }
}

/// Builder for `GenerationRequest` with test defaults.
#[cfg(any(test, feature = "test-support"))]
pub struct RequestBuilder {
    id: String,
    principal: String,
    scope: String,
    category: Category,
    params: GenerationParams,
    created_at_ms: u64,
}

#[cfg(any(test, feature = "test-support"))]
impl RequestBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            principal: "user-1".to_string(),
            scope: "guild-1/channel-1".to_string(),
            category: Category::Video,
            params: GenerationParams::prompt_only("a test prompt"),
            created_at_ms: 1_700_000_000_000,
        }
    }

    pub fn principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = principal.into();
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn params(mut self, params: GenerationParams) -> Self {
        self.params = params;
        self
    }

    pub fn created_at_ms(mut self, ms: u64) -> Self {
        self.created_at_ms = ms;
        self
    }

    pub fn build(self) -> GenerationRequest {
        GenerationRequest::new(
            self.id,
            self.principal,
            self.scope,
            self.category,
            self.params,
            self.created_at_ms,
        )
    }
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
