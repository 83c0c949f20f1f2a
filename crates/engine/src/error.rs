// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the lifecycle engine.
//!
//! Mapping policy: `NotFoundOrExpired` means the job aged out rather than
//! erred, so it always lands in the `timeout` terminal status; `Failed`
//! carries a sanitized message and lands in `failed`; deadline exhaustion
//! of any kind is `timeout`.

use std::time::Duration;
use thiserror::Error;

/// Errors from semaphore acquisition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcquireError {
    /// No permit became available within the wait timeout.
    #[error("timed out waiting for permit after {0:?}")]
    Timeout(Duration),
}

/// Errors from polling a long-running job
#[derive(Debug, Clone, Error)]
pub enum PollError {
    /// The hard wall-clock deadline elapsed without completion.
    #[error("poll deadline of {0:?} exceeded")]
    Deadline(Duration),
    /// The job handle no longer resolves at the generation API.
    #[error("job handle not found or expired")]
    NotFoundOrExpired,
    /// The generation API reported an explicit error payload.
    #[error("generation failed: {0}")]
    Failed(String),
}
