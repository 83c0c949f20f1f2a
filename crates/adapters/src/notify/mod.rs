// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Notification channel adapters.
//!
//! Completion/failure notices are delivered to the request's scope (the
//! guild/channel it was created from). Delivery is best-effort: the chat
//! platform may refuse for permission reasons, and a refused notice never
//! changes the outcome of the job.

mod noop;

pub use noop::NoOpNotifyChannel;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeNotifyChannel, NotifyCall};

use async_trait::async_trait;
use thiserror::Error;

/// Errors from notification delivery
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
}

/// Adapter for delivering user-visible notices to a scope
#[async_trait]
pub trait NotifyChannel: Clone + Send + Sync + 'static {
    /// Deliver a message to a scope, optionally attaching a result locator.
    async fn deliver(
        &self,
        scope: &str,
        message: &str,
        result: Option<&str>,
    ) -> Result<(), NotifyError>;
}
