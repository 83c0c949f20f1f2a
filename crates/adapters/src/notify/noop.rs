// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op notification channel.

use super::{NotifyChannel, NotifyError};
use async_trait::async_trait;

/// Notification channel that silently discards all deliveries.
///
/// Used when no chat-platform surface is wired in.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpNotifyChannel;

impl NoOpNotifyChannel {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotifyChannel for NoOpNotifyChannel {
    async fn deliver(
        &self,
        _scope: &str,
        _message: &str,
        _result: Option<&str>,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
