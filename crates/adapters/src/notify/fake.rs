// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake notification channel for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{NotifyChannel, NotifyError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded delivery
#[derive(Debug, Clone)]
pub struct NotifyCall {
    pub scope: String,
    pub message: String,
    pub result: Option<String>,
}

struct FakeNotifyState {
    calls: Vec<NotifyCall>,
    deliver_error: Option<NotifyError>,
}

/// Fake notification channel for testing
#[derive(Clone)]
pub struct FakeNotifyChannel {
    inner: Arc<Mutex<FakeNotifyState>>,
}

impl Default for FakeNotifyChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeNotifyChannel {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeNotifyState {
                calls: Vec::new(),
                deliver_error: None,
            })),
        }
    }

    /// Get all recorded deliveries
    pub fn calls(&self) -> Vec<NotifyCall> {
        self.inner.lock().calls.clone()
    }

    /// Set the error returned by every subsequent `deliver` call
    pub fn set_deliver_error(&self, error: NotifyError) {
        self.inner.lock().deliver_error = Some(error);
    }
}

#[async_trait]
impl NotifyChannel for FakeNotifyChannel {
    async fn deliver(
        &self,
        scope: &str,
        message: &str,
        result: Option<&str>,
    ) -> Result<(), NotifyError> {
        let mut inner = self.inner.lock();
        inner.calls.push(NotifyCall {
            scope: scope.to_string(),
            message: message.to_string(),
            result: result.map(|s| s.to_string()),
        });
        match inner.deliver_error.clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
