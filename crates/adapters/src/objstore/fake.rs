// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake object store for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ObjectStore, ObjectStoreError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

struct FakeStoreState {
    objects: HashMap<String, Vec<String>>,
    list_error: Option<ObjectStoreError>,
    list_count: usize,
}

/// Fake object store for testing
///
/// Objects can be added mid-test to simulate the generation API writing
/// results while the poller is running.
#[derive(Clone)]
pub struct FakeObjectStore {
    inner: Arc<Mutex<FakeStoreState>>,
}

impl Default for FakeObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeStoreState {
                objects: HashMap::new(),
                list_error: None,
                list_count: 0,
            })),
        }
    }

    /// Place an object under a prefix
    pub fn put(&self, prefix: &str, name: impl Into<String>) {
        self.inner
            .lock()
            .objects
            .entry(prefix.to_string())
            .or_default()
            .push(name.into());
    }

    /// Set the error returned by every subsequent `list` call
    pub fn set_list_error(&self, error: ObjectStoreError) {
        self.inner.lock().list_error = Some(error);
    }

    /// Clear a previously set list error
    pub fn clear_list_error(&self) {
        self.inner.lock().list_error = None;
    }

    /// Number of `list` calls made
    pub fn list_count(&self) -> usize {
        self.inner.lock().list_count
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        let mut inner = self.inner.lock();
        inner.list_count += 1;
        if let Some(err) = inner.list_error.clone() {
            return Err(err);
        }
        Ok(inner.objects.get(prefix).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
