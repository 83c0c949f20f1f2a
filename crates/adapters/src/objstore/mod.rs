// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Object store adapter.
//!
//! The generation API deposits results into an object store; the engine
//! probes it as a secondary completion signal and lists it to collect
//! result locators. Only `list` is required; existence is list-and-filter.

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeObjectStore;

use async_trait::async_trait;
use mg_core::Category;
use thiserror::Error;

/// Errors from object store operations
#[derive(Debug, Clone, Error)]
pub enum ObjectStoreError {
    #[error("list failed: {0}")]
    ListFailed(String),
}

/// Adapter for listing stored generation output
#[async_trait]
pub trait ObjectStore: Clone + Send + Sync + 'static {
    /// List object names under a prefix.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, ObjectStoreError>;
}

/// Convenience queries built on `list`.
#[async_trait]
pub trait ObjectStoreExt: ObjectStore {
    /// List objects under `prefix` that look like output for `category`.
    async fn list_results(
        &self,
        prefix: &str,
        category: Category,
    ) -> Result<Vec<String>, ObjectStoreError> {
        let mut names = self.list(prefix).await?;
        names.retain(|n| category.matches_result(n));
        Ok(names)
    }

    /// Whether any category-appropriate output exists under `prefix`.
    async fn exists(&self, prefix: &str, category: Category) -> Result<bool, ObjectStoreError> {
        Ok(!self.list_results(prefix, category).await?.is_empty())
    }
}

impl<T: ObjectStore> ObjectStoreExt for T {}
