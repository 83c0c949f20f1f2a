// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for the external collaborators of the lifecycle engine:
//! the generation API, the object store, and the notification channel.

pub mod genapi;
pub mod notify;
pub mod objstore;
pub mod traced;

pub use genapi::{ApiError, GenerationApi, JobStatus};
pub use notify::{NoOpNotifyChannel, NotifyChannel, NotifyError};
pub use objstore::{ObjectStore, ObjectStoreError, ObjectStoreExt};
pub use traced::{TracedGenerationApi, TracedObjectStore};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use genapi::{ApiCall, FakeGenerationApi};
#[cfg(any(test, feature = "test-support"))]
pub use notify::{FakeNotifyChannel, NotifyCall};
#[cfg(any(test, feature = "test-support"))]
pub use objstore::FakeObjectStore;
