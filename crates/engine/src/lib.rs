// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! MediaGen lifecycle engine: bounded-concurrency gate, long-running
//! operation poller, quota admission, and startup resumption.

mod config;
mod coordinator;
mod error;
mod poller;
mod quota;
mod semaphore;

pub use config::{parse_duration, CategoryConfig, EngineConfig, PollConfig, ResumeConfig};
pub use coordinator::{Coordinator, ResumeStrategy, ResumeSummary};
pub use error::{AcquireError, PollError};
pub use poller::{CompletionSignal, PollJob, PollOutcome, Poller, ProgressFn};
pub use quota::{QuotaDecision, QuotaGate};
pub use semaphore::{Permit, Semaphore};
