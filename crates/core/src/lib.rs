// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mg-core: Domain types for the MediaGen generation-job lifecycle engine

pub mod category;
pub mod clock;
pub mod id;
pub mod params;
pub mod request;

pub use category::Category;
pub use clock::{Clock, SystemClock};
pub use id::{IdGen, RequestId, UuidIdGen};
pub use params::GenerationParams;
pub use request::{
    truncate_error, GenerationRequest, RequestStatus, TransitionError, MAX_ERROR_LEN,
};

#[cfg(any(test, feature = "test-support"))]
pub use clock::FakeClock;
#[cfg(any(test, feature = "test-support"))]
pub use request::RequestBuilder;
