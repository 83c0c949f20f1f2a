// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared harness for behavioral specifications.
//!
//! Wires the whole engine against fake adapters, the in-memory store, and
//! a controllable clock, the same way the host process wires the real
//! collaborators.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use mg_adapters::{FakeGenerationApi, FakeNotifyChannel, FakeObjectStore};
use mg_core::id::SeqIdGen;
use mg_core::{Category, FakeClock, GenerationRequest, RequestId};
use mg_engine::{Coordinator, EngineConfig, Poller, QuotaGate, Semaphore};
use mg_storage::{Ledger, MemoryStore, RequestStore};

/// The fake clock's starting epoch, in milliseconds.
pub const T0: u64 = 1_700_000_000_000;

pub const HOUR_MS: u64 = 3600 * 1000;

/// A fully wired engine over fakes.
pub struct Engine {
    pub store: MemoryStore,
    pub api: FakeGenerationApi,
    pub objects: FakeObjectStore,
    pub notify: FakeNotifyChannel,
    pub clock: FakeClock,
    pub config: EngineConfig,
    pub ledger: Ledger<MemoryStore, FakeClock, SeqIdGen>,
    pub quota: QuotaGate<MemoryStore, FakeClock, SeqIdGen>,
    pub poller: Poller<FakeGenerationApi, FakeObjectStore>,
    pub semaphore: Semaphore,
    pub coordinator:
        Coordinator<MemoryStore, FakeGenerationApi, FakeObjectStore, FakeNotifyChannel, FakeClock>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let store = MemoryStore::new();
        let api = FakeGenerationApi::new();
        let objects = FakeObjectStore::new();
        let notify = FakeNotifyChannel::new();
        let clock = FakeClock::new();
        let ledger = Ledger::with_id_gen(store.clone(), clock.clone(), SeqIdGen::default());
        let quota = QuotaGate::new(ledger.clone(), config.clone());
        let poller = Poller::new(api.clone(), objects.clone(), config.poll.clone());
        let semaphore = Semaphore::new(config.download_concurrency, config.semaphore_timeout);
        let coordinator = Coordinator::new(
            store.clone(),
            api.clone(),
            objects.clone(),
            notify.clone(),
            clock.clone(),
            config.clone(),
        );
        Self {
            store,
            api,
            objects,
            notify,
            clock,
            config,
            ledger,
            quota,
            poller,
            semaphore,
            coordinator,
        }
    }

    /// Fetch a request row straight from the store.
    pub async fn row(&self, id: &RequestId) -> GenerationRequest {
        self.store.get(id).await.unwrap().unwrap()
    }
}

/// An engine with default production tuning.
pub fn engine() -> Engine {
    Engine::new(EngineConfig::default())
}

/// Storage prefix the engine derives for a request's output.
pub fn result_location(category: Category, id: &RequestId) -> String {
    format!("generations/{}/{}", category, id)
}
