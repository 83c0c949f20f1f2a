// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-principal sliding-window admission control.
//!
//! Counts a principal's requests of a category over a trailing window via
//! the ledger's query surface. On a store failure the gate fails open:
//! availability of the generation path is prioritized over strict quota
//! enforcement.

use crate::config::EngineConfig;
use mg_core::{Category, Clock, IdGen, UuidIdGen};
use mg_storage::{Ledger, RequestStore};
use tracing::warn;

/// Outcome of a quota check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDecision {
    /// Admitted; `remaining` is `limit - count` over the trailing window
    Allowed { remaining: u64 },
    /// Denied; `wait_secs` is how long until the oldest in-window request
    /// ages out
    Denied { wait_secs: u64 },
}

impl QuotaDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, QuotaDecision::Allowed { .. })
    }
}

/// Sliding-window quota gate over the ledger
#[derive(Clone)]
pub struct QuotaGate<S, C, G = UuidIdGen> {
    ledger: Ledger<S, C, G>,
    config: EngineConfig,
}

impl<S: RequestStore, C: Clock, G: IdGen> QuotaGate<S, C, G> {
    pub fn new(ledger: Ledger<S, C, G>, config: EngineConfig) -> Self {
        Self { ledger, config }
    }

    /// Admit or deny a request for `principal` in `category`.
    pub async fn consume(&self, principal: &str, category: Category) -> QuotaDecision {
        let window = self.config.quota_window;
        let limit = self.config.category(category).quota_limit;

        let count = match self.ledger.count_in_window(principal, category, window).await {
            Ok(count) => count,
            Err(e) => {
                warn!(principal, %category, error = %e, "quota query failed, failing open");
                return QuotaDecision::Allowed { remaining: 0 };
            }
        };

        if count < limit {
            return QuotaDecision::Allowed {
                remaining: limit - count,
            };
        }

        let wait_secs = match self.ledger.oldest_in_window(principal, category, window).await {
            Ok(Some(oldest_ms)) => {
                let expires_ms = oldest_ms.saturating_add(window.as_millis() as u64);
                // Round up so a denial never claims a zero wait
                expires_ms.saturating_sub(self.ledger.now_ms()).div_ceil(1000)
            }
            Ok(None) => 0,
            Err(e) => {
                warn!(principal, %category, error = %e, "quota query failed, failing open");
                return QuotaDecision::Allowed { remaining: 0 };
            }
        };

        QuotaDecision::Denied { wait_secs }
    }
}

#[cfg(test)]
#[path = "quota_tests.rs"]
mod tests;
