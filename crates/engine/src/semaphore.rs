// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Counting semaphore with a strictly FIFO wait queue.
//!
//! Caps concurrent result downloads. `tokio::sync::Semaphore` is not used
//! because the gate needs per-waiter timeouts, observable queue depth, and
//! direct handoff: on release, the permit goes straight to the
//! longest-waiting entry, so it never idles between a waiter's wakeup and
//! its acquisition and no newer waiter can slip ahead.
//!
//! Release is the RAII drop of [`Permit`]; release-once discipline is
//! enforced by the guard. A grant travels as a guard too, so a permit
//! handed to a waiter that was cancelled before receiving it returns to
//! the pool instead of leaking.

use crate::error::AcquireError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

struct Waiter {
    seq: u64,
    grant: oneshot::Sender<Permit>,
}

struct Inner {
    permits: usize,
    queue: VecDeque<Waiter>,
    next_seq: u64,
}

/// Bounded-concurrency gate with FIFO waiters and per-waiter timeout
#[derive(Clone)]
pub struct Semaphore {
    inner: Arc<Mutex<Inner>>,
    capacity: usize,
    default_timeout: Duration,
}

/// Scoped permit; releasing happens on drop.
pub struct Permit {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for Permit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Permit").finish_non_exhaustive()
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        let waiter = {
            let mut inner = self.inner.lock();
            let Some(waiter) = inner.queue.pop_front() else {
                inner.permits += 1;
                return;
            };
            waiter
        };
        // Hand the permit directly to the longest-waiting entry. The grant
        // carries a fresh guard, so a waiter that is gone before it can
        // receive (timed out or cancelled) returns the permit through that
        // guard's drop, which moves on to the next waiter.
        let handoff = Permit {
            inner: Arc::clone(&self.inner),
        };
        let _ = waiter.grant.send(handoff);
    }
}

impl Semaphore {
    /// Create a gate with `capacity` permits and the given default
    /// acquisition timeout.
    pub fn new(capacity: usize, default_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                permits: capacity,
                queue: VecDeque::new(),
                next_seq: 0,
            })),
            capacity,
            default_timeout,
        }
    }

    /// Acquire a permit, waiting at most `timeout`.
    ///
    /// On timeout the waiter unlinks itself from the queue. If a grant
    /// raced in before the unlink, the acquisition counts as successful:
    /// the permit was handed over first.
    pub async fn acquire(&self, timeout: Duration) -> Result<Permit, AcquireError> {
        let (seq, mut rx) = {
            let mut inner = self.inner.lock();
            if inner.permits > 0 {
                inner.permits -= 1;
                return Ok(self.permit());
            }
            let (tx, rx) = oneshot::channel();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.queue.push_back(Waiter { seq, grant: tx });
            (seq, rx)
        };

        tokio::select! {
            granted = &mut rx => {
                match granted {
                    Ok(permit) => Ok(permit),
                    // Semaphore dropped out from under us
                    Err(_) => Err(AcquireError::Timeout(timeout)),
                }
            }
            _ = tokio::time::sleep(timeout) => {
                {
                    let mut inner = self.inner.lock();
                    if let Some(pos) = inner.queue.iter().position(|w| w.seq == seq) {
                        inner.queue.remove(pos);
                        return Err(AcquireError::Timeout(timeout));
                    }
                }
                // Not in the queue: a grant was handed over concurrently.
                match rx.try_recv() {
                    Ok(permit) => Ok(permit),
                    Err(_) => Err(AcquireError::Timeout(timeout)),
                }
            }
        }
    }

    /// Acquire with the configured default timeout.
    pub async fn acquire_default(&self) -> Result<Permit, AcquireError> {
        self.acquire(self.default_timeout).await
    }

    /// Run `fut` while holding a permit (default timeout). The permit is
    /// released on every exit path.
    pub async fn run_exclusive<F, T>(&self, fut: F) -> Result<T, AcquireError>
    where
        F: Future<Output = T>,
    {
        let _permit = self.acquire_default().await?;
        Ok(fut.await)
    }

    /// Permits currently available (not held, not being handed off).
    pub fn available_permits(&self) -> usize {
        self.inner.lock().permits
    }

    /// Number of tasks currently waiting.
    pub fn queue_depth(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn permit(&self) -> Permit {
        Permit {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
#[path = "semaphore_tests.rs"]
mod tests;
