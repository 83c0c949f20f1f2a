// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Quota admission specs against the live ledger.

use crate::prelude::*;
use mg_core::{Category, GenerationParams};
use mg_engine::QuotaDecision;

async fn create(e: &Engine, principal: &str, category: Category) {
    e.ledger
        .create(
            principal,
            "guild-1/channel-1",
            category,
            GenerationParams::prompt_only("a prompt"),
        )
        .await;
}

/// A principal at the video limit is denied until the oldest request ages
/// out of the trailing window.
#[tokio::test]
async fn denial_lifts_when_the_window_slides_past_the_oldest_request() {
    let e = engine();

    for _ in 0..5 {
        create(&e, "alice", Category::Video).await;
    }

    let denied = e.quota.consume("alice", Category::Video).await;
    match denied {
        QuotaDecision::Denied { wait_secs } => assert!(wait_secs > 0),
        other => panic!("expected denial at the limit, got {:?}", other),
    }

    // The denied principal is still fine in the other category
    assert!(e.quota.consume("alice", Category::Image).await.is_allowed());

    e.clock.advance(24 * HOUR_MS + 1);
    assert_eq!(
        e.quota.consume("alice", Category::Video).await,
        QuotaDecision::Allowed { remaining: 5 }
    );
}

/// Requests spread across the window free up headroom one at a time.
#[tokio::test]
async fn headroom_returns_gradually_for_staggered_requests() {
    let e = engine();

    for _ in 0..5 {
        create(&e, "alice", Category::Video).await;
        e.clock.advance(HOUR_MS);
    }

    // Five requests over the last five hours; still at the limit
    assert!(!e.quota.consume("alice", Category::Video).await.is_allowed());

    // 20 hours later the first request is 25h old and out of the window
    e.clock.advance(20 * HOUR_MS);
    assert_eq!(
        e.quota.consume("alice", Category::Video).await,
        QuotaDecision::Allowed { remaining: 1 }
    );
}
