// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Startup resumption specs: interrupted requests are driven back to a
//! terminal state after a restart.

use crate::prelude::*;
use mg_adapters::JobStatus;
use mg_core::{Category, GenerationParams, RequestStatus};

async fn interrupted_generating(e: &Engine, handle: &str) -> mg_core::RequestId {
    let id = e
        .ledger
        .create(
            "alice",
            "guild-1/channel-1",
            Category::Video,
            GenerationParams::prompt_only("a sunset"),
        )
        .await;
    let location = result_location(Category::Video, &id);
    e.ledger.set_generating(&id, handle, &location).await;
    id
}

/// The idempotence guarantee: a request whose job finished while the
/// process was down is completed from the stored handle. The start
/// capability is never re-invoked.
#[tokio::test]
async fn finished_job_is_completed_without_a_second_start() {
    let e = engine();
    let id = interrupted_generating(&e, "op-77").await;
    e.api.push_status(Ok(JobStatus::done_with(vec![
        "obj/a.mp4".to_string(),
        "obj/b.mp4".to_string(),
    ])));

    let summary = e.coordinator.resume_all().await;

    assert_eq!(summary.resumed, 1);
    assert_eq!(summary.completed, 1);
    assert_eq!(e.api.start_count(), 0);

    let row = e.row(&id).await;
    assert_eq!(row.status, RequestStatus::Completed);
    assert_eq!(
        row.results,
        Some(vec!["obj/a.mp4".to_string(), "obj/b.mp4".to_string()])
    );
    assert_eq!(e.notify.calls().len(), 1);
}

/// A mixed sweep: one stale pending request expires, one fresh pending
/// request is started, one generating request is polled. The summary
/// accounts for all three.
#[tokio::test]
async fn mixed_sweep_classifies_every_request() {
    let e = engine();

    // Stale: pending since 25 hours before the restart
    let stale = e
        .ledger
        .create(
            "bob",
            "guild-1/channel-2",
            Category::Video,
            GenerationParams::prompt_only("an old prompt"),
        )
        .await;
    e.clock.advance(25 * HOUR_MS);

    let fresh = e
        .ledger
        .create(
            "alice",
            "guild-1/channel-1",
            Category::Image,
            GenerationParams::prompt_only("a lighthouse"),
        )
        .await;
    let polled = interrupted_generating(&e, "op-77").await;

    // One done status: the first check consumes it, the repeat covers the
    // second handle
    e.api
        .push_status(Ok(JobStatus::done_with(vec!["obj/a.mp4".to_string()])));

    let summary = e.coordinator.resume_all().await;

    assert_eq!(summary.expired, 1);
    assert_eq!(summary.resumed, 2);
    assert_eq!(summary.completed, 2);

    let stale_row = e.row(&stale).await;
    assert_eq!(stale_row.status, RequestStatus::Timeout);
    assert_eq!(stale_row.error.as_deref(), Some("expired while offline"));

    assert_eq!(e.row(&fresh).await.status, RequestStatus::Completed);
    assert_eq!(e.row(&polled).await.status, RequestStatus::Completed);
    // Only the fresh pending request needed a start call
    assert_eq!(e.api.start_count(), 1);
}

/// Resumption is safe to run when there is nothing to do.
#[tokio::test]
async fn sweep_over_an_empty_ledger_is_a_noop() {
    let e = engine();
    let summary = e.coordinator.resume_all().await;
    assert_eq!(summary, mg_engine::ResumeSummary::default());
    assert!(e.api.calls().is_empty());
    assert!(e.notify.calls().is_empty());
}
