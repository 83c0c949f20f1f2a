// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Whole-lifecycle specs: request creation through polling to completion.

use crate::prelude::*;
use mg_adapters::JobStatus;
use mg_core::{Category, GenerationParams, RequestStatus};
use mg_engine::{CompletionSignal, PollJob, QuotaDecision};

/// The happy path: create, admit, start, poll to done, complete.
#[tokio::test(start_paused = true)]
async fn request_runs_from_creation_to_completion() {
    let e = engine();

    // Intake: create and check quota
    let id = e
        .ledger
        .create(
            "alice",
            "guild-1/channel-1",
            Category::Video,
            GenerationParams::prompt_only("a sunset over water"),
        )
        .await;
    assert_eq!(e.row(&id).await.status, RequestStatus::Pending);
    assert_eq!(
        e.quota.consume("alice", Category::Video).await,
        QuotaDecision::Allowed { remaining: 4 }
    );

    // Hand off to the generation API
    let location = result_location(Category::Video, &id);
    assert!(e.ledger.set_generating(&id, "op-1", &location).await);

    // Remote reports running twice, then done
    e.api.push_status(Ok(JobStatus::running()));
    e.api.push_status(Ok(JobStatus::running()));
    e.api
        .push_status(Ok(JobStatus::done_with(vec!["obj/a.mp4".to_string()])));

    let tuning = e.config.category(Category::Video);
    let started = tokio::time::Instant::now();
    let outcome = e
        .poller
        .poll(
            PollJob {
                job_handle: "op-1",
                result_location: &location,
                category: Category::Video,
                deadline: tuning.poll_deadline,
                expected_duration: tuning.expected_duration,
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(outcome.via, CompletionSignal::StatusApi);
    assert_eq!(outcome.results, vec!["obj/a.mp4".to_string()]);

    // The wall clock saw the same wait the poller did
    let polled_ms = started.elapsed().as_millis() as u64;
    e.clock.advance(polled_ms);
    assert!(e.ledger.set_completed(&id, outcome.results).await);

    let row = e.row(&id).await;
    assert_eq!(row.status, RequestStatus::Completed);
    assert_eq!(row.results, Some(vec!["obj/a.mp4".to_string()]));
    // Two running responses mean two backoff sleeps: 1s + 1.5s
    let duration = row.duration_ms.unwrap();
    assert!(
        (2500..=2550).contains(&duration),
        "duration_ms = {}",
        duration
    );
}

/// The fallback signal: results land in storage while the status API
/// keeps saying "running".
#[tokio::test(start_paused = true)]
async fn storage_probe_completes_a_job_the_status_api_never_reports() {
    let e = engine();
    let id = e
        .ledger
        .create(
            "alice",
            "guild-1/channel-1",
            Category::Image,
            GenerationParams::prompt_only("a lighthouse"),
        )
        .await;
    let location = result_location(Category::Image, &id);
    e.ledger.set_generating(&id, "op-1", &location).await;

    let objects = e.objects.clone();
    let put_at = {
        let location = location.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(2200)).await;
            objects.put(&location, "out.png");
        })
    };

    let tuning = e.config.category(Category::Image);
    let outcome = e
        .poller
        .poll(
            PollJob {
                job_handle: "op-1",
                result_location: &location,
                category: Category::Image,
                deadline: tuning.poll_deadline,
                expected_duration: tuning.expected_duration,
            },
            None,
        )
        .await
        .unwrap();
    put_at.await.unwrap();

    assert_eq!(outcome.via, CompletionSignal::StorageProbe);
    e.ledger.set_completed(&id, outcome.results).await;
    assert_eq!(e.row(&id).await.status, RequestStatus::Completed);
}

/// A failure payload from the remote lands in `failed` with the message
/// stored on the row.
#[tokio::test]
async fn error_payload_marks_the_request_failed() {
    let e = engine();
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
    e.ledger.set_generating(&id, "op-1", &location).await;
    e.api
        .push_status(Ok(JobStatus::done_with_error("content policy violation")));

    let tuning = e.config.category(Category::Video);
    let err = e
        .poller
        .poll(
            PollJob {
                job_handle: "op-1",
                result_location: &location,
                category: Category::Video,
                deadline: tuning.poll_deadline,
                expected_duration: tuning.expected_duration,
            },
            None,
        )
        .await
        .unwrap_err();

    e.ledger.set_failed(&id, &err.to_string()).await;
    let row = e.row(&id).await;
    assert_eq!(row.status, RequestStatus::Failed);
    assert!(row.error.unwrap().contains("content policy violation"));

    // Terminal is final: a late completion write is rejected
    assert!(!e.ledger.set_completed(&id, vec!["obj/a.mp4".into()]).await);
    assert_eq!(e.row(&id).await.status, RequestStatus::Failed);
}

/// Persisted rows serialize without nulls for unset optional fields.
#[tokio::test]
async fn serialized_rows_omit_unset_fields() {
    let e = engine();
    let id = e
        .ledger
        .create(
            "alice",
            "guild-1/channel-1",
            Category::Video,
            GenerationParams::prompt_only("a sunset"),
        )
        .await;

    let value = serde_json::to_value(e.row(&id).await).unwrap();
    assert_eq!(value["status"], "pending");
    assert_eq!(value["category"], "video");
    let object = value.as_object().unwrap();
    assert!(!object.contains_key("job_handle"));
    assert!(!object.contains_key("results"));
    assert!(!object.contains_key("error"));
}
