// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::request::RequestBuilder;

fn pending() -> GenerationRequest {
    RequestBuilder::new("req-1").build()
}

#[test]
fn new_request_is_pending_with_nothing_set() {
    let req = pending();
    assert_eq!(req.status, RequestStatus::Pending);
    assert!(req.job_handle.is_none());
    assert!(req.result_location.is_none());
    assert!(req.started_at_ms.is_none());
    assert!(req.completed_at_ms.is_none());
    assert!(req.duration_ms.is_none());
    assert!(req.results.is_none());
    assert!(req.error.is_none());
}

#[test]
fn mark_generating_sets_handle_location_and_start() {
    let mut req = pending();
    req.mark_generating("op-1", "generations/video/req-1", 2_000)
        .unwrap();

    assert_eq!(req.status, RequestStatus::Generating);
    assert_eq!(req.job_handle.as_deref(), Some("op-1"));
    assert_eq!(
        req.result_location.as_deref(),
        Some("generations/video/req-1")
    );
    assert_eq!(req.started_at_ms, Some(2_000));
    assert!(req.completed_at_ms.is_none());
}

#[test]
fn mark_completed_derives_duration() {
    let mut req = pending();
    req.mark_generating("op-1", "loc", 2_000).unwrap();
    req.mark_completed(vec!["obj/a.mp4".to_string()], 2_500)
        .unwrap();

    assert_eq!(req.status, RequestStatus::Completed);
    assert_eq!(req.completed_at_ms, Some(2_500));
    assert_eq!(req.duration_ms, Some(500));
    assert_eq!(req.results.as_deref(), Some(&["obj/a.mp4".to_string()][..]));
}

#[test]
fn complete_without_start_has_null_duration() {
    let mut req = pending();
    req.mark_completed(vec!["obj/a.mp4".to_string()], 2_500)
        .unwrap();

    assert_eq!(req.completed_at_ms, Some(2_500));
    assert!(req.started_at_ms.is_none());
    assert!(req.duration_ms.is_none());
}

#[test]
fn terminal_states_are_final() {
    let mut req = pending();
    req.mark_failed("boom", 2_000).unwrap();

    let err = req
        .mark_completed(vec!["obj/a.mp4".to_string()], 3_000)
        .unwrap_err();
    assert_eq!(err.from, RequestStatus::Failed);
    assert_eq!(err.to, RequestStatus::Completed);

    // Fields from the failed transition are untouched
    assert_eq!(req.status, RequestStatus::Failed);
    assert_eq!(req.completed_at_ms, Some(2_000));
    assert!(req.results.is_none());
}

#[test]
fn generating_twice_is_rejected() {
    let mut req = pending();
    req.mark_generating("op-1", "loc", 2_000).unwrap();
    assert!(req.mark_generating("op-2", "loc2", 3_000).is_err());
    assert_eq!(req.job_handle.as_deref(), Some("op-1"));
}

#[yare::parameterized(
    pending_to_generating = { RequestStatus::Pending, RequestStatus::Generating, true },
    pending_to_completed = { RequestStatus::Pending, RequestStatus::Completed, true },
    pending_to_failed = { RequestStatus::Pending, RequestStatus::Failed, true },
    pending_to_timeout = { RequestStatus::Pending, RequestStatus::Timeout, true },
    pending_to_pending = { RequestStatus::Pending, RequestStatus::Pending, false },
    generating_to_completed = { RequestStatus::Generating, RequestStatus::Completed, true },
    generating_to_failed = { RequestStatus::Generating, RequestStatus::Failed, true },
    generating_to_timeout = { RequestStatus::Generating, RequestStatus::Timeout, true },
    generating_to_pending = { RequestStatus::Generating, RequestStatus::Pending, false },
    generating_to_generating = { RequestStatus::Generating, RequestStatus::Generating, false },
    completed_to_failed = { RequestStatus::Completed, RequestStatus::Failed, false },
    completed_to_generating = { RequestStatus::Completed, RequestStatus::Generating, false },
    failed_to_completed = { RequestStatus::Failed, RequestStatus::Completed, false },
    timeout_to_completed = { RequestStatus::Timeout, RequestStatus::Completed, false },
)]
fn transition_table(from: RequestStatus, to: RequestStatus, legal: bool) {
    assert_eq!(from.can_transition_to(to), legal);
}

#[test]
fn error_message_is_truncated() {
    let long = "x".repeat(MAX_ERROR_LEN + 100);
    let mut req = pending();
    req.mark_failed(&long, 2_000).unwrap();
    assert_eq!(req.error.as_ref().map(|e| e.chars().count()), Some(MAX_ERROR_LEN));
}

#[test]
fn truncate_error_respects_char_boundaries() {
    let msg: String = "é".repeat(MAX_ERROR_LEN + 10);
    let truncated = truncate_error(&msg);
    assert_eq!(truncated.chars().count(), MAX_ERROR_LEN);
}

#[test]
fn status_display_and_serde() {
    assert_eq!(RequestStatus::Generating.to_string(), "generating");
    let json = serde_json::to_string(&RequestStatus::Timeout).unwrap();
    assert_eq!(json, "\"timeout\"");
}

#[test]
fn request_serde_round_trip() {
    let mut req = pending();
    req.mark_generating("op-1", "loc", 2_000).unwrap();
    let json = serde_json::to_string(&req).unwrap();
    let parsed: GenerationRequest = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.status, RequestStatus::Generating);
    assert_eq!(parsed.job_handle.as_deref(), Some("op-1"));
    // Unset optionals are omitted entirely
    assert!(!json.contains("completed_at_ms"));
}
