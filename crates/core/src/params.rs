// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Immutable generation inputs.

use serde::{Deserialize, Serialize};

/// Inputs to a generation job, fixed at request creation.
///
/// Only `prompt` is universal; the rest are category-dependent (a video
/// request carries duration/audio, an image request typically only aspect
/// ratio or resolution). Unset fields are omitted from persisted JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub prompt: String,
    /// Requested clip length in seconds (video only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<u32>,
    /// Aspect ratio such as "16:9"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    /// Output resolution such as "1080p"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    /// Whether to generate an audio track (video only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<bool>,
}

impl GenerationParams {
    /// Create params with just a prompt; optionals unset.
    pub fn prompt_only(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            duration_secs: None,
            aspect_ratio: None,
            resolution: None,
            audio: None,
        }
    }
}
