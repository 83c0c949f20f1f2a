// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine configuration.
//!
//! Defaults match production tuning; everything can be overridden from a
//! TOML fragment. Durations are written as human strings ("30s", "5m").

use mg_core::Category;
use serde::{Deserialize, Deserializer};
use std::time::Duration;

/// Parse a duration string like "30s", "5m", "1h" into a Duration
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the numeric prefix
    let (num_str, suffix) = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| (&s[..i], &s[i..]))
        .unwrap_or((s, ""));

    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in duration: {}", s))?;

    let multiplier = match suffix.trim() {
        "ms" | "millis" | "millisecond" | "milliseconds" => {
            return Ok(Duration::from_millis(num));
        }
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hr" | "hrs" | "hour" | "hours" => 3600,
        "d" | "day" | "days" => 86400,
        other => return Err(format!("unknown duration suffix: {}", other)),
    };

    Ok(Duration::from_secs(num * multiplier))
}

fn de_duration<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(serde::de::Error::custom)
}

/// Backoff tuning for the operation poller.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// First sleep between status checks
    #[serde(deserialize_with = "de_duration")]
    pub initial_interval: Duration,
    /// Growth factor applied to the interval after each iteration
    pub backoff_multiplier: f64,
    /// Ceiling for the grown interval
    #[serde(deserialize_with = "de_duration")]
    pub max_interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_secs(1),
            backoff_multiplier: 1.5,
            max_interval: Duration::from_secs(8),
        }
    }
}

/// Per-category tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Hard wall-clock deadline for a single poll run
    #[serde(deserialize_with = "de_duration")]
    pub poll_deadline: Duration,
    /// Typical job duration, used for estimated progress
    #[serde(deserialize_with = "de_duration")]
    pub expected_duration: Duration,
    /// Requests allowed per principal in the trailing quota window
    pub quota_limit: u64,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        // Video defaults; EngineConfig::default overrides per category
        Self {
            poll_deadline: Duration::from_secs(300),
            expected_duration: Duration::from_secs(90),
            quota_limit: 5,
        }
    }
}

/// Startup resumption tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResumeConfig {
    /// Requests older than this are expired instead of resumed
    #[serde(deserialize_with = "de_duration")]
    pub max_age: Duration,
    /// Items resumed concurrently per batch
    pub batch_size: usize,
    /// Hard timeout for a single resumed item
    #[serde(deserialize_with = "de_duration")]
    pub item_timeout: Duration,
}

impl Default for ResumeConfig {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(24 * 3600),
            batch_size: 3,
            item_timeout: Duration::from_secs(600),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Concurrent result downloads allowed
    pub download_concurrency: usize,
    /// Default wait for a download permit
    #[serde(deserialize_with = "de_duration")]
    pub semaphore_timeout: Duration,
    /// Trailing window for quota accounting
    #[serde(deserialize_with = "de_duration")]
    pub quota_window: Duration,
    pub poll: PollConfig,
    pub resume: ResumeConfig,
    pub video: CategoryConfig,
    pub image: CategoryConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            download_concurrency: 5,
            semaphore_timeout: Duration::from_secs(30),
            quota_window: Duration::from_secs(24 * 3600),
            poll: PollConfig::default(),
            resume: ResumeConfig::default(),
            video: CategoryConfig {
                poll_deadline: Duration::from_secs(300),
                expected_duration: Duration::from_secs(90),
                quota_limit: 5,
            },
            image: CategoryConfig {
                poll_deadline: Duration::from_secs(180),
                expected_duration: Duration::from_secs(30),
                quota_limit: 20,
            },
        }
    }
}

impl EngineConfig {
    /// Tuning for a category.
    pub fn category(&self, category: Category) -> &CategoryConfig {
        match category {
            Category::Video => &self.video,
            Category::Image => &self.image,
        }
    }

    /// Parse a config from a TOML fragment; missing fields keep defaults.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
