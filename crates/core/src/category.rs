// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Generation job categories.
//!
//! Categories share the ledger but differ in result format, polling
//! deadline, and quota limit. The per-category tunables live in the engine
//! configuration; the category itself only knows what its output files
//! look like.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Video generation
    Video,
    /// Image generation
    Image,
}

impl Category {
    /// File extensions that count as output for this category.
    ///
    /// The poller's storage probe only treats objects with one of these
    /// extensions as a completion signal.
    pub fn result_extensions(&self) -> &'static [&'static str] {
        match self {
            Category::Video => &[".mp4"],
            Category::Image => &[".png", ".jpg", ".jpeg", ".webp"],
        }
    }

    /// Whether the object name looks like output for this category.
    pub fn matches_result(&self, object_name: &str) -> bool {
        let lower = object_name.to_ascii_lowercase();
        self.result_extensions()
            .iter()
            .any(|ext| lower.ends_with(ext))
    }

    /// All known categories.
    pub fn all() -> &'static [Category] {
        &[Category::Video, Category::Image]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Video => write!(f, "video"),
            Category::Image => write!(f, "image"),
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(Category::Video),
            "image" => Ok(Category::Image),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}

#[cfg(test)]
#[path = "category_tests.rs"]
mod tests;
