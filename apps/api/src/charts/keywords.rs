//! Keyword tables — the vocabulary behind status and category classification.
//!
//! Each axis is an ordered list of `(bucket, keywords)` pairs. Classification is
//! first-match-wins over that order, so the order is part of the contract:
//! moving `meeting` ahead of `testing` changes where a line containing "review"
//! lands.
//!
//! Matching is plain substring containment on a lower-cased line. "fix" hits
//! "prefix" and "fixed" alike.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Completion status of a single work item line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Completed,
    InProgress,
    Pending,
}

/// Status assigned when a line carries no status keyword at all.
pub const DEFAULT_STATUS: TaskStatus = TaskStatus::Completed;

/// Work category of a single work item line.
///
/// The snake_case names are a contract surface: the dashboard and the
/// document exporter read `categories.development`, `categories.other`, etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Development,
    Design,
    Testing,
    Documentation,
    Meeting,
    Other,
}

impl TaskCategory {
    /// Fixed enumeration order. Chart series follow it.
    pub const ALL: [TaskCategory; 6] = [
        TaskCategory::Development,
        TaskCategory::Design,
        TaskCategory::Testing,
        TaskCategory::Documentation,
        TaskCategory::Meeting,
        TaskCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Development => "development",
            TaskCategory::Design => "design",
            TaskCategory::Testing => "testing",
            TaskCategory::Documentation => "documentation",
            TaskCategory::Meeting => "meeting",
            TaskCategory::Other => "other",
        }
    }
}

/// One bucket and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSet<B> {
    pub bucket: B,
    pub keywords: Vec<String>,
}

impl<B> KeywordSet<B> {
    pub fn new(bucket: B, keywords: &[&str]) -> Self {
        Self {
            bucket,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
        .normalized()
    }

    /// True if any keyword occurs in `line`. `line` must already be lower-cased.
    pub fn matches(&self, line: &str) -> bool {
        self.keywords.iter().any(|k| line.contains(k.as_str()))
    }

    /// Lower-cases keywords and drops blank ones (a blank keyword would match every line).
    fn normalized(mut self) -> Self {
        self.keywords = self
            .keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        self
    }
}

fn first_match<B: Copy>(sets: &[KeywordSet<B>], line: &str) -> Option<B> {
    sets.iter().find(|set| set.matches(line)).map(|set| set.bucket)
}

/// Both classification axes, in evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordTable {
    pub status: Vec<KeywordSet<TaskStatus>>,
    pub categories: Vec<KeywordSet<TaskCategory>>,
}

impl KeywordTable {
    /// Status of a lower-cased line. Lines with no status keyword count as completed.
    pub fn classify_status(&self, line: &str) -> TaskStatus {
        first_match(&self.status, line).unwrap_or(DEFAULT_STATUS)
    }

    /// Category of a lower-cased line. Lines with no category keyword land in `other`.
    pub fn classify_category(&self, line: &str) -> TaskCategory {
        first_match(&self.categories, line).unwrap_or(TaskCategory::Other)
    }

    /// Parses a table from JSON. Keyword case is normalised; set order is kept as written.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let table: KeywordTable =
            serde_json::from_str(json).context("keyword table is not valid JSON")?;
        Ok(table.normalized())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read keyword table {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    fn normalized(self) -> Self {
        Self {
            status: self.status.into_iter().map(KeywordSet::normalized).collect(),
            categories: self
                .categories
                .into_iter()
                .map(KeywordSet::normalized)
                .collect(),
        }
    }
}

impl Default for KeywordTable {
    /// The built-in Indonesian/English vocabulary.
    fn default() -> Self {
        Self {
            status: vec![
                KeywordSet::new(
                    TaskStatus::Completed,
                    &[
                        "selesai",
                        "done",
                        "completed",
                        "finished",
                        "sukses",
                        "berhasil",
                        "fix",
                        "implemented",
                    ],
                ),
                KeywordSet::new(
                    TaskStatus::InProgress,
                    &[
                        "sedang",
                        "progress",
                        "working",
                        "developing",
                        "coding",
                        "designing",
                    ],
                ),
                KeywordSet::new(
                    TaskStatus::Pending,
                    &["pending", "waiting", "akan", "planned", "next", "todo"],
                ),
            ],
            categories: vec![
                KeywordSet::new(
                    TaskCategory::Development,
                    &[
                        "develop",
                        "coding",
                        "code",
                        "api",
                        "backend",
                        "frontend",
                        "database",
                        "bug",
                        "fix",
                        "implement",
                    ],
                ),
                KeywordSet::new(
                    TaskCategory::Design,
                    &[
                        "design",
                        "ui",
                        "ux",
                        "mockup",
                        "prototype",
                        "figma",
                        "layout",
                        "visual",
                        "graphic",
                    ],
                ),
                KeywordSet::new(
                    TaskCategory::Testing,
                    &["test", "testing", "qa", "quality", "debug", "review"],
                ),
                KeywordSet::new(
                    TaskCategory::Documentation,
                    &["document", "doc", "documentation", "readme", "guide", "manual"],
                ),
                KeywordSet::new(
                    TaskCategory::Meeting,
                    &["meeting", "rapat", "diskusi", "sync", "standup", "review"],
                ),
            ],
        }
    }
}
