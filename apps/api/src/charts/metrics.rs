//! Metrics extraction — turns a free-text work update into status and category counts.
//!
//! Every non-blank line is one work item. Each item lands in exactly one status
//! bucket and, independently, exactly one category bucket, so both axes always
//! sum to the number of items.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::keywords::{KeywordTable, TaskCategory, TaskStatus};

/// Per-category item counts, serialised as an object keyed by category name
/// in enumeration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub development: u32,
    pub design: u32,
    pub testing: u32,
    pub documentation: u32,
    pub meeting: u32,
    pub other: u32,
}

impl CategoryCounts {
    pub fn get(&self, category: TaskCategory) -> u32 {
        match category {
            TaskCategory::Development => self.development,
            TaskCategory::Design => self.design,
            TaskCategory::Testing => self.testing,
            TaskCategory::Documentation => self.documentation,
            TaskCategory::Meeting => self.meeting,
            TaskCategory::Other => self.other,
        }
    }

    fn increment(&mut self, category: TaskCategory) {
        let slot = match category {
            TaskCategory::Development => &mut self.development,
            TaskCategory::Design => &mut self.design,
            TaskCategory::Testing => &mut self.testing,
            TaskCategory::Documentation => &mut self.documentation,
            TaskCategory::Meeting => &mut self.meeting,
            TaskCategory::Other => &mut self.other,
        };
        *slot += 1;
    }

    /// `(category, count)` pairs in the fixed enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (TaskCategory, u32)> + '_ {
        TaskCategory::ALL.iter().map(move |&c| (c, self.get(c)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, n)| n).sum()
    }
}

/// Aggregate counts for one work update. Built fresh per call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsAggregate {
    pub tasks_completed: u32,
    pub tasks_in_progress: u32,
    pub tasks_pending: u32,
    pub categories: CategoryCounts,
}

impl MetricsAggregate {
    /// Number of work items (equals the category total).
    pub fn total_tasks(&self) -> u32 {
        self.tasks_completed + self.tasks_in_progress + self.tasks_pending
    }

    /// Completed share as a whole percentage, 0 when there are no items.
    pub fn completion_rate(&self) -> u32 {
        let total = self.total_tasks();
        if total == 0 {
            return 0;
        }
        ((self.tasks_completed as f64 / total as f64) * 100.0).round() as u32
    }
}

/// Classifies every non-blank line of `text` and returns the counts.
///
/// Never fails: empty or whitespace-only input yields an all-zero aggregate.
pub fn extract_metrics(text: &str, keywords: &KeywordTable) -> MetricsAggregate {
    let lowered = text.to_lowercase();
    let mut metrics = MetricsAggregate::default();

    for line in lowered.lines().filter(|l| !l.trim().is_empty()) {
        match keywords.classify_status(line) {
            TaskStatus::Completed => metrics.tasks_completed += 1,
            TaskStatus::InProgress => metrics.tasks_in_progress += 1,
            TaskStatus::Pending => metrics.tasks_pending += 1,
        }
        metrics
            .categories
            .increment(keywords.classify_category(line));
    }

    debug!(
        items = metrics.total_tasks(),
        completed = metrics.tasks_completed,
        in_progress = metrics.tasks_in_progress,
        pending = metrics.tasks_pending,
        "Extracted work update metrics"
    );

    metrics
}
