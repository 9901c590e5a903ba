use std::path::Path;

use crate::models::Category;

/// Receives analyzer progress and recovered failures.
/// Injected so analyzer internals stay testable without process-wide log state.
pub trait AnalysisObserver {
    fn category_started(&self, _category: Category) {}

    fn category_finished(&self, _category: Category, _checks: usize) {}

    /// A category stopped early; its partial results are kept.
    fn category_failed(&self, _category: Category, _error: &anyhow::Error) {}

    /// A single file or tool call was skipped without producing a result.
    fn item_skipped(&self, _category: Category, _item: &Path, _reason: &str) {}

    fn tool_unavailable(&self, _category: Category, _program: &str) {}
}

/// Forwards observer events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl AnalysisObserver for TracingObserver {
    fn category_started(&self, category: Category) {
        tracing::info!(%category, "running checks");
    }

    fn category_finished(&self, category: Category, checks: usize) {
        tracing::info!(%category, checks, "checks complete");
    }

    fn category_failed(&self, category: Category, error: &anyhow::Error) {
        let error = format!("{:#}", error);
        tracing::warn!(%category, error = %error, "category aborted");
    }

    fn item_skipped(&self, category: Category, item: &Path, reason: &str) {
        tracing::debug!(%category, item = %item.display(), reason, "item skipped");
    }

    fn tool_unavailable(&self, category: Category, program: &str) {
        tracing::debug!(%category, program, "tool not available, skipping");
    }
}
