use anyhow::Result;
use serde_json::json;

use super::CheckContext;
use crate::models::{CheckResult, Severity};

pub(super) fn run(ctx: &CheckContext, checks: &mut Vec<CheckResult>) -> Result<()> {
    let threshold = ctx.config.large_file_threshold;
    let large: Vec<(String, u64)> = ctx
        .index
        .files()
        .iter()
        .filter_map(|f| f.size.filter(|&s| s > threshold).map(|s| (f.display(), s)))
        .collect();

    if large.is_empty() {
        checks.push(CheckResult::passed("large_files", "No unusually large files found"));
    } else {
        let files: Vec<_> = large
            .iter()
            .map(|(path, size)| json!({ "path": path, "size": size }))
            .collect();
        checks.push(
            CheckResult::warning(
                "large_files",
                Severity::Low,
                format!(
                    "Found {} large files (>{})",
                    large.len(),
                    human_size(threshold)
                ),
            )
            .with_detail("files", files),
        );
    }

    if ctx.index.has_top_level(".gitignore") {
        checks.push(CheckResult::passed("gitignore_exists", ".gitignore file found"));
    } else {
        checks.push(CheckResult::warning(
            "gitignore_exists",
            Severity::Low,
            "No .gitignore file found",
        ));
    }

    Ok(())
}

fn human_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}
