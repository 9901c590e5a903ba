use anyhow::Result;
use glob::Pattern;
use lazy_static::lazy_static;

use super::CheckContext;
use crate::models::{Category, CheckResult, Severity};
use crate::utils::read_lossy;

const CATEGORY: Category = Category::Documentation;

/// Sections a README is expected to mention, matched case-insensitively.
const README_SECTIONS: &[&str] = &["installation", "usage", "contributing"];

lazy_static! {
    pub(super) static ref README: Pattern = Pattern::new("README*").unwrap();
    pub(super) static ref LICENSE: Pattern = Pattern::new("LICENSE*").unwrap();
}

pub(super) fn run(ctx: &CheckContext, checks: &mut Vec<CheckResult>) -> Result<()> {
    match ctx.index.top_level_named(&README).next() {
        Some(readme) => match read_lossy(&readme.path) {
            Ok(content) => checks.push(readme_completeness(&content).with_file(readme.display())),
            Err(e) => ctx
                .observer
                .item_skipped(CATEGORY, &readme.relative, &e.to_string()),
        },
        None => checks.push(CheckResult::failed(
            "readme_exists",
            Severity::Medium,
            "No README file found",
        )),
    }

    if ctx.index.top_level_named(&LICENSE).next().is_some() {
        checks.push(CheckResult::passed("license_exists", "License file found"));
    } else {
        checks.push(CheckResult::warning(
            "license_exists",
            Severity::Low,
            "No license file found",
        ));
    }

    Ok(())
}

fn readme_completeness(content: &str) -> CheckResult {
    let lowered = content.to_lowercase();
    let missing: Vec<&str> = README_SECTIONS
        .iter()
        .copied()
        .filter(|section| !lowered.contains(section))
        .collect();

    if missing.is_empty() {
        CheckResult::passed(
            "readme_completeness",
            "README contains all recommended sections",
        )
    } else {
        CheckResult::warning(
            "readme_completeness",
            Severity::Low,
            format!("README missing sections: {}", missing.join(", ")),
        )
        .with_detail("missing", missing)
    }
}
