use std::collections::BTreeMap;

use crate::models::{
    Category, CategoryResults, CategorySummary, CheckStatus, Priority, Recommendation,
};

/// `round(100 * weighted / total)`: passed counts 1, warning 0.5, anything else 0.
/// No checks at all means unknown health, which scores 0.
pub fn health_score(checks: &CategoryResults) -> u8 {
    let (total, weighted) = checks
        .values()
        .flatten()
        .fold((0usize, 0.0f64), |(n, w), c| (n + 1, w + c.status.weight()));

    if total == 0 {
        return 0;
    }
    (100.0 * weighted / total as f64).round().clamp(0.0, 100.0) as u8
}

pub fn summarize(checks: &CategoryResults) -> BTreeMap<Category, CategorySummary> {
    checks
        .iter()
        .map(|(category, results)| {
            let count = |status| results.iter().filter(|c| c.status == status).count();
            let summary = CategorySummary {
                total: results.len(),
                passed: count(CheckStatus::Passed),
                failed: count(CheckStatus::Failed),
                warnings: count(CheckStatus::Warning),
            };
            (*category, summary)
        })
        .collect()
}

/// At most one recommendation per category, in category order.
pub fn recommendations(checks: &CategoryResults) -> Vec<Recommendation> {
    checks
        .iter()
        .filter_map(|(category, results)| {
            let failed = results
                .iter()
                .filter(|c| c.status == CheckStatus::Failed)
                .count();
            let warnings = results
                .iter()
                .filter(|c| c.status == CheckStatus::Warning)
                .count();
            recommendation_for(*category, failed, warnings)
        })
        .collect()
}

fn recommendation_for(category: Category, failed: usize, warnings: usize) -> Option<Recommendation> {
    let (priority, title, description, action) = match category {
        Category::CodeQuality if failed > 0 => (
            Priority::High,
            "Fix code quality issues",
            format!("Found {} linting issues that should be addressed", failed),
            "Run autopep8 and fix remaining manual issues",
        ),
        Category::Security if failed > 0 => (
            Priority::Critical,
            "Address security vulnerabilities",
            "Security issues detected that need immediate attention".to_string(),
            "Review and fix all security issues before deploying",
        ),
        Category::Testing if failed > 0 => (
            Priority::High,
            "Improve test coverage",
            "Testing setup needs improvement".to_string(),
            "Add tests and ensure they run properly",
        ),
        Category::Documentation if failed > 0 || warnings > 0 => (
            Priority::Medium,
            "Improve documentation",
            "Documentation is incomplete or missing".to_string(),
            "Add missing README sections and documentation",
        ),
        _ => return None,
    };

    Some(Recommendation {
        category,
        priority,
        title: title.to_string(),
        description,
        action: action.to_string(),
    })
}
