use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The six fixed check categories, declared in execution order.
/// `Ord` follows declaration order, so `BTreeMap<Category, _>` iterates in run order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CodeQuality,
    Security,
    Testing,
    Documentation,
    Dependencies,
    Performance,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::CodeQuality,
        Category::Security,
        Category::Testing,
        Category::Documentation,
        Category::Dependencies,
        Category::Performance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::CodeQuality => "code_quality",
            Category::Security => "security",
            Category::Testing => "testing",
            Category::Documentation => "documentation",
            Category::Dependencies => "dependencies",
            Category::Performance => "performance",
        }
    }

    /// Human-readable heading used by the summary and markdown renderers.
    pub fn title(self) -> &'static str {
        match self {
            Category::CodeQuality => "Code Quality",
            Category::Security => "Security",
            Category::Testing => "Testing",
            Category::Documentation => "Documentation",
            Category::Dependencies => "Dependencies",
            Category::Performance => "Performance",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Warning,
    /// Display-only; carries no scoring weight.
    Info,
}

impl CheckStatus {
    /// Contribution of one result to the weighted pass count.
    pub fn weight(self) -> f64 {
        match self {
            CheckStatus::Passed => 1.0,
            CheckStatus::Warning => 0.5,
            CheckStatus::Failed | CheckStatus::Info => 0.0,
        }
    }
}

/// Severity is independent of status: a `warning` may be `high`.
/// `Info` annotates passing results.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Low => write!(f, "LOW"),
            Severity::Medium => write!(f, "MEDIUM"),
            Severity::High => write!(f, "HIGH"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One evaluated rule instance.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckResult {
    pub check_name: String,
    pub status: CheckStatus,
    pub severity: Severity,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub line_number: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<BTreeMap<String, serde_json::Value>>,
}

impl CheckResult {
    pub fn new(
        check_name: impl Into<String>,
        status: CheckStatus,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            check_name: check_name.into(),
            status,
            severity,
            message: message.into(),
            file_path: None,
            line_number: None,
            details: None,
        }
    }

    pub fn passed(check_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(check_name, CheckStatus::Passed, Severity::Info, message)
    }

    pub fn failed(
        check_name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self::new(check_name, CheckStatus::Failed, severity, message)
    }

    pub fn warning(
        check_name: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self::new(check_name, CheckStatus::Warning, severity, message)
    }

    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_line(mut self, line_number: usize) -> Self {
        self.line_number = Some(line_number);
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), value.into());
        self
    }
}

pub type CategoryResults = BTreeMap<Category, Vec<CheckResult>>;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub warnings: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "CRITICAL"),
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub category: Category,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub action: String,
}

/// Branch and HEAD of the analyzed repository, when it is a git work tree.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GitInfo {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub head_commit: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AnalysisReport {
    pub repository: String,
    pub generated_at: String,
    pub health_score: u8,
    pub checks: CategoryResults,
    pub summary: BTreeMap<Category, CategorySummary>,
    pub recommendations: Vec<Recommendation>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub git: Option<GitInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_serialize_as_snake_case_keys_in_run_order() {
        let mut checks = CategoryResults::new();
        for category in Category::ALL.iter().rev() {
            checks.insert(*category, Vec::new());
        }
        let json = serde_json::to_string(&checks).unwrap();
        assert_eq!(
            json,
            r#"{"code_quality":[],"security":[],"testing":[],"documentation":[],"dependencies":[],"performance":[]}"#
        );
    }

    #[test]
    fn optional_fields_are_omitted() {
        let check = CheckResult::passed("license_exists", "License file found");
        let value = serde_json::to_value(&check).unwrap();
        assert_eq!(value["status"], "passed");
        assert_eq!(value["severity"], "info");
        assert!(value.get("file_path").is_none());
        assert!(value.get("details").is_none());
    }

    #[test]
    fn status_weights() {
        assert_eq!(CheckStatus::Passed.weight(), 1.0);
        assert_eq!(CheckStatus::Warning.weight(), 0.5);
        assert_eq!(CheckStatus::Failed.weight(), 0.0);
        assert_eq!(CheckStatus::Info.weight(), 0.0);
    }
}
