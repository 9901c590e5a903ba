use serde::{Deserialize, Serialize};
use std::time::Duration;

const MIB: u64 = 1024 * 1024;

/// An external program plus the arguments placed before the per-item arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Full argument list with `extra` appended after the configured args.
    pub fn args_with<I, S>(&self, extra: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = self.args.clone();
        args.extend(extra.into_iter().map(Into::into));
        args
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub python_lint: ToolCommand,
    pub js_lint: ToolCommand,
    pub vulnerability_scanner: ToolCommand,
    pub test_collector: ToolCommand,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            python_lint: ToolCommand::new("flake8", &[]),
            js_lint: ToolCommand::new("npx", &["eslint", "--format", "json"]),
            vulnerability_scanner: ToolCommand::new("safety", &["check", "-r"]),
            test_collector: ToolCommand::new("python", &["-m", "pytest", "--collect-only", "-q"]),
        }
    }
}

/// Settings for the single-file `lint` command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Lint codes ignored when `--ignore` is not given. Aligned with Black formatting.
    pub ignore: Vec<String>,
    pub max_line_length: usize,
    pub formatter: ToolCommand,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            ignore: vec!["E203".to_string(), "W503".to_string()],
            max_line_length: 88,
            formatter: ToolCommand::new("autopep8", &["--aggressive"]),
        }
    }
}

/// Analyzer tuning. Every field has a default, so a config file only lists overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub max_lint_files: usize,
    pub max_js_lint_files: usize,
    pub max_complexity_files: usize,
    pub function_length_threshold: usize,
    pub large_file_threshold: u64,
    pub tool_timeout_secs: u64,
    pub test_collection_timeout_secs: u64,
    /// Directory names pruned from the repository walk.
    pub exclude_dirs: Vec<String>,
    pub tools: ToolsConfig,
    pub lint: LintConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_lint_files: 10,
            max_js_lint_files: 5,
            max_complexity_files: 5,
            function_length_threshold: 50,
            large_file_threshold: 10 * MIB,
            tool_timeout_secs: 30,
            test_collection_timeout_secs: 30,
            exclude_dirs: vec![".git".to_string()],
            tools: ToolsConfig::default(),
            lint: LintConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_secs)
    }

    pub fn test_collection_timeout(&self) -> Duration {
        Duration::from_secs(self.test_collection_timeout_secs)
    }
}
