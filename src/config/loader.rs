use anyhow::{Context, Result, ensure};
use std::path::Path;

use super::models::{AnalyzerConfig, ToolCommand};

/// Load and validate an analyzer config file from disk.
/// The format is picked from the extension: YAML, TOML or JSON.
pub fn load_config(path: &Path) -> Result<AnalyzerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    let config = parse_config_content(&content, ext)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    validate_config(&config)?;
    Ok(config)
}

/// Parse config text in the given format.
pub fn parse_config_content(content: &str, ext: &str) -> Result<AnalyzerConfig> {
    let config = match ext {
        "yaml" | "yml" => serde_yaml::from_str(content).context("Invalid YAML")?,
        "toml" => toml::from_str(content).context("Invalid TOML")?,
        "json" => serde_json::from_str(content).context("Invalid JSON")?,
        _ => anyhow::bail!("Unsupported config format: {}", ext),
    };
    Ok(config)
}

/// Validate that the config is usable.
fn validate_config(config: &AnalyzerConfig) -> Result<()> {
    ensure!(config.max_lint_files > 0, "max_lint_files must be at least 1");
    ensure!(
        config.max_js_lint_files > 0,
        "max_js_lint_files must be at least 1"
    );
    ensure!(
        config.max_complexity_files > 0,
        "max_complexity_files must be at least 1"
    );
    ensure!(
        config.function_length_threshold > 0,
        "function_length_threshold must be at least 1"
    );
    ensure!(
        config.large_file_threshold > 0,
        "large_file_threshold must be at least 1 byte"
    );
    ensure!(
        config.tool_timeout_secs > 0 && config.test_collection_timeout_secs > 0,
        "Tool timeouts must be at least 1 second"
    );

    for dir in &config.exclude_dirs {
        glob::Pattern::new(dir)
            .with_context(|| format!("Invalid exclude pattern: {}", dir))?;
    }

    let tools = &config.tools;
    validate_tool("tools.python_lint", &tools.python_lint)?;
    validate_tool("tools.js_lint", &tools.js_lint)?;
    validate_tool("tools.vulnerability_scanner", &tools.vulnerability_scanner)?;
    validate_tool("tools.test_collector", &tools.test_collector)?;
    validate_tool("lint.formatter", &config.lint.formatter)?;

    Ok(())
}

fn validate_tool(key: &str, tool: &ToolCommand) -> Result<()> {
    ensure!(
        !tool.program.trim().is_empty(),
        "'{}' must name a program",
        key
    );
    Ok(())
}
