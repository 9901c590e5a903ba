mod output;

use anyhow::Result;

use crate::analyzer::RepositoryAnalyzer;
use crate::config::AnalyzerConfig;
use crate::tools::ToolRunner;

/// Analyze a repository and write the report in the requested format.
/// Findings never make this fail; only a missing repository or an I/O error does.
pub fn generate_report(
    runner: &dyn ToolRunner,
    path: &str,
    config: AnalyzerConfig,
    format: &str,
    output_file: Option<&str>,
) -> Result<()> {
    let report = RepositoryAnalyzer::new(path)
        .with_config(config)
        .with_runner(runner)
        .analyze()?;

    match format {
        "json" => output::output_json(&report, output_file)?,
        "markdown" | "md" => output::output_markdown(&report, output_file)?,
        _ => output::output_summary(&report, output_file)?,
    }

    Ok(())
}
