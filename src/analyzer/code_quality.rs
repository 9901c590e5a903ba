use anyhow::Result;
use serde::Deserialize;

use super::complexity::long_functions;
use super::{CheckContext, index::RepoFile};
use crate::lint::parse_flake8_output;
use crate::models::{Category, CheckResult, Severity};
use crate::tools::ToolError;
use crate::utils::read_lossy;

const CATEGORY: Category = Category::CodeQuality;

pub(super) fn run(ctx: &CheckContext, checks: &mut Vec<CheckResult>) -> Result<()> {
    let python_files: Vec<&RepoFile> = ctx.index.with_extension(&["py"]).collect();
    let js_files: Vec<&RepoFile> = ctx.index.with_extension(&["js", "ts"]).collect();

    if python_files.is_empty() && js_files.is_empty() {
        checks.push(CheckResult::warning(
            "source_files",
            Severity::Low,
            "No Python or JavaScript/TypeScript source files found",
        ));
        return Ok(());
    }

    for file in python_files.iter().take(ctx.config.max_lint_files) {
        lint_python_file(ctx, file, checks);
    }

    if !js_files.is_empty() {
        lint_js_files(ctx, &js_files, checks);
    }

    for file in python_files.iter().take(ctx.config.max_complexity_files) {
        check_complexity(ctx, file, checks);
    }

    Ok(())
}

fn lint_python_file(ctx: &CheckContext, file: &RepoFile, checks: &mut Vec<CheckResult>) {
    let tool = &ctx.config.tools.python_lint;
    let args = tool.args_with([file.path.display().to_string()]);
    let rel = file.display();

    match ctx
        .runner
        .run(&tool.program, &args, ctx.root, ctx.config.tool_timeout())
    {
        Ok(out) if out.success() => {
            checks.push(
                CheckResult::passed(format!("flake8_{}", file.name()), "No linting issues found")
                    .with_file(rel),
            );
        }
        Ok(out) => {
            let issues = parse_flake8_output(&out.stdout);
            if issues.is_empty() {
                checks.push(
                    CheckResult::failed(
                        format!("flake8_{}", file.name()),
                        Severity::Medium,
                        format!("{} exited with status {}", tool.program, out.exit_code),
                    )
                    .with_file(rel)
                    .with_detail("stderr", out.stderr),
                );
                return;
            }
            for issue in issues {
                checks.push(
                    CheckResult::failed(format!("flake8_{}", issue.code), Severity::Medium, issue.message)
                        .with_file(rel.clone())
                        .with_line(issue.line)
                        .with_detail("column", issue.column),
                );
            }
        }
        Err(ToolError::Unavailable { program }) => {
            ctx.observer.tool_unavailable(CATEGORY, &program);
        }
        Err(err @ ToolError::Timeout { .. }) => {
            checks.push(
                CheckResult::failed(format!("flake8_{}", file.name()), Severity::Medium, err.to_string())
                    .with_file(rel),
            );
        }
        Err(err) => {
            ctx.observer
                .item_skipped(CATEGORY, &file.relative, &err.to_string());
        }
    }
}

/// One file entry of `eslint --format json`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFileReport {
    #[serde(default)]
    error_count: usize,
    #[serde(default)]
    warning_count: usize,
}

fn lint_js_files(ctx: &CheckContext, files: &[&RepoFile], checks: &mut Vec<CheckResult>) {
    let tool = &ctx.config.tools.js_lint;
    let targets = files
        .iter()
        .take(ctx.config.max_js_lint_files)
        .map(|f| f.path.display().to_string());
    let args = tool.args_with(targets);

    let out = match ctx
        .runner
        .run(&tool.program, &args, ctx.root, ctx.config.tool_timeout())
    {
        Ok(out) => out,
        Err(ToolError::Unavailable { program }) => {
            ctx.observer.tool_unavailable(CATEGORY, &program);
            return;
        }
        Err(err @ ToolError::Timeout { .. }) => {
            checks.push(CheckResult::failed("eslint_check", Severity::Medium, err.to_string()));
            return;
        }
        Err(err) => {
            ctx.observer
                .item_skipped(CATEGORY, &files[0].relative, &err.to_string());
            return;
        }
    };

    if out.success() {
        checks.push(CheckResult::passed("eslint_check", "No ESLint issues found"));
        return;
    }

    // A failing run without a JSON report means the linter itself is missing or broken.
    let reports: Vec<EslintFileReport> = match serde_json::from_str(&out.stdout) {
        Ok(r) => r,
        Err(_) => {
            ctx.observer.tool_unavailable(CATEGORY, &tool.program);
            return;
        }
    };
    let errors: usize = reports.iter().map(|r| r.error_count).sum();
    let warnings: usize = reports.iter().map(|r| r.warning_count).sum();

    checks.push(
        CheckResult::failed(
            "eslint_check",
            Severity::Medium,
            format!("ESLint issues detected ({} errors, {} warnings)", errors, warnings),
        )
        .with_detail("errors", errors)
        .with_detail("warnings", warnings)
        .with_detail("stderr", out.stderr),
    );
}

fn check_complexity(ctx: &CheckContext, file: &RepoFile, checks: &mut Vec<CheckResult>) {
    let source = match read_lossy(&file.path) {
        Ok(s) => s,
        Err(e) => {
            ctx.observer
                .item_skipped(CATEGORY, &file.relative, &e.to_string());
            return;
        }
    };

    for f in long_functions(&source, ctx.config.function_length_threshold) {
        checks.push(
            CheckResult::warning(
                "function_complexity",
                Severity::Low,
                format!("Function '{}' is long ({} lines)", f.name, f.length),
            )
            .with_file(file.display())
            .with_line(f.start_line),
        );
    }
}
