use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::AnalyzerConfig;
use crate::tools::{ToolError, ToolRunner};

/// Characters of formatted code shown by `--preview`.
const PREVIEW_CHARS: usize = 500;

/// One issue reported by the Python lint tool.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct LintIssue {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub code: String,
    pub message: String,
}

/// Parse `path:line:col: CODE message` lines. Lines that do not fit are skipped.
pub fn parse_flake8_output(output: &str) -> Vec<LintIssue> {
    let issues: Vec<LintIssue> = output.lines().filter_map(parse_flake8_line).collect();
    tracing::debug!(count = issues.len(), "parsed lint output");
    issues
}

fn parse_flake8_line(line: &str) -> Option<LintIssue> {
    let mut parts = line.splitn(4, ':');
    let file = parts.next()?;
    let line_no = parts.next()?.trim().parse().ok()?;
    let column = parts.next()?.trim().parse().ok()?;
    let (code, message) = parts.next()?.trim().split_once(' ')?;

    Some(LintIssue {
        file: file.to_string(),
        line: line_no,
        column,
        code: code.to_string(),
        message: message.to_string(),
    })
}

/// Render issues one per line as `file:line:col [CODE] message`.
pub fn format_issues_for_display(issues: &[LintIssue]) -> String {
    if issues.is_empty() {
        return "No linting issues found.".to_string();
    }
    issues
        .iter()
        .map(|i| format!("{}:{}:{} [{}] {}", i.file, i.line, i.column, i.code, i.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Outcome of linting a single file.
#[derive(Debug)]
pub struct LintOutcome {
    pub formatted_code: String,
    pub issues: Vec<LintIssue>,
    pub written_to: PathBuf,
}

/// Format and lint one Python file, saving the corrected code next to it
/// (or to `output_path`).
pub fn lint_file(
    runner: &dyn ToolRunner,
    config: &AnalyzerConfig,
    file_path: &Path,
    ignore: Option<&str>,
    output_path: Option<&Path>,
) -> Result<LintOutcome> {
    ensure!(
        file_path.is_file(),
        "File '{}' does not exist",
        file_path.display()
    );
    if file_path.extension().and_then(|e| e.to_str()) != Some("py") {
        tracing::warn!(file = %file_path.display(), "file does not have a .py extension");
    }

    let code = fs::read_to_string(file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    let cwd = file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let timeout = config.tool_timeout();

    let formatter = &config.lint.formatter;
    let formatted_code = match runner.run(
        &formatter.program,
        &formatter.args_with([file_path.display().to_string()]),
        cwd,
        timeout,
    ) {
        Ok(out) if out.success() && !out.stdout.is_empty() => out.stdout,
        Ok(out) => {
            tracing::warn!(exit_code = out.exit_code, "formatter failed, using original code");
            code
        }
        Err(err) => {
            tracing::warn!(error = %err, "formatter unavailable, using original code");
            code
        }
    };

    let ignore_rules = match ignore {
        Some(rules) => rules.to_string(),
        None => config.lint.ignore.join(","),
    };
    let mut extra = Vec::new();
    if !ignore_rules.is_empty() {
        extra.push("--ignore".to_string());
        extra.push(ignore_rules);
    }
    extra.push(format!("--max-line-length={}", config.lint.max_line_length));
    extra.push(file_path.display().to_string());

    let lint_tool = &config.tools.python_lint;
    let issues = match runner.run(&lint_tool.program, &lint_tool.args_with(extra), cwd, timeout) {
        Ok(out) => parse_flake8_output(&out.stdout),
        Err(err @ ToolError::Unavailable { .. }) => {
            return Err(err).context("Cannot lint without the Python lint tool");
        }
        Err(err) => return Err(err.into()),
    };

    let written_to = match output_path {
        Some(p) => p.to_path_buf(),
        None => default_output_path(file_path),
    };
    if let Some(parent) = written_to.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&written_to, &formatted_code)
        .with_context(|| format!("Failed to write {}", written_to.display()))?;

    Ok(LintOutcome {
        formatted_code,
        issues,
        written_to,
    })
}

/// `<stem>_fixed.py` in the same directory as the input.
fn default_output_path(file_path: &Path) -> PathBuf {
    let stem = file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    file_path.with_file_name(format!("{}_fixed.py", stem))
}

/// CLI entry point for `lint`.
pub fn run_lint(
    runner: &dyn ToolRunner,
    config: &AnalyzerConfig,
    file: &str,
    ignore: Option<&str>,
    output: Option<&str>,
    preview: bool,
) -> Result<()> {
    println!("Processing: {}", file);
    if let Some(rules) = ignore {
        println!("Ignoring rules: {}", rules);
    }

    let outcome = lint_file(runner, config, Path::new(file), ignore, output.map(Path::new))?;
    println!("Corrected code saved to: {}", outcome.written_to.display());

    let rule = "=".repeat(50);
    println!("\n{rule}\nLINTING RESULTS\n{rule}");
    println!("{}", format_issues_for_display(&outcome.issues));

    if preview {
        println!("\n{rule}\nFORMATTED CODE PREVIEW\n{rule}");
        let shown: String = outcome.formatted_code.chars().take(PREVIEW_CHARS).collect();
        if outcome.formatted_code.chars().count() > PREVIEW_CHARS {
            println!("{}...", shown);
        } else {
            println!("{}", shown);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolOutput;
    use std::cell::RefCell;
    use std::time::Duration;

    #[test]
    fn test_parse_single_issue() {
        let issues = parse_flake8_output("test.py:1:1: E302 expected 2 blank lines, found 1");
        assert_eq!(
            issues,
            vec![LintIssue {
                file: "test.py".to_string(),
                line: 1,
                column: 1,
                code: "E302".to_string(),
                message: "expected 2 blank lines, found 1".to_string(),
            }]
        );
    }

    #[test]
    fn test_parse_keeps_colons_in_message() {
        let issues = parse_flake8_output("a.py:3:7: E231 missing whitespace after ':'\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "missing whitespace after ':'");
    }

    #[test]
    fn test_parse_skips_malformed_lines() {
        let output = "\nnot an issue\nx.py:a:1: E1 bad line\nx.py:2:1: E999\nx.py:4:2: W291 trailing whitespace";
        let issues = parse_flake8_output(output);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "W291");
        assert_eq!(issues[0].line, 4);
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_issues_for_display(&[]), "No linting issues found.");
    }

    #[test]
    fn test_format_single_issue() {
        let issue = LintIssue {
            file: "t.py".to_string(),
            line: 1,
            column: 5,
            code: "E203".to_string(),
            message: "whitespace before ':'".to_string(),
        };
        assert_eq!(
            format_issues_for_display(&[issue]),
            "t.py:1:5 [E203] whitespace before ':'"
        );
    }

    #[test]
    fn test_format_joins_with_newlines() {
        let issues = parse_flake8_output("a.py:1:1: E1 one\nb.py:2:2: E2 two");
        assert_eq!(
            format_issues_for_display(&issues),
            "a.py:1:1 [E1] one\nb.py:2:2 [E2] two"
        );
    }

    /// Scripted runner: formatter returns fixed code, linter returns one issue.
    struct ScriptedRunner {
        calls: RefCell<Vec<(String, Vec<String>)>>,
        formatter_ok: bool,
    }

    impl ToolRunner for ScriptedRunner {
        fn run(
            &self,
            program: &str,
            args: &[String],
            _cwd: &Path,
            _timeout: Duration,
        ) -> Result<ToolOutput, ToolError> {
            self.calls
                .borrow_mut()
                .push((program.to_string(), args.to_vec()));
            match program {
                "autopep8" if self.formatter_ok => Ok(ToolOutput {
                    exit_code: 0,
                    stdout: "x = 1\n".to_string(),
                    stderr: String::new(),
                }),
                "autopep8" => Err(ToolError::Unavailable {
                    program: program.to_string(),
                }),
                _ => Ok(ToolOutput {
                    exit_code: 1,
                    stdout: "bad.py:1:2: E225 missing whitespace around operator\n".to_string(),
                    stderr: String::new(),
                }),
            }
        }
    }

    #[test]
    fn test_lint_file_writes_fixed_copy() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.py");
        fs::write(&file, "x=1\n").unwrap();
        let runner = ScriptedRunner {
            calls: RefCell::new(Vec::new()),
            formatter_ok: true,
        };

        let outcome =
            lint_file(&runner, &AnalyzerConfig::default(), &file, None, None).unwrap();

        assert_eq!(outcome.written_to, dir.path().join("bad_fixed.py"));
        assert_eq!(fs::read_to_string(&outcome.written_to).unwrap(), "x = 1\n");
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].code, "E225");

        let calls = runner.calls.borrow();
        let (program, args) = &calls[1];
        assert_eq!(program, "flake8");
        assert!(args.contains(&"E203,W503".to_string()));
        assert!(args.contains(&"--max-line-length=88".to_string()));
    }

    #[test]
    fn test_lint_file_falls_back_to_original_code() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("bad.py");
        fs::write(&file, "x=1\n").unwrap();
        let out = dir.path().join("out").join("fixed.py");
        let runner = ScriptedRunner {
            calls: RefCell::new(Vec::new()),
            formatter_ok: false,
        };

        let outcome = lint_file(
            &runner,
            &AnalyzerConfig::default(),
            &file,
            Some("E501"),
            Some(&out),
        )
        .unwrap();

        assert_eq!(outcome.formatted_code, "x=1\n");
        assert_eq!(fs::read_to_string(&out).unwrap(), "x=1\n");
        let calls = runner.calls.borrow();
        assert!(calls[1].1.contains(&"E501".to_string()));
    }

    #[test]
    fn test_lint_missing_file() {
        let runner = ScriptedRunner {
            calls: RefCell::new(Vec::new()),
            formatter_ok: true,
        };
        let err = lint_file(
            &runner,
            &AnalyzerConfig::default(),
            Path::new("/definitely/not/here.py"),
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
