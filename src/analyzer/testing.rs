use anyhow::Result;
use glob::Pattern;
use lazy_static::lazy_static;
use std::path::Component;

use super::CheckContext;
use super::index::RepoFile;
use crate::models::{Category, CheckResult, Severity};
use crate::tools::ToolError;

const CATEGORY: Category = Category::Testing;

lazy_static! {
    static ref TEST_FILE_NAMES: Vec<Pattern> = vec![
        Pattern::new("test_*.py").unwrap(),
        Pattern::new("*_test.py").unwrap(),
    ];
    pub(super) static ref TEST_CONFIGS: Vec<Pattern> = vec![
        Pattern::new("pytest.ini").unwrap(),
        Pattern::new("pyproject.toml").unwrap(),
        Pattern::new("setup.cfg").unwrap(),
    ];
}

/// `test_*.py`, `*_test.py`, or any `.py` below a `tests` directory.
fn is_test_file(file: &RepoFile) -> bool {
    if !file.name().ends_with(".py") {
        return false;
    }
    if TEST_FILE_NAMES.iter().any(|p| p.matches(file.name())) {
        return true;
    }
    file.relative
        .parent()
        .is_some_and(|dir| dir.components().any(|c| c == Component::Normal("tests".as_ref())))
}

pub(super) fn run(ctx: &CheckContext, checks: &mut Vec<CheckResult>) -> Result<()> {
    let test_files = ctx.index.files().iter().filter(|f| is_test_file(f)).count();

    if test_files == 0 {
        checks.push(CheckResult::failed(
            "test_files_exist",
            Severity::High,
            "No test files found in repository",
        ));
    } else {
        checks.push(
            CheckResult::passed("test_files_exist", format!("Found {} test files", test_files))
                .with_detail("count", test_files),
        );
    }

    if ctx.index.any_named(&TEST_CONFIGS) {
        checks.push(CheckResult::passed("pytest_config", "Pytest configuration found"));
    } else {
        checks.push(CheckResult::warning(
            "pytest_config",
            Severity::Low,
            "No pytest configuration found",
        ));
    }

    if test_files > 0 {
        collect_tests(ctx, checks);
    }

    Ok(())
}

fn collect_tests(ctx: &CheckContext, checks: &mut Vec<CheckResult>) {
    let tool = &ctx.config.tools.test_collector;
    match ctx.runner.run(
        &tool.program,
        &tool.args,
        ctx.root,
        ctx.config.test_collection_timeout(),
    ) {
        Ok(out) if out.success() => {
            let count = count_collected(&out.stdout);
            checks.push(
                CheckResult::passed(
                    "test_collection",
                    format!("Successfully collected {} tests", count),
                )
                .with_detail("collected", count),
            );
        }
        Ok(out) => {
            checks.push(
                CheckResult::failed("test_collection", Severity::Medium, "Failed to collect tests")
                    .with_detail("stderr", out.stderr),
            );
        }
        Err(ToolError::Unavailable { program }) => {
            ctx.observer.tool_unavailable(CATEGORY, &program);
        }
        Err(err @ ToolError::Timeout { .. }) => {
            checks.push(CheckResult::failed(
                "test_collection",
                Severity::Medium,
                format!("Failed to collect tests: {}", err),
            ));
        }
        Err(err) => {
            ctx.observer
                .item_skipped(CATEGORY, ctx.root, &err.to_string());
        }
    }
}

/// Count collected test nodes. Verbose collection prints `<Function ...>`
/// markers, quiet collection prints `path::name` node ids followed by a
/// `N tests collected` footer.
fn count_collected(stdout: &str) -> usize {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| {
            line.contains("<Function")
                || line.contains("<Method")
                || (line.contains("::") && !line.starts_with(|c: char| c.is_ascii_digit()))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::super::testing_support::{FakeRunner, analyze_category, write};
    use super::count_collected;
    use crate::models::{Category, CheckStatus, Severity};

    #[test]
    fn test_count_collected() {
        let verbose = "<Module test_a.py>\n  <Function test_one>\n  <Function test_two>\n<Class T>\n  <Method test_m>\n";
        assert_eq!(count_collected(verbose), 3);

        let quiet = "tests/test_a.py::test_one\ntests/test_a.py::T::test_m\n\n2 tests collected in 0.01s\n";
        assert_eq!(count_collected(quiet), 2);

        let parametrized = "test_a.py::test_x[hello world]\ntest_a.py::test_x[bye]\n\n2 tests collected in 0.02s\n";
        assert_eq!(count_collected(parametrized), 2);
    }

    #[test]
    fn test_no_tests() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "app.py", "x = 1\n");

        let runner = FakeRunner::new();
        let checks = analyze_category(dir.path(), &runner, Category::Testing);
        assert_eq!(checks.len(), 2);
        assert_eq!(checks[0].check_name, "test_files_exist");
        assert_eq!(checks[0].status, CheckStatus::Failed);
        assert_eq!(checks[0].severity, Severity::High);
        assert_eq!(checks[1].check_name, "pytest_config");
        assert_eq!(checks[1].status, CheckStatus::Warning);
        assert_eq!(runner.calls_to("python"), 0);
    }

    #[test]
    fn test_detection_and_collection() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "test_app.py", "def test_a(): pass\n");
        write(dir.path(), "pkg/util_test.py", "def test_b(): pass\n");
        write(dir.path(), "tests/unit/helpers.py", "\n");
        write(dir.path(), "tests/data.json", "{}\n");
        write(dir.path(), "pyproject.toml", "[tool.pytest.ini_options]\n");
        let runner = FakeRunner::new().respond("python", 0, "test_app.py::test_a\npkg/util_test.py::test_b\n");

        let checks = analyze_category(dir.path(), &runner, Category::Testing);
        assert_eq!(checks.len(), 3);
        assert_eq!(checks[0].message, "Found 3 test files");
        assert_eq!(checks[1].status, CheckStatus::Passed);
        assert_eq!(checks[2].check_name, "test_collection");
        assert_eq!(checks[2].message, "Successfully collected 2 tests");
    }

    #[test]
    fn test_collection_failure_and_timeout() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "tests/test_x.py", "import missing\n");

        let runner = FakeRunner::new().respond("python", 2, "");
        let checks = analyze_category(dir.path(), &runner, Category::Testing);
        assert_eq!(checks[2].status, CheckStatus::Failed);
        assert_eq!(checks[2].severity, Severity::Medium);

        let runner = FakeRunner::new().timeout("python");
        let checks = analyze_category(dir.path(), &runner, Category::Testing);
        assert_eq!(checks[2].status, CheckStatus::Failed);
        assert!(checks[2].message.contains("timed out"));
    }
}
