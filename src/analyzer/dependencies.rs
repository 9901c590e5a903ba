use anyhow::Result;

use super::CheckContext;
use super::security::REQUIREMENTS;
use crate::models::{CheckResult, Severity};

pub(super) fn run(ctx: &CheckContext, checks: &mut Vec<CheckResult>) -> Result<()> {
    let has_python_manifest = ctx.index.named(&REQUIREMENTS).next().is_some()
        || ctx.index.files().iter().any(|f| f.name() == "pyproject.toml");

    if has_python_manifest {
        checks.push(CheckResult::passed("dependency_files", "Dependency files found"));
    } else {
        checks.push(CheckResult::warning(
            "dependency_files",
            Severity::Medium,
            "No dependency management files found",
        ));
    }

    if ctx.index.has_top_level("package.json") {
        checks.push(CheckResult::passed("npm_dependencies", "package.json found"));

        if ctx.index.has_top_level("package-lock.json") || ctx.index.has_top_level("yarn.lock") {
            checks.push(CheckResult::passed("dependency_lock", "Dependency lock file found"));
        } else {
            checks.push(CheckResult::warning(
                "dependency_lock",
                Severity::Low,
                "No dependency lock file found",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing_support::{FakeRunner, analyze_category, write};
    use crate::models::{Category, CheckStatus, Severity};

    #[test]
    fn test_no_manifests() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.py", "\n");

        let checks = analyze_category(dir.path(), &FakeRunner::new(), Category::Dependencies);
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].status, CheckStatus::Warning);
        assert_eq!(checks[0].severity, Severity::Medium);
    }

    #[test]
    fn test_pyproject_and_npm_without_lock() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "backend/pyproject.toml", "[project]\n");
        write(dir.path(), "package.json", "{}\n");

        let checks = analyze_category(dir.path(), &FakeRunner::new(), Category::Dependencies);
        let names: Vec<_> = checks.iter().map(|c| (c.check_name.as_str(), c.status)).collect();
        assert_eq!(
            names,
            vec![
                ("dependency_files", CheckStatus::Passed),
                ("npm_dependencies", CheckStatus::Passed),
                ("dependency_lock", CheckStatus::Warning),
            ]
        );
    }

    #[test]
    fn test_yarn_lock() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "requirements.txt", "requests\n");
        write(dir.path(), "package.json", "{}\n");
        write(dir.path(), "yarn.lock", "\n");

        let checks = analyze_category(dir.path(), &FakeRunner::new(), Category::Dependencies);
        assert_eq!(checks.len(), 3);
        assert!(checks.iter().all(|c| c.status == CheckStatus::Passed));
    }
}
