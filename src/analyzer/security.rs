use anyhow::Result;
use glob::Pattern;
use lazy_static::lazy_static;

use super::CheckContext;
use super::index::RepoFile;
use super::patterns::SECRET_PATTERNS;
use crate::models::{Category, CheckResult, Severity};
use crate::tools::ToolError;
use crate::utils::{is_text_like, read_lossy};

const CATEGORY: Category = Category::Security;

lazy_static! {
    pub(super) static ref REQUIREMENTS: Pattern = Pattern::new("requirements*.txt").unwrap();
}

pub(super) fn run(ctx: &CheckContext, checks: &mut Vec<CheckResult>) -> Result<()> {
    scan_for_secrets(ctx, checks);

    for req in ctx.index.named(&REQUIREMENTS) {
        check_vulnerabilities(ctx, req, checks);
    }

    Ok(())
}

/// One failed result per (file, pattern) pair, pointing at the first match.
fn scan_for_secrets(ctx: &CheckContext, checks: &mut Vec<CheckResult>) {
    let mut scanned = 0;
    let mut found = 0;

    for file in ctx.index.files().iter().filter(|f| is_text_like(&f.relative)) {
        let content = match read_lossy(&file.path) {
            Ok(c) => c,
            Err(e) => {
                ctx.observer
                    .item_skipped(CATEGORY, &file.relative, &e.to_string());
                continue;
            }
        };
        scanned += 1;

        for pattern in SECRET_PATTERNS.iter() {
            if let Some(m) = pattern.regex.find(&content) {
                let line = content[..m.start()].matches('\n').count() + 1;
                checks.push(
                    CheckResult::failed("secret_detection", Severity::High, pattern.message)
                        .with_file(file.display())
                        .with_line(line)
                        .with_detail("pattern", pattern.name),
                );
                found += 1;
            }
        }
    }

    if found == 0 {
        checks.push(
            CheckResult::passed(
                "secret_detection",
                format!("No hardcoded secrets found in {} scanned files", scanned),
            )
            .with_detail("files_scanned", scanned),
        );
    }
}

fn check_vulnerabilities(ctx: &CheckContext, req: &RepoFile, checks: &mut Vec<CheckResult>) {
    let tool = &ctx.config.tools.vulnerability_scanner;
    let args = tool.args_with([req.path.display().to_string()]);
    let name = format!("safety_check_{}", req.name());

    match ctx
        .runner
        .run(&tool.program, &args, ctx.root, ctx.config.tool_timeout())
    {
        Ok(out) if out.success() => {
            checks.push(
                CheckResult::passed(name, "No known vulnerabilities in dependencies")
                    .with_file(req.display()),
            );
        }
        Ok(out) => {
            checks.push(
                CheckResult::failed(name, Severity::High, "Vulnerable dependencies detected")
                    .with_file(req.display())
                    .with_detail("output", out.stdout),
            );
        }
        Err(ToolError::Unavailable { program }) => {
            ctx.observer.tool_unavailable(CATEGORY, &program);
        }
        Err(err @ ToolError::Timeout { .. }) => {
            checks.push(
                CheckResult::failed(name, Severity::High, err.to_string()).with_file(req.display()),
            );
        }
        Err(err) => {
            ctx.observer
                .item_skipped(CATEGORY, &req.relative, &err.to_string());
        }
    }
}
