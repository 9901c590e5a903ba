use anyhow::{Context, Result};
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::models::{AnalysisReport, Priority};

// ===== Summary Output =====

pub fn output_summary(report: &AnalysisReport, output_file: Option<&str>) -> Result<()> {
    match output_file {
        Some(path) => write_output(path, &render_summary(report)?),
        None => {
            let mut stdout = StandardStream::stdout(ColorChoice::Auto);
            write_summary(&mut stdout, report)
        }
    }
}

/// Plain-text summary, as written to a file.
pub fn render_summary(report: &AnalysisReport) -> Result<String> {
    let mut buf = NoColor::new(Vec::new());
    write_summary(&mut buf, report)?;
    Ok(String::from_utf8(buf.into_inner())?)
}

fn write_summary<W: WriteColor>(out: &mut W, report: &AnalysisReport) -> Result<()> {
    writeln!(out)?;
    out.set_color(ColorSpec::new().set_bold(true))?;
    writeln!(out, "Repository Health Report: {}", report.repository)?;
    out.reset()?;

    write!(out, "Health Score: ")?;
    out.set_color(ColorSpec::new().set_fg(Some(score_color(report.health_score))).set_bold(true))?;
    write!(out, "{}/100", report.health_score)?;
    out.reset()?;
    writeln!(out)?;

    if let Some(git) = &report.git {
        let branch = git.branch.as_deref().unwrap_or("(detached)");
        match &git.head_commit {
            Some(commit) => writeln!(out, "Git: {} @ {}", branch, &commit[..7.min(commit.len())])?,
            None => writeln!(out, "Git: {} (no commits)", branch)?,
        }
    }

    writeln!(out)?;
    writeln!(out, "Summary by Category:")?;
    for (category, stats) in &report.summary {
        write!(
            out,
            "  {}: {}/{} passed",
            category.title(),
            stats.passed,
            stats.total
        )?;
        if stats.warnings > 0 {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(out, " ({} warnings)", stats.warnings)?;
            out.reset()?;
        }
        if stats.failed > 0 {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
            write!(out, " ({} failed)", stats.failed)?;
            out.reset()?;
        }
        writeln!(out)?;
    }

    if !report.recommendations.is_empty() {
        writeln!(out)?;
        writeln!(out, "Recommendations:")?;
        for rec in &report.recommendations {
            write!(out, "  ")?;
            out.set_color(
                ColorSpec::new()
                    .set_fg(Some(priority_color(rec.priority)))
                    .set_bold(true),
            )?;
            write!(out, "[{}]", rec.priority)?;
            out.reset()?;
            writeln!(out, " {}: {}", rec.title, rec.description)?;
        }
    }

    Ok(())
}

fn score_color(score: u8) -> Color {
    match score {
        80..=100 => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Critical => Color::Red,
        Priority::High => Color::Yellow,
        Priority::Medium => Color::Cyan,
        Priority::Low => Color::Blue,
    }
}

// ===== JSON Output =====

pub fn output_json(report: &AnalysisReport, output_file: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    match output_file {
        Some(path) => write_output(path, &json),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

// ===== Markdown Output =====

pub fn render_markdown(report: &AnalysisReport) -> String {
    let mut md = String::new();

    md.push_str("# Repository Health Report\n\n");
    md.push_str(&format!(
        "**Repository:** `{}` | **Generated:** {} | **Health Score:** {}/100\n\n",
        report.repository, report.generated_at, report.health_score
    ));

    md.push_str("## Summary\n\n");
    md.push_str("| Category | Total | Passed | Warnings | Failed |\n");
    md.push_str("|----------|-------|--------|----------|--------|\n");
    for (category, stats) in &report.summary {
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            category.title(),
            stats.total,
            stats.passed,
            stats.warnings,
            stats.failed
        ));
    }
    md.push('\n');

    md.push_str("## Checks\n\n");
    for (category, checks) in &report.checks {
        md.push_str(&format!("### {}\n\n", category.title()));
        if checks.is_empty() {
            md.push_str("No checks ran.\n\n");
            continue;
        }
        for check in checks {
            let location = match (&check.file_path, check.line_number) {
                (Some(f), Some(l)) => format!(" (`{}:{}`)", f, l),
                (Some(f), None) => format!(" (`{}`)", f),
                _ => String::new(),
            };
            md.push_str(&format!(
                "- **{:?}** [{}] `{}`: {}{}\n",
                check.status, check.severity, check.check_name, check.message, location
            ));
        }
        md.push('\n');
    }

    if !report.recommendations.is_empty() {
        md.push_str("## Recommendations\n\n");
        for rec in &report.recommendations {
            md.push_str(&format!(
                "- **[{}]** {}: {} _Action:_ {}\n",
                rec.priority, rec.title, rec.description, rec.action
            ));
        }
    }

    md
}

pub fn output_markdown(report: &AnalysisReport, output_file: Option<&str>) -> Result<()> {
    let md = render_markdown(report);
    match output_file {
        Some(path) => write_output(path, &md),
        None => {
            print!("{}", md);
            Ok(())
        }
    }
}

fn write_output(path: &str, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path))?;
    println!("Results written to {}", path);
    Ok(())
}
