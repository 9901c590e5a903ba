mod code_quality;
mod complexity;
mod dependencies;
mod documentation;
mod index;
mod observer;
mod patterns;
mod performance;
mod scoring;
mod security;
mod testing;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;
use crate::models::{AnalysisReport, Category, CategoryResults, CheckResult};
use crate::tools::{ProcessRunner, ToolRunner};
use index::RepoIndex;

pub use observer::{AnalysisObserver, TracingObserver};

/// Everything a category handler may read. Handlers only append to their own result list.
pub(crate) struct CheckContext<'a> {
    pub root: &'a Path,
    pub index: &'a RepoIndex,
    pub config: &'a AnalyzerConfig,
    pub runner: &'a dyn ToolRunner,
    pub observer: &'a dyn AnalysisObserver,
}

/// Runs the fixed set of health checks over one repository.
pub struct RepositoryAnalyzer<'a> {
    root: PathBuf,
    config: AnalyzerConfig,
    runner: &'a dyn ToolRunner,
    observer: &'a dyn AnalysisObserver,
}

impl<'a> RepositoryAnalyzer<'a> {
    /// The path is not checked here; `analyze` rejects a missing repository.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: AnalyzerConfig::default(),
            runner: &ProcessRunner,
            observer: &TracingObserver,
        }
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_runner(mut self, runner: &'a dyn ToolRunner) -> Self {
        self.runner = runner;
        self
    }

    pub fn with_observer(mut self, observer: &'a dyn AnalysisObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Run every category in order and build the report.
    ///
    /// Only a missing repository is an error. Failures inside a category keep
    /// that category's partial results and the remaining categories still run.
    pub fn analyze(&self) -> Result<AnalysisReport, AnalyzerError> {
        self.analyze_with(run_category)
    }

    fn analyze_with<F>(&self, handler: F) -> Result<AnalysisReport, AnalyzerError>
    where
        F: Fn(Category, &CheckContext, &mut Vec<CheckResult>) -> Result<()>,
    {
        if !self.root.exists() {
            return Err(AnalyzerError::InvalidRepository {
                path: self.root.clone(),
            });
        }
        if !self.root.is_dir() {
            return Err(AnalyzerError::NotADirectory {
                path: self.root.clone(),
            });
        }

        tracing::info!(repository = %self.root.display(), "starting analysis");
        let index = RepoIndex::build(&self.root, &self.config.exclude_dirs);
        let ctx = CheckContext {
            root: &self.root,
            index: &index,
            config: &self.config,
            runner: self.runner,
            observer: self.observer,
        };

        let mut checks = CategoryResults::new();
        for category in Category::ALL {
            self.observer.category_started(category);
            let mut results = Vec::new();
            match handler(category, &ctx, &mut results) {
                Ok(()) => self.observer.category_finished(category, results.len()),
                Err(err) => self.observer.category_failed(category, &err),
            }
            checks.insert(category, results);
        }

        let health_score = if has_evidence(&index) {
            scoring::health_score(&checks)
        } else {
            tracing::info!("no file matched any check, health is unknown");
            0
        };
        let summary = scoring::summarize(&checks);
        let recommendations = scoring::recommendations(&checks);
        tracing::info!(health_score, "analysis complete");

        Ok(AnalysisReport {
            repository: self.root.display().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            health_score,
            checks,
            summary,
            recommendations,
            git: crate::git::repo_info(&self.root),
        })
    }
}

fn run_category(category: Category, ctx: &CheckContext, checks: &mut Vec<CheckResult>) -> Result<()> {
    match category {
        Category::CodeQuality => code_quality::run(ctx, checks),
        Category::Security => security::run(ctx, checks),
        Category::Testing => testing::run(ctx, checks),
        Category::Documentation => documentation::run(ctx, checks),
        Category::Dependencies => dependencies::run(ctx, checks),
        Category::Performance => performance::run(ctx, checks),
    }
}

/// Whether any file is something a check looks for. The size scan applies to
/// every file and does not count. README, LICENSE, lockfiles and `.gitignore`
/// only count at the top level, where the checks look for them.
fn has_evidence(index: &RepoIndex) -> bool {
    index.files().iter().any(|f| {
        crate::utils::is_text_like(&f.relative)
            || security::REQUIREMENTS.matches(f.name())
            || testing::TEST_CONFIGS.iter().any(|p| p.matches(f.name()))
            || (f.is_top_level()
                && (documentation::README.matches(f.name())
                    || documentation::LICENSE.matches(f.name())
                    || matches!(f.name(), "package-lock.json" | "yarn.lock" | ".gitignore")))
    })
}
