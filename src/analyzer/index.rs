use glob::Pattern;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::utils::{display_relative, file_name, has_extension};

/// A regular file found under the repository root.
#[derive(Debug, Clone)]
pub struct RepoFile {
    pub path: PathBuf,
    pub relative: PathBuf,
    /// `None` when metadata could not be read.
    pub size: Option<u64>,
}

impl RepoFile {
    pub fn name(&self) -> &str {
        file_name(&self.relative)
    }

    pub fn display(&self) -> String {
        display_relative(&self.relative)
    }

    pub fn is_top_level(&self) -> bool {
        self.relative.components().count() == 1
    }
}

/// Every file of the repository, walked once in sorted order.
#[derive(Debug, Default)]
pub struct RepoIndex {
    files: Vec<RepoFile>,
}

impl RepoIndex {
    /// Walk `root`, pruning directories whose name matches one of `exclude_dirs`.
    /// Unreadable entries are skipped.
    pub fn build(root: &Path, exclude_dirs: &[String]) -> Self {
        let excluded: Vec<Pattern> = exclude_dirs
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();

        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                !(e.depth() > 0
                    && e.file_type().is_dir()
                    && e.file_name()
                        .to_str()
                        .is_some_and(|n| excluded.iter().any(|p| p.matches(n))))
            });

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = match entry.path().strip_prefix(root) {
                Ok(r) => r.to_path_buf(),
                Err(_) => continue,
            };
            files.push(RepoFile {
                size: entry.metadata().ok().map(|m| m.len()),
                path: entry.into_path(),
                relative,
            });
        }

        Self { files }
    }

    pub fn files(&self) -> &[RepoFile] {
        &self.files
    }

    pub fn with_extension<'a>(
        &'a self,
        extensions: &'a [&'a str],
    ) -> impl Iterator<Item = &'a RepoFile> + 'a {
        self.files
            .iter()
            .filter(move |f| has_extension(&f.relative, extensions))
    }

    /// Files anywhere in the tree whose name matches `pattern`.
    pub fn named<'a>(&'a self, pattern: &'a Pattern) -> impl Iterator<Item = &'a RepoFile> + 'a {
        self.files.iter().filter(move |f| pattern.matches(f.name()))
    }

    /// Files directly under the root whose name matches `pattern`.
    pub fn top_level_named<'a>(
        &'a self,
        pattern: &'a Pattern,
    ) -> impl Iterator<Item = &'a RepoFile> + 'a {
        self.named(pattern).filter(|f| f.is_top_level())
    }

    pub fn has_top_level(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.is_top_level() && f.name() == name)
    }

    /// True when any file name matches any of the patterns.
    pub fn any_named(&self, patterns: &[Pattern]) -> bool {
        self.files
            .iter()
            .any(|f| patterns.iter().any(|p| p.matches(f.name())))
    }
}
