use git2::Repository;
use std::path::Path;

use crate::models::GitInfo;

/// Branch and HEAD commit of the repository rooted exactly at `root`.
/// Returns None when `root` is not a git work tree; parent repositories are not searched.
pub fn repo_info(root: &Path) -> Option<GitInfo> {
    let repo = match Repository::open(root) {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!(error = %e, "not a git repository, skipping git info");
            return None;
        }
    };

    Some(GitInfo {
        branch: current_branch(&repo),
        head_commit: head_commit(&repo),
    })
}

/// Short branch name HEAD points at. Works on an unborn branch too.
fn current_branch(repo: &Repository) -> Option<String> {
    let head = repo.find_reference("HEAD").ok()?;
    let target = head.symbolic_target()?;
    Some(target.strip_prefix("refs/heads/").unwrap_or(target).to_string())
}

fn head_commit(repo: &Repository) -> Option<String> {
    let commit = repo.head().ok()?.peel_to_commit().ok()?;
    Some(commit.id().to_string())
}
