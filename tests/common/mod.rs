//! Shared fixtures for integration tests.

#![allow(dead_code)]

use git2::{Oid, Repository, Signature, Time};
use std::path::PathBuf;
use tempfile::TempDir;

/// Create an empty repository in a temporary directory.
pub fn create_test_repo() -> anyhow::Result<(TempDir, PathBuf, Repository)> {
    let temp_dir = TempDir::new()?;
    let repo_path = temp_dir.path().to_path_buf();
    let repo = Repository::init(&repo_path)?;
    Ok((temp_dir, repo_path, repo))
}

/// Commit an empty tree with a fixed timestamp so time ordering is stable.
pub fn commit(
    repo: &Repository,
    update_ref: Option<&str>,
    message: &str,
    parents: &[Oid],
    seconds: i64,
) -> anyhow::Result<Oid> {
    let signature = Signature::new("Test User", "test@example.com", &Time::new(seconds, 0))?;
    let tree_id = repo.index()?.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let parent_commits = parents
        .iter()
        .map(|id| repo.find_commit(*id))
        .collect::<Result<Vec<_>, _>>()?;
    let parent_refs: Vec<&git2::Commit> = parent_commits.iter().collect();

    Ok(repo.commit(update_ref, &signature, &signature, message, &tree, &parent_refs)?)
}

/// base <- main1 and base <- topic1, merged into HEAD; plus an unmerged `side` branch.
pub struct MergeFixture {
    pub base: Oid,
    pub main1: Oid,
    pub topic1: Oid,
    pub merge: Oid,
    pub side1: Oid,
}

pub fn create_merge_repo() -> anyhow::Result<(TempDir, PathBuf, MergeFixture)> {
    let (temp_dir, repo_path, repo) = create_test_repo()?;

    let base = commit(&repo, Some("HEAD"), "Initial commit", &[], 1_000)?;
    let main1 = commit(&repo, Some("HEAD"), "Main branch update", &[base], 2_000)?;
    let topic1 = commit(&repo, None, "Add topic functionality", &[base], 3_000)?;
    repo.branch("topic", &repo.find_commit(topic1)?, false)?;
    let merge = commit(&repo, Some("HEAD"), "Merge topic", &[main1, topic1], 4_000)?;
    let side1 = commit(&repo, None, "Side experiment", &[base], 5_000)?;
    repo.branch("side", &repo.find_commit(side1)?, false)?;

    Ok((
        temp_dir,
        repo_path,
        MergeFixture {
            base,
            main1,
            topic1,
            merge,
            side1,
        },
    ))
}
