use crate::models::GitCommit;
use anyhow::{anyhow, Result};
use git2::{BranchType, Repository, RepositoryOpenFlags, Sort};
use std::path::{Path, PathBuf};

/// Which tips a history walk starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkScope {
    #[default]
    Head,
    AllBranches,
}

pub struct GitRepository {
    repo: Repository,
    path: PathBuf,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.path)
            .finish()
    }
}

impl GitRepository {
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open_ext(
            path.as_ref(),
            RepositoryOpenFlags::empty(),
            &[] as &[&std::ffi::OsStr],
        )?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(GitRepository { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn repo(&self) -> &Repository {
        &self.repo
    }

    /// Read `limit` commits after skipping `skip`, children before parents.
    pub fn read_window(&self, scope: WalkScope, skip: usize, limit: usize) -> Result<Vec<GitCommit>> {
        let revwalk = self.revwalk(scope)?;
        let mut commits = Vec::with_capacity(limit.min(1024));

        for oid in revwalk.skip(skip).take(limit) {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(GitCommit::new(&commit)?);
        }

        tracing::debug!(
            "Read {} commits (skip {}, limit {}) from {}",
            commits.len(),
            skip,
            limit,
            self.path.display()
        );
        Ok(commits)
    }

    pub fn get_commit(&self, id: &str) -> Result<GitCommit> {
        let oid = git2::Oid::from_str(id)?;
        let commit = self.repo.find_commit(oid)?;
        GitCommit::new(&commit)
    }

    pub(crate) fn revwalk(&self, scope: WalkScope) -> Result<git2::Revwalk<'_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        match scope {
            WalkScope::Head => revwalk
                .push_head()
                .map_err(|e| anyhow!("Cannot walk from HEAD: {}", e))?,
            WalkScope::AllBranches => {
                let mut pushed = 0;
                for branch in self.repo.branches(Some(BranchType::Local))? {
                    let (branch, _) = branch?;
                    if let Some(oid) = branch.get().target() {
                        revwalk.push(oid)?;
                        pushed += 1;
                    }
                }
                if pushed == 0 {
                    return Err(anyhow!("Repository has no local branches"));
                }
            }
        }

        Ok(revwalk)
    }
}
