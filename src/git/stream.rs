use crate::git::{GitRepository, WalkScope};
use crate::graph::{GraphBuilder, GraphLayout, PageMode};
use crate::models::GitCommit;
use anyhow::Result;

/// Reads a repository's history in fixed-size pages, children first.
pub struct CommitPager {
    repo: GitRepository,
    scope: WalkScope,
    limit: usize,
    page_size: usize,
    loaded: usize,
    is_complete: bool,
}

impl CommitPager {
    pub fn new(repo: GitRepository, scope: WalkScope, page_size: usize, limit: Option<usize>) -> Self {
        Self {
            repo,
            scope,
            limit: limit.unwrap_or(10000),
            page_size: page_size.max(1),
            loaded: 0,
            is_complete: false,
        }
    }

    /// Next page of commits, or `None` once the walk is exhausted.
    pub fn next_page(&mut self) -> Result<Option<Vec<GitCommit>>> {
        if self.is_complete {
            return Ok(None);
        }

        let want = self.page_size.min(self.limit - self.loaded);
        // A fresh revwalk per page keeps the pager free of borrows on `repo`.
        let page = self.repo.read_window(self.scope, self.loaded, want)?;
        self.loaded += page.len();

        if page.len() < self.page_size || self.loaded >= self.limit {
            self.is_complete = true;
        }

        tracing::debug!(
            "Page complete: {} commits, total loaded: {}, is_complete: {}",
            page.len(),
            self.loaded,
            self.is_complete
        );
        Ok(Some(page))
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded
    }

    /// Drain the pager through `builder`, returning the commits read and
    /// their layout. Lanes are carried across page boundaries.
    pub fn layout_all(mut self, builder: &mut GraphBuilder) -> Result<(Vec<GitCommit>, GraphLayout)> {
        let mut commits = Vec::new();
        let mut layout = GraphLayout::default();

        while let Some(page) = self.next_page()? {
            let mode = if self.is_complete {
                PageMode::Final
            } else {
                PageMode::Partial
            };
            layout.extend(builder.push_page(&page, mode));
            commits.extend(page);
        }

        Ok((commits, layout))
    }
}

impl std::fmt::Debug for CommitPager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitPager")
            .field("scope", &self.scope)
            .field("limit", &self.limit)
            .field("page_size", &self.page_size)
            .field("loaded", &self.loaded)
            .field("is_complete", &self.is_complete)
            .finish()
    }
}

impl GitRepository {
    pub fn pages(self, scope: WalkScope, page_size: usize, limit: Option<usize>) -> CommitPager {
        CommitPager::new(self, scope, page_size, limit)
    }
}
