use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the lane layout needs to know about a commit.
pub trait GraphNode {
    fn id(&self) -> &str;
    fn parent_ids(&self) -> &[String];
}

/// Bare commit id plus parents, for callers that already have the log in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitNode {
    pub id: String,
    pub parent_ids: Vec<String>,
}

impl CommitNode {
    pub fn new(id: impl Into<String>, parents: &[&str]) -> Self {
        Self {
            id: id.into(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl GraphNode for CommitNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_ids(&self) -> &[String] {
        &self.parent_ids
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitCommit {
    pub id: String,
    pub short_id: String,
    pub author: GitSignature,
    pub summary: String,
    pub parent_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitSignature {
    pub name: String,
    pub email: String,
    pub when: DateTime<Utc>,
}

impl GitCommit {
    pub fn new(commit: &git2::Commit) -> anyhow::Result<Self> {
        let id = commit.id().to_string();
        let short_id = commit
            .as_object()
            .short_id()?
            .as_str()
            .unwrap_or("")
            .to_string();

        let author = GitSignature {
            name: commit.author().name().unwrap_or("").to_string(),
            email: commit.author().email().unwrap_or("").to_string(),
            when: DateTime::from_timestamp(commit.author().when().seconds(), 0)
                .unwrap_or_else(Utc::now),
        };

        let summary = commit.summary().unwrap_or("").to_string();
        let parent_ids = commit.parent_ids().map(|id| id.to_string()).collect();

        Ok(GitCommit {
            id,
            short_id,
            author,
            summary,
            parent_ids,
        })
    }

    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }
}

impl GraphNode for GitCommit {
    fn id(&self) -> &str {
        &self.id
    }

    fn parent_ids(&self) -> &[String] {
        &self.parent_ids
    }
}

impl<T: GraphNode + ?Sized> GraphNode for &T {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn parent_ids(&self) -> &[String] {
        (**self).parent_ids()
    }
}
