//! # git-lanes
//!
//! Lane layout for commit history graphs, the "git log --graph" problem.
//!
//! Given commits in topological order (most recent first) and their parent
//! ids, the library decides which vertical lane every commit occupies and
//! which half-cell segments connect it to its parents and children, reusing
//! lanes as soon as a branch ends.
//!
//! ## Architecture
//!
//! - [`graph`] - lane allocation, occupancy bookkeeping and row layout
//! - [`models`] - the commit contract the layout consumes
//! - [`git`] - reading history windows from a repository
//! - [`state`] - configuration and background layout publication
//!
//! ## Example
//!
//! ```rust
//! use git_lanes::graph::layout;
//! use git_lanes::models::CommitNode;
//!
//! let commits = vec![
//!     CommitNode::new("merge", &["main", "topic"]),
//!     CommitNode::new("topic", &["main"]),
//!     CommitNode::new("main", &[]),
//! ];
//! let layout = layout(&commits);
//!
//! assert_eq!(layout.lanes(), vec![0, 1, 0]);
//! assert_eq!(layout.lane_count, 2);
//! ```

pub mod git;
pub mod graph;
pub mod models;
pub mod state;

pub use graph::{GraphBuilder, GraphLayout, LaneSegment};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
