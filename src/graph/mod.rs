//! Lane layout for commit history graphs.
//!
//! [`GraphBuilder`] walks a topologically ordered window of commits and
//! assigns every commit a lane, emitting the [`LaneSegment`]s a renderer
//! needs to connect it to its parents and children.

pub mod allocator;
pub mod builder;
pub mod error;
pub mod layout;
pub mod occupancy;
pub mod segment;

pub use allocator::LaneAllocator;
pub use builder::{layout, layout_cancellable, GraphBuilder, PageMode};
pub use error::GraphError;
pub use layout::{GraphLayout, GraphPage, GraphRow, UnresolvedParent};
pub use occupancy::{OccupancyTable, Reservation};
pub use segment::{Lane, LaneSegment};
