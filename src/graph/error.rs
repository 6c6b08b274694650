use crate::graph::segment::Lane;
use thiserror::Error;
use tracing::error;

/// Errors raised by the lane layout core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Lane {lane} is not allocated")]
    LaneNotAllocated { lane: Lane },

    #[error("Layout cancelled at row {row}")]
    Cancelled { row: usize },
}

impl GraphError {
    /// Create a lane invariant violation
    pub fn lane_not_allocated(lane: Lane) -> Self {
        error!("Lane invariant violated: lane {} freed while not in use", lane);
        GraphError::LaneNotAllocated { lane }
    }

    /// Check if error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The builder re-synchronizes the allocator from its occupancy table.
            GraphError::LaneNotAllocated { .. } => true,
            GraphError::Cancelled { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_properties() {
        let lane_error = GraphError::lane_not_allocated(3);
        assert!(lane_error.is_recoverable());
        assert_eq!(lane_error.to_string(), "Lane 3 is not allocated");

        let cancelled = GraphError::Cancelled { row: 12 };
        assert!(!cancelled.is_recoverable());
        assert_eq!(cancelled.to_string(), "Layout cancelled at row 12");
    }
}
