use crate::graph::segment::{Lane, LaneSegment};
use serde::Serialize;

/// Everything a renderer needs to draw one commit row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphRow {
    pub row: usize,
    pub commit_id: String,
    /// Lane of the commit's dot.
    pub lane: Lane,
    pub segments: Vec<LaneSegment>,
}

impl GraphRow {
    pub fn upper_segments(&self) -> impl Iterator<Item = &LaneSegment> {
        self.segments.iter().filter(|s| s.is_upper())
    }

    pub fn lower_segments(&self) -> impl Iterator<Item = &LaneSegment> {
        self.segments.iter().filter(|s| !s.is_upper())
    }

    /// Number of lane columns the row touches.
    pub fn width(&self) -> usize {
        self.segments
            .iter()
            .map(LaneSegment::max_lane)
            .chain(std::iter::once(self.lane))
            .max()
            .map_or(0, |lane| lane + 1)
    }
}

/// A parent reference that could not be matched to a later row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedParent {
    pub row: usize,
    pub commit_id: String,
    pub parent_id: String,
}

/// Result of feeding one page of commits to a builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphPage {
    pub rows: Vec<GraphRow>,
    pub warnings: Vec<UnresolvedParent>,
}

/// Immutable layout of a whole window, published as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphLayout {
    pub rows: Vec<GraphRow>,
    pub warnings: Vec<UnresolvedParent>,
    /// Number of lane columns needed to draw every row.
    pub lane_count: usize,
}

impl GraphLayout {
    pub fn from_pages<I: IntoIterator<Item = GraphPage>>(pages: I) -> Self {
        let mut layout = GraphLayout::default();
        for page in pages {
            layout.extend(page);
        }
        layout
    }

    pub fn extend(&mut self, page: GraphPage) {
        for row in &page.rows {
            self.lane_count = self.lane_count.max(row.width());
        }
        self.rows.extend(page.rows);
        self.warnings.extend(page.warnings);
    }

    pub fn row_for(&self, commit_id: &str) -> Option<&GraphRow> {
        self.rows.iter().find(|row| row.commit_id == commit_id)
    }

    pub fn lanes(&self) -> Vec<Lane> {
        self.rows.iter().map(|row| row.lane).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
