use crate::graph::allocator::LaneAllocator;
use crate::graph::error::GraphError;
use crate::graph::layout::{GraphLayout, GraphPage, GraphRow, UnresolvedParent};
use crate::graph::occupancy::{OccupancyTable, Reservation};
use crate::graph::segment::LaneSegment;
use crate::models::GraphNode;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, warn};

// Lanes are handed out lowest-first, so a carried table never holds a lane
// much above its own size.
const MAX_CARRIED_LANE_GAP: usize = 1024;

/// Whether more rows follow the page handed to [`GraphBuilder::push_page`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// More pages follow; parents missing from this page stay reserved.
    Partial,
    /// The page ends the window; parents missing from it are unresolved.
    Final,
}

/// Streaming lane assignment over a topologically ordered commit window
/// (most recent first).
///
/// A builder owns its allocator and occupancy table for exactly one pass.
/// Feed it pages in order; each page yields the rows for its commits.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    allocator: LaneAllocator,
    occupancy: OccupancyTable,
    next_row: usize,
    lane_warning_threshold: Option<usize>,
    lane_warning_logged: bool,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a pass from an occupancy table produced by an earlier page.
    ///
    /// Reservations on lanes far wider than the table could have produced are
    /// dropped with an error; their parents start fresh branches when they
    /// arrive.
    pub fn resume(mut occupancy: OccupancyTable, next_row: usize) -> Self {
        let limit = occupancy.len().saturating_add(MAX_CARRIED_LANE_GAP);
        occupancy.retain(|parent_id, reservation| {
            if reservation.lane < limit {
                return true;
            }
            error!(
                "Dropping carried reservation of {} on lane {} (limit {})",
                parent_id, reservation.lane, limit
            );
            false
        });

        let allocator = LaneAllocator::from_reserved(occupancy.lanes());
        Self {
            allocator,
            occupancy,
            next_row,
            ..Self::default()
        }
    }

    /// Log a warning the first time the graph grows wider than `lanes`.
    pub fn with_lane_warning_threshold(mut self, lanes: usize) -> Self {
        self.lane_warning_threshold = Some(lanes);
        self
    }

    pub fn occupancy(&self) -> &OccupancyTable {
        &self.occupancy
    }

    pub fn into_occupancy(self) -> OccupancyTable {
        self.occupancy
    }

    pub fn allocator(&self) -> &LaneAllocator {
        &self.allocator
    }

    /// Row number the next commit will get.
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    pub fn push_page<C: GraphNode>(&mut self, page: &[C], mode: PageMode) -> GraphPage {
        let positions = page_positions(page);
        let mut out = GraphPage::default();

        for (offset, node) in page.iter().enumerate() {
            let row = self.lay_row(node, offset, &positions, mode, &mut out.warnings);
            out.rows.push(row);
        }

        self.finish_page(mode, &mut out.warnings);
        out
    }

    /// Like [`push_page`](Self::push_page) but gives up as soon as `cancel` is set.
    /// The builder must be discarded after a cancelled page.
    pub fn push_page_cancellable<C: GraphNode>(
        &mut self,
        page: &[C],
        mode: PageMode,
        cancel: &AtomicBool,
    ) -> Result<GraphPage, GraphError> {
        let positions = page_positions(page);
        let mut out = GraphPage::default();

        for (offset, node) in page.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                debug!("Layout cancelled at row {}", self.next_row);
                return Err(GraphError::Cancelled { row: self.next_row });
            }
            let row = self.lay_row(node, offset, &positions, mode, &mut out.warnings);
            out.rows.push(row);
        }

        self.finish_page(mode, &mut out.warnings);
        Ok(out)
    }

    fn lay_row<C: GraphNode>(
        &mut self,
        node: &C,
        offset: usize,
        positions: &HashMap<&str, usize>,
        mode: PageMode,
        warnings: &mut Vec<UnresolvedParent>,
    ) -> GraphRow {
        let row = self.next_row;
        self.next_row += 1;

        let commit_id = node.id();
        let mut segments = Vec::new();

        let lane = match self.occupancy.take(commit_id) {
            Some(Reservation { lane, .. }) => {
                segments.push(LaneSegment::upper(lane, lane, lane));
                lane
            }
            None => self.allocator.allocate(),
        };

        // Branches in flight that do not touch this commit.
        for passing in self.occupancy.lanes() {
            segments.push(LaneSegment::upper(passing, passing, passing));
            segments.push(LaneSegment::lower(passing, passing, passing));
        }

        let mut lane_continues = false;
        let mut handled: HashSet<&str> = HashSet::new();
        for (position, parent_id) in node.parent_ids().iter().enumerate() {
            if !handled.insert(parent_id.as_str()) {
                continue;
            }

            if let Some(target) = self.occupancy.lane_of(parent_id) {
                segments.push(LaneSegment::upper(lane, target, target));
                continue;
            }

            if !is_resolvable(parent_id, offset, positions, mode) {
                warn!(
                    "Unresolved parent {} of commit {} at row {}",
                    parent_id, commit_id, row
                );
                warnings.push(UnresolvedParent {
                    row,
                    commit_id: commit_id.to_string(),
                    parent_id: parent_id.clone(),
                });
                // Only the first parent continues the commit's own line.
                if position == 0 {
                    segments.push(LaneSegment::lower(lane, lane, lane));
                }
                continue;
            }

            let parent_lane = if lane_continues {
                let split = self.allocator.allocate();
                segments.push(LaneSegment::lower(lane, split, split));
                split
            } else {
                lane_continues = true;
                self.allocator.reserve(lane);
                segments.push(LaneSegment::lower(lane, lane, lane));
                lane
            };

            self.occupancy.insert(
                parent_id.clone(),
                Reservation {
                    lane: parent_lane,
                    claimed_by: commit_id.to_string(),
                    row,
                },
            );
        }

        if !lane_continues {
            if let Err(err) = self.allocator.free(lane) {
                self.recover(err);
            }
        }

        self.check_lanes(row);

        GraphRow {
            row,
            commit_id: commit_id.to_string(),
            lane,
            segments: dedup_segments(segments),
        }
    }

    fn finish_page(&mut self, mode: PageMode, warnings: &mut Vec<UnresolvedParent>) {
        if mode == PageMode::Partial {
            debug!(
                "Page done at row {}, {} branches carried over",
                self.next_row,
                self.occupancy.len()
            );
            return;
        }

        for (parent_id, reservation) in self.occupancy.drain_by_row() {
            warn!(
                "Unresolved parent {} of commit {} at row {}",
                parent_id, reservation.claimed_by, reservation.row
            );
            if let Err(err) = self.allocator.free(reservation.lane) {
                self.recover(err);
            }
            warnings.push(UnresolvedParent {
                row: reservation.row,
                commit_id: reservation.claimed_by,
                parent_id,
            });
        }
    }

    fn check_lanes(&mut self, row: usize) {
        if self.allocator.used_count() != self.occupancy.len() {
            error!(
                "Lane pool out of sync at row {}: {} used, {} reserved",
                row,
                self.allocator.used_count(),
                self.occupancy.len()
            );
            self.allocator.resync(self.occupancy.lanes());
        }

        if let Some(threshold) = self.lane_warning_threshold {
            if !self.lane_warning_logged && self.allocator.high_water() > threshold {
                warn!(
                    "Commit graph is {} lanes wide at row {} (threshold {})",
                    self.allocator.high_water(),
                    row,
                    threshold
                );
                self.lane_warning_logged = true;
            }
        }
    }

    fn recover(&mut self, err: GraphError) {
        error!("Re-synchronizing lane pool after: {}", err);
        self.allocator.resync(self.occupancy.lanes());
    }
}

fn page_positions<C: GraphNode>(page: &[C]) -> HashMap<&str, usize> {
    let mut positions = HashMap::with_capacity(page.len());
    for (offset, node) in page.iter().enumerate() {
        positions.entry(node.id()).or_insert(offset);
    }
    positions
}

// A parent resolves when it appears below the child in this page, or, for a
// partial page, when it is not in the page at all and may arrive later.
fn is_resolvable(
    parent_id: &str,
    offset: usize,
    positions: &HashMap<&str, usize>,
    mode: PageMode,
) -> bool {
    match positions.get(parent_id) {
        Some(&position) => position > offset,
        None => mode == PageMode::Partial,
    }
}

/// Keep the first of each logically equal segment, upper half first.
fn dedup_segments(mut segments: Vec<LaneSegment>) -> Vec<LaneSegment> {
    let mut seen = HashSet::with_capacity(segments.len());
    segments.retain(|segment| seen.insert(*segment));
    segments.sort_by_key(|s| (!s.is_upper(), s.index(), s.from(), s.to()));
    segments
}

/// Lay out a complete window in one pass.
pub fn layout<C: GraphNode>(commits: &[C]) -> GraphLayout {
    let mut builder = GraphBuilder::new();
    GraphLayout::from_pages([builder.push_page(commits, PageMode::Final)])
}

/// Lay out a complete window, abandoning the pass once `cancel` is set.
pub fn layout_cancellable<C: GraphNode>(
    commits: &[C],
    cancel: &AtomicBool,
) -> Result<GraphLayout, GraphError> {
    let mut builder = GraphBuilder::new();
    let page = builder.push_page_cancellable(commits, PageMode::Final, cancel)?;
    Ok(GraphLayout::from_pages([page]))
}
