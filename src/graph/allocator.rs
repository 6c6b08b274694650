use crate::graph::error::GraphError;
use crate::graph::segment::Lane;

/// Pool of lane indices for one layout pass.
///
/// Lanes are handed out lowest-first so the graph stays compact. The pool
/// is unbounded: when every slot is in use a new one is appended.
#[derive(Debug, Clone, Default)]
pub struct LaneAllocator {
    slots: Vec<bool>,
    used: usize,
}

impl LaneAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a pool with lanes that are already taken, e.g. reservations
    /// carried over from a previous page.
    pub fn from_reserved<I: IntoIterator<Item = Lane>>(lanes: I) -> Self {
        let mut allocator = Self::new();
        for lane in lanes {
            allocator.reserve(lane);
        }
        allocator
    }

    /// Take the lowest free lane.
    pub fn allocate(&mut self) -> Lane {
        let lane = match self.slots.iter().position(|used| !used) {
            Some(lane) => lane,
            None => {
                self.slots.push(false);
                self.slots.len() - 1
            }
        };
        self.slots[lane] = true;
        self.used += 1;
        lane
    }

    /// Return a lane to the pool.
    pub fn free(&mut self, lane: Lane) -> Result<(), GraphError> {
        match self.slots.get_mut(lane) {
            Some(slot) if *slot => {
                *slot = false;
                self.used -= 1;
                Ok(())
            }
            _ => Err(GraphError::lane_not_allocated(lane)),
        }
    }

    /// Mark a specific lane as used. Returns false if it already was.
    pub fn reserve(&mut self, lane: Lane) -> bool {
        if lane >= self.slots.len() {
            self.slots.resize(lane + 1, false);
        }
        if self.slots[lane] {
            return false;
        }
        self.slots[lane] = true;
        self.used += 1;
        true
    }

    pub fn is_used(&self, lane: Lane) -> bool {
        self.slots.get(lane).copied().unwrap_or(false)
    }

    pub fn used_count(&self) -> usize {
        self.used
    }

    /// Number of lane slots ever created by this pool.
    pub fn high_water(&self) -> usize {
        self.slots.len()
    }

    pub fn used_lanes(&self) -> impl Iterator<Item = Lane> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(lane, used)| used.then_some(lane))
    }

    /// Drop all usage and mark exactly `lanes` as used. Slot count is kept.
    pub fn resync<I: IntoIterator<Item = Lane>>(&mut self, lanes: I) {
        self.slots.iter_mut().for_each(|slot| *slot = false);
        self.used = 0;
        for lane in lanes {
            self.reserve(lane);
        }
    }
}
