use serde::Serialize;
use std::hash::{Hash, Hasher};

/// A vertical drawing column in the history graph.
pub type Lane = usize;

/// One half of the drawing for a single commit row.
///
/// Every row has two regions: the upper half deals with merges, the lower
/// half with branches, so a single cell can hold both a merge and a split.
/// A branch that simply continues through a row needs two segments, one per
/// half.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LaneSegment {
    is_upper: bool,
    /// Lane the segment is drawn from.
    from: Lane,
    /// Lane the segment is drawn to.
    to: Lane,
    /// Slot this segment is assigned to (used by renderers for coloring).
    index: Lane,
}

impl LaneSegment {
    /// Build a segment. Lower segments store their endpoints swapped.
    pub fn new(is_upper: bool, from: Lane, to: Lane, index: Lane) -> Self {
        let (from, to) = if is_upper { (from, to) } else { (to, from) };
        Self {
            is_upper,
            from,
            to,
            index,
        }
    }

    pub fn upper(from: Lane, to: Lane, index: Lane) -> Self {
        Self::new(true, from, to, index)
    }

    pub fn lower(from: Lane, to: Lane, index: Lane) -> Self {
        Self::new(false, from, to, index)
    }

    pub fn is_upper(&self) -> bool {
        self.is_upper
    }

    pub fn from(&self) -> Lane {
        self.from
    }

    pub fn to(&self) -> Lane {
        self.to
    }

    pub fn index(&self) -> Lane {
        self.index
    }

    /// True when the segment stays in one column.
    pub fn is_straight(&self) -> bool {
        self.from == self.to
    }

    /// Widest lane this segment touches.
    pub fn max_lane(&self) -> Lane {
        self.from.max(self.to).max(self.index)
    }
}

// `index` is left out of equality: two segments joining the same lanes are
// the same logical edge even when they sit in different drawing slots.
impl PartialEq for LaneSegment {
    fn eq(&self, other: &Self) -> bool {
        self.is_upper == other.is_upper && self.from == other.from && self.to == other.to
    }
}

impl Eq for LaneSegment {}

impl Hash for LaneSegment {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_upper.hash(state);
        self.from.hash(state);
        self.to.hash(state);
    }
}

impl std::fmt::Display for LaneSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let half = if self.is_upper { 'U' } else { 'L' };
        write!(f, "{}{}>{}", half, self.from, self.to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;
    use test_case::test_case;

    fn hash_of(segment: &LaneSegment) -> u64 {
        let mut hasher = DefaultHasher::new();
        segment.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_upper_keeps_endpoints() {
        let segment = LaneSegment::new(true, 1, 3, 3);
        assert!(segment.is_upper());
        assert_eq!((segment.from(), segment.to()), (1, 3));
        assert_eq!(segment.index(), 3);
    }

    #[test]
    fn test_lower_swaps_endpoints() {
        let segment = LaneSegment::new(false, 1, 3, 3);
        assert!(!segment.is_upper());
        assert_eq!((segment.from(), segment.to()), (3, 1));
    }

    #[test_case(0, 0, 5 ; "same endpoints")]
    #[test_case(0, 2, 1 ; "diagonal")]
    #[test_case(4, 1, 0 ; "leftward")]
    fn test_equality_ignores_index(from: Lane, to: Lane, other_index: Lane) {
        let a = LaneSegment::upper(from, to, from);
        let b = LaneSegment::upper(from, to, other_index);
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_halves_are_distinct() {
        assert_ne!(LaneSegment::upper(1, 1, 1), LaneSegment::lower(1, 1, 1));
    }

    #[test]
    fn test_hash_set_dedups_on_lanes() {
        let set: HashSet<LaneSegment> = [
            LaneSegment::upper(0, 1, 0),
            LaneSegment::upper(0, 1, 7),
            LaneSegment::lower(0, 1, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(LaneSegment::upper(2, 0, 0).to_string(), "U2>0");
        assert_eq!(LaneSegment::lower(0, 2, 2).to_string(), "L2>0");
    }

    proptest! {
        #[test]
        fn test_normalization_is_self_consistent(a in 0usize..64, b in 0usize..64, index in 0usize..64) {
            let lower = LaneSegment::new(false, a, b, index);
            let upper = LaneSegment::new(true, b, a, index);
            prop_assert_eq!((lower.from(), lower.to()), (upper.from(), upper.to()));
        }

        #[test]
        fn test_straight_iff_same_lane(a in 0usize..64, b in 0usize..64) {
            prop_assert_eq!(LaneSegment::lower(a, b, a).is_straight(), a == b);
        }
    }
}
