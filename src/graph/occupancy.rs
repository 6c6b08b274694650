use crate::graph::segment::Lane;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A lane held open for a parent commit that has not been laid out yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub lane: Lane,
    /// Child commit that opened the reservation.
    pub claimed_by: String,
    /// Row of that child.
    pub row: usize,
}

/// Active branch tips of one layout pass, keyed by the pending parent id.
///
/// The table can be serialized and handed to a new builder so lane
/// continuity survives a page boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyTable {
    reservations: HashMap<String, Reservation>,
}

impl OccupancyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, commit_id: &str) -> Option<&Reservation> {
        self.reservations.get(commit_id)
    }

    pub fn lane_of(&self, commit_id: &str) -> Option<Lane> {
        self.get(commit_id).map(|reservation| reservation.lane)
    }

    pub fn contains(&self, commit_id: &str) -> bool {
        self.reservations.contains_key(commit_id)
    }

    pub(crate) fn insert(&mut self, commit_id: String, reservation: Reservation) {
        self.reservations.insert(commit_id, reservation);
    }

    pub(crate) fn take(&mut self, commit_id: &str) -> Option<Reservation> {
        self.reservations.remove(commit_id)
    }

    /// Drop every reservation for which `keep` returns false.
    pub(crate) fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &Reservation) -> bool,
    {
        self.reservations.retain(|id, reservation| keep(id, reservation));
    }

    /// Reserved lanes in ascending order.
    pub fn lanes(&self) -> Vec<Lane> {
        let mut lanes: Vec<Lane> = self.reservations.values().map(|r| r.lane).collect();
        lanes.sort_unstable();
        lanes
    }

    /// Remove every reservation, ordered by the row that opened it.
    pub(crate) fn drain_by_row(&mut self) -> Vec<(String, Reservation)> {
        let mut drained: Vec<(String, Reservation)> = self.reservations.drain().collect();
        drained.sort_by(|(a_id, a), (b_id, b)| (a.row, a.lane, a_id).cmp(&(b.row, b.lane, b_id)));
        drained
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reservation(lane: Lane, child: &str, row: usize) -> Reservation {
        Reservation {
            lane,
            claimed_by: child.to_string(),
            row,
        }
    }

    #[test]
    fn test_insert_take() {
        let mut table = OccupancyTable::new();
        table.insert("p1".into(), reservation(0, "c1", 0));
        table.insert("p2".into(), reservation(2, "c2", 1));

        assert_eq!(table.lane_of("p2"), Some(2));
        assert_eq!(table.lanes(), vec![0, 2]);
        assert_eq!(table.take("p1"), Some(reservation(0, "c1", 0)));
        assert!(!table.contains("p1"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_drain_orders_by_row() {
        let mut table = OccupancyTable::new();
        table.insert("late".into(), reservation(0, "c3", 3));
        table.insert("early".into(), reservation(1, "c1", 1));

        let drained: Vec<String> = table.drain_by_row().into_iter().map(|(id, _)| id).collect();
        assert_eq!(drained, vec!["early".to_string(), "late".to_string()]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_json_roundtrip_keeps_reservations() -> anyhow::Result<()> {
        let mut table = OccupancyTable::new();
        table.insert("p".into(), reservation(4, "c", 9));

        let json = serde_json::to_string(&table)?;
        let restored: OccupancyTable = serde_json::from_str(&json)?;
        assert_eq!(restored, table);
        Ok(())
    }
}
