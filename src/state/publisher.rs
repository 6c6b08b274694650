use crate::graph::{layout_cancellable, GraphError, GraphLayout};
use crate::models::GraphNode;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// A published layout and the request that produced it.
#[derive(Debug, Clone, Default)]
pub struct LayoutSnapshot {
    pub generation: u64,
    pub layout: Arc<GraphLayout>,
}

/// Recomputes layouts off the calling thread and publishes each finished
/// layout as a whole.
///
/// Every request gets a fresh builder. Starting a new request cancels the
/// one in flight, and a result from an older request is never published
/// over a newer one.
#[derive(Debug)]
pub struct LayoutPublisher {
    tx: Arc<watch::Sender<LayoutSnapshot>>,
    generation: AtomicU64,
    in_flight: Mutex<Option<Arc<AtomicBool>>>,
}

impl Default for LayoutPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutPublisher {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LayoutSnapshot::default());
        Self {
            tx: Arc::new(tx),
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Latest published layout.
    pub fn current(&self) -> LayoutSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LayoutSnapshot> {
        self.tx.subscribe()
    }

    /// Lay out `window` on the blocking pool, cancelling any earlier request.
    /// Must be called from within a tokio runtime.
    pub fn request<C>(&self, window: Vec<C>) -> JoinHandle<Result<Arc<GraphLayout>, GraphError>>
    where
        C: GraphNode + Send + 'static,
    {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let cancel = Arc::new(AtomicBool::new(false));
        self.replace_in_flight(Some(cancel.clone()));

        let tx = self.tx.clone();
        tokio::task::spawn_blocking(move || {
            let layout = Arc::new(layout_cancellable(&window, &cancel)?);
            if cancel.load(Ordering::SeqCst) {
                return Err(GraphError::Cancelled {
                    row: layout.rows.len(),
                });
            }

            if publish_if_newer(&tx, generation, layout.clone()) {
                tracing::debug!(
                    "Published layout generation {} ({} rows)",
                    generation,
                    layout.rows.len()
                );
            }
            Ok(layout)
        })
    }

    /// Abandon the request in flight, if any.
    pub fn cancel(&self) {
        self.replace_in_flight(None);
    }

    fn replace_in_flight(&self, next: Option<Arc<AtomicBool>>) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = in_flight.take() {
            previous.store(true, Ordering::SeqCst);
        }
        *in_flight = next;
    }
}

fn publish_if_newer(
    tx: &watch::Sender<LayoutSnapshot>,
    generation: u64,
    layout: Arc<GraphLayout>,
) -> bool {
    tx.send_if_modified(|current| {
        if generation <= current.generation {
            return false;
        }
        *current = LayoutSnapshot { generation, layout };
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::layout;
    use crate::models::CommitNode;
    use pretty_assertions::assert_eq;

    fn linear(len: usize) -> Vec<CommitNode> {
        (0..len)
            .map(|i| CommitNode {
                id: format!("c{}", i),
                parent_ids: if i + 1 < len {
                    vec![format!("c{}", i + 1)]
                } else {
                    Vec::new()
                },
            })
            .collect()
    }

    #[tokio::test]
    async fn test_request_publishes_layout() -> anyhow::Result<()> {
        let publisher = LayoutPublisher::new();
        let mut rx = publisher.subscribe();

        let published = publisher.request(linear(5)).await??;
        rx.changed().await?;

        let snapshot = publisher.current();
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.layout.rows.len(), 5);
        assert_eq!(*snapshot.layout, *published);
        assert_eq!(rx.borrow().generation, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_newer_request_wins() -> anyhow::Result<()> {
        let publisher = LayoutPublisher::new();

        let first = publisher.request(linear(2000));
        let second = publisher.request(linear(3));

        // The first pass may finish or be cancelled; it cannot overwrite the second.
        let _ = first.await?;
        second.await??;

        let snapshot = publisher.current();
        assert_eq!(snapshot.generation, 2);
        assert_eq!(*snapshot.layout, layout(&linear(3)));
        Ok(())
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let (tx, _rx) = watch::channel(LayoutSnapshot::default());
        let newer = Arc::new(layout(&linear(2)));
        let older = Arc::new(layout(&linear(4)));

        assert!(publish_if_newer(&tx, 2, newer.clone()));
        assert!(!publish_if_newer(&tx, 1, older));
        assert_eq!(tx.borrow().generation, 2);
        assert_eq!(*tx.borrow().layout, *newer);
    }

    #[test]
    fn test_cancel_without_request_is_noop() {
        let publisher = LayoutPublisher::new();
        publisher.cancel();
        assert_eq!(publisher.current().generation, 0);
        assert!(publisher.current().layout.is_empty());
    }
}
