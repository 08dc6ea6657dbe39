//! A single price level: a priority queue of resting orders.
//!
//! Within one level, resting orders match in (rating desc, time asc) order.
//! The comparator is explicit; side never flips the direction here. The
//! book chooses which level is served first, the level only breaks ties.

use crate::order::Order;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::collections::binary_heap::PeekMut;

/// A resting order queued at a price level.
///
/// `seq` is a per-book arrival counter; it makes the ordering total so two
/// orders tying on rating and time drain in arrival order on every replay.
#[derive(Debug, Clone)]
pub struct RestingOrder {
    /// The queued order. Its `remaining` field is the live residual.
    pub order: Order,
    /// Book-wide arrival sequence number.
    pub seq: u64,
}

impl Ord for RestingOrder {
    fn cmp(&self, other: &Self) -> Ordering {
        // Greater = matched first: higher rating, then earlier time, then
        // earlier arrival.
        self.order
            .rating
            .cmp(&other.order.rating)
            .then_with(|| other.order.time.cmp(&self.order.time))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for RestingOrder {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RestingOrder {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RestingOrder {}

/// One fill produced while draining a level.
#[derive(Debug, Clone)]
pub struct LevelFill {
    /// Id of the resting order that traded.
    pub order_id: String,
    /// Client owning the resting order.
    pub client_id: String,
    /// Quantity executed against the resting order.
    pub quantity: u64,
}

/// The priority queue of resting orders at one price.
#[derive(Debug, Default)]
pub struct PriceLevel {
    heap: BinaryHeap<RestingOrder>,
}

impl PriceLevel {
    /// Creates an empty level.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a resting order.
    pub fn push(&mut self, entry: RestingOrder) {
        self.heap.push(entry);
    }

    /// Matches up to `quantity` against the level in priority order.
    ///
    /// Returns the executed quantity and one fill per resting order
    /// touched. Resting orders whose residual reaches zero are removed
    /// immediately; the level never holds an exhausted entry.
    pub fn match_order(&mut self, quantity: u64) -> (u64, Vec<LevelFill>) {
        let mut remaining = quantity;
        let mut fills = Vec::new();

        while remaining > 0 {
            let Some(mut top) = self.heap.peek_mut() else {
                break;
            };
            let size = top.order.remaining.min(remaining);
            if size == 0 {
                PeekMut::pop(top);
                continue;
            }
            top.order.remaining -= size;
            remaining -= size;
            fills.push(LevelFill {
                order_id: top.order.id.clone(),
                client_id: top.order.client_id.clone(),
                quantity: size,
            });
            if top.order.remaining == 0 {
                PeekMut::pop(top);
            }
        }

        (quantity - remaining, fills)
    }

    /// Total resting quantity at this level.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.heap.iter().map(|entry| entry.order.remaining).sum()
    }

    /// Number of resting orders.
    #[must_use]
    pub fn order_count(&self) -> usize {
        self.heap.len()
    }

    /// True when no order rests here.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Iterates resting orders in no particular order (heap layout).
    pub fn iter(&self) -> impl Iterator<Item = &RestingOrder> {
        self.heap.iter()
    }
}
