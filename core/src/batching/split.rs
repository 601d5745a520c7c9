//! batching/split.rs
//! Bounded bisection as an explicit worklist.
//!
//! Every round bisects each pending part once. A part settles when it fits the
//! budget or is a single item. After `max_rounds` whatever is still pending is
//! emitted as-is, so the loop always ends. Parts cover the input in order.
use serde_json::Value;

use crate::batching::policy::MeasuredItems;

#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    /// Item groups in input order.
    pub parts: Vec<Vec<Value>>,
    /// Rounds actually run.
    pub rounds: usize,
    /// Parts emitted over budget.
    pub oversized: usize,
}

#[derive(Debug, Clone, Copy)]
struct Piece {
    start: usize,
    end: usize,
    pending: bool,
}

/// Prefix sums over item sizes for O(1) range sizes.
struct RangeSizer {
    prefix: Vec<usize>,
}

impl RangeSizer {
    fn new(sizes: &[usize]) -> Self {
        let mut prefix = Vec::with_capacity(sizes.len() + 1);
        prefix.push(0);
        for s in sizes {
            let last = prefix[prefix.len() - 1];
            prefix.push(last + s);
        }
        Self { prefix }
    }

    /// Serialized size of items `start..end` as one JSON array.
    fn size(&self, start: usize, end: usize) -> usize {
        2 + (self.prefix[end] - self.prefix[start]) + (end - start).saturating_sub(1)
    }
}

pub fn split_to_budget(measured: MeasuredItems, budget: usize, max_rounds: usize) -> SplitOutcome {
    let n = measured.len();
    if n == 0 {
        return SplitOutcome { parts: Vec::new(), rounds: 0, oversized: 0 };
    }

    let sizer = RangeSizer::new(&measured.sizes);
    let piece = |start: usize, end: usize| Piece {
        start,
        end,
        pending: end - start > 1 && sizer.size(start, end) >= budget,
    };

    let mut pieces = vec![piece(0, n)];
    let mut rounds = 0;

    while rounds < max_rounds && pieces.iter().any(|p| p.pending) {
        rounds += 1;
        let mut next = Vec::with_capacity(pieces.len() * 2);
        for p in pieces {
            if !p.pending {
                next.push(p);
                continue;
            }
            let mid = p.start + (p.end - p.start) / 2;
            next.push(piece(p.start, mid));
            next.push(piece(mid, p.end));
        }
        pieces = next;

        tracing::debug!(
            round = rounds,
            parts = pieces.len(),
            pending = pieces.iter().filter(|p| p.pending).count(),
            "split round"
        );
    }

    let oversized = pieces.iter().filter(|p| sizer.size(p.start, p.end) >= budget).count();
    if oversized > 0 {
        tracing::warn!(oversized, rounds, budget, "emitting parts over byte budget");
    }

    let mut items = measured.items.into_iter();
    let parts: Vec<Vec<Value>> = pieces
        .iter()
        .map(|p| items.by_ref().take(p.end - p.start).collect::<Vec<Value>>())
        .collect();

    SplitOutcome { parts, rounds, oversized }
}
